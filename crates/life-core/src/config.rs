//! Configuration types for the engine and its drivers.

use crate::{Error, Result, Topology};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Side length used when no valid size is supplied
pub const DEFAULT_WORLD_SIZE: usize = 10;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the (square) grid
    pub size: usize,
    /// Edge behavior used for neighbor counting
    pub topology: Topology,
    /// Probability that a cell starts alive (0.0 to 1.0)
    pub density: f64,
    /// Random seed for reproducibility; fresh entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WORLD_SIZE,
            topology: Topology::Bounded,
            density: 0.3,
            rng_seed: None,
        }
    }
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Driver loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Number of generations to run before stopping
    pub max_generations: u64,
    /// Pause automatically once every cell is dead
    pub pause_on_extinction: bool,
    /// Generations between progress reports
    pub report_interval: u64,
    pub log_format: LogFormat,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_generations: 100,
            pause_on_extinction: true,
            report_interval: 10,
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    pub world: WorldConfig,
    pub driver: DriverConfig,
}

impl LifeConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: LifeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.world.size == 0 {
            return Err(Error::Config("world.size must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.world.density) {
            return Err(Error::Config(format!(
                "world.density must be within [0, 1], got {}",
                self.world.density
            )));
        }
        if self.driver.report_interval == 0 {
            return Err(Error::Config(
                "driver.report_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

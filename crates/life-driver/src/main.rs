//! Headless driver for the Game of Life engine.

use anyhow::{Context, Result};
use life_core::LifeConfig;
use life_driver::{telemetry, Driver, LogObserver};
use tracing::{debug, info};

/// Environment variable naming a JSON configuration file
const CONFIG_ENV: &str = "LIFE_CONFIG";

fn main() -> Result<()> {
    let config = load_config()?;

    telemetry::init_telemetry(config.driver.log_format)?;

    info!(
        size = config.world.size,
        topology = ?config.world.topology,
        density = config.world.density,
        "Starting Game of Life driver"
    );

    let mut driver = Driver::new(config.world.clone(), config.driver.clone())?;
    driver.add_observer(LogObserver::new(config.driver.report_interval));

    let summary = driver.run(config.driver.max_generations)?;

    info!(
        generation = summary.generation,
        alive_count = summary.alive_count,
        extinct = summary.extinct,
        "Run complete"
    );
    debug!("Final grid:\n{}", driver.simulator().current_grid());

    Ok(())
}

fn load_config() -> Result<LifeConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => LifeConfig::from_file(&path)
            .with_context(|| format!("failed to load config file {}", path)),
        Err(_) => Ok(LifeConfig::default()),
    }
}

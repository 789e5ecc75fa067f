//! Pause/reset control around a simulator, with frame observers.

use life_core::{DriverConfig, Result, WorldConfig, DEFAULT_WORLD_SIZE};
use life_world::{Frame, RandomSeeder, Simulator};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

/// Receives the frame produced by every completed step or reset.
pub trait FrameObserver {
    fn on_frame(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> FrameObserver for F {
    fn on_frame(&mut self, frame: &Frame) {
        (*self)(frame)
    }
}

/// Reports progress through `tracing` every `interval` generations
pub struct LogObserver {
    interval: u64,
}

impl LogObserver {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl FrameObserver for LogObserver {
    fn on_frame(&mut self, frame: &Frame) {
        if frame.generation % self.interval == 0 {
            info!(
                event = "generation_report",
                generation = frame.generation,
                alive_count = frame.alive_count,
                "Generation #{}",
                frame.generation
            );
        }
    }
}

/// What a single [`Driver::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A pending reset was applied; the driver stays paused.
    Reset,
    /// Nothing happened because the driver is paused.
    Paused,
    /// One generation was computed.
    Stepped,
    /// One generation was computed and it left no alive cells; the driver paused.
    Extinct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub generation: u64,
    pub alive_count: usize,
    pub extinct: bool,
}

/// Turn free-form world size input into a grid side length.
///
/// Surrounding whitespace is trimmed first, so `" 7 "` yields 7 where a
/// strict digits-only check would have fallen back to the default. Blank,
/// non-numeric or zero input falls back to [`DEFAULT_WORLD_SIZE`].
pub fn parse_world_size(text: &str) -> usize {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return DEFAULT_WORLD_SIZE;
    }
    match text.parse::<usize>() {
        Ok(size) if size > 0 => size,
        _ => DEFAULT_WORLD_SIZE,
    }
}

pub struct Driver {
    simulator: Simulator,
    world: WorldConfig,
    config: DriverConfig,
    rng: ChaCha8Rng,
    paused: bool,
    pending_reset: Option<usize>,
    observers: Vec<Box<dyn FrameObserver>>,
}

impl Driver {
    /// Build a square world from `world` and seed it at the configured density.
    pub fn new(world: WorldConfig, config: DriverConfig) -> Result<Self> {
        let mut rng = match world.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut simulator = Simulator::with_topology(world.size, world.size, world.topology)?;
        let mut seeder = RandomSeeder::from_rng(world.density, ChaCha8Rng::seed_from_u64(rng.gen()))?;
        simulator.seed(&mut seeder)?;

        Ok(Self {
            simulator,
            world,
            config,
            rng,
            paused: false,
            pending_reset: None,
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: impl FrameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn has_pending_reset(&self) -> bool {
        self.pending_reset.is_some()
    }

    /// Pause and schedule a fresh `size x size` world for the next tick.
    pub fn request_reset(&mut self, size: usize) {
        self.paused = true;
        self.pending_reset = Some(size);
    }

    /// [`Driver::request_reset`] with unvalidated user input
    pub fn request_reset_from_input(&mut self, text: &str) {
        self.request_reset(parse_world_size(text));
    }

    pub fn tick(&mut self) -> Result<TickOutcome> {
        if let Some(size) = self.pending_reset.take() {
            self.apply_reset(size)?;
            self.notify();
            return Ok(TickOutcome::Reset);
        }

        if self.paused {
            return Ok(TickOutcome::Paused);
        }

        self.simulator.step();
        self.notify();

        if self.config.pause_on_extinction && self.simulator.is_extinct() {
            self.paused = true;
            info!(
                generation = self.simulator.generation(),
                "All cells dead, pausing"
            );
            return Ok(TickOutcome::Extinct);
        }

        Ok(TickOutcome::Stepped)
    }

    /// Step until `max_generations` steps have run or the driver pauses.
    #[instrument(skip(self))]
    pub fn run(&mut self, max_generations: u64) -> Result<RunSummary> {
        let mut steps = 0;
        while steps < max_generations {
            match self.tick()? {
                TickOutcome::Stepped => steps += 1,
                TickOutcome::Extinct => {
                    steps += 1;
                    break;
                }
                TickOutcome::Reset | TickOutcome::Paused => break,
            }
        }

        Ok(RunSummary {
            steps,
            generation: self.simulator.generation(),
            alive_count: self.simulator.alive_count(),
            extinct: self.simulator.is_extinct(),
        })
    }

    fn apply_reset(&mut self, size: usize) -> Result<()> {
        let mut seeder = RandomSeeder::from_rng(
            self.world.density,
            ChaCha8Rng::seed_from_u64(self.rng.gen()),
        )?;
        self.simulator.resize(size, size)?;
        self.simulator.seed(&mut seeder)?;
        self.world.size = size;
        debug!(
            size,
            alive_count = self.simulator.alive_count(),
            "Applied reset"
        );
        Ok(())
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let frame = self.simulator.frame();
        for observer in &mut self.observers {
            observer.on_frame(&frame);
        }
    }
}

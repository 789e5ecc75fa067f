//! External driver for the engine: pause/reset control, input sanitising and
//! frame delivery to observers.

pub mod driver;
pub mod telemetry;

pub use driver::{parse_world_size, Driver, FrameObserver, LogObserver, RunSummary, TickOutcome};

//! Cellular automaton engine.
//!
//! This module implements the grid of cells, the neighbor-counting procedure and
//! the generation-advance rule of Conway's Game of Life.

pub mod grid;
pub mod seed;
pub mod simulation;
pub mod frame;

pub use grid::{Grid, NeighborCounts};
pub use seed::{Pattern, PatternSeeder, RandomSeeder, Seeder};
pub use simulation::{next_state, Simulator};
pub use frame::{Frame, FrameCell};

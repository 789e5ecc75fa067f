//! Seeding strategies for populating a fresh grid.

use crate::grid::Grid;
use life_core::{CellState, Error, Position, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A strategy that populates an all-dead grid with an initial population.
pub trait Seeder {
    fn populate(&mut self, grid: &mut Grid) -> Result<()>;
}

/// Independent Bernoulli draw per cell
pub struct RandomSeeder {
    density: f64,
    rng: ChaCha8Rng,
}

impl RandomSeeder {
    /// `seed` - random seed (if `None`, fresh entropy is used)
    pub fn new(density: f64, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::from_rng(density, rng)
    }

    pub fn from_rng(density: f64, rng: ChaCha8Rng) -> Result<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(Error::InvalidDensity(density));
        }
        Ok(Self { density, rng })
    }

    pub fn density(&self) -> f64 {
        self.density
    }
}

impl Seeder for RandomSeeder {
    fn populate(&mut self, grid: &mut Grid) -> Result<()> {
        let (rows, cols) = grid.dimensions();
        for row in 0..rows {
            for col in 0..cols {
                grid.set(row, col, self.rng.gen_bool(self.density).into())?;
            }
        }
        Ok(())
    }
}

/// Explicit set of alive coordinates, optionally shifted by an offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSeeder {
    cells: Vec<Position>,
    offset: Position,
}

impl PatternSeeder {
    pub fn new(cells: impl IntoIterator<Item = Position>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            offset: Position::new(0, 0),
        }
    }

    /// Place the pattern with its top-left corner at `offset`
    pub fn at(mut self, offset: Position) -> Self {
        self.offset = offset;
        self
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }
}

impl Seeder for PatternSeeder {
    fn populate(&mut self, grid: &mut Grid) -> Result<()> {
        let (rows, cols) = grid.dimensions();
        for cell in &self.cells {
            let pos = cell
                .translate(self.offset.row, self.offset.col)
                .ok_or(Error::OutOfBounds {
                    row: cell.row.saturating_add(self.offset.row),
                    col: cell.col.saturating_add(self.offset.col),
                    rows,
                    cols,
                })?;
            grid.set(pos.row, pos.col, CellState::Alive)?;
        }
        Ok(())
    }
}

/// Well-known small configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// 2x2 still life
    Block,
    /// Horizontal line of three; period 2
    Blinker,
    /// Diagonal spaceship; period 4
    Glider,
    /// Six-cell still life
    Beehive,
    /// Period 2 oscillator
    Toad,
}

impl Pattern {
    pub fn cells(&self) -> Vec<Position> {
        let coords: &[(usize, usize)] = match self {
            Pattern::Block => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            Pattern::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Pattern::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
            Pattern::Beehive => &[(0, 1), (0, 2), (1, 0), (1, 3), (2, 1), (2, 2)],
            Pattern::Toad => &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
        };
        coords.iter().copied().map(Position::from).collect()
    }

    /// `(rows, cols)` of the smallest box containing the pattern
    pub fn bounding_box(&self) -> (usize, usize) {
        let cells = self.cells();
        let rows = cells.iter().map(|p| p.row + 1).max().unwrap_or(0);
        let cols = cells.iter().map(|p| p.col + 1).max().unwrap_or(0);
        (rows, cols)
    }

    pub fn at(&self, offset: Position) -> PatternSeeder {
        PatternSeeder::new(self.cells()).at(offset)
    }
}

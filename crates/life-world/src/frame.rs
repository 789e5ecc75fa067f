//! Read-only snapshot handed to renderers once per completed step.

use crate::grid::{Grid, NeighborCounts};
use life_core::{Error, Position, Result};
use serde::{Deserialize, Serialize};

/// State of one generation as seen from outside the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FrameRepr")]
pub struct Frame {
    pub rows: usize,
    pub cols: usize,
    pub generation: u64,
    pub alive_count: usize,
    alive: Vec<bool>,
    neighbors: Vec<u8>,
}

#[derive(Deserialize)]
struct FrameRepr {
    rows: usize,
    cols: usize,
    generation: u64,
    alive_count: usize,
    alive: Vec<bool>,
    neighbors: Vec<u8>,
}

impl TryFrom<FrameRepr> for Frame {
    type Error = Error;

    fn try_from(repr: FrameRepr) -> Result<Self> {
        if repr.rows == 0 || repr.cols == 0 {
            return Err(Error::InvalidSize {
                rows: repr.rows,
                cols: repr.cols,
            });
        }
        let expected = repr.rows * repr.cols;
        if repr.alive.len() != expected || repr.neighbors.len() != expected {
            return Err(Error::InvalidPattern(format!(
                "frame of {}x{} needs {} cells, got {} alive flags and {} neighbor counts",
                repr.rows,
                repr.cols,
                expected,
                repr.alive.len(),
                repr.neighbors.len()
            )));
        }
        let alive = repr.alive.iter().filter(|&&a| a).count();
        if alive != repr.alive_count {
            return Err(Error::InvalidPattern(format!(
                "alive_count is {} but {} cells are alive",
                repr.alive_count, alive
            )));
        }
        Ok(Self {
            rows: repr.rows,
            cols: repr.cols,
            generation: repr.generation,
            alive_count: repr.alive_count,
            alive: repr.alive,
            neighbors: repr.neighbors,
        })
    }
}

/// One cell of a [`Frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCell {
    pub position: Position,
    pub alive: bool,
    pub neighbors: u8,
}

impl FrameCell {
    /// Heatmap intensity: the neighbor count, plus one for an alive cell (0..=9)
    pub fn heat(&self) -> u8 {
        self.neighbors + self.alive as u8
    }
}

impl Frame {
    pub(crate) fn capture(grid: &Grid, neighbors: &NeighborCounts, generation: u64) -> Self {
        let alive: Vec<bool> = grid.iter().map(|(_, state)| state.is_alive()).collect();
        let alive_count = alive.iter().filter(|&&a| a).count();
        let (rows, cols) = grid.dimensions();
        Self {
            rows,
            cols,
            generation,
            alive_count,
            alive,
            neighbors: neighbors.as_slice().to_vec(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<FrameCell> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let index = row * self.cols + col;
        Ok(FrameCell {
            position: Position::new(row, col),
            alive: self.alive[index],
            neighbors: self.neighbors[index],
        })
    }

    pub fn is_alive(&self, row: usize, col: usize) -> Result<bool> {
        self.cell(row, col).map(|cell| cell.alive)
    }

    pub fn neighbor_count(&self, row: usize, col: usize) -> Result<u8> {
        self.cell(row, col).map(|cell| cell.neighbors)
    }

    pub fn heat(&self, row: usize, col: usize) -> Result<u8> {
        self.cell(row, col).map(|cell| cell.heat())
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = FrameCell> + '_ {
        self.alive
            .iter()
            .zip(&self.neighbors)
            .enumerate()
            .map(move |(i, (&alive, &neighbors))| FrameCell {
                position: Position::new(i / self.cols, i % self.cols),
                alive,
                neighbors,
            })
    }

    pub fn is_extinct(&self) -> bool {
        self.alive_count == 0
    }
}

#[cfg(test)]
mod tests {
    use crate::Simulator;
    use life_core::Position;

    #[test]
    fn test_frame_matches_simulator() {
        let mut sim = Simulator::new(5, 5).unwrap();
        sim.seed_cells(&[Position::new(2, 1), Position::new(2, 2), Position::new(2, 3)])
            .unwrap();
        sim.step();

        let frame = sim.frame();
        assert_eq!((frame.rows, frame.cols), (5, 5));
        assert_eq!(frame.generation, 1);
        assert_eq!(frame.alive_count, 3);
        assert!(frame.is_alive(1, 2).unwrap());
        assert!(!frame.is_alive(2, 1).unwrap());
        assert_eq!(frame.neighbor_count(2, 1).unwrap(), 3);
        assert_eq!(frame.cells().count(), 25);
        assert_eq!(frame.cells().filter(|c| c.alive).count(), 3);
    }

    #[test]
    fn test_heat_counts_alive_cell_itself() {
        let mut sim = Simulator::new(5, 5).unwrap();
        sim.seed_cells(&[Position::new(2, 1), Position::new(2, 2), Position::new(2, 3)])
            .unwrap();
        let frame = sim.frame();

        // centre of the blinker: alive with two neighbors
        assert_eq!(frame.heat(2, 2).unwrap(), 3);
        // above the centre: dead with three neighbors
        assert_eq!(frame.heat(1, 2).unwrap(), 3);
        assert_eq!(frame.heat(0, 0).unwrap(), 0);
        assert!(frame.heat(5, 0).is_err());
    }

    #[test]
    fn test_frame_serialization() {
        let mut sim = Simulator::new(3, 4).unwrap();
        sim.seed_density(0.5, Some(9)).unwrap();
        let frame = sim.frame();

        let json = serde_json::to_string(&frame).unwrap();
        let deserialized: super::Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, deserialized);
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_frame() {
        let bad = [
            r#"{"rows":2,"cols":0,"generation":0,"alive_count":0,"alive":[],"neighbors":[]}"#,
            r#"{"rows":2,"cols":2,"generation":0,"alive_count":1,"alive":[true],"neighbors":[0,0,0,0]}"#,
            r#"{"rows":1,"cols":2,"generation":0,"alive_count":0,"alive":[false,false],"neighbors":[0]}"#,
            r#"{"rows":1,"cols":2,"generation":3,"alive_count":2,"alive":[true,false],"neighbors":[0,1]}"#,
        ];
        for json in bad {
            assert!(serde_json::from_str::<super::Frame>(json).is_err(), "{}", json);
        }
    }

    #[test]
    fn test_frame_reports_extinction() {
        let mut sim = Simulator::new(4, 4).unwrap();
        sim.seed_cells(&[Position::new(1, 1)]).unwrap();
        assert!(!sim.frame().is_extinct());

        sim.step();
        let frame = sim.frame();
        assert!(frame.is_extinct());
        assert_eq!(frame.alive_count, 0);
        assert!(frame.cells().all(|cell| cell.heat() == 0));
    }
}

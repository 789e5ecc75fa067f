//! 2D grid of cells for one generation.

use life_core::{CellState, Direction, Error, Position, Result, Topology};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rectangular grid of cells with fixed dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    rows: usize,
    cols: usize,
    topology: Topology,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create an all-dead grid with bounded edges
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_topology(rows, cols, Topology::Bounded)
    }

    pub fn with_topology(rows: usize, cols: usize, topology: Topology) -> Result<Self> {
        check_size(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            topology,
            cells: vec![CellState::Dead; rows * cols],
        })
    }

    /// Build a grid from row-major cell states
    pub fn from_cells(
        rows: usize,
        cols: usize,
        topology: Topology,
        cells: Vec<CellState>,
    ) -> Result<Self> {
        check_size(rows, cols)?;
        if cells.len() != rows * cols {
            return Err(Error::InvalidPattern(format!(
                "expected {} cells for a {}x{} grid, got {}",
                rows * cols,
                rows,
                cols,
                cells.len()
            )));
        }
        Ok(Self {
            rows,
            cols,
            topology,
            cells,
        })
    }

    /// Parse the textual form: one line per row, `O`/`#`/`*` alive, `.`/`_` dead.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str, topology: Topology) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = lines.first() else {
            return Err(Error::InvalidPattern("pattern is empty".to_string()));
        };
        let cols = first.chars().count();
        let mut cells = Vec::with_capacity(lines.len() * cols);

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(Error::InvalidPattern(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    cols
                )));
            }
            for ch in line.chars() {
                let state = CellState::from_char(ch).ok_or_else(|| {
                    Error::InvalidPattern(format!("unexpected character {:?} in row {}", ch, row))
                })?;
                cells.push(state);
            }
        }

        Self::from_cells(lines.len(), cols, topology, cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn get(&self, row: usize, col: usize) -> Result<CellState> {
        let index = self.index(row, col)?;
        Ok(self.cells[index])
    }

    pub fn is_alive(&self, row: usize, col: usize) -> Result<bool> {
        self.get(row, col).map(CellState::is_alive)
    }

    pub fn set(&mut self, row: usize, col: usize, state: CellState) -> Result<()> {
        let index = self.index(row, col)?;
        self.cells[index] = state;
        Ok(())
    }

    /// Positions adjacent to `pos` that exist under this grid's topology
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::all()
            .into_iter()
            .filter_map(move |dir| self.topology.neighbor(pos, dir, self.rows, self.cols))
    }

    /// Number of alive cells among the up-to-8 adjacent positions
    pub fn neighbor_count(&self, row: usize, col: usize) -> Result<u8> {
        self.index(row, col)?;
        Ok(self.count_alive_neighbors(Position::new(row, col)))
    }

    /// Neighbor counts for every cell of this grid
    pub fn neighbor_counts(&self) -> NeighborCounts {
        let counts = self
            .positions()
            .map(|pos| self.count_alive_neighbors(pos))
            .collect();
        NeighborCounts {
            rows: self.rows,
            cols: self.cols,
            counts,
        }
    }

    /// Total number of alive cells (full scan)
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    pub fn alive_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.iter()
            .filter(|(_, state)| state.is_alive())
            .map(|(pos, _)| pos)
    }

    /// Iterator over all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, state)| (self.index_to_pos(i), *state))
    }

    pub(crate) fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Grid of the same shape and topology holding `cells`
    pub(crate) fn successor(&self, cells: Vec<CellState>) -> Grid {
        debug_assert_eq!(cells.len(), self.cells.len());
        Grid {
            rows: self.rows,
            cols: self.cols,
            topology: self.topology,
            cells,
        }
    }

    fn count_alive_neighbors(&self, pos: Position) -> u8 {
        self.neighbors(pos)
            .filter(|n| self.cells[n.row * self.cols + n.col].is_alive())
            .count() as u8
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    fn index_to_pos(&self, index: usize) -> Position {
        Position::new(index / self.cols, index % self.cols)
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, Topology::Bounded)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Unchecked wire form of [`Grid`]
#[derive(Deserialize)]
struct GridRepr {
    rows: usize,
    cols: usize,
    #[serde(default)]
    topology: Topology,
    cells: Vec<CellState>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = Error;

    fn try_from(repr: GridRepr) -> Result<Self> {
        Self::from_cells(repr.rows, repr.cols, repr.topology, repr.cells)
    }
}

fn check_size(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidSize { rows, cols });
    }
    Ok(())
}

/// Per-cell neighbor counts derived from one [`Grid`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NeighborCountsRepr")]
pub struct NeighborCounts {
    rows: usize,
    cols: usize,
    counts: Vec<u8>,
}

#[derive(Deserialize)]
struct NeighborCountsRepr {
    rows: usize,
    cols: usize,
    counts: Vec<u8>,
}

impl TryFrom<NeighborCountsRepr> for NeighborCounts {
    type Error = Error;

    fn try_from(repr: NeighborCountsRepr) -> Result<Self> {
        check_size(repr.rows, repr.cols)?;
        if repr.counts.len() != repr.rows * repr.cols {
            return Err(Error::InvalidPattern(format!(
                "expected {} neighbor counts for a {}x{} grid, got {}",
                repr.rows * repr.cols,
                repr.rows,
                repr.cols,
                repr.counts.len()
            )));
        }
        if let Some(count) = repr.counts.iter().find(|&&count| count > 8) {
            return Err(Error::InvalidPattern(format!(
                "neighbor count {} exceeds 8",
                count
            )));
        }
        Ok(Self {
            rows: repr.rows,
            cols: repr.cols,
            counts: repr.counts,
        })
    }
}

impl NeighborCounts {
    pub fn get(&self, row: usize, col: usize) -> Result<u8> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.counts[row * self.cols + col])
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major counts
    pub fn as_slice(&self) -> &[u8] {
        &self.counts
    }
}

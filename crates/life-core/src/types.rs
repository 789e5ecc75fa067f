//! Core type definitions for the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }

    /// Character used in the textual grid form
    pub fn to_char(self) -> char {
        match self {
            CellState::Alive => 'O',
            CellState::Dead => '.',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'O' | '#' | '*' => Some(CellState::Alive),
            '.' | '_' => Some(CellState::Dead),
            _ => None,
        }
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive {
            CellState::Alive
        } else {
            CellState::Dead
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Cell coordinates: `row` in `[0, rows)`, `col` in `[0, cols)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shift by `rows` down and `cols` right; `None` on overflow
    pub fn translate(&self, rows: usize, cols: usize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(rows)?,
            col: self.col.checked_add(cols)?,
        })
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// Direction towards one of the eight adjacent cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// `(row, col)` offset of the adjacent cell
    pub fn to_delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::NorthEast => (-1, 1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
        }
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ]
    }
}

/// How the edges of a grid behave when counting neighbors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Positions outside the grid are dead.
    #[default]
    Bounded,
    /// Opposite edges are stitched together.
    Torus,
}

impl Topology {
    /// Resolve the neighbor of `pos` in `direction` on a `rows x cols` grid.
    ///
    /// Returns `None` when the neighbor falls off a bounded grid.
    pub fn neighbor(
        self,
        pos: Position,
        direction: Direction,
        rows: usize,
        cols: usize,
    ) -> Option<Position> {
        let (dr, dc) = direction.to_delta();
        match self {
            Topology::Bounded => {
                let row = pos.row.checked_add_signed(dr)?;
                let col = pos.col.checked_add_signed(dc)?;
                (row < rows && col < cols).then_some(Position::new(row, col))
            }
            Topology::Torus => Some(Position::new(
                wrap(pos.row, dr, rows),
                wrap(pos.col, dc, cols),
            )),
        }
    }
}

fn wrap(value: usize, delta: isize, len: usize) -> usize {
    let len = len as isize;
    (((value as isize + delta) % len + len) % len) as usize
}

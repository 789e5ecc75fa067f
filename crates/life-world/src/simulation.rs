//! Simulation engine advancing a grid one generation at a time.

use crate::frame::Frame;
use crate::grid::{Grid, NeighborCounts};
use crate::seed::{PatternSeeder, RandomSeeder, Seeder};
use life_core::{CellState, Position, Result, Topology};
use tracing::{debug, info, instrument, trace};

/// Owns the authoritative current grid plus its cached derived state.
///
/// `neighbors` and `alive_count` are always recomputed from `grid` and are
/// never updated on their own.
#[derive(Debug)]
pub struct Simulator {
    grid: Grid,
    neighbors: NeighborCounts,
    generation: u64,
    alive_count: usize,
}

impl Simulator {
    /// All-dead `rows x cols` world with bounded edges
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_topology(rows, cols, Topology::Bounded)
    }

    pub fn with_topology(rows: usize, cols: usize, topology: Topology) -> Result<Self> {
        let grid = Grid::with_topology(rows, cols, topology)?;
        debug!(rows, cols, ?topology, "Created simulator");
        Ok(Self::from_grid(grid))
    }

    /// Start from an existing grid at generation 0
    pub fn from_grid(grid: Grid) -> Self {
        let neighbors = grid.neighbor_counts();
        let alive_count = grid.alive_count();
        Self {
            grid,
            neighbors,
            generation: 0,
            alive_count,
        }
    }

    /// Replace the population using `seeder`.
    ///
    /// Acts as a reset: the seeder fills a fresh all-dead grid of the current
    /// size and `generation` returns to 0. On error the previous state is kept.
    #[instrument(skip_all, fields(rows = self.grid.rows(), cols = self.grid.cols()))]
    pub fn seed<S: Seeder + ?Sized>(&mut self, seeder: &mut S) -> Result<()> {
        let (rows, cols) = self.grid.dimensions();
        let mut grid = Grid::with_topology(rows, cols, self.grid.topology())?;
        seeder.populate(&mut grid)?;

        self.replace_grid(grid);
        self.generation = 0;
        debug!(alive_count = self.alive_count, "Seeded grid");
        Ok(())
    }

    /// Random population where each cell is alive with probability `density`
    pub fn seed_density(&mut self, density: f64, rng_seed: Option<u64>) -> Result<()> {
        let mut seeder = RandomSeeder::new(density, rng_seed)?;
        self.seed(&mut seeder)
    }

    /// Population consisting of exactly `cells`
    pub fn seed_cells(&mut self, cells: &[Position]) -> Result<()> {
        let mut seeder = PatternSeeder::new(cells.iter().copied());
        self.seed(&mut seeder)
    }

    /// Advance exactly one generation and return the new grid.
    pub fn step(&mut self) -> &Grid {
        let next = evolve(&self.grid, &self.neighbors);
        let was_alive = self.alive_count > 0;

        self.replace_grid(next);
        self.generation += 1;

        trace!(
            generation = self.generation,
            alive_count = self.alive_count,
            "Advanced generation"
        );
        if was_alive && self.alive_count == 0 {
            info!(
                event = "extinction",
                generation = self.generation,
                "Population died out"
            );
        }

        &self.grid
    }

    pub fn step_n(&mut self, n: u64) -> &Grid {
        for _ in 0..n {
            self.step();
        }
        &self.grid
    }

    /// Discard the current grid for an all-dead one of the new size.
    ///
    /// Keeps the topology. Leaves the simulator untouched if the size is invalid.
    #[instrument(skip(self))]
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        let grid = Grid::with_topology(rows, cols, self.grid.topology())?;
        self.replace_grid(grid);
        self.generation = 0;
        debug!("Resized grid");
        Ok(())
    }

    pub fn current_grid(&self) -> &Grid {
        &self.grid
    }

    pub fn neighbor_counts(&self) -> &NeighborCounts {
        &self.neighbors
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn is_extinct(&self) -> bool {
        self.alive_count == 0
    }

    pub fn topology(&self) -> Topology {
        self.grid.topology()
    }

    /// Snapshot of everything a renderer needs for the current generation
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.grid, &self.neighbors, self.generation)
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.neighbors = grid.neighbor_counts();
        self.alive_count = grid.alive_count();
        self.grid = grid;
    }
}

/// Transition rule: survival on 2 or 3 neighbors, birth on exactly 3.
pub fn next_state(state: CellState, neighbors: u8) -> CellState {
    match (state, neighbors) {
        (CellState::Alive, 2 | 3) => CellState::Alive,
        (CellState::Dead, 3) => CellState::Alive,
        _ => CellState::Dead,
    }
}

/// Build the next grid purely from `grid` and its own neighbor counts.
fn evolve(grid: &Grid, neighbors: &NeighborCounts) -> Grid {
    let cells = grid
        .cells()
        .iter()
        .zip(neighbors.as_slice())
        .map(|(&state, &n)| next_state(state, n))
        .collect();

    grid.successor(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Pattern;
    use life_core::Error;
    use proptest::prelude::*;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn test_simulator_creation() {
        let sim = Simulator::new(8, 5).unwrap();
        assert_eq!(sim.current_grid().dimensions(), (8, 5));
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.alive_count(), 0);
        assert!(sim.is_extinct());
    }

    #[test]
    fn test_invalid_size_on_creation() {
        assert!(matches!(
            Simulator::new(0, 4),
            Err(Error::InvalidSize { .. })
        ));
        assert!(Simulator::new(4, 0).is_err());
    }

    #[test]
    fn test_transition_rule() {
        for n in 0..=8u8 {
            let survives = next_state(CellState::Alive, n);
            let born = next_state(CellState::Dead, n);
            assert_eq!(survives.is_alive(), n == 2 || n == 3, "alive with {}", n);
            assert_eq!(born.is_alive(), n == 3, "dead with {}", n);
        }
    }

    #[test]
    fn test_seed_does_not_advance_generation() {
        let mut sim = Simulator::new(10, 10).unwrap();
        sim.seed_density(0.5, Some(1)).unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.alive_count(), sim.current_grid().alive_count());
        assert!(sim.alive_count() > 0);
    }

    #[test]
    fn test_seed_acts_as_reset() {
        let mut sim = Simulator::new(6, 6).unwrap();
        sim.seed(&mut Pattern::Blinker.at(Position::new(2, 1))).unwrap();
        sim.step_n(3);
        assert_eq!(sim.generation(), 3);

        sim.seed_cells(&[Position::new(0, 0)]).unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.alive_count(), 1);
        assert_eq!(sim.current_grid().alive_cells().count(), 1);
    }

    #[test]
    fn test_failed_seed_keeps_previous_state() {
        let mut sim = Simulator::new(5, 5).unwrap();
        sim.seed(&mut Pattern::Block.at(Position::new(1, 1))).unwrap();
        sim.step();
        let before = sim.current_grid().clone();

        let result = sim.seed_cells(&[Position::new(0, 0), Position::new(9, 9)]);
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
        assert_eq!(sim.current_grid(), &before);
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.alive_count(), 4);

        assert!(matches!(
            sim.seed_density(2.0, None),
            Err(Error::InvalidDensity(_))
        ));
        assert_eq!(sim.current_grid(), &before);
    }

    #[test]
    fn test_block_still_life() {
        let mut sim = Simulator::new(4, 4).unwrap();
        sim.seed(&mut Pattern::Block.at(Position::new(1, 1))).unwrap();
        let start = sim.current_grid().clone();

        for generation in 1..=10 {
            assert_eq!(sim.step(), &start);
            assert_eq!(sim.generation(), generation);
            assert_eq!(sim.alive_count(), 4);
        }
    }

    #[test]
    fn test_beehive_still_life() {
        let mut sim = Simulator::new(6, 7).unwrap();
        sim.seed(&mut Pattern::Beehive.at(Position::new(1, 1))).unwrap();
        let start = sim.current_grid().clone();
        assert_eq!(sim.step_n(5), &start);
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut sim = Simulator::from_grid(grid(
            "
            .....
            .....
            .OOO.
            .....
            .....
            ",
        ));
        let horizontal = sim.current_grid().clone();
        let vertical = grid(
            "
            .....
            ..O..
            ..O..
            ..O..
            .....
            ",
        );

        assert_eq!(sim.step(), &vertical);
        assert_eq!(sim.alive_count(), 3);
        assert_eq!(sim.step(), &horizontal);
        assert_eq!(sim.generation(), 2);
        assert_eq!(sim.step(), &vertical);
    }

    #[test]
    fn test_toad_has_period_two() {
        let mut sim = Simulator::new(6, 6).unwrap();
        sim.seed(&mut Pattern::Toad.at(Position::new(2, 1))).unwrap();
        let start = sim.current_grid().clone();

        assert_ne!(sim.step(), &start);
        assert_eq!(sim.step(), &start);
    }

    #[test]
    fn test_glider_translates_diagonally() {
        let mut sim = Simulator::new(8, 8).unwrap();
        sim.seed(&mut Pattern::Glider.at(Position::new(0, 0))).unwrap();
        sim.step_n(4);

        let mut expected = Simulator::new(8, 8).unwrap();
        expected
            .seed(&mut Pattern::Glider.at(Position::new(1, 1)))
            .unwrap();
        assert_eq!(sim.current_grid(), expected.current_grid());
        assert_eq!(sim.alive_count(), 5);
    }

    #[test]
    fn test_glider_wraps_on_torus() {
        let mut sim = Simulator::with_topology(6, 6, Topology::Torus).unwrap();
        sim.seed(&mut Pattern::Glider.at(Position::new(0, 0))).unwrap();
        let start = sim.current_grid().clone();

        // One full lap: 4 generations per diagonal cell, 6 cells per side
        sim.step_n(24);
        assert_eq!(sim.current_grid(), &start);
        assert_eq!(sim.topology(), Topology::Torus);
    }

    #[test]
    fn test_isolated_corner_cell_dies() {
        for topology in [Topology::Bounded, Topology::Torus] {
            let mut sim = Simulator::with_topology(5, 5, topology).unwrap();
            sim.seed_cells(&[Position::new(0, 0)]).unwrap();
            assert!(sim.neighbor_counts().get(0, 0).unwrap() < 2);

            sim.step();
            assert_eq!(sim.alive_count(), 0);
            assert!(sim.is_extinct());
        }
    }

    #[test]
    fn test_step_reads_only_the_previous_generation() {
        // Updating in place would kill (0,2) and (1,0) before (1,1) counts them.
        let mut sim = Simulator::from_grid(grid(
            "
            .OO
            O..
            ...
            ",
        ));
        let next = sim.step().clone();
        assert_eq!(
            next,
            grid(
                "
                .O.
                .O.
                ...
                "
            )
        );
    }

    #[test]
    fn test_neighbor_counts_follow_current_grid() {
        let mut sim = Simulator::from_grid(grid(
            "
            .....
            ..O..
            ..O..
            ..O..
            .....
            ",
        ));
        assert_eq!(sim.neighbor_counts(), &sim.current_grid().neighbor_counts());
        sim.step();
        assert_eq!(sim.neighbor_counts(), &sim.current_grid().neighbor_counts());
        assert_eq!(sim.neighbor_counts().get(1, 2).unwrap(), 3);
    }

    #[test]
    fn test_resize_resets_state() {
        let mut sim = Simulator::with_topology(6, 6, Topology::Torus).unwrap();
        sim.seed_density(0.6, Some(3)).unwrap();
        sim.step_n(4);

        sim.resize(3, 9).unwrap();
        assert_eq!(sim.current_grid().dimensions(), (3, 9));
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.alive_count(), 0);
        assert_eq!(sim.topology(), Topology::Torus);
    }

    #[test]
    fn test_invalid_resize_is_transactional() {
        let mut sim = Simulator::new(6, 6).unwrap();
        sim.seed_density(0.5, Some(11)).unwrap();
        sim.step();
        let before = sim.current_grid().clone();
        let alive = sim.alive_count();

        assert!(matches!(
            sim.resize(0, 6),
            Err(Error::InvalidSize { rows: 0, cols: 6 })
        ));
        assert_eq!(sim.current_grid(), &before);
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.alive_count(), alive);
    }

    #[test]
    fn test_resize_then_empty_seed() {
        let mut sim = Simulator::new(7, 7).unwrap();
        sim.seed_density(0.5, Some(5)).unwrap();
        sim.step_n(6);

        sim.resize(12, 12).unwrap();
        sim.seed_density(0.0, None).unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.alive_count(), 0);
        assert_eq!(sim.current_grid().alive_cells().count(), 0);
    }

    #[test]
    fn test_dead_grid_keeps_stepping() {
        let mut sim = Simulator::new(3, 3).unwrap();
        sim.step_n(5);
        assert_eq!(sim.generation(), 5);
        assert!(sim.is_extinct());
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        let topology = prop_oneof![Just(Topology::Bounded), Just(Topology::Torus)];
        (1usize..12, 1usize..12, topology).prop_flat_map(|(rows, cols, topology)| {
            prop::collection::vec(any::<bool>(), rows * cols).prop_map(move |alive| {
                let cells = alive.into_iter().map(CellState::from).collect();
                Grid::from_cells(rows, cols, topology, cells).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_alive_count_matches_brute_force(grid in arb_grid()) {
            let (rows, cols) = grid.dimensions();
            let mut expected = 0;
            for row in 0..rows {
                for col in 0..cols {
                    let n = grid.neighbor_count(row, col).unwrap();
                    if next_state(grid.get(row, col).unwrap(), n).is_alive() {
                        expected += 1;
                    }
                }
            }

            let mut sim = Simulator::from_grid(grid);
            let next = sim.step().clone();
            prop_assert_eq!(sim.alive_count(), expected);
            prop_assert_eq!(next.alive_count(), expected);
            prop_assert_eq!(sim.generation(), 1);
        }

        #[test]
        fn prop_dead_grid_is_fixed_point(rows in 1usize..20, cols in 1usize..20) {
            let mut sim = Simulator::new(rows, cols).unwrap();
            let next = sim.step().clone();
            prop_assert_eq!(next.alive_count(), 0);
            prop_assert_eq!(sim.alive_count(), 0);
        }

        #[test]
        fn prop_step_is_deterministic(grid in arb_grid()) {
            let cells: Vec<Position> = grid.alive_cells().collect();
            let (rows, cols) = grid.dimensions();

            let mut a = Simulator::with_topology(rows, cols, grid.topology()).unwrap();
            let mut b = Simulator::with_topology(rows, cols, grid.topology()).unwrap();
            a.seed_cells(&cells).unwrap();
            b.seed_cells(&cells).unwrap();
            a.step_n(2);
            b.step_n(2);

            prop_assert_eq!(a.current_grid(), b.current_grid());
            prop_assert_eq!(a.alive_count(), b.alive_count());
            prop_assert_eq!(a.generation(), b.generation());
        }
    }
}

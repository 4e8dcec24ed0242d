use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::{Body, Cell};
use crate::config::GridSize;

/// Random samples tried before falling back to enumerating free cells.
pub const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Chooses where the next food goes.
pub trait FoodPlacer {
    /// Returns a cell inside `grid` that `forbidden` does not occupy, or `None`
    /// when the body covers the whole grid.
    fn place(&mut self, grid: GridSize, forbidden: &Body) -> Option<Cell>;
}

/// Uniform placement by rejection sampling.
#[derive(Debug, Clone)]
pub struct RandomPlacer<R> {
    rng: R,
}

impl<R: Rng> RandomPlacer<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPlacer<StdRng> {
    /// Creates a deterministic placer for tests and reproducible simulations.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Creates a placer seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> FoodPlacer for RandomPlacer<R> {
    fn place(&mut self, grid: GridSize, forbidden: &Body) -> Option<Cell> {
        if forbidden.len() >= grid.total_cells() {
            return None;
        }

        let upper = i32::from(grid.cells);
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let candidate = Cell::new(self.rng.gen_range(0..upper), self.rng.gen_range(0..upper));
            if !forbidden.occupies(candidate) {
                return Some(candidate);
            }
        }

        // Crowded board: pick uniformly among what is left.
        let free = free_cells(grid, forbidden);
        if free.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..free.len());
        Some(free[index])
    }
}

/// Placement from a fixed list of cells, for scripted scenarios.
///
/// Cells the body currently covers are skipped. Once the list runs out the
/// first free cell in row-major order is used.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlacer {
    cells: VecDeque<Cell>,
}

impl ScriptedPlacer {
    #[must_use]
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }
}

impl FoodPlacer for ScriptedPlacer {
    fn place(&mut self, grid: GridSize, forbidden: &Body) -> Option<Cell> {
        while let Some(cell) = self.cells.pop_front() {
            if grid.contains(cell) && !forbidden.occupies(cell) {
                return Some(cell);
            }
            log::debug!("scripted food cell ({}, {}) unusable, skipping", cell.x, cell.y);
        }

        free_cells(grid, forbidden).into_iter().next()
    }
}

/// Lists every grid cell the body does not occupy, row-major.
#[must_use]
pub fn free_cells(grid: GridSize, forbidden: &Body) -> Vec<Cell> {
    let upper = i32::from(grid.cells);
    let mut free = Vec::with_capacity(grid.total_cells().saturating_sub(forbidden.len()));

    for y in 0..upper {
        for x in 0..upper {
            let cell = Cell::new(x, y);
            if !forbidden.occupies(cell) {
                free.push(cell);
            }
        }
    }

    free
}

//! Alive/dead snapshot of a grid, the form boards take between engines and
//! the text codec.

use rand::{RngCore, SeedableRng};

use crate::topology::Grid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    /// One byte per cell, 0 = dead, 1 = alive.
    cells: Vec<u8>,
}

impl Board {
    pub fn empty(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![0; grid.total()],
        }
    }

    /// Board with exactly the cells at the given flat indices alive.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= grid.total()`.
    pub fn from_alive_indices<I>(grid: Grid, alive: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut board = Self::empty(grid);
        for idx in alive {
            board.cells[idx] = 1;
        }
        board
    }

    /// Seeded random board; each cell is alive with probability `density`.
    pub fn random(grid: Grid, density: f64, seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let threshold = (u64::MAX as f64 * density.clamp(0.0, 1.0)) as u64;
        let cells = (0..grid.total())
            .map(|_| (rng.next_u64() < threshold) as u8)
            .collect();
        Self { grid, cells }
    }

    /// Build from raw state bytes; any non-zero byte counts as alive.
    pub(crate) fn from_states(grid: Grid, states: &[u8]) -> Self {
        debug_assert_eq!(states.len(), grid.total());
        Self {
            grid,
            cells: states.iter().map(|&s| (s != 0) as u8).collect(),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.grid.index(x, y)] != 0
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        let idx = self.grid.index(x, y);
        self.cells[idx] = alive as u8;
    }

    pub fn population(&self) -> u64 {
        self.cells.iter().map(|&c| c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    pub fn alive_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| (c != 0).then_some(i))
    }

    /// Live-neighbour count of every cell, computed from scratch.
    pub fn neighbor_counts(&self) -> Vec<u8> {
        let w = self.grid.width();
        let mut counts = vec![0u8; self.grid.total()];
        for (i, count) in counts.iter_mut().enumerate() {
            let indices = self.grid.neighbor_indices(i % w, i / w);
            *count = indices.iter().map(|&n| self.cells[n]).sum();
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::topology::Grid;

    #[test]
    fn alive_indices_round_trip() {
        let grid = Grid::new(4, 3).unwrap();
        let board = Board::from_alive_indices(grid, [0, 5, 11]);
        assert_eq!(board.alive_indices().collect::<Vec<_>>(), [0, 5, 11]);
        assert!(board.get(1, 1));
        assert_eq!(board.population(), 3);
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        let grid = Grid::new(4, 3).unwrap();
        let _ = Board::from_alive_indices(grid, [12]);
    }
}

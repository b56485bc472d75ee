//! Differential update: only cells whose rule fires are written, and each
//! write patches the stored counts of the eight neighbours on the spot.

use super::cell::Cell;
use crate::board::Board;
use crate::rules::next_alive;
use crate::topology::Grid;

/// Sequential engine over packed [`Cell`] bytes.
///
/// Every stored neighbour count equals the true number of live neighbours
/// at all times. The only write path is the private toggle, which flips the
/// state bit and moves the eight neighbour counts in the same call; callers
/// must mutate the board through [`SequentialLife::set_cell`] and never by
/// editing cell bytes, since a stale count cannot be detected afterwards.
pub struct SequentialLife {
    grid: Grid,
    cells: Vec<Cell>,
    /// Read source for the current generation. Allocated once.
    snapshot: Vec<Cell>,
    generation: u64,
}

impl SequentialLife {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![Cell::DEAD; grid.total()],
            snapshot: vec![Cell::DEAD; grid.total()],
            generation: 0,
        }
    }

    pub fn from_board(board: &Board) -> Self {
        let mut engine = Self::new(board.grid());
        let w = board.grid().width();
        for idx in board.alive_indices() {
            engine.toggle(idx % w, idx / w);
        }
        engine
    }

    #[inline(always)]
    fn toggle(&mut self, x: usize, y: usize) {
        let idx = self.grid.index(x, y);
        let cell = self.cells[idx].toggled();
        self.cells[idx] = cell;

        let born = cell.is_alive();
        for n in self.grid.neighbor_indices(x, y) {
            self.cells[n] = self.cells[n].with_neighbor(born);
        }
    }

    pub fn set_cell(&mut self, x: usize, y: usize, alive: bool) {
        if self.is_alive(x, y) != alive {
            self.toggle(x, y);
        }
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells[self.grid.index(x, y)].is_alive()
    }

    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        self.cells[self.grid.index(x, y)].neighbor_count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn step(&mut self) {
        self.snapshot.copy_from_slice(&self.cells);

        let w = self.grid.width();
        for y in 0..self.grid.height() {
            let row = y * w;
            for x in 0..w {
                let cell = self.snapshot[row + x];
                let alive = cell.is_alive();
                if next_alive(alive, cell.neighbor_count()) != alive {
                    self.toggle(x, y);
                }
            }
        }

        self.generation += 1;
    }

    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|c| c.is_alive()).count() as u64
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn to_board(&self) -> Board {
        Board::from_alive_indices(
            self.grid,
            self.cells
                .iter()
                .enumerate()
                .filter_map(|(i, c)| c.is_alive().then_some(i)),
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};

    use super::SequentialLife;
    use crate::board::Board;
    use crate::topology::Grid;

    fn assert_counts_consistent(engine: &SequentialLife) {
        let expected = engine.to_board().neighbor_counts();
        for (i, (cell, want)) in engine.cells().iter().zip(&expected).enumerate() {
            assert_eq!(
                cell.neighbor_count(),
                *want,
                "stored count drifted at index {i} (generation {})",
                engine.generation()
            );
        }
    }

    #[test]
    fn toggle_updates_all_eight_neighbors() {
        let grid = Grid::new(5, 5).unwrap();
        let mut engine = SequentialLife::new(grid);
        engine.set_cell(0, 0, true);

        for (x, y) in [(4, 4), (0, 4), (1, 4), (4, 0), (1, 0), (4, 1), (0, 1), (1, 1)] {
            assert_eq!(engine.neighbor_count(x, y), 1, "({x},{y})");
        }
        assert_eq!(engine.neighbor_count(0, 0), 0);
        assert_eq!(engine.neighbor_count(2, 2), 0);

        engine.set_cell(0, 0, false);
        assert!(engine.cells().iter().all(|c| c.0 == 0));
    }

    #[test]
    fn set_cell_is_idempotent() {
        let grid = Grid::new(4, 4).unwrap();
        let mut engine = SequentialLife::new(grid);
        engine.set_cell(2, 1, true);
        engine.set_cell(2, 1, true);
        assert_eq!(engine.neighbor_count(1, 1), 1);
        assert_eq!(engine.population(), 1);
    }

    #[test]
    fn stored_counts_track_random_evolution() {
        let grid = Grid::new(23, 17).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5E0_CE11);
        let mut board = Board::empty(grid);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if rng.random::<f64>() < 0.35 {
                    board.set(x, y, true);
                }
            }
        }

        let mut engine = SequentialLife::from_board(&board);
        assert_counts_consistent(&engine);
        for _ in 0..12 {
            engine.step();
            assert_counts_consistent(&engine);
        }
    }

    #[test]
    fn tiny_grids_keep_counts_consistent() {
        for (w, h) in [(1, 1), (1, 3), (2, 2), (3, 1)] {
            let grid = Grid::new(w, h).unwrap();
            let mut engine = SequentialLife::new(grid);
            engine.set_cell(0, 0, true);
            assert_counts_consistent(&engine);
            engine.step_n(3);
            assert_counts_consistent(&engine);
        }
    }
}

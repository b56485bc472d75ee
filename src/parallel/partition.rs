//! Work decomposition for the recompute engine.
//!
//! The count pass splits the grid into contiguous row bands, the apply pass
//! into contiguous flat-index ranges. Both are plain `chunks_mut` splits, so
//! no two tasks ever write the same index.

use crate::topology::Grid;

/// Tasks handed to each worker per phase; a little oversubscription keeps
/// workers busy when rows finish unevenly.
const TASKS_PER_WORKER: usize = 4;
const MIN_CELLS_PER_TASK: usize = 4_096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    rows_per_task: usize,
    cells_per_task: usize,
}

impl Partition {
    /// Derive chunk sizes for `workers` threads. An explicit `rows_per_task`
    /// fixes the granularity of both phases.
    pub fn new(grid: Grid, workers: usize, rows_per_task: Option<usize>) -> Self {
        let height = grid.height();
        let width = grid.width();
        let workers = workers.max(1);

        match rows_per_task {
            Some(rows) => {
                let rows = rows.clamp(1, height);
                Self {
                    rows_per_task: rows,
                    cells_per_task: rows * width,
                }
            }
            None => {
                let tasks = workers * TASKS_PER_WORKER;
                let min_rows = MIN_CELLS_PER_TASK.div_ceil(width);
                let rows = height.div_ceil(tasks).max(min_rows).min(height);
                let cells = grid
                    .total()
                    .div_ceil(tasks)
                    .max(MIN_CELLS_PER_TASK)
                    .min(grid.total());
                Self {
                    rows_per_task: rows,
                    cells_per_task: cells,
                }
            }
        }
    }

    #[inline]
    pub fn rows_per_task(&self) -> usize {
        self.rows_per_task
    }

    #[inline]
    pub fn cells_per_task(&self) -> usize {
        self.cells_per_task
    }

    /// Number of row bands the count pass is split into.
    pub fn row_tasks(&self, grid: Grid) -> usize {
        grid.height().div_ceil(self.rows_per_task)
    }
}

#[cfg(test)]
mod tests {
    use super::{MIN_CELLS_PER_TASK, Partition};
    use crate::topology::Grid;

    #[test]
    fn explicit_granularity_is_clamped_to_grid() {
        let grid = Grid::new(10, 7).unwrap();
        let p = Partition::new(grid, 4, Some(100));
        assert_eq!(p.rows_per_task(), 7);
        assert_eq!(p.cells_per_task(), 70);
        assert_eq!(p.row_tasks(grid), 1);

        let p = Partition::new(grid, 4, Some(0));
        assert_eq!(p.rows_per_task(), 1);
        assert_eq!(p.row_tasks(grid), 7);
    }

    #[test]
    fn auto_partition_covers_large_grids() {
        let grid = Grid::new(4_096, 4_096).unwrap();
        let p = Partition::new(grid, 8, None);
        assert_eq!(p.row_tasks(grid), 32);
        assert!(p.cells_per_task() >= MIN_CELLS_PER_TASK);
        assert!(p.cells_per_task() * 32 >= grid.total());
    }

    #[test]
    fn small_grids_collapse_to_one_task() {
        let grid = Grid::new(8, 8).unwrap();
        let p = Partition::new(grid, 64, None);
        assert_eq!(p.rows_per_task(), 8);
        assert_eq!(p.cells_per_task(), 64);
    }
}

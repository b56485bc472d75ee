use rayon::prelude::*;
use std::sync::OnceLock;

use super::partition::Partition;
use crate::board::Board;
use crate::error::Result;
use crate::rules::RULE_TABLE;
use crate::topology::Grid;

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

/// Both passes stream whole rows, so past eight cores extra threads mostly
/// fight over memory bandwidth.
#[inline]
fn auto_pool_thread_count_for_physical(physical: usize) -> usize {
    let physical = physical.max(1);
    if physical <= 8 {
        physical
    } else {
        physical.div_ceil(2).max(8)
    }
}

/// Resolve the thread count from a config, falling back to auto-detect.
fn resolve_thread_count(config: &RecomputeConfig) -> usize {
    let mut threads = config
        .thread_count
        .unwrap_or_else(|| auto_pool_thread_count_for_physical(physical_core_count()));
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

/// Configuration for a [`RecomputeLife`] engine instance.
///
/// `RecomputeConfig::default()` sizes the pool from the physical core count
/// and picks the partition granularity automatically.
#[derive(Clone, Debug, Default)]
pub struct RecomputeConfig {
    /// Number of worker threads. `None` means auto-detect.
    pub thread_count: Option<usize>,
    /// Hard upper bound on threads regardless of auto-detection.
    pub max_threads: Option<usize>,
    /// Rows per task in the count pass (and `rows * width` cells per task in
    /// the apply pass). `None` derives it from the worker count.
    pub rows_per_task: Option<usize>,
}

impl RecomputeConfig {
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    pub fn rows_per_task(mut self, n: usize) -> Self {
        self.rows_per_task = Some(n.max(1));
        self
    }
}

/// Full-recompute engine.
///
/// Each generation runs two fork-join passes on a dedicated rayon pool:
/// the count pass fills `counts` from `state`, then the apply pass rewrites
/// `state` in place from `(state, counts)`. The join closing the count pass
/// is the barrier; the apply pass never starts before every count is final.
pub struct RecomputeLife {
    grid: Grid,
    /// 0 = dead, 1 = alive.
    state: Vec<u8>,
    counts: Vec<u8>,
    pool: rayon::ThreadPool,
    threads: usize,
    partition: Partition,
    generation: u64,
}

impl RecomputeLife {
    pub fn new(board: &Board) -> Result<Self> {
        Self::with_config(board, RecomputeConfig::default())
    }

    pub fn with_config(board: &Board, config: RecomputeConfig) -> Result<Self> {
        let grid = board.grid();
        let threads = resolve_thread_count(&config);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("life-worker-{i}"))
            .build()?;
        let partition = Partition::new(grid, threads, config.rows_per_task);

        tracing::debug!(
            threads,
            row_tasks = partition.row_tasks(grid),
            rows_per_task = partition.rows_per_task(),
            cells_per_task = partition.cells_per_task(),
            "recompute engine ready"
        );

        Ok(Self {
            grid,
            state: board.cells().to_vec(),
            counts: vec![0; grid.total()],
            pool,
            threads,
            partition,
            generation: 0,
        })
    }

    pub fn step(&mut self) {
        self.step_n(1);
    }

    pub fn step_n(&mut self, n: u64) {
        let Self {
            grid,
            state,
            counts,
            pool,
            partition,
            ..
        } = self;
        pool.install(|| {
            for _ in 0..n {
                count_neighbors(*grid, state, counts, partition.rows_per_task());
                apply_rule(state, counts, partition.cells_per_task());
            }
        });
        self.generation += n;
    }

    /// Neighbour counts produced by the most recent count pass.
    pub fn neighbor_counts(&self) -> &[u8] {
        &self.counts
    }

    pub fn population(&self) -> u64 {
        self.state.par_iter().map(|&s| s as u64).sum()
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn thread_count(&self) -> usize {
        self.threads
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn to_board(&self) -> Board {
        Board::from_states(self.grid, &self.state)
    }
}

/// Count pass. Each task owns a band of `rows_per_task` rows of `counts`.
fn count_neighbors(grid: Grid, state: &[u8], counts: &mut [u8], rows_per_task: usize) {
    let w = grid.width();
    counts
        .par_chunks_mut(rows_per_task * w)
        .enumerate()
        .for_each(|(task, band)| {
            let first_row = task * rows_per_task;
            for (r, out) in band.chunks_exact_mut(w).enumerate() {
                count_row(grid, state, first_row + r, out);
            }
        });
}

#[inline(always)]
fn count_row(grid: Grid, state: &[u8], y: usize, out: &mut [u8]) {
    let w = grid.width();
    let h = grid.height();
    let above = &state[((y + h - 1) % h) * w..][..w];
    let row = &state[y * w..][..w];
    let below = &state[((y + 1) % h) * w..][..w];

    // Interior columns: no wraparound.
    for x in 1..w.saturating_sub(1) {
        out[x] = above[x - 1]
            + above[x]
            + above[x + 1]
            + row[x - 1]
            + row[x + 1]
            + below[x - 1]
            + below[x]
            + below[x + 1];
    }

    let edges: &[usize] = if w == 1 { &[0] } else { &[0, w - 1] };
    for &x in edges {
        let l = if x == 0 { w - 1 } else { x - 1 };
        let r = if x == w - 1 { 0 } else { x + 1 };
        out[x] = above[l] + above[x] + above[r] + row[l] + row[r] + below[l] + below[x] + below[r];
    }
}

/// Apply pass. Reads only the finished counts and the cell's own state.
fn apply_rule(state: &mut [u8], counts: &[u8], cells_per_task: usize) {
    state
        .par_chunks_mut(cells_per_task)
        .zip(counts.par_chunks(cells_per_task))
        .for_each(|(states, counts)| {
            for (s, &c) in states.iter_mut().zip(counts) {
                *s = RULE_TABLE.lookup(*s, c);
            }
        });
}

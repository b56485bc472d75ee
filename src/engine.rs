//! Engine selection and the interface every engine exposes to the driver.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::error::{LifeError, Result};
use crate::offload::{ComputeDevice, DeviceSelector, OffloadLife};
use crate::parallel::{RecomputeConfig, RecomputeLife};
use crate::sequential::SequentialLife;
use crate::topology::Grid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EngineKind {
    #[default]
    Sequential,
    Parallel,
    Offload,
}

impl EngineKind {
    pub const ALL: [EngineKind; 3] = [
        EngineKind::Sequential,
        EngineKind::Parallel,
        EngineKind::Offload,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EngineKind::Sequential => "seq",
            EngineKind::Parallel => "omp",
            EngineKind::Offload => "ocl",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "seq" | "sequential" => Ok(EngineKind::Sequential),
            "omp" | "parallel" => Ok(EngineKind::Parallel),
            "ocl" | "offload" | "gpu" => Ok(EngineKind::Offload),
            other => Err(LifeError::InvalidArgument(format!(
                "unknown mode: {other} (expected seq, omp, or ocl)"
            ))),
        }
    }
}

/// Engine-specific knobs. Each engine reads only its own fields.
#[derive(Clone, Debug, Default)]
pub struct EngineOptions {
    /// Parallel engine worker count; `None` = auto.
    pub threads: Option<usize>,
    pub max_threads: Option<usize>,
    /// Parallel engine partition granularity; `None` = auto.
    pub rows_per_task: Option<usize>,
    /// Offload engine device.
    pub device: DeviceSelector,
}

impl EngineOptions {
    pub fn recompute_config(&self) -> RecomputeConfig {
        RecomputeConfig {
            thread_count: self.threads,
            max_threads: self.max_threads,
            rows_per_task: self.rows_per_task,
        }
    }
}

/// One simulation strategy. Every implementation produces the same alive
/// pattern for the same input board and generation count.
pub trait LifeEngine {
    fn kind(&self) -> EngineKind;

    fn grid(&self) -> Grid;

    /// Generations completed so far.
    fn generation(&self) -> u64;

    fn step(&mut self) -> Result<()>;

    fn step_n(&mut self, n: u64) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Current alive pattern. May copy from device memory.
    fn board(&mut self) -> Result<Board>;
}

impl LifeEngine for SequentialLife {
    fn kind(&self) -> EngineKind {
        EngineKind::Sequential
    }

    fn grid(&self) -> Grid {
        SequentialLife::grid(self)
    }

    fn generation(&self) -> u64 {
        SequentialLife::generation(self)
    }

    fn step(&mut self) -> Result<()> {
        SequentialLife::step(self);
        Ok(())
    }

    fn step_n(&mut self, n: u64) -> Result<()> {
        SequentialLife::step_n(self, n);
        Ok(())
    }

    fn board(&mut self) -> Result<Board> {
        Ok(self.to_board())
    }
}

impl LifeEngine for RecomputeLife {
    fn kind(&self) -> EngineKind {
        EngineKind::Parallel
    }

    fn grid(&self) -> Grid {
        RecomputeLife::grid(self)
    }

    fn generation(&self) -> u64 {
        RecomputeLife::generation(self)
    }

    fn step(&mut self) -> Result<()> {
        RecomputeLife::step(self);
        Ok(())
    }

    fn step_n(&mut self, n: u64) -> Result<()> {
        RecomputeLife::step_n(self, n);
        Ok(())
    }

    fn board(&mut self) -> Result<Board> {
        Ok(self.to_board())
    }
}

impl<D: ComputeDevice> LifeEngine for OffloadLife<D> {
    fn kind(&self) -> EngineKind {
        EngineKind::Offload
    }

    fn grid(&self) -> Grid {
        OffloadLife::grid(self)
    }

    fn generation(&self) -> u64 {
        OffloadLife::generation(self)
    }

    fn step(&mut self) -> Result<()> {
        OffloadLife::step(self)
    }

    fn board(&mut self) -> Result<Board> {
        self.read_board()
    }
}

/// Set up the engine for `kind` on `board`.
pub fn build_engine(
    kind: EngineKind,
    board: &Board,
    options: &EngineOptions,
) -> Result<Box<dyn LifeEngine>> {
    match kind {
        EngineKind::Sequential => Ok(Box::new(SequentialLife::from_board(board))),
        EngineKind::Parallel => Ok(Box::new(RecomputeLife::with_config(
            board,
            options.recompute_config(),
        )?)),
        EngineKind::Offload => build_offload(board, options.device),
    }
}

#[cfg(feature = "offload")]
fn build_offload(board: &Board, selector: DeviceSelector) -> Result<Box<dyn LifeEngine>> {
    let device = crate::offload::WgpuDevice::open(selector)?;
    Ok(Box::new(OffloadLife::new(device, board)?))
}

#[cfg(not(feature = "offload"))]
fn build_offload(_board: &Board, _selector: DeviceSelector) -> Result<Box<dyn LifeEngine>> {
    Err(LifeError::DeviceUnavailable(
        "built without the `offload` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{EngineKind, EngineOptions, build_engine};
    use crate::board::Board;
    use crate::topology::Grid;

    #[test]
    fn mode_names_parse() {
        assert_eq!("seq".parse::<EngineKind>().unwrap(), EngineKind::Sequential);
        assert_eq!("OMP".parse::<EngineKind>().unwrap(), EngineKind::Parallel);
        assert_eq!("ocl".parse::<EngineKind>().unwrap(), EngineKind::Offload);
        assert!("cuda".parse::<EngineKind>().is_err());
        for kind in EngineKind::ALL {
            assert_eq!(kind.to_string().parse::<EngineKind>().unwrap(), kind);
        }
    }

    #[test]
    fn host_engines_build_and_report_kind() {
        let board = Board::empty(Grid::new(5, 5).unwrap());
        let options = EngineOptions {
            threads: Some(2),
            ..Default::default()
        };
        for kind in [EngineKind::Sequential, EngineKind::Parallel] {
            let mut engine = build_engine(kind, &board, &options).unwrap();
            assert_eq!(engine.kind(), kind);
            engine.step_n(3).unwrap();
            assert_eq!(engine.generation(), 3);
            assert!(engine.board().unwrap().is_empty());
        }
    }
}

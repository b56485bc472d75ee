//! Load, evolve, save: the three timed phases of a run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::board::Board;
use crate::codec;
use crate::config::RunConfig;
use crate::engine::{EngineKind, LifeEngine, build_engine};
use crate::error::Result;
use crate::timing::{Phase, PhaseTimer};

/// Cooperative cancel flag, checked between generations only.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub engine: EngineKind,
    /// Generations actually completed.
    pub generations: u64,
    pub interrupted: bool,
    pub board: Board,
}

/// Run `generations` steps on `engine`, stopping early if `interrupt` is
/// raised. Returns the number of completed generations.
///
/// Steps one generation at a time so the interrupt is seen between any two
/// generations. Engines that batch work in `step_n` (the recompute engine
/// enters its pool once per call) pay that entry cost per generation here.
pub fn evolve(engine: &mut dyn LifeEngine, generations: u64, interrupt: &Interrupt) -> Result<u64> {
    for done in 0..generations {
        if interrupt.is_raised() {
            tracing::warn!(completed = done, requested = generations, "run interrupted");
            return Ok(done);
        }
        engine.step()?;
    }
    Ok(generations)
}

/// Execute one full run described by `config`.
///
/// Errors abort the run in the phase where they occur. Nothing is rolled
/// back; a failed save simply loses the evolved board.
pub fn run(
    config: &RunConfig,
    timer: &mut dyn PhaseTimer,
    interrupt: &Interrupt,
) -> Result<RunReport> {
    tracing::info!(mode = %config.engine, generations = config.generations, "running");

    timer.start(Phase::Setup);
    let initial = codec::load(&config.load_path, config.header_policy)?;
    let mut engine = build_engine(config.engine, &initial, &config.engine_options)?;
    drop(initial);
    timer.stop(Phase::Setup);

    timer.start(Phase::Computation);
    let completed = evolve(engine.as_mut(), config.generations, interrupt)?;
    let board = engine.board()?;
    timer.stop(Phase::Computation);
    drop(engine);

    timer.start(Phase::Finalization);
    codec::save(&config.save_path, &board, config.render_mode)?;
    timer.stop(Phase::Finalization);

    Ok(RunReport {
        engine: config.engine,
        generations: completed,
        interrupted: completed < config.generations,
        board,
    })
}

#[cfg(test)]
mod tests {
    use super::{Interrupt, evolve};
    use crate::board::Board;
    use crate::engine::{EngineKind, LifeEngine};
    use crate::error::Result;
    use crate::topology::Grid;

    /// Raises the interrupt once it has completed `stop_after` generations.
    struct StopAfter {
        grid: Grid,
        generation: u64,
        stop_after: u64,
        interrupt: Interrupt,
    }

    impl LifeEngine for StopAfter {
        fn kind(&self) -> EngineKind {
            EngineKind::Sequential
        }

        fn grid(&self) -> Grid {
            self.grid
        }

        fn generation(&self) -> u64 {
            self.generation
        }

        fn step(&mut self) -> Result<()> {
            self.generation += 1;
            if self.generation == self.stop_after {
                self.interrupt.raise();
            }
            Ok(())
        }

        fn board(&mut self) -> Result<Board> {
            Ok(Board::empty(self.grid))
        }
    }

    #[test]
    fn interrupt_is_checked_between_every_generation() {
        let interrupt = Interrupt::new();
        let mut engine = StopAfter {
            grid: Grid::new(2, 2).unwrap(),
            generation: 0,
            stop_after: 3,
            interrupt: interrupt.clone(),
        };
        assert_eq!(evolve(&mut engine, 10, &interrupt).unwrap(), 3);
        assert_eq!(engine.generation(), 3);
    }

    #[test]
    fn quiet_run_completes_every_generation() {
        let interrupt = Interrupt::new();
        let mut engine = StopAfter {
            grid: Grid::new(2, 2).unwrap(),
            generation: 0,
            stop_after: 0,
            interrupt: interrupt.clone(),
        };
        assert_eq!(evolve(&mut engine, 7, &interrupt).unwrap(), 7);
        assert!(!interrupt.is_raised());
    }
}

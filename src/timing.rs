//! Phase timing hooks. The run driver reports, callers decide what to print.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Computation,
    Finalization,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Setup, Phase::Computation, Phase::Finalization];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Computation => "computation",
            Phase::Finalization => "finalization",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait PhaseTimer {
    fn start(&mut self, phase: Phase);
    fn stop(&mut self, phase: Phase);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTiming;

impl PhaseTimer for NoTiming {
    fn start(&mut self, _phase: Phase) {}
    fn stop(&mut self, _phase: Phase) {}
}

/// Wall-clock timer; repeated start/stop pairs accumulate.
#[derive(Clone, Debug, Default)]
pub struct Timing {
    started: [Option<Instant>; 3],
    elapsed: [Duration; 3],
}

impl Timing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self, phase: Phase) -> Duration {
        self.elapsed[phase.slot()]
    }

    /// `(phase, duration)` for every phase, in run order.
    pub fn durations(&self) -> [(Phase, Duration); 3] {
        Phase::ALL.map(|phase| (phase, self.elapsed(phase)))
    }
}

impl PhaseTimer for Timing {
    fn start(&mut self, phase: Phase) {
        self.started[phase.slot()] = Some(Instant::now());
    }

    fn stop(&mut self, phase: Phase) {
        if let Some(start) = self.started[phase.slot()].take() {
            self.elapsed[phase.slot()] += start.elapsed();
        }
    }
}

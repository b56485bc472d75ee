//! Multi-threaded full-recompute engine.

mod engine;
mod partition;

pub use engine::{RecomputeConfig, RecomputeLife};
pub use partition::Partition;

//! Single-threaded differential engine.

mod cell;
mod engine;

pub use cell::Cell;
pub use engine::SequentialLife;

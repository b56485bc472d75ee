//! Conway's Game of Life (B3/S23) on a fixed-size toroidal grid, with three
//! interchangeable engines: sequential differential, multi-threaded full
//! recompute, and GPU-offloaded double buffering.

pub mod board;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod offload;
pub mod parallel;
pub mod rules;
pub mod sequential;
pub mod simulation;
pub mod timing;
pub mod topology;

pub use board::Board;
pub use config::RunConfig;
pub use engine::{EngineKind, EngineOptions, LifeEngine, build_engine};
pub use error::{LifeError, Result};
pub use offload::{ComputeDevice, DeviceSelector, OffloadLife};
pub use parallel::{RecomputeConfig, RecomputeLife};
pub use sequential::SequentialLife;
pub use simulation::{Interrupt, RunReport, run};
pub use topology::Grid;

//! Error type shared by the codec, the engines and the run driver.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifeError>;

#[derive(Debug, Error)]
pub enum LifeError {
    #[error("cannot open input {path:?}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header {line:?}: expected `<width>,<height>`")]
    MalformedHeader { line: String },

    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("cannot open output {path:?}: {source}")]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("compute device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("kernel build failed: {0}")]
    KernelBuildFailure(String),

    #[error("compute dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("device readback failed: {0}")]
    Readback(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

//! Run configuration consumed by [`crate::simulation::run`].

use std::path::PathBuf;

use crate::codec::{HeaderPolicy, RenderMode};
use crate::engine::{EngineKind, EngineOptions};

pub const DEFAULT_GENERATIONS: u64 = 250;

/// Everything one run needs. Built up front, read-only afterwards.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub load_path: PathBuf,
    pub save_path: PathBuf,
    pub generations: u64,
    pub engine: EngineKind,
    pub engine_options: EngineOptions,
    pub header_policy: HeaderPolicy,
    pub render_mode: RenderMode,
}

impl RunConfig {
    pub fn new(load_path: impl Into<PathBuf>, save_path: impl Into<PathBuf>) -> Self {
        Self {
            load_path: load_path.into(),
            save_path: save_path.into(),
            generations: DEFAULT_GENERATIONS,
            engine: EngineKind::default(),
            engine_options: EngineOptions::default(),
            header_policy: HeaderPolicy::default(),
            render_mode: RenderMode::default(),
        }
    }

    pub fn generations(mut self, n: u64) -> Self {
        self.generations = n;
        self
    }

    pub fn engine(mut self, kind: EngineKind) -> Self {
        self.engine = kind;
        self
    }

    pub fn threads(mut self, n: usize) -> Self {
        self.engine_options.threads = Some(n.max(1));
        self
    }

    pub fn rows_per_task(mut self, n: usize) -> Self {
        self.engine_options.rows_per_task = Some(n.max(1));
        self
    }

    pub fn platform(mut self, index: usize) -> Self {
        self.engine_options.device.platform = index;
        self
    }

    pub fn device(mut self, index: usize) -> Self {
        self.engine_options.device.device = index;
        self
    }

    pub fn header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }
}

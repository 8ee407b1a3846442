use thiserror::Error;

/// Errors originating from the rendering engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid worker count: {0} (must be >= 1)")]
    InvalidWorkerCount(usize),

    #[error("output height {height} is not divisible by worker count {workers}")]
    UnevenTiling { height: u32, workers: usize },

    #[error("worker pool is shut down")]
    PoolClosed,

    #[error("frame export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Core(#[from] fractalglide_core::CoreError),
}

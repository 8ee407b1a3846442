pub mod error;
pub mod kernel;
pub mod params;
pub mod resolution;
pub mod stats;
pub mod task;
pub mod tile;
pub mod viewport;

// Re-export primary types for convenience.
pub use error::CoreError;
pub use kernel::{ComputeKernel, KernelError};
pub use params::{ColorMode, ColorParams, FractalKind, FractalParams, IterationBound};
pub use resolution::Resolution;
pub use stats::WorkerStat;
pub use task::RenderTask;
pub use tile::{partition_bands, Tile};
pub use viewport::Viewport;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;

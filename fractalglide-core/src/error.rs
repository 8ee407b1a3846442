use thiserror::Error;

use crate::params::IterationBound;

/// Errors originating from the core types.
///
/// Everything here is a configuration error: it fires at construction or
/// strict-setter time, never during steady-state rendering.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid resolution: {reason}")]
    InvalidResolution { reason: String },

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error(
        "iteration bound {0} out of range [{min}, {max}]",
        min = IterationBound::MIN,
        max = IterationBound::MAX
    )]
    IterationBoundOutOfRange(u32),

    #[error("invalid band count: {0} (must be >= 1)")]
    InvalidBandCount(u32),
}

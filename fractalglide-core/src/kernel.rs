use thiserror::Error;

use crate::task::RenderTask;

/// A kernel implementation failed to produce a usable buffer.
///
/// Always scoped to a single task: the engine logs it, keeps the previously
/// drawn band, and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("compute kernel failed: {0}")]
pub struct KernelError(String);

impl KernelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The escape-time compute primitive, treated as an external collaborator.
///
/// Implementations must be pure with respect to the caller's state: the task
/// snapshot is the only input, and the returned buffer must be tile-local,
/// row-major RGBA of exactly [`RenderTask::expected_len`] bytes. Failures are
/// reported through `Err`, never by panicking; a panic is out of contract
/// and costs the executor thread it happens on.
pub trait ComputeKernel: Send + Sync {
    fn compute(&self, task: &RenderTask) -> std::result::Result<Vec<u8>, KernelError>;
}

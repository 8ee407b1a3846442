use serde::{Deserialize, Serialize};

/// Per-slot render timing, updated by the frame assembler on every
/// completed task and republished to stats subscribers.
///
/// One entry exists per worker slot for the renderer's lifetime; the two
/// timings track the most recent task of each pass kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerStat {
    /// Worker slot, `0..worker_count`.
    pub worker_id: usize,
    /// Milliseconds the slot's latest preview band took.
    pub preview_ms: f64,
    /// Milliseconds the slot's latest full-resolution band took.
    pub full_res_ms: f64,
}

impl WorkerStat {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            preview_ms: 0.0,
            full_res_ms: 0.0,
        }
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use fractalglide_core::{ComputeKernel, KernelError, RenderTask, Tile};

use crate::error::EngineError;

/// One completed band, sent back from an executor to the coordinator.
#[derive(Debug)]
pub struct TileResult {
    /// Slot that ran the task, `0..worker_count`.
    pub worker_id: usize,
    pub tile: Tile,
    pub is_full_res: bool,
    /// Generation stamp copied from the originating task.
    pub generation: u64,
    /// Wall time the kernel spent on this band.
    pub elapsed: Duration,
    /// The RGBA band, already length-checked, or the per-task failure.
    pub pixels: Result<Vec<u8>, KernelError>,
}

/// A fixed set of executor threads fed by round-robin dispatch.
///
/// Each executor owns a task channel; completions funnel into one shared
/// result channel that exists before any task can be dispatched, so no
/// completion can ever be dropped for want of a receiver. There is no work
/// stealing and no cancellation: every dispatched task runs to completion
/// and its result is always delivered.
///
/// The outstanding counter counts dispatched-but-not-yet-collected tasks;
/// both ends are driven by the coordinating thread, so `is_occupied()` is
/// exact from the coordinator's point of view.
pub struct WorkerPool {
    task_senders: Vec<mpsc::Sender<RenderTask>>,
    results: mpsc::Receiver<TileResult>,
    handles: Vec<thread::JoinHandle<()>>,
    outstanding: AtomicUsize,
    next: usize,
}

impl WorkerPool {
    /// Spawn `workers` executor threads sharing one kernel.
    pub fn new(kernel: Arc<dyn ComputeKernel>, workers: usize) -> crate::Result<Self> {
        if workers == 0 {
            return Err(EngineError::InvalidWorkerCount(0));
        }

        let (result_tx, result_rx) = mpsc::channel::<TileResult>();
        let mut task_senders = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for id in 0..workers {
            let (task_tx, task_rx) = mpsc::channel::<RenderTask>();
            let results = result_tx.clone();
            let kernel = Arc::clone(&kernel);

            let handle = thread::Builder::new()
                .name(format!("render-worker-{id}"))
                .spawn(move || worker_loop(id, kernel, task_rx, results))
                .expect("Failed to spawn render worker thread");

            task_senders.push(task_tx);
            handles.push(handle);
        }

        debug!(workers, "worker pool started");
        Ok(Self {
            task_senders,
            results: result_rx,
            handles,
            outstanding: AtomicUsize::new(0),
            next: 0,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.task_senders.len()
    }

    /// Send a task to the next executor in round-robin order.
    pub fn dispatch(&mut self, task: RenderTask) -> crate::Result<()> {
        let slot = self.next;
        self.next = (self.next + 1) % self.task_senders.len();

        self.outstanding.fetch_add(1, Ordering::SeqCst);
        if self.task_senders[slot].send(task).is_err() {
            // Executor thread is gone; the task was never accepted.
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            return Err(EngineError::PoolClosed);
        }
        Ok(())
    }

    /// Count of dispatched tasks whose results have not been collected yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub fn is_occupied(&self) -> bool {
        self.outstanding() > 0
    }

    /// Collect one completed result, if any has arrived.
    pub fn try_recv(&self) -> Option<TileResult> {
        match self.results.try_recv() {
            Ok(result) => {
                self.outstanding.fetch_sub(1, Ordering::SeqCst);
                Some(result)
            }
            Err(_) => None,
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the task channels ends each executor's recv loop.
        self.task_senders.clear();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    id: usize,
    kernel: Arc<dyn ComputeKernel>,
    tasks: mpsc::Receiver<RenderTask>,
    results: mpsc::Sender<TileResult>,
) {
    debug!(worker = id, "render worker started");
    while let Ok(task) = tasks.recv() {
        let start = Instant::now();
        let pixels = kernel.compute(&task).and_then(|buf| {
            if buf.len() == task.expected_len() {
                Ok(buf)
            } else {
                Err(KernelError::new(format!(
                    "expected {} bytes for band {}, kernel produced {}",
                    task.expected_len(),
                    task.tile.index,
                    buf.len()
                )))
            }
        });

        let delivered = results.send(TileResult {
            worker_id: id,
            tile: task.tile,
            is_full_res: task.is_full_res,
            generation: task.generation,
            elapsed: start.elapsed(),
            pixels,
        });
        if delivered.is_err() {
            // Coordinator is gone; nothing left to render for.
            break;
        }
    }
    debug!(worker = id, "render worker exiting");
}

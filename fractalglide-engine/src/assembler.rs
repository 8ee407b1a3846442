use tracing::{debug, warn};

use fractalglide_core::{Resolution, WorkerStat};

use crate::pool::TileResult;
use crate::surface::FrameSurface;

/// Merges asynchronous per-band results into the output surface and keeps
/// the per-worker timing stats current.
///
/// Results arrive in no particular order, and a band from a superseded
/// generation is still applied — once dispatched, every task's result is
/// delivered. Stale arrivals are counted so the race stays observable.
pub struct FrameAssembler {
    surface: FrameSurface,
    stats: Vec<WorkerStat>,
    first_frame_done: bool,
    stale_tiles: u64,
}

impl FrameAssembler {
    pub fn new(resolution: Resolution, workers: usize) -> Self {
        Self {
            surface: FrameSurface::new(resolution),
            stats: (0..workers).map(WorkerStat::new).collect(),
            first_frame_done: false,
            stale_tiles: 0,
        }
    }

    /// Apply one completed task.
    ///
    /// `pool_idle_after` is the pool's occupancy after this result was
    /// collected; the first time the pool drains, the very first frame is
    /// complete and [`is_fetching`](Self::is_fetching) can go quiet.
    pub fn apply(&mut self, result: TileResult, current_generation: u64, pool_idle_after: bool) {
        if result.generation != current_generation {
            self.stale_tiles += 1;
            debug!(
                tile = result.tile.index,
                generation = result.generation,
                current = current_generation,
                "stale band applied over newer frame"
            );
        }

        match result.pixels {
            Ok(pixels) => {
                if !self.surface.blit_band(&result.tile, &pixels) {
                    warn!(tile = result.tile.index, "band does not fit the surface");
                }
            }
            Err(error) => {
                // Leave whatever the band held before; stale beats corrupt.
                warn!(
                    tile = result.tile.index,
                    worker = result.worker_id,
                    %error,
                    "kernel failed, keeping previous band content"
                );
            }
        }

        if let Some(stat) = self.stats.get_mut(result.worker_id) {
            let elapsed_ms = result.elapsed.as_secs_f64() * 1000.0;
            if result.is_full_res {
                stat.full_res_ms = elapsed_ms;
            } else {
                stat.preview_ms = elapsed_ms;
            }
        }

        if pool_idle_after {
            self.first_frame_done = true;
        }
    }

    /// Still loading the very first frame, or a pass is in flight.
    pub fn is_fetching(&self, pool_occupied: bool) -> bool {
        pool_occupied || !self.first_frame_done
    }

    pub fn surface(&self) -> &FrameSurface {
        &self.surface
    }

    pub fn stats(&self) -> &[WorkerStat] {
        &self.stats
    }

    /// How many bands arrived after their generation was superseded.
    pub fn stale_tiles(&self) -> u64 {
        self.stale_tiles
    }
}

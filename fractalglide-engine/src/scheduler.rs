use std::time::{Duration, Instant};

use tracing::debug;

use fractalglide_core::{partition_bands, RenderTask};

use crate::debounce::DebounceTimer;
use crate::state::RendererState;

/// Which of the two passes a tick decided to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Coarse-stride pass for immediate feedback during interaction.
    Preview,
    /// Full-stride pass once input has settled.
    FullRes,
}

/// Drives the preview → debounce → full-resolution refresh cycle.
///
/// The scheduler itself never touches the pool or the clock; the host calls
/// [`tick`](Self::tick) every few milliseconds with the current time and the
/// pool's occupancy, and gets back at most one pass to dispatch. Gating both
/// passes on an idle pool bounds in-flight work to a single generation, which
/// is the engine's entire backpressure story under fast input.
pub struct ProgressiveScheduler {
    preview_scaling: u32,
    full_res: DebounceTimer,
    dirty: bool,
    /// Re-arm the debounce window on the next tick (set by invalidation
    /// while the window is open — classic debounce).
    rearm_pending: bool,
    generation: u64,
}

impl ProgressiveScheduler {
    /// A fresh scheduler is born dirty, so the first tick with an idle pool
    /// dispatches the initial preview unprompted.
    pub fn new(preview_scaling: u32, full_res_delay: Duration) -> Self {
        Self {
            preview_scaling,
            full_res: DebounceTimer::new(full_res_delay),
            dirty: true,
            rearm_pending: false,
            generation: 0,
        }
    }

    /// Mark the current frame stale and open a new generation.
    pub fn invalidate(&mut self) {
        self.dirty = true;
        self.generation += 1;
        if self.full_res.is_armed() {
            self.rearm_pending = true;
        }
    }

    /// The generation tasks built right now would carry.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// No refresh pending in either pass.
    pub fn is_idle(&self) -> bool {
        !self.dirty && !self.full_res.is_armed()
    }

    /// Advance the refresh state machine by one polling tick.
    pub fn tick(&mut self, now: Instant, pool_occupied: bool) -> Option<PassKind> {
        if self.rearm_pending {
            self.rearm_pending = false;
            if self.full_res.is_armed() {
                self.full_res.arm(now);
            }
        }

        if self.dirty && !pool_occupied {
            self.dirty = false;
            self.full_res.arm(now);
            return Some(PassKind::Preview);
        }

        if self.full_res.expired(now) && !self.dirty && !pool_occupied {
            self.full_res.cancel();
            return Some(PassKind::FullRes);
        }

        None
    }

    /// Snapshot the renderer state into one task per band.
    pub fn plan(
        &self,
        state: &RendererState,
        workers: u32,
        pass: PassKind,
    ) -> fractalglide_core::Result<Vec<RenderTask>> {
        let tiles = partition_bands(state.resolution.height, workers)?;
        let is_full_res = pass == PassKind::FullRes;
        debug!(
            ?pass,
            generation = self.generation,
            bands = tiles.len(),
            "planning pass"
        );

        Ok(tiles
            .into_iter()
            .map(|tile| RenderTask {
                resolution: state.resolution,
                viewport: state.viewport,
                fractal: state.fractal,
                color: state.color,
                scaling: if is_full_res { 1 } else { self.preview_scaling },
                max_iterations: state.max_iterations.get(),
                tile,
                is_full_res,
                generation: self.generation,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fractalglide_core::{IterationBound, Resolution};

    const WINDOW: Duration = Duration::from_millis(300);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scheduler() -> ProgressiveScheduler {
        ProgressiveScheduler::new(5, WINDOW)
    }

    fn state() -> RendererState {
        RendererState::new(
            Resolution::new(1000, 800).unwrap(),
            1.25,
            IterationBound::default(),
        )
    }

    #[test]
    fn first_tick_dispatches_the_initial_preview() {
        let mut s = scheduler();
        let t0 = Instant::now();
        assert_eq!(s.tick(t0, false), Some(PassKind::Preview));
        assert!(!s.is_idle(), "full-res window must now be open");
    }

    #[test]
    fn preview_waits_for_the_pool_to_drain() {
        let mut s = scheduler();
        let t0 = Instant::now();
        assert_eq!(s.tick(t0, true), None, "occupied pool defers the preview");
        assert_eq!(s.tick(t0 + ms(10), false), Some(PassKind::Preview));
    }

    #[test]
    fn full_res_fires_after_a_quiet_window() {
        let mut s = scheduler();
        let t0 = Instant::now();
        assert_eq!(s.tick(t0, false), Some(PassKind::Preview));
        assert_eq!(s.tick(t0 + ms(299), false), None);
        assert_eq!(s.tick(t0 + ms(300), false), Some(PassKind::FullRes));
        assert!(s.is_idle());
    }

    #[test]
    fn each_invalidation_resets_the_window() {
        let mut s = scheduler();
        let t0 = Instant::now();

        assert_eq!(s.tick(t0, false), Some(PassKind::Preview));
        s.invalidate();
        assert_eq!(s.tick(t0 + ms(100), false), Some(PassKind::Preview));

        // The window restarted at t=100, so t=300 is too early…
        assert_eq!(s.tick(t0 + ms(300), false), None);
        // …and t=400 fires.
        assert_eq!(s.tick(t0 + ms(400), false), Some(PassKind::FullRes));
    }

    #[test]
    fn invalidation_reschedules_even_while_the_pool_is_busy() {
        let mut s = scheduler();
        let t0 = Instant::now();
        assert_eq!(s.tick(t0, false), Some(PassKind::Preview));

        // Pool stays busy; the invalidation at t=100 must still push the
        // full-res deadline out to t=400.
        s.invalidate();
        assert_eq!(s.tick(t0 + ms(100), true), None);
        assert_eq!(s.tick(t0 + ms(350), true), None);

        // Pool drains: the pending preview goes out first, restarting the
        // window again.
        assert_eq!(s.tick(t0 + ms(360), false), Some(PassKind::Preview));
        assert_eq!(s.tick(t0 + ms(400), false), None);
        assert_eq!(s.tick(t0 + ms(660), false), Some(PassKind::FullRes));
    }

    #[test]
    fn full_res_waits_for_the_pool_to_drain() {
        let mut s = scheduler();
        let t0 = Instant::now();
        assert_eq!(s.tick(t0, false), Some(PassKind::Preview));
        assert_eq!(s.tick(t0 + ms(300), true), None, "expired but occupied");
        assert_eq!(s.tick(t0 + ms(320), false), Some(PassKind::FullRes));
    }

    #[test]
    fn generation_increments_per_invalidation() {
        let mut s = scheduler();
        assert_eq!(s.generation(), 0);
        s.invalidate();
        s.invalidate();
        assert_eq!(s.generation(), 2);
    }

    #[test]
    fn plan_builds_one_task_per_band() {
        let s = scheduler();
        let tasks = s.plan(&state(), 20, PassKind::Preview).unwrap();
        assert_eq!(tasks.len(), 20);
        for (i, task) in tasks.iter().enumerate() {
            assert_eq!(task.tile.index as usize, i);
            assert_eq!(task.scaling, 5);
            assert!(!task.is_full_res);
            assert_eq!(task.generation, 0);
        }
    }

    #[test]
    fn plan_full_res_uses_unit_stride() {
        let s = scheduler();
        let tasks = s.plan(&state(), 4, PassKind::FullRes).unwrap();
        assert!(tasks.iter().all(|t| t.scaling == 1 && t.is_full_res));
    }

    #[test]
    fn plan_snapshots_state_at_dispatch_time() {
        let mut s = scheduler();
        let mut st = state();
        let tasks = s.plan(&st, 4, PassKind::Preview).unwrap();

        // Later mutations must not bleed into already-planned tasks.
        st.viewport.pan(st.resolution, 100.0, 100.0);
        s.invalidate();
        assert_eq!(tasks[0].viewport, state().viewport);
        assert_eq!(tasks[0].generation, 0);
    }
}

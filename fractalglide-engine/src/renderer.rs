use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use fractalglide_core::{
    ColorParams, ComputeKernel, FractalParams, IterationBound, Resolution, Viewport, WorkerStat,
};

use crate::assembler::FrameAssembler;
use crate::debounce::DebounceTimer;
use crate::error::EngineError;
use crate::export;
use crate::input::{GamepadSource, InteractionController, PadSettings, PointerEvent};
use crate::pool::WorkerPool;
use crate::scheduler::ProgressiveScheduler;
use crate::state::RendererState;
use crate::subscribe::{Subscribers, SubscriptionId};
use crate::surface::FrameSurface;

/// Stride of preview passes: one sample per 5×5 pixel block.
pub const DEFAULT_PREVIEW_SCALING: u32 = 5;

/// Quiet period after the last invalidation before the full-res pass fires.
pub const DEFAULT_FULL_RES_DELAY: Duration = Duration::from_millis(500);

/// How long the pool must stay idle before the progress signal clears.
///
/// Bridges the gap between a preview completing and the full-res pass
/// dispatching, so the loading indicator does not flicker between passes.
pub const PROGRESS_CLEAR_DELAY: Duration = Duration::from_millis(100);

/// Construction parameters, supplied once by the configuration collaborator.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Width / height of the hosting screen; shapes both the derived
    /// resolution and the initial plane window.
    pub screen_ratio: f64,
    /// Upper bound on output height; snapped down to tile exactly.
    pub max_height: u32,
    /// Initial iteration bound, validated strictly (not clamped).
    pub max_iterations: u32,
    pub fractal: FractalParams,
    pub color: ColorParams,
    /// Worker pool size; `None` uses the available hardware parallelism.
    pub workers: Option<usize>,
    pub preview_scaling: u32,
    pub full_res_delay: Duration,
    pub pad: PadSettings,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            screen_ratio: 16.0 / 9.0,
            max_height: 1080,
            max_iterations: IterationBound::DEFAULT,
            fractal: FractalParams::default(),
            color: ColorParams::default(),
            workers: None,
            preview_scaling: DEFAULT_PREVIEW_SCALING,
            full_res_delay: DEFAULT_FULL_RES_DELAY,
            pad: PadSettings::default(),
        }
    }
}

impl RendererConfig {
    fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
        })
    }
}

/// The progressive fractal renderer.
///
/// Owns the whole engine: shared state, worker pool, scheduler, interaction
/// controller and frame assembler. The host forwards input events as they
/// happen and calls [`tick`](Self::tick) every few milliseconds; everything
/// else — preview and full-res passes, debouncing, backpressure, progress
/// and stats publication — happens inside the tick.
pub struct FractalRenderer {
    state: RendererState,
    pool: WorkerPool,
    scheduler: ProgressiveScheduler,
    controller: InteractionController,
    assembler: FrameAssembler,
    gamepad: Option<Box<dyn GamepadSource>>,
    progress_subs: Subscribers<bool>,
    stats_subs: Subscribers<[WorkerStat]>,
    progress_clear: DebounceTimer,
    progress_visible: bool,
}

impl FractalRenderer {
    /// Construct with a resolution derived from the device constraints.
    pub fn new(kernel: Arc<dyn ComputeKernel>, config: RendererConfig) -> crate::Result<Self> {
        let workers = config.resolved_workers();
        let resolution = Resolution::derive(
            config.screen_ratio,
            config.max_height,
            workers as u32,
            config.preview_scaling,
        )?;
        Self::build(kernel, config, resolution, workers)
    }

    /// Construct with an explicit resolution.
    ///
    /// The height must divide evenly across the worker pool; anything else
    /// is a configuration error, not a silent adjustment.
    pub fn with_resolution(
        kernel: Arc<dyn ComputeKernel>,
        config: RendererConfig,
        resolution: Resolution,
    ) -> crate::Result<Self> {
        let workers = config.resolved_workers();
        if workers == 0 {
            return Err(EngineError::InvalidWorkerCount(0));
        }
        if resolution.height as usize % workers != 0 {
            return Err(EngineError::UnevenTiling {
                height: resolution.height,
                workers,
            });
        }
        Self::build(kernel, config, resolution, workers)
    }

    fn build(
        kernel: Arc<dyn ComputeKernel>,
        config: RendererConfig,
        resolution: Resolution,
        workers: usize,
    ) -> crate::Result<Self> {
        let max_iterations = IterationBound::new(config.max_iterations)?;
        let mut state = RendererState::new(resolution, config.screen_ratio, max_iterations);
        state.fractal = config.fractal;
        state.color = config.color;

        let pool = WorkerPool::new(kernel, workers)?;
        info!(
            width = resolution.width,
            height = resolution.height,
            workers,
            preview_scaling = config.preview_scaling,
            "renderer constructed"
        );

        Ok(Self {
            state,
            pool,
            scheduler: ProgressiveScheduler::new(config.preview_scaling, config.full_res_delay),
            controller: InteractionController::new(config.pad),
            assembler: FrameAssembler::new(resolution, workers),
            gamepad: None,
            progress_subs: Subscribers::new(),
            stats_subs: Subscribers::new(),
            progress_clear: DebounceTimer::new(PROGRESS_CLEAR_DELAY),
            progress_visible: false,
        })
    }

    // -- input ------------------------------------------------------------

    pub fn pointer(&mut self, event: PointerEvent) {
        if self.controller.pointer(&mut self.state, event) {
            self.scheduler.invalidate();
        }
    }

    /// Zoom by a wheel delta. Guard skips do not invalidate.
    pub fn wheel(&mut self, delta_y: f64) {
        if self.controller.wheel(&mut self.state, delta_y) {
            self.scheduler.invalidate();
        }
    }

    /// Attach or detach the analog input device sampled on each tick.
    pub fn set_gamepad(&mut self, gamepad: Option<Box<dyn GamepadSource>>) {
        self.gamepad = gamepad;
    }

    // -- configuration ----------------------------------------------------

    /// Switching the fractal kind also resets the viewport to the default
    /// framing; retuning the same kind keeps the current window.
    pub fn set_fractal(&mut self, fractal: FractalParams) {
        if fractal.kind != self.state.fractal.kind {
            self.state.viewport.reset(self.state.screen_ratio);
        }
        self.state.fractal = fractal;
        self.scheduler.invalidate();
    }

    pub fn set_julia_seed(&mut self, re: f64, im: f64) {
        self.state.fractal.seed = [re, im];
        self.scheduler.invalidate();
    }

    pub fn set_color(&mut self, color: ColorParams) {
        self.state.color = color;
        self.scheduler.invalidate();
    }

    /// Interactive path: out-of-range values are clamped, never refused.
    pub fn set_max_iterations(&mut self, value: u32) {
        self.state.max_iterations = IterationBound::clamped(value);
        self.scheduler.invalidate();
    }

    // -- the polling tick -------------------------------------------------

    /// Advance the engine using the wall clock.
    pub fn tick(&mut self) -> crate::Result<()> {
        self.tick_at(Instant::now())
    }

    /// Advance the engine by one polling tick at an explicit time.
    ///
    /// Samples the gamepad, drains completed bands into the surface, and
    /// dispatches at most one pass — preview if the frame is dirty, the
    /// debounced full-res pass once input has settled. Both dispatches wait
    /// for the pool to drain first, which bounds in-flight work to a single
    /// generation no matter how fast input arrives.
    pub fn tick_at(&mut self, now: Instant) -> crate::Result<()> {
        let sample = self.gamepad.as_mut().and_then(|pad| pad.sample());
        if self.controller.poll_gamepad(&mut self.state, sample) {
            self.scheduler.invalidate();
        }

        while let Some(result) = self.pool.try_recv() {
            let idle = !self.pool.is_occupied();
            self.assembler.apply(result, self.scheduler.generation(), idle);
            let stats = self.assembler.stats();
            self.stats_subs.emit(stats);
        }

        if let Some(pass) = self.scheduler.tick(now, self.pool.is_occupied()) {
            let tasks = self
                .scheduler
                .plan(&self.state, self.pool.worker_count() as u32, pass)?;
            debug!(?pass, tasks = tasks.len(), "dispatching pass");
            for task in tasks {
                self.pool.dispatch(task)?;
            }
            self.publish_progress(true);
        }

        if self.pool.is_occupied() {
            self.progress_clear.cancel();
        } else if self.progress_visible {
            if self.progress_clear.expired(now) {
                self.progress_clear.cancel();
                self.publish_progress(false);
            } else if !self.progress_clear.is_armed() {
                self.progress_clear.arm(now);
            }
        }

        Ok(())
    }

    fn publish_progress(&mut self, value: bool) {
        if value {
            self.progress_clear.cancel();
        }
        if self.progress_visible != value {
            self.progress_visible = value;
            self.progress_subs.emit(&value);
        }
    }

    // -- subscriptions ----------------------------------------------------

    pub fn on_progress<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(bool) + 'static,
    {
        self.progress_subs.subscribe(Box::new(move |&value| callback(value)))
    }

    pub fn unsubscribe_progress(&mut self, id: SubscriptionId) -> bool {
        self.progress_subs.unsubscribe(id)
    }

    pub fn on_stats<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&[WorkerStat]) + 'static,
    {
        self.stats_subs.subscribe(Box::new(callback))
    }

    pub fn unsubscribe_stats(&mut self, id: SubscriptionId) -> bool {
        self.stats_subs.unsubscribe(id)
    }

    // -- observation ------------------------------------------------------

    pub fn resolution(&self) -> Resolution {
        self.state.resolution
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn fractal(&self) -> FractalParams {
        self.state.fractal
    }

    pub fn color(&self) -> ColorParams {
        self.state.color
    }

    pub fn max_iterations(&self) -> u32 {
        self.state.max_iterations.get()
    }

    pub fn surface(&self) -> &FrameSurface {
        self.assembler.surface()
    }

    pub fn stats(&self) -> &[WorkerStat] {
        self.assembler.stats()
    }

    /// Still loading the first frame, or a pass is in flight.
    pub fn is_fetching(&self) -> bool {
        self.assembler.is_fetching(self.pool.is_occupied())
    }

    pub fn generation(&self) -> u64 {
        self.scheduler.generation()
    }

    pub fn stale_tiles(&self) -> u64 {
        self.assembler.stale_tiles()
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    // -- export -----------------------------------------------------------

    /// Snapshot the current surface to a PNG with the render parameters
    /// embedded as metadata.
    pub fn export_frame(&self, path: &Path) -> crate::Result<()> {
        export::export_png(self.assembler.surface(), &self.state, path)
    }
}

use fractalglide_core::{ColorParams, FractalParams, IterationBound, Resolution, Viewport};

/// The renderer's shared mutable state, owned by [`FractalRenderer`] and
/// passed by reference to the scheduler, the interaction controller and the
/// frame assembler.
///
/// Single-writer discipline: only the interaction controller and the
/// configuration setters mutate it; the scheduler snapshots it into
/// [`RenderTask`](fractalglide_core::RenderTask)s at dispatch time.
///
/// [`FractalRenderer`]: crate::renderer::FractalRenderer
#[derive(Debug, Clone)]
pub struct RendererState {
    pub resolution: Resolution,
    /// Aspect ratio used for viewport resets (fractal-type switches).
    pub screen_ratio: f64,
    pub viewport: Viewport,
    pub fractal: FractalParams,
    pub color: ColorParams,
    pub max_iterations: IterationBound,
}

impl RendererState {
    pub fn new(resolution: Resolution, screen_ratio: f64, max_iterations: IterationBound) -> Self {
        Self {
            resolution,
            screen_ratio,
            viewport: Viewport::initial(screen_ratio),
            fractal: FractalParams::default(),
            color: ColorParams::default(),
            max_iterations,
        }
    }
}

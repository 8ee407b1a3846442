use serde::{Deserialize, Serialize};

use crate::params::{ColorParams, FractalParams};
use crate::resolution::Resolution;
use crate::tile::Tile;
use crate::viewport::Viewport;

/// An immutable snapshot of everything a kernel needs to render one band.
///
/// Built by the scheduler at dispatch time so the kernel never reads shared
/// mutable state; discarded once the completion arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderTask {
    pub resolution: Resolution,
    pub viewport: Viewport,
    pub fractal: FractalParams,
    pub color: ColorParams,
    /// Pixel stride: 1 renders every pixel, `n > 1` renders every n-th pixel
    /// and replicates it across the n×n block (preview passes).
    pub scaling: u32,
    pub max_iterations: u32,
    pub tile: Tile,
    pub is_full_res: bool,
    /// Which invalidation this snapshot belongs to. Completions carry it
    /// back so stale arrivals are observable.
    pub generation: u64,
}

impl RenderTask {
    /// Exact RGBA byte length the kernel must produce for this band.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.tile.pixel_count(self.resolution.width) * 4
    }

    /// The smoothing flag in effect for this pass.
    #[inline]
    pub fn smoothing(&self) -> bool {
        if self.is_full_res {
            self.color.smooth_full_res
        } else {
            self.color.smooth_preview
        }
    }
}

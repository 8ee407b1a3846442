use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Output frame size in pixels.
///
/// Immutable after construction. The interesting constructor is
/// [`derive`](Self::derive), which snaps the dimensions so that both the
/// preview stride and the per-worker band split land exactly on pixel
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create an explicit resolution. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidResolution {
                reason: format!("dimensions must be > 0, got {width}×{height}"),
            });
        }
        Ok(Self { width, height })
    }

    /// Derive a resolution from device constraints.
    ///
    /// The height is snapped down to a multiple of
    /// `preview_scaling × workers` so every worker gets the same number of
    /// rows and the preview stride tiles each band exactly; the width follows
    /// the screen ratio, snapped down to a multiple of `preview_scaling`.
    pub fn derive(
        screen_ratio: f64,
        max_height: u32,
        workers: u32,
        preview_scaling: u32,
    ) -> crate::Result<Self> {
        if workers == 0 || preview_scaling == 0 {
            return Err(CoreError::InvalidResolution {
                reason: format!(
                    "workers ({workers}) and preview scaling ({preview_scaling}) must be > 0"
                ),
            });
        }
        if !screen_ratio.is_finite() || screen_ratio <= 0.0 {
            return Err(CoreError::InvalidResolution {
                reason: format!("screen ratio must be positive and finite, got {screen_ratio}"),
            });
        }

        let factor = preview_scaling * workers;
        let height = max_height / factor * factor;
        let width = (height as f64 * screen_ratio) as u32 / preview_scaling * preview_scaling;

        if width == 0 || height == 0 {
            return Err(CoreError::InvalidResolution {
                reason: format!(
                    "max height {max_height} too small for {workers} workers at stride {preview_scaling}"
                ),
            });
        }
        Ok(Self { width, height })
    }

    /// The aspect ratio of the frame (width / height).
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Number of pixels in the frame.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which escape-time family to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalKind {
    Mandelbrot,
    Julia,
}

impl FractalKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia => "Julia",
        }
    }
}

/// Fractal selection plus the Julia seed constant.
///
/// `seed` is the `c` of `z ← z² + c` and is only meaningful for
/// [`FractalKind::Julia`]; the Mandelbrot kernel ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalParams {
    pub kind: FractalKind,
    /// Julia seed as `[re, im]`.
    pub seed: [f64; 2],
}

impl FractalParams {
    pub fn mandelbrot() -> Self {
        Self {
            kind: FractalKind::Mandelbrot,
            seed: [0.0, 0.0],
        }
    }

    pub fn julia(seed_re: f64, seed_im: f64) -> Self {
        Self {
            kind: FractalKind::Julia,
            seed: [seed_re, seed_im],
        }
    }
}

impl Default for FractalParams {
    fn default() -> Self {
        Self::mandelbrot()
    }
}

/// Which HSV channel the normalized escape value modulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    Hue,
    Saturation,
    Value,
}

/// Coloring knobs, written by the configuration collaborator and read-only
/// to the engine. The base HSV triple supplies the channels the mode does
/// not modulate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorParams {
    /// Base hue in degrees, `[0, 360)`.
    pub hue: f64,
    /// Base saturation, `[0, 1]`.
    pub saturation: f64,
    /// Base value, `[0, 1]`.
    pub value: f64,
    pub mode: ColorMode,
    /// Smooth (fractional) iteration counts on the full-resolution pass.
    pub smooth_full_res: bool,
    /// Smooth iteration counts on preview passes, where banding is more
    /// tolerable in exchange for speed.
    pub smooth_preview: bool,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            hue: 200.0,
            saturation: 1.0,
            value: 1.0,
            mode: ColorMode::Value,
            smooth_full_res: true,
            smooth_preview: true,
        }
    }
}

/// Maximum iteration count, kept inside `[MIN, MAX]`.
///
/// Interactive writes go through [`clamped`](Self::clamped); direct
/// configuration goes through [`new`](Self::new), which rejects out-of-range
/// values instead of correcting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IterationBound(u32);

impl IterationBound {
    pub const MIN: u32 = 100;
    pub const MAX: u32 = 10_000;
    pub const DEFAULT: u32 = 1000;

    /// Strict constructor: out-of-range is a configuration error.
    pub fn new(value: u32) -> crate::Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(CoreError::IterationBoundOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Interactive constructor: out-of-range values are clamped, never refused.
    pub fn clamped(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for IterationBound {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::CoreError;
use crate::resolution::Resolution;

/// Damping applied to pointer pan deltas, so a one-pixel drag moves the
/// plane slightly less than one pixel's worth of distance.
pub const PAN_DAMPING: f64 = 0.8;

/// Upper bound on the magnitude of a single zoom step. Wheel hardware
/// reports wildly different deltas; clamping keeps the zoom rate uniform.
pub const ZOOM_SPEED_LOCK: f64 = 50.0;

/// Per-pixel plane distance below which further zoom-in is refused.
///
/// Near the end of `f64` mantissa precision the symmetric shrink would
/// collapse the bounds (`x_min == x_max`) and feed NaN into the kernel.
pub const PRECISION_FLOOR: f64 = 9.0e-16;

/// The visible rectangle of the complex plane.
///
/// `x` is the real axis, `y` the imaginary axis; `y_min` maps to the top
/// pixel row. The window is mutated in place by pan/zoom and by programmatic
/// resets, and snapshotted into every [`RenderTask`](crate::RenderTask).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// Create a viewport with explicit bounds.
    ///
    /// Both spans must be positive and all bounds finite.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> crate::Result<Self> {
        let bounds = [x_min, x_max, y_min, y_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(CoreError::InvalidViewport {
                reason: format!("bounds must be finite, got {bounds:?}"),
            });
        }
        if x_max <= x_min || y_max <= y_min {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "spans must be positive, got x [{x_min}, {x_max}], y [{y_min}, {y_max}]"
                ),
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Default window for a given screen ratio.
    ///
    /// Spans `3 × ratio` horizontally, offset 60/40 so the main cardioid of
    /// the Mandelbrot set sits left of centre; the vertical span is fixed at
    /// `[-1.5, 1.5]`.
    pub fn initial(screen_ratio: f64) -> Self {
        let plane_length_x = 3.0 * screen_ratio;
        Self {
            x_min: -plane_length_x * 0.6,
            x_max: plane_length_x * 0.4,
            y_min: -1.5,
            y_max: 1.5,
        }
    }

    /// Programmatic reset back to the default framing (fractal-type switch).
    pub fn reset(&mut self, screen_ratio: f64) {
        *self = Self::initial(screen_ratio);
    }

    /// Plane distance represented by one pixel along the real axis.
    #[inline]
    pub fn particle_x(&self, res: Resolution) -> f64 {
        (self.x_max - self.x_min) / res.width as f64
    }

    /// Plane distance represented by one pixel along the imaginary axis.
    #[inline]
    pub fn particle_y(&self, res: Resolution) -> f64 {
        (self.y_max - self.y_min) / res.height as f64
    }

    /// Horizontal extent of the window in plane units.
    #[inline]
    pub fn span_x(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical extent of the window in plane units.
    #[inline]
    pub fn span_y(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Shift the window by a pixel delta, preserving its size.
    ///
    /// Dragging right (`dx > 0`) moves the window left, so the plane appears
    /// to follow the pointer. Deltas are damped by [`PAN_DAMPING`].
    pub fn pan(&mut self, res: Resolution, dx_pixels: f64, dy_pixels: f64) {
        let x_move = self.particle_x(res) * dx_pixels * PAN_DAMPING;
        let y_move = self.particle_y(res) * dy_pixels * PAN_DAMPING;

        self.x_min -= x_move;
        self.x_max -= x_move;
        self.y_min -= y_move;
        self.y_max -= y_move;
    }

    /// Grow or shrink the window symmetrically about its centre.
    ///
    /// `delta_y < 0` zooms in. The delta magnitude is clamped to
    /// [`ZOOM_SPEED_LOCK`]; the X movement carries an aspect-ratio factor so
    /// both axes shrink by the same proportion. Returns `false` without
    /// touching the bounds when the delta is zero or when the precision
    /// guard refuses a further zoom-in.
    pub fn zoom(&mut self, res: Resolution, delta_y: f64) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let clamped = delta_y.signum() * delta_y.abs().min(ZOOM_SPEED_LOCK);

        let x_particle = self.particle_x(res);
        if x_particle.abs() < PRECISION_FLOOR && delta_y < 0.0 {
            trace!(x_particle, "zoom-in refused at precision floor");
            return false;
        }

        let x_shrink = x_particle * clamped * res.aspect_ratio();
        self.x_min -= x_shrink;
        self.x_max += x_shrink;

        let y_shrink = self.particle_y(res) * clamped;
        self.y_min -= y_shrink;
        self.y_max += y_shrink;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn res() -> Resolution {
        Resolution::new(1000, 800).unwrap()
    }

    #[test]
    fn initial_window_framing() {
        let vp = Viewport::initial(1.5);
        assert!((vp.x_min - (-2.7)).abs() < EPSILON);
        assert!((vp.x_max - 1.8).abs() < EPSILON);
        assert!((vp.y_min - (-1.5)).abs() < EPSILON);
        assert!((vp.y_max - 1.5).abs() < EPSILON);
    }

    #[test]
    fn particles_are_positive() {
        let vp = Viewport::initial(1.25);
        assert!(vp.particle_x(res()) > 0.0);
        assert!(vp.particle_y(res()) > 0.0);
    }

    #[test]
    fn invalid_bounds_rejected() {
        assert!(Viewport::new(1.0, 1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(2.0, 1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, 1.0, -1.0).is_err());
        assert!(Viewport::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(f64::NEG_INFINITY, 1.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn pan_preserves_window_size() {
        let mut vp = Viewport::initial(1.25);
        let (sx, sy) = (vp.span_x(), vp.span_y());
        vp.pan(res(), 37.0, -12.0);
        assert!((vp.span_x() - sx).abs() < EPSILON);
        assert!((vp.span_y() - sy).abs() < EPSILON);
    }

    #[test]
    fn pan_applies_damping() {
        let mut vp = Viewport::initial(1.25);
        let before = vp.x_min;
        let px = vp.particle_x(res());
        vp.pan(res(), 10.0, 0.0);
        assert!((before - vp.x_min - px * 10.0 * PAN_DAMPING).abs() < EPSILON);
    }

    #[test]
    fn pan_round_trip_returns_to_origin() {
        let mut vp = Viewport::initial(1.25);
        let original = vp;
        vp.pan(res(), 123.0, -45.0);
        vp.pan(res(), -123.0, 45.0);
        assert!((vp.x_min - original.x_min).abs() < EPSILON);
        assert!((vp.x_max - original.x_max).abs() < EPSILON);
        assert!((vp.y_min - original.y_min).abs() < EPSILON);
        assert!((vp.y_max - original.y_max).abs() < EPSILON);
    }

    #[test]
    fn zoom_follows_documented_formula() {
        let mut vp = Viewport::initial(1.25);
        let r = res();
        let px = vp.particle_x(r);
        let py = vp.particle_y(r);
        let before = vp;

        // 120 exceeds the speed lock, so the effective delta is 50.
        assert!(vp.zoom(r, 120.0));

        let x_shrink = px * ZOOM_SPEED_LOCK * r.aspect_ratio();
        let y_shrink = py * ZOOM_SPEED_LOCK;
        assert!((vp.x_min - (before.x_min - x_shrink)).abs() < EPSILON);
        assert!((vp.x_max - (before.x_max + x_shrink)).abs() < EPSILON);
        assert!((vp.y_min - (before.y_min - y_shrink)).abs() < EPSILON);
        assert!((vp.y_max - (before.y_max + y_shrink)).abs() < EPSILON);
    }

    #[test]
    fn zoom_in_then_out_keeps_proportions() {
        let mut vp = Viewport::initial(1.25);
        let r = res();
        assert!(vp.zoom(r, -30.0));
        assert!(vp.zoom(r, 30.0));
        // Not an exact inverse (particle changes between the calls), but the
        // window must stay valid and close to its original shape.
        assert!(vp.span_x() > 0.0);
        assert!(vp.span_y() > 0.0);
        let initial = Viewport::initial(1.25);
        assert!((vp.span_x() / vp.span_y() - initial.span_x() / initial.span_y()).abs() < 1e-9);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut vp = Viewport::initial(1.25);
        let before = vp;
        assert!(!vp.zoom(res(), 0.0));
        assert_eq!(vp, before);
    }

    #[test]
    fn zoom_in_converges_at_precision_floor() {
        let mut vp = Viewport::initial(1.25);
        let r = res();
        for _ in 0..2000 {
            vp.zoom(r, -50.0);
        }
        assert!(vp.x_min.is_finite() && vp.x_max.is_finite());
        assert!(vp.x_max > vp.x_min, "bounds must never collapse");
        assert!(vp.y_max > vp.y_min);

        // Fixed point: once the guard engages, further zoom-in is refused.
        let frozen = vp;
        assert!(!vp.zoom(r, -50.0));
        assert_eq!(vp, frozen);
    }

    #[test]
    fn zoom_out_still_allowed_at_precision_floor() {
        let mut vp = Viewport::new(0.0, 8.0e-13, 0.0, 6.4e-13).unwrap();
        let r = res();
        assert!(vp.particle_x(r).abs() < PRECISION_FLOOR);
        assert!(vp.zoom(r, 10.0), "zoom-out must not be blocked by the guard");
        assert!(vp.span_x() > 8.0e-13);
    }

    #[test]
    fn reset_restores_default_framing() {
        let mut vp = Viewport::initial(1.25);
        vp.pan(res(), 500.0, 300.0);
        vp.zoom(res(), -40.0);
        vp.reset(1.25);
        assert_eq!(vp, Viewport::initial(1.25));
    }

    #[test]
    fn serde_round_trip() {
        let vp = Viewport::initial(1.6);
        let json = serde_json::to_string(&vp).unwrap();
        let back: Viewport = serde_json::from_str(&json).unwrap();
        assert_eq!(vp, back);
    }
}

use fractalglide_core::{ColorMode, ColorParams};

use crate::escape::Escape;

/// Map an escape result to RGBA.
///
/// Interior points are solid black. For escaped points the iteration count —
/// smooth (renormalized `ν = n + 1 − log₂(ln|zₙ|)`) or integer — is
/// normalized against the iteration bound and modulates the one HSV channel
/// selected by [`ColorMode`]; the other two channels come straight from the
/// base triple.
pub fn colorize(escape: Escape, max_iterations: u32, params: &ColorParams, smooth: bool) -> [u8; 4] {
    let (iterations, norm_sq) = match escape {
        Escape::Interior => return [0, 0, 0, 255],
        Escape::Escaped {
            iterations,
            norm_sq,
        } => (iterations, norm_sq),
    };

    let count = if smooth {
        smooth_iteration(iterations, norm_sq)
    } else {
        iterations as f64
    };
    let t = (count / max_iterations as f64).clamp(0.0, 1.0);

    let (h, s, v) = match params.mode {
        ColorMode::Hue => ((params.hue + t * 360.0) % 360.0, params.saturation, params.value),
        ColorMode::Saturation => (params.hue, t, params.value),
        ColorMode::Value => (params.hue, params.saturation, t),
    };

    let [r, g, b] = hsv_to_rgb(h, s, v);
    [r, g, b, 255]
}

/// Renormalized fractional iteration count for band-free gradients.
fn smooth_iteration(iterations: u32, norm_sq: f64) -> f64 {
    let log_zn = norm_sq.ln() * 0.5; // ln(|z_n|)
    if log_zn <= 0.0 {
        return iterations as f64;
    }
    iterations as f64 + 1.0 - log_zn.ln() / std::f64::consts::LN_2
}

/// Sector-based HSV → RGB. `h` in degrees, `s` and `v` in `[0, 1]`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let h = (h.rem_euclid(360.0)) / 60.0;
    let i = h.floor() as i32;
    let f = h - i as f64;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match i.rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(iterations: u32) -> Escape {
        Escape::Escaped {
            iterations,
            norm_sq: 16.0,
        }
    }

    #[test]
    fn interior_is_black() {
        let px = colorize(Escape::Interior, 1000, &ColorParams::default(), true);
        assert_eq!(px, [0, 0, 0, 255]);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), [0, 0, 255]);
        assert_eq!(hsv_to_rgb(0.0, 0.0, 1.0), [255, 255, 255]);
        assert_eq!(hsv_to_rgb(123.0, 1.0, 0.0), [0, 0, 0]);
    }

    #[test]
    fn value_mode_scales_brightness_with_count() {
        let params = ColorParams::default(); // mode = Value
        let dim = colorize(escaped(10), 1000, &params, false);
        let bright = colorize(escaped(900), 1000, &params, false);
        let luma = |px: [u8; 4]| px[0] as u32 + px[1] as u32 + px[2] as u32;
        assert!(luma(bright) > luma(dim));
    }

    #[test]
    fn hue_mode_keeps_brightness_constant() {
        let params = ColorParams {
            mode: ColorMode::Hue,
            ..ColorParams::default()
        };
        let a = colorize(escaped(100), 1000, &params, false);
        let b = colorize(escaped(500), 1000, &params, false);
        assert_ne!(a, b, "different counts must land on different hues");
        let max = |px: [u8; 4]| px[..3].iter().copied().max().unwrap();
        // With s = v = 1 the dominant channel is always full.
        assert_eq!(max(a), 255);
        assert_eq!(max(b), 255);
    }

    #[test]
    fn smooth_count_stays_close_to_integer_count() {
        let smooth = smooth_iteration(50, 16.0);
        assert!((smooth - 50.0).abs() < 2.0);
    }

    #[test]
    fn smooth_colorize_differs_from_stepped() {
        let params = ColorParams::default();
        // norm_sq chosen so the fractional part of ν is far from zero.
        let e = Escape::Escaped {
            iterations: 200,
            norm_sq: 300.0,
        };
        let a = colorize(e, 400, &params, true);
        let b = colorize(e, 400, &params, false);
        assert_ne!(a, b);
    }
}

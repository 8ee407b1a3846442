use crate::complex::Complex;

/// Squared bailout radius. `|z| > 2` guarantees divergence for both families.
const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Outcome of iterating a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Escape {
    /// The orbit escaped after `iterations` steps; `norm_sq` is `|z|²` at
    /// the moment of escape, kept for smooth coloring.
    Escaped { iterations: u32, norm_sq: f64 },

    /// The point did not escape within the iteration bound.
    Interior,
}

/// Iterate `z ← z² + c` from `z₀ = 0`, where `c` is the sampled point.
#[inline]
pub fn iterate_mandelbrot(c: Complex, max_iterations: u32) -> Escape {
    iterate(Complex::ZERO, c, max_iterations)
}

/// Iterate `z ← z² + c` from `z₀` = the sampled point with a fixed seed `c`.
#[inline]
pub fn iterate_julia(z0: Complex, seed: Complex, max_iterations: u32) -> Escape {
    iterate(z0, seed, max_iterations)
}

fn iterate(mut z: Complex, c: Complex, max_iterations: u32) -> Escape {
    for n in 0..max_iterations {
        z = Complex::new(z.re * z.re - z.im * z.im + c.re, 2.0 * z.re * z.im + c.im);

        let norm_sq = z.norm_sq();
        if norm_sq > ESCAPE_RADIUS_SQ {
            return Escape::Escaped {
                iterations: n,
                norm_sq,
            };
        }
    }
    Escape::Interior
}

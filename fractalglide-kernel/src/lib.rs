pub mod color;
pub mod complex;
pub mod escape;

pub use complex::Complex;
pub use escape::{iterate_julia, iterate_mandelbrot, Escape};

use fractalglide_core::{ComputeKernel, FractalKind, KernelError, RenderTask};

/// The reference CPU kernel: plain `f64` escape-time iteration with HSV
/// coloring.
///
/// Honors the task's `scaling` stride by computing every n-th pixel of every
/// n-th row and replicating the color across the n×n block, which is where
/// the preview pass gets its speed.
#[derive(Debug, Default)]
pub struct EscapeTimeKernel;

impl ComputeKernel for EscapeTimeKernel {
    fn compute(&self, task: &RenderTask) -> Result<Vec<u8>, KernelError> {
        if task.scaling == 0 {
            return Err(KernelError::new("scaling factor must be >= 1"));
        }

        let width = task.resolution.width as usize;
        let band_height = task.tile.height as usize;
        let stride = task.scaling as usize;
        let particle_x = task.viewport.particle_x(task.resolution);
        let particle_y = task.viewport.particle_y(task.resolution);
        let smooth = task.smoothing();
        let seed = Complex::new(task.fractal.seed[0], task.fractal.seed[1]);

        let mut pixels = vec![0u8; task.expected_len()];

        let mut row = 0;
        while row < band_height {
            let frame_y = task.tile.y_offset as usize + row;
            let im = task.viewport.y_min + (frame_y as f64 + 0.5) * particle_y;

            let mut col = 0;
            while col < width {
                let re = task.viewport.x_min + (col as f64 + 0.5) * particle_x;
                let point = Complex::new(re, im);

                let escape = match task.fractal.kind {
                    FractalKind::Mandelbrot => iterate_mandelbrot(point, task.max_iterations),
                    FractalKind::Julia => iterate_julia(point, seed, task.max_iterations),
                };
                let rgba = color::colorize(escape, task.max_iterations, &task.color, smooth);

                fill_block(&mut pixels, width, band_height, row, col, stride, rgba);
                col += stride;
            }
            row += stride;
        }

        Ok(pixels)
    }
}

/// Replicate one sampled color across its stride block, clipped to the band.
fn fill_block(
    pixels: &mut [u8],
    width: usize,
    band_height: usize,
    row: usize,
    col: usize,
    stride: usize,
    rgba: [u8; 4],
) {
    let row_end = (row + stride).min(band_height);
    let col_end = (col + stride).min(width);
    for r in row..row_end {
        let line = r * width * 4;
        for c in col..col_end {
            pixels[line + c * 4..line + c * 4 + 4].copy_from_slice(&rgba);
        }
    }
}

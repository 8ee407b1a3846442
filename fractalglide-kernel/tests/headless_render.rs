use fractalglide_core::{
    partition_bands, ColorParams, ComputeKernel, FractalParams, RenderTask, Resolution, Viewport,
};
use fractalglide_kernel::EscapeTimeKernel;

/// Render every band of a frame and assemble the buffers in tile order.
fn render_frame(
    resolution: Resolution,
    fractal: FractalParams,
    bands: u32,
    scaling: u32,
) -> Vec<u8> {
    let mut frame = Vec::with_capacity(resolution.pixel_count() * 4);
    for tile in partition_bands(resolution.height, bands).unwrap() {
        let task = RenderTask {
            resolution,
            viewport: Viewport::initial(resolution.aspect_ratio()),
            fractal,
            color: ColorParams::default(),
            scaling,
            max_iterations: 256,
            tile,
            is_full_res: scaling == 1,
            generation: 0,
        };
        frame.extend(EscapeTimeKernel.compute(&task).unwrap());
    }
    frame
}

#[test]
fn headless_mandelbrot_frame() {
    let resolution = Resolution::new(100, 80).unwrap();
    let frame = render_frame(resolution, FractalParams::default(), 4, 1);

    assert_eq!(frame.len(), resolution.pixel_count() * 4);

    // The default window frames the whole set, so the frame must contain
    // both interior (black) and escaped (colored) pixels.
    let interior = frame
        .chunks_exact(4)
        .filter(|px| px[0] == 0 && px[1] == 0 && px[2] == 0)
        .count();
    let escaped = frame
        .chunks_exact(4)
        .filter(|px| px[0] > 0 || px[1] > 0 || px[2] > 0)
        .count();

    assert!(interior > 0, "should have some interior pixels");
    assert!(escaped > 0, "should have some escaped pixels");
    assert_eq!(interior + escaped, resolution.pixel_count());
}

#[test]
fn headless_julia_frame() {
    let resolution = Resolution::new(100, 80).unwrap();
    let frame = render_frame(resolution, FractalParams::julia(-0.7, 0.27015), 4, 1);

    let escaped = frame
        .chunks_exact(4)
        .filter(|px| px[0] > 0 || px[1] > 0 || px[2] > 0)
        .count();
    assert!(escaped > 0, "this seed's filled set does not cover the window");
    assert!(escaped < resolution.pixel_count(), "and is not empty either");
}

#[test]
fn band_split_does_not_change_the_image() {
    let resolution = Resolution::new(100, 80).unwrap();

    // Band heights (80/4 = 20) are multiples of the stride, so the sample
    // anchors land on the same frame rows in both renders.
    for scaling in [1, 5] {
        let whole = render_frame(resolution, FractalParams::default(), 1, scaling);
        let split = render_frame(resolution, FractalParams::default(), 4, scaling);
        assert_eq!(whole, split, "scaling {scaling}");
    }
}

#[test]
fn headless_render_is_deterministic() {
    let resolution = Resolution::new(80, 60).unwrap();
    let run1 = render_frame(resolution, FractalParams::default(), 4, 1);
    let run2 = render_frame(resolution, FractalParams::default(), 4, 1);
    assert_eq!(run1, run2, "two identical renders must produce identical frames");
}

//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use fractalglide_core::FractalKind;

use crate::error::EngineError;
use crate::state::RendererState;
use crate::surface::FrameSurface;

/// Write the current surface as a PNG file with the render parameters
/// embedded as tEXt chunks, readable by exiftool and most image viewers.
pub fn export_png(
    surface: &FrameSurface,
    state: &RendererState,
    path: &Path,
) -> crate::Result<()> {
    let resolution = surface.resolution();
    let file = std::fs::File::create(path)
        .map_err(|e| EngineError::Export(format!("failed to create file: {e}")))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, resolution.width, resolution.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    for (key, value) in metadata_pairs(state) {
        encoder
            .add_text_chunk(key.clone(), value)
            .map_err(|e| EngineError::Export(format!("failed to add text chunk '{key}': {e}")))?;
    }

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| EngineError::Export(format!("failed to write PNG header: {e}")))?;
    png_writer
        .write_image_data(surface.pixels())
        .map_err(|e| EngineError::Export(format!("failed to write PNG image data: {e}")))?;

    debug!(
        width = resolution.width,
        height = resolution.height,
        path = %path.display(),
        "exported frame"
    );
    Ok(())
}

fn metadata_pairs(state: &RendererState) -> Vec<(String, String)> {
    let vp = state.viewport;
    let mut pairs = vec![
        ("Software".into(), "fractalglide".into()),
        ("FractalGlide.Kind".into(), state.fractal.kind.label().into()),
        ("FractalGlide.XMin".into(), format!("{}", vp.x_min)),
        ("FractalGlide.XMax".into(), format!("{}", vp.x_max)),
        ("FractalGlide.YMin".into(), format!("{}", vp.y_min)),
        ("FractalGlide.YMax".into(), format!("{}", vp.y_max)),
        (
            "FractalGlide.MaxIterations".into(),
            state.max_iterations.get().to_string(),
        ),
        (
            "FractalGlide.Resolution".into(),
            format!("{}x{}", state.resolution.width, state.resolution.height),
        ),
    ];
    if state.fractal.kind == FractalKind::Julia {
        pairs.push(("FractalGlide.SeedRe".into(), format!("{}", state.fractal.seed[0])));
        pairs.push(("FractalGlide.SeedIm".into(), format!("{}", state.fractal.seed[1])));
    }
    pairs
}

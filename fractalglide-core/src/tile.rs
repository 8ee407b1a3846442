use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A horizontal band of the output frame, assigned to one worker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Position of this band in the partition, `0..band_count`.
    pub index: u32,
    /// Total number of bands the frame was split into.
    pub band_count: u32,
    /// Pixel row of the band's top edge.
    pub y_offset: u32,
    /// Band height in pixel rows (the last band absorbs the remainder).
    pub height: u32,
}

impl Tile {
    /// Number of pixels in this band for a frame `width` pixels wide.
    #[inline]
    pub fn pixel_count(&self, width: u32) -> usize {
        self.height as usize * width as usize
    }
}

/// Split `height` pixel rows into `bands` contiguous horizontal bands.
///
/// Deterministic and side-effect free: offsets are contiguous, heights sum to
/// `height`, and the remainder rows (`height % bands`) go to the final band.
pub fn partition_bands(height: u32, bands: u32) -> crate::Result<Vec<Tile>> {
    if bands == 0 {
        return Err(CoreError::InvalidBandCount(bands));
    }

    let base = height / bands;
    let mut tiles = Vec::with_capacity(bands as usize);
    for index in 0..bands {
        let last = index == bands - 1;
        tiles.push(Tile {
            index,
            band_count: bands,
            y_offset: index * base,
            height: if last { height - index * base } else { base },
        });
    }
    Ok(tiles)
}

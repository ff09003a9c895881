use crate::{
    assets::raster::Raster,
    foundation::{error::HolocardResult, math::Fnv1a64},
};

/// A rendered 2D frame as RGBA8 pixels.
///
/// Frames are premultiplied alpha; the flag makes that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Content hash; equal inputs to the renderer give equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(u64::from(self.width));
        h.write_u64(u64::from(self.height));
        h.write_u8(u8::from(self.premultiplied));
        h.write_bytes(&self.data);
        h.finish()
    }

    /// Snapshot export as PNG.
    pub fn encode_png(&self) -> HolocardResult<Vec<u8>> {
        let raster = if self.premultiplied {
            Raster::from_premul_rgba8(self.width, self.height, self.data.clone())?
        } else {
            Raster::from_straight_rgba8(self.width, self.height, self.data.clone())?
        };
        raster.encode_png()
    }
}

use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::{
    assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    foundation::core::Rgba8Premul,
    foundation::error::{HolocardError, HolocardResult},
    foundation::math::premul_over_px,
};

/// Raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Raster {
    /// Wrap already-premultiplied bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, bytes: Vec<u8>) -> HolocardResult<Self> {
        if width == 0 || height == 0 {
            return Err(HolocardError::validation(format!(
                "raster size must be > 0 (got {width}x{height})"
            )));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if bytes.len() != expected {
            return Err(HolocardError::validation(format!(
                "raster byte len mismatch: expected {expected}, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        })
    }

    /// Premultiply straight RGBA8 bytes.
    pub fn from_straight_rgba8(
        width: u32,
        height: u32,
        mut bytes: Vec<u8>,
    ) -> HolocardResult<Self> {
        premultiply_rgba8_in_place(&mut bytes);
        Self::from_premul_rgba8(width, height, bytes)
    }

    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> HolocardResult<Self> {
        let n = (width as usize).saturating_mul(height as usize);
        let mut bytes = Vec::with_capacity(n.saturating_mul(4));
        for _ in 0..n {
            bytes.extend_from_slice(&color.to_array());
        }
        Self::from_premul_rgba8(width, height, bytes)
    }

    /// Top-to-bottom linear gradient between two straight RGBA colors.
    pub fn vertical_gradient(
        width: u32,
        height: u32,
        top: [u8; 4],
        bottom: [u8; 4],
    ) -> HolocardResult<Self> {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        let mut bytes = vec![0u8; len];
        let h1 = (height.max(1) - 1) as f32;
        for y in 0..height {
            let t = if h1 <= 0.0 { 0.0 } else { (y as f32) / h1 };
            let lerp = |a: u8, b: u8| -> u8 {
                let af = a as f32;
                let bf = b as f32;
                (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
            };
            let c = Rgba8Premul::from_straight_rgba(
                lerp(top[0], bottom[0]),
                lerp(top[1], bottom[1]),
                lerp(top[2], bottom[2]),
                lerp(top[3], bottom[3]),
            )
            .to_array();
            let row = (y as usize) * (width as usize) * 4;
            for x in 0..width as usize {
                bytes[row + x * 4..row + x * 4 + 4].copy_from_slice(&c);
            }
        }
        Self::from_premul_rgba8(width, height, bytes)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Resample to `width`x`height`. Filtering in premultiplied space avoids dark fringes.
    pub fn resized(&self, width: u32, height: u32) -> HolocardResult<Self> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let src = image::RgbaImage::from_raw(self.width, self.height, self.rgba8_premul.to_vec())
            .ok_or_else(|| HolocardError::validation("raster buffer does not match its size"))?;
        let out = image::imageops::resize(
            &src,
            width.max(1),
            height.max(1),
            image::imageops::FilterType::Triangle,
        );
        let (w, h) = out.dimensions();
        Self::from_premul_rgba8(w, h, out.into_raw())
    }

    /// Source-over `src` onto `self` with its top-left at `(x, y)`; pixels outside are clipped.
    pub fn draw_over(&mut self, src: &Raster, x: i32, y: i32, opacity: f32) {
        if opacity <= 0.0 {
            return;
        }
        let dst_w = self.width as i64;
        let dst_h = self.height as i64;
        let x0 = i64::from(x).max(0);
        let y0 = i64::from(y).max(0);
        let x1 = (i64::from(x) + i64::from(src.width)).min(dst_w);
        let y1 = (i64::from(y) + i64::from(src.height)).min(dst_h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let dst = Arc::make_mut(&mut self.rgba8_premul);
        for dy in y0..y1 {
            let sy = (dy - i64::from(y)) as usize;
            for dx in x0..x1 {
                let sx = (dx - i64::from(x)) as usize;
                let si = (sy * src.width as usize + sx) * 4;
                let di = (dy as usize * self.width as usize + dx as usize) * 4;
                let s = [
                    src.rgba8_premul[si],
                    src.rgba8_premul[si + 1],
                    src.rgba8_premul[si + 2],
                    src.rgba8_premul[si + 3],
                ];
                let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
                dst[di..di + 4].copy_from_slice(&premul_over_px(d, s, opacity));
            }
        }
    }

    /// Encode as PNG (straight alpha, as PNG expects).
    pub fn encode_png(&self) -> HolocardResult<Vec<u8>> {
        let mut straight = self.rgba8_premul.to_vec();
        unpremultiply_rgba8_in_place(&mut straight);
        let img = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| HolocardError::validation("raster buffer does not match its size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode raster as png")?;
        Ok(buf)
    }
}

/// Scale `(width, height)` so the longer side equals `target`, preserving aspect ratio.
pub(crate) fn fit_longer_side(width: u32, height: u32, target: u32) -> (u32, u32) {
    let longer = width.max(height).max(1);
    let s = f64::from(target) / f64::from(longer);
    let w = (f64::from(width) * s).round().max(1.0) as u32;
    let h = (f64::from(height) * s).round().max(1.0) as u32;
    (w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;

use crate::{
    document::model::BlendMode,
    extract::decoder::{DecodedDocument, DecodedLayer, LayeredDecoder},
    foundation::error::{HolocardError, HolocardResult},
};

/// [`LayeredDecoder`] backed by the `psd` crate.
///
/// Layers are reported in file order, which for Photoshop documents is bottom-most first.
#[derive(Clone, Copy, Debug, Default)]
pub struct PsdDecoder;

impl LayeredDecoder for PsdDecoder {
    fn decode(&self, bytes: &[u8]) -> HolocardResult<DecodedDocument> {
        let psd = psd::Psd::from_bytes(bytes)
            .map_err(|e| HolocardError::decode(format!("psd parse failed: {e:?}")))?;
        let (width, height) = (psd.width(), psd.height());
        if width == 0 || height == 0 {
            return Err(HolocardError::decode(format!(
                "psd has empty canvas {width}x{height}"
            )));
        }

        let composite = Some(psd.rgba()).filter(|c| c.len() == rgba_len(width, height));

        let layers = psd
            .layers()
            .iter()
            .map(|layer| {
                let left = layer.layer_left();
                let top = layer.layer_top();
                let w = u32::from(layer.width());
                let h = u32::from(layer.height());
                DecodedLayer {
                    name: layer.name().to_string(),
                    left,
                    top,
                    right: left.saturating_add(w as i32),
                    bottom: top.saturating_add(h as i32),
                    opacity: f64::from(layer.opacity()) / 255.0,
                    visible: layer.visible(),
                    // The decoder's blend enum is not re-exported, so map its Debug name.
                    blend_mode: blend_mode_from_name(&format!("{:?}", layer.blend_mode())),
                    rgba: layer_pixels(layer.rgba(), width, height, left, top, w, h),
                }
            })
            .collect();

        Ok(DecodedDocument {
            width,
            height,
            composite,
            layers,
        })
    }
}

pub(crate) fn blend_mode_from_name(name: &str) -> BlendMode {
    match name {
        "Multiply" => BlendMode::Multiply,
        "Screen" => BlendMode::Screen,
        "Overlay" => BlendMode::Overlay,
        "Darken" => BlendMode::Darken,
        "Lighten" => BlendMode::Lighten,
        "ColorDodge" => BlendMode::ColorDodge,
        "ColorBurn" => BlendMode::ColorBurn,
        "HardLight" => BlendMode::HardLight,
        "SoftLight" => BlendMode::SoftLight,
        "Difference" => BlendMode::Difference,
        "Exclusion" => BlendMode::Exclusion,
        "Hue" => BlendMode::Hue,
        "Saturation" => BlendMode::Saturation,
        "Color" => BlendMode::Color,
        "Luminosity" => BlendMode::Luminosity,
        _ => BlendMode::Normal,
    }
}

fn rgba_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

/// Normalize a layer buffer to layer-local `w`x`h` straight RGBA.
///
/// Accepts either a canvas-sized buffer (cropped to the layer rectangle; pixels outside the
/// canvas become transparent) or an already layer-sized buffer.
pub(crate) fn layer_pixels(
    buf: Vec<u8>,
    canvas_w: u32,
    canvas_h: u32,
    left: i32,
    top: i32,
    w: u32,
    h: u32,
) -> Option<Vec<u8>> {
    if w == 0 || h == 0 {
        return None;
    }
    if buf.len() == rgba_len(canvas_w, canvas_h) {
        let mut out = vec![0u8; rgba_len(w, h)];
        for y in 0..h {
            let cy = i64::from(top) + i64::from(y);
            if cy < 0 || cy >= i64::from(canvas_h) {
                continue;
            }
            for x in 0..w {
                let cx = i64::from(left) + i64::from(x);
                if cx < 0 || cx >= i64::from(canvas_w) {
                    continue;
                }
                let si = ((cy as usize) * (canvas_w as usize) + cx as usize) * 4;
                let di = ((y as usize) * (w as usize) + x as usize) * 4;
                out[di..di + 4].copy_from_slice(&buf[si..si + 4]);
            }
        }
        return Some(out);
    }
    if buf.len() == rgba_len(w, h) {
        return Some(buf);
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/extract/psd.rs"]
mod tests;

use std::sync::{Arc, OnceLock};

use crate::{
    assets::decode::parse_svg,
    assets::raster::Raster,
    foundation::error::{HolocardError, HolocardResult},
};

static SYSTEM_FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    SYSTEM_FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

/// Gradient card with `label` centred on it. Text is skipped silently if no fonts are installed.
pub fn labeled_placeholder(
    width: u32,
    height: u32,
    top: [u8; 4],
    bottom: [u8; 4],
    label: &str,
) -> HolocardResult<Raster> {
    let svg = placeholder_svg(width, height, top, bottom, label);
    let tree = parse_svg(svg.as_bytes(), system_fontdb())?;
    let rgba = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    Raster::from_premul_rgba8(width, height, rgba)
}

pub(crate) fn placeholder_svg(
    width: u32,
    height: u32,
    top: [u8; 4],
    bottom: [u8; 4],
    label: &str,
) -> String {
    let stop = |c: [u8; 4]| {
        format!(
            r#"stop-color="rgb({},{},{})" stop-opacity="{:.3}""#,
            c[0],
            c[1],
            c[2],
            f32::from(c[3]) / 255.0
        )
    };
    let font_size = (width.min(height) / 20).clamp(10, 32);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
<defs><linearGradient id="bg" x1="0" y1="0" x2="0" y2="1"><stop offset="0" {top}/><stop offset="1" {bottom}/></linearGradient></defs>
<rect x="0" y="0" width="{width}" height="{height}" fill="url(#bg)"/>
<text x="{cx}" y="{cy}" text-anchor="middle" font-family="sans-serif" font-size="{font_size}" fill="white">{label}</text>
</svg>"#,
        top = stop(top),
        bottom = stop(bottom),
        cx = width / 2,
        cy = height / 2,
        label = escape_xml(label),
    )
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> HolocardResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| HolocardError::validation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

use std::sync::Arc;

use crate::{
    analysis::analyzer::LayerAnalysis,
    assets::{raster::Raster, store::RasterSource},
    config::RenderConfig,
    document::{
        model::{LayerImageRef, LayerRole, ProcessedDocument, ProcessedLayer},
        view_state::ViewState,
    },
    foundation::{
        core::{Affine, Rect},
        error::{HolocardError, HolocardResult},
    },
    navigation::transform::ViewTransform,
    render2d::frame::FrameRGBA,
};

/// 2D presentation of a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Real layer pixels, dashed outline on the selection, optional reference grid.
    #[default]
    Inspect,
    /// Flat content/design rectangles instead of pixels.
    Frame,
    /// Inspect plus a fixed construction grid over the document.
    Build,
}

const SELECTION_RGBA: [u8; 4] = [0, 170, 255, 255];
const CONTENT_RGBA: [u8; 4] = [74, 144, 226, 255];
const DESIGN_RGBA: [u8; 4] = [245, 166, 35, 255];
const PLACEHOLDER_RGBA: [u8; 4] = [128, 128, 128, 64];
const REFERENCE_GRID_RGBA: [u8; 4] = [255, 255, 255, 24];
const BUILD_GRID_RGBA: [u8; 4] = [0, 200, 140, 110];
const LINE_PX: f64 = 1.0;
const OUTLINE_PX: f64 = 2.0;

/// CPU renderer for the inspect, frame and build views.
///
/// Owns its drawing context; one renderer per viewer.
pub struct Renderer2d {
    config: RenderConfig,
    width: u16,
    height: u16,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Renderer2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer2d")
            .field("config", &self.config)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Renderer2d {
    pub fn new(config: RenderConfig, width: u32, height: u32) -> HolocardResult<Self> {
        let (width, height) = surface_size(width, height)?;
        Ok(Self {
            config,
            width,
            height,
            ctx: None,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    pub fn resize(&mut self, width: u32, height: u32) -> HolocardResult<()> {
        let (w, h) = surface_size(width, height)?;
        if (w, h) != (self.width, self.height) {
            self.width = w;
            self.height = h;
            self.ctx = None;
        }
        Ok(())
    }

    /// Paint one frame. Layers are drawn in effective paint order; a layer whose raster cannot
    /// be loaded or drawn is skipped with a warning.
    #[tracing::instrument(skip_all, fields(mode = ?mode, layers = doc.layers.len()))]
    pub fn render(
        &mut self,
        doc: &ProcessedDocument,
        analysis: &[LayerAnalysis],
        transform: &ViewTransform,
        view: &ViewState,
        mode: ViewMode,
        rasters: &dyn RasterSource,
    ) -> HolocardResult<FrameRGBA> {
        let (width, height) = (self.width, self.height);
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let pass = Pass {
            config: &self.config,
            doc,
            analysis,
            transform,
            view,
            mode,
            screen: Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
        };
        pass.draw(&mut ctx, rasters);

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: u32::from(width),
            height: u32::from(height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn surface_size(width: u32, height: u32) -> HolocardResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| HolocardError::validation("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| HolocardError::validation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(HolocardError::validation(format!(
            "surface size must be > 0 (got {width}x{height})"
        )));
    }
    Ok((w, h))
}

/// Per-layer opacity multiplier from selection and hover, composed multiplicatively and
/// capped at 1. The layer's authored opacity is applied on top by the caller.
pub fn emphasis(
    config: &RenderConfig,
    view: &ViewState,
    layer: &ProcessedLayer,
    mode: ViewMode,
) -> f32 {
    let selected = view.selected.as_ref() == Some(&layer.id);
    let hovered = view.hovered.as_ref() == Some(&layer.id);

    let selection = if selected {
        1.0
    } else if mode == ViewMode::Frame || view.selected.is_some() {
        config.dimmed_alpha
    } else {
        1.0
    };
    let hover = if hovered && !selected {
        config.hover_boost
    } else {
        1.0
    };
    (selection * hover).clamp(0.0, 1.0)
}

struct Pass<'a> {
    config: &'a RenderConfig,
    doc: &'a ProcessedDocument,
    analysis: &'a [LayerAnalysis],
    transform: &'a ViewTransform,
    view: &'a ViewState,
    mode: ViewMode,
    screen: Rect,
}

impl Pass<'_> {
    fn draw(&self, ctx: &mut vello_cpu::RenderContext, rasters: &dyn RasterSource) {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        fill(ctx, self.screen, straight(self.config.workspace_rgba));

        for (index, layer) in self.view.paint_order(self.doc) {
            if !self.view.is_effectively_visible(layer) {
                continue;
            }
            let alpha = (layer.opacity as f32) * emphasis(self.config, self.view, layer, self.mode);
            if alpha <= 0.0 {
                continue;
            }
            match self.mode {
                ViewMode::Frame => self.draw_structure(ctx, index, layer, alpha),
                ViewMode::Inspect | ViewMode::Build => match &layer.image {
                    Some(image) => {
                        if let Err(e) = self.draw_image(ctx, layer, image, alpha, rasters) {
                            tracing::warn!(layer = %layer.id, error = %e, "skipping layer paint");
                        }
                    }
                    None => self.draw_placeholder(ctx, layer, alpha),
                },
            }
        }

        match self.mode {
            ViewMode::Inspect if self.config.show_reference_grid => self.draw_reference_grid(ctx),
            ViewMode::Build => self.draw_build_grid(ctx),
            _ => {}
        }
        if self.mode != ViewMode::Frame {
            self.draw_selection_outline(ctx);
        }
    }

    fn layer_affine(&self, layer: &ProcessedLayer) -> vello_cpu::kurbo::Affine {
        let b = layer.bounds;
        let a = self.transform.to_affine()
            * Affine::translate((f64::from(b.left), f64::from(b.top)));
        affine_to_cpu(a)
    }

    fn draw_image(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        layer: &ProcessedLayer,
        image: &LayerImageRef,
        alpha: f32,
        rasters: &dyn RasterSource,
    ) -> HolocardResult<()> {
        let raster = rasters.load(&image.preview)?;
        let paint = image_paint(&raster)?;

        // The preview may be resampled; stretch it back over the layer's document bounds.
        let b = layer.bounds;
        let sx = f64::from(b.width()) / f64::from(raster.width);
        let sy = f64::from(b.height()) / f64::from(raster.height);
        let a = self.transform.to_affine()
            * Affine::translate((f64::from(b.left), f64::from(b.top)))
            * Affine::scale_non_uniform(sx, sy);

        ctx.set_transform(affine_to_cpu(a));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        with_opacity(ctx, alpha, |ctx| {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(raster.width),
                f64::from(raster.height),
            ));
        });
        Ok(())
    }

    fn draw_placeholder(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        layer: &ProcessedLayer,
        alpha: f32,
    ) {
        if layer.bounds.is_empty() {
            return;
        }
        ctx.set_transform(self.layer_affine(layer));
        ctx.set_paint(straight(PLACEHOLDER_RGBA));
        with_opacity(ctx, alpha, |ctx| {
            ctx.fill_rect(&local_rect(layer));
        });
    }

    fn draw_structure(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        index: usize,
        layer: &ProcessedLayer,
        alpha: f32,
    ) {
        if layer.bounds.is_empty() {
            return;
        }
        let category = self
            .analysis
            .get(index)
            .filter(|a| a.layer_id == layer.id)
            .or_else(|| self.analysis.iter().find(|a| a.layer_id == layer.id))
            .map(|a| a.semantic.category)
            .unwrap_or(layer.semantic_type);
        let color = match category.role() {
            LayerRole::Content => CONTENT_RGBA,
            LayerRole::Design => DESIGN_RGBA,
        };
        ctx.set_transform(self.layer_affine(layer));
        ctx.set_paint(straight(color));
        with_opacity(ctx, alpha, |ctx| {
            ctx.fill_rect(&local_rect(layer));
        });
    }

    fn draw_selection_outline(&self, ctx: &mut vello_cpu::RenderContext) {
        let Some(layer) = self.view.selected.as_ref().and_then(|id| self.doc.layer(id)) else {
            return;
        };
        if !self.view.is_effectively_visible(layer) {
            return;
        }
        let r = screen_rect(self.transform, layer.bounds.to_rect());
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for seg in dashed_rect(r, self.config.dash_px, OUTLINE_PX) {
            fill(ctx, seg, straight(SELECTION_RGBA));
        }
    }

    fn draw_reference_grid(&self, ctx: &mut vello_cpu::RenderContext) {
        let step = self.config.reference_grid_px;
        if step <= 0.0 {
            return;
        }
        let (w, h) = (f64::from(self.doc.width), f64::from(self.doc.height));
        let xs = (0u32..).map(|i| f64::from(i) * step).take_while(|x| *x <= w);
        let ys = (0u32..).map(|i| f64::from(i) * step).take_while(|y| *y <= h);
        self.draw_grid_lines(ctx, xs.collect(), ys.collect(), REFERENCE_GRID_RGBA);
    }

    fn draw_build_grid(&self, ctx: &mut vello_cpu::RenderContext) {
        let n = self.config.build_grid_divisions.max(1);
        let (w, h) = (f64::from(self.doc.width), f64::from(self.doc.height));
        let xs = (0..=n).map(|i| w * f64::from(i) / f64::from(n)).collect();
        let ys = (0..=n).map(|i| h * f64::from(i) / f64::from(n)).collect();
        self.draw_grid_lines(ctx, xs, ys, BUILD_GRID_RGBA);
    }

    /// Hairlines at document coordinates, one screen pixel wide at any zoom.
    fn draw_grid_lines(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        xs: Vec<f64>,
        ys: Vec<f64>,
        rgba: [u8; 4],
    ) {
        let doc = screen_rect(self.transform, self.doc.bounds_rect());
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let color = straight(rgba);
        for x in xs {
            let sx = self.transform.document_to_screen((x, 0.0).into()).x;
            fill(ctx, Rect::new(sx - LINE_PX / 2.0, doc.y0, sx + LINE_PX / 2.0, doc.y1), color);
        }
        for y in ys {
            let sy = self.transform.document_to_screen((0.0, y).into()).y;
            fill(ctx, Rect::new(doc.x0, sy - LINE_PX / 2.0, doc.x1, sy + LINE_PX / 2.0), color);
        }
    }
}

fn local_rect(layer: &ProcessedLayer) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(layer.bounds.width()),
        f64::from(layer.bounds.height()),
    )
}

fn screen_rect(t: &ViewTransform, r: Rect) -> Rect {
    let p0 = t.document_to_screen(r.origin());
    let p1 = t.document_to_screen((r.x1, r.y1).into());
    Rect::from_points(p0, p1)
}

/// Dash segments along the four edges of `r`, each `thickness` wide, centred on the edge.
pub(crate) fn dashed_rect(r: Rect, dash: f64, thickness: f64) -> Vec<Rect> {
    let dash = dash.max(1.0);
    let half = thickness / 2.0;
    let mut out = Vec::new();
    let mut run = |from: f64, to: f64, horizontal: bool, at: f64| {
        let mut s = from;
        while s < to {
            let e = (s + dash).min(to);
            out.push(if horizontal {
                Rect::new(s, at - half, e, at + half)
            } else {
                Rect::new(at - half, s, at + half, e)
            });
            s += dash * 2.0;
        }
    };
    run(r.x0, r.x1, true, r.y0);
    run(r.x0, r.x1, true, r.y1);
    run(r.y0, r.y1, false, r.x0);
    run(r.y0, r.y1, false, r.x1);
    out
}

fn fill(ctx: &mut vello_cpu::RenderContext, r: Rect, color: vello_cpu::peniko::Color) {
    ctx.set_paint(color);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1));
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f32,
    f: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    let o = opacity.clamp(0.0, 1.0);
    if o < 1.0 {
        ctx.push_opacity_layer(o);
        f(ctx);
        ctx.pop_layer();
    } else {
        f(ctx);
    }
}

fn straight(rgba: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(raster: &Arc<Raster>) -> HolocardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&raster.rgba8_premul, raster.width, raster.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> HolocardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| HolocardError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| HolocardError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(HolocardError::validation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render2d/renderer.rs"]
mod tests;

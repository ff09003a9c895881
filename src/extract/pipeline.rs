use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use crate::{
    analysis::classify::{KeywordClassifier, LayerClassifier},
    assets::{
        placeholder::labeled_placeholder,
        raster::{Raster, fit_longer_side},
        store::{AssetKey, RasterStore},
    },
    config::ExtractionConfig,
    document::model::{
        DocumentId, LayerBounds, LayerId, LayerImageRef, ProcessedDocument, ProcessedLayer,
    },
    extract::{
        archive::{ArchiveSink, best_effort},
        decoder::{DecodedDocument, DecodedLayer, LayeredDecoder},
    },
    foundation::{
        core::Rgba8Premul,
        error::{HolocardError, HolocardResult},
        math::Fnv1a64,
    },
};

/// The single user-visible notification raised when a file could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionNotice {
    pub filename: String,
    pub reason: String,
}

/// Rasters produced for one layer, in paint order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerImage {
    pub layer_id: LayerId,
    pub preview: AssetKey,
    pub thumbnail: AssetKey,
}

/// Result of [`Extractor::extract`]. Always usable; possibly degraded.
#[derive(Clone, Debug)]
pub struct ExtractionOutput {
    pub document: ProcessedDocument,
    /// Every raster referenced by `document` and `layer_images`.
    pub rasters: RasterStore,
    /// Empty when decoding failed.
    pub layer_images: Vec<LayerImage>,
    /// Set only for a decode failure.
    pub notice: Option<ExtractionNotice>,
}

impl ExtractionOutput {
    pub fn flattened_image(&self) -> &AssetKey {
        &self.document.flattened
    }

    pub fn thumbnail(&self) -> &AssetKey {
        &self.document.thumbnail
    }

    pub fn is_degraded(&self) -> bool {
        self.notice.is_some()
    }
}

/// Orchestrates decoding, per-layer rasterization, compositing and fallback.
pub struct Extractor<D> {
    decoder: D,
    config: ExtractionConfig,
    classifier: Arc<dyn LayerClassifier>,
    archive: Option<Box<dyn ArchiveSink>>,
}

impl<D: LayeredDecoder> Extractor<D> {
    pub fn new(decoder: D, config: ExtractionConfig) -> Self {
        Self {
            decoder,
            config,
            classifier: Arc::new(KeywordClassifier),
            archive: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn LayerClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_archive(mut self, sink: Box<dyn ArchiveSink>) -> Self {
        self.archive = Some(sink);
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Decode `bytes` into a document. Never fails: undecodable input yields a placeholder
    /// document with no layers and a notice.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn extract(&mut self, bytes: &[u8], filename: &str) -> ExtractionOutput {
        let archive = self
            .archive
            .as_mut()
            .map(|sink| &mut **sink as &mut dyn ArchiveSink);
        run(
            &self.decoder,
            self.classifier.as_ref(),
            &self.config,
            archive,
            bytes,
            filename,
        )
    }
}

/// One-shot extraction with the keyword classifier.
pub fn extract(
    decoder: &dyn LayeredDecoder,
    bytes: &[u8],
    filename: &str,
    config: &ExtractionConfig,
    archive: Option<&mut dyn ArchiveSink>,
) -> ExtractionOutput {
    run(decoder, &KeywordClassifier, config, archive, bytes, filename)
}

fn run(
    decoder: &dyn LayeredDecoder,
    classifier: &dyn LayerClassifier,
    config: &ExtractionConfig,
    mut archive: Option<&mut dyn ArchiveSink>,
    bytes: &[u8],
    filename: &str,
) -> ExtractionOutput {
    if let Some(sink) = archive.as_deref_mut() {
        best_effort("original", || sink.archive_original(filename, bytes));
    }

    let doc_id = document_id(bytes, filename);
    let built = decode_guarded(decoder, bytes).and_then(|decoded| {
        LayerBuilder {
            config,
            classifier,
            doc_id,
        }
        .build(decoded, filename)
    });

    match built {
        Ok(out) => {
            tracing::info!(
                document = %out.document.id,
                layers = out.document.layers.len(),
                with_images = out.layer_images.len(),
                "extraction complete"
            );
            if let Some(sink) = archive {
                best_effort("layers", || sink.archive_layers(&out.document, &out.rasters));
            }
            out
        }
        Err(e) => {
            tracing::warn!(filename, error = %e, "decode failed; using placeholder document");
            fallback(config, doc_id, filename, e.to_string())
        }
    }
}

/// Third-party decoders may panic on hostile input; treat that as a decode failure.
fn decode_guarded(decoder: &dyn LayeredDecoder, bytes: &[u8]) -> HolocardResult<DecodedDocument> {
    catch_unwind(AssertUnwindSafe(|| decoder.decode(bytes)))
        .unwrap_or_else(|_| Err(HolocardError::decode("decoder panicked")))
}

pub(crate) fn document_id(bytes: &[u8], filename: &str) -> DocumentId {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(filename.as_bytes());
    h.write_u8(0);
    h.write_u64(bytes.len() as u64);
    h.write_bytes(bytes);
    DocumentId(h.finish())
}

fn flattened_key(doc: DocumentId) -> AssetKey {
    AssetKey::new(format!("{doc}/flattened"))
}

fn thumbnail_key(doc: DocumentId) -> AssetKey {
    AssetKey::new(format!("{doc}/thumbnail"))
}

fn layer_keys(doc: DocumentId, layer: &LayerId) -> LayerImageRef {
    LayerImageRef {
        preview: AssetKey::new(format!("{doc}/layers/{layer}/preview")),
        thumbnail: AssetKey::new(format!("{doc}/layers/{layer}/thumbnail")),
    }
}

/// Preview size: upscale below `min_visible_px`, downscale above `max_preview_px`.
pub fn preview_size(width: u32, height: u32, config: &ExtractionConfig) -> (u32, u32) {
    let longer = width.max(height);
    if longer < config.min_visible_px {
        fit_longer_side(width, height, config.min_visible_px)
    } else if longer > config.max_preview_px {
        fit_longer_side(width, height, config.max_preview_px)
    } else {
        (width, height)
    }
}

/// Thumbnails always land on `thumbnail_px`, upscaling small layers so they stay legible.
pub fn thumbnail_size(width: u32, height: u32, config: &ExtractionConfig) -> (u32, u32) {
    fit_longer_side(width, height, config.thumbnail_px)
}

struct LayerRasters {
    natural: Raster,
    preview: Raster,
    thumbnail: Raster,
}

struct LayerBuilder<'a> {
    config: &'a ExtractionConfig,
    classifier: &'a dyn LayerClassifier,
    doc_id: DocumentId,
}

impl LayerBuilder<'_> {
    fn build(&self, decoded: DecodedDocument, filename: &str) -> HolocardResult<ExtractionOutput> {
        let DecodedDocument {
            width,
            height,
            composite,
            layers: decoded_layers,
        } = decoded;
        if width == 0 || height == 0 {
            return Err(HolocardError::decode(format!(
                "decoded canvas is empty ({width}x{height})"
            )));
        }

        let mut rasters = RasterStore::new();
        let mut layers = Vec::with_capacity(decoded_layers.len());
        let mut layer_images = Vec::new();
        let mut painted: Vec<(LayerBounds, f64, Raster)> = Vec::new();

        for (index, dl) in decoded_layers.into_iter().enumerate() {
            let id = LayerId::new(format!("layer-{index}"));
            let bounds = LayerBounds::clamped(dl.left, dl.top, dl.right, dl.bottom);
            let opacity = if dl.opacity.is_finite() {
                dl.opacity.clamp(0.0, 1.0)
            } else {
                1.0
            };

            let mut image = None;
            if dl.visible {
                match self.layer_rasters(&dl, bounds) {
                    Ok(Some(r)) => {
                        let keys = layer_keys(self.doc_id, &id);
                        rasters.insert(keys.preview.clone(), r.preview);
                        rasters.insert(keys.thumbnail.clone(), r.thumbnail);
                        layer_images.push(LayerImage {
                            layer_id: id.clone(),
                            preview: keys.preview.clone(),
                            thumbnail: keys.thumbnail.clone(),
                        });
                        painted.push((bounds, opacity, r.natural));
                        image = Some(keys);
                    }
                    Ok(None) => {
                        tracing::debug!(layer = %id, name = %dl.name, "layer has no pixels");
                    }
                    Err(e) => {
                        tracing::warn!(
                            layer = %id,
                            name = %dl.name,
                            error = %e,
                            "layer extraction failed"
                        );
                    }
                }
            }

            layers.push(ProcessedLayer {
                id,
                semantic_type: self.classifier.classify(&dl.name, &bounds),
                name: dl.name,
                bounds,
                opacity,
                blend_mode: dl.blend_mode,
                visible: dl.visible,
                locked: false,
                image,
            });
        }

        let flattened = match composite.map(|c| Raster::from_straight_rgba8(width, height, c)) {
            Some(Ok(r)) => r,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "unusable decoder composite; synthesizing");
                self.synthesize(width, height, &painted)?
            }
            None => self.synthesize(width, height, &painted)?,
        };
        let (tw, th) = thumbnail_size(width, height, self.config);
        let thumb = flattened.resized(tw, th)?;

        let flat_key = flattened_key(self.doc_id);
        let thumb_key = thumbnail_key(self.doc_id);
        rasters.insert(flat_key.clone(), flattened);
        rasters.insert(thumb_key.clone(), thumb);

        let document = ProcessedDocument::new(
            self.doc_id,
            filename,
            width,
            height,
            layers,
            flat_key,
            thumb_key,
        )?;

        Ok(ExtractionOutput {
            document,
            rasters,
            layer_images,
            notice: None,
        })
    }

    fn layer_rasters(
        &self,
        layer: &DecodedLayer,
        bounds: LayerBounds,
    ) -> HolocardResult<Option<LayerRasters>> {
        let Some(rgba) = layer.rgba.as_ref() else {
            return Ok(None);
        };
        if bounds.is_empty() {
            return Ok(None);
        }
        let fail = |e: HolocardError| HolocardError::layer_extraction(&layer.name, e.to_string());

        let natural = Raster::from_straight_rgba8(bounds.width(), bounds.height(), rgba.clone())
            .map_err(fail)?;
        let (pw, ph) = preview_size(natural.width, natural.height, self.config);
        let (tw, th) = thumbnail_size(natural.width, natural.height, self.config);
        let preview = natural.resized(pw, ph).map_err(fail)?;
        let thumbnail = natural.resized(tw, th).map_err(fail)?;

        Ok(Some(LayerRasters {
            natural,
            preview,
            thumbnail,
        }))
    }

    /// Paint visible layers in order over the base gradient.
    fn synthesize(
        &self,
        width: u32,
        height: u32,
        painted: &[(LayerBounds, f64, Raster)],
    ) -> HolocardResult<Raster> {
        let mut base = Raster::vertical_gradient(
            width,
            height,
            self.config.gradient_top,
            self.config.gradient_bottom,
        )?;
        for (bounds, opacity, raster) in painted {
            base.draw_over(raster, bounds.left, bounds.top, *opacity as f32);
        }
        Ok(base)
    }
}

fn fallback(
    config: &ExtractionConfig,
    doc_id: DocumentId,
    filename: &str,
    reason: String,
) -> ExtractionOutput {
    let width = config.placeholder_width.max(1);
    let height = config.placeholder_height.max(1);

    let card = labeled_placeholder(
        width,
        height,
        config.gradient_top,
        config.gradient_bottom,
        filename,
    )
    .or_else(|e| {
        tracing::debug!(error = %e, "labeled placeholder failed; using plain gradient");
        Raster::vertical_gradient(width, height, config.gradient_top, config.gradient_bottom)
    })
    .or_else(|_| Raster::solid(1, 1, Rgba8Premul::from_straight_rgba(0, 0, 0, 255)));

    let mut rasters = RasterStore::new();
    let flat_key = flattened_key(doc_id);
    let thumb_key = thumbnail_key(doc_id);
    if let Ok(card) = card {
        let (tw, th) = thumbnail_size(card.width, card.height, config);
        match card.resized(tw, th) {
            Ok(thumb) => rasters.insert(thumb_key.clone(), thumb),
            Err(_) => rasters.insert(thumb_key.clone(), card.clone()),
        }
        rasters.insert(flat_key.clone(), card);
    }

    ExtractionOutput {
        document: ProcessedDocument {
            id: doc_id,
            filename: filename.to_string(),
            width,
            height,
            layers: Vec::new(),
            flattened: flat_key,
            thumbnail: thumb_key,
        },
        rasters,
        layer_images: Vec::new(),
        notice: Some(ExtractionNotice {
            filename: filename.to_string(),
            reason,
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/extract/pipeline.rs"]
mod tests;

use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    assets::store::RasterSource, document::model::BlendMode, document::model::SemanticType,
};

fn solid_rgba(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    (0..w * h).flat_map(|_| px).collect()
}

fn layer(name: &str, left: i32, top: i32, w: u32, h: u32, visible: bool) -> DecodedLayer {
    DecodedLayer {
        name: name.to_string(),
        left,
        top,
        right: left + w as i32,
        bottom: top + h as i32,
        opacity: 1.0,
        visible,
        blend_mode: BlendMode::Normal,
        rgba: Some(solid_rgba(w, h, [200, 10, 10, 255])),
    }
}

struct Fixture(DecodedDocument);

impl LayeredDecoder for Fixture {
    fn decode(&self, _bytes: &[u8]) -> HolocardResult<DecodedDocument> {
        Ok(self.0.clone())
    }
}

struct Broken;

impl LayeredDecoder for Broken {
    fn decode(&self, _bytes: &[u8]) -> HolocardResult<DecodedDocument> {
        Err(HolocardError::decode("not a layered file"))
    }
}

struct Panicky;

impl LayeredDecoder for Panicky {
    fn decode(&self, _bytes: &[u8]) -> HolocardResult<DecodedDocument> {
        panic!("index out of bounds in third-party parser")
    }
}

fn card(composite: Option<Vec<u8>>) -> Fixture {
    Fixture(DecodedDocument {
        width: 400,
        height: 560,
        composite,
        layers: vec![
            layer("Background", 0, 0, 400, 560, true),
            layer("PlayerPhoto", 50, 70, 300, 420, true),
            layer("TeamLogo", 300, 460, 80, 80, true),
        ],
    })
}

fn run_with(decoder: &dyn LayeredDecoder, bytes: &[u8]) -> ExtractionOutput {
    extract(decoder, bytes, "card.psd", &ExtractionConfig::default(), None)
}

#[test]
fn preview_size_scales_only_outside_limits() {
    let cfg = ExtractionConfig::default();
    assert_eq!(preview_size(80, 80, &cfg), (150, 150));
    assert_eq!(preview_size(300, 420, &cfg), (286, 400));
    assert_eq!(preview_size(300, 400, &cfg), (300, 400));
    assert_eq!(preview_size(200, 150, &cfg), (200, 150));
    assert_eq!(preview_size(400, 560, &cfg), (286, 400));
    assert_eq!(preview_size(40, 20, &cfg), (150, 75));
}

#[test]
fn thumbnail_size_always_hits_the_box() {
    let cfg = ExtractionConfig::default();
    assert_eq!(thumbnail_size(80, 80, &cfg), (200, 200));
    assert_eq!(thumbnail_size(400, 560, &cfg), (143, 200));
    assert_eq!(thumbnail_size(20, 10, &cfg), (200, 100));
}

#[test]
fn layers_keep_order_ids_and_categories() {
    let out = run_with(&card(None), b"abc");
    assert!(out.notice.is_none());
    let doc = &out.document;
    assert_eq!((doc.width, doc.height), (400, 560));
    let ids: Vec<_> = doc.layers.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["layer-0", "layer-1", "layer-2"]);
    let types: Vec<_> = doc.layers.iter().map(|l| l.semantic_type).collect();
    assert_eq!(
        types,
        [
            SemanticType::Background,
            SemanticType::Player,
            SemanticType::Logo
        ]
    );
    assert_eq!(out.layer_images.len(), 3);
    assert!(doc.layers.iter().all(|l| l.has_real_image()));
}

#[test]
fn every_referenced_key_resolves() {
    let out = run_with(&card(None), b"abc");
    out.rasters.load(out.flattened_image()).unwrap();
    let thumb = out.rasters.load(out.thumbnail()).unwrap();
    assert_eq!((thumb.width, thumb.height), (143, 200));
    for img in &out.layer_images {
        out.rasters.load(&img.preview).unwrap();
        let t = out.rasters.load(&img.thumbnail).unwrap();
        assert_eq!(t.width.max(t.height), 200);
    }
    let logo = &out.layer_images[2];
    let preview = out.rasters.load(&logo.preview).unwrap();
    assert_eq!((preview.width, preview.height), (150, 150));
}

#[test]
fn decoder_composite_is_preferred() {
    let composite = solid_rgba(400, 560, [0, 255, 0, 255]);
    let out = run_with(&card(Some(composite)), b"abc");
    let flat = out.rasters.load(out.flattened_image()).unwrap();
    assert_eq!(flat.pixel(10, 10), Some([0, 255, 0, 255]));
}

#[test]
fn synthesized_composite_paints_layers_over_gradient() {
    let mut doc = card(None).0;
    doc.layers.truncate(0);
    doc.layers.push(layer("Logo", 10, 10, 5, 5, true));
    let mut half = layer("Glow Effect", 100, 100, 5, 5, true);
    half.opacity = 0.5;
    half.rgba = Some(solid_rgba(5, 5, [255, 255, 255, 255]));
    doc.layers.push(half);

    let out = run_with(&Fixture(doc), b"abc");
    let flat = out.rasters.load(out.flattened_image()).unwrap();
    let cfg = ExtractionConfig::default();

    assert_eq!(flat.pixel(0, 0), Some(cfg.gradient_top));
    assert_eq!(flat.pixel(12, 12), Some([200, 10, 10, 255]));
    let [r, _, _, a] = flat.pixel(101, 101).unwrap();
    assert_eq!(a, 255);
    assert!(r > cfg.gradient_top[0] && r < 255);
}

#[test]
fn hidden_layers_are_kept_without_images() {
    let mut fixture = card(None);
    fixture.0.layers[2].visible = false;
    let out = run_with(&fixture, b"abc");
    let logo = &out.document.layers[2];
    assert!(!logo.visible);
    assert!(!logo.has_real_image());
    assert_eq!(out.layer_images.len(), 2);
    assert_eq!(out.document.layers.len(), 3);
}

#[test]
fn bad_layer_pixels_only_drop_that_layer() {
    let mut fixture = card(None);
    fixture.0.layers[1].rgba = Some(vec![1, 2, 3]);
    fixture.0.layers[2].rgba = None;
    let out = run_with(&fixture, b"abc");
    assert!(out.notice.is_none());
    let has: Vec<_> = out.document.layers.iter().map(|l| l.has_real_image()).collect();
    assert_eq!(has, [true, false, false]);
}

#[test]
fn inverted_bounds_are_clamped() {
    let mut fixture = card(None);
    let l = &mut fixture.0.layers[1];
    std::mem::swap(&mut l.left, &mut l.right);
    let out = run_with(&fixture, b"abc");
    let b = out.document.layers[1].bounds;
    assert!(b.right >= b.left && b.bottom >= b.top);
    assert!(!out.document.layers[1].has_real_image());
}

#[test]
fn decode_failure_falls_back_to_placeholder() {
    for decoder in [&Broken as &dyn LayeredDecoder, &Panicky] {
        let out = run_with(decoder, b"\x00garbage");
        assert!(out.is_degraded());
        assert!(out.layer_images.is_empty());
        assert!(out.document.layers.is_empty());
        assert!(!out.flattened_image().as_str().is_empty());
        let flat = out.rasters.load(out.flattened_image()).unwrap();
        assert_eq!((flat.width, flat.height), (400, 560));
        let notice = out.notice.unwrap();
        assert_eq!(notice.filename, "card.psd");
    }
}

#[test]
fn empty_canvas_is_a_decode_failure() {
    let out = run_with(
        &Fixture(DecodedDocument {
            width: 0,
            height: 10,
            composite: None,
            layers: vec![],
        }),
        b"abc",
    );
    assert!(out.is_degraded());
}

#[test]
fn document_id_depends_on_bytes_and_name() {
    assert_eq!(document_id(b"a", "x"), document_id(b"a", "x"));
    assert_ne!(document_id(b"a", "x"), document_id(b"b", "x"));
    assert_ne!(document_id(b"a", "x"), document_id(b"a", "y"));
}

#[derive(Default)]
struct Log {
    originals: Vec<String>,
    bundles: usize,
}

struct Recording(Rc<RefCell<Log>>);

impl ArchiveSink for Recording {
    fn archive_original(&mut self, filename: &str, _bytes: &[u8]) -> HolocardResult<()> {
        self.0.borrow_mut().originals.push(filename.to_string());
        Ok(())
    }

    fn archive_layers(&mut self, _doc: &ProcessedDocument, _r: &RasterStore) -> HolocardResult<()> {
        self.0.borrow_mut().bundles += 1;
        Err(HolocardError::archival("bucket unavailable"))
    }
}

#[test]
fn archival_is_best_effort() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut extractor = Extractor::new(card(None), ExtractionConfig::default())
        .with_archive(Box::new(Recording(log.clone())));
    let out = extractor.extract(b"abc", "card.psd");
    assert!(out.notice.is_none());
    assert_eq!(out.document.layers.len(), 3);

    let _ = extractor.extract(b"abc", "again.psd");
    let log = log.borrow();
    assert_eq!(log.originals, ["card.psd", "again.psd"]);
    assert_eq!(log.bundles, 2);
}

#[test]
fn failed_decode_still_archives_original_only() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut extractor = Extractor::new(Broken, ExtractionConfig::default())
        .with_archive(Box::new(Recording(log.clone())));
    let out = extractor.extract(b"zz", "bad.psd");
    assert!(out.is_degraded());
    assert_eq!(log.borrow().originals.len(), 1);
    assert_eq!(log.borrow().bundles, 0);
}

#[test]
fn custom_classifier_drives_semantic_type() {
    let mut extractor = Extractor::new(card(None), ExtractionConfig::default())
        .with_classifier(Arc::new(|_: &str, _: &LayerBounds| SemanticType::Effect));
    let out = extractor.extract(b"abc", "card.psd");
    assert!(
        out.document
            .layers
            .iter()
            .all(|l| l.semantic_type == SemanticType::Effect)
    );
}

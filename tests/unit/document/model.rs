use super::*;

fn layer(id: &str, bounds: LayerBounds) -> ProcessedLayer {
    ProcessedLayer {
        id: LayerId::new(id),
        name: id.to_string(),
        bounds,
        opacity: 1.0,
        blend_mode: BlendMode::Normal,
        visible: true,
        locked: false,
        image: None,
        semantic_type: SemanticType::Unknown,
    }
}

#[test]
fn inverted_bounds_are_rejected_or_clamped() {
    assert!(LayerBounds::new(10, 0, 5, 10).is_err());
    assert!(LayerBounds::new(0, 10, 10, 5).is_err());

    let b = LayerBounds::clamped(10, 20, 5, 4);
    assert_eq!(b.right, 10);
    assert_eq!(b.bottom, 20);
    assert!(b.is_empty());
}

#[test]
fn bounds_geometry() {
    let b = LayerBounds::new(-10, 5, 290, 425).unwrap();
    assert_eq!(b.width(), 300);
    assert_eq!(b.height(), 420);
    assert_eq!(b.area(), 126_000);
    assert!(b.contains(Point::new(-10.0, 5.0)));
    assert!(!b.contains(Point::new(290.0, 100.0)));
    assert_eq!(b.center(), Point::new(140.0, 215.0));
}

#[test]
fn document_rejects_zero_size_and_duplicate_ids() {
    let key = AssetKey::new("flat");
    let err = ProcessedDocument::new(
        DocumentId(1),
        "a.psd",
        0,
        10,
        vec![],
        key.clone(),
        key.clone(),
    )
    .unwrap_err();
    assert!(matches!(err, HolocardError::Validation(_)));

    let b = LayerBounds::from_size(0, 0, 10, 10);
    let err = ProcessedDocument::new(
        DocumentId(1),
        "a.psd",
        10,
        10,
        vec![layer("x", b), layer("x", b)],
        key.clone(),
        key,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate layer id"));
}

#[test]
fn lookups_by_id() {
    let key = AssetKey::new("flat");
    let b = LayerBounds::from_size(0, 0, 10, 10);
    let doc = ProcessedDocument::new(
        DocumentId(7),
        "a.psd",
        10,
        10,
        vec![layer("a", b), layer("b", b)],
        key.clone(),
        key,
    )
    .unwrap();
    assert_eq!(doc.index_of(&LayerId::new("b")), Some(1));
    assert!(doc.layer(&LayerId::new("c")).is_none());
    assert_eq!(doc.id.to_string(), "0000000000000007");
}

#[test]
fn semantic_roles_split_content_and_design() {
    assert_eq!(SemanticType::Player.role(), LayerRole::Content);
    assert_eq!(SemanticType::Logo.role(), LayerRole::Content);
    assert_eq!(SemanticType::Background.role(), LayerRole::Design);
    assert_eq!(SemanticType::Unknown.role(), LayerRole::Design);
    assert_eq!(SemanticType::Text.kind(), LayerKind::Text);
    assert_eq!(SemanticType::Player.kind(), LayerKind::Image);
}

#[test]
fn semantic_type_serializes_lowercase() {
    let s = serde_json::to_string(&SemanticType::Background).unwrap();
    assert_eq!(s, "\"background\"");
    let b: BlendMode = serde_json::from_str("\"color_dodge\"").unwrap();
    assert_eq!(b, BlendMode::ColorDodge);
}

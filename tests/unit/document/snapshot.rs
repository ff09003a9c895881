use super::*;
use crate::{
    assets::store::AssetKey,
    document::model::{
        BlendMode, DocumentId, LayerBounds, LayerId, LayerImageRef, ProcessedLayer, SemanticType,
    },
};

fn doc() -> ProcessedDocument {
    let layer = ProcessedLayer {
        id: LayerId::new("layer-0"),
        name: "Background".to_string(),
        bounds: LayerBounds::from_size(0, 0, 40, 56),
        opacity: 0.5,
        blend_mode: BlendMode::Screen,
        visible: true,
        locked: true,
        image: Some(LayerImageRef {
            preview: AssetKey::new("layer/layer-0/preview"),
            thumbnail: AssetKey::new("layer/layer-0/thumbnail"),
        }),
        semantic_type: SemanticType::Background,
    };
    ProcessedDocument::new(
        DocumentId(42),
        "card.psd",
        40,
        56,
        vec![layer],
        AssetKey::new("flattened"),
        AssetKey::new("thumbnail"),
    )
    .unwrap()
}

#[test]
fn snapshot_json_round_trips_document_and_view() {
    let d = doc();
    let mut view = ViewState::new(&d);
    view.select(&d, Some(LayerId::new("layer-0")));
    view.toggle_hidden(&LayerId::new("layer-0"));

    let snap = DocumentSnapshot::capture(&d, &view);
    let back = DocumentSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn snapshot_is_plain_json() {
    let d = doc();
    let v = DocumentSnapshot::capture(&d, &ViewState::new(&d))
        .to_json_value()
        .unwrap();
    assert_eq!(v["version"], 1);
    assert_eq!(v["document"]["layers"][0]["semantic_type"], "background");
    assert_eq!(v["document"]["layers"][0]["blend_mode"], "screen");
    assert_eq!(v["view"]["order"][0], "layer-0");
    assert!(v["view"].get("hovered").is_none());
}

#[test]
fn unknown_version_is_rejected() {
    let d = doc();
    let mut snap = DocumentSnapshot::capture(&d, &ViewState::new(&d));
    snap.version = 99;
    let err = DocumentSnapshot::from_json(&snap.to_json().unwrap()).unwrap_err();
    assert!(matches!(err, HolocardError::Serde(_)));
}

#[test]
fn closures_and_in_memory_sinks_receive_snapshots() {
    let d = doc();
    let snap = DocumentSnapshot::capture(&d, &ViewState::new(&d));

    let mut count = 0;
    let mut sink = |s: &DocumentSnapshot| -> HolocardResult<()> {
        assert_eq!(s.document.id, DocumentId(42));
        count += 1;
        Ok(())
    };
    sink.save(&snap).unwrap();
    assert_eq!(count, 1);

    let mut mem = InMemorySnapshotSink::new();
    mem.save(&snap).unwrap();
    assert_eq!(mem.saved().len(), 1);
    assert_eq!(mem.latest().unwrap(), Some(snap));
}

use super::*;
use crate::{
    assets::store::AssetKey,
    document::model::{BlendMode, DocumentId, LayerBounds, SemanticType},
};

fn doc(names: &[&str]) -> ProcessedDocument {
    let layers = names
        .iter()
        .map(|n| ProcessedLayer {
            id: LayerId::new(*n),
            name: n.to_string(),
            bounds: LayerBounds::from_size(0, 0, 10, 10),
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            visible: *n != "hidden",
            locked: false,
            image: None,
            semantic_type: SemanticType::Unknown,
        })
        .collect();
    ProcessedDocument::new(
        DocumentId(1),
        "t.psd",
        10,
        10,
        layers,
        AssetKey::new("flat"),
        AssetKey::new("thumb"),
    )
    .unwrap()
}

fn names(order: &[(usize, &ProcessedLayer)]) -> Vec<String> {
    order.iter().map(|(_, l)| l.name.clone()).collect()
}

#[test]
fn selection_is_single_and_validated() {
    let d = doc(&["a", "b"]);
    let mut v = ViewState::new(&d);
    v.select(&d, Some(LayerId::new("a")));
    v.select(&d, Some(LayerId::new("b")));
    assert_eq!(v.selected, Some(LayerId::new("b")));
    v.select(&d, Some(LayerId::new("nope")));
    assert_eq!(v.selected, None);
}

#[test]
fn toggle_hidden_round_trips() {
    let d = doc(&["a", "hidden"]);
    let mut v = ViewState::new(&d);
    let a = LayerId::new("a");
    assert!(v.toggle_hidden(&a));
    assert!(!v.is_effectively_visible(&d.layers[0]));
    assert!(!v.toggle_hidden(&a));
    assert!(v.is_effectively_visible(&d.layers[0]));
    assert!(!v.is_effectively_visible(&d.layers[1]));
}

#[test]
fn reorder_changes_overlay_not_document() {
    let d = doc(&["a", "b", "c"]);
    let mut v = ViewState::new(&d);
    v.move_layer(&LayerId::new("a"), 2).unwrap();
    assert_eq!(names(&v.paint_order(&d)), ["b", "c", "a"]);
    assert_eq!(d.layers[0].name, "a");
    assert_eq!(v.paint_order(&d)[2].0, 0);

    assert!(v.move_layer(&LayerId::new("a"), 3).is_err());
    assert!(v.move_layer(&LayerId::new("zzz"), 0).is_err());
}

#[test]
fn stale_order_appends_unknown_layers() {
    let d = doc(&["a", "b", "c"]);
    let v = ViewState {
        order: vec![LayerId::new("c"), LayerId::new("gone")],
        ..ViewState::default()
    };
    assert_eq!(names(&v.paint_order(&d)), ["c", "a", "b"]);
}

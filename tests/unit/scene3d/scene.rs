use super::*;
use crate::{
    analysis::analyzer::analyze,
    assets::store::AssetKey,
    document::model::{BlendMode, DocumentId, LayerBounds, ProcessedLayer, SemanticType},
};

fn layer(name: &str, bounds: LayerBounds) -> ProcessedLayer {
    ProcessedLayer {
        id: LayerId::new(name.to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        bounds,
        opacity: 1.0,
        blend_mode: BlendMode::Normal,
        visible: true,
        locked: false,
        image: None,
        semantic_type: SemanticType::Unknown,
    }
}

fn doc() -> ProcessedDocument {
    ProcessedDocument::new(
        DocumentId(3),
        "card.psd",
        400,
        560,
        vec![
            layer("Background Texture", LayerBounds::from_size(0, 0, 400, 560)),
            layer("PlayerPhoto", LayerBounds::from_size(50, 70, 300, 420)),
            layer("Chrome Logo", LayerBounds::from_size(300, 460, 80, 80)),
            layer("Holo Foil", LayerBounds::from_size(0, 0, 400, 560)),
        ],
        AssetKey::new("f"),
        AssetKey::new("t"),
    )
    .unwrap()
}

fn scene() -> (ProcessedDocument, Scene3d) {
    let d = doc();
    let a = analyze(&d.layers);
    let s = build_scene(&d, &a);
    (d, s)
}

#[test]
fn one_plane_per_layer_in_world_units() {
    let (_, s) = scene();
    assert_eq!(s.planes.len(), 4);
    let player = &s.planes[1];
    assert_eq!(player.size, Vec2::new(3.0, 4.2));
    // Bounds centre (200, 280) is the document centre.
    assert_eq!(player.rest_position.truncate(), Vec2::ZERO);
    assert!((player.rest_position.z - 0.1).abs() < 1e-6);

    let logo = &s.planes[2];
    assert!((logo.rest_position.x - 1.4).abs() < 1e-5);
    assert!((logo.rest_position.y + 2.2).abs() < 1e-5);
}

#[test]
fn depth_increases_with_stack_order() {
    let (_, s) = scene();
    let z: Vec<f32> = s.planes.iter().map(|p| p.rest_position.z).collect();
    assert!(z.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn materials_follow_names() {
    let (_, s) = scene();
    assert_eq!(s.planes[2].material.metalness, 0.9);
    assert_eq!(s.planes[1].material.roughness, 0.5);
    assert!(s.planes[3].material.holo.is_some());
    assert!(s.planes[1].material.holo.is_none());
}

#[test]
fn background_texture_is_pinned() {
    let (_, mut s) = scene();
    let bg = s.planes[0].clone();
    assert!(bg.is_pinned(s.physics()));
    let samples = [
        InteractionSample::Pointer { x: 1.0, y: 1.0 },
        InteractionSample::Pointer { x: -1.0, y: 0.3 },
        InteractionSample::Orientation(OrientationSample {
            beta: 80.0,
            gamma: -90.0,
        }),
    ];
    for i in 0..300 {
        s.simulate(samples[i % samples.len()], 1.0 / 60.0);
        assert_eq!(s.planes[0].position, bg.rest_position);
    }
}

#[test]
fn nearer_layers_move_further() {
    let (_, mut s) = scene();
    for _ in 0..20 {
        s.simulate(InteractionSample::Pointer { x: 1.0, y: 0.0 }, 1.0 / 60.0);
    }
    let dx = |i: usize| s.planes[i].position.x - s.planes[i].rest_position.x;
    assert!(dx(1) > 0.0);
    // Higher in the stack despite the larger mass.
    assert!(dx(3) > dx(1));
}

#[test]
fn reset_restores_rest_positions() {
    let (_, mut s) = scene();
    s.simulate(InteractionSample::Pointer { x: 1.0, y: 1.0 }, 0.05);
    s.reset();
    assert!(s.planes.iter().all(|p| p.position == p.rest_position));
}

#[test]
fn pointer_and_tilt_normalize_to_unit_range() {
    let p = InteractionSample::from_pointer(800.0, 0.0, 800.0, 600.0);
    assert_eq!(p.offset(), Vec2::new(1.0, 1.0));
    let c = InteractionSample::from_pointer(400.0, 300.0, 800.0, 600.0);
    assert_eq!(c.offset(), Vec2::ZERO);

    let tilt = InteractionSample::Orientation(OrientationSample {
        beta: 22.5,
        gamma: 90.0,
    });
    assert_eq!(tilt.offset(), Vec2::new(1.0, -0.5));
}

#[test]
fn tick_advances_shader_time_only() {
    let (_, mut s) = scene();
    s.tick(0.5);
    s.tick(f32::NAN);
    assert_eq!(s.time(), 0.5);
    assert!(s.planes.iter().all(|p| p.position == p.rest_position));
}

#[test]
fn missing_analysis_places_layers_flat() {
    let d = doc();
    let s = build_scene(&d, &[]);
    assert!(s.planes.iter().all(|p| p.rest_position.z == 0.0));
}

#[test]
fn camera_frames_the_card() {
    let (_, s) = scene();
    assert!(s.camera.position.z > 5.6 / 2.0);
    let vp = s.camera.projection_matrix(1.0) * s.camera.view_matrix();
    let top = vp.project_point3(Vec3::new(0.0, 2.8, 0.0));
    assert!(top.y > 0.0 && top.y < 1.0);
}

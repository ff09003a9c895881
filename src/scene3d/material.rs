use crate::{assets::store::AssetKey, document::model::ProcessedLayer, scene3d::holo::HoloShader};

/// Physically-based surface parameters for one layer plane.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PbrMaterial {
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    /// Preview raster used as the albedo map; `None` renders a flat base colour.
    pub albedo: Option<AssetKey>,
    pub base_color: [f32; 3],
    /// Present for holographic layers.
    pub holo: Option<HoloShader>,
}

/// Surface finish guessed from a layer name.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceFinish {
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for SurfaceFinish {
    fn default() -> Self {
        Self {
            metalness: 0.0,
            roughness: 0.5,
        }
    }
}

const FINISH_RULES: &[(&[&str], SurfaceFinish)] = &[
    (
        &["metal", "chrome"],
        SurfaceFinish {
            metalness: 0.9,
            roughness: 0.1,
        },
    ),
    (
        &["glossy", "shine"],
        SurfaceFinish {
            metalness: 0.0,
            roughness: 0.2,
        },
    ),
    (
        &["matte", "paper"],
        SurfaceFinish {
            metalness: 0.0,
            roughness: 0.8,
        },
    ),
];

/// First matching rule wins; case-insensitive.
pub fn infer_finish(name: &str) -> SurfaceFinish {
    let lower = name.to_lowercase();
    FINISH_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|&(_, finish)| finish)
        .unwrap_or_default()
}

pub fn is_holographic(name: &str) -> bool {
    name.to_lowercase().contains("holo")
}

impl PbrMaterial {
    pub fn for_layer(layer: &ProcessedLayer) -> Self {
        let finish = infer_finish(&layer.name);
        Self {
            metalness: finish.metalness,
            roughness: finish.roughness,
            opacity: layer.opacity as f32,
            albedo: layer.image.as_ref().map(|i| i.preview.clone()),
            base_color: [1.0, 1.0, 1.0],
            holo: is_holographic(&layer.name).then(HoloShader::default),
        }
    }
}

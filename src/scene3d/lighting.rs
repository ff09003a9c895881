use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    /// Unit vector the light travels along.
    pub direction: Vec3,
    pub cast_shadows: bool,
    pub shadow_map_size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    /// Distance at which the light has fully fallen off.
    pub range: f32,
}

/// Ambient fill, a shadow-casting key light and a highlight point light.
///
/// The same for every document.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightingRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl Default for LightingRig {
    fn default() -> Self {
        let key_position = Vec3::new(5.0, 5.0, 5.0);
        Self {
            ambient: AmbientLight {
                color: Vec3::ONE,
                intensity: 0.4,
            },
            directional: DirectionalLight {
                color: Vec3::ONE,
                intensity: 0.8,
                position: key_position,
                direction: (-key_position).normalize(),
                cast_shadows: true,
                shadow_map_size: 2048,
            },
            point: PointLight {
                color: Vec3::new(1.0, 0.95, 0.9),
                intensity: 0.6,
                position: Vec3::new(-3.0, 2.0, 4.0),
                range: 20.0,
            },
        }
    }
}

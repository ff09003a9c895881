use glam::{Mat4, Vec2, Vec3};

use crate::{
    analysis::analyzer::LayerAnalysis,
    config::PhysicsConfig,
    document::{
        model::{LayerId, ProcessedDocument, ProcessedLayer},
        view_state::ViewState,
    },
    navigation::input::OrientationSample,
    scene3d::{
        lighting::LightingRig,
        material::PbrMaterial,
        physics::{Body, BodyId, PhysicsWorld},
    },
};

/// Device tilt (degrees) mapped to the full interaction range.
pub const MAX_TILT_DEG: f64 = 45.0;

/// One reading fed into [`Scene3d::simulate`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum InteractionSample {
    /// Pointer offset from the viewport centre, each axis in `[-1, 1]`, y up.
    Pointer { x: f32, y: f32 },
    Orientation(OrientationSample),
}

impl InteractionSample {
    /// Normalize a screen-space pointer position (y down) against its viewport.
    pub fn from_pointer(x: f64, y: f64, viewport_width: f64, viewport_height: f64) -> Self {
        let hw = (viewport_width / 2.0).max(f64::EPSILON);
        let hh = (viewport_height / 2.0).max(f64::EPSILON);
        Self::Pointer {
            x: ((x - hw) / hw).clamp(-1.0, 1.0) as f32,
            y: (-(y - hh) / hh).clamp(-1.0, 1.0) as f32,
        }
    }

    /// Normalized offset in `[-1, 1]` per axis. Gamma tilts along x, beta along y.
    pub fn offset(&self) -> Vec2 {
        match *self {
            Self::Pointer { x, y } => Vec2::new(x, y).clamp(Vec2::splat(-1.0), Vec2::splat(1.0)),
            Self::Orientation(o) => {
                let axis = |deg: f64| {
                    if deg.is_finite() {
                        (deg.clamp(-MAX_TILT_DEG, MAX_TILT_DEG) / MAX_TILT_DEG) as f32
                    } else {
                        0.0
                    }
                };
                Vec2::new(axis(o.gamma), -axis(o.beta))
            }
        }
    }
}

/// A layer as a textured quad in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerPlane {
    pub layer_id: LayerId,
    pub name: String,
    /// World-space width and height.
    pub size: Vec2,
    pub rest_position: Vec3,
    /// Current centre; moved by the physics step.
    pub position: Vec3,
    pub material: PbrMaterial,
    pub visible: bool,
    pub body: BodyId,
}

impl LayerPlane {
    /// Unit quad centred on the origin to world space.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.size.extend(1.0))
    }

    pub fn is_pinned(&self, physics: &PhysicsWorld) -> bool {
        physics.body(self.body).is_some_and(|b| b.fixed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Looking down -z at the origin from far enough to frame `height` world units.
    pub fn framing(height: f32) -> Self {
        let fov_y_deg = 45.0_f32;
        let half = (fov_y_deg.to_radians() / 2.0).tan();
        let distance = (height.max(0.01) / 2.0) / half * 1.2;
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            fov_y_deg,
            near: 0.1,
            far: distance * 10.0 + 10.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect.max(1e-3), self.near, self.far)
    }
}

/// Depth-ordered reconstruction of a document with live tilt/parallax.
///
/// Simulation state lives only as long as this value.
#[derive(Clone, Debug)]
pub struct Scene3d {
    pub planes: Vec<LayerPlane>,
    pub lighting: LightingRig,
    pub camera: Camera,
    physics: PhysicsWorld,
    time: f32,
}

/// Build with default physics.
pub fn build_scene(doc: &ProcessedDocument, analysis: &[LayerAnalysis]) -> Scene3d {
    build_scene_with(doc, analysis, PhysicsConfig::default())
}

/// One plane per layer in document order, visibility taken from the source file.
#[tracing::instrument(skip_all, fields(layers = doc.layers.len()))]
pub fn build_scene_with(
    doc: &ProcessedDocument,
    analysis: &[LayerAnalysis],
    physics: PhysicsConfig,
) -> Scene3d {
    let layers = doc.layers.iter().map(|l| (l, l.visible));
    assemble(doc, layers, analysis, physics)
}

/// One plane per layer in the view's effective paint order; user-hidden layers are invisible.
///
/// `analysis` must be computed over the same order so depth follows the reordered stack.
#[tracing::instrument(skip_all, fields(layers = doc.layers.len()))]
pub fn build_scene_in_view(
    doc: &ProcessedDocument,
    view: &ViewState,
    analysis: &[LayerAnalysis],
    physics: PhysicsConfig,
) -> Scene3d {
    let layers = view
        .paint_order(doc)
        .into_iter()
        .map(|(_, l)| (l, view.is_effectively_visible(l)));
    assemble(doc, layers, analysis, physics)
}

fn assemble<'a>(
    doc: &ProcessedDocument,
    layers: impl Iterator<Item = (&'a ProcessedLayer, bool)>,
    analysis: &[LayerAnalysis],
    physics: PhysicsConfig,
) -> Scene3d {
    let unit = physics.unit_scale.max(f32::EPSILON);
    let mut world = PhysicsWorld::new(physics);
    let doc_center = Vec2::new(doc.width as f32, doc.height as f32) / 2.0;

    let planes = layers
        .enumerate()
        .map(|(i, (layer, visible))| {
            let spatial = analysis
                .get(i)
                .filter(|a| a.layer_id == layer.id)
                .or_else(|| analysis.iter().find(|a| a.layer_id == layer.id))
                .map(|a| &a.spatial);
            if spatial.is_none() {
                tracing::debug!(layer = %layer.id, "no analysis for layer; placing at depth 0");
            }
            let depth = spatial.map_or(0.0, |s| s.depth as f32);
            let parallax = spatial.map_or(0.0, |s| s.parallax_factor as f32);

            let c = layer.bounds.center();
            let rest = Vec3::new(
                (c.x as f32 - doc_center.x) / unit,
                -(c.y as f32 - doc_center.y) / unit,
                depth,
            );
            let pinned = layer.name.to_lowercase().contains("background");
            let mass = world.mass_for_area(layer.bounds.area());
            let body = world.add_body(Body::new(rest, mass, parallax, pinned));

            LayerPlane {
                layer_id: layer.id.clone(),
                name: layer.name.clone(),
                size: Vec2::new(layer.bounds.width() as f32, layer.bounds.height() as f32) / unit,
                rest_position: rest,
                position: rest,
                material: PbrMaterial::for_layer(layer),
                visible,
                body,
            }
        })
        .collect();

    Scene3d {
        planes,
        lighting: LightingRig::default(),
        camera: Camera::framing(doc.height as f32 / unit),
        physics: world,
        time: 0.0,
    }
}

impl Scene3d {
    pub fn plane(&self, id: &LayerId) -> Option<&LayerPlane> {
        self.planes.iter().find(|p| &p.layer_id == id)
    }

    /// Show or hide a plane without disturbing the simulation.
    pub fn set_visible(&mut self, id: &LayerId, visible: bool) -> bool {
        match self.planes.iter_mut().find(|p| &p.layer_id == id) {
            Some(plane) => {
                plane.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Shader clock in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Apply one interaction reading over `dt` seconds and move the planes.
    pub fn simulate(&mut self, sample: InteractionSample, dt: f32) {
        self.physics.step(sample.offset(), dt);
        self.sync_planes();
    }

    /// Advance animated materials.
    pub fn tick(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
    }

    pub fn reset(&mut self) {
        self.physics.reset();
        self.sync_planes();
    }

    fn sync_planes(&mut self) {
        for plane in &mut self.planes {
            if let Some(body) = self.physics.body(plane.body) {
                plane.position = body.position;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene3d/scene.rs"]
mod tests;

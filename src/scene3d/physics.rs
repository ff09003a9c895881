use glam::{Vec2, Vec3};

use crate::{
    config::PhysicsConfig,
    foundation::error::{HolocardError, HolocardResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BodyId(pub usize);

/// Point mass attached to one layer plane.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Body {
    pub position: Vec3,
    /// Where the spring pulls the body back to.
    pub rest: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    /// Pinned bodies never move.
    pub fixed: bool,
    /// Scales the interaction force; nearer layers move more.
    pub parallax: f32,
}

impl Body {
    pub fn new(rest: Vec3, mass: f32, parallax: f32, fixed: bool) -> Self {
        Self {
            position: rest,
            rest,
            velocity: Vec3::ZERO,
            mass,
            fixed,
            parallax,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DistanceConstraint {
    pub a: BodyId,
    pub b: BodyId,
    pub rest_length: f32,
}

/// Damped spring integrator for interactive tilt and parallax.
///
/// Not a general solver: one explicit Euler step plus a single Gauss-Seidel sweep over the
/// distance constraints per call.
#[derive(Clone, Debug)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: Vec<Body>,
    constraints: Vec<DistanceConstraint>,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// `max(min_mass, area / mass_area_divisor)`.
    pub fn mass_for_area(&self, area_px: u64) -> f32 {
        let divisor = self.config.mass_area_divisor.max(f32::EPSILON);
        ((area_px as f32) / divisor).max(self.config.min_mass)
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }

    pub fn add_constraint(&mut self, a: BodyId, b: BodyId, rest_length: f32) -> HolocardResult<()> {
        if a == b || a.0 >= self.bodies.len() || b.0 >= self.bodies.len() {
            return Err(HolocardError::validation(format!(
                "invalid constraint between bodies {} and {}",
                a.0, b.0
            )));
        }
        if !(rest_length.is_finite() && rest_length >= 0.0) {
            return Err(HolocardError::validation("constraint rest length must be >= 0"));
        }
        self.constraints.push(DistanceConstraint { a, b, rest_length });
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    /// Advance by `dt` seconds under a normalized interaction offset (`[-1, 1]` per axis).
    pub fn step(&mut self, input: Vec2, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 || !input.is_finite() {
            return;
        }
        let dt = dt.min(self.config.max_dt);
        let drive = input.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)).extend(0.0);
        let cfg = &self.config;

        for body in self.bodies.iter_mut().filter(|b| !b.fixed) {
            let force = drive * (cfg.force_scale * body.parallax)
                - (body.position - body.rest) * cfg.stiffness;
            let accel = force / body.mass.max(f32::EPSILON);
            body.velocity = (body.velocity + accel * dt) * cfg.damping;
            body.position += body.velocity * dt;
        }

        self.solve_constraints();
    }

    fn solve_constraints(&mut self) {
        for c in &self.constraints {
            let (a, b) = (self.bodies[c.a.0], self.bodies[c.b.0]);
            let wa = if a.fixed { 0.0 } else { 1.0 / a.mass.max(f32::EPSILON) };
            let wb = if b.fixed { 0.0 } else { 1.0 / b.mass.max(f32::EPSILON) };
            let w = wa + wb;
            let delta = b.position - a.position;
            let len = delta.length();
            if w == 0.0 || len <= f32::EPSILON {
                continue;
            }
            let correction = delta * ((len - c.rest_length) / len);
            self.bodies[c.a.0].position += correction * (wa / w);
            self.bodies[c.b.0].position -= correction * (wb / w);
        }
    }

    /// Snap every body back to rest.
    pub fn reset(&mut self) {
        for body in &mut self.bodies {
            body.position = body.rest;
            body.velocity = Vec3::ZERO;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene3d/physics.rs"]
mod tests;

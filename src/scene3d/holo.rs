use glam::{Vec2, Vec3};

use crate::foundation::math::hsv_to_rgb;

/// Iridescent colour perturbation injected into the PBR fragment stage of holographic layers.
///
/// [`HoloShader::WGSL`] is what a GPU host splices in; [`HoloShader::sample`] and
/// [`HoloShader::shade`] compute the same function on the CPU.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HoloShader {
    /// Blend weight of the rainbow over the base colour, `[0, 1]`.
    pub intensity: f32,
    /// Hue cycles per second.
    pub speed: f32,
    /// Rainbow bands across the UV diagonal.
    pub bands: f32,
    pub saturation: f32,
}

impl Default for HoloShader {
    fn default() -> Self {
        Self {
            intensity: 0.45,
            speed: 0.25,
            bands: 3.0,
            saturation: 0.6,
        }
    }
}

impl HoloShader {
    /// Fragment snippet; expects `holo` uniforms and returns the perturbed colour.
    pub const WGSL: &'static str = r#"
struct HoloParams {
    time: f32,
    intensity: f32,
    speed: f32,
    bands: f32,
    saturation: f32,
};

@group(2) @binding(0) var<uniform> holo: HoloParams;

fn holo_hsv_to_rgb(h: f32, s: f32, v: f32) -> vec3<f32> {
    let k = vec3<f32>(1.0, 2.0 / 3.0, 1.0 / 3.0);
    let p = abs(fract(vec3<f32>(h) + k) * 6.0 - vec3<f32>(3.0));
    return v * mix(vec3<f32>(1.0), clamp(p - vec3<f32>(1.0), vec3<f32>(0.0), vec3<f32>(1.0)), s);
}

fn holo_hue(uv: vec2<f32>, time: f32) -> f32 {
    return fract((uv.x + uv.y * 0.5) * holo.bands + time * holo.speed);
}

fn holo_perturb(base: vec3<f32>, uv: vec2<f32>) -> vec3<f32> {
    let rainbow = holo_hsv_to_rgb(holo_hue(uv, holo.time), holo.saturation, 1.0);
    return mix(base, rainbow, holo.intensity);
}
"#;

    pub fn hue(&self, uv: Vec2, time: f32) -> f32 {
        ((uv.x + uv.y * 0.5) * self.bands + time * self.speed).rem_euclid(1.0)
    }

    /// Rainbow colour at `uv` and `time` seconds.
    pub fn sample(&self, uv: Vec2, time: f32) -> Vec3 {
        Vec3::from_array(hsv_to_rgb(self.hue(uv, time), self.saturation, 1.0))
    }

    /// `base` perturbed by the rainbow.
    pub fn shade(&self, base: Vec3, uv: Vec2, time: f32) -> Vec3 {
        base.lerp(self.sample(uv, time), self.intensity.clamp(0.0, 1.0))
    }
}

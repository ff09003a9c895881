//! Studio configuration.
//!
//! Every knob has a default matching the heuristics the pipeline was tuned with, so an empty
//! JSON object (`{}`) is a complete configuration.

use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{HolocardError, HolocardResult};

/// Aggregated configuration for extraction, analysis, navigation, rendering and physics.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Raster extraction limits and placeholder colors.
    pub extraction: ExtractionConfig,
    /// Semantic analyzer thresholds.
    pub analysis: AnalysisConfig,
    /// Zoom/pan limits.
    pub navigation: NavigationConfig,
    /// 2D renderer overlays and emphasis.
    pub render: RenderConfig,
    /// 3D interaction physics.
    pub physics: PhysicsConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Raster extraction parameters.
pub struct ExtractionConfig {
    /// Layers whose longer side is below this are upscaled to it for the preview raster.
    pub min_visible_px: u32,
    /// Layers whose longer side is above this are downscaled to it for the preview raster.
    pub max_preview_px: u32,
    /// Longer side of every thumbnail raster.
    pub thumbnail_px: u32,
    /// Size of the placeholder card produced when decoding fails.
    pub placeholder_width: u32,
    /// Size of the placeholder card produced when decoding fails.
    pub placeholder_height: u32,
    /// Top color of the base gradient (straight RGBA).
    pub gradient_top: [u8; 4],
    /// Bottom color of the base gradient (straight RGBA).
    pub gradient_bottom: [u8; 4],
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_visible_px: 150,
            max_preview_px: 400,
            thumbnail_px: 200,
            placeholder_width: 400,
            placeholder_height: 560,
            gradient_top: [102, 126, 234, 255],
            gradient_bottom: [118, 75, 162, 255],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Semantic analyzer constants.
pub struct AnalysisConfig {
    /// Bounding-box area (px²) above which a layer is `primary`.
    pub primary_area_px: f64,
    /// Bounding-box area (px²) above which a layer is `secondary`.
    pub secondary_area_px: f64,
    /// Z-offset per stacking position.
    pub depth_unit: f64,
    /// Parallax factor per unit of depth.
    pub parallax_scale: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            primary_area_px: 100_000.0,
            secondary_area_px: 10_000.0,
            depth_unit: 0.1,
            parallax_scale: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Canvas navigation limits.
pub struct NavigationConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplicative step for discrete zoom-in/zoom-out.
    pub zoom_step: f64,
    /// Factor applied per wheel tick scrolling up (zoom in).
    pub wheel_zoom_in: f64,
    /// Factor applied per wheel tick scrolling down (zoom out).
    pub wheel_zoom_out: f64,
    /// How far (screen px) content may be dragged past the workspace edge.
    pub pan_margin: f64,
    /// Pointer travel (screen px) below which a press/release is a click, not a drag.
    pub click_slop: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 1.2,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            pan_margin: 200.0,
            click_slop: 3.0,
        }
    }
}

impl NavigationConfig {
    /// Repair limits that would make zoom or pan clamping ill-defined. Invalid fields fall back
    /// to their defaults; inverted zoom limits are swapped.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        fn positive(v: f64, fallback: f64) -> f64 {
            if v.is_finite() && v > 0.0 { v } else { fallback }
        }
        let mut out = Self {
            min_zoom: positive(self.min_zoom, d.min_zoom),
            max_zoom: positive(self.max_zoom, d.max_zoom),
            zoom_step: if self.zoom_step.is_finite() && self.zoom_step > 1.0 {
                self.zoom_step
            } else {
                d.zoom_step
            },
            wheel_zoom_in: positive(self.wheel_zoom_in, d.wheel_zoom_in),
            wheel_zoom_out: positive(self.wheel_zoom_out, d.wheel_zoom_out),
            pan_margin: if self.pan_margin.is_finite() && self.pan_margin >= 0.0 {
                self.pan_margin
            } else {
                d.pan_margin
            },
            click_slop: if self.click_slop.is_finite() && self.click_slop >= 0.0 {
                self.click_slop
            } else {
                d.click_slop
            },
        };
        if out.min_zoom > out.max_zoom {
            std::mem::swap(&mut out.min_zoom, &mut out.max_zoom);
        }
        if out != self {
            tracing::warn!(config = ?self, "navigation config out of range; using repaired limits");
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// 2D renderer overlays and emphasis factors.
pub struct RenderConfig {
    /// Workspace clear color (straight RGBA).
    pub workspace_rgba: [u8; 4],
    /// Draw the light reference grid in inspect mode.
    pub show_reference_grid: bool,
    /// Reference grid spacing in document pixels.
    pub reference_grid_px: f64,
    /// Number of cells per axis of the build-mode construction grid.
    pub build_grid_divisions: u32,
    /// Emphasis of layers that are neither selected nor hovered, while something is selected.
    pub dimmed_alpha: f32,
    /// Multiplier applied to a hovered, unselected layer (result is clamped to 1).
    pub hover_boost: f32,
    /// Length of one selection-outline dash in screen pixels.
    pub dash_px: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workspace_rgba: [30, 30, 36, 255],
            show_reference_grid: false,
            reference_grid_px: 50.0,
            build_grid_divisions: 8,
            dimmed_alpha: 0.35,
            hover_boost: 2.0,
            dash_px: 6.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Interactive tilt/parallax physics.
pub struct PhysicsConfig {
    /// Velocity multiplier applied every step, in `(0, 1]`.
    pub damping: f32,
    /// Force per unit of normalized interaction offset and unit of parallax.
    pub force_scale: f32,
    /// Restoring spring toward each plane's rest position.
    pub stiffness: f32,
    /// Pixels per 3D world unit.
    pub unit_scale: f32,
    /// Area (px²) per unit of mass.
    pub mass_area_divisor: f32,
    pub min_mass: f32,
    /// Upper bound for a single step's `dt`, in seconds.
    pub max_dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.95,
            force_scale: 4.0,
            stiffness: 6.0,
            unit_scale: 100.0,
            mass_area_divisor: 10_000.0,
            min_mass: 0.1,
            max_dt: 0.1,
        }
    }
}

impl StudioConfig {
    /// Parse a JSON document; missing fields fall back to defaults.
    pub fn from_json_str(s: &str) -> HolocardResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| HolocardError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> HolocardResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply `HOLOCARD_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> HolocardResult<Self> {
        self.with_overrides_from(|k| std::env::var(k).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unparsable values are ignored.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> HolocardResult<Self> {
        let num = |k: &str| {
            lookup(k)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };
        if let Some(v) = num("HOLOCARD_MIN_ZOOM") {
            self.navigation.min_zoom = v;
        }
        if let Some(v) = num("HOLOCARD_MAX_ZOOM") {
            self.navigation.max_zoom = v;
        }
        if let Some(v) = num("HOLOCARD_PAN_MARGIN") {
            self.navigation.pan_margin = v;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> HolocardResult<()> {
        let nav = &self.navigation;
        if !(nav.min_zoom > 0.0) {
            return Err(HolocardError::validation("navigation.min_zoom must be > 0"));
        }
        if nav.min_zoom > nav.max_zoom {
            return Err(HolocardError::validation(
                "navigation.min_zoom must be <= navigation.max_zoom",
            ));
        }
        if nav.min_zoom > 1.0 {
            return Err(HolocardError::validation(
                "navigation.min_zoom must be <= 1 so fit-to-screen can reach 100%",
            ));
        }
        if !(nav.zoom_step > 1.0) || nav.pan_margin < 0.0 {
            return Err(HolocardError::validation(
                "navigation.zoom_step must be > 1 and pan_margin >= 0",
            ));
        }

        let ex = &self.extraction;
        if ex.min_visible_px == 0 || ex.thumbnail_px == 0 || ex.max_preview_px < ex.min_visible_px
        {
            return Err(HolocardError::validation(
                "extraction limits must be > 0 and max_preview_px >= min_visible_px",
            ));
        }
        if ex.placeholder_width == 0 || ex.placeholder_height == 0 {
            return Err(HolocardError::validation("placeholder size must be > 0"));
        }

        let an = &self.analysis;
        if an.secondary_area_px > an.primary_area_px {
            return Err(HolocardError::validation(
                "analysis.secondary_area_px must be <= primary_area_px",
            ));
        }

        let ph = &self.physics;
        if !(ph.damping > 0.0 && ph.damping <= 1.0) {
            return Err(HolocardError::validation("physics.damping must be in (0, 1]"));
        }
        if !(ph.unit_scale > 0.0 && ph.mass_area_divisor > 0.0 && ph.min_mass > 0.0) {
            return Err(HolocardError::validation(
                "physics.unit_scale, mass_area_divisor and min_mass must be > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

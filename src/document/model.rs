use std::collections::HashSet;
use std::fmt;

use crate::{
    assets::store::AssetKey,
    foundation::core::{Point, Rect},
    foundation::error::{HolocardError, HolocardResult},
};

/// Stable layer identifier, unique within a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Content-derived document identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Axis-aligned layer rectangle in document pixel space.
///
/// Invariant: `right >= left` and `bottom >= top`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LayerBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl LayerBounds {
    /// Build bounds, rejecting inverted rectangles.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> HolocardResult<Self> {
        if right < left || bottom < top {
            return Err(HolocardError::validation(format!(
                "inverted layer bounds ({left},{top})-({right},{bottom})"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Build bounds, collapsing inverted edges onto the near edge.
    pub fn clamped(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right: right.max(left),
            bottom: bottom.max(top),
        }
    }

    pub fn from_size(left: i32, top: i32, width: u32, height: u32) -> Self {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        Self {
            left,
            top,
            right: left.saturating_add(w),
            bottom: top.saturating_add(h),
        }
    }

    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Half-open containment: left/top edges are inside, right/bottom edges are not.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= f64::from(self.left)
            && p.x < f64::from(self.right)
            && p.y >= f64::from(self.top)
            && p.y < f64::from(self.bottom)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }

    pub fn center(&self) -> Point {
        self.to_rect().center()
    }
}

/// Symbolic compositing mode reported by the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

/// Derived semantic role of a layer. Not authoritative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Player,
    Background,
    Stats,
    Logo,
    Border,
    Text,
    Effect,
    #[default]
    Unknown,
}

impl SemanticType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Background => "background",
            Self::Stats => "stats",
            Self::Logo => "logo",
            Self::Border => "border",
            Self::Text => "text",
            Self::Effect => "effect",
            Self::Unknown => "unknown",
        }
    }

    /// Binary split used by frame analysis: card content versus card design.
    pub fn role(self) -> LayerRole {
        match self {
            Self::Player | Self::Stats | Self::Text | Self::Logo => LayerRole::Content,
            Self::Background | Self::Border | Self::Effect | Self::Unknown => LayerRole::Design,
        }
    }

    pub fn kind(self) -> LayerKind {
        match self {
            Self::Text | Self::Stats => LayerKind::Text,
            _ => LayerKind::Image,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Content,
    Design,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Text,
    Image,
}

/// Raster variants produced for one layer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerImageRef {
    /// Larger raster used for canvas rendering.
    pub preview: AssetKey,
    /// Raster no larger than the thumbnail box, used for list/grid UI.
    pub thumbnail: AssetKey,
}

/// One layer extracted from the source file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessedLayer {
    pub id: LayerId,
    pub name: String,
    pub bounds: LayerBounds,
    /// Normalized `[0, 1]`.
    pub opacity: f64,
    pub blend_mode: BlendMode,
    pub visible: bool,
    pub locked: bool,
    /// Present only when extraction produced real pixels.
    pub image: Option<LayerImageRef>,
    pub semantic_type: SemanticType,
}

impl ProcessedLayer {
    pub fn has_real_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn kind(&self) -> LayerKind {
        self.semantic_type.kind()
    }
}

/// A decoded, analyzed-ready document.
///
/// Immutable after creation: selection, visibility toggles and reordering live in
/// [`crate::ViewState`], never here.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessedDocument {
    pub id: DocumentId,
    /// Original upload name.
    pub filename: String,
    pub width: u32,
    pub height: u32,
    /// Back-to-front paint order; later entries paint on top.
    pub layers: Vec<ProcessedLayer>,
    /// Single composite raster for background/preview use.
    pub flattened: AssetKey,
    /// Thumbnail of the composite.
    pub thumbnail: AssetKey,
}

impl ProcessedDocument {
    pub fn new(
        id: DocumentId,
        filename: impl Into<String>,
        width: u32,
        height: u32,
        layers: Vec<ProcessedLayer>,
        flattened: AssetKey,
        thumbnail: AssetKey,
    ) -> HolocardResult<Self> {
        let doc = Self {
            id,
            filename: filename.into(),
            width,
            height,
            layers,
            flattened,
            thumbnail,
        };
        doc.validate()?;
        Ok(doc)
    }

    pub fn validate(&self) -> HolocardResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HolocardError::validation(format!(
                "document size must be > 0 (got {}x{})",
                self.width, self.height
            )));
        }
        let mut seen = HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !seen.insert(&layer.id) {
                return Err(HolocardError::validation(format!(
                    "duplicate layer id '{}'",
                    layer.id
                )));
            }
            if layer.bounds.right < layer.bounds.left || layer.bounds.bottom < layer.bounds.top {
                return Err(HolocardError::validation(format!(
                    "layer '{}' has inverted bounds",
                    layer.id
                )));
            }
            if !(0.0..=1.0).contains(&layer.opacity) {
                return Err(HolocardError::validation(format!(
                    "layer '{}' opacity {} outside [0, 1]",
                    layer.id, layer.opacity
                )));
            }
        }
        Ok(())
    }

    pub fn layer(&self, id: &LayerId) -> Option<&ProcessedLayer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| &l.id == id)
    }

    pub fn bounds_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;

use crate::foundation::core::{Affine, Point, Vec2};

/// Document-to-screen mapping: `screen = translate + document * scale`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    /// Pan offset in screen pixels.
    pub translate: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }

    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    pub fn document_to_screen(&self, p: Point) -> Point {
        Point::new(
            self.translate.x + p.x * self.scale,
            self.translate.y + p.y * self.scale,
        )
    }

    pub fn screen_to_document(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate.x) / self.scale,
            (p.y - self.translate.y) / self.scale,
        )
    }

    /// Same mapping as [`Self::document_to_screen`], for handing to a rasterizer.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }
}

use crate::{document::model::BlendMode, foundation::error::HolocardResult};

/// One layer as reported by a layered-file decoder.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedLayer {
    pub name: String,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    /// Normalized `[0, 1]`.
    pub opacity: f64,
    pub visible: bool,
    pub blend_mode: BlendMode,
    /// Straight RGBA8 pixels sized to the layer bounds, if the layer has a renderable surface.
    pub rgba: Option<Vec<u8>>,
}

impl DecodedLayer {
    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }
}

/// Decoder output consumed by the extraction pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedDocument {
    pub width: u32,
    pub height: u32,
    /// The decoder's own flattened composite (straight RGBA8, `width`x`height`), if any.
    pub composite: Option<Vec<u8>>,
    /// Layers in paint order, bottom-most first.
    pub layers: Vec<DecodedLayer>,
}

/// Narrow seam around a third-party layered-image decoder.
pub trait LayeredDecoder {
    fn decode(&self, bytes: &[u8]) -> HolocardResult<DecodedDocument>;
}

impl<D: LayeredDecoder + ?Sized> LayeredDecoder for &D {
    fn decode(&self, bytes: &[u8]) -> HolocardResult<DecodedDocument> {
        (**self).decode(bytes)
    }
}

impl<D: LayeredDecoder + ?Sized> LayeredDecoder for Box<D> {
    fn decode(&self, bytes: &[u8]) -> HolocardResult<DecodedDocument> {
        (**self).decode(bytes)
    }
}

//! Decoded pixel buffers and the keyed store that document records point into.

/// Encoded-image decoding (PNG, JPEG, WebP, ...).
pub mod decode;
/// SVG-rasterized placeholder cards.
pub mod placeholder;
/// Premultiplied RGBA8 buffers with resize and compositing helpers.
pub mod raster;
/// `AssetKey` -> `Raster` storage.
pub mod store;

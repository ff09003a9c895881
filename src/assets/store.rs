use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    assets::decode::decode_image,
    assets::raster::Raster,
    foundation::error::{HolocardError, HolocardResult},
};

/// Key identifying one raster in a [`RasterSource`]; the in-process stand-in for an image URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AssetKey(pub String);

impl AssetKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves raster keys at paint time.
///
/// Implementations must not cache failures: a key that fails now is retried on the next
/// repaint.
pub trait RasterSource {
    fn load(&self, key: &AssetKey) -> HolocardResult<Arc<Raster>>;
}

#[derive(Clone, Debug)]
enum StoredRaster {
    Decoded(Arc<Raster>),
    Encoded(Arc<Vec<u8>>),
}

/// In-memory raster table produced by extraction.
///
/// Entries are either decoded rasters or encoded image bytes (decoded on each load).
#[derive(Clone, Debug, Default)]
pub struct RasterStore {
    entries: BTreeMap<AssetKey, StoredRaster>,
}

impl RasterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AssetKey, raster: Raster) {
        self.entries
            .insert(key, StoredRaster::Decoded(Arc::new(raster)));
    }

    /// Store encoded bytes (PNG etc.); decoding happens lazily in [`RasterSource::load`].
    pub fn insert_encoded(&mut self, key: AssetKey, bytes: Vec<u8>) {
        self.entries
            .insert(key, StoredRaster::Encoded(Arc::new(bytes)));
    }

    pub fn remove(&mut self, key: &AssetKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AssetKey> {
        self.entries.keys()
    }
}

impl RasterSource for RasterStore {
    fn load(&self, key: &AssetKey) -> HolocardResult<Arc<Raster>> {
        match self.entries.get(key) {
            None => Err(HolocardError::asset_load(key.as_str(), "no such raster")),
            Some(StoredRaster::Decoded(r)) => Ok(Arc::clone(r)),
            Some(StoredRaster::Encoded(bytes)) => decode_image(bytes)
                .map(Arc::new)
                .map_err(|e| HolocardError::asset_load(key.as_str(), e.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;

/// Convenience result type used across holocard.
pub type HolocardResult<T> = Result<T, HolocardError>;

/// Top-level error taxonomy used by the ingestion, inspection and reconstruction APIs.
///
/// Most of these never reach the host application: extraction and rendering recover locally
/// and only log. They exist so internal steps can use `?` and so recovery sites can tell the
/// failure kinds apart.
#[derive(thiserror::Error, Debug)]
pub enum HolocardError {
    /// Invalid caller-provided data (bounds, dimensions, config).
    #[error("validation error: {0}")]
    Validation(String),

    /// The layered-file decoder could not parse the buffer at all.
    #[error("decode error: {0}")]
    Decode(String),

    /// One layer's raster could not be produced.
    #[error("layer extraction error for '{layer}': {reason}")]
    LayerExtraction {
        /// Layer name as reported by the decoder.
        layer: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A raster key could not be resolved or decoded at render time.
    #[error("asset load error for '{key}': {reason}")]
    AssetLoad {
        /// Asset key that failed.
        key: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Best-effort archival of source bytes or layer bundles failed.
    #[error("archival error: {0}")]
    Archival(String),

    /// Operation is not valid in the viewer's current lifecycle state.
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// Errors when serializing or deserializing snapshots and config.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HolocardError {
    /// Build a [`HolocardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HolocardError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`HolocardError::LayerExtraction`] value.
    pub fn layer_extraction(layer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LayerExtraction {
            layer: layer.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`HolocardError::AssetLoad`] value.
    pub fn asset_load(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`HolocardError::Archival`] value.
    pub fn archival(msg: impl Into<String>) -> Self {
        Self::Archival(msg.into())
    }

    /// Build a [`HolocardError::Lifecycle`] value.
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Build a [`HolocardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

use crate::{
    assets::store::RasterStore, document::model::ProcessedDocument,
    foundation::error::HolocardResult,
};

/// Best-effort remote persistence of uploads. Implemented by the storage collaborator.
pub trait ArchiveSink {
    /// Persist the original uploaded bytes.
    fn archive_original(&mut self, filename: &str, bytes: &[u8]) -> HolocardResult<()>;

    /// Persist the per-layer raster bundle of a successful extraction.
    fn archive_layers(
        &mut self,
        document: &ProcessedDocument,
        rasters: &RasterStore,
    ) -> HolocardResult<()>;
}

/// Run an archival step; failures are logged and swallowed.
pub(crate) fn best_effort(what: &str, step: impl FnOnce() -> HolocardResult<()>) {
    if let Err(e) = step() {
        tracing::warn!(step = what, error = %e, "archival failed; continuing");
    }
}

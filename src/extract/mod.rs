//! Layered-file ingestion.
//!
//! A [`decoder::LayeredDecoder`] turns bytes into raw layers; [`pipeline`] turns those into a
//! [`crate::document::model::ProcessedDocument`] plus rasters, degrading to a placeholder card
//! when decoding fails.

pub mod archive;
pub mod decoder;
pub mod pipeline;
/// `psd`-crate backed decoder.
pub mod psd;
pub mod request;

/// Name-based layer categorization.
pub mod classify;
/// Semantic, spatial and animation metadata per layer.
pub mod analyzer;

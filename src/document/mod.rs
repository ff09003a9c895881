/// Processed document and layer records.
pub mod model;
/// Save payloads and the injected save function.
pub mod snapshot;
/// Per-viewer mutable state: selection, hover, hidden set, order.
pub mod view_state;

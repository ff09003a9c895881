use crate::{
    document::model::ProcessedDocument,
    document::view_state::ViewState,
    foundation::error::{HolocardError, HolocardResult},
};

/// Schema version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Plain-data save payload: document metadata plus view-state, no pixel data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentSnapshot {
    pub version: u32,
    pub document: ProcessedDocument,
    pub view: ViewState,
}

impl DocumentSnapshot {
    pub fn capture(document: &ProcessedDocument, view: &ViewState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            document: document.clone(),
            view: view.clone(),
        }
    }

    pub fn to_json(&self) -> HolocardResult<String> {
        serde_json::to_string(self).map_err(|e| HolocardError::serde(e.to_string()))
    }

    pub fn to_json_value(&self) -> HolocardResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| HolocardError::serde(e.to_string()))
    }

    pub fn from_json(s: &str) -> HolocardResult<Self> {
        let snap: Self =
            serde_json::from_str(s).map_err(|e| HolocardError::serde(e.to_string()))?;
        if snap.version != SNAPSHOT_VERSION {
            return Err(HolocardError::serde(format!(
                "unsupported snapshot version {}",
                snap.version
            )));
        }
        snap.document.validate()?;
        Ok(snap)
    }
}

/// Injected save boundary. The storage/sync collaborator implements this; the core never
/// talks to storage itself.
pub trait SnapshotSink {
    fn save(&mut self, snapshot: &DocumentSnapshot) -> HolocardResult<()>;
}

impl<F> SnapshotSink for F
where
    F: FnMut(&DocumentSnapshot) -> HolocardResult<()>,
{
    fn save(&mut self, snapshot: &DocumentSnapshot) -> HolocardResult<()> {
        self(snapshot)
    }
}

/// Sink that keeps serialized snapshots in memory.
#[derive(Debug, Default)]
pub struct InMemorySnapshotSink {
    saved: Vec<String>,
}

impl InMemorySnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> &[String] {
        &self.saved
    }

    pub fn latest(&self) -> HolocardResult<Option<DocumentSnapshot>> {
        self.saved
            .last()
            .map(|s| DocumentSnapshot::from_json(s))
            .transpose()
    }
}

impl SnapshotSink for InMemorySnapshotSink {
    fn save(&mut self, snapshot: &DocumentSnapshot) -> HolocardResult<()> {
        self.saved.push(snapshot.to_json()?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/snapshot.rs"]
mod tests;

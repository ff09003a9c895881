use std::collections::BTreeSet;

use crate::{
    document::model::{LayerId, ProcessedDocument, ProcessedLayer},
    foundation::error::{HolocardError, HolocardResult},
};

/// Transient per-viewer UI state layered over an immutable document.
///
/// Owned by exactly one viewer; dropping the viewer discards it.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewState {
    /// At most one selected layer.
    pub selected: Option<LayerId>,
    #[serde(skip)]
    pub hovered: Option<LayerId>,
    /// Layers hidden by the user, on top of the document's own visibility flags.
    pub hidden: BTreeSet<LayerId>,
    /// Effective paint order (back to front) if the user reordered layers.
    pub order: Vec<LayerId>,
}

impl ViewState {
    pub fn new(doc: &ProcessedDocument) -> Self {
        Self {
            order: doc.layers.iter().map(|l| l.id.clone()).collect(),
            ..Self::default()
        }
    }

    /// Select a layer, or clear the selection with `None`. Unknown ids clear it too.
    pub fn select(&mut self, doc: &ProcessedDocument, id: Option<LayerId>) {
        self.selected = id.filter(|id| doc.layer(id).is_some());
    }

    pub fn set_hovered(&mut self, id: Option<LayerId>) {
        self.hovered = id;
    }

    /// Flip user visibility; returns `true` if the layer is now hidden.
    pub fn toggle_hidden(&mut self, id: &LayerId) -> bool {
        if self.hidden.remove(id) {
            false
        } else {
            self.hidden.insert(id.clone());
            true
        }
    }

    pub fn is_hidden(&self, id: &LayerId) -> bool {
        self.hidden.contains(id)
    }

    /// Visible in the source file and not hidden by the user.
    pub fn is_effectively_visible(&self, layer: &ProcessedLayer) -> bool {
        layer.visible && !self.hidden.contains(&layer.id)
    }

    /// Move `id` to `to_index` in the effective paint order.
    pub fn move_layer(&mut self, id: &LayerId, to_index: usize) -> HolocardResult<()> {
        let from = self
            .order
            .iter()
            .position(|x| x == id)
            .ok_or_else(|| HolocardError::validation(format!("unknown layer '{id}'")))?;
        if to_index >= self.order.len() {
            return Err(HolocardError::validation(format!(
                "layer index {to_index} out of range (len {})",
                self.order.len()
            )));
        }
        let item = self.order.remove(from);
        self.order.insert(to_index, item);
        Ok(())
    }

    /// Layers in effective paint order (back to front), paired with their document index.
    ///
    /// Layers missing from `order` (e.g. state restored against a newer document) are appended
    /// in document order.
    pub fn paint_order<'a>(&self, doc: &'a ProcessedDocument) -> Vec<(usize, &'a ProcessedLayer)> {
        let mut out = Vec::with_capacity(doc.layers.len());
        let mut used = vec![false; doc.layers.len()];
        for id in &self.order {
            if let Some(i) = doc.index_of(id)
                && !used[i]
            {
                used[i] = true;
                out.push((i, &doc.layers[i]));
            }
        }
        for (i, layer) in doc.layers.iter().enumerate() {
            if !used[i] {
                out.push((i, layer));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/view_state.rs"]
mod tests;

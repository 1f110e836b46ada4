use log::debug;

use crate::document::Document;
use crate::id_generator::ShapeId;

/// At most one selected shape. The id always refers to a committed, selectable shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&ShapeId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Select `id`, replacing any previous selection. An id that does not name a
    /// selectable committed shape leaves nothing selected.
    pub(crate) fn select(&mut self, id: &ShapeId, document: &Document) {
        let valid = document.find(id).is_some_and(|shape| shape.is_selectable());
        if valid {
            debug!("Selected shape {}", id);
            self.selected = Some(id.clone());
        } else {
            debug!("Ignoring selection of unknown shape {}", id);
            self.selected = None;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.selected = None;
    }
}

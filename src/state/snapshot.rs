use std::sync::Arc;

use egui::Vec2;

use crate::element::{Bitmap, Element, Shape};
use crate::id_generator::ShapeId;

/// Immutable view of everything visible on the canvas at one instant.
///
/// Taken by the renderer and the serializer; later edits never reach an existing
/// snapshot.
#[derive(Debug, Clone)]
pub struct CanvasSnapshot {
    pub size: Vec2,
    pub background: Option<Bitmap>,
    pub shapes: Arc<Vec<Shape>>,
    /// Shape under construction, or the live preview of a committed shape being
    /// dragged or transformed
    pub in_progress: Option<Shape>,
    pub selected: Option<ShapeId>,
}

impl CanvasSnapshot {
    /// Shapes in render order. A preview replaces the committed shape it belongs to;
    /// a brand-new shape under construction is drawn last.
    pub fn visible_shapes(&self) -> impl Iterator<Item = &Shape> {
        let preview = self.in_progress.as_ref();
        let replaces_committed = preview.is_some_and(|p| self.shapes.iter().any(|s| s.id() == p.id()));

        self.shapes
            .iter()
            .map(move |shape| match preview {
                Some(p) if p.id() == shape.id() => p,
                _ => shape,
            })
            .chain(preview.filter(|_| !replaces_committed))
    }

    /// The selected shape as currently displayed
    pub fn selected_shape(&self) -> Option<&Shape> {
        let id = self.selected.as_ref()?;
        self.visible_shapes().find(|shape| shape.id() == id)
    }
}

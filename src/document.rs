use std::sync::Arc;

use log::info;

use crate::element::{Bitmap, Element, Shape};
use crate::error::{CommandError, CommandResult};
use crate::id_generator::ShapeId;

/// The committed shape sequence plus the background bitmap.
///
/// Insertion order is render order. Every mutation swaps in a whole new sequence, so
/// a [`Document::snapshot`] taken before a mutation never observes it half-applied.
#[derive(Debug, Clone, Default)]
pub struct Document {
    shapes: Arc<Vec<Shape>>,
    background: Option<Bitmap>,
    version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheap handle to the current committed sequence
    pub fn snapshot(&self) -> Arc<Vec<Shape>> {
        Arc::clone(&self.shapes)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Committed non-stroke shapes
    pub fn figures(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|shape| !shape.is_stroke())
    }

    /// Committed freehand strokes
    pub fn strokes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|shape| shape.is_stroke())
    }

    pub fn find(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.find(id).is_some()
    }

    pub fn background(&self) -> Option<&Bitmap> {
        self.background.as_ref()
    }

    /// Bumped on every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.background.is_none()
    }

    pub(crate) fn append(&mut self, shape: Shape) -> CommandResult {
        if self.contains(shape.id()) {
            return Err(CommandError::DuplicateId(shape.id().clone()));
        }
        info!("➕ Committing {} {}", shape.element_type(), shape.id());
        let mut shapes = Vec::with_capacity(self.shapes.len() + 1);
        shapes.extend(self.shapes.iter().cloned());
        shapes.push(shape);
        self.swap(shapes);
        Ok(())
    }

    /// Apply `f` to a copy of the shape and swap the result in. Nothing changes when
    /// `f` fails.
    pub(crate) fn update<F>(&mut self, id: &ShapeId, f: F) -> CommandResult
    where
        F: FnOnce(&mut Shape) -> CommandResult,
    {
        let index = self
            .shapes
            .iter()
            .position(|shape| shape.id() == id)
            .ok_or_else(|| CommandError::ShapeNotFound(id.clone()))?;

        let mut shape = self.shapes[index].clone();
        f(&mut shape)?;

        let mut shapes = self.shapes.to_vec();
        shapes[index] = shape;
        self.swap(shapes);
        Ok(())
    }

    pub(crate) fn replace_all(&mut self, shapes: Vec<Shape>, background: Option<Bitmap>) {
        self.background = background;
        self.swap(shapes);
    }

    pub(crate) fn set_background(&mut self, bitmap: Bitmap) {
        info!("🖼️ Installing background {}x{}", bitmap.width(), bitmap.height());
        self.background = Some(bitmap);
        self.version += 1;
    }

    pub(crate) fn clear(&mut self) {
        self.replace_all(Vec::new(), None);
    }

    fn swap(&mut self, shapes: Vec<Shape>) {
        self.shapes = Arc::new(shapes);
        self.version += 1;
    }
}

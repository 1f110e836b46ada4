use egui::{Pos2, Rect, Vec2};

pub mod common;
pub(crate) mod circle;
pub(crate) mod image;
pub(crate) mod line;
pub(crate) mod rectangle;
pub(crate) mod stroke;
pub(crate) mod text;

pub use circle::Circle;
pub use common::{MIN_TRANSFORM_SIZE, ShapeStyle, Transform, TransformUpdate};
pub use image::{Bitmap, Image};
pub use line::Line;
pub use rectangle::Rectangle;
pub use stroke::{Stroke, StrokeTool};
pub use text::Text;

use crate::error::{CommandError, CommandResult};
use crate::id_generator::{ShapeId, generate_id};

/// Shape-local geometry shared by every variant.
///
/// Local coordinates are relative to the shape position, before rotation and scale.
pub(crate) trait Geometry {
    /// Bounding box in local coordinates, including stroke width
    fn local_bounds(&self) -> Rect;

    /// Half the outline width that [`Geometry::local_bounds`] adds around the geometry
    fn outline_padding(&self) -> f32 {
        0.0
    }

    /// Test a local-space point against the visible geometry
    fn contains_local(&self, local: Pos2) -> bool;

    /// Size checked against the minimum-size guard after a transform
    fn extent(&self) -> Vec2;

    /// Fold a scale factor into the absolute geometry
    fn scale(&mut self, scale: Vec2);
}

/// Common trait that all canvas shapes implement
pub trait Element {
    /// Get the unique identifier for this element
    fn id(&self) -> &ShapeId;

    /// Get the element type as a string
    fn element_type(&self) -> &'static str;

    /// Get the canvas-space bounding rectangle for this element
    fn rect(&self) -> Rect;

    /// Test if the element contains the given canvas position
    fn hit_test(&self, pos: Pos2) -> bool;

    /// Translate the element by the given delta
    fn translate(&mut self, delta: Vec2);
}

/// Enumeration of all shape variants, each carrying only its own fields
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Text(Text),
    Image(Image),
    Stroke(Stroke),
}

impl ShapeKind {
    fn geometry(&self) -> &dyn Geometry {
        match self {
            ShapeKind::Rectangle(r) => r,
            ShapeKind::Circle(c) => c,
            ShapeKind::Line(l) => l,
            ShapeKind::Text(t) => t,
            ShapeKind::Image(i) => i,
            ShapeKind::Stroke(s) => s,
        }
    }

    fn geometry_mut(&mut self) -> &mut dyn Geometry {
        match self {
            ShapeKind::Rectangle(r) => r,
            ShapeKind::Circle(c) => c,
            ShapeKind::Line(l) => l,
            ShapeKind::Text(t) => t,
            ShapeKind::Image(i) => i,
            ShapeKind::Stroke(s) => s,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle(_) => "rectangle",
            ShapeKind::Circle(_) => "circle",
            ShapeKind::Line(_) => "line",
            ShapeKind::Text(_) => "text",
            ShapeKind::Image(_) => "image",
            ShapeKind::Stroke(_) => "stroke",
        }
    }
}

/// A committed or in-construction canvas shape
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    pub position: Pos2,
    pub transform: Transform,
    draggable: bool,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(position: Pos2, kind: ShapeKind) -> Self {
        Self::with_id(generate_id(), position, kind)
    }

    pub fn with_id(id: ShapeId, position: Pos2, kind: ShapeKind) -> Self {
        let draggable = !matches!(kind, ShapeKind::Stroke(_));
        Self {
            id,
            position,
            transform: Transform::default(),
            draggable,
            kind,
        }
    }

    /// Strokes can be drawn over but never picked
    pub fn is_selectable(&self) -> bool {
        !matches!(self.kind, ShapeKind::Stroke(_))
    }

    /// Whether the shape itself allows direct manipulation. The select tool must also
    /// be active for a drag to start.
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self.kind, ShapeKind::Stroke(_))
    }

    /// Absolute size for variants that carry one
    pub fn size(&self) -> Option<Vec2> {
        match &self.kind {
            ShapeKind::Rectangle(r) => Some(r.size),
            ShapeKind::Circle(c) => Some(c.size),
            ShapeKind::Image(i) => Some(i.size),
            ShapeKind::Line(_) | ShapeKind::Text(_) | ShapeKind::Stroke(_) => None,
        }
    }

    /// Map a shape-local point to canvas space
    pub fn local_to_canvas(&self, local: Pos2) -> Pos2 {
        self.position + self.transform.apply(local.to_vec2())
    }

    /// Map a canvas point to shape-local space
    pub fn canvas_to_local(&self, pos: Pos2) -> Pos2 {
        self.transform.invert(pos - self.position).to_pos2()
    }

    /// The four corners of the local bounds, in canvas space
    pub fn corners(&self) -> [Pos2; 4] {
        let local = self.kind.geometry().local_bounds();
        [
            self.local_to_canvas(local.left_top()),
            self.local_to_canvas(local.right_top()),
            self.local_to_canvas(local.right_bottom()),
            self.local_to_canvas(local.left_bottom()),
        ]
    }

    /// Local bounds of the geometry itself, without the outline
    pub fn geometry_bounds(&self) -> Rect {
        let geometry = self.kind.geometry();
        let bounds = geometry.local_bounds();
        if bounds == Rect::NOTHING {
            return bounds;
        }
        bounds.shrink(geometry.outline_padding())
    }

    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }

    /// Apply the result of a resize/rotate gesture.
    ///
    /// The scale is folded into the absolute geometry and reset to 1, so it never
    /// compounds across edits. A result smaller than [`MIN_TRANSFORM_SIZE`] on either
    /// axis is rejected and the shape is left untouched.
    pub fn commit_transform(&mut self, update: TransformUpdate) -> CommandResult {
        let mut kind = self.kind.clone();
        kind.geometry_mut().scale(update.scale);

        let extent = kind.geometry().extent();
        if extent.x < MIN_TRANSFORM_SIZE || extent.y < MIN_TRANSFORM_SIZE {
            return Err(CommandError::TransformRejected {
                width: extent.x,
                height: extent.y,
                min: MIN_TRANSFORM_SIZE,
            });
        }

        self.kind = kind;
        self.position = update.position;
        self.transform = Transform {
            rotation: update.rotation,
            scale: Vec2::new(1.0, 1.0),
        };
        Ok(())
    }
}

impl Element for Shape {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn element_type(&self) -> &'static str {
        self.kind.name()
    }

    fn rect(&self) -> Rect {
        let local = self.kind.geometry().local_bounds();
        if local == Rect::NOTHING {
            return Rect::from_min_max(self.position, self.position);
        }
        self.corners()
            .into_iter()
            .fold(Rect::NOTHING, |rect, corner| rect.union(Rect::from_min_max(corner, corner)))
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.kind.geometry().contains_local(self.canvas_to_local(pos))
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

/// Factory functions for creating shapes
pub mod factory {
    use super::*;
    use egui::Color32;

    /// Outlined, filled box as the rectangle tool draws it
    pub fn create_rectangle(position: Pos2, size: Vec2, color: Color32, stroke_width: f32) -> Shape {
        let style = ShapeStyle {
            fill: Some(color),
            stroke: Some(color),
            stroke_width: Some(stroke_width),
        };
        Shape::new(position, ShapeKind::Rectangle(Rectangle::new(size, style)))
    }

    pub fn create_circle(center: Pos2, size: Vec2, color: Color32, stroke_width: f32) -> Shape {
        let style = ShapeStyle {
            fill: Some(color),
            stroke: Some(color),
            stroke_width: Some(stroke_width),
        };
        Shape::new(center, ShapeKind::Circle(Circle::new(size, style)))
    }

    /// Line from the anchor to `anchor + end`
    pub fn create_line(anchor: Pos2, end: Vec2, color: Color32, width: f32) -> Shape {
        Shape::new(anchor, ShapeKind::Line(Line::new(vec![Vec2::ZERO, end], color, width)))
    }

    pub fn create_text(position: Pos2, content: impl Into<String>, font_size: f32, color: Color32) -> Shape {
        Shape::new(position, ShapeKind::Text(Text::new(content, font_size, color)))
    }

    /// Image shape at the bitmap's natural size
    pub fn create_image(position: Pos2, bitmap: Bitmap) -> Shape {
        Shape::new(position, ShapeKind::Image(Image::new(bitmap)))
    }

    /// Strokes keep absolute canvas points, so the shape itself sits at the origin
    pub fn create_stroke(stroke: Stroke) -> Shape {
        Shape::new(Pos2::ZERO, ShapeKind::Stroke(stroke))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn rect_shape() -> Shape {
        factory::create_rectangle(Pos2::new(10.0, 10.0), Vec2::new(40.0, 70.0), Color32::RED, 5.0)
    }

    #[test]
    fn test_commit_transform_folds_scale() {
        let mut shape = rect_shape();
        shape
            .commit_transform(TransformUpdate {
                position: Pos2::new(12.0, 8.0),
                scale: Vec2::new(1.5, 0.5),
                rotation: 15.0,
            })
            .unwrap();

        assert_eq!(shape.size(), Some(Vec2::new(60.0, 35.0)));
        assert_eq!(shape.position, Pos2::new(12.0, 8.0));
        assert_eq!(shape.transform.rotation, 15.0);
        assert!(shape.transform.is_normalized());
    }

    #[test]
    fn test_commit_transform_rejects_tiny_result() {
        let mut shape = rect_shape();
        let before = shape.clone();
        let result = shape.commit_transform(TransformUpdate {
            position: Pos2::new(0.0, 0.0),
            scale: Vec2::new(0.1, 1.0),
            rotation: 0.0,
        });

        assert!(matches!(result, Err(CommandError::TransformRejected { .. })));
        assert_eq!(shape, before);
    }

    #[test]
    fn test_rotated_rect_bounds() {
        let mut shape = factory::create_rectangle(Pos2::ZERO, Vec2::new(10.0, 10.0), Color32::RED, 0.0);
        shape.transform.rotation = 90.0;
        let rect = shape.rect();
        assert!((rect.min.x + 10.0).abs() < 1e-3);
        assert!((rect.max.y - 10.0).abs() < 1e-3);
        assert!(shape.hit_test(Pos2::new(-5.0, 5.0)));
        assert!(!shape.hit_test(Pos2::new(5.0, -5.0 - 2.0 * common::HIT_TOLERANCE)));
    }

    #[test]
    fn test_strokes_are_not_selectable() {
        let stroke = Stroke::begin(StrokeTool::Pen, Pos2::ZERO, Color32::BLACK, 2.0);
        let shape = factory::create_stroke(stroke);
        assert!(!shape.is_selectable());
        assert!(!shape.is_draggable());
        assert!(rect_shape().is_selectable());
    }
}

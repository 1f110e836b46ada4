use egui::{Pos2, Vec2};
use log::debug;

use super::{Tool, ToolContext};
use crate::command::Command;
use crate::element::{Shape, ShapeKind, factory};
use crate::input::PointerTarget;

/// Which shape a drag gesture builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeToolKind {
    Rectangle,
    Circle,
    Line,
}

/// Drag-to-size tool for rectangles, circles and lines.
///
/// The shape is anchored at the pointer-down position and its size tracks the signed
/// delta to the pointer, so dragging up or left yields negative sizes.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ShapeToolKind,
    anchor: Option<Pos2>,
    under_construction: Option<Shape>,
}

impl ShapeTool {
    pub fn new(kind: ShapeToolKind) -> Self {
        Self {
            kind,
            anchor: None,
            under_construction: None,
        }
    }

    pub fn kind(&self) -> ShapeToolKind {
        self.kind
    }

    fn resize(shape: &mut Shape, delta: Vec2) {
        match &mut shape.kind {
            ShapeKind::Rectangle(rect) => rect.size = delta,
            ShapeKind::Circle(circle) => circle.size = delta,
            ShapeKind::Line(line) => {
                // First endpoint stays at the origin
                if let Some(end) = line.points.get_mut(1) {
                    *end = delta;
                }
            }
            ShapeKind::Text(_) | ShapeKind::Image(_) | ShapeKind::Stroke(_) => {}
        }
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        match self.kind {
            ShapeToolKind::Rectangle => "Rectangle",
            ShapeToolKind::Circle => "Circle",
            ShapeToolKind::Line => "Line",
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, _target: &PointerTarget, ctx: &ToolContext<'_>) -> Option<Command> {
        let color = ctx.brush.color;
        let width = ctx.brush.size();
        let shape = match self.kind {
            ShapeToolKind::Rectangle => factory::create_rectangle(pos, Vec2::ZERO, color, width),
            ShapeToolKind::Circle => factory::create_circle(pos, Vec2::ZERO, color, width),
            ShapeToolKind::Line => factory::create_line(pos, Vec2::ZERO, color, width),
        };
        debug!("Starting {} at {:?}", self.name(), pos);
        self.anchor = Some(pos);
        self.under_construction = Some(shape);
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<Command> {
        if let (Some(anchor), Some(shape)) = (self.anchor, &mut self.under_construction) {
            Self::resize(shape, pos - anchor);
        }
        None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> Option<Command> {
        // Degenerate zero-size shapes are committed as well
        self.anchor = None;
        self.under_construction.take().map(Command::AddShape)
    }

    fn is_active(&self) -> bool {
        self.under_construction.is_some()
    }

    fn preview(&self) -> Option<Shape> {
        self.under_construction.clone()
    }

    fn reset(&mut self) {
        self.anchor = None;
        self.under_construction = None;
    }
}

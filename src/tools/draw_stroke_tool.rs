use egui::Pos2;
use log::debug;

use super::{Tool, ToolContext};
use crate::command::Command;
use crate::element::{Shape, Stroke, StrokeTool, factory};
use crate::input::PointerTarget;

/// Freehand drawing for pen, brush and eraser
#[derive(Debug, Clone)]
pub struct DrawStrokeTool {
    tool: StrokeTool,
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<Stroke>,
}

impl DrawStrokeTool {
    pub fn new(tool: StrokeTool) -> Self {
        Self {
            tool,
            current_stroke: None,
        }
    }
}

impl Tool for DrawStrokeTool {
    fn name(&self) -> &'static str {
        match self.tool {
            StrokeTool::Pen => "Pen",
            StrokeTool::Brush => "Brush",
            StrokeTool::Eraser => "Eraser",
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, _target: &PointerTarget, ctx: &ToolContext<'_>) -> Option<Command> {
        // Start a new stroke at the cursor position
        debug!("Starting {} stroke at {:?}", self.name(), pos);
        self.current_stroke = Some(Stroke::begin(self.tool, pos, ctx.brush.color, ctx.brush.size()));
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<Command> {
        if let Some(stroke) = &mut self.current_stroke {
            stroke.add_point(pos);
        }
        None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> Option<Command> {
        // The stroke is committed exactly as drawn
        self.current_stroke
            .take()
            .map(|stroke| Command::AddShape(factory::create_stroke(stroke)))
    }

    fn is_active(&self) -> bool {
        self.current_stroke.is_some()
    }

    fn preview(&self) -> Option<Shape> {
        self.current_stroke.clone().map(factory::create_stroke)
    }

    fn reset(&mut self) {
        self.current_stroke = None;
    }
}

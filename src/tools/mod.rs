use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::document::Document;
use crate::element::{Shape, StrokeTool};
use crate::input::PointerTarget;
use crate::selection::Selection;

// Tool implementations
mod draw_stroke_tool;
pub use draw_stroke_tool::DrawStrokeTool;

mod shape_tool;
pub use shape_tool::{ShapeTool, ShapeToolKind};

mod text_tool;
pub use text_tool::{TextInput, TextTool};

mod selection_tool;
pub use selection_tool::{SelectionState, SelectionTool, calculate_preview_rect};

pub const MIN_BRUSH_SIZE: f32 = 1.0;
pub const MAX_BRUSH_SIZE: f32 = 50.0;

/// The flat set of tools a user can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Brush,
    Eraser,
    Rectangle,
    Circle,
    Line,
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Select,
        ToolKind::Pen,
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Line,
        ToolKind::Text,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Pen => "Pen",
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Line => "Line",
            ToolKind::Text => "Text",
        }
    }

    /// CSS-style cursor hint for the canvas
    pub fn cursor(&self) -> &'static str {
        match self {
            ToolKind::Select => "default",
            ToolKind::Text => "text",
            _ => "crosshair",
        }
    }

    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self {
            ToolKind::Select => egui::CursorIcon::Default,
            ToolKind::Text => egui::CursorIcon::Text,
            _ => egui::CursorIcon::Crosshair,
        }
    }

    pub fn stroke_tool(&self) -> Option<StrokeTool> {
        match self {
            ToolKind::Pen => Some(StrokeTool::Pen),
            ToolKind::Brush => Some(StrokeTool::Brush),
            ToolKind::Eraser => Some(StrokeTool::Eraser),
            _ => None,
        }
    }
}

/// Brush settings read when a gesture begins. Independent of the active tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSettings {
    size: f32,
    pub color: Color32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: 5.0,
            color: Color32::BLACK,
        }
    }
}

impl BrushSettings {
    pub fn new(size: f32, color: Color32) -> Self {
        let mut settings = Self { size, color };
        settings.set_size(size);
        settings
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Clamped to the supported brush range
    pub fn set_size(&mut self, size: f32) {
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }
}

/// Read-only view of the editor handed to tools
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub document: &'a Document,
    pub selection: &'a Selection,
    pub brush: BrushSettings,
}

/// Tool trait defines the interface for all canvas tools.
///
/// Tools never mutate the model directly; they return the [`Command`] that finalizes
/// a gesture step and keep any in-progress state to themselves.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Handle pointer press on the canvas.
    /// Return a Command to **begin** an action if applicable, or None.
    fn on_pointer_down(&mut self, pos: Pos2, target: &PointerTarget, ctx: &ToolContext<'_>) -> Option<Command>;

    /// Handle pointer drag while the button is held down.
    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<Command>;

    /// Handle pointer release. Return a Command to **finalize** an action if applicable.
    fn on_pointer_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<Command>;

    /// Whether a gesture is in progress
    fn is_active(&self) -> bool;

    /// The shape under construction, or the live preview of a drag/transform
    fn preview(&self) -> Option<Shape> {
        None
    }

    /// Drop any in-progress gesture without committing it
    fn reset(&mut self);
}

/// Enum representing all available tools
/// This allows us to avoid using Box<dyn Tool> and simplifies memory management
#[derive(Debug, Clone)]
pub enum ActiveTool {
    Selection(SelectionTool),
    DrawStroke(DrawStrokeTool),
    Shape(ShapeTool),
    Text(TextTool),
}

impl ActiveTool {
    // Factory function to create a new tool of the specified kind
    pub fn for_kind(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Select => Self::Selection(SelectionTool::new()),
            ToolKind::Pen => Self::DrawStroke(DrawStrokeTool::new(StrokeTool::Pen)),
            ToolKind::Brush => Self::DrawStroke(DrawStrokeTool::new(StrokeTool::Brush)),
            ToolKind::Eraser => Self::DrawStroke(DrawStrokeTool::new(StrokeTool::Eraser)),
            ToolKind::Rectangle => Self::Shape(ShapeTool::new(ShapeToolKind::Rectangle)),
            ToolKind::Circle => Self::Shape(ShapeTool::new(ShapeToolKind::Circle)),
            ToolKind::Line => Self::Shape(ShapeTool::new(ShapeToolKind::Line)),
            ToolKind::Text => Self::Text(TextTool::new()),
        }
    }

    pub fn as_text_tool_mut(&mut self) -> Option<&mut TextTool> {
        match self {
            Self::Text(tool) => Some(tool),
            _ => None,
        }
    }
}

impl Tool for ActiveTool {
    fn name(&self) -> &'static str {
        match self {
            Self::Selection(tool) => tool.name(),
            Self::DrawStroke(tool) => tool.name(),
            Self::Shape(tool) => tool.name(),
            Self::Text(tool) => tool.name(),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, target: &PointerTarget, ctx: &ToolContext<'_>) -> Option<Command> {
        match self {
            Self::Selection(tool) => tool.on_pointer_down(pos, target, ctx),
            Self::DrawStroke(tool) => tool.on_pointer_down(pos, target, ctx),
            Self::Shape(tool) => tool.on_pointer_down(pos, target, ctx),
            Self::Text(tool) => tool.on_pointer_down(pos, target, ctx),
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<Command> {
        match self {
            Self::Selection(tool) => tool.on_pointer_move(pos, ctx),
            Self::DrawStroke(tool) => tool.on_pointer_move(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_move(pos, ctx),
            Self::Text(tool) => tool.on_pointer_move(pos, ctx),
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<Command> {
        match self {
            Self::Selection(tool) => tool.on_pointer_up(pos, ctx),
            Self::DrawStroke(tool) => tool.on_pointer_up(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_up(pos, ctx),
            Self::Text(tool) => tool.on_pointer_up(pos, ctx),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Self::Selection(tool) => tool.is_active(),
            Self::DrawStroke(tool) => tool.is_active(),
            Self::Shape(tool) => tool.is_active(),
            Self::Text(tool) => tool.is_active(),
        }
    }

    fn preview(&self) -> Option<Shape> {
        match self {
            Self::Selection(tool) => tool.preview(),
            Self::DrawStroke(tool) => tool.preview(),
            Self::Shape(tool) => tool.preview(),
            Self::Text(tool) => tool.preview(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Selection(tool) => tool.reset(),
            Self::DrawStroke(tool) => tool.reset(),
            Self::Shape(tool) => tool.reset(),
            Self::Text(tool) => tool.reset(),
        }
    }
}

//! The editing engine's single owner of mutable state.
//!
//! `EditorContext` holds the document, the selection, the active tool and the brush,
//! and is the only place commands are executed. Hosts feed it canvas-local pointer
//! events and read [`CanvasSnapshot`]s back for painting and serialization.
use egui::{Color32, Pos2, Vec2};
use log::{debug, info, warn};

use super::CanvasSnapshot;
use crate::command::{Command, CommandContext, CommandError, CommandResult};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::element::{Bitmap, Element, TransformUpdate, factory};
use crate::error::{ConfigError, TransitionError};
use crate::id_generator::ShapeId;
use crate::input::{InputEvent, PointerTarget};
use crate::selection::Selection;
use crate::tools::{ActiveTool, BrushSettings, TextInput, TextTool, Tool, ToolContext, ToolKind};
use crate::widgets::resize_handle::handle_at;

/// The main context for the editor, owning the shape model and the tool state machine.
pub struct EditorContext {
    document: Document,
    selection: Selection,
    tool_kind: ToolKind,
    tool: ActiveTool,
    brush: BrushSettings,
    canvas_size: Vec2,
    text_input: Option<Box<dyn TextInput + Send>>,
}

// Custom Debug implementation because the text input is a trait object
impl std::fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorContext")
            .field("document", &self.document)
            .field("selection", &self.selection)
            .field("tool_kind", &self.tool_kind)
            .field("tool", &self.tool)
            .field("brush", &self.brush)
            .field("canvas_size", &self.canvas_size)
            .field("text_input", &self.text_input.is_some())
            .finish()
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

impl EditorContext {
    /// Creates an empty canvas with the select tool active
    pub fn new(canvas_size: Vec2) -> Self {
        Self {
            document: Document::new(),
            selection: Selection::new(),
            tool_kind: ToolKind::default(),
            tool: ActiveTool::for_kind(ToolKind::default()),
            brush: BrushSettings::default(),
            canvas_size,
            text_input: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Result<Self, ConfigError> {
        let mut context = Self::new(config.canvas_size());
        context.brush = config.brush()?;
        Ok(context)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<&ShapeId> {
        self.selection.selected()
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool_kind
    }

    pub fn tool(&self) -> &ActiveTool {
        &self.tool
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush.set_size(size);
    }

    pub fn set_brush_color(&mut self, color: Color32) {
        self.brush.color = color;
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    /// Whether a pointer gesture is in progress
    pub fn is_drawing(&self) -> bool {
        self.tool.is_active()
    }

    /// Install a synchronous text source for the text tool. Without one, text
    /// requests stay pending until [`EditorContext::insert_text`] answers them.
    pub fn set_text_input(&mut self, input: Box<dyn TextInput + Send>) {
        self.text_input = Some(input);
    }

    /// Switch the active tool. Rejected while a gesture is in progress.
    pub fn set_tool(&mut self, kind: ToolKind) -> Result<(), TransitionError> {
        if self.tool.is_active() {
            warn!("⚠️ Cannot switch to {} while {} is busy", kind.name(), self.tool.name());
            return Err(TransitionError::ToolBusy(self.tool.name().to_owned()));
        }
        if kind != self.tool_kind {
            info!("🔧 Tool changed: {} -> {}", self.tool_kind.name(), kind.name());
        }
        self.tool_kind = kind;
        self.tool = ActiveTool::for_kind(kind);
        Ok(())
    }

    /// Resolve what a pointer-down at `pos` lands on: a handle of the selected shape
    /// (select tool only), the topmost selectable shape, or the background.
    pub fn target_at(&self, pos: Pos2) -> PointerTarget {
        if self.tool_kind == ToolKind::Select {
            let handle = self
                .selection
                .selected()
                .and_then(|id| self.document.find(id))
                .and_then(|shape| handle_at(shape.corners(), pos));
            if let Some(handle) = handle {
                return PointerTarget::Handle(handle);
            }
        }

        self.document
            .shapes()
            .iter()
            .rev()
            .find(|shape| shape.is_selectable() && shape.hit_test(pos))
            .map(|shape| PointerTarget::Shape(shape.id().clone()))
            .unwrap_or(PointerTarget::Background)
    }

    /// Dispatch one pointer event to the active tool and execute what it produces.
    ///
    /// Move and release events outside a gesture are ignored. Leaving the canvas ends
    /// the gesture exactly like a release.
    pub fn handle_event(&mut self, event: InputEvent) -> CommandResult {
        let tool_ctx = ToolContext {
            document: &self.document,
            selection: &self.selection,
            brush: self.brush,
        };

        let command = match &event {
            InputEvent::PointerDown { position, target } => {
                self.tool.on_pointer_down(*position, target, &tool_ctx)
            }
            InputEvent::PointerMove { position } => {
                if !self.tool.is_active() {
                    return Ok(());
                }
                self.tool.on_pointer_move(*position, &tool_ctx)
            }
            InputEvent::PointerUp { position } | InputEvent::PointerLeave { position } => {
                if !self.tool.is_active() {
                    return Ok(());
                }
                debug!("Gesture ended at {:?}", position);
                self.tool.on_pointer_up(*position, &tool_ctx)
            }
        };

        if let Some(command) = command {
            self.execute(command)?;
        }

        self.answer_text_request()
    }

    /// Answer a pending text request from the installed text input, if any
    fn answer_text_request(&mut self) -> CommandResult {
        let Some(input) = self.text_input.as_mut() else {
            return Ok(());
        };
        let Some(at) = self.tool.as_text_tool_mut().and_then(TextTool::take_request) else {
            return Ok(());
        };
        match input.request_text(at) {
            Some(content) => self.insert_text(at, &content).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Position of a text request waiting for an answer
    pub fn pending_text_request(&self) -> Option<Pos2> {
        match &self.tool {
            ActiveTool::Text(tool) => tool.pending_request(),
            _ => None,
        }
    }

    pub fn cancel_text_request(&mut self) {
        if let Some(tool) = self.tool.as_text_tool_mut() {
            tool.reset();
        }
    }

    /// Commit a text shape at `at`. Empty content commits nothing and returns `None`.
    pub fn insert_text(&mut self, at: Pos2, content: &str) -> Result<Option<ShapeId>, CommandError> {
        self.cancel_text_request();
        let Some(shape) = TextTool::build_shape(at, content, &self.brush) else {
            debug!("Empty text entry, nothing added");
            return Ok(None);
        };
        let id = shape.id().clone();
        self.execute(Command::AddShape(shape))?;
        Ok(Some(id))
    }

    /// Direct shape click: select it, or clear the selection for an unknown id.
    /// Ignored unless the select tool is active.
    pub fn select(&mut self, id: &ShapeId) {
        if self.tool_kind != ToolKind::Select {
            debug!("Ignoring click on {} while the {} tool is active", id, self.tool_kind.name());
            return;
        }
        // Selection commands cannot fail
        let _ = self.execute(Command::SelectShape(id.clone()));
    }

    pub fn clear_selection(&mut self) {
        let _ = self.execute(Command::ClearSelection);
    }

    /// End of a drag reported by the host. Only the position changes.
    pub fn commit_drag(&mut self, id: &ShapeId, position: Pos2) -> CommandResult {
        if self.tool_kind != ToolKind::Select {
            return Err(CommandError::NotDraggable(id.clone()));
        }
        self.execute(Command::MoveShape {
            id: id.clone(),
            position,
        })
    }

    /// End of a resize/rotate on the selected shape reported by the host
    pub fn commit_transform(&mut self, id: &ShapeId, update: TransformUpdate) -> CommandResult {
        self.execute(Command::TransformShape { id: id.clone(), update })
    }

    /// Place a bitmap as an image shape at its natural size
    pub fn insert_image(&mut self, position: Pos2, bitmap: Bitmap) -> Result<ShapeId, CommandError> {
        let shape = factory::create_image(position, bitmap);
        let id = shape.id().clone();
        self.execute(Command::AddShape(shape))?;
        Ok(id)
    }

    /// Replace the background bitmap; shapes are kept
    pub fn load_background(&mut self, bitmap: Bitmap) {
        let _ = self.execute(Command::SetBackground(bitmap));
    }

    /// Empty shapes, strokes, background and selection
    pub fn clear(&mut self) {
        self.tool.reset();
        let _ = self.execute(Command::Clear);
    }

    /// Swap the whole canvas for a single image. Any gesture in progress is
    /// abandoned first so it cannot commit onto the replaced canvas.
    pub fn replace_with_image(&mut self, bitmap: Bitmap) {
        if self.tool.is_active() {
            warn!("⚠️ Abandoning in-progress {} gesture for canvas replacement", self.tool.name());
        }
        self.tool.reset();
        let _ = self.execute(Command::ReplaceWithImage(bitmap));
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            size: self.canvas_size,
            background: self.document.background().cloned(),
            shapes: self.document.snapshot(),
            in_progress: self.tool.preview(),
            selected: self.selection.selected().cloned(),
        }
    }

    fn execute(&mut self, command: Command) -> CommandResult {
        let name = command.name();
        let mut ctx = CommandContext::new(&mut self.document, &mut self.selection);
        let result = command.execute(&mut ctx);
        if let Err(err) = &result {
            warn!("⚠️ {} failed: {}", name, err);
        }
        result
    }
}

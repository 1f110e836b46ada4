use egui::Pos2;
use log::debug;

use super::{BrushSettings, Tool, ToolContext};
use crate::command::Command;
use crate::element::{Shape, factory};
use crate::input::PointerTarget;

/// Font size is derived from the brush size
pub const TEXT_SIZE_FACTOR: f32 = 4.0;

/// Source of text for the text tool. Returning `None` or an empty string cancels.
pub trait TextInput {
    fn request_text(&mut self, at: Pos2) -> Option<String>;
}

impl<F> TextInput for F
where
    F: FnMut(Pos2) -> Option<String>,
{
    fn request_text(&mut self, at: Pos2) -> Option<String> {
        self(at)
    }
}

/// Click-to-place text. There is no drag phase; a click only records where text was
/// requested, and the owner answers the request.
#[derive(Debug, Clone, Default)]
pub struct TextTool {
    pending: Option<Pos2>,
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_request(&self) -> Option<Pos2> {
        self.pending
    }

    pub fn take_request(&mut self) -> Option<Pos2> {
        self.pending.take()
    }

    /// Build the text shape for a confirmed entry, if the entry is non-empty
    pub fn build_shape(at: Pos2, content: &str, brush: &BrushSettings) -> Option<Shape> {
        if content.is_empty() {
            return None;
        }
        Some(factory::create_text(
            at,
            content,
            brush.size() * TEXT_SIZE_FACTOR,
            brush.color,
        ))
    }
}

impl Tool for TextTool {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn on_pointer_down(&mut self, pos: Pos2, _target: &PointerTarget, _ctx: &ToolContext<'_>) -> Option<Command> {
        debug!("Text requested at {:?}", pos);
        self.pending = Some(pos);
        None
    }

    fn on_pointer_move(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> Option<Command> {
        None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> Option<Command> {
        None
    }

    fn is_active(&self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;
    use egui::Color32;

    #[test]
    fn test_font_size_follows_brush() {
        let brush = BrushSettings::new(5.0, Color32::RED);
        let shape = TextTool::build_shape(Pos2::new(3.0, 4.0), "hello", &brush).unwrap();
        match shape.kind {
            ShapeKind::Text(text) => {
                assert_eq!(text.font_size, 20.0);
                assert_eq!(text.fill, Color32::RED);
            }
            other => panic!("expected text, got {:?}", other),
        }
        assert_eq!(shape.position, Pos2::new(3.0, 4.0));
    }

    #[test]
    fn test_empty_text_is_discarded() {
        assert!(TextTool::build_shape(Pos2::ZERO, "", &BrushSettings::default()).is_none());
    }

    #[test]
    fn test_closure_text_input() {
        let mut input = |_at: Pos2| Some("hi".to_owned());
        assert_eq!(input.request_text(Pos2::ZERO).as_deref(), Some("hi"));
    }
}

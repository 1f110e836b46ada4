use egui::{Color32, Pos2, Rect, Vec2};

use super::Geometry;
use crate::font;

/// Text block whose top-left corner sits at the shape origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub font_size: f32,
    pub fill: Color32,
}

impl Text {
    pub fn new(content: impl Into<String>, font_size: f32, fill: Color32) -> Self {
        Self {
            content: content.into(),
            font_size,
            fill,
        }
    }
}

impl Geometry for Text {
    fn local_bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, font::measure_text(&self.content, self.font_size))
    }

    fn contains_local(&self, local: Pos2) -> bool {
        self.local_bounds().contains(local)
    }

    // Like a line, a single row of text is judged by its longer side
    fn extent(&self) -> Vec2 {
        let size = font::measure_text(&self.content, self.font_size);
        Vec2::splat(size.x.max(size.y))
    }

    // Text keeps its glyph proportions; the vertical factor drives the font size
    fn scale(&mut self, scale: Vec2) {
        self.font_size *= scale.y.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_uses_measured_box() {
        let text = Text::new("Hello", 4.0, Color32::BLACK);
        let measured = font::measure_text("Hello", 4.0);
        assert_eq!(text.extent(), Vec2::splat(measured.x.max(measured.y)));
        assert!(text.extent().x > text.font_size);
    }
}

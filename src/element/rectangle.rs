use egui::{Pos2, Rect, Vec2};

use super::Geometry;
use super::common::{HIT_TOLERANCE, ShapeStyle};

/// Axis-aligned box anchored at the shape origin. Width and height may be negative
/// when the box was dragged up or to the left of its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub size: Vec2,
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn new(size: Vec2, style: ShapeStyle) -> Self {
        Self { size, style }
    }

    /// The normalized box in shape-local coordinates
    pub fn local_rect(&self) -> Rect {
        Rect::from_two_pos(Pos2::ZERO, self.size.to_pos2())
    }
}

impl Geometry for Rectangle {
    fn local_bounds(&self) -> Rect {
        self.local_rect().expand(self.outline_padding())
    }

    fn outline_padding(&self) -> f32 {
        self.style.stroke_width() / 2.0
    }

    fn contains_local(&self, local: Pos2) -> bool {
        let tolerance = (self.style.stroke_width() / 2.0).max(HIT_TOLERANCE);
        if self.style.fill.is_some() {
            self.local_rect().expand(tolerance).contains(local)
        } else {
            let outer = self.local_rect().expand(tolerance);
            let inner = self.local_rect().shrink(tolerance);
            outer.contains(local) && !(inner.is_positive() && inner.contains(local))
        }
    }

    fn extent(&self) -> Vec2 {
        Vec2::new(self.size.x.abs(), self.size.y.abs())
    }

    fn scale(&mut self, scale: Vec2) {
        self.size = self.size * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn filled(size: Vec2) -> Rectangle {
        Rectangle::new(
            size,
            ShapeStyle {
                fill: Some(Color32::RED),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_negative_size_normalizes() {
        let rect = filled(Vec2::new(-40.0, -20.0));
        let local = rect.local_rect();
        assert_eq!(local.min, Pos2::new(-40.0, -20.0));
        assert_eq!(local.max, Pos2::ZERO);
        assert!(rect.contains_local(Pos2::new(-10.0, -10.0)));
        assert!(!rect.contains_local(Pos2::new(10.0, 10.0)));
    }

    #[test]
    fn test_outline_only_hit_testing() {
        let rect = Rectangle::new(
            Vec2::new(100.0, 100.0),
            ShapeStyle {
                stroke: Some(Color32::BLACK),
                stroke_width: Some(2.0),
                ..Default::default()
            },
        );
        assert!(rect.contains_local(Pos2::new(0.0, 50.0)));
        assert!(!rect.contains_local(Pos2::new(50.0, 50.0)));
    }
}

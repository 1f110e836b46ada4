use egui::{Pos2, Rect, Vec2};

use super::Geometry;
use super::common::{HIT_TOLERANCE, ShapeStyle};

/// Circle centred on the shape origin. The radius is half the absolute width, so a
/// circle gesture measures its radius along the horizontal drag only.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub size: Vec2,
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(size: Vec2, style: ShapeStyle) -> Self {
        Self { size, style }
    }

    pub fn radius(&self) -> f32 {
        self.size.x.abs() / 2.0
    }
}

impl Geometry for Circle {
    fn local_bounds(&self) -> Rect {
        let extent = self.radius() + self.outline_padding();
        Rect::from_center_size(Pos2::ZERO, Vec2::splat(extent * 2.0))
    }

    fn outline_padding(&self) -> f32 {
        self.style.stroke_width() / 2.0
    }

    fn contains_local(&self, local: Pos2) -> bool {
        let distance = local.to_vec2().length();
        let tolerance = (self.style.stroke_width() / 2.0).max(HIT_TOLERANCE);
        if self.style.fill.is_some() {
            distance <= self.radius() + tolerance
        } else {
            (distance - self.radius()).abs() <= tolerance
        }
    }

    fn extent(&self) -> Vec2 {
        Vec2::splat(self.size.x.abs())
    }

    fn scale(&mut self, scale: Vec2) {
        self.size = self.size * scale;
    }
}

use egui::{Color32, Pos2, Rect, Vec2};

use super::Geometry;
use super::common::{self, HIT_TOLERANCE};

/// Straight line made of point offsets relative to the shape origin. The first point
/// stays at the origin while the line is being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub points: Vec<Vec2>,
    pub color: Color32,
    pub width: f32,
}

impl Line {
    pub fn new(points: Vec<Vec2>, color: Color32, width: f32) -> Self {
        Self { points, color, width }
    }

    /// Points as `[x0, y0, x1, y1, ...]`
    pub fn flat_points(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub(crate) fn local_points(&self) -> Vec<Pos2> {
        self.points.iter().map(|p| p.to_pos2()).collect()
    }
}

impl Geometry for Line {
    fn local_bounds(&self) -> Rect {
        common::calculate_bounds(&self.local_points(), self.outline_padding())
    }

    fn outline_padding(&self) -> f32 {
        self.width / 2.0
    }

    fn contains_local(&self, local: Pos2) -> bool {
        common::distance_to_polyline(local, &self.local_points()) <= (self.width / 2.0).max(HIT_TOLERANCE)
    }

    fn extent(&self) -> Vec2 {
        // Only the longer axis is meaningful for a line; a horizontal line has no height
        let bounds = common::calculate_bounds(&self.local_points(), 0.0);
        if bounds == Rect::NOTHING {
            return Vec2::ZERO;
        }
        Vec2::splat(bounds.width().max(bounds.height()))
    }

    fn scale(&mut self, scale: Vec2) {
        for point in &mut self.points {
            *point = *point * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_points() {
        let line = Line::new(vec![Vec2::ZERO, Vec2::new(30.0, -4.0)], Color32::BLACK, 2.0);
        assert_eq!(line.flat_points(), vec![0.0, 0.0, 30.0, -4.0]);
    }

    #[test]
    fn test_horizontal_line_extent_uses_length() {
        let line = Line::new(vec![Vec2::ZERO, Vec2::new(30.0, 0.0)], Color32::BLACK, 2.0);
        assert_eq!(line.extent(), Vec2::splat(30.0));
    }
}

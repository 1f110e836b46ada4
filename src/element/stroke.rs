use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Geometry;
use super::common::{self, ERASER_COLOR};

/// Which freehand tool produced a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    Pen,
    Brush,
    Eraser,
}

impl StrokeTool {
    /// Color actually laid down for the given brush color
    pub fn color(self, brush_color: Color32) -> Color32 {
        match self {
            StrokeTool::Eraser => ERASER_COLOR,
            StrokeTool::Pen | StrokeTool::Brush => brush_color,
        }
    }

    /// Width actually laid down for the given brush size
    pub fn width(self, brush_size: f32) -> f32 {
        match self {
            StrokeTool::Brush => brush_size * 2.0,
            StrokeTool::Pen | StrokeTool::Eraser => brush_size,
        }
    }
}

/// Freehand stroke. Points only ever grow while the stroke is being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    tool: StrokeTool,
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

impl Stroke {
    /// Start a stroke with a single point, using the tool's color and width rules
    pub fn begin(tool: StrokeTool, start: Pos2, brush_color: Color32, brush_size: f32) -> Self {
        Self {
            tool,
            points: vec![start],
            color: tool.color(brush_color),
            width: tool.width(brush_size),
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn tool(&self) -> StrokeTool {
        self.tool
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// Points as `[x0, y0, x1, y1, ...]`
    pub fn flat_points(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

impl Geometry for Stroke {
    fn local_bounds(&self) -> Rect {
        common::calculate_bounds(&self.points, self.outline_padding())
    }

    fn outline_padding(&self) -> f32 {
        self.width / 2.0
    }

    fn contains_local(&self, local: Pos2) -> bool {
        common::distance_to_polyline(local, &self.points) <= self.width / 2.0
    }

    fn extent(&self) -> Vec2 {
        let bounds = common::calculate_bounds(&self.points, 0.0);
        if bounds == Rect::NOTHING {
            return Vec2::ZERO;
        }
        Vec2::splat(bounds.width().max(bounds.height()))
    }

    fn scale(&mut self, scale: Vec2) {
        for point in &mut self.points {
            *point = Pos2::new(point.x * scale.x, point.y * scale.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_rules() {
        let color = Color32::from_rgb(1, 2, 3);
        let pen = Stroke::begin(StrokeTool::Pen, Pos2::ZERO, color, 5.0);
        let brush = Stroke::begin(StrokeTool::Brush, Pos2::ZERO, color, 5.0);
        let eraser = Stroke::begin(StrokeTool::Eraser, Pos2::ZERO, color, 5.0);

        assert_eq!((pen.color(), pen.width()), (color, 5.0));
        assert_eq!((brush.color(), brush.width()), (color, 10.0));
        assert_eq!((eraser.color(), eraser.width()), (ERASER_COLOR, 5.0));
    }

    #[test]
    fn test_points_only_grow() {
        let mut stroke = Stroke::begin(StrokeTool::Pen, Pos2::new(1.0, 2.0), Color32::BLACK, 1.0);
        stroke.add_point(Pos2::new(3.0, 4.0));
        assert_eq!(stroke.flat_points(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}

use egui::{Color32, Pos2, Rect, Vec2};

use crate::error::ConfigError;

// Common constants for all element types
pub const MIN_TRANSFORM_SIZE: f32 = 5.0;
pub const HIT_TOLERANCE: f32 = 4.0;
pub const ERASER_COLOR: Color32 = Color32::WHITE;
pub const TEXT_LINE_HEIGHT: f32 = 1.2;

/// Rotation angle (degrees) and scale factors applied on top of a shape's geometry.
///
/// Scale is folded back into the geometry on every transform commit, so committed
/// shapes always carry a scale of exactly 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn is_normalized(&self) -> bool {
        self.scale == Vec2::new(1.0, 1.0)
    }

    /// Map a shape-local offset into canvas space, relative to the shape origin.
    pub fn apply(&self, local: Vec2) -> Vec2 {
        rotate(local * self.scale, self.rotation)
    }

    /// Inverse of [`Transform::apply`]. Degenerate scale maps everything to the origin.
    pub fn invert(&self, offset: Vec2) -> Vec2 {
        let unrotated = rotate(offset, -self.rotation);
        Vec2::new(
            safe_div(unrotated.x, self.scale.x),
            safe_div(unrotated.y, self.scale.y),
        )
    }
}

/// Result of a resize/rotate handle release as reported by the transformer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformUpdate {
    pub position: Pos2,
    pub scale: Vec2,
    pub rotation: f32,
}

/// Optional fill/stroke styling of closed shapes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeStyle {
    pub fill: Option<Color32>,
    pub stroke: Option<Color32>,
    pub stroke_width: Option<f32>,
}

impl ShapeStyle {
    pub fn stroke_width(&self) -> f32 {
        match self.stroke {
            Some(_) => self.stroke_width.unwrap_or(1.0),
            None => 0.0,
        }
    }
}

fn safe_div(value: f32, divisor: f32) -> f32 {
    if divisor == 0.0 { 0.0 } else { value / divisor }
}

/// Rotate a vector clockwise (screen space, y down) by the given angle in degrees.
pub fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Calculate distance from a point to a line segment (useful for stroke hit testing)
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Distance from a point to an open polyline. A single point behaves like a dot.
pub(crate) fn distance_to_polyline(point: Pos2, points: &[Pos2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|pair| distance_to_line_segment(point, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Parse a `#rrggbb` color string
pub fn parse_hex_color(value: &str) -> Result<Color32, ConfigError> {
    let invalid = || ConfigError::InvalidColor(value.to_owned());
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
    Ok(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn to_hex_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000").unwrap(), Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_hex_color("#0A0b0C").unwrap(), Color32::from_rgb(10, 11, 12));
        assert!(parse_hex_color("ff0000").is_err());
        assert!(parse_hex_color("#ff00").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }

    #[test]
    fn test_hex_color_round_trip() {
        let color = Color32::from_rgb(18, 52, 86);
        assert_eq!(to_hex_color(color), "#123456");
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = rotate(Vec2::new(10.0, 0.0), 90.0);
        assert!((rotated.x).abs() < 1e-4);
        assert!((rotated.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_transform_invert() {
        let transform = Transform {
            rotation: 30.0,
            scale: Vec2::new(2.0, 0.5),
        };
        let local = Vec2::new(3.0, -7.0);
        let back = transform.invert(transform.apply(local));
        assert!((back - local).length() < 1e-4);
    }

    #[test]
    fn test_distance_to_polyline() {
        let points = [Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0)];
        assert_eq!(distance_to_polyline(Pos2::new(5.0, 3.0), &points), 3.0);
        assert_eq!(distance_to_polyline(Pos2::new(3.0, 4.0), &points[..1]), 5.0);
        assert!(distance_to_polyline(Pos2::ZERO, &[]).is_infinite());
    }
}

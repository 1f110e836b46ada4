use egui::{Color32, CursorIcon, Painter, Pos2, Rect, Stroke, Vec2};

/// Side length of a handle square, in canvas units
pub const HANDLE_SIZE: f32 = 10.0;

/// Distance of the rotation handle above the selection box
pub const ROTATE_HANDLE_OFFSET: f32 = 24.0;

const HANDLE_FILL: Color32 = Color32::from_rgb(30, 120, 255);

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft => CursorIcon::ResizeNwSe,
            Corner::TopRight => CursorIcon::ResizeNeSw,
            Corner::BottomLeft => CursorIcon::ResizeNeSw,
            Corner::BottomRight => CursorIcon::ResizeNwSe,
        }
    }

    /// The point of `rect` this corner sits on
    pub fn of(&self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.left_top(),
            Corner::TopRight => rect.right_top(),
            Corner::BottomLeft => rect.left_bottom(),
            Corner::BottomRight => rect.right_bottom(),
        }
    }
}

/// A transformer handle on the selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Resize(Corner),
    Rotate,
}

impl Handle {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Handle::Resize(corner) => corner.cursor_icon(),
            Handle::Rotate => CursorIcon::Grab,
        }
    }
}

/// Canvas position of every handle for a selection outlined by `corners`
/// (top-left, top-right, bottom-right, bottom-left, possibly rotated).
pub fn handle_positions(corners: [Pos2; 4]) -> Vec<(Handle, Pos2)> {
    let [top_left, top_right, bottom_right, bottom_left] = corners;
    let top_mid = top_left + (top_right - top_left) / 2.0;
    let up = (top_left - bottom_left).normalized();
    let up = if up.is_finite() { up } else { -Vec2::Y };

    vec![
        (Handle::Resize(Corner::TopLeft), top_left),
        (Handle::Resize(Corner::TopRight), top_right),
        (Handle::Resize(Corner::BottomRight), bottom_right),
        (Handle::Resize(Corner::BottomLeft), bottom_left),
        (Handle::Rotate, top_mid + up * ROTATE_HANDLE_OFFSET),
    ]
}

/// Find the handle under `pos`, if any
pub fn handle_at(corners: [Pos2; 4], pos: Pos2) -> Option<Handle> {
    handle_positions(corners)
        .into_iter()
        .find(|(_, center)| Rect::from_center_size(*center, Vec2::splat(HANDLE_SIZE)).contains(pos))
        .map(|(handle, _)| handle)
}

/// Draw the selection outline and its handles
pub fn draw_selection(painter: &Painter, corners: [Pos2; 4]) {
    let outline = Stroke::new(1.0, HANDLE_FILL);
    painter.add(egui::Shape::closed_line(corners.to_vec(), outline));

    for (handle, center) in handle_positions(corners) {
        match handle {
            Handle::Resize(_) => {
                let rect = Rect::from_center_size(center, Vec2::splat(HANDLE_SIZE));
                painter.rect_filled(rect, 2.0, HANDLE_FILL);
                painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::WHITE));
            }
            Handle::Rotate => {
                painter.circle_filled(center, HANDLE_SIZE / 2.0, HANDLE_FILL);
                painter.circle_stroke(center, HANDLE_SIZE / 2.0, Stroke::new(1.0, Color32::WHITE));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_hit_testing() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::new(100.0, 50.0));
        let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];

        assert_eq!(handle_at(corners, Pos2::new(111.0, 59.0)), Some(Handle::Resize(Corner::BottomRight)));
        assert_eq!(handle_at(corners, Pos2::new(60.0, 10.0 - ROTATE_HANDLE_OFFSET)), Some(Handle::Rotate));
        assert_eq!(handle_at(corners, Pos2::new(60.0, 35.0)), None);
    }
}

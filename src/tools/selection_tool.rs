use egui::{Pos2, Rect, Vec2};
use log::{debug, info};

use super::{Tool, ToolContext};
use crate::command::Command;
use crate::element::common::rotate;
use crate::element::{Element, MIN_TRANSFORM_SIZE, Shape, ShapeKind, TransformUpdate};
use crate::input::PointerTarget;
use crate::widgets::{Corner, Handle};

/// Gesture state of the select tool
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    Dragging {
        shape: Shape,
        start_pos: Pos2,
        preview: Option<Shape>,
    },
    Resizing {
        shape: Shape,
        corner: Corner,
        original_rect: Rect,
        start_pos: Pos2,
        preview: Option<Shape>,
        accepted: Option<TransformUpdate>,
    },
    Rotating {
        shape: Shape,
        center: Pos2,
        start_angle: f32,
        preview: Option<Shape>,
        accepted: Option<TransformUpdate>,
    },
}

impl SelectionState {
    fn preview(&self) -> Option<&Shape> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Dragging { preview, .. }
            | SelectionState::Resizing { preview, .. }
            | SelectionState::Rotating { preview, .. } => preview.as_ref(),
        }
    }
}

/// Select, drag, resize and rotate a single shape
#[derive(Debug, Clone)]
pub struct SelectionTool {
    pub state: SelectionState,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTool {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    fn begin_handle(&mut self, handle: Handle, pos: Pos2, ctx: &ToolContext<'_>) {
        let Some(shape) = ctx.selection.selected().and_then(|id| ctx.document.find(id)) else {
            debug!("Handle pressed without a selection");
            return;
        };
        let original_rect = shape.geometry_bounds();
        self.state = match handle {
            Handle::Resize(corner) => SelectionState::Resizing {
                shape: shape.clone(),
                corner,
                original_rect,
                start_pos: shape.canvas_to_local(pos),
                preview: None,
                accepted: None,
            },
            Handle::Rotate => {
                let center = shape.local_to_canvas(original_rect.center());
                SelectionState::Rotating {
                    shape: shape.clone(),
                    center,
                    start_angle: angle_of(pos - center),
                    preview: None,
                    accepted: None,
                }
            }
        };
    }

    /// Transform the current gesture would commit for the pointer at `pos`
    fn pending_update(&self, pos: Pos2) -> Option<TransformUpdate> {
        match &self.state {
            SelectionState::Resizing {
                shape,
                corner,
                original_rect,
                start_pos,
                ..
            } => {
                let delta = shape.canvas_to_local(pos) - *start_pos;
                let resized = calculate_preview_rect(*original_rect, *corner, delta);
                Some(resize_update(shape, *original_rect, resized))
            }
            SelectionState::Rotating {
                shape,
                center,
                start_angle,
                ..
            } => {
                let delta = (angle_of(pos - *center) - start_angle).to_degrees();
                Some(TransformUpdate {
                    position: *center + rotate(shape.position - *center, delta),
                    scale: Vec2::new(1.0, 1.0),
                    rotation: normalize_degrees(shape.transform.rotation + delta),
                })
            }
            SelectionState::Idle | SelectionState::Dragging { .. } => None,
        }
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn on_pointer_down(&mut self, pos: Pos2, target: &PointerTarget, ctx: &ToolContext<'_>) -> Option<Command> {
        match target {
            PointerTarget::Background => {
                self.state = SelectionState::Idle;
                Some(Command::ClearSelection)
            }
            PointerTarget::Shape(id) => {
                if let Some(shape) = ctx.document.find(id).filter(|shape| shape.is_draggable()) {
                    self.state = SelectionState::Dragging {
                        shape: shape.clone(),
                        start_pos: pos,
                        preview: None,
                    };
                }
                Some(Command::SelectShape(id.clone()))
            }
            PointerTarget::Handle(handle) => {
                self.begin_handle(*handle, pos, ctx);
                None
            }
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<Command> {
        let update = self.pending_update(pos);
        match &mut self.state {
            SelectionState::Idle => {}
            SelectionState::Dragging {
                shape,
                start_pos,
                preview,
            } => {
                let mut moved = shape.clone();
                moved.set_position(shape.position + (pos - *start_pos));
                *preview = Some(moved);
            }
            SelectionState::Resizing {
                shape,
                preview,
                accepted,
                ..
            }
            | SelectionState::Rotating {
                shape,
                preview,
                accepted,
                ..
            } => {
                if let Some(update) = update {
                    let mut transformed = shape.clone();
                    // A rejected frame keeps the last accepted box
                    if transformed.commit_transform(update).is_ok() {
                        *preview = Some(transformed);
                        *accepted = Some(update);
                    }
                }
            }
        }
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> Option<Command> {
        let update = self.pending_update(pos);
        let state = std::mem::replace(&mut self.state, SelectionState::Idle);
        match state {
            SelectionState::Idle => None,
            SelectionState::Dragging { shape, start_pos, .. } => {
                if pos == start_pos {
                    return None;
                }
                let position = shape.position + (pos - start_pos);
                info!("Finished dragging {} to {:?}", shape.id(), position);
                Some(Command::MoveShape {
                    id: shape.id().clone(),
                    position,
                })
            }
            SelectionState::Resizing { shape, accepted, .. } | SelectionState::Rotating { shape, accepted, .. } => {
                let valid = |update: &TransformUpdate| shape.clone().commit_transform(*update).is_ok();
                let Some(update) = update.filter(valid).or(accepted) else {
                    debug!("No acceptable transform for {}; keeping it as is", shape.id());
                    return None;
                };
                Some(Command::TransformShape {
                    id: shape.id().clone(),
                    update,
                })
            }
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.state, SelectionState::Idle)
    }

    fn preview(&self) -> Option<Shape> {
        self.state.preview().cloned()
    }

    fn reset(&mut self) {
        self.state = SelectionState::Idle;
    }
}

/// New bounds of `original_rect` after dragging `corner` by `delta`, never smaller than
/// the minimum transform size. The opposite corner stays fixed.
pub fn calculate_preview_rect(original_rect: Rect, corner: Corner, delta: Vec2) -> Rect {
    let min = MIN_TRANSFORM_SIZE;
    let mut rect = original_rect;

    match corner {
        Corner::TopLeft => {
            rect.min.x = (original_rect.min.x + delta.x).min(rect.max.x - min);
            rect.min.y = (original_rect.min.y + delta.y).min(rect.max.y - min);
        }
        Corner::TopRight => {
            rect.max.x = (original_rect.max.x + delta.x).max(rect.min.x + min);
            rect.min.y = (original_rect.min.y + delta.y).min(rect.max.y - min);
        }
        Corner::BottomLeft => {
            rect.min.x = (original_rect.min.x + delta.x).min(rect.max.x - min);
            rect.max.y = (original_rect.max.y + delta.y).max(rect.min.y + min);
        }
        Corner::BottomRight => {
            rect.max.x = (original_rect.max.x + delta.x).max(rect.min.x + min);
            rect.max.y = (original_rect.max.y + delta.y).max(rect.min.y + min);
        }
    }

    rect
}

/// Map the local geometry box `original` onto `resized`, expressed as a position/scale
/// update. Circles and text keep their proportions.
fn resize_update(shape: &Shape, original: Rect, resized: Rect) -> TransformUpdate {
    let ratio = |new: f32, old: f32| if old == 0.0 { 1.0 } else { new / old };
    let mut scale = Vec2::new(
        ratio(resized.width(), original.width()),
        ratio(resized.height(), original.height()),
    );
    match shape.kind {
        ShapeKind::Circle(_) => scale.y = scale.x,
        ShapeKind::Text(_) => scale.x = scale.y,
        _ => {}
    }

    let origin = resized.min - original.min.to_vec2() * scale;
    TransformUpdate {
        position: shape.local_to_canvas(origin),
        scale,
        rotation: shape.transform.rotation,
    }
}

fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

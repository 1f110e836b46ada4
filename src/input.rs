use egui::Pos2;

use crate::id_generator::ShapeId;
use crate::widgets::Handle;

/// What a pointer-down landed on, resolved by the host before dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum PointerTarget {
    /// Empty canvas
    Background,
    /// A committed shape
    Shape(ShapeId),
    /// A transformer handle of the selected shape
    Handle(Handle),
}

/// Canvas-local pointer events that drive gestures
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown { position: Pos2, target: PointerTarget },
    /// Mouse moved while a button is held
    PointerMove { position: Pos2 },
    /// Mouse button was released
    PointerUp { position: Pos2 },
    /// Pointer left the canvas; ends a gesture like a release
    PointerLeave { position: Pos2 },
}

impl InputEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            InputEvent::PointerDown { position, .. }
            | InputEvent::PointerMove { position }
            | InputEvent::PointerUp { position }
            | InputEvent::PointerLeave { position } => *position,
        }
    }

    pub fn down(position: Pos2, target: PointerTarget) -> Self {
        InputEvent::PointerDown { position, target }
    }

    pub fn moved(position: Pos2) -> Self {
        InputEvent::PointerMove { position }
    }

    pub fn up(position: Pos2) -> Self {
        InputEvent::PointerUp { position }
    }

    pub fn leave(position: Pos2) -> Self {
        InputEvent::PointerLeave { position }
    }
}

use egui::Pos2;
use log::{info, warn};

use super::{CommandContext, CommandError, CommandResult};
use crate::element::{Bitmap, Shape, TransformUpdate};
use crate::id_generator::ShapeId;

/// Mutations of the shape model. Tools produce these; the editor context executes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Commit a finished shape or stroke to the end of the sequence
    AddShape(Shape),

    /// End of a drag: only the position changes
    MoveShape { id: ShapeId, position: Pos2 },

    /// End of a resize/rotate on the selected shape
    TransformShape { id: ShapeId, update: TransformUpdate },

    /// Replace the selection with a single shape
    SelectShape(ShapeId),

    ClearSelection,

    /// Install a bitmap behind the shapes, keeping the shapes
    SetBackground(Bitmap),

    /// Discard every shape and stroke and show only this bitmap
    ReplaceWithImage(Bitmap),

    /// Empty shapes, strokes, background and selection
    Clear,
}

impl Command {
    /// Execute the command with the given context
    pub fn execute(self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::AddShape(shape) => ctx.document.append(shape),

            Command::MoveShape { id, position } => {
                ctx.document.update(&id, |shape| {
                    if !shape.is_draggable() {
                        return Err(CommandError::NotDraggable(id.clone()));
                    }
                    shape.set_position(position);
                    Ok(())
                })?;
                info!("🔄 Moved {} to {:?}", id, position);
                Ok(())
            }

            Command::TransformShape { id, update } => {
                if !ctx.selection.is_selected(&id) {
                    return Err(CommandError::NotSelected(id));
                }
                let result = ctx.document.update(&id, |shape| shape.commit_transform(update));
                match &result {
                    Ok(()) => info!("📐 Transformed {} (rotation {:.1})", id, update.rotation),
                    Err(err) => warn!("⚠️ {}", err),
                }
                result
            }

            Command::SelectShape(id) => {
                ctx.selection.select(&id, ctx.document);
                Ok(())
            }

            Command::ClearSelection => {
                ctx.selection.clear();
                Ok(())
            }

            Command::SetBackground(bitmap) => {
                ctx.document.set_background(bitmap);
                Ok(())
            }

            Command::ReplaceWithImage(bitmap) => {
                info!(
                    "✨ Replacing canvas content with {}x{} image",
                    bitmap.width(),
                    bitmap.height()
                );
                ctx.document.replace_all(Vec::new(), Some(bitmap));
                ctx.selection.clear();
                Ok(())
            }

            Command::Clear => {
                info!("🧹 Clearing canvas");
                ctx.document.clear();
                ctx.selection.clear();
                Ok(())
            }
        }
    }

    /// Short label for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddShape(_) => "AddShape",
            Command::MoveShape { .. } => "MoveShape",
            Command::TransformShape { .. } => "TransformShape",
            Command::SelectShape(_) => "SelectShape",
            Command::ClearSelection => "ClearSelection",
            Command::SetBackground(_) => "SetBackground",
            Command::ReplaceWithImage(_) => "ReplaceWithImage",
            Command::Clear => "Clear",
        }
    }
}

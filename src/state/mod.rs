pub mod context;
mod snapshot;

pub use context::EditorContext;
pub use snapshot::CanvasSnapshot;

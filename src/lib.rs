#![warn(clippy::all, rust_2018_idioms)]

pub mod ai;
pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod font;
pub mod id_generator;
pub mod input;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod selection;
pub mod serializer;
pub mod state;
pub mod texture_manager;
pub mod tools;
pub mod widgets;

pub use ai::{AiEditOrchestrator, DiffusionClient, EditOptions, EditStatus, ImageEditService};
pub use app::CanvasApp;
pub use command::{Command, CommandContext};
pub use config::EditorConfig;
pub use document::Document;
pub use element::{Element, Shape, ShapeKind, factory};
pub use error::{AiEditError, ApiError, BitmapError, CommandError, ConfigError, FileError, TransitionError};
pub use id_generator::ShapeId;
pub use input::{InputEvent, PointerTarget};
pub use renderer::Renderer;
pub use selection::Selection;
pub use serializer::CanvasSerializer;
pub use state::{CanvasSnapshot, EditorContext};
pub use tools::{BrushSettings, Tool, ToolKind};

mod commands;
mod context;

pub use commands::Command;
pub use context::CommandContext;
pub use crate::error::{CommandError, CommandResult};

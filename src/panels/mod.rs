mod ai_panel;
mod central_panel;
mod tools_panel;

pub use ai_panel::ai_panel;
pub use central_panel::central_panel;
pub use tools_panel::tools_panel;

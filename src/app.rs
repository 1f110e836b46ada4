//! Native eframe shell around the editing engine.
//!
//! The UI thread owns the [`EditorContext`] and never blocks: file reads, exports and
//! edit-service calls run on a tokio runtime and post their results to an inbox that
//! is drained at the start of every frame.
use std::path::PathBuf;
use std::sync::Arc;

use egui::{Pos2, Rect};
use log::{debug, error, info};
use parking_lot::Mutex;
use tokio::runtime::Runtime;

use crate::ai::{AiEditOrchestrator, DEFAULT_INFERENCE_STEPS, DiffusionClient, EditOptions, HealthResponse, ImageEditService};
use crate::config::EditorConfig;
use crate::element::Bitmap;
use crate::error::{AiEditError, ApiError, FileError, StartupError};
use crate::file_handler::{self, DroppedImage, FileHandler};
use crate::input::{InputEvent, PointerTarget};
use crate::panels::{ai_panel, central_panel, tools_panel};
use crate::renderer::Renderer;
use crate::serializer::{CanvasSerializer, EXPORT_FILE_NAME};
use crate::state::EditorContext;
use crate::tools::ToolKind;

/// Outcome of a background task, delivered to the UI thread
#[derive(Debug)]
enum TaskResult {
    Health(HealthCheck),
    Edit(Result<String, AiEditError>),
    DroppedImage { position: Pos2, result: Result<Bitmap, FileError> },
    Background(Result<Bitmap, FileError>),
    Exported(Result<PathBuf, FileError>),
}

/// Health result together with the service URL it was checked against
#[derive(Debug)]
struct HealthCheck {
    base_url: String,
    result: Result<HealthResponse, ApiError>,
}

impl HealthCheck {
    /// A check against a URL the user has since replaced says nothing about the
    /// current service
    fn applies_to(&self, client: &DiffusionClient) -> bool {
        self.base_url == client.base_url()
    }
}

/// State of the AI side panel's form
#[derive(Debug, Clone)]
pub(crate) struct EditForm {
    pub prompt: String,
    pub negative_prompt: String,
    pub steps: u32,
    pub fixed_seed: bool,
    pub seed: u64,
    pub api_url: String,
}

impl EditForm {
    pub fn options(&self) -> EditOptions {
        EditOptions {
            negative_prompt: self.negative_prompt.clone(),
            num_inference_steps: Some(self.steps),
            seed: self.fixed_seed.then_some(self.seed),
        }
    }
}

pub struct CanvasApp {
    runtime: Runtime,
    config: EditorConfig,
    pub(crate) editor: EditorContext,
    pub(crate) renderer: Renderer,
    pub(crate) orchestrator: AiEditOrchestrator<DiffusionClient>,
    serializer: CanvasSerializer,
    file_handler: FileHandler,
    inbox: Arc<Mutex<Vec<TaskResult>>>,

    pub(crate) form: EditForm,
    pub(crate) text_entry: String,
    pub(crate) background_path: String,
    pub(crate) export_path: String,
    pub(crate) show_clear_confirm: bool,
    pub(crate) status_message: Option<String>,
    pub(crate) canvas_rect: Option<Rect>,
    last_pointer: Option<Pos2>,
}

impl CanvasApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Result<Self, StartupError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let editor = EditorContext::from_config(&config)?;
        let serializer = CanvasSerializer::from_config(&config);
        let orchestrator = Self::build_orchestrator(&config, &config.api_base_url, serializer)?;

        let app = Self {
            runtime,
            editor,
            renderer: Renderer::new(),
            orchestrator,
            serializer,
            file_handler: FileHandler::new(),
            inbox: Arc::new(Mutex::new(Vec::new())),
            form: EditForm {
                prompt: String::new(),
                negative_prompt: String::new(),
                steps: DEFAULT_INFERENCE_STEPS,
                fixed_seed: false,
                seed: 0,
                api_url: config.api_base_url.clone(),
            },
            text_entry: String::new(),
            background_path: String::new(),
            export_path: EXPORT_FILE_NAME.to_owned(),
            show_clear_confirm: false,
            status_message: None,
            canvas_rect: None,
            last_pointer: None,
            config,
        };
        app.check_health(&cc.egui_ctx);
        Ok(app)
    }

    fn build_orchestrator(
        config: &EditorConfig,
        base_url: &str,
        serializer: CanvasSerializer,
    ) -> Result<AiEditOrchestrator<DiffusionClient>, ApiError> {
        let client = DiffusionClient::new(base_url, config.request_timeout())?;
        Ok(AiEditOrchestrator::new(client)
            .with_timeout(config.request_timeout())
            .with_serializer(serializer))
    }

    fn spawn<F>(&self, ctx: &egui::Context, task: F)
    where
        F: std::future::Future<Output = TaskResult> + Send + 'static,
    {
        let inbox = Arc::clone(&self.inbox);
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = task.await;
            inbox.lock().push(result);
            ctx.request_repaint();
        });
    }

    pub(crate) fn report(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub(crate) fn set_tool(&mut self, kind: ToolKind) {
        if let Err(err) = self.editor.set_tool(kind) {
            self.report(err.to_string());
        }
    }

    pub(crate) fn dispatch(&mut self, event: InputEvent) {
        if let Err(err) = self.editor.handle_event(event) {
            self.report(err.to_string());
        }
    }

    /// Translate this frame's pointer state over the canvas into input events
    pub(crate) fn handle_canvas_input(&mut self, ui: &egui::Ui, response: &egui::Response, canvas_rect: Rect) {
        let (pressed, released, latest) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
            )
        });
        let Some(screen_pos) = latest else {
            return;
        };
        let local = (screen_pos - canvas_rect.min).to_pos2();

        if response.hovered() {
            ui.ctx().set_cursor_icon(self.cursor_at(local));
        }

        if pressed && response.hovered() {
            let target = self.editor.target_at(local);
            self.dispatch(InputEvent::down(local, target));
            self.last_pointer = Some(local);
        }

        if !self.editor.is_drawing() {
            return;
        }
        if released {
            self.dispatch(InputEvent::up(local));
        } else if !canvas_rect.contains(screen_pos) {
            self.dispatch(InputEvent::leave(local));
        } else if self.last_pointer != Some(local) {
            self.dispatch(InputEvent::moved(local));
        }
        self.last_pointer = Some(local);
    }

    fn cursor_at(&self, local: Pos2) -> egui::CursorIcon {
        match self.editor.target_at(local) {
            PointerTarget::Handle(handle) => handle.cursor_icon(),
            PointerTarget::Shape(_) if self.editor.tool_kind() == ToolKind::Select => {
                egui::CursorIcon::Grab
            }
            _ => self.editor.tool_kind().cursor_icon(),
        }
    }

    pub(crate) fn check_health(&self, ctx: &egui::Context) {
        let service = Arc::clone(self.orchestrator.service());
        self.spawn(ctx, async move {
            let result = service.health().await;
            TaskResult::Health(HealthCheck {
                base_url: service.base_url().to_owned(),
                result,
            })
        });
    }

    /// Point the client at a new service URL and re-check its health
    pub(crate) fn apply_api_url(&mut self, ctx: &egui::Context) {
        if self.orchestrator.is_processing() {
            self.report("Cannot change the service URL while an edit is running");
            return;
        }
        match Self::build_orchestrator(&self.config, &self.form.api_url, self.serializer) {
            Ok(orchestrator) => {
                info!("🔗 Edit service set to {}", orchestrator.service().base_url());
                self.orchestrator = orchestrator;
                self.check_health(ctx);
            }
            Err(err) => self.report(err.to_string()),
        }
    }

    pub(crate) fn submit_edit(&mut self, ctx: &egui::Context) {
        let options = self.form.options();
        match self.orchestrator.begin(&self.form.prompt, &options, &self.editor) {
            Ok(pending) => {
                self.status_message = None;
                self.spawn(ctx, async move { TaskResult::Edit(pending.run().await) });
            }
            Err(err) => self.report(err.to_string()),
        }
    }

    pub(crate) fn load_background(&mut self, ctx: &egui::Context) {
        let path = PathBuf::from(self.background_path.trim());
        self.spawn(ctx, async move { TaskResult::Background(file_handler::read_image_file(&path).await) });
    }

    pub(crate) fn export(&mut self, ctx: &egui::Context) {
        let path = PathBuf::from(self.export_path.trim());
        let snapshot = self.editor.snapshot();
        let serializer = self.serializer;
        self.spawn(ctx, async move {
            let result = async {
                let png = serializer.export_png(&snapshot)?;
                file_handler::export_png(&path, &png).await?;
                Ok::<_, FileError>(path)
            };
            TaskResult::Exported(result.await)
        });
    }

    pub(crate) fn confirm_clear(&mut self) {
        self.editor.clear();
        self.show_clear_confirm = false;
        info!("🧹 Canvas cleared");
    }

    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = self.file_handler.take_dropped_images(ctx);
        if dropped.is_empty() {
            return;
        }
        let canvas_rect = self.canvas_rect.unwrap_or(Rect::ZERO);
        let pointer = ctx.input(|i| i.pointer.latest_pos());
        let position = pointer
            .filter(|pos| canvas_rect.contains(*pos))
            .map(|pos| (pos - canvas_rect.min).to_pos2())
            .unwrap_or(Pos2::ZERO);

        for image in dropped {
            self.load_dropped(ctx, image, position);
        }
    }

    fn load_dropped(&self, ctx: &egui::Context, image: DroppedImage, position: Pos2) {
        info!("📥 Loading dropped image {}", image.name);
        self.spawn(ctx, async move {
            TaskResult::DroppedImage {
                position,
                result: image.load().await,
            }
        });
    }

    fn drain_inbox(&mut self) {
        let results = std::mem::take(&mut *self.inbox.lock());
        for result in results {
            match result {
                TaskResult::Health(check) => {
                    if check.applies_to(self.orchestrator.service()) {
                        self.orchestrator.record_health(check.result);
                    } else {
                        debug!("Dropping health result for stale URL {}", check.base_url);
                    }
                }
                TaskResult::Edit(result) => {
                    if let Err(err) = self.orchestrator.finish(result, &mut self.editor) {
                        self.report(err.to_string());
                    }
                }
                TaskResult::DroppedImage { position, result } => match result {
                    Ok(bitmap) => {
                        if let Err(err) = self.editor.insert_image(position, bitmap) {
                            self.report(err.to_string());
                        }
                    }
                    Err(err) => {
                        error!("❌ Failed to load dropped image: {}", err);
                        self.report(err.to_string());
                    }
                },
                TaskResult::Background(result) => match result {
                    Ok(bitmap) => self.editor.load_background(bitmap),
                    Err(err) => {
                        error!("❌ Failed to load background: {}", err);
                        self.report(err.to_string());
                    }
                },
                TaskResult::Exported(result) => match result {
                    Ok(path) => self.report(format!("Exported to {}", path.display())),
                    Err(err) => {
                        error!("❌ Export failed: {}", err);
                        self.report(err.to_string());
                    }
                },
            }
        }
    }

    fn text_entry_window(&mut self, ctx: &egui::Context) {
        let Some(at) = self.editor.pending_text_request() else {
            return;
        };
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Add text")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let response = ui.text_edit_singleline(&mut self.text_entry);
                response.request_focus();
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.horizontal(|ui| {
                    submit |= ui.button("Add").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if submit {
            let content = std::mem::take(&mut self.text_entry);
            if let Err(err) = self.editor.insert_text(at, &content) {
                self.report(err.to_string());
            }
        } else if cancel {
            self.text_entry.clear();
            self.editor.cancel_text_request();
        }
    }

    fn clear_confirm_window(&mut self, ctx: &egui::Context) {
        if !self.show_clear_confirm {
            return;
        }
        egui::Window::new("Clear canvas")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Remove every shape, stroke and the background?");
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        self.confirm_clear();
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_clear_confirm = false;
                    }
                });
            });
    }
}

impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_inbox();
        self.accept_dropped_files(ctx);

        tools_panel(self, ctx);
        ai_panel(self, ctx);
        central_panel(self, ctx);

        self.text_entry_window(ctx);
        self.clear_confirm_window(ctx);
        self.file_handler.preview_files_being_dropped(ctx);

        if self.orchestrator.is_processing() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_health_check_ignored_after_url_change() {
        let old = DiffusionClient::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
        let new = DiffusionClient::new("http://gpu-box:9000/", Duration::from_secs(5)).unwrap();
        let check = HealthCheck {
            base_url: old.base_url().to_owned(),
            result: Ok(HealthResponse {
                status: "healthy".to_owned(),
                model_loaded: true,
                cuda_available: true,
            }),
        };

        assert!(check.applies_to(&old));
        assert!(!check.applies_to(&new));
    }
}

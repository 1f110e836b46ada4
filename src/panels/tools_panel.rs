use egui::Slider;

use crate::app::CanvasApp;
use crate::components::ToolButton;
use crate::tools::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, ToolKind};

pub fn tools_panel(app: &mut CanvasApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.editor.tool_kind();
            ui.horizontal_wrapped(|ui| {
                for kind in ToolKind::ALL {
                    if ToolButton::new(kind, kind == active).show(ui).clicked() {
                        app.set_tool(kind);
                    }
                }
            });
            ui.label(format!("Active: {}", app.editor.tool_kind().name()));
            ui.separator();

            let brush = app.editor.brush();
            let mut color = brush.color;
            ui.horizontal(|ui| {
                ui.label("Color:");
                egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::Opaque);
            });
            if color != brush.color {
                app.editor.set_brush_color(color);
            }

            let mut size = brush.size();
            ui.horizontal(|ui| {
                ui.label("Size:");
                ui.add(Slider::new(&mut size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE));
            });
            if size != brush.size() {
                app.editor.set_brush_size(size);
            }
            ui.separator();

            ui.label("Background image");
            ui.text_edit_singleline(&mut app.background_path);
            let has_path = !app.background_path.trim().is_empty();
            if ui.add_enabled(has_path, egui::Button::new("📂 Load background")).clicked() {
                app.load_background(ctx);
            }

            ui.label("Export file");
            ui.text_edit_singleline(&mut app.export_path);
            let has_path = !app.export_path.trim().is_empty();
            if ui.add_enabled(has_path, egui::Button::new("💾 Export PNG")).clicked() {
                app.export(ctx);
            }
            ui.separator();

            if ui.button("🗑 Clear canvas").clicked() {
                app.show_clear_confirm = true;
            }

            let document = app.editor.document();
            ui.label(format!(
                "{} shapes, {} strokes",
                document.figures().count(),
                document.strokes().count()
            ));

            if let Some(message) = &app.status_message {
                ui.separator();
                ui.label(message);
            }
        });
}

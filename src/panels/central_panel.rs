use egui::{Color32, Rect, Sense, Stroke};

use crate::app::CanvasApp;

pub fn central_panel(app: &mut CanvasApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let canvas_size = app.editor.canvas_size();
        let available = ui.available_rect_before_wrap();
        let canvas_rect = Rect::from_min_size(available.min, canvas_size);

        let response = ui.allocate_rect(canvas_rect, Sense::click_and_drag());
        app.canvas_rect = Some(canvas_rect);
        app.handle_canvas_input(ui, &response, canvas_rect);

        let snapshot = app.editor.snapshot();
        app.renderer.render(ui.painter(), canvas_rect, &snapshot);
        ui.painter()
            .rect_stroke(canvas_rect, 0.0, Stroke::new(1.0, Color32::from_gray(120)));
    });
}

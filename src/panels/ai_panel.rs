use egui::{Color32, DragValue, RichText, Slider};

use crate::ai::{EditStatus, MAX_INFERENCE_STEPS, MIN_INFERENCE_STEPS, PROMPT_SUGGESTIONS, random_seed};
use crate::app::CanvasApp;

pub fn ai_panel(app: &mut CanvasApp, ctx: &egui::Context) {
    egui::SidePanel::right("ai_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("AI Edit");

            ui.horizontal(|ui| {
                let (text, color) = if app.orchestrator.is_available() {
                    ("● Service ready", Color32::from_rgb(76, 175, 80))
                } else {
                    ("● Service unavailable", Color32::from_rgb(244, 67, 54))
                };
                ui.label(RichText::new(text).color(color));
                if ui.small_button("⟳").on_hover_text("Check again").clicked() {
                    app.check_health(ctx);
                }
            });

            ui.collapsing("Service", |ui| {
                ui.text_edit_singleline(&mut app.form.api_url);
                if ui.button("Apply").clicked() {
                    app.apply_api_url(ctx);
                }
            });
            ui.separator();

            let processing = app.orchestrator.is_processing();

            ui.label("Prompt");
            ui.add_enabled(
                !processing,
                egui::TextEdit::multiline(&mut app.form.prompt)
                    .hint_text("Describe the edit")
                    .desired_rows(3),
            );

            ui.collapsing("Suggestions", |ui| {
                for suggestion in PROMPT_SUGGESTIONS {
                    if ui.add_enabled(!processing, egui::Button::new(suggestion)).clicked() {
                        app.form.prompt = suggestion.to_owned();
                    }
                }
            });

            ui.collapsing("Advanced", |ui| {
                ui.label("Negative prompt");
                ui.text_edit_singleline(&mut app.form.negative_prompt);
                ui.horizontal(|ui| {
                    ui.label("Steps:");
                    ui.add(Slider::new(&mut app.form.steps, MIN_INFERENCE_STEPS..=MAX_INFERENCE_STEPS));
                });
                ui.horizontal(|ui| {
                    ui.checkbox(&mut app.form.fixed_seed, "Seed");
                    ui.add_enabled(app.form.fixed_seed, DragValue::new(&mut app.form.seed));
                    if ui.button("🎲").on_hover_text("Random seed").clicked() {
                        app.form.fixed_seed = true;
                        app.form.seed = random_seed();
                    }
                });
            });
            ui.separator();

            let can_submit = !processing && app.orchestrator.is_available() && !app.form.prompt.trim().is_empty();
            ui.horizontal(|ui| {
                if ui.add_enabled(can_submit, egui::Button::new("✨ Generate")).clicked() {
                    app.submit_edit(ctx);
                }
                if processing {
                    ui.spinner();
                    if ui.button("Cancel").clicked() {
                        app.orchestrator.cancel();
                    }
                }
            });

            match app.orchestrator.status() {
                EditStatus::Processing => {
                    ui.label("Processing...");
                }
                EditStatus::Succeeded => {
                    ui.label("Edit applied");
                }
                EditStatus::Failed | EditStatus::Idle => {}
            }
            if let Some(message) = app.orchestrator.last_error() {
                ui.label(RichText::new(message).color(Color32::from_rgb(244, 67, 54)));
            }
        });
}

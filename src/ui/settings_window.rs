//! Settings window for the API endpoint, refresh timing and chart defaults.

use eframe::egui;
use tracing::info;

use crate::app::ChillRateApp;
use crate::state::MUTED_TEXT_COLOR;

impl ChillRateApp {
    pub fn render_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut open = true;
        let mut save = false;

        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .default_width(420.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let draft = &mut self.settings_draft;

                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("API base URL");
                        ui.add(
                            egui::TextEdit::singleline(&mut draft.api_base_url)
                                .desired_width(260.0),
                        );
                        ui.end_row();

                        ui.label("Request timeout (s)");
                        ui.add(egui::DragValue::new(&mut draft.request_timeout_secs).range(1..=120));
                        ui.end_row();

                        ui.label("First refresh after (ms)");
                        ui.add(
                            egui::DragValue::new(&mut draft.poll_initial_delay_ms)
                                .range(0..=60_000)
                                .speed(100),
                        );
                        ui.end_row();

                        ui.label("Refresh every (ms)");
                        ui.add(
                            egui::DragValue::new(&mut draft.poll_period_ms)
                                .range(500..=600_000)
                                .speed(100),
                        );
                        ui.end_row();

                        ui.label("Show last (0 = all)");
                        ui.add(egui::DragValue::new(&mut draft.default_show_last).range(0..=10_000));
                        ui.end_row();

                        ui.label("Point markers");
                        ui.checkbox(&mut draft.show_dots, "Show dots");
                        ui.end_row();
                    });

                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(
                        "API URL changes apply on next start; CHILLRATE_API_URL overrides it.",
                    )
                    .small()
                    .color(super::rgb(MUTED_TEXT_COLOR)),
                );
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if ui.button("Reset to defaults").clicked() {
                        *draft = Default::default();
                    }
                });
            });

        if save {
            self.settings = self.settings_draft.clone();
            match self.settings.save() {
                Ok(()) => {
                    info!("Settings saved");
                    self.show_toast_success("Settings saved");
                    self.show_settings = false;
                }
                Err(e) => self.show_toast_error(&e),
            }
        }

        if !open {
            self.show_settings = false;
        }
    }
}

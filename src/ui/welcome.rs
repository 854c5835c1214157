//! Landing screen for signed-out users.

use eframe::egui;

use crate::app::ChillRateApp;
use crate::state::{Screen, MUTED_TEXT_COLOR};

impl ChillRateApp {
    pub fn render_welcome(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.label(egui::RichText::new("Welcome to ChillRate").size(32.0).strong());
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new(
                    "Track how relaxed your team is, member by member, in real time.",
                )
                .size(16.0)
                .color(super::rgb(MUTED_TEXT_COLOR)),
            );
            ui.add_space(24.0);

            if self.is_restoring() {
                ui.spinner();
                ui.label("Restoring your session...");
                return;
            }

            ui.horizontal(|ui| {
                // Center the two buttons
                let width = 260.0;
                ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));
                if ui
                    .add_sized([120.0, 36.0], egui::Button::new("Sign in"))
                    .clicked()
                {
                    self.auth_form.is_login = true;
                    self.navigate(Screen::Auth);
                }
                ui.add_space(20.0);
                if ui
                    .add_sized([120.0, 36.0], egui::Button::new("Create account"))
                    .clicked()
                {
                    self.auth_form.is_login = false;
                    self.navigate(Screen::Auth);
                }
            });
        });
    }
}

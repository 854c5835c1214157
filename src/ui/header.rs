//! Top bar: brand, navigation and the signed-in user.

use eframe::egui;

use crate::app::ChillRateApp;
use crate::state::{Screen, ACCENT_COLOR, PRIMARY_COLOR};

impl ChillRateApp {
    pub fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Chill")
                    .size(22.0)
                    .strong()
                    .color(super::rgb(PRIMARY_COLOR)),
            );
            ui.label(
                egui::RichText::new("Rate")
                    .size(22.0)
                    .strong()
                    .color(super::rgb(ACCENT_COLOR)),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⚙ Settings").clicked() {
                    self.settings_draft = self.settings.clone();
                    self.show_settings = true;
                }

                match self.user.clone() {
                    Some(user) => {
                        if ui.button("Log out").clicked() {
                            self.logout();
                        }
                        if ui.button("My teams").clicked() {
                            self.navigate(Screen::Main);
                        }
                        ui.label(egui::RichText::new(user.display_name()).strong());
                    }
                    None if self.is_restoring() => {
                        ui.spinner();
                    }
                    None => {
                        if ui.button("Sign in").clicked() {
                            self.auth_form.is_login = true;
                            self.navigate(Screen::Auth);
                        }
                    }
                }
            });
        });
        ui.add_space(6.0);
    }
}

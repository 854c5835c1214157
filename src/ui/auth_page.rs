//! Login / register form and the confirm-email screen.

use eframe::egui;
use tracing::{info, warn};

use crate::api::Credentials;
use crate::app::ChillRateApp;
use crate::state::{AuthOutcome, LoadResult, Screen, MUTED_TEXT_COLOR};

impl ChillRateApp {
    fn submit_auth(&mut self) {
        if let Err(message) = self.auth_form.validate() {
            self.auth_form.error = Some(message);
            return;
        }
        self.auth_form.error = None;

        let credentials = Credentials {
            name: self.auth_form.name.trim().to_string(),
            email: self.auth_form.email.trim().to_string(),
            password: self.auth_form.password.clone(),
        };
        let is_login = self.auth_form.is_login;
        let client = self.client.clone();

        self.auth_form.receiver = Some(self.spawn_job(move || {
            let result = if is_login {
                client.authenticate(&credentials)
            } else {
                client.register_admin(&credentials)
            };
            match result {
                Ok(response) if is_login => LoadResult::Success(AuthOutcome::SignedIn {
                    user: response.user,
                    token: response.access_token,
                }),
                Ok(response) => LoadResult::Success(AuthOutcome::Registered {
                    user: response.user,
                    token: response.access_token,
                }),
                Err(e) => LoadResult::Error(e.to_string()),
            }
        }));
    }

    /// Check for a completed login/register request
    pub fn check_auth_complete(&mut self) {
        let Some(receiver) = &self.auth_form.receiver else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.auth_form.receiver = None;

        match result {
            LoadResult::Success(AuthOutcome::SignedIn { user, token }) => {
                self.auth_form.password.clear();
                // The broadcast moves us to the main page
                if let Err(e) = self.session.login(user, &token, true) {
                    warn!("Failed to persist session: {}", e);
                    self.show_toast_error(&format!("Could not save session: {}", e));
                }
            }
            LoadResult::Success(AuthOutcome::Registered { user, token }) => {
                info!("Registered {}", user.email);
                self.auth_form.password.clear();
                if let Err(e) = self.session.login(user, &token, false) {
                    warn!("Failed to persist session: {}", e);
                }
                self.navigate(Screen::ConfirmEmail);
            }
            LoadResult::Error(message) => {
                self.auth_form.error = Some(message);
            }
        }
    }

    pub fn render_auth_page(&mut self, ui: &mut egui::Ui) {
        let busy = self.auth_form.receiver.is_some();
        let mut submit = false;

        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.set_max_width(380.0);

            super::card_frame().show(ui, |ui| {
                let title = if self.auth_form.is_login {
                    "Sign in"
                } else {
                    "Create a coach account"
                };
                ui.heading(title);
                ui.add_space(12.0);

                if !self.auth_form.is_login {
                    ui.label("Name");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.auth_form.name)
                            .hint_text("Your name")
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(6.0);
                }

                ui.label("E-mail");
                ui.add(
                    egui::TextEdit::singleline(&mut self.auth_form.email)
                        .hint_text("coach@example.com")
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                ui.label("Password");
                let password = ui.add(
                    egui::TextEdit::singleline(&mut self.auth_form.password)
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }

                if let Some(error) = &self.auth_form.error {
                    ui.add_space(6.0);
                    super::error_label(ui, error);
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    let label = if self.auth_form.is_login {
                        "Sign in"
                    } else {
                        "Register"
                    };
                    if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
                        submit = true;
                    }
                    if busy {
                        ui.spinner();
                    }
                });

                ui.add_space(8.0);
                let toggle = if self.auth_form.is_login {
                    "No account yet? Register"
                } else {
                    "Already registered? Sign in"
                };
                if ui.link(toggle).clicked() {
                    self.auth_form.is_login = !self.auth_form.is_login;
                    self.auth_form.error = None;
                }
            });
        });

        if submit && !busy {
            self.submit_auth();
        }
    }

    pub fn render_confirm_email(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(egui::RichText::new("Check your inbox").size(26.0).strong());
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new(
                    "We sent a confirmation link to your e-mail. Confirm it, then sign in.",
                )
                .color(super::rgb(MUTED_TEXT_COLOR)),
            );
            ui.add_space(16.0);
            if ui.button("Go to sign in").clicked() {
                self.auth_form.is_login = true;
                self.navigate(Screen::Auth);
            }
        });
    }
}

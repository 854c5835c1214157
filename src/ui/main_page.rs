//! Main page: the coach's teams, pending join requests and the invite link.

use eframe::egui;
use tracing::warn;

use super::invite_qr::{paint_qr, QrGrid};
use crate::app::ChillRateApp;
use crate::state::{
    unique_member_count, LoadResult, LoadingState, MainPageData, Screen, MUTED_TEXT_COLOR,
};

/// Side of the invite QR code, in points
const INVITE_QR_SIZE: f32 = 180.0;

impl ChillRateApp {
    /// Reset the main page and start loading its data
    pub(crate) fn open_main_page(&mut self) {
        self.main_page.error = None;
        self.main_page.adding_team = false;
        self.reload_main_page();

        if self.main_page.invite_url.is_none() {
            let client = self.client.clone();
            self.main_page.invite_receiver = Some(self.spawn_job(move || {
                match client.admin_url() {
                    Ok(url) => LoadResult::Success(url),
                    Err(e) => LoadResult::Error(e.to_string()),
                }
            }));
        }
    }

    fn reload_main_page(&mut self) {
        let client = self.client.clone();
        self.main_page.loading = LoadingState::Loading("teams".to_string());
        self.main_page.receiver = Some(self.spawn_job(move || {
            let (teams, requests) = rayon::join(|| client.list_teams(), || client.wait_users());
            let mut errors = Vec::new();
            let teams = teams.unwrap_or_else(|e| {
                errors.push(e.to_string());
                Vec::new()
            });
            let requests = requests.unwrap_or_else(|e| {
                errors.push(e.to_string());
                Vec::new()
            });
            LoadResult::Success(MainPageData {
                teams,
                requests,
                errors,
            })
        }));
    }

    /// Check for completed main page loads and actions
    pub fn check_main_page_complete(&mut self) {
        if let Some(receiver) = &self.main_page.receiver {
            if let Ok(result) = receiver.try_recv() {
                self.main_page.receiver = None;
                self.main_page.loading = LoadingState::Idle;
                match result {
                    LoadResult::Success(data) => {
                        self.main_page.teams = data.teams;
                        self.main_page.requests = data.requests;
                        self.main_page.error = if data.errors.is_empty() {
                            None
                        } else {
                            Some(data.errors.join("; "))
                        };
                    }
                    LoadResult::Error(e) => self.main_page.error = Some(e),
                }
            }
        }

        if let Some(receiver) = &self.main_page.invite_receiver {
            if let Ok(result) = receiver.try_recv() {
                self.main_page.invite_receiver = None;
                match result {
                    LoadResult::Success(url) => {
                        self.main_page.invite_qr = QrGrid::encode(&url);
                        self.main_page.invite_url = Some(url);
                    }
                    LoadResult::Error(e) => warn!("Failed to load invite URL: {}", e),
                }
            }
        }

        if let Some(receiver) = &self.main_page.action_receiver {
            if let Ok(result) = receiver.try_recv() {
                self.main_page.action_receiver = None;
                match result {
                    LoadResult::Success(message) => {
                        self.show_toast_success(&message);
                        self.reload_main_page();
                    }
                    LoadResult::Error(e) => {
                        self.main_page.error = Some(e.clone());
                        self.show_toast_error(&e);
                    }
                }
            }
        }
    }

    fn create_team(&mut self) {
        let name = self.main_page.new_team_name.trim().to_string();
        if name.is_empty() {
            self.main_page.error = Some("Team name cannot be empty".to_string());
            return;
        }
        self.main_page.new_team_name.clear();
        self.main_page.adding_team = false;

        let client = self.client.clone();
        self.main_page.action_receiver = Some(self.spawn_job(move || {
            match client.create_team(&name) {
                Ok(_) => LoadResult::Success(format!("Team \"{}\" created", name)),
                Err(e) => LoadResult::Error(e.to_string()),
            }
        }));
    }

    fn accept_request(&mut self, team_id: String, email: String) {
        let client = self.client.clone();
        self.main_page.action_receiver = Some(self.spawn_job(move || {
            match client.accept_user(&team_id, &email) {
                Ok(()) => LoadResult::Success(format!("{} added to the team", email)),
                Err(e) => LoadResult::Error(e.to_string()),
            }
        }));
    }

    pub fn render_main_page(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.add_space(12.0);

            if let Some(error) = &self.main_page.error {
                super::error_label(ui, error);
                ui.add_space(8.0);
            }

            ui.columns(2, |columns| {
                self.render_teams_card(&mut columns[0]);
                self.render_invite_card(&mut columns[1]);
                columns[1].add_space(16.0);
                self.render_requests_card(&mut columns[1]);
            });
        });
    }

    fn render_teams_card(&mut self, ui: &mut egui::Ui) {
        let mut open_team: Option<String> = None;
        let mut create = false;

        super::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            super::section_heading(ui, "My teams");

            ui.label(
                egui::RichText::new(format!(
                    "{} teams · {} members",
                    self.main_page.teams.len(),
                    unique_member_count(&self.main_page.teams)
                ))
                .color(super::rgb(MUTED_TEXT_COLOR)),
            );
            ui.add_space(8.0);

            if self.main_page.loading.is_loading() && self.main_page.teams.is_empty() {
                ui.spinner();
            }

            for team in &self.main_page.teams {
                let label = format!("{}  ({} members)", team.name, team.clients.len());
                if ui
                    .add_sized(
                        [ui.available_width(), 32.0],
                        egui::Button::new(label).frame(true),
                    )
                    .clicked()
                {
                    open_team = Some(team.id.clone());
                }
            }

            ui.add_space(8.0);
            if self.main_page.adding_team {
                ui.horizontal(|ui| {
                    let input = ui.add(
                        egui::TextEdit::singleline(&mut self.main_page.new_team_name)
                            .hint_text("Team name"),
                    );
                    if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        create = true;
                    }
                    if ui.button("Create").clicked() {
                        create = true;
                    }
                    if ui.button("Cancel").clicked() {
                        self.main_page.adding_team = false;
                    }
                });
            } else if ui.button("➕ Add team").clicked() {
                self.main_page.adding_team = true;
            }
        });

        if create {
            self.create_team();
        }
        if let Some(team_id) = open_team {
            self.navigate(Screen::Team(team_id));
        }
    }

    fn render_invite_card(&mut self, ui: &mut egui::Ui) {
        let mut copied = false;

        super::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            super::section_heading(ui, "Invite members");

            match &self.main_page.invite_url {
                Some(url) => {
                    ui.label(
                        egui::RichText::new("Athletes scan this code or open the link:")
                            .color(super::rgb(MUTED_TEXT_COLOR)),
                    );
                    if let Some(grid) = &self.main_page.invite_qr {
                        ui.vertical_centered(|ui| {
                            paint_qr(ui, grid, INVITE_QR_SIZE).on_hover_text(url.as_str());
                        });
                        ui.add_space(6.0);
                    }
                    ui.add(egui::Label::new(egui::RichText::new(url).monospace()).wrap());
                    ui.horizontal(|ui| {
                        if ui.button("📋 Copy").clicked() {
                            ui.ctx().copy_text(url.clone());
                            copied = true;
                        }
                        if ui.button("🌐 Open").clicked() {
                            if let Err(e) = open::that(url) {
                                warn!("Failed to open invite URL: {}", e);
                            }
                        }
                    });
                }
                None if self.main_page.invite_receiver.is_some() => {
                    ui.spinner();
                }
                None => {
                    ui.label("Invite link unavailable");
                }
            }
        });

        if copied {
            self.show_toast("Invite link copied");
        }
    }

    fn render_requests_card(&mut self, ui: &mut egui::Ui) {
        let mut accept: Option<(String, String)> = None;
        let busy = self.main_page.action_receiver.is_some();

        super::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            super::section_heading(ui, "Join requests");

            if self.main_page.requests.is_empty() {
                ui.label(
                    egui::RichText::new("No pending requests")
                        .color(super::rgb(MUTED_TEXT_COLOR)),
                );
                return;
            }

            let teams = &self.main_page.teams;
            for request in &self.main_page.requests {
                ui.separator();
                ui.label(
                    egui::RichText::new(request.name.as_deref().unwrap_or("Unnamed")).strong(),
                );
                ui.label(
                    egui::RichText::new(&request.email).color(super::rgb(MUTED_TEXT_COLOR)),
                );

                if teams.is_empty() {
                    ui.label("Create a team first");
                    continue;
                }

                let chosen = self
                    .main_page
                    .request_team
                    .entry(request.email.clone())
                    .or_insert_with(|| teams[0].id.clone());
                let chosen_name = teams
                    .iter()
                    .find(|t| &t.id == chosen)
                    .map(|t| t.name.clone())
                    .unwrap_or_default();

                ui.horizontal(|ui| {
                    egui::ComboBox::from_id_salt(format!("request_team_{}", request.email))
                        .selected_text(chosen_name)
                        .show_ui(ui, |ui| {
                            for team in teams {
                                ui.selectable_value(chosen, team.id.clone(), &team.name);
                            }
                        });
                    if ui.add_enabled(!busy, egui::Button::new("Accept")).clicked() {
                        accept = Some((chosen.clone(), request.email.clone()));
                    }
                });
            }
        });

        if let Some((team_id, email)) = accept {
            self.accept_request(team_id, email);
        }
    }
}

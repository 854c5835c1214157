//! Team page: members with their latest relaxation level.

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::app::ChillRateApp;
use crate::state::{
    member_matches, relaxation_average, LoadResult, LoadingState, MemberRow, RelaxationBand,
    Screen, TeamAction, TeamPageData, TeamPageState, MUTED_TEXT_COLOR,
};

impl ChillRateApp {
    pub(crate) fn open_team_page(&mut self, team_id: String) {
        let mut page = TeamPageState::new(team_id);
        page.receiver = Some(self.spawn_team_load(&page.team_id));
        page.loading = LoadingState::Loading("team".to_string());
        self.team_page = Some(page);
    }

    /// Fetch the team, then every member's latest reading in parallel
    fn spawn_team_load(&self, team_id: &str) -> std::sync::mpsc::Receiver<LoadResult<TeamPageData>> {
        let client = self.client.clone();
        let team_id = team_id.to_string();
        self.spawn_job(move || {
            let team = match client.team(&team_id) {
                Ok(team) => team,
                Err(e) => return LoadResult::Error(e.to_string()),
            };

            let rows: Vec<MemberRow> = team
                .clients
                .par_iter()
                .map(|user| {
                    let latest = client
                        .latest_measurement(&team_id, &user.id)
                        .unwrap_or_else(|e| {
                            warn!("No latest reading for {}: {}", user.id, e);
                            None
                        });
                    MemberRow {
                        user: user.clone(),
                        latest,
                    }
                })
                .collect();

            LoadResult::Success(TeamPageData { team, rows })
        })
    }

    /// Check for completed team page loads and actions
    pub fn check_team_page_complete(&mut self) {
        let mut deleted = false;
        let mut reload = false;

        if let Some(page) = &mut self.team_page {
            if let Some(receiver) = &page.receiver {
                if let Ok(result) = receiver.try_recv() {
                    page.receiver = None;
                    page.loading = LoadingState::Idle;
                    match result {
                        LoadResult::Success(data) => {
                            page.team = Some(data.team);
                            page.rows = data.rows;
                            page.error = None;
                        }
                        LoadResult::Error(e) => page.error = Some(e),
                    }
                }
            }

            if let Some(receiver) = &page.action_receiver {
                if let Ok(result) = receiver.try_recv() {
                    page.action_receiver = None;
                    match result {
                        LoadResult::Success(TeamAction::MemberRemoved(user_id)) => {
                            info!("Removed {} from team {}", user_id, page.team_id);
                            reload = true;
                        }
                        LoadResult::Success(TeamAction::TeamDeleted) => {
                            info!("Deleted team {}", page.team_id);
                            deleted = true;
                        }
                        LoadResult::Error(e) => page.error = Some(e),
                    }
                }
            }
        }

        if deleted {
            self.show_toast_success("Team deleted");
            self.navigate(Screen::Main);
        } else if reload {
            self.show_toast_success("Member removed");
            if let Some(team_id) = self.team_page.as_ref().map(|p| p.team_id.clone()) {
                let receiver = self.spawn_team_load(&team_id);
                if let Some(page) = &mut self.team_page {
                    page.receiver = Some(receiver);
                    page.loading = LoadingState::Loading("team".to_string());
                }
            }
        }
    }

    fn remove_member(&mut self, user_id: String) {
        let Some(team_id) = self.team_page.as_ref().map(|p| p.team_id.clone()) else {
            return;
        };
        let client = self.client.clone();
        let receiver = self.spawn_job(move || match client.remove_user(&team_id, &user_id) {
            Ok(()) => LoadResult::Success(TeamAction::MemberRemoved(user_id)),
            Err(e) => LoadResult::Error(e.to_string()),
        });
        if let Some(page) = &mut self.team_page {
            page.action_receiver = Some(receiver);
        }
    }

    fn delete_team(&mut self) {
        let Some(team_id) = self.team_page.as_ref().map(|p| p.team_id.clone()) else {
            return;
        };
        let client = self.client.clone();
        let receiver = self.spawn_job(move || match client.delete_team(&team_id) {
            Ok(()) => LoadResult::Success(TeamAction::TeamDeleted),
            Err(e) => LoadResult::Error(e.to_string()),
        });
        if let Some(page) = &mut self.team_page {
            page.action_receiver = Some(receiver);
        }
    }

    pub fn render_team_page(&mut self, ui: &mut egui::Ui) {
        let Some(page) = &mut self.team_page else {
            return;
        };

        let mut go_back = false;
        let mut open_member: Option<String> = None;
        let mut remove: Option<String> = None;
        let mut delete = false;
        let busy = page.action_receiver.is_some();

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("← Teams").clicked() {
                go_back = true;
            }
            let title = page
                .team
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "Team".to_string());
            ui.heading(title);
            if page.loading.is_loading() {
                ui.spinner();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if page.confirm_delete {
                    if ui.button("Cancel").clicked() {
                        page.confirm_delete = false;
                    }
                    if ui
                        .add_enabled(!busy, egui::Button::new("Yes, delete"))
                        .clicked()
                    {
                        delete = true;
                        page.confirm_delete = false;
                    }
                    ui.label("Delete this team?");
                } else if ui.button("🗑 Delete team").clicked() {
                    page.confirm_delete = true;
                }
            });
        });

        if let Some(error) = &page.error {
            super::error_label(ui, error);
        }
        ui.add_space(8.0);

        // Summary
        ui.horizontal(|ui| {
            ui.label(format!("Members: {}", page.rows.len()));
            ui.separator();
            match relaxation_average(&page.rows) {
                Some(avg) => {
                    ui.label("Average relaxation:");
                    ui.label(
                        egui::RichText::new(format!("{:.0}%", avg))
                            .strong()
                            .color(super::rgb(RelaxationBand::of(avg).color())),
                    );
                }
                None => {
                    ui.label(
                        egui::RichText::new("No readings yet")
                            .color(super::rgb(MUTED_TEXT_COLOR)),
                    );
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut page.search)
                        .hint_text("Search members")
                        .desired_width(220.0),
                );
            });
        });
        ui.add_space(8.0);

        let rows: Vec<&MemberRow> = page
            .rows
            .iter()
            .filter(|row| member_matches(&row.user, &page.search))
            .collect();

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(160.0))
            .column(Column::remainder().at_least(200.0))
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(160.0))
            .header(24.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Member");
                });
                header.col(|ui| {
                    ui.strong("Relaxation");
                });
                header.col(|ui| {
                    ui.strong("Last update");
                });
                header.col(|ui| {
                    ui.strong("");
                });
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(34.0, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(row.user.email_local_part());
                        });
                        table_row.col(|ui| match &row.latest {
                            Some(point) => {
                                let fraction = (point.anxiety / 100.0).clamp(0.0, 1.0) as f32;
                                ui.add(
                                    egui::ProgressBar::new(fraction)
                                        .fill(super::rgb(RelaxationBand::of(point.anxiety).color()))
                                        .text(format!("{:.0}%", point.anxiety)),
                                );
                            }
                            None => {
                                ui.label(
                                    egui::RichText::new("no data")
                                        .color(super::rgb(MUTED_TEXT_COLOR)),
                                );
                            }
                        });
                        table_row.col(|ui| {
                            let text = row
                                .latest
                                .as_ref()
                                .map(|p| p.timestamp.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or_else(|| "-".to_string());
                            ui.label(text);
                        });
                        table_row.col(|ui| {
                            if ui.button("Details").clicked() {
                                open_member = Some(row.user.id.clone());
                            }
                            if ui.add_enabled(!busy, egui::Button::new("Remove")).clicked() {
                                remove = Some(row.user.id.clone());
                            }
                        });
                    });
                }
            });

        let team_id = page.team_id.clone();

        if go_back {
            self.navigate(Screen::Main);
        } else if let Some(user_id) = open_member {
            self.navigate(Screen::UserDetail { team_id, user_id });
        } else if let Some(user_id) = remove {
            self.remove_member(user_id);
        } else if delete {
            self.delete_team();
        }
    }
}

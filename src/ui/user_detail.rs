//! Detail view: one member's relaxation history as an interactive chart.
//!
//! The view owns a [`ViewportEngine`] and a [`RefreshPoller`]. Both live in
//! the [`DetailState`] and are dropped when the user navigates away, which
//! stops the poller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eframe::egui;
use egui_plot::{HLine, Line, LineStyle, Plot, PlotBounds, PlotPoints, Points, VLine};
use tracing::{debug, error, info, warn};

use crate::api::{display_name, SubjectFeed};
use crate::app::ChillRateApp;
use crate::poller::RefreshPoller;
use crate::state::{
    DetailLoad, DetailPhase, DetailState, LoadResult, Screen, ACCENT_COLOR, GOOD_COLOR,
    MUTED_TEXT_COLOR, POOR_COLOR, PRIMARY_COLOR, RELAXED_LEVEL, TENSE_LEVEL,
};
use crate::viewport::sampling::MAX_STRIDE;
use crate::viewport::{
    export_file_name, normalize, parse_instant, Direction, ExportScope, MeasurementPoint,
    ViewportEngine, SHOW_LAST_PRESETS,
};

/// Height of the relaxation chart in pixels
const CHART_HEIGHT: f32 = 360.0;

/// Deferred actions collected while the detail state is borrowed
enum DetailAction {
    BackToTeam,
    Export(ExportScope),
}

fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}

/// Summary line for the highlighted point
fn describe_point(point: &MeasurementPoint) -> String {
    format!(
        "{} {} · {:.0}% (#{})",
        format_date(point.timestamp),
        format_time(point.timestamp),
        point.anxiety,
        point.index
    )
}

/// Index of the rendered point closest to plot coordinate `x`
fn nearest_rendered(rendered: &[[f64; 2]], x: f64) -> Option<usize> {
    rendered
        .iter()
        .min_by(|a, b| (a[0] - x).abs().total_cmp(&(b[0] - x).abs()))
        .map(|p| p[0] as usize)
}

impl ChillRateApp {
    pub(crate) fn open_detail(&mut self, team_id: String, user_id: String) {
        let mut detail = DetailState::new(team_id.clone(), user_id.clone());
        let client = self.client.clone();

        // Team info first for the display name, then the measurements
        detail.receiver = Some(self.spawn_job(move || {
            let name = match client.team(&team_id) {
                Ok(team) => display_name(Some(&team), &user_id),
                Err(e) => {
                    warn!("Team info unavailable, showing raw user id: {}", e);
                    user_id.clone()
                }
            };
            match client.user_measurements(&team_id, &user_id) {
                Ok(payload) => LoadResult::Success(DetailLoad {
                    display_name: name,
                    points: normalize(&payload),
                }),
                Err(e) => LoadResult::Error(e.to_string()),
            }
        }));

        self.detail = Some(detail);
    }

    /// Check for the initial load and drain the refresh poller
    pub fn check_detail_complete(&mut self) {
        let Some(detail) = &mut self.detail else {
            return;
        };

        if let Some(receiver) = &detail.receiver {
            if let Ok(result) = receiver.try_recv() {
                detail.receiver = None;
                match result {
                    LoadResult::Success(load) => {
                        info!(
                            "Loaded {} points for {}",
                            load.points.len(),
                            load.display_name
                        );
                        detail.display_name = load.display_name;
                        detail.phase = DetailPhase::Ready(Box::new(ViewportEngine::new(
                            load.points,
                            self.settings.show_last(),
                        )));

                        let feed = SubjectFeed {
                            client: self.client.clone(),
                            team_id: detail.team_id.clone(),
                            user_id: detail.user_id.clone(),
                        };
                        let ctx = self.ctx.clone();
                        detail.poller = Some(RefreshPoller::spawn(
                            feed,
                            self.settings.poll_schedule(),
                            Arc::new(move || ctx.request_repaint()),
                        ));
                    }
                    LoadResult::Error(e) => {
                        error!("Failed to load measurements: {}", e);
                        detail.phase = DetailPhase::Failed(e);
                    }
                }
            }
        }

        if let (Some(poller), DetailPhase::Ready(engine)) = (&detail.poller, &mut detail.phase) {
            if let Some(points) = poller.latest() {
                let outcome = engine.apply_refresh(points);
                debug!("Poll merged: {:?}", outcome);
            }
        }
    }

    fn export_detail_csv(&mut self, scope: ExportScope) {
        let Some(detail) = &self.detail else {
            return;
        };
        let DetailPhase::Ready(engine) = &detail.phase else {
            return;
        };
        let csv = engine.export_csv(scope);
        let file_name = export_file_name(&detail.display_name);

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(&file_name)
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, csv) {
            Ok(()) => {
                info!("Exported {} points to {:?}", scope.as_ref(), path);
                self.show_toast_success(&format!("Exported {}", file_name));
            }
            Err(e) => self.show_toast_error(&format!("Export failed: {}", e)),
        }
    }

    pub fn render_user_detail(&mut self, ui: &mut egui::Ui) {
        let show_dots = &mut self.settings.show_dots;
        let Some(detail) = &mut self.detail else {
            return;
        };

        let mut action: Option<DetailAction> = None;

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("← Team").clicked() {
                action = Some(DetailAction::BackToTeam);
            }
            ui.heading(&detail.display_name);

            if let DetailPhase::Ready(_) = detail.phase {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Export visible").clicked() {
                        action = Some(DetailAction::Export(ExportScope::Visible));
                    }
                    if ui.button("⬇ Export CSV").clicked() {
                        action = Some(DetailAction::Export(ExportScope::All));
                    }
                });
            }
        });
        ui.add_space(8.0);

        match &mut detail.phase {
            DetailPhase::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.spinner();
                    ui.label("Loading measurements...");
                });
            }
            DetailPhase::Failed(message) => {
                super::card_frame().show(ui, |ui| {
                    ui.label(egui::RichText::new("Could not load data").strong());
                    super::error_label(ui, message);
                    ui.add_space(8.0);
                    if ui.button("Back to team").clicked() {
                        action = Some(DetailAction::BackToTeam);
                    }
                });
            }
            DetailPhase::Ready(engine) => {
                handle_keyboard(ui, engine);
                render_summary_cards(ui, engine);
                ui.add_space(8.0);
                render_controls(
                    ui,
                    engine,
                    show_dots,
                    &mut detail.jump_input,
                    &mut detail.jump_error,
                );
                ui.add_space(8.0);
                render_chart(ui, engine, *show_dots);
            }
        }

        let team_id = detail.team_id.clone();
        match action {
            Some(DetailAction::BackToTeam) => self.navigate(Screen::Team(team_id)),
            Some(DetailAction::Export(scope)) => self.export_detail_csv(scope),
            None => {}
        }
    }
}

/// Arrow keys move the lock while no text field has focus
fn handle_keyboard(ui: &egui::Ui, engine: &mut ViewportEngine) {
    if ui.ctx().memory(|m| m.focused().is_some()) {
        return;
    }
    let (left, right) = ui.input(|i| {
        (
            i.key_pressed(egui::Key::ArrowLeft),
            i.key_pressed(egui::Key::ArrowRight),
        )
    });
    if left {
        engine.nudge(Direction::Left);
    }
    if right {
        engine.nudge(Direction::Right);
    }
}

fn summary_card(ui: &mut egui::Ui, title: &str, value: String) {
    super::card_frame().show(ui, |ui| {
        ui.set_min_width(180.0);
        ui.label(egui::RichText::new(title).color(super::rgb(MUTED_TEXT_COLOR)));
        ui.label(egui::RichText::new(value).size(18.0).strong());
    });
}

fn render_summary_cards(ui: &mut egui::Ui, engine: &ViewportEngine) {
    let summary = engine.summary();
    ui.horizontal_wrapped(|ui| {
        summary_card(
            ui,
            "Current relaxation",
            summary
                .current_value
                .map(|v| format!("{:.0}%", v))
                .unwrap_or_else(|| "-".to_string()),
        );
        summary_card(
            ui,
            "Last update",
            summary
                .last_update
                .map(|t| format!("{} {}", format_date(t), format_time(t)))
                .unwrap_or_else(|| "-".to_string()),
        );
        let highlighted = engine
            .highlighted_point()
            .map(describe_point)
            .unwrap_or_else(|| "Hover or click a point".to_string());
        let title = if engine.selection().is_locked() {
            "Locked point"
        } else {
            "Highlighted point"
        };
        summary_card(ui, title, highlighted);
        summary_card(ui, "Points", engine.len().to_string());
    });
}

fn render_controls(
    ui: &mut egui::Ui,
    engine: &mut ViewportEngine,
    show_dots: &mut bool,
    jump_input: &mut String,
    jump_error: &mut Option<String>,
) {
    let len = engine.len();
    let has_data = len > 0;

    ui.horizontal_wrapped(|ui| {
        ui.add_enabled_ui(has_data, |ui| {
            if ui.button("🔍+ Zoom in").clicked() {
                engine.zoom_in();
            }
            if ui.button("🔍- Zoom out").clicked() {
                engine.zoom_out();
            }
            if ui.button("◀ Pan").clicked() {
                engine.pan_left();
            }
            if ui.button("Pan ▶").clicked() {
                engine.pan_right();
            }
            if ui.button("Fit all").clicked() {
                engine.fit_all();
            }
        });

        ui.separator();
        ui.label("Show last");
        let mut preset = engine.preset();
        egui::ComboBox::from_id_salt("show_last")
            .selected_text(preset.to_string())
            .width(70.0)
            .show_ui(ui, |ui| {
                for option in SHOW_LAST_PRESETS {
                    ui.selectable_value(&mut preset, *option, option.to_string());
                }
            });
        if preset != engine.preset() {
            engine.set_preset(preset);
        }

        ui.separator();
        ui.label("Sampling");
        let mut stride = engine.stride().get();
        if ui
            .add(
                egui::Slider::new(&mut stride, 1..=MAX_STRIDE)
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Keep every Nth point")
            .changed()
        {
            engine.set_stride(stride);
        }

        ui.separator();
        ui.checkbox(show_dots, "Show dots");

        if engine.selection().is_locked() && ui.button("🔓 Unlock").clicked() {
            engine.unlock();
        }
    });

    if has_data {
        let viewport = engine.viewport();
        let max_index = len - 1;
        let mut start = viewport.start();
        let mut end = viewport.end();

        ui.horizontal(|ui| {
            ui.label("From");
            if ui
                .add(
                    egui::Slider::new(&mut start, 0..=max_index)
                        .show_value(false)
                        .clamping(egui::SliderClamping::Always),
                )
                .changed()
            {
                engine.drag_start(start);
            }
            ui.label(format!("#{}", engine.viewport().start()));

            ui.label("To");
            if ui
                .add(
                    egui::Slider::new(&mut end, 0..=max_index)
                        .show_value(false)
                        .clamping(egui::SliderClamping::Always),
                )
                .changed()
            {
                engine.drag_end(end);
            }
            ui.label(format!("#{}", engine.viewport().end()));
        });
    }

    ui.horizontal(|ui| {
        ui.label("Jump to");
        let input = ui.add(
            egui::TextEdit::singleline(jump_input)
                .hint_text("YYYY-MM-DD HH:MM")
                .desired_width(160.0),
        );
        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.add_enabled(has_data, egui::Button::new("Go")).clicked() || submitted {
            *jump_error = match parse_instant(jump_input) {
                None => Some("Unrecognized date".to_string()),
                Some(target) => match engine.jump_to_date(target) {
                    Some(_) => None,
                    None => Some("No data to jump in".to_string()),
                },
            };
        }
        if let Some(error) = jump_error {
            super::error_label(ui, error);
        }
    });
}

fn render_chart(ui: &mut egui::Ui, engine: &mut ViewportEngine, show_dots: bool) {
    if engine.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(
                egui::RichText::new("No measurements yet").color(super::rgb(MUTED_TEXT_COLOR)),
            );
        });
        return;
    }

    let rendered: Vec<[f64; 2]> = engine
        .visible_points()
        .iter()
        .map(|p| [p.index as f64, p.anxiety])
        .collect();
    let viewport = engine.viewport();
    let highlighted = engine.highlighted_point().map(|p| p.index);
    let line_color = super::rgb(PRIMARY_COLOR);

    let plot = Plot::new("relaxation_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Point #")
        .y_axis_label("Relaxation, %")
        .show_x(false)
        .show_y(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false);

    let response = plot.show(ui, |plot_ui| {
        // Window is owned by the engine; Y is fixed to the percentage range
        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
            [viewport.start() as f64 - 0.5, 0.0],
            [viewport.end() as f64 + 0.5, 100.0],
        ));

        plot_ui.hline(
            HLine::new("Relaxed", RELAXED_LEVEL)
                .color(super::rgb(GOOD_COLOR))
                .style(LineStyle::dashed_loose()),
        );
        plot_ui.hline(
            HLine::new("Tense", TENSE_LEVEL)
                .color(super::rgb(POOR_COLOR))
                .style(LineStyle::dashed_loose()),
        );

        let line_points: PlotPoints = rendered.iter().copied().collect();
        plot_ui.line(
            Line::new("Relaxation", line_points)
                .color(line_color)
                .fill(0.0)
                .width(2.0),
        );

        if show_dots {
            let dot_points: PlotPoints = rendered.iter().copied().collect();
            plot_ui.points(
                Points::new("Readings", dot_points)
                    .color(line_color)
                    .radius(3.0),
            );
        }

        if let Some(index) = highlighted.filter(|i| viewport.contains(*i)) {
            plot_ui.vline(
                VLine::new("Selected", index as f64)
                    .color(super::rgb(ACCENT_COLOR))
                    .width(1.5),
            );
        }

        plot_ui.pointer_coordinate()
    });

    let hovered = if response.response.hovered() {
        response.inner.and_then(|pos| nearest_rendered(&rendered, pos.x))
    } else {
        None
    };

    match hovered {
        Some(index) if engine.selection().hover() != Some(index) => engine.pointer_enter(index),
        None if engine.selection().hover().is_some() => engine.pointer_leave(),
        _ => {}
    }

    if response.response.clicked() {
        engine.click();
    }

    if let Some(point) = hovered.and_then(|i| engine.point(i)) {
        let text = format!(
            "{}\n{}\n{:.0}%  (#{})",
            format_date(point.timestamp),
            format_time(point.timestamp),
            point.anxiety,
            point.index
        );
        response.response.on_hover_ui_at_pointer(|ui| {
            ui.label(text);
        });
    }
}

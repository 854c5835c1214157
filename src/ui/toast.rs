//! Toast notification system for user feedback.

use eframe::egui;

use crate::app::ChillRateApp;

impl ChillRateApp {
    /// Render toast notifications in the bottom right corner
    pub fn render_toast(&mut self, ctx: &egui::Context) {
        let Some((message, shown_at, toast_type)) = &self.toast_message else {
            return;
        };

        if self.toast_expired(*shown_at) {
            self.toast_message = None;
            return;
        }

        let margin = 20.0;
        let bg_color = super::rgb(toast_type.color());
        let text_color = super::rgb(toast_type.text_color());

        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-margin, -margin))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(bg_color)
                    .corner_radius(8)
                    .inner_margin(egui::Margin::symmetric(16, 12))
                    .shadow(egui::epaint::Shadow {
                        offset: [2, 2],
                        blur: 8,
                        spread: 0,
                        color: egui::Color32::from_black_alpha(60),
                    })
                    .show(ui, |ui| {
                        ui.set_min_width(200.0);
                        ui.set_max_width(400.0);
                        ui.label(egui::RichText::new(message).color(text_color).size(14.0));
                    });
            });

        // Keep repainting so the toast disappears on time
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}

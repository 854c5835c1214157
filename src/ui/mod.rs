//! UI rendering modules for the ChillRate dashboard.
//!
//! Each screen lives in its own submodule as an `impl ChillRateApp` block:
//!
//! - `header` - Top bar with navigation, settings and logout
//! - `welcome` - Landing screen for signed-out users
//! - `auth_page` - Login/register form and the confirm-email screen
//! - `main_page` - Teams, pending join requests and the invite link
//! - `invite_qr` - QR code of the invite link
//! - `team_page` - Member table with latest relaxation levels
//! - `user_detail` - Interactive relaxation chart for one member
//! - `settings_window` - Editable user settings
//! - `toast` - Toast notification system

pub mod auth_page;
pub mod header;
pub mod invite_qr;
pub mod main_page;
pub mod settings_window;
pub mod team_page;
pub mod toast;
pub mod user_detail;
pub mod welcome;

use eframe::egui;

/// Convert a palette entry to an egui color
pub(crate) fn rgb(color: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(color[0], color[1], color[2])
}

/// White rounded card used by every page section
pub(crate) fn card_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(egui::Color32::WHITE)
        .corner_radius(12)
        .inner_margin(egui::Margin::symmetric(20, 16))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(240, 242, 245)))
}

/// Section heading with the accent bar
pub(crate) fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(6.0, 22.0), egui::Sense::hover());
        ui.painter()
            .rect_filled(rect, 3.0, rgb(crate::state::PRIMARY_COLOR));
        ui.heading(text);
    });
    ui.add_space(8.0);
}

/// Inline error text
pub(crate) fn error_label(ui: &mut egui::Ui, message: &str) {
    ui.label(egui::RichText::new(message).color(rgb(crate::state::POOR_COLOR)));
}

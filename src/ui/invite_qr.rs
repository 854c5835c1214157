//! Invite link QR code, painted module by module onto the egui canvas.

use eframe::egui;
use qrcode::{Color, QrCode};
use tracing::warn;

/// Light border around the code, in modules
const QUIET_ZONE: usize = 2;

/// Dark/light module grid of an encoded QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrGrid {
    width: usize,
    dark: Vec<bool>,
}

impl QrGrid {
    /// Encode `text`, or `None` if it does not fit in a QR code
    pub fn encode(text: &str) -> Option<Self> {
        let code = match QrCode::new(text.as_bytes()) {
            Ok(code) => code,
            Err(e) => {
                warn!("Could not encode invite QR code: {}", e);
                return None;
            }
        };
        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();
        Some(Self { width, dark })
    }

    /// Modules per side, quiet zone excluded
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }
}

/// Paint `grid` as a white square of `side` points
pub(crate) fn paint_qr(ui: &mut egui::Ui, grid: &QrGrid, side: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::WHITE);

    let cell = side / (grid.width() + 2 * QUIET_ZONE) as f32;
    for y in 0..grid.width() {
        for x in 0..grid.width() {
            if !grid.is_dark(x, y) {
                continue;
            }
            let min = rect.min
                + egui::vec2(
                    (x + QUIET_ZONE) as f32 * cell,
                    (y + QUIET_ZONE) as f32 * cell,
                );
            painter.rect_filled(
                egui::Rect::from_min_size(min, egui::vec2(cell, cell)),
                0.0,
                egui::Color32::BLACK,
            );
        }
    }

    response
}

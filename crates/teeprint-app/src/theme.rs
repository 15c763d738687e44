//! Shared colors and frames.

use egui::{Color32, CornerRadius, Frame, Margin, Stroke};

/// Text color (dark gray)
pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
/// Muted text color
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
/// Border color
pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
/// Selection/active color (blue)
pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
/// Selected background
pub const SELECTED_BG: Color32 = Color32::from_rgb(235, 245, 255);
/// Panel background
pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
/// Design surface background behind the template
pub const SURFACE_BG: Color32 = Color32::from_rgb(243, 244, 246);
/// Error text
pub const ERROR: Color32 = Color32::from_rgb(220, 38, 38);

/// Panel corner radius
pub const PANEL_RADIUS: u8 = 8;

/// Bordered panel used for the controls and the table.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(PANEL_BG)
        .corner_radius(CornerRadius::same(PANEL_RADIUS))
        .stroke(Stroke::new(1.0, BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(12))
}

/// Top navigation bar frame.
pub fn navbar_frame() -> Frame {
    Frame::new()
        .fill(Color32::WHITE)
        .stroke(Stroke::new(1.0, BORDER))
        .inner_margin(Margin::symmetric(16, 10))
}

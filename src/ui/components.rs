//! Shared UI components.

use eframe::egui::{self, Color32, Response, RichText, Sense, StrokeKind, Ui};

use crate::tree::{Notice, NoticeLevel};

/// Clickable card with an icon, a title, and a one-line hint.
pub fn landing_card(ui: &mut Ui, icon: &str, title: &str, hint: &str) -> Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(220.0, 150.0), Sense::click());
    if !ui.is_rect_visible(rect) {
        return response;
    }

    let visuals = ui.style().interact(&response);
    let painter = ui.painter();
    painter.rect(rect, 8.0, visuals.bg_fill, visuals.bg_stroke, StrokeKind::Outside);

    let lines = [
        (icon, 36.0, 0.3, visuals.text_color()),
        (title, 18.0, 0.6, visuals.text_color()),
        (hint, 12.0, 0.82, ui.visuals().weak_text_color()),
    ];
    for (text, size, at, color) in lines {
        painter.text(
            egui::pos2(rect.center().x, rect.top() + rect.height() * at),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(size),
            color,
        );
    }

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const SKELETON: Color32 = Color32::from_rgba_premultiplied(120, 120, 120, 40);
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Button with a leading phosphor icon.
pub fn icon_button(ui: &mut Ui, icon: &str, label: &str, enabled: bool) -> Response {
    ui.add_enabled(enabled, egui::Button::new(format!("{icon}  {label}")))
}

/// Small icon-only button with hover text.
pub fn row_action(ui: &mut Ui, icon: &str, hover: &str, color: Option<Color32>) -> Response {
    let mut text = RichText::new(icon).size(16.0);
    if let Some(color) = color {
        text = text.color(color);
    }
    ui.add(egui::Button::new(text).frame(false)).on_hover_text(hover)
}

/// Placeholder bar shown while content is loading.
pub fn skeleton_bar(ui: &mut Ui, width_fraction: f32, height: f32) {
    let width = ui.available_width() * width_fraction;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
    ui.painter().rect_filled(rect, 4.0, colors::SKELETON);
}

/// Inline validation message under a field.
pub fn field_error(ui: &mut Ui, message: Option<&str>) {
    if let Some(message) = message {
        ui.colored_label(colors::ERROR, RichText::new(message).size(12.0));
    }
}

/// Render a single toast notification.
pub fn toast(ui: &mut Ui, notice: &Notice) {
    let color = match notice.level {
        NoticeLevel::Success => colors::SUCCESS,
        NoticeLevel::Error => colors::ERROR,
    };
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .stroke(egui::Stroke::new(1.0, color))
        .inner_margin(egui::Margin::same(10))
        .corner_radius(egui::CornerRadius::same(6))
        .show(ui, |ui| {
            ui.set_min_width(260.0);
            ui.label(RichText::new(notice.title).strong().color(color));
            ui.label(notice.message);
        });
}

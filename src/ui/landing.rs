//! Public landing screen.

use eframe::egui::{RichText, Ui};
use egui_phosphor::regular::SIGN_IN;

use super::components::landing_card;

/// Show the landing screen.
///
/// Returns `true` if the login card was clicked.
pub fn show(ui: &mut Ui, api_url: &str) -> bool {
    let mut go_login = false;

    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(RichText::new("Department Management System").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(
            RichText::new("Manage your organization's departments and sub-departments with ease")
                .size(14.0)
                .weak(),
        );

        ui.add_space(40.0);

        if landing_card(ui, SIGN_IN, "Login", "Login to get started").clicked() {
            go_login = true;
        }

        ui.add_space(30.0);
        ui.label(RichText::new(format!("Server: {api_url}")).size(12.0).weak());
    });

    go_login
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui;

    #[test]
    fn test_renders_without_click() {
        let ctx = egui::Context::default();
        let mut clicked = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                clicked = show(ui, "http://localhost:4000");
            });
        });
        assert!(!clicked);
    }
}

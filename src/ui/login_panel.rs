//! Login screen.

use eframe::egui::{self, Key, RichText, Ui};
use egui_phosphor::regular::SIGN_IN;

use super::app::LoginForm;
use super::components::{colors, icon_button, panel_header};

/// Show the login form.
///
/// Returns `true` when the user submits (button or Enter).
pub fn show(form: &mut LoginForm, ui: &mut Ui) -> bool {
    let mut submit = false;

    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.set_max_width(360.0);

        panel_header(ui, "Login");

        egui::Grid::new("login_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Username:");
                let username = ui.add_enabled(
                    !form.submitting,
                    egui::TextEdit::singleline(&mut form.username).desired_width(220.0),
                );
                if username.changed() {
                    form.error = None;
                }
                ui.end_row();

                ui.label("Password:");
                let password = ui.add_enabled(
                    !form.submitting,
                    egui::TextEdit::singleline(&mut form.password)
                        .password(true)
                        .desired_width(220.0),
                );
                if password.changed() {
                    form.error = None;
                }
                if password.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    submit = true;
                }
                ui.end_row();
            });

        ui.add_space(15.0);

        if let Some(error) = &form.error {
            ui.colored_label(colors::ERROR, error);
            ui.add_space(10.0);
        }

        ui.horizontal(|ui| {
            if form.submitting {
                ui.spinner();
                ui.label(RichText::new("Signing in...").weak());
            } else if icon_button(ui, SIGN_IN, "Login", true).clicked() {
                submit = true;
            }
        });
    });

    submit
}

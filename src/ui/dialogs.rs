//! Create, rename, and delete-confirmation dialogs.

use eframe::egui::{self, Align, Layout, RichText, ScrollArea};
use egui_phosphor::regular::{PLUS, TRASH};

use super::components::{colors, field_error, icon_button, row_action};
use crate::forms::{NAME_FIELD, sub_department_field};
use crate::tree::DepartmentTree;

/// Result of one frame of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Submit,
    Close,
}

/// Render the create dialog if open.
pub fn show_create(tree: &mut DepartmentTree, ctx: &egui::Context) -> DialogAction {
    let Some(slot) = tree.create() else {
        return DialogAction::None;
    };
    let submitting = slot.submitting;
    let Some(draft) = tree.create_draft_mut() else {
        return DialogAction::None;
    };

    let mut action = DialogAction::None;
    let mut open = true;

    egui::Window::new("Create New Department")
        .collapsible(false)
        .resizable(false)
        .default_width(480.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(
                RichText::new("Add a new department to your organization. You can also add sub-departments.")
                    .weak(),
            );
            ui.add_space(10.0);

            ui.label("Department Name");
            let mut name = draft.name.clone();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut name)
                        .hint_text("Enter department name")
                        .desired_width(f32::INFINITY),
                )
                .changed()
            {
                draft.set_name(name);
            }
            field_error(ui, draft.errors.get(NAME_FIELD));

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                ui.label("Sub-Departments (Optional)");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if icon_button(ui, PLUS, "Add", !submitting).clicked() {
                        draft.add_entry();
                    }
                });
            });

            if draft.entries.is_empty() {
                ui.label(RichText::new("No sub-departments added yet. Click \"Add\" to add one.").weak());
            } else {
                let mut remove = None;
                ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                    for index in 0..draft.entries.len() {
                        ui.horizontal(|ui| {
                            let mut entry = draft.entries[index].clone();
                            if ui
                                .add(
                                    egui::TextEdit::singleline(&mut entry)
                                        .hint_text(format!("Sub-department {} name", index + 1))
                                        .desired_width(360.0),
                                )
                                .changed()
                            {
                                draft.set_entry(index, entry);
                            }
                            if row_action(ui, TRASH, "Remove", Some(colors::ERROR)).clicked() {
                                remove = Some(index);
                            }
                        });
                        field_error(ui, draft.errors.get(&sub_department_field(index)));
                    }
                });
                if let Some(index) = remove {
                    draft.remove_entry(index);
                }
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    action = DialogAction::Close;
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let label = if submitting { "Creating..." } else { "Create Department" };
                    if ui.add_enabled(!submitting, egui::Button::new(label)).clicked() {
                        action = DialogAction::Submit;
                    }
                });
            });
        });

    if !open {
        action = DialogAction::Close;
    }
    action
}

/// Render the rename dialog if an edit target is set.
pub fn show_rename(tree: &mut DepartmentTree, ctx: &egui::Context) -> DialogAction {
    let Some(slot) = tree.edit() else {
        return DialogAction::None;
    };
    let submitting = slot.submitting;
    let Some(form) = tree.edit_form_mut() else {
        return DialogAction::None;
    };

    let mut action = DialogAction::None;
    let mut open = true;

    egui::Window::new("Update Department")
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(RichText::new("Change the name of the department. Click save when you're done.").weak());
            ui.add_space(10.0);

            ui.label("Department Name");
            let mut name = form.name.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut name)
                    .hint_text("Enter department name")
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                form.set_name(name);
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && !submitting {
                action = DialogAction::Submit;
            }
            field_error(ui, form.error.as_deref());

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    action = DialogAction::Close;
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let label = if submitting { "Saving..." } else { "Save Changes" };
                    if ui.add_enabled(!submitting, egui::Button::new(label)).clicked() {
                        action = DialogAction::Submit;
                    }
                });
            });
        });

    if !open {
        action = DialogAction::Close;
    }
    action
}

/// Render the delete confirmation if a delete target is set.
pub fn show_delete_confirm(tree: &DepartmentTree, ctx: &egui::Context) -> DialogAction {
    let Some(slot) = tree.delete_target() else {
        return DialogAction::None;
    };

    let mut action = DialogAction::None;

    egui::Window::new("Are you sure?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!(
                "This will permanently delete the department \"{}\" and all its sub-departments. \
                 This action cannot be undone.",
                slot.target.name
            ));
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(!slot.submitting, egui::Button::new("Cancel")).clicked() {
                    action = DialogAction::Close;
                }
                let label = RichText::new(if slot.submitting { "Deleting..." } else { "Delete" }).color(colors::ERROR);
                if ui.add_enabled(!slot.submitting, egui::Button::new(label)).clicked() {
                    action = DialogAction::Submit;
                }
            });
        });

    action
}

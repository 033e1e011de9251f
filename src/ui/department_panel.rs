//! Department tree panel with refresh, create, and pagination.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CARET_DOWN, CARET_RIGHT, PENCIL, PLUS, TRASH};

use super::components::{colors, icon_button, panel_header, row_action, skeleton_bar};
use crate::models::DepartmentId;
use crate::tree::{DepartmentTree, LoadState, Row};

/// Indentation per tree level, in points.
const INDENT: f32 = 24.0;

/// User action requested from the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Refresh,
    NewDepartment,
    Toggle(DepartmentId),
    Edit(DepartmentId),
    Delete(DepartmentId),
    GoToPage(u32),
}

/// Show the department panel.
pub fn show(tree: &DepartmentTree, ui: &mut Ui) -> Action {
    let mut action = Action::None;

    panel_header(ui, "Departments");

    // Refresh waits for the list; creating does not.
    ui.horizontal(|ui| {
        if icon_button(ui, ARROWS_CLOCKWISE, "Refresh", !tree.is_loading()).clicked() {
            action = Action::Refresh;
        }
        ui.add_space(10.0);
        if icon_button(ui, PLUS, "New Department", true).clicked() {
            action = Action::NewDepartment;
        }
    });

    ui.add_space(15.0);

    match tree.load_state() {
        LoadState::Loading => show_placeholder(ui),
        LoadState::Failed(_) => {
            ui.label(RichText::new("Departments could not be loaded.").color(colors::ERROR));
            ui.label(RichText::new("Use Refresh to try again.").weak());
        }
        LoadState::Loaded if tree.departments().is_empty() => {
            ui.add_space(30.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("No departments found").size(18.0).color(colors::NEUTRAL));
                ui.add_space(6.0);
                ui.label(
                    RichText::new("No departments have been created yet. Click \"New Department\" to create one.")
                        .weak(),
                );
            });
        }
        LoadState::Loaded => {
            ui.label(RichText::new("Manage your organization's departments").weak());
            ui.add_space(10.0);

            ScrollArea::vertical()
                .id_salt("department_tree")
                .max_height(ui.available_height() - 50.0)
                .show(ui, |ui| {
                    for row in tree.visible_rows() {
                        if let Some(next) = show_row(ui, &row) {
                            action = next;
                        }
                    }
                });

            if tree.show_pager() {
                ui.add_space(15.0);
                if let Some(next) = show_pager(tree, ui) {
                    action = next;
                }
            }
        }
    }

    action
}

fn show_placeholder(ui: &mut Ui) {
    ui.label(RichText::new("Loading departments...").weak());
    ui.add_space(10.0);
    for _ in 0..3 {
        skeleton_bar(ui, 1.0, 28.0);
        ui.add_space(6.0);
        skeleton_bar(ui, 0.75, 20.0);
        ui.add_space(14.0);
    }
}

fn show_row(ui: &mut Ui, row: &Row<'_>) -> Option<Action> {
    let mut action = None;
    let id = row.department.id;

    let fill = if row.depth == 0 {
        ui.visuals().faint_bg_color
    } else {
        ui.visuals().panel_fill
    };

    ui.horizontal(|ui| {
        ui.add_space(row.depth as f32 * INDENT);
        egui::Frame::new()
            .fill(fill)
            .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
            .inner_margin(egui::Margin::symmetric(10, 6))
            .corner_radius(egui::CornerRadius::same(6))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    if row.has_children {
                        let caret = if row.expanded { CARET_DOWN } else { CARET_RIGHT };
                        if row_action(ui, caret, "Show sub-departments", None).clicked() {
                            action = Some(Action::Toggle(id));
                        }
                    } else {
                        // Leaves get no toggle; keep names aligned.
                        ui.add_space(20.0);
                    }
                    ui.label(RichText::new(&row.department.name).strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if row_action(ui, TRASH, "Delete", Some(colors::ERROR)).clicked() {
                            action = Some(Action::Delete(id));
                        }
                        if row_action(ui, PENCIL, "Edit", None).clicked() {
                            action = Some(Action::Edit(id));
                        }
                    });
                });
            });
    });
    ui.add_space(4.0);

    action
}

fn show_pager(tree: &DepartmentTree, ui: &mut Ui) -> Option<Action> {
    let mut action = None;
    let current = tree.current_page();

    ui.horizontal(|ui| {
        if ui
            .add_enabled(tree.has_previous_page(), egui::Button::new("Previous"))
            .clicked()
        {
            action = Some(Action::GoToPage(current - 1));
        }
        for page in tree.page_numbers() {
            if ui.selectable_label(page == current, page.to_string()).clicked() && page != current {
                action = Some(Action::GoToPage(page));
            }
        }
        if ui
            .add_enabled(tree.has_next_page(), egui::Button::new("Next"))
            .clicked()
        {
            action = Some(Action::GoToPage(current + 1));
        }
    });

    action
}

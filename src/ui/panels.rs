use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::operators_for;
use crate::data::model::DataType;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Row counts, reset action, and the fallback notice.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("corrmap");
        ui.separator();

        ui.label(format!(
            "{} of {} rows visible",
            state.filtered.len(),
            state.dataset.len()
        ));

        ui.separator();

        if ui
            .add_enabled(!state.filters.is_empty(), egui::Button::new("Reset filters"))
            .clicked()
        {
            state.clear_filters();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter builder
// ---------------------------------------------------------------------------

/// Render the active filter list and the typed "add filter" widgets.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone what we need so we can mutate state inside the loops.
    let columns: Vec<(String, DataType)> = state
        .dataset
        .columns_by_index()
        .iter()
        .map(|s| (s.key.clone(), s.data_type))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Active filters ----
            if state.filters.is_empty() {
                ui.weak("No active filters.");
            }
            let mut remove: Option<usize> = None;
            for (i, filter) in state.filters.iter().enumerate() {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("✕").clicked() {
                        remove = Some(i);
                    }
                    ui.label(filter.to_string());
                });
            }
            if let Some(i) = remove {
                state.remove_filter(i);
            }

            ui.separator();

            // ---- Add filter ----
            ui.strong("Add filter");

            egui::ComboBox::from_id_salt("filter_column")
                .selected_text(&state.draft.column)
                .show_ui(ui, |ui: &mut Ui| {
                    for (key, _) in &columns {
                        if ui
                            .selectable_label(state.draft.column == *key, key)
                            .clicked()
                        {
                            state.set_draft_column(key.clone());
                        }
                    }
                });

            let draft_type = columns
                .iter()
                .find(|(key, _)| *key == state.draft.column)
                .map(|(_, t)| *t);

            if let Some(data_type) = draft_type {
                egui::ComboBox::from_id_salt("filter_operator")
                    .selected_text(state.draft.operator.to_string())
                    .show_ui(ui, |ui: &mut Ui| {
                        for &op in operators_for(data_type) {
                            if ui
                                .selectable_label(state.draft.operator == op, op.to_string())
                                .clicked()
                            {
                                state.draft.operator = op;
                            }
                        }
                    });

                match data_type {
                    DataType::Categorical => {
                        ui.text_edit_singleline(&mut state.draft.text);
                    }
                    DataType::Number => {
                        ui.add(DragValue::new(&mut state.draft.number).speed(1.0));
                    }
                }

                if ui.button("Add").clicked() {
                    if let Some(filter) = state.draft_filter() {
                        log::debug!("adding filter: {filter}");
                        state.add_filter(filter);
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Bottom panel – filtered data preview
// ---------------------------------------------------------------------------

/// Table of the rows surviving the current filters, in schema-index order.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    let columns = state.dataset.columns_by_index();
    if columns.is_empty() {
        ui.weak("Empty schema.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::remainder().at_least(60.0), columns.len())
        .header(18.0, |mut header| {
            for col in &columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col.key.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(16.0, state.filtered.len(), |mut row| {
                let r = row.index();
                for col in &columns {
                    row.col(|ui: &mut Ui| {
                        if let Some(value) = state.filtered[r].get(col.index) {
                            ui.label(value.to_string());
                        }
                    });
                }
            });
        });
}

use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::table_columns;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Table of the active slice, one row per record.
pub fn client_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.dataset() else {
        return;
    };
    let rows = &state.view.selection;
    let columns = table_columns(state.show_names);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(110.0), columns.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(420.0)
        .header(22.0, |mut header| {
            for col in &columns {
                header.col(|ui| {
                    ui.strong(col.header());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let record = &dataset.records[rows[row.index()]];
                for col in &columns {
                    row.col(|ui| {
                        ui.label(col.cell(record));
                    });
                }
            });
        });
}

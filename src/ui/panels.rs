use eframe::egui::{self, Color32, RichText, ScrollArea, Ui, vec2};

use crate::data::filter::SegmentFilter;
use crate::data::model::Segment;
use crate::format::format_eur;
use crate::state::AppState;
use crate::ui::{plot, table};

const CHART_HEIGHT: f32 = 360.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 0);

// ---------------------------------------------------------------------------
// Left side panel – password gate, then filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    if !state.unlocked {
        login_panel(ui, state);
        return;
    }

    ui.heading("Filters");
    ui.separator();

    // Newest year first.
    let years: Vec<i32> = state
        .dataset()
        .map(|ds| ds.years.iter().rev().copied().collect())
        .unwrap_or_default();
    if years.is_empty() {
        ui.label("No data loaded.");
        warnings_list(ui, state);
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year ----
            ui.strong("Year");
            let mut year = state.filters.year;
            egui::ComboBox::from_id_salt("year")
                .selected_text(year.map(|y| y.to_string()).unwrap_or_default())
                .show_ui(ui, |ui: &mut Ui| {
                    for y in &years {
                        ui.selectable_value(&mut year, Some(*y), y.to_string());
                    }
                });
            if year != state.filters.year {
                if let Some(y) = year {
                    state.set_year(y);
                }
            }
            ui.add_space(6.0);

            // ---- Segment ----
            ui.strong("Segment");
            let mut segment = state.filters.segment;
            egui::ComboBox::from_id_salt("segment")
                .selected_text(segment.label())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut segment, SegmentFilter::All, SegmentFilter::All.label());
                    for seg in Segment::ALL {
                        let option = SegmentFilter::Only(seg);
                        ui.selectable_value(&mut segment, option, option.label());
                    }
                });
            if segment != state.filters.segment {
                state.set_segment(segment);
            }
            ui.add_space(6.0);

            // Labels only; no need to refilter.
            ui.checkbox(&mut state.show_names, "Show client names");
            ui.separator();

            // ---- Client exclusion ----
            let options = state.view.exclusion_options.clone();
            let header_text = format!(
                "Exclude clients  ({}/{})",
                state.filters.excluded_clients.len(),
                options.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("exclude_clients")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_exclusions();
                    }

                    let mut toggled = None;
                    for name in &options {
                        let mut checked = state.filters.excluded_clients.contains(name);
                        if ui.checkbox(&mut checked, name).changed() {
                            toggled = Some(name.clone());
                        }
                    }
                    if let Some(name) = toggled {
                        state.toggle_excluded(&name);
                    }
                });

            warnings_list(ui, state);
        });
}

fn login_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Private access");
    ui.separator();
    ui.label("Password:");

    let response = ui.add(egui::TextEdit::singleline(&mut state.password_input).password(true));
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    if ui.button("Unlock").clicked() || submitted {
        state.try_unlock();
    }

    if let Some(err) = &state.auth_error {
        ui.add_space(4.0);
        ui.label(RichText::new(err.to_string()).color(Color32::RED));
    }
}

fn warnings_list(ui: &mut Ui, state: &AppState) {
    let warnings = state.warnings();
    if warnings.is_empty() {
        return;
    }
    ui.separator();
    ui.strong("Load warnings");
    for warning in warnings {
        ui.label(RichText::new(format!("⚠ {warning}")).color(WARNING_COLOR));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.add_enabled_ui(state.unlocked, |ui: &mut Ui| {
            ui.menu_button("File", |ui: &mut Ui| {
                if ui.button("Open data folder…").clicked() {
                    open_folder_dialog(state);
                    ui.close_menu();
                }
                if ui.button("Reload").clicked() {
                    state.reload();
                    ui.close_menu();
                }
            });
        });

        ui.separator();
        ui.strong("Sales dashboard");

        if let Some(date) = &state.config.last_updated {
            ui.separator();
            ui.label(RichText::new(format!("Data last updated: {date}")).weak());
        }

        if let Some(ds) = state.dataset() {
            ui.separator();
            ui.label(format!(
                "{} records loaded, {} in view",
                ds.len(),
                state.view.selection.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – metrics, charts, table
// ---------------------------------------------------------------------------

/// Render the dashboard body.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if !state.unlocked {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Enter the access password in the side panel to view the dashboard.");
        });
        return;
    }

    let Some(dataset) = state.dataset().filter(|ds| !ds.is_empty()) else {
        ui.heading("No data to show");
        for warning in state.warnings() {
            ui.label(RichText::new(warning.to_string()).color(WARNING_COLOR));
        }
        return;
    };

    let year_text = state
        .filters
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "all years".to_string());

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Sales by client and year");
            ui.label(
                RichText::new(format!(
                    "{} years loaded, {}–{}",
                    dataset.years.len(),
                    dataset.years.first().copied().unwrap_or_default(),
                    dataset.years.last().copied().unwrap_or_default()
                ))
                .weak(),
            );
            ui.add_space(8.0);

            // ---- Metric tiles ----
            ui.columns(2, |cols| {
                metric_tile(&mut cols[0], "Total sales", &format_eur(state.view.totals.net_sales));
                metric_tile(
                    &mut cols[1],
                    "Clients",
                    &state.view.totals.distinct_clients.to_string(),
                );
            });
            ui.add_space(8.0);

            // ---- Segment share + ranking, 1:2 ----
            ui.horizontal_top(|ui: &mut Ui| {
                let spacing = ui.spacing().item_spacing.x;
                let donut_width = (ui.available_width() - spacing) / 3.0;
                ui.allocate_ui(vec2(donut_width, CHART_HEIGHT + 30.0), |ui: &mut Ui| {
                    ui.vertical(|ui: &mut Ui| {
                        ui.strong(format!("Share by segment ({year_text})"));
                        plot::segment_donut(ui, state, donut_width, CHART_HEIGHT);
                    });
                });

                let bars_width = ui.available_width();
                ui.allocate_ui(vec2(bars_width, CHART_HEIGHT + 30.0), |ui: &mut Ui| {
                    ui.vertical(|ui: &mut Ui| {
                        ui.strong(format!("Top {} clients · {year_text}", state.config.top_n));
                        plot::top_clients_chart(ui, state, bars_width, CHART_HEIGHT);
                    });
                });
            });
            ui.add_space(12.0);

            // ---- Trend ----
            ui.heading("Yearly sales");
            plot::yearly_trend(ui, state, 260.0);
            ui.add_space(12.0);

            // ---- Table ----
            ui.heading(format!("Clients {year_text}"));
            table::client_table(ui, state);
        });
}

fn metric_tile(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open sales data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(path) = folder {
        state.set_data_dir(path);
    }
}

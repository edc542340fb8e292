use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points, Polygon, uniform_grid_spacer,
};

use crate::color::{segment_color, trend_color};
use crate::data::aggregate::{SegmentShare, client_label};
use crate::format::{format_decimal, format_eur};
use crate::state::AppState;

/// Inner radius of the donut, relative to the outer one.
const DONUT_HOLE: f64 = 0.55;

/// Angular resolution of the donut arcs.
const ARC_STEP: f64 = TAU / 180.0;

// ---------------------------------------------------------------------------
// Segment share (donut)
// ---------------------------------------------------------------------------

/// Wedges of the donut as convex quads: `(segment, share %, quads)`.
///
/// Slices start at 12 o'clock and run clockwise. Negative sums take no
/// space.
fn donut_slices(shares: &[SegmentShare]) -> Vec<(SegmentShare, f64, Vec<[[f64; 2]; 4]>)> {
    let total: f64 = shares.iter().map(|s| s.net_sales.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let point = |r: f64, a: f64| [r * a.cos(), r * a.sin()];
    let mut start = FRAC_PI_2;
    let mut slices = Vec::with_capacity(shares.len());

    for share in shares {
        let fraction = share.net_sales.max(0.0) / total;
        let sweep = fraction * TAU;
        let steps = ((sweep / ARC_STEP).ceil() as usize).max(1);

        let quads = (0..steps)
            .map(|k| {
                let a0 = start - sweep * k as f64 / steps as f64;
                let a1 = start - sweep * (k + 1) as f64 / steps as f64;
                [
                    point(1.0, a0),
                    point(1.0, a1),
                    point(DONUT_HOLE, a1),
                    point(DONUT_HOLE, a0),
                ]
            })
            .collect();

        slices.push((*share, fraction * 100.0, quads));
        start -= sweep;
    }
    slices
}

/// Donut chart of net sales per segment for the active slice.
pub fn segment_donut(ui: &mut Ui, state: &AppState, width: f32, height: f32) {
    let slices = donut_slices(&state.view.segments);
    if slices.is_empty() {
        ui.label("No sales in the current selection.");
        return;
    }

    Plot::new("segment_donut")
        .width(width)
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (share, percent, quads) in slices {
                let name = format!("{} · {percent:.1}%", share.segment.display_label());
                let color = segment_color(share.segment);
                for quad in quads {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(quad.to_vec()))
                            .name(&name)
                            .fill_color(color)
                            .stroke(Stroke::NONE),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top-N ranking (horizontal bars)
// ---------------------------------------------------------------------------

/// Axis label for a bar position. Position 0 is the bottom bar, i.e. the
/// last entry of `labels` (which is ordered largest first).
fn rank_label(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    let from_bottom = rounded as usize;
    if from_bottom >= labels.len() {
        return String::new();
    }
    labels[labels.len() - 1 - from_bottom].clone()
}

/// Horizontal bars of the largest clients, biggest on top.
pub fn top_clients_chart(ui: &mut Ui, state: &AppState, width: f32, height: f32) {
    let Some(dataset) = state.dataset() else {
        return;
    };
    let top = &state.view.top;
    if top.is_empty() {
        ui.label("No clients in the current selection.");
        return;
    }

    let labels: Vec<String> = top
        .iter()
        .map(|&i| client_label(&dataset.records[i], state.show_names))
        .collect();

    let n = top.len();
    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(rank, &i)| {
            let rec = &dataset.records[i];
            Bar::new((n - 1 - rank) as f64, rec.net_sales)
                .name(format!("{} · {}", labels[rank], format_eur(rec.net_sales)))
                .fill(segment_color(rec.segment))
                .width(0.7)
        })
        .collect();

    Plot::new("top_clients")
        .width(width)
        .height(height)
        .x_axis_label("Net sales (€)")
        .y_axis_label("Client")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            format_decimal(mark.value, 0)
        })
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            rank_label(&labels, mark.value)
        })
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Net sales"));
        });
}

// ---------------------------------------------------------------------------
// Yearly trend
// ---------------------------------------------------------------------------

/// Line of total net sales per year over the whole dataset.
pub fn yearly_trend(ui: &mut Ui, state: &AppState, height: f32) {
    if state.view.yearly.is_empty() {
        return;
    }
    let points: Vec<[f64; 2]> = state
        .view
        .yearly
        .iter()
        .map(|y| [y.year as f64, y.net_sales])
        .collect();
    let color = trend_color();

    Plot::new("yearly_trend")
        .height(height)
        .x_axis_label("Year")
        .y_axis_label("Net sales (€)")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            format!("{:.0}", mark.value)
        })
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            format_decimal(mark.value, 0)
        })
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Total sales")
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .name("Total sales")
                    .color(color)
                    .radius(4.0),
            );
        });
}

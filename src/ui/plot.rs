use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Size, StripBuilder};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::ChartData;
use crate::data::model::display_name;
use crate::state::{AppState, ChartView};

// ---------------------------------------------------------------------------
// Chart strip (central panel)
// ---------------------------------------------------------------------------

/// Render the three metric charts in equal-height strips.
pub fn chart_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) => {
                ui.heading(RichText::new(msg).color(Color32::RED));
            }
            None => {
                ui.heading("Open a file to view exam data  (File → Open…)");
            }
        });
        return;
    }

    let AppState {
        charts, color_map, ..
    } = state;
    let color_map = &*color_map;

    StripBuilder::new(ui)
        .sizes(Size::remainder().at_least(160.0), charts.len())
        .vertical(|mut strip| {
            for chart in charts.iter_mut() {
                strip.cell(|ui: &mut Ui| {
                    metric_chart(ui, chart, color_map);
                });
            }
        });
}

/// Tooltip text for a hovered point.
pub fn tooltip_text(exam: &str, timestamp: f64, value: f64) -> String {
    format!("Exam: {exam}\nMin: {timestamp}'\nVal: {value:.2}")
}

// ---------------------------------------------------------------------------
// Single metric chart
// ---------------------------------------------------------------------------

fn metric_chart(ui: &mut Ui, chart: &mut ChartView, color_map: &ColorMap) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(chart.metric.title());
    });

    let series = match &chart.data {
        ChartData::NoData => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new("No data for this selection.").color(Color32::GRAY));
            });
            return;
        }
        ChartData::Series(series) => series.clone(),
    };

    // ---- Legend: click to toggle a series ----
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for s in &series {
            let visible = chart.is_visible(&s.exam);
            let color = if visible {
                color_map.color_for(&s.exam)
            } else {
                Color32::DARK_GRAY
            };
            let text = RichText::new(format!("■ {}", display_name(&s.exam))).color(color);
            if ui.selectable_label(visible, text).clicked() {
                chart.toggle_series(&s.exam);
            }
        }
    });

    let mut plot = Plot::new(chart.metric.chart_id())
        .x_axis_label("Minutes from Start")
        .y_axis_label(chart.metric.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(|name, value| {
            if name.is_empty() {
                String::new()
            } else {
                tooltip_text(name, value.x, value.y)
            }
        });
    if let Some(bounds) = chart.bounds {
        plot = plot
            .include_x(bounds.x.min)
            .include_x(bounds.x.max)
            .include_y(bounds.y.min)
            .include_y(bounds.y.max);
    }

    plot.show(ui, |plot_ui| {
        for s in series.iter().filter(|s| chart.is_visible(&s.exam)) {
            let color = color_map.color_for(&s.exam);
            let coords: Vec<[f64; 2]> = s.values.iter().map(|p| [p.timestamp, p.value]).collect();

            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name(&s.exam)
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .name(&s.exam)
                    .color(color)
                    .radius(3.0),
            );
        }
    });
}

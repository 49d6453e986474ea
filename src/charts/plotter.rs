//! Chart Plotter Module
//! Interactive rendering of figures using egui_plot.

use egui::Color32;
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use super::transform::{BoxFigure, Figure, HistogramFigure, LineFigure, ScatterFigure};
use crate::data::format_ts;

const CHART_HEIGHT: f32 = 420.0;

/// Series color palette, first entry used for ungrouped series.
pub const PALETTE: [Color32; 4] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(243, 156, 18),  // Orange
];

/// Draws figures into the egui UI.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw one figure. `id` keeps plot state distinct across sub-figures.
    pub fn draw(ui: &mut egui::Ui, figure: &Figure, id: usize) {
        match figure {
            Figure::Histogram(fig) => Self::draw_histogram(ui, fig, id),
            Figure::Line(fig) => Self::draw_line(ui, fig, id),
            Figure::Scatter(fig) => Self::draw_scatter(ui, fig, id),
            Figure::Box(fig) => Self::draw_box(ui, fig, id),
        }
    }

    fn draw_histogram(ui: &mut egui::Ui, fig: &HistogramFigure, id: usize) {
        if let Some(title) = &fig.title {
            ui.label(egui::RichText::new(title).size(15.0).strong());
        }

        let color = Self::series_color(0);
        let bars: Vec<Bar> = fig
            .bins
            .iter()
            .map(|bin| {
                let width = bin.end - bin.start;
                Bar::new(bin.start + width / 2.0, bin.count as f64)
                    .width(width * 0.95)
                    .fill(color.gamma_multiply(0.7))
                    .stroke(egui::Stroke::new(1.0, Color32::BLACK))
            })
            .collect();

        Plot::new(format!("figure_{id}"))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(fig.x_label.clone())
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    fn draw_line(ui: &mut egui::Ui, fig: &LineFigure, id: usize) {
        let time_axis = fig.time_axis;
        let points: PlotPoints = fig.points.iter().copied().collect();

        Plot::new(format!("figure_{id}"))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(fig.x_label.clone())
            .y_axis_label(fig.y_label.clone())
            .x_axis_formatter(move |mark, _range| {
                if time_axis {
                    format_ts(mark.value as i64, "%d/%m")
                } else {
                    format!("{:.0}", mark.value)
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .color(Self::series_color(0))
                        .width(1.5),
                );
            });
    }

    fn draw_scatter(ui: &mut egui::Ui, fig: &ScatterFigure, id: usize) {
        let y_labels = fig.y_categories.clone();
        let has_legend = fig.groups.iter().any(|g| g.name.is_some());

        let mut plot = Plot::new(format!("figure_{id}"))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(fig.x_label.clone())
            .y_axis_label(fig.y_label.clone());

        if has_legend {
            plot = plot.legend(Legend::default());
        }

        if let Some(labels) = y_labels {
            plot = plot.y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            });
        }

        plot.show(ui, |plot_ui| {
            for (i, group) in fig.groups.iter().enumerate() {
                let points: PlotPoints = group.points.iter().copied().collect();
                let mut points = Points::new(points)
                    .radius(3.0)
                    .color(Self::series_color(i));
                if let Some(name) = &group.name {
                    points = points.name(name);
                }
                plot_ui.points(points);
            }
        });
    }

    fn draw_box(ui: &mut egui::Ui, fig: &BoxFigure, id: usize) {
        let x_labels = fig.categories.clone();
        let n_groups = fig.groups.len().max(1);

        Plot::new(format!("figure_{id}"))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(fig.x_label.clone())
            .y_axis_label(fig.y_label.clone())
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (gi, group) in fig.groups.iter().enumerate() {
                    let color = Self::series_color(gi);
                    let offset = (gi as f64 - (n_groups as f64 - 1.0) / 2.0) * 0.35;

                    let elems: Vec<BoxElem> = group
                        .boxes
                        .iter()
                        .enumerate()
                        .filter_map(|(ci, stats)| {
                            let s = stats.as_ref()?;
                            Some(
                                BoxElem::new(
                                    ci as f64 + offset,
                                    BoxSpread::new(
                                        s.whisker_low,
                                        s.q1,
                                        s.median,
                                        s.q3,
                                        s.whisker_high,
                                    ),
                                )
                                .box_width(0.3)
                                .fill(color.gamma_multiply(0.3))
                                .stroke(egui::Stroke::new(1.5, color)),
                            )
                        })
                        .collect();

                    if !elems.is_empty() {
                        plot_ui.box_plot(BoxPlot::new(elems).name(&group.name));
                    }
                }
            });
    }
}

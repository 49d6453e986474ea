//! Static Chart Renderer
//! Renders figures to PNG bytes with plotters for the export action. Split
//! views are stacked vertically in one image.

use anyhow::{anyhow, Context};
use plotters::prelude::*;
use std::io::Cursor;

use super::transform::{BoxFigure, Figure, HistogramFigure, LineFigure, ScatterFigure};
use crate::data::format_ts;

/// Same palette as the interactive backend.
const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(243, 156, 18),
];

fn render_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("chart render failed: {e}")
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render figures into a single PNG, one sub-area per figure.
    pub fn render_figures_to_png(
        figures: &[Figure],
        width: u32,
        height_per_figure: u32,
    ) -> anyhow::Result<Vec<u8>> {
        if figures.is_empty() {
            return Err(anyhow!("no figures to render"));
        }

        let height = height_per_figure * figures.len() as u32;
        let mut buf = vec![0u8; (width * height * 3) as usize];

        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let areas = root.split_evenly((figures.len(), 1));
            for (figure, area) in figures.iter().zip(areas.iter()) {
                match figure {
                    Figure::Histogram(fig) => Self::draw_histogram(area, fig)?,
                    Figure::Line(fig) => Self::draw_line(area, fig)?,
                    Figure::Scatter(fig) => Self::draw_scatter(area, fig)?,
                    Figure::Box(fig) => Self::draw_box(area, fig)?,
                }
            }

            root.present().map_err(render_err)?;
        }

        let img = image::RgbImage::from_raw(width, height, buf)
            .ok_or_else(|| anyhow!("render buffer size mismatch"))?;
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .context("PNG encoding failed")?;
        Ok(bytes)
    }

    fn draw_histogram(
        area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        fig: &HistogramFigure,
    ) -> anyhow::Result<()> {
        let (x_lo, x_hi, y_hi) = if fig.bins.is_empty() {
            (0.0, 1.0, 1.0)
        } else {
            let lo = fig.bins.first().map(|b| b.start).unwrap_or(0.0);
            let hi = fig.bins.last().map(|b| b.end).unwrap_or(1.0);
            let max = fig.bins.iter().map(|b| b.count).max().unwrap_or(0);
            (lo, hi, (max as f64 * 1.1).max(1.0))
        };

        let caption = fig.title.as_deref().unwrap_or(&fig.x_label);
        let mut chart = ChartBuilder::on(area)
            .caption(caption, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(fig.x_label.clone())
            .y_desc("Count")
            .draw()
            .map_err(render_err)?;

        let fill = SERIES_COLORS[0].mix(0.6).filled();
        chart
            .draw_series(fig.bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], fill.clone())
            }))
            .map_err(render_err)?;
        chart
            .draw_series(fig.bins.iter().map(|b| {
                Rectangle::new(
                    [(b.start, 0.0), (b.end, b.count as f64)],
                    BLACK.stroke_width(1),
                )
            }))
            .map_err(render_err)?;

        Ok(())
    }

    fn draw_line(
        area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        fig: &LineFigure,
    ) -> anyhow::Result<()> {
        let (x_lo, x_hi) = value_range(fig.points.iter().map(|p| p[0]));
        let (y_lo, y_hi) = value_range(fig.points.iter().map(|p| p[1]));
        let time_axis = fig.time_axis;

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(fig.x_label.clone())
            .y_desc(fig.y_label.clone())
            .x_label_formatter(&move |x: &f64| {
                if time_axis {
                    format_ts(*x as i64, "%d/%m")
                } else {
                    format!("{x:.0}")
                }
            })
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                fig.points.iter().map(|p| (p[0], p[1])),
                &SERIES_COLORS[0],
            ))
            .map_err(render_err)?;

        Ok(())
    }

    fn draw_scatter(
        area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        fig: &ScatterFigure,
    ) -> anyhow::Result<()> {
        let xs = fig.groups.iter().flat_map(|g| g.points.iter().map(|p| p[0]));
        let ys = fig.groups.iter().flat_map(|g| g.points.iter().map(|p| p[1]));
        let (x_lo, x_hi) = value_range(xs);
        let (y_lo, y_hi) = value_range(ys);
        let y_labels = fig.y_categories.clone();

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(fig.x_label.clone())
            .y_desc(fig.y_label.clone())
            .y_label_formatter(&move |y: &f64| match &y_labels {
                Some(labels) => {
                    let idx = y.round() as usize;
                    if (y - idx as f64).abs() < 1e-6 && idx < labels.len() {
                        labels[idx].clone()
                    } else {
                        String::new()
                    }
                }
                None => format!("{y:.0}"),
            })
            .draw()
            .map_err(render_err)?;

        let mut has_legend = false;
        for (i, group) in fig.groups.iter().enumerate() {
            let color = SERIES_COLORS[i % SERIES_COLORS.len()];
            let series = chart
                .draw_series(
                    group
                        .points
                        .iter()
                        .map(|p| Circle::new((p[0], p[1]), 3, color.filled())),
                )
                .map_err(render_err)?;

            if let Some(name) = &group.name {
                has_legend = true;
                series.label(name).legend(move |(x, y)| {
                    Circle::new((x + 5, y), 3, color.filled())
                });
            }
        }

        if has_legend {
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .draw()
                .map_err(render_err)?;
        }

        Ok(())
    }

    fn draw_box(
        area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        fig: &BoxFigure,
    ) -> anyhow::Result<()> {
        let values = fig.groups.iter().flat_map(|g| {
            g.boxes
                .iter()
                .flatten()
                .flat_map(|s| [s.whisker_low, s.whisker_high])
        });
        let (y_lo, y_hi) = value_range(values);
        let x_hi = fig.categories.len().max(1) as f64;
        let x_labels = fig.categories.clone();
        let n_groups = fig.groups.len().max(1) as f64;

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(-0.5..x_hi - 0.5, y_lo..y_hi)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(fig.x_label.clone())
            .y_desc(fig.y_label.clone())
            .x_label_formatter(&move |x: &f64| {
                let idx = x.round() as usize;
                if (x - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .draw()
            .map_err(render_err)?;

        let half_width = 0.15;
        for (gi, group) in fig.groups.iter().enumerate() {
            let color = SERIES_COLORS[gi % SERIES_COLORS.len()];
            let offset = (gi as f64 - (n_groups - 1.0) / 2.0) * 0.35;

            for (ci, stats) in group.boxes.iter().enumerate() {
                let Some(s) = stats else {
                    continue;
                };
                let x = ci as f64 + offset;

                chart
                    .draw_series([
                        Rectangle::new(
                            [(x - half_width, s.q1), (x + half_width, s.q3)],
                            color.mix(0.4).filled(),
                        ),
                        Rectangle::new(
                            [(x - half_width, s.q1), (x + half_width, s.q3)],
                            color.stroke_width(1),
                        ),
                    ])
                    .map_err(render_err)?;

                chart
                    .draw_series([
                        // Median, whisker stems and caps.
                        PathElement::new(
                            vec![(x - half_width, s.median), (x + half_width, s.median)],
                            color.stroke_width(2),
                        ),
                        PathElement::new(
                            vec![(x, s.whisker_low), (x, s.q1)],
                            color.stroke_width(1),
                        ),
                        PathElement::new(
                            vec![(x, s.q3), (x, s.whisker_high)],
                            color.stroke_width(1),
                        ),
                        PathElement::new(
                            vec![
                                (x - half_width / 2.0, s.whisker_low),
                                (x + half_width / 2.0, s.whisker_low),
                            ],
                            color.stroke_width(1),
                        ),
                        PathElement::new(
                            vec![
                                (x - half_width / 2.0, s.whisker_high),
                                (x + half_width / 2.0, s.whisker_high),
                            ],
                            color.stroke_width(1),
                        ),
                    ])
                    .map_err(render_err)?;
            }
        }

        Ok(())
    }
}

/// Padded min/max range for an axis; a sane default when empty or degenerate.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if !v.is_nan() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if lo.is_infinite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_figure_list_is_an_error() {
        assert!(StaticChartRenderer::render_figures_to_png(&[], 400, 300).is_err());
    }

    #[test]
    fn value_range_pads_and_defaults() {
        assert_eq!(value_range(std::iter::empty::<f64>()), (0.0, 1.0));
        let (lo, hi) = value_range([5.0, 5.0].into_iter());
        assert!(lo < 5.0 && hi > 5.0);
    }
}

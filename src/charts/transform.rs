//! Chart Transform Module
//! Pure transforms from the filtered DataFrame to the backend-neutral figure
//! model. Both the interactive and the static backend consume these figures,
//! so the data layer is never duplicated per backend.

use polars::prelude::*;
use thiserror::Error;

use super::ChartKind;
use crate::data::TIME_ORDER_COL;

/// Bin width for the total-bill histogram.
pub const TOTAL_BILL_BIN_WIDTH: f64 = 2.0;
/// Bin count for the per-meal tip histograms.
pub const TIP_BIN_COUNT: usize = 7;

/// Weekday order used for categorical day axes.
const DAY_ORDER: [&str; 4] = ["Thur", "Fri", "Sat", "Sun"];

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// A renderable chart, reduced to plain data.
#[derive(Debug, Clone)]
pub enum Figure {
    Histogram(HistogramFigure),
    Line(LineFigure),
    Scatter(ScatterFigure),
    Box(BoxFigure),
}

#[derive(Debug, Clone)]
pub struct HistogramFigure {
    /// Sub-chart title for split views (e.g. "Lunch" / "Dinner").
    pub title: Option<String>,
    pub x_label: String,
    pub bins: Vec<Bin>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct LineFigure {
    pub x_label: String,
    pub y_label: String,
    /// Points sorted by x. X values are epoch seconds when `time_axis` is set.
    pub points: Vec<[f64; 2]>,
    pub time_axis: bool,
}

#[derive(Debug, Clone)]
pub struct ScatterFigure {
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<PointGroup>,
    /// When set, y values are indices into these category labels.
    pub y_categories: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct PointGroup {
    /// None for a single ungrouped series.
    pub name: Option<String>,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct BoxFigure {
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone)]
pub struct BoxGroup {
    pub name: String,
    /// One entry per category; None where the subset is empty.
    pub boxes: Vec<Option<BoxStats>>,
}

/// Five-number box summary with 1.5*IQR whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        let q1 = sorted[n / 4];
        let median = sorted[n / 2];
        let q3 = sorted[3 * n / 4];
        let iqr = q3 - q1;
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        Some(BoxStats {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
        })
    }
}

/// How a histogram is bucketed.
#[derive(Debug, Clone, Copy)]
pub enum BinSpec {
    /// Fixed-width bins anchored at a multiple of the width.
    Width(f64),
    /// A fixed number of equal bins spanning the value range.
    Count(usize),
}

/// Bucket values into histogram bins. Empty input yields no bins.
pub fn build_bins(values: &[f64], spec: BinSpec) -> Vec<Bin> {
    let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if clean.is_empty() {
        return Vec::new();
    }

    let min = clean.iter().copied().fold(f64::INFINITY, f64::min);
    let max = clean.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (lo, width, n_bins) = match spec {
        BinSpec::Width(w) => {
            let lo = (min / w).floor() * w;
            let n = ((max - lo) / w).floor() as usize + 1;
            (lo, w, n)
        }
        BinSpec::Count(n) => {
            let n = n.max(1);
            let span = max - min;
            if span <= 0.0 {
                // All values identical: a single unit-wide bin.
                (min, 1.0, 1)
            } else {
                (min, span / n as f64, n)
            }
        }
    };

    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for v in clean {
        let idx = (((v - lo) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }

    bins
}

/// Build the figure(s) for a chart kind over the filtered dataset.
///
/// Every kind yields exactly one figure except the by-gender day-of-week view,
/// which yields a Lunch and a Dinner sub-figure.
pub fn build_figures(df: &DataFrame, kind: ChartKind) -> Result<Vec<Figure>, ChartError> {
    let figures = match kind {
        ChartKind::TotalBill => {
            let bills = f64_column(df, "total_bill")?;
            let values: Vec<f64> = bills.into_iter().flatten().collect();
            vec![Figure::Histogram(HistogramFigure {
                title: None,
                x_label: "Total Bill".to_string(),
                bins: build_bins(&values, BinSpec::Width(TOTAL_BILL_BIN_WIDTH)),
            })]
        }

        ChartKind::Tips => {
            let stamps = f64_column(df, TIME_ORDER_COL)?;
            let tips = f64_column(df, "tip")?;
            let mut points: Vec<[f64; 2]> = stamps
                .into_iter()
                .zip(tips)
                .filter_map(|(x, y)| Some([x?, y?]))
                .collect();
            points.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));
            vec![Figure::Line(LineFigure {
                x_label: "Order Time".to_string(),
                y_label: "Tip".to_string(),
                points,
                time_axis: true,
            })]
        }

        ChartKind::TotalBillVsTips => {
            let bills = f64_column(df, "total_bill")?;
            let tips = f64_column(df, "tip")?;
            let points: Vec<[f64; 2]> = bills
                .into_iter()
                .zip(tips)
                .filter_map(|(x, y)| Some([x?, y?]))
                .collect();
            vec![Figure::Scatter(ScatterFigure {
                x_label: "Total Bill".to_string(),
                y_label: "Tip".to_string(),
                groups: vec![PointGroup { name: None, points }],
                y_categories: None,
            })]
        }

        ChartKind::TotalBillVsTipsByGender => {
            let bills = f64_column(df, "total_bill")?;
            let tips = f64_column(df, "tip")?;
            let sexes = str_column(df, "sex")?;
            let groups = grouped_points(
                sexes,
                bills.into_iter().zip(tips).map(|(x, y)| match (x, y) {
                    (Some(x), Some(y)) => Some([x, y]),
                    _ => None,
                }),
            );
            vec![Figure::Scatter(ScatterFigure {
                x_label: "Total Bill".to_string(),
                y_label: "Tip".to_string(),
                groups,
                y_categories: None,
            })]
        }

        ChartKind::TipsByDayOfWeekByGender => {
            let tips = f64_column(df, "tip")?;
            let times = str_column(df, "time")?;

            // One sub-histogram per meal time; an empty subset is fine and
            // simply produces no bins.
            ["Lunch", "Dinner"]
                .iter()
                .map(|meal| {
                    let values: Vec<f64> = tips
                        .iter()
                        .zip(&times)
                        .filter_map(|(tip, time)| match (tip, time) {
                            (Some(tip), Some(time)) if time == meal => Some(*tip),
                            _ => None,
                        })
                        .collect();
                    Figure::Histogram(HistogramFigure {
                        title: Some(meal.to_string()),
                        x_label: "Tip".to_string(),
                        bins: build_bins(&values, BinSpec::Count(TIP_BIN_COUNT)),
                    })
                })
                .collect()
        }

        // Label kept from the original dashboard even though the plot shows
        // tip against day, matching observed behavior.
        ChartKind::TotalBillByDayAndTime => {
            let tips = f64_column(df, "tip")?;
            let days = str_column(df, "day")?;
            let sexes = str_column(df, "sex")?;

            let categories = ordered_categories(&days, &DAY_ORDER);
            let day_index = |day: &str| categories.iter().position(|c| c == day);

            let groups = grouped_points(
                sexes,
                tips.into_iter().zip(days).map(|(tip, day)| {
                    let tip = tip?;
                    let idx = day_index(&day?)?;
                    Some([tip, idx as f64])
                }),
            );
            vec![Figure::Scatter(ScatterFigure {
                x_label: "Tip".to_string(),
                y_label: "Day".to_string(),
                groups,
                y_categories: Some(categories),
            })]
        }

        ChartKind::TipsByDayTime => {
            let bills = f64_column(df, "total_bill")?;
            let days = str_column(df, "day")?;
            let times = str_column(df, "time")?;

            let categories = ordered_categories(&days, &DAY_ORDER);
            let meals = ordered_categories(&times, &["Lunch", "Dinner"]);

            let groups = meals
                .into_iter()
                .map(|meal| {
                    let boxes = categories
                        .iter()
                        .map(|day| {
                            let values: Vec<f64> = bills
                                .iter()
                                .zip(&days)
                                .zip(&times)
                                .filter_map(|((bill, d), t)| match (bill, d, t) {
                                    (Some(bill), Some(d), Some(t))
                                        if d == day && *t == meal =>
                                    {
                                        Some(*bill)
                                    }
                                    _ => None,
                                })
                                .collect();
                            BoxStats::from_values(&values)
                        })
                        .collect();
                    BoxGroup { name: meal, boxes }
                })
                .collect();

            vec![Figure::Box(BoxFigure {
                x_label: "Day".to_string(),
                y_label: "Total Bill".to_string(),
                categories,
                groups,
            })]
        }
    };

    Ok(figures)
}

/// Extract a column as f64 values, row-aligned (None for nulls).
fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ChartError> {
    let col = df.column(name)?.cast(&DataType::Float64)?;
    let ca = col.f64()?;
    Ok(ca.into_iter().collect())
}

/// Extract a column as strings, row-aligned (None for nulls).
fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ChartError> {
    let col = df.column(name)?;
    (0..df.height())
        .map(|i| {
            let val = col.get(i)?;
            if val.is_null() {
                Ok(None)
            } else {
                Ok(Some(val.to_string().trim_matches('"').to_string()))
            }
        })
        .collect::<Result<_, PolarsError>>()
        .map_err(ChartError::from)
}

/// Group row-aligned points by key, keeping first-seen group order.
fn grouped_points(
    keys: Vec<Option<String>>,
    points: impl Iterator<Item = Option<[f64; 2]>>,
) -> Vec<PointGroup> {
    let mut groups: Vec<PointGroup> = Vec::new();

    for (key, point) in keys.into_iter().zip(points) {
        let (Some(key), Some(point)) = (key, point) else {
            continue;
        };
        match groups.iter_mut().find(|g| g.name.as_deref() == Some(key.as_str())) {
            Some(group) => group.points.push(point),
            None => groups.push(PointGroup {
                name: Some(key),
                points: vec![point],
            }),
        }
    }

    groups
}

/// Distinct values of a column ordered by a preferred ordering, with values
/// outside the ordering appended in first-seen order.
fn ordered_categories(values: &[Option<String>], preferred: &[&str]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for v in values.iter().flatten() {
        if !seen.iter().any(|s| s == v) {
            seen.push(v.clone());
        }
    }

    let mut ordered: Vec<String> = preferred
        .iter()
        .filter(|p| seen.iter().any(|s| s == *p))
        .map(|p| p.to_string())
        .collect();
    for v in seen {
        if !ordered.contains(&v) {
            ordered.push(v);
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tips_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("total_bill".into(), vec![10.0f64, 12.0, 15.0, 20.0, 45.0]),
            Column::new("tip".into(), vec![1.0f64, 2.0, 3.0, 4.0, 5.0]),
            Column::new(
                "sex".into(),
                vec!["Female", "Male", "Male", "Female", "Male"],
            ),
            Column::new("day".into(), vec!["Sun", "Thur", "Sat", "Sun", "Fri"]),
            Column::new(
                "time".into(),
                vec!["Dinner", "Lunch", "Dinner", "Dinner", "Lunch"],
            ),
            Column::new(
                crate::data::TIME_ORDER_COL.into(),
                vec![500i64, 100, 400, 200, 300],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn total_bill_histogram_uses_width_two_bins() {
        let figs = build_figures(&tips_df(), ChartKind::TotalBill).unwrap();
        assert_eq!(figs.len(), 1);
        let Figure::Histogram(hist) = &figs[0] else {
            panic!("expected histogram");
        };

        // Bins anchored at 10 with width 2: 10 and 12 land in adjacent low
        // bins, 45 in the topmost bin.
        assert_eq!(hist.bins[0].start, 10.0);
        assert_eq!(hist.bins[0].count, 1);
        assert_eq!(hist.bins[1].start, 12.0);
        assert_eq!(hist.bins[1].count, 1);
        let last = hist.bins.last().unwrap();
        assert!(last.start <= 45.0 && 45.0 < last.end);
        assert_eq!(last.count, 1);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 5);
    }

    #[test]
    fn tips_line_is_sorted_chronologically() {
        let figs = build_figures(&tips_df(), ChartKind::Tips).unwrap();
        let Figure::Line(line) = &figs[0] else {
            panic!("expected line");
        };
        assert!(line.time_axis);
        let xs: Vec<f64> = line.points.iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
        // Tips follow their rows, not the original row order.
        assert_eq!(line.points[0][1], 2.0);
        assert_eq!(line.points[4][1], 1.0);
    }

    #[test]
    fn scatter_by_gender_groups_in_first_seen_order() {
        let figs = build_figures(&tips_df(), ChartKind::TotalBillVsTipsByGender).unwrap();
        let Figure::Scatter(scatter) = &figs[0] else {
            panic!("expected scatter");
        };
        assert_eq!(scatter.groups.len(), 2);
        assert_eq!(scatter.groups[0].name.as_deref(), Some("Female"));
        assert_eq!(scatter.groups[0].points.len(), 2);
        assert_eq!(scatter.groups[1].name.as_deref(), Some("Male"));
        assert_eq!(scatter.groups[1].points.len(), 3);
    }

    #[test]
    fn split_view_yields_lunch_and_dinner_figures() {
        let figs = build_figures(&tips_df(), ChartKind::TipsByDayOfWeekByGender).unwrap();
        assert_eq!(figs.len(), 2);
        let titles: Vec<_> = figs
            .iter()
            .map(|f| match f {
                Figure::Histogram(h) => h.title.clone().unwrap(),
                _ => panic!("expected histograms"),
            })
            .collect();
        assert_eq!(titles, vec!["Lunch", "Dinner"]);
    }

    #[test]
    fn dinner_subfigure_from_lunch_only_data_is_empty_not_an_error() {
        let df = DataFrame::new(vec![
            Column::new("tip".into(), vec![1.5f64, 2.5]),
            Column::new("time".into(), vec!["Lunch", "Lunch"]),
        ])
        .unwrap();

        let figs = build_figures(&df, ChartKind::TipsByDayOfWeekByGender).unwrap();
        assert_eq!(figs.len(), 2);
        let Figure::Histogram(dinner) = &figs[1] else {
            panic!("expected histogram");
        };
        assert_eq!(dinner.title.as_deref(), Some("Dinner"));
        assert!(dinner.bins.is_empty());
    }

    #[test]
    fn day_scatter_uses_categorical_day_axis() {
        let figs = build_figures(&tips_df(), ChartKind::TotalBillByDayAndTime).unwrap();
        let Figure::Scatter(scatter) = &figs[0] else {
            panic!("expected scatter");
        };
        assert_eq!(
            scatter.y_categories.as_deref(),
            Some(&["Thur".to_string(), "Fri".into(), "Sat".into(), "Sun".into()][..])
        );
        // X is the tip value even though the label says total bill.
        assert_eq!(scatter.x_label, "Tip");
    }

    #[test]
    fn box_figure_groups_by_day_and_meal() {
        let figs = build_figures(&tips_df(), ChartKind::TipsByDayTime).unwrap();
        let Figure::Box(boxes) = &figs[0] else {
            panic!("expected box figure");
        };
        assert_eq!(boxes.categories, vec!["Thur", "Fri", "Sat", "Sun"]);
        assert_eq!(boxes.groups.len(), 2);
        assert_eq!(boxes.groups[0].name, "Lunch");

        // Thur has a single Lunch row (total_bill 12) and no Dinner rows.
        let lunch_thur = boxes.groups[0].boxes[0].as_ref().unwrap();
        assert_eq!(lunch_thur.median, 12.0);
        assert!(boxes.groups[1].boxes[0].is_none());
    }

    #[test]
    fn box_stats_quartiles_and_whiskers() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        // 100 is past q3 + 1.5*IQR, so the whisker stops at 4.
        assert_eq!(stats.whisker_high, 4.0);
        assert_eq!(stats.whisker_low, 1.0);

        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn empty_values_build_no_bins() {
        assert!(build_bins(&[], BinSpec::Width(2.0)).is_empty());
        assert!(build_bins(&[], BinSpec::Count(7)).is_empty());
    }

    #[test]
    fn identical_values_fall_into_one_bin() {
        let bins = build_bins(&[3.0, 3.0, 3.0], BinSpec::Count(7));
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn missing_column_surfaces_error() {
        let df = DataFrame::new(vec![Column::new("tip".into(), vec![1.0f64])]).unwrap();
        assert!(build_figures(&df, ChartKind::TotalBill).is_err());
    }
}

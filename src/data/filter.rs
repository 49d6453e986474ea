//! Range Filter Module
//! Windows the dataset to rows whose column value falls in an inclusive range.

use polars::prelude::*;

/// Keep rows whose `column` value lies in `[start_ts, end_ts]`, both ends
/// inclusive, preserving row order. An inverted range (start > end) yields an
/// empty frame rather than an error; a missing column surfaces the Polars
/// column-not-found error.
pub fn filter_range(
    df: &DataFrame,
    column: &str,
    start_ts: i64,
    end_ts: i64,
) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(
            col(column)
                .gt_eq(lit(start_ts))
                .and(col(column).lt_eq(lit(end_ts))),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TIME_ORDER_COL;

    fn sample_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("tip".into(), vec![1.0f64, 2.0, 3.0, 4.0, 5.0]),
            Column::new(TIME_ORDER_COL.into(), vec![100i64, 300, 200, 500, 400]),
        ])
        .unwrap()
    }

    fn time_orders(df: &DataFrame) -> Vec<i64> {
        df.column(TIME_ORDER_COL)
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn bounds_are_inclusive() {
        let df = sample_df();
        let out = filter_range(&df, TIME_ORDER_COL, 200, 400).unwrap();
        assert_eq!(time_orders(&out), vec![300, 200, 400]);
    }

    #[test]
    fn row_order_is_preserved() {
        let df = sample_df();
        let out = filter_range(&df, TIME_ORDER_COL, 0, 1000).unwrap();
        assert_eq!(time_orders(&out), vec![100, 300, 200, 500, 400]);
    }

    #[test]
    fn inverted_range_yields_empty() {
        let df = sample_df();
        let out = filter_range(&df, TIME_ORDER_COL, 400, 200).unwrap();
        assert_eq!(out.height(), 0);

        // Filtering the already-empty frame stays empty.
        let again = filter_range(&out, TIME_ORDER_COL, 400, 200).unwrap();
        assert_eq!(again.height(), 0);
    }

    #[test]
    fn filtering_is_idempotent() {
        let df = sample_df();
        let once = filter_range(&df, TIME_ORDER_COL, 200, 400).unwrap();
        let twice = filter_range(&once, TIME_ORDER_COL, 200, 400).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn exact_instant_range_matches_only_that_second() {
        let df = sample_df();
        let out = filter_range(&df, TIME_ORDER_COL, 300, 300).unwrap();
        assert_eq!(time_orders(&out), vec![300]);

        let none = filter_range(&df, TIME_ORDER_COL, 301, 301).unwrap();
        assert_eq!(none.height(), 0);
    }

    #[test]
    fn missing_column_is_an_error() {
        let df = sample_df();
        assert!(filter_range(&df, "no_such_column", 0, 10).is_err());
    }
}

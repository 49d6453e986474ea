//! Data module - CSV loading, timestamp synthesis, range filtering

mod filter;
mod loader;
mod synth;

pub use filter::filter_range;
pub use loader::{DataLoader, LoaderError, TIPS_CSV_URL};
pub use synth::{random_timestamps, with_time_order};

/// Column holding the synthetic per-row timestamp (epoch seconds).
pub const TIME_ORDER_COL: &str = "time_order";

/// Fixed selection window: 2023-01-01T00:00:00 UTC.
pub const WINDOW_START_TS: i64 = 1_672_531_200;
/// Fixed selection window: 2023-01-31T23:59:59 UTC.
pub const WINDOW_END_TS: i64 = 1_675_209_599;

/// Format an epoch-second timestamp with a chrono format string.
pub fn format_ts(ts: i64, fmt: &str) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_match_january_2023() {
        assert_eq!(
            format_ts(WINDOW_START_TS, "%Y-%m-%d %H:%M:%S"),
            "2023-01-01 00:00:00"
        );
        assert_eq!(
            format_ts(WINDOW_END_TS, "%Y-%m-%d %H:%M:%S"),
            "2023-01-31 23:59:59"
        );
    }

    #[test]
    fn format_ts_day_month_year() {
        assert_eq!(format_ts(WINDOW_START_TS, "%d/%m/%Y"), "01/01/2023");
    }
}

//! Timestamp Synthesizer Module
//! Attaches a synthetic random order timestamp to every dataset row.

use polars::prelude::*;
use rand::Rng;

use super::{TIME_ORDER_COL, WINDOW_END_TS, WINDOW_START_TS};

/// Sample `k` timestamps uniformly from the half-open window `[start_ts, end_ts)`
/// at one-second resolution, order-aligned with the caller's rows.
///
/// The generator is passed in explicitly so tests can seed it.
pub fn random_timestamps<R: Rng>(rng: &mut R, start_ts: i64, end_ts: i64, k: usize) -> Vec<i64> {
    let span = end_ts - start_ts;
    if span <= 0 {
        return vec![start_ts; k];
    }
    (0..k).map(|_| start_ts + rng.gen_range(0..span)).collect()
}

/// Attach the `time_order` column, one random timestamp per row within the
/// fixed selection window. Called once at load; the column is never regenerated.
pub fn with_time_order<R: Rng>(mut df: DataFrame, rng: &mut R) -> PolarsResult<DataFrame> {
    let stamps = random_timestamps(rng, WINDOW_START_TS, WINDOW_END_TS, df.height());
    df.with_column(Column::new(TIME_ORDER_COL.into(), stamps))?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_count_yields_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_timestamps(&mut rng, WINDOW_START_TS, WINDOW_END_TS, 0).is_empty());
    }

    #[test]
    fn all_samples_within_half_open_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let stamps = random_timestamps(&mut rng, WINDOW_START_TS, WINDOW_END_TS, 500);
        assert_eq!(stamps.len(), 500);
        for ts in stamps {
            assert!(ts >= WINDOW_START_TS);
            assert!(ts < WINDOW_END_TS);
        }
    }

    #[test]
    fn seeded_generator_is_deterministic() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(
            random_timestamps(&mut a, WINDOW_START_TS, WINDOW_END_TS, 50),
            random_timestamps(&mut b, WINDOW_START_TS, WINDOW_END_TS, 50)
        );
    }

    #[test]
    fn collapsed_window_repeats_start() {
        let mut rng = StdRng::seed_from_u64(3);
        let stamps = random_timestamps(&mut rng, 100, 100, 4);
        assert_eq!(stamps, vec![100, 100, 100, 100]);
    }

    #[test]
    fn time_order_column_aligned_with_rows() {
        let df = DataFrame::new(vec![Column::new(
            "total_bill".into(),
            vec![10.0f64, 12.0, 15.0, 20.0, 45.0],
        )])
        .unwrap();

        let mut rng = StdRng::seed_from_u64(9);
        let df = with_time_order(df, &mut rng).unwrap();

        assert_eq!(df.height(), 5);
        let col = df.column(TIME_ORDER_COL).unwrap();
        let col = col.i64().unwrap();
        for i in 0..df.height() {
            let ts = col.get(i).unwrap();
            // Half-open window: the end second itself is never emitted.
            assert!(ts >= WINDOW_START_TS);
            assert!(ts < WINDOW_END_TS);
        }
    }
}

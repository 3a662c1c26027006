use crate::models::{HistoryPoint, HISTORY_LEN};
use chrono::{Duration, NaiveDate};

pub const SAMPLE_BASE_PRICE: i64 = 45_000;

/// Synthetic history ending the day before `today`, oldest first.
///
/// Used when the upstream chart cannot be fetched. Makes no external calls.
pub fn generate_sample_history(today: NaiveDate) -> Vec<HistoryPoint> {
    (0..HISTORY_LEN as i64)
        .map(|i| HistoryPoint {
            date: today - Duration::days(HISTORY_LEN as i64 - i),
            price: (SAMPLE_BASE_PRICE + sample_offset(i)) as f64,
        })
        .collect()
}

fn sample_offset(i: i64) -> i64 {
    i * 300 - (i % 2) * 800 + (i % 3) * 400
}

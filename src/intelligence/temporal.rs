use chrono::FixedOffset;

use crate::models::{TemporalPattern, TransactionRecord};

/// An hour is "common" when it holds more than this share (percent) of the batch.
pub const COMMON_HOUR_SHARE_PCT: usize = 20;

/// A histogram alone never justifies near-certainty.
pub const MAX_TEMPORAL_CONFIDENCE: u8 = 95;

const SECONDS_PER_DAY: i64 = 86_400;

/// Hour of day (0–23) of an epoch-seconds timestamp in the given zone.
pub fn local_hour(timestamp: i64, offset: FixedOffset) -> u8 {
    let local = timestamp + offset.local_minus_utc() as i64;
    (local.rem_euclid(SECONDS_PER_DAY) / 3_600) as u8
}

/// Build the 24-bucket hour-of-day histogram and derive the clustering signal.
pub fn analyze_temporal_patterns(
    transactions: &[TransactionRecord],
    offset: FixedOffset,
) -> TemporalPattern {
    let total = transactions.len();
    if total == 0 {
        return TemporalPattern::default();
    }

    let mut histogram = [0usize; 24];
    for tx in transactions {
        histogram[local_hour(tx.timestamp, offset) as usize] += 1;
    }

    // share > 20%  <=>  count * 100 > total * 20
    let common_hours: Vec<u8> = histogram
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count * 100 > total * COMMON_HOUR_SHARE_PCT)
        .map(|(hour, _)| hour as u8)
        .collect();

    let has_patterns = !common_hours.is_empty();
    // No common hour, no timing signal
    let confidence = if has_patterns {
        let max_count = histogram.iter().copied().max().unwrap_or(0);
        let max_share = ((max_count * 100 + total / 2) / total).min(100) as u8;
        max_share.min(MAX_TEMPORAL_CONFIDENCE)
    } else {
        0
    };

    TemporalPattern {
        has_patterns,
        confidence,
        common_hours,
        histogram,
    }
}

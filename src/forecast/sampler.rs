use chrono::{DateTime, Duration, Utc};

use super::types::HourlySample;

/// Anything placed on the timeline by an epoch-second timestamp.
pub trait Timestamped {
    fn epoch_seconds(&self) -> i64;
}

impl Timestamped for HourlySample {
    fn epoch_seconds(&self) -> i64 {
        self.dt
    }
}

/// Picks, for each offset from `now`, the sample closest to `now + offset`.
///
/// Output follows offset order. Ties go to the earlier sample in `samples`.
/// Samples without a positive timestamp are ignored, and an offset with no
/// usable sample is left out rather than padded.
pub fn nearest_samples<'a, T: Timestamped>(
    samples: &'a [T],
    now: DateTime<Utc>,
    offsets: &[Duration],
) -> Vec<&'a T> {
    offsets
        .iter()
        .filter_map(|offset| {
            let target_ms = now.checked_add_signed(*offset)?.timestamp_millis();
            let mut closest: Option<(&T, i64)> = None;

            for sample in samples.iter().filter(|s| s.epoch_seconds() > 0) {
                let diff = sample
                    .epoch_seconds()
                    .saturating_mul(1000)
                    .saturating_sub(target_ms)
                    .saturating_abs();
                if closest.map_or(true, |(_, best)| diff < best) {
                    closest = Some((sample, diff));
                }
            }

            closest.map(|(sample, _)| sample)
        })
        .collect()
}

/// The forward offsets shown on the page by default: +2h, +4h, +6h, +8h.
pub fn default_offsets() -> Vec<Duration> {
    [2, 4, 6, 8].into_iter().map(Duration::hours).collect()
}

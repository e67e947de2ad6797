use chrono::{DateTime, Duration, TimeZone};

/// Length of the intersection of `[start1, end1)` and `[start2, end2)` in epoch milliseconds.
/// Disjoint intervals produce 0.
pub fn interval_overlap_ms(start1: i64, end1: i64, start2: i64, end2: i64) -> i64 {
    let overlap_start = start1.max(start2);
    let overlap_end = end1.min(end2);
    (overlap_end - overlap_start).max(0)
}

/// Same as [interval_overlap_ms] but for instants. The intervals may use different timezones.
pub fn interval_overlap<Tz1: TimeZone, Tz2: TimeZone>(
    start1: &DateTime<Tz1>,
    end1: &DateTime<Tz1>,
    start2: &DateTime<Tz2>,
    end2: &DateTime<Tz2>,
) -> Duration {
    Duration::milliseconds(interval_overlap_ms(
        start1.timestamp_millis(),
        end1.timestamp_millis(),
        start2.timestamp_millis(),
        end2.timestamp_millis(),
    ))
}

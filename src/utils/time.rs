use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// This is the standard way of converting a date to a string in punchclock.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Step used when a wall-clock time falls into a DST gap.
const GAP_STEP: Duration = Duration::seconds(15 * 60);

/// Resolves a wall-clock time in `tz` into an instant. Ambiguous times take the earlier instant.
/// Times skipped by a DST jump resolve to the first valid instant after the gap.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    let mut candidate = naive;
    // Real gaps never exceed a day.
    for _ in 0..(24 * 4) {
        if let Some(v) = tz.from_local_datetime(&candidate).earliest() {
            return v;
        }
        candidate += GAP_STEP;
    }
    tz.from_utc_datetime(&naive)
}

/// Returns the local midnight that starts `date`.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Returns start of the next day.
pub fn next_day_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    let tz = date.timezone();
    match date.date_naive().succ_opt() {
        Some(next) => start_of_day(&tz, next),
        None => date + Duration::days(1),
    }
}

/// Formats a duration as `HH:MM:SS`, the way sessions store their display duration.
pub fn format_clock_duration(v: Duration) -> String {
    let total = v.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Formats a duration as `8h 30m`. Seconds are truncated.
pub fn format_hours_minutes(v: Duration) -> String {
    let minutes = v.num_minutes().max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

    use crate::aggregation::test_support::GapZone;

    use super::{
        format_clock_duration, format_hours_minutes, next_day_start, resolve_local, start_of_day,
    };

    #[test]
    fn start_of_day_uses_local_midnight() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let start = start_of_day(&tz, date);
        assert_eq!(start.date_naive(), date);
        assert_eq!(start.hour(), 0);
        assert_eq!(start.to_utc().hour(), 22);
    }

    #[test]
    fn next_day_start_rolls_over_month() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let moment = tz.with_ymd_and_hms(2024, 4, 30, 23, 15, 0).unwrap();
        let next = next_day_start(moment);
        assert_eq!(next, tz.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn missing_midnight_resolves_to_end_of_gap() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 7).unwrap();
        let start = start_of_day(&GapZone, date);
        assert_eq!(start.to_utc(), Utc.with_ymd_and_hms(2024, 4, 6, 23, 0, 0).unwrap());
        assert_eq!((start.date_naive(), start.hour(), start.minute()), (date, 1, 0));

        let inside_gap = date.and_hms_opt(0, 30, 0).unwrap();
        assert_eq!(resolve_local(&GapZone, inside_gap), start);

        let evening = GapZone.with_ymd_and_hms(2024, 4, 6, 12, 0, 0).unwrap();
        assert_eq!(next_day_start(evening), start);
        // the following midnight exists again
        let after = next_day_start(start);
        assert_eq!(after.to_utc(), Utc.with_ymd_and_hms(2024, 4, 7, 22, 0, 0).unwrap());
    }

    #[test]
    fn clock_duration_is_zero_padded() {
        assert_eq!(format_clock_duration(Duration::seconds(3 * 3600 + 5 * 60 + 7)), "03:05:07");
        assert_eq!(format_clock_duration(Duration::hours(31)), "31:00:00");
        assert_eq!(format_clock_duration(Duration::seconds(-20)), "00:00:00");
    }

    #[test]
    fn hours_minutes_drops_empty_parts() {
        assert_eq!(format_hours_minutes(Duration::zero()), "0m");
        assert_eq!(format_hours_minutes(Duration::minutes(45)), "45m");
        assert_eq!(format_hours_minutes(Duration::hours(8)), "8h");
        assert_eq!(format_hours_minutes(Duration::minutes(8 * 60 + 30)), "8h 30m");
        assert_eq!(format_hours_minutes(Duration::seconds(59)), "0m");
    }
}

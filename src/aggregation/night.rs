use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use tracing::trace;

use crate::{session::entities::WorkSession, utils::time::resolve_local};

use super::{
    coverage::{session_days, CoveredDay},
    overlap::interval_overlap,
    HoursBreakdown,
};

/// Night ends at 06:00 and starts again at 22:00 local time.
const MORNING_NIGHT_END_HOURS: i64 = 6;
const EVENING_NIGHT_START_HOURS: i64 = 22;

fn wall_clock<Tz: TimeZone>(tz: &Tz, day: &CoveredDay<Tz>, hours: i64) -> DateTime<Tz> {
    resolve_local(tz, day.date.and_time(NaiveTime::MIN) + Duration::hours(hours))
}

/// Time of `session` falling into `[00:00, 06:00)` or `[22:00, 24:00)` of any local day, plus the
/// dates where it happened. A date is listed once even if both windows of that day are hit.
pub fn night_hours<Tz: TimeZone>(session: &WorkSession, tz: &Tz) -> HoursBreakdown {
    let mut breakdown = HoursBreakdown::default();
    let start = session.start_time.with_timezone(tz);
    let end = session.end_time.with_timezone(tz);

    for day in session_days(session, tz) {
        let morning_end = wall_clock(tz, &day, MORNING_NIGHT_END_HOURS);
        let evening_start = wall_clock(tz, &day, EVENING_NIGHT_START_HOURS);

        let morning = interval_overlap(&start, &end, &day.day_start, &morning_end);
        let evening = interval_overlap(&start, &end, &evening_start, &day.day_end);

        breakdown.add(day.date, morning);
        breakdown.add(day.date, evening);
    }

    trace!(
        "Session {} has {}s of night time",
        session.id,
        breakdown.duration.num_seconds()
    );
    breakdown
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};

    use crate::{
        aggregation::{
            coverage::session_days,
            overlap::interval_overlap,
            test_support::{at, session, tz, GapZone},
        },
        session::entities::WorkSession,
        utils::time::resolve_local,
    };

    use super::night_hours;

    fn daytime(s: &WorkSession) -> Duration {
        let tz = tz();
        session_days(s, &tz).fold(Duration::zero(), |ac, day| {
            let base = day.date.and_time(NaiveTime::MIN);
            let from = resolve_local(&tz, base + Duration::hours(6));
            let to = resolve_local(&tz, base + Duration::hours(22));
            ac + interval_overlap(&s.start_time, &s.end_time, &from, &to)
        })
    }

    #[test]
    fn office_hours_have_no_night_time() {
        let s = session(1, at(2024, 4, 1, 9, 0), at(2024, 4, 1, 17, 0));
        let night = night_hours(&s, &tz());
        assert_eq!(night.duration, Duration::zero());
        assert!(night.dates.is_empty());
    }

    #[test]
    fn midnight_crossing_counts_both_sides() {
        // Monday 23:00 to Tuesday 02:00
        let s = session(1, at(2024, 4, 1, 23, 0), at(2024, 4, 2, 2, 0));
        let night = night_hours(&s, &tz());
        assert_eq!(night.duration, Duration::hours(3));
        assert_eq!(
            night.dates.into_iter().collect::<Vec<_>>(),
            vec![
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
            ]
        );
    }

    #[test]
    fn both_windows_on_one_day_list_the_date_once() {
        let s = session(1, at(2024, 4, 1, 5, 0), at(2024, 4, 1, 23, 0));
        let night = night_hours(&s, &tz());
        assert_eq!(night.duration, Duration::hours(2));
        assert_eq!(night.dates.len(), 1);
    }

    #[test]
    fn early_shift_is_partially_nocturnal() {
        let s = session(1, at(2024, 4, 3, 4, 30), at(2024, 4, 3, 12, 0));
        assert_eq!(night_hours(&s, &tz()).duration, Duration::minutes(90));
    }

    #[test]
    fn window_edges_are_exclusive() {
        let s = session(1, at(2024, 4, 1, 6, 0), at(2024, 4, 1, 22, 0));
        let night = night_hours(&s, &tz());
        assert_eq!(night.duration, Duration::zero());
        assert!(night.dates.is_empty());
    }

    #[test]
    fn night_windows_survive_a_day_without_midnight() -> anyhow::Result<()> {
        // Saturday 22:00 (UTC+1) to Sunday 07:00 (UTC+2), local clocks skip 00:00 to 01:00
        let s = WorkSession::new(
            1,
            Utc.with_ymd_and_hms(2024, 4, 6, 21, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 7, 5, 0, 0).unwrap(),
        )?;
        assert_eq!(s.elapsed(), Duration::hours(8));

        let overlaps = session_days(&s, &GapZone)
            .map(|d| (d.date, d.overlap))
            .collect::<Vec<_>>();
        assert_eq!(
            overlaps,
            vec![
                (NaiveDate::from_ymd_opt(2024, 4, 6).unwrap(), Duration::hours(2)),
                (NaiveDate::from_ymd_opt(2024, 4, 7).unwrap(), Duration::hours(6)),
            ]
        );

        // 22:00 to the shifted midnight, then 01:00 to 06:00
        let night = night_hours(&s, &GapZone);
        assert_eq!(night.duration, Duration::hours(7));
        assert_eq!(night.dates.len(), 2);
        Ok(())
    }

    #[test]
    fn night_and_day_add_up_to_total() {
        let sessions = [
            session(1, at(2024, 4, 1, 9, 0), at(2024, 4, 1, 17, 0)),
            session(2, at(2024, 4, 1, 23, 0), at(2024, 4, 2, 2, 0)),
            session(3, at(2024, 4, 5, 20, 15), at(2024, 4, 8, 7, 45)),
            session(4, at(2024, 4, 6, 5, 59), at(2024, 4, 6, 6, 1)),
            session(5, at(2024, 4, 7, 21, 0), at(2024, 4, 7, 22, 30)),
        ];
        for s in sessions {
            assert_eq!(
                night_hours(&s, &tz()).duration + daytime(&s),
                s.elapsed(),
                "session {}",
                s.id
            );
        }
    }
}

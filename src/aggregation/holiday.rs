use chrono::{Datelike, Duration, NaiveDate, TimeZone, Weekday};

use crate::session::entities::WorkSession;

use super::{coverage::session_days, HoursBreakdown};

/// Only Sundays count as holidays. Public holidays of any locale are not taken into account.
pub fn is_holiday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Time of `session` falling on a local holiday, plus the holiday dates worked.
pub fn holiday_hours<Tz: TimeZone>(session: &WorkSession, tz: &Tz) -> HoursBreakdown {
    session_days(session, tz)
        .filter(|day| is_holiday(day.date) && day.overlap > Duration::zero())
        .fold(HoursBreakdown::default(), |mut breakdown, day| {
            breakdown.add(day.date, day.overlap);
            breakdown
        })
}

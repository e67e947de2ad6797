use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use tracing::{debug, instrument};

use crate::{
    session::entities::WorkSession,
    utils::time::{date_key, resolve_local, start_of_day},
};

use super::{break_adjusted, coverage::worked_days, total_elapsed};

/// Offset of the last representable millisecond of a day from its midnight.
const LAST_MILLISECOND: Duration = Duration::milliseconds(24 * 60 * 60 * 1000 - 1);

/// Sessions of a single Monday-to-Sunday week with their totals. Always derived from the
/// current session list, never stored.
#[derive(Debug, Clone)]
pub struct WeekData<Tz: TimeZone> {
    /// `YYYY-MM-DD` of the week's Monday.
    pub id: String,
    /// Monday 00:00:00.000
    pub start_date: DateTime<Tz>,
    /// Sunday 23:59:59.999
    pub end_date: DateTime<Tz>,
    pub sessions: Vec<WorkSession>,
    pub total_duration: Duration,
    pub total_duration_with_breaks: Duration,
}

/// Monday of the week containing `date`. Sundays belong to the week that started 6 days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Groups sessions by the local week in which they start. Weeks are returned newest first.
///
/// Breaks are deducted for every distinct day touched by the week's sessions. A session started on
/// Sunday night that runs into Monday belongs to the earlier week and both days count there.
#[instrument(skip_all, fields(sessions = sessions.len()))]
pub fn group_by_week<Tz: TimeZone>(sessions: &[WorkSession], tz: &Tz) -> Vec<WeekData<Tz>> {
    let mut grouped = BTreeMap::<NaiveDate, Vec<WorkSession>>::new();
    for session in sessions {
        let monday = week_start(session.start_time.with_timezone(tz).date_naive());
        grouped.entry(monday).or_default().push(session.clone());
    }

    debug!("Grouped sessions into {} weeks", grouped.len());

    grouped
        .into_iter()
        .rev()
        .map(|(monday, sessions)| build_week(monday, sessions, tz))
        .collect()
}

fn build_week<Tz: TimeZone>(
    monday: NaiveDate,
    sessions: Vec<WorkSession>,
    tz: &Tz,
) -> WeekData<Tz> {
    let sunday = monday + Duration::days(6);
    let total_duration = total_elapsed(&sessions);
    let days = worked_days(&sessions, tz).len();

    WeekData {
        id: date_key(monday),
        start_date: start_of_day(tz, monday),
        end_date: resolve_local(tz, sunday.and_time(NaiveTime::MIN) + LAST_MILLISECOND),
        total_duration_with_breaks: break_adjusted(total_duration, days),
        total_duration,
        sessions,
    }
}

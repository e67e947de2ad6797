use chrono::{Duration, NaiveDate, TimeZone};
use tracing::{debug, instrument};

use crate::session::entities::WorkSession;

use super::{
    break_adjusted, coverage::worked_days, holiday::holiday_hours, night::night_hours,
    total_elapsed, HoursBreakdown,
};

/// Totals over a whole session list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSummary {
    pub total_duration: Duration,
    pub total_duration_with_breaks: Duration,
    pub night_duration: Duration,
    pub holiday_duration: Duration,
    /// Distinct local dates with night time, ascending.
    pub nocturnal_dates: Vec<NaiveDate>,
    /// Distinct local holidays worked, ascending.
    pub holiday_dates: Vec<NaiveDate>,
    /// Distinct local dates with any worked time. Breaks are deducted per entry.
    pub worked_days: usize,
}

/// Folds every session into a single summary. Unlike [super::weekly::group_by_week] the break
/// deduction uses a single set of days for the whole list.
#[instrument(skip_all, fields(sessions = sessions.len()))]
pub fn summarize<Tz: TimeZone>(sessions: &[WorkSession], tz: &Tz) -> GlobalSummary {
    let mut night = HoursBreakdown::default();
    let mut holiday = HoursBreakdown::default();
    for session in sessions {
        night.merge(night_hours(session, tz));
        holiday.merge(holiday_hours(session, tz));
    }

    let total_duration = total_elapsed(sessions);
    let worked_days = worked_days(sessions, tz).len();

    debug!(
        "Summarized {}s over {worked_days} days",
        total_duration.num_seconds()
    );

    GlobalSummary {
        total_duration,
        total_duration_with_breaks: break_adjusted(total_duration, worked_days),
        night_duration: night.duration,
        holiday_duration: holiday.duration,
        nocturnal_dates: night.dates.into_iter().collect(),
        holiday_dates: holiday.dates.into_iter().collect(),
        worked_days,
    }
}

use std::{collections::BTreeSet, iter::FusedIterator};

use chrono::{DateTime, Duration, NaiveDate, TimeZone};

use crate::{session::entities::WorkSession, utils::time::start_of_day};

use super::overlap::interval_overlap;

/// A calendar day touched by an interval, together with how much of the interval falls on it.
#[derive(Debug, Clone)]
pub struct CoveredDay<Tz: TimeZone> {
    pub date: NaiveDate,
    /// Local midnight starting the day.
    pub day_start: DateTime<Tz>,
    /// Local midnight starting the next day.
    pub day_end: DateTime<Tz>,
    pub overlap: Duration,
}

/// Lazily walks the local calendar days that `[start, end)` touches. Starts at the midnight of the
/// start's day and stops once a day boundary reaches `end`.
///
/// The walker only holds its inputs, so a clone restarts the walk from wherever the original was.
#[derive(Debug, Clone)]
pub struct DayCoverage<Tz: TimeZone> {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    next_date: Option<NaiveDate>,
}

impl<Tz: TimeZone> DayCoverage<Tz> {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        let next_date = Some(start.date_naive());
        Self {
            start,
            end,
            next_date,
        }
    }
}

impl<Tz: TimeZone> Iterator for DayCoverage<Tz> {
    type Item = CoveredDay<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next_date?;
        let tz = self.start.timezone();
        let day_start = start_of_day(&tz, date);
        if day_start >= self.end {
            self.next_date = None;
            return None;
        }

        self.next_date = date.succ_opt();
        let day_end = match self.next_date {
            Some(next) => start_of_day(&tz, next),
            None => day_start.clone() + Duration::days(1),
        };
        let overlap = interval_overlap(&self.start, &self.end, &day_start, &day_end);

        Some(CoveredDay {
            date,
            day_start,
            day_end,
            overlap,
        })
    }
}

impl<Tz: TimeZone> FusedIterator for DayCoverage<Tz> {}

/// Walks the days of `session` as seen in `tz`.
pub fn session_days<Tz: TimeZone>(session: &WorkSession, tz: &Tz) -> DayCoverage<Tz> {
    DayCoverage::new(
        session.start_time.with_timezone(tz),
        session.end_time.with_timezone(tz),
    )
}

/// Distinct local dates on which any of `sessions` has worked time.
pub fn worked_days<'a, Tz: TimeZone>(
    sessions: impl IntoIterator<Item = &'a WorkSession>,
    tz: &Tz,
) -> BTreeSet<NaiveDate> {
    sessions
        .into_iter()
        .flat_map(|session| session_days(session, tz))
        .filter(|day| day.overlap > Duration::zero())
        .map(|day| day.date)
        .collect()
}

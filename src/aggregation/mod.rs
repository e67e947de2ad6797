//! The time aggregation engine. Everything here is a pure function of the sessions passed in and
//! of the timezone used to interpret them. Days, weeks, night and holiday time are local-calendar
//! concepts, so the timezone is always explicit. The cli passes [chrono::Local].
//!
//! Leaves first:
//!  - [overlap] measures the intersection of two intervals.
//!  - [coverage] walks every calendar day an interval touches.
//!  - [night] and [holiday] decompose a single session.
//!  - [weekly] and [summary] fold whole session lists.

pub mod coverage;
pub mod holiday;
pub mod night;
pub mod overlap;
pub mod summary;
pub mod weekly;

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::session::entities::WorkSession;

/// Flat break taken for every distinct day with worked time, regardless of how long that day was.
pub const BREAK_PER_DAY: Duration = Duration::seconds(30 * 60);

pub fn break_deduction(worked_days: usize) -> Duration {
    BREAK_PER_DAY * worked_days as i32
}

/// Total with breaks removed. Never negative.
pub fn break_adjusted(total: Duration, worked_days: usize) -> Duration {
    (total - break_deduction(worked_days)).max(Duration::zero())
}

/// Gross worked time. Durations are always recomputed from start and end.
pub fn total_elapsed<'a>(sessions: impl IntoIterator<Item = &'a WorkSession>) -> Duration {
    sessions
        .into_iter()
        .fold(Duration::zero(), |ac, next| ac + next.elapsed())
}

/// Portion of worked time matching some calendar rule together with the dates it happened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursBreakdown {
    pub duration: Duration,
    pub dates: BTreeSet<NaiveDate>,
}

impl Default for HoursBreakdown {
    fn default() -> Self {
        Self {
            duration: Duration::zero(),
            dates: BTreeSet::new(),
        }
    }
}

impl HoursBreakdown {
    /// Records `overlap` on `date`. Empty overlaps leave the date out.
    pub fn add(&mut self, date: NaiveDate, overlap: Duration) {
        if overlap > Duration::zero() {
            self.duration += overlap;
            self.dates.insert(date);
        }
    }

    pub fn merge(&mut self, other: HoursBreakdown) {
        self.duration += other.duration;
        self.dates.extend(other.dates);
    }
}

use chrono::{Duration, TimeZone};

use crate::aggregation::{holiday::holiday_hours, night::night_hours};

use super::entities::WorkSession;

const NIGHT_WORDS: [&str; 2] = ["night", "nocturnal"];
const HOLIDAY_WORDS: [&str; 2] = ["holiday", "sunday"];

/// Free text search over sessions. Every keyword must match either the session's start date
/// ("monday 1 april 2024" or "2024-04-01"), or a night/holiday word when the session actually has
/// night/holiday time. This way "sunday night" finds night shifts worked on a Sunday.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    keywords: Vec<String>,
}

impl SessionFilter {
    pub fn new(query: &str) -> Self {
        Self {
            keywords: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn matches<Tz: TimeZone>(&self, session: &WorkSession, tz: &Tz) -> bool {
        if self.is_empty() {
            return true;
        }

        let start_date = session.start_time.with_timezone(tz).date_naive();
        let long_date = start_date.format("%A %-d %B %Y").to_string().to_lowercase();
        let short_date = start_date.format("%Y-%m-%d").to_string();
        let has_night = night_hours(session, tz).duration > Duration::zero();
        let has_holiday = holiday_hours(session, tz).duration > Duration::zero();

        self.keywords.iter().all(|keyword| {
            let keyword = keyword.as_str();
            long_date.contains(keyword)
                || short_date.contains(keyword)
                || (has_night && NIGHT_WORDS.iter().any(|w| w.contains(keyword)))
                || (has_holiday && HOLIDAY_WORDS.iter().any(|w| w.contains(keyword)))
        })
    }

    /// Matching sessions in their original order.
    pub fn apply<Tz: TimeZone>(&self, sessions: &[WorkSession], tz: &Tz) -> Vec<WorkSession> {
        sessions
            .iter()
            .filter(|session| self.matches(session, tz))
            .cloned()
            .collect()
    }
}

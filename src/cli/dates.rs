use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};
use now::DateTimeNow;

use crate::{
    session::{entities::WorkSession, filter::SessionFilter},
    utils::time::next_day_start,
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

fn validation_error(message: String) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, message)
        .into()
}

/// True for inputs like "12:00 16/03/2025". The parser reads the time and silently drops the
/// rest, so the date has to come first.
fn time_before_date(value: &str) -> bool {
    let mut words = value.split_whitespace();
    let is_clock = words
        .next()
        .and_then(|w| w.split_once(':'))
        .is_some_and(|(h, m)| {
            !h.is_empty()
                && h.chars().all(|c| c.is_ascii_digit())
                && m.chars().all(|c| c.is_ascii_digit())
        });
    is_clock && words.any(|w| !matches!(w.to_lowercase().as_str(), "am" | "pm"))
}

/// Parses human dates like "9:00", "yesterday 22:00" or "16/03/2025 12:00" relative to `now`.
pub fn parse_moment(value: &str, style: DateStyle, now: DateTime<Local>) -> Result<DateTime<Local>> {
    if time_before_date(value) {
        return Err(validation_error(format!(
            "Failed to validate date {value:?}: put the date before the time, e.g. \"16/03/2025 12:00\""
        )));
    }
    parse_date_string(value, now, style.into())
        .map(|v| v.with_timezone(&Local))
        .map_err(|e| validation_error(format!("Failed to validate date {value:?}: {e}")))
}

pub fn parse_optional_moment(
    value: Option<&str>,
    style: DateStyle,
    now: DateTime<Local>,
) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|v| parse_moment(v, style, now).map(|v| v.to_utc()))
        .transpose()
}

#[derive(Debug, Clone, clap::Args)]
pub struct SelectionArgs {
    #[arg(
        short,
        long,
        help = "Only sessions matching every word. Matches dates (\"monday\", \"april\", \"2024-04-01\"), \"night\" and \"holiday\""
    )]
    search: Option<String>,
    #[arg(
        long,
        help = "Only sessions starting at or after this date. Examples are \"yesterday\", \"15/03/2025\", \"16/03/2025 12:00\""
    )]
    from: Option<String>,
    #[arg(long, help = "Only sessions starting before this date")]
    to: Option<String>,
    #[arg(
        long = "days",
        default_value_t = false,
        help = "Take --from and --to as whole days. For example if both are 15/03/2025 this option selects the whole day"
    )]
    treat_as_days: bool,
}

/// Which sessions a report looks at.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub filter: SessionFilter,
    pub from: Option<DateTime<Local>>,
    pub to: Option<DateTime<Local>>,
}

impl SelectionArgs {
    pub fn resolve(&self, style: DateStyle, now: DateTime<Local>) -> Result<Selection> {
        let mut from = self
            .from
            .as_deref()
            .map(|v| parse_moment(v, style, now))
            .transpose()?;
        let mut to = self
            .to
            .as_deref()
            .map(|v| parse_moment(v, style, now))
            .transpose()?;
        if self.treat_as_days {
            from = from.map(|v| v.beginning_of_day());
            to = to.map(next_day_start);
        }

        Ok(Selection {
            filter: SessionFilter::new(self.search.as_deref().unwrap_or_default()),
            from,
            to,
        })
    }
}

impl Selection {
    /// Sessions starting in `[from, to)` that match the search, in their original order.
    pub fn select(&self, sessions: &[WorkSession]) -> Vec<WorkSession> {
        let in_range = sessions
            .iter()
            .filter(|s| self.from.map_or(true, |from| s.start_time >= from.to_utc()))
            .filter(|s| self.to.map_or(true, |to| s.start_time < to.to_utc()))
            .cloned()
            .collect::<Vec<_>>();
        self.filter.apply(&in_range, &Local)
    }
}

use anyhow::{ensure, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::format_clock_duration;

/// A closed interval of worked time. This is also the shape used on disk and in exported
/// documents, where timestamps are ISO-8601 strings.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    /// Creation time in epoch milliseconds. Survives edits.
    pub id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// `HH:MM:SS` for display only. Aggregation always works from `start_time` and `end_time`.
    #[serde(default)]
    pub duration: String,
}

impl WorkSession {
    pub fn new(id: i64, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self> {
        ensure!(
            end_time > start_time,
            "Session end {end_time} must be after its start {start_time}"
        );
        Ok(Self {
            id,
            start_time,
            end_time,
            duration: format_clock_duration(end_time - start_time),
        })
    }

    /// Worked time. Sessions that somehow end before they start count as zero.
    pub fn elapsed(&self) -> Duration {
        (self.end_time - self.start_time).max(Duration::zero())
    }

    pub fn is_valid(&self) -> bool {
        self.end_time > self.start_time
    }

    /// Replaces both ends of the session keeping its id.
    pub fn with_times(self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self> {
        Self::new(self.id, start_time, end_time)
    }
}

/// A session that was clocked in but not yet out.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub id: i64,
    pub start_time: DateTime<Utc>,
}

impl ActiveSession {
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).max(Duration::zero())
    }

    /// Turns the active session into a [WorkSession] ending at `end_time`.
    pub fn close(self, end_time: DateTime<Utc>) -> Result<WorkSession> {
        WorkSession::new(self.id, self.start_time, end_time)
    }
}

/// Backup document exchanged by `export` and `import`.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub work_sessions: Vec<WorkSession>,
    #[serde(default)]
    pub active_session: Option<ActiveSession>,
}

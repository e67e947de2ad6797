use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use futures::try_join;
use tracing::{info, instrument};

use crate::{storage::session_storage::SessionStorage, utils::clock::Clock};

use super::entities::{ActiveSession, ExportDocument, WorkSession};

/// Owns the session lifecycle: nothing active → active → closed into a [WorkSession].
///
/// Storage is loaded at the start of every operation and saved after every mutation, the tracker
/// keeps no state of its own.
pub struct Tracker {
    storage: Box<dyn SessionStorage>,
    clock: Box<dyn Clock>,
}

impl Tracker {
    pub fn new(storage: Box<dyn SessionStorage>, clock: Box<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    /// Starts a session at `at` (now by default). Only one session may be active.
    #[instrument(skip(self))]
    pub async fn clock_in(&self, at: Option<DateTime<Utc>>) -> Result<ActiveSession> {
        if let Some(active) = self.storage.load_active().await? {
            bail!(
                "Already clocked in since {}. Clock out first",
                active.start_time
            );
        }

        let now = self.clock.time();
        let active = ActiveSession {
            id: now.timestamp_millis(),
            start_time: at.unwrap_or(now),
        };
        self.storage.save_active(Some(active.clone())).await?;
        info!("Clocked in {:?}", active);
        Ok(active)
    }

    /// Closes the active session at `at` (now by default) and stores it.
    #[instrument(skip(self))]
    pub async fn clock_out(&self, at: Option<DateTime<Utc>>) -> Result<WorkSession> {
        let (active, mut sessions) =
            try_join!(self.storage.load_active(), self.storage.load_sessions())?;
        let Some(active) = active else {
            bail!("Not clocked in");
        };

        let session = active.close(at.unwrap_or_else(|| self.clock.time()))?;
        // a previous clock out may have stored the session without clearing the active slot
        sessions.retain(|s| s.id != session.id);
        sessions.push(session.clone());
        sort_newest_first(&mut sessions);

        self.storage.save_sessions(sessions).await?;
        self.storage.save_active(None).await?;
        info!("Clocked out {:?}", session);
        Ok(session)
    }

    /// Replaces the start and end of a stored session. The id stays the same.
    #[instrument(skip(self))]
    pub async fn edit(
        &self,
        id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<WorkSession> {
        let mut sessions = self.storage.load_sessions().await?;
        let Some(position) = sessions.iter().position(|s| s.id == id) else {
            bail!("No session with id {id}");
        };

        let edited = sessions[position].clone().with_times(start_time, end_time)?;
        sessions[position] = edited.clone();
        sort_newest_first(&mut sessions);

        self.storage.save_sessions(sessions).await?;
        info!("Edited {:?}", edited);
        Ok(edited)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<WorkSession> {
        let mut sessions = self.storage.load_sessions().await?;
        let Some(position) = sessions.iter().position(|s| s.id == id) else {
            bail!("No session with id {id}");
        };

        let removed = sessions.remove(position);
        self.storage.save_sessions(sessions).await?;
        info!("Deleted {:?}", removed);
        Ok(removed)
    }

    pub async fn status(&self) -> Result<Option<ActiveSession>> {
        self.storage.load_active().await
    }

    /// Stored sessions, newest first.
    pub async fn sessions(&self) -> Result<Vec<WorkSession>> {
        let mut sessions = self.storage.load_sessions().await?;
        sort_newest_first(&mut sessions);
        Ok(sessions)
    }

    pub async fn export(&self) -> Result<ExportDocument> {
        let (mut work_sessions, active_session) =
            try_join!(self.storage.load_sessions(), self.storage.load_active())?;
        sort_newest_first(&mut work_sessions);
        Ok(ExportDocument {
            work_sessions,
            active_session,
        })
    }

    /// Overwrites everything stored with the contents of `document`. Display durations are
    /// recomputed from the session times.
    #[instrument(skip_all, fields(sessions = document.work_sessions.len()))]
    pub async fn import(&self, document: ExportDocument) -> Result<()> {
        let ExportDocument {
            work_sessions,
            active_session,
        } = document;
        let mut work_sessions = work_sessions
            .into_iter()
            .map(|s| {
                WorkSession::new(s.id, s.start_time, s.end_time)
                    .with_context(|| format!("Session {} can't be imported", s.id))
            })
            .collect::<Result<Vec<_>>>()?;
        sort_newest_first(&mut work_sessions);

        try_join!(
            self.storage.save_sessions(work_sessions),
            self.storage.save_active(active_session)
        )?;
        info!("Imported sessions");
        Ok(())
    }
}

pub fn sort_newest_first(sessions: &mut [WorkSession]) {
    sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
}

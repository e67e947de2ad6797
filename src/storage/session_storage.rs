use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    fs::operations::{read_locked, remove_if_exists, write_locked},
    session::entities::{ActiveSession, WorkSession},
};

pub const SESSIONS_SLOT: &str = "workSessions.json";
pub const ACTIVE_SESSION_SLOT: &str = "activeSession.json";

/// Interface for abstracting storage of sessions. Storage is a flat blob with 2 slots, it doesn't
/// know anything about the meaning of sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStorage {
    async fn load_sessions(&self) -> Result<Vec<WorkSession>>;

    /// Replaces all stored sessions.
    async fn save_sessions(&self, sessions: Vec<WorkSession>) -> Result<()>;

    async fn load_active(&self) -> Result<Option<ActiveSession>>;

    /// Replaces the active session. `None` clears the slot.
    async fn save_active(&self, active: Option<ActiveSession>) -> Result<()>;
}

/// The main realization of [SessionStorage].
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn sessions_path(&self) -> PathBuf {
        self.dir.join(SESSIONS_SLOT)
    }

    fn active_path(&self) -> PathBuf {
        self.dir.join(ACTIVE_SESSION_SLOT)
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load_sessions(&self) -> Result<Vec<WorkSession>> {
        let path = self.sessions_path();
        let Some(raw) = read_locked(&path).await? else {
            return Ok(vec![]);
        };
        if raw.trim().is_empty() {
            return Ok(vec![]);
        }

        let sessions = serde_json::from_str::<Vec<WorkSession>>(&raw)
            .with_context(|| format!("Failed to parse sessions stored in {path:?}"))?;

        let (valid, invalid): (Vec<_>, Vec<_>) =
            sessions.into_iter().partition(WorkSession::is_valid);
        for session in invalid {
            // ignore illegal values. Only possible if the file was edited by hand
            warn!(
                "Skipping session {} in {:?}: end {} is not after start {}",
                session.id, path, session.end_time, session.start_time
            );
        }

        debug!("Loaded {} sessions", valid.len());
        Ok(valid)
    }

    async fn save_sessions(&self, sessions: Vec<WorkSession>) -> Result<()> {
        let buffer = serde_json::to_vec(&sessions)?;
        write_locked(&self.sessions_path(), &buffer).await?;
        debug!("Saved {} sessions", sessions.len());
        Ok(())
    }

    async fn load_active(&self) -> Result<Option<ActiveSession>> {
        let path = self.active_path();
        match read_locked(&path).await? {
            Some(raw) if !raw.trim().is_empty() => {
                let active = serde_json::from_str::<ActiveSession>(&raw)
                    .with_context(|| format!("Failed to parse active session in {path:?}"))?;
                Ok(Some(active))
            }
            Some(_) | None => Ok(None),
        }
    }

    async fn save_active(&self, active: Option<ActiveSession>) -> Result<()> {
        let path = self.active_path();
        match active {
            Some(active) => {
                let buffer = serde_json::to_vec(&active)?;
                write_locked(&path, &buffer).await?;
            }
            None => remove_if_exists(&path).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        fs::operations::write_locked,
        session::entities::{ActiveSession, WorkSession},
        utils::logging::TEST_LOGGING,
    };

    use super::{FileSessionStorage, SessionStorage, ACTIVE_SESSION_SLOT, SESSIONS_SLOT};

    fn test_sessions() -> Vec<WorkSession> {
        let start = Utc.with_ymd_and_hms(2018, 7, 4, 9, 0, 0).unwrap();
        vec![
            WorkSession::new(2, start + Duration::days(1), start + Duration::days(1) + Duration::hours(8))
                .unwrap(),
            WorkSession::new(1, start, start + Duration::hours(7)).unwrap(),
        ]
    }

    #[tokio::test]
    async fn empty_directory_has_no_data() -> Result<()> {
        let dir = tempdir()?;
        let storage = FileSessionStorage::new(dir.path().to_owned())?;
        assert!(storage.load_sessions().await?.is_empty());
        assert_eq!(storage.load_active().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn sessions_survive_a_new_storage_instance() -> Result<()> {
        let dir = tempdir()?;
        let storage = FileSessionStorage::new(dir.path().to_owned())?;
        storage.save_sessions(test_sessions()).await?;

        let reopened = FileSessionStorage::new(dir.path().to_owned())?;
        assert_eq!(reopened.load_sessions().await?, test_sessions());
        assert!(dir.path().join(SESSIONS_SLOT).exists());
        Ok(())
    }

    #[tokio::test]
    async fn active_session_slot_can_be_cleared() -> Result<()> {
        let dir = tempdir()?;
        let storage = FileSessionStorage::new(dir.path().to_owned())?;
        let active = ActiveSession {
            id: 10,
            start_time: Utc.with_ymd_and_hms(2018, 7, 4, 9, 0, 0).unwrap(),
        };
        storage.save_active(Some(active.clone())).await?;
        assert_eq!(storage.load_active().await?, Some(active));

        storage.save_active(None).await?;
        assert_eq!(storage.load_active().await?, None);
        assert!(!dir.path().join(ACTIVE_SESSION_SLOT).exists());
        Ok(())
    }

    #[tokio::test]
    async fn invalid_sessions_are_skipped() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let raw = r#"[
            {"id": 1, "startTime": "2018-07-04T09:00:00Z", "endTime": "2018-07-04T17:00:00Z", "duration": "08:00:00"},
            {"id": 2, "startTime": "2018-07-05T09:00:00Z", "endTime": "2018-07-05T08:00:00Z", "duration": "00:00:00"}
        ]"#;
        write_locked(&dir.path().join(SESSIONS_SLOT), raw.as_bytes()).await?;

        let storage = FileSessionStorage::new(dir.path().to_owned())?;
        let sessions = storage.load_sessions().await?;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, 1);
        Ok(())
    }

    #[tokio::test]
    async fn corrupted_sessions_are_an_error() -> Result<()> {
        let dir = tempdir()?;
        write_locked(&dir.path().join(SESSIONS_SLOT), b"[{\"id\": ").await?;
        let storage = FileSessionStorage::new(dir.path().to_owned())?;
        assert!(storage.load_sessions().await.is_err());
        Ok(())
    }
}

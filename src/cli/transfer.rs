use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;

use crate::{
    fs::operations::{read_locked, write_locked},
    session::{entities::ExportDocument, tracker::Tracker},
};

/// Writing to this path prints the document instead.
const STDOUT_PATH: &str = "-";

/// For example `punchclock-Oct-19.json`.
pub fn default_export_name(now: DateTime<Local>) -> String {
    format!("{}-{}.json", env!("CARGO_PKG_NAME"), now.format("%b-%-d"))
}

/// Writes every stored session plus the active one as pretty printed JSON. Returns where the
/// document went.
pub async fn export_to(
    tracker: &Tracker,
    output: Option<PathBuf>,
    now: DateTime<Local>,
) -> Result<Option<PathBuf>> {
    let document = tracker.export().await?;
    let json = serde_json::to_string_pretty(&document)?;

    let path = output.unwrap_or_else(|| PathBuf::from(default_export_name(now)));
    if path == Path::new(STDOUT_PATH) {
        println!("{json}");
        return Ok(None);
    }

    write_locked(&path, json.as_bytes())
        .await
        .with_context(|| format!("Failed to write backup to {path:?}"))?;
    info!(
        "Exported {} sessions to {path:?}",
        document.work_sessions.len()
    );
    Ok(Some(path))
}

/// Replaces all stored data with a previously exported document.
pub async fn import_from(tracker: &Tracker, path: &Path) -> Result<usize> {
    let raw = read_locked(path)
        .await
        .with_context(|| format!("Failed to read {path:?}"))?
        .with_context(|| format!("{path:?} doesn't exist"))?;
    let document = serde_json::from_str::<ExportDocument>(&raw)
        .with_context(|| format!("{path:?} is not a valid backup"))?;
    let imported = document.work_sessions.len();
    tracker.import(document).await?;
    Ok(imported)
}

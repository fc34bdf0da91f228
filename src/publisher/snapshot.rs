//! Snapshot mode: persist the latest record to a JSON file for static builds.

use log::{error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{error::Result, youtube::VideoSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// New content was written.
    Written,
    /// Fetched record serialized byte-identical to the file.
    Unchanged,
    /// Fetch failed; the old snapshot was left alone.
    Aborted,
}

pub struct SnapshotPublisher {
    source: Arc<dyn VideoSource>,
    path: PathBuf,
}

impl SnapshotPublisher {
    pub fn new(source: Arc<dyn VideoSource>, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One update run. Only IO errors on the snapshot file are returned as `Err`.
    pub async fn run(&self) -> Result<SnapshotOutcome> {
        info!("Updating video data at {} ...", self.path.display());

        let old = read_existing(&self.path).await?;
        match &old {
            Some(contents) => info!("Old video data: {}", String::from_utf8_lossy(contents)),
            None => info!("No previous video data at {}", self.path.display()),
        }

        info!("Fetching latest video data ...");
        let record = match self.source.fetch_latest().await {
            Ok(record) => record,
            Err(e) => {
                error!("No video data ({}), aborting update", e);
                return Ok(SnapshotOutcome::Aborted);
            }
        };

        let data = serde_json::to_string(&record)?;
        if old.as_deref() == Some(data.as_bytes()) {
            info!("Video data is up to date");
            return Ok(SnapshotOutcome::Unchanged);
        }

        info!("Video data: {}", data);
        write_atomic(&self.path, &data).await?;
        info!("Video data updated");
        Ok(SnapshotOutcome::Written)
    }
}

/// Raw bytes, so a corrupt or non-UTF-8 file still gets replaced.
async fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes to a sibling temp file then renames over the target.
async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));
    tokio::fs::write(&tmp, contents).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

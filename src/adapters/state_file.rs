use crate::core::{StateStore, StatusMap, StatusRecord};
use crate::domain::model::Availability;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON file mapping url -> last-known status.
///
/// Values written by older versions of the monitor were bare status strings;
/// those still load (with an epoch timestamp). A missing or unreadable file
/// loads as empty so a wiped state never blocks a sweep.
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredStatus {
    Full(StatusRecord),
    Bare(Availability),
}

impl From<StoredStatus> for StatusRecord {
    fn from(stored: StoredStatus) -> Self {
        match stored {
            StoredStatus::Full(record) => record,
            StoredStatus::Bare(status) => StatusRecord {
                status,
                checked_at: DateTime::<Utc>::UNIX_EPOCH,
            },
        }
    }
}

impl JsonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl StateStore for JsonStateFile {
    async fn load(&self) -> Result<StatusMap> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StatusMap::new()),
            Err(e) => return Err(e.into()),
        };

        let parsed: HashMap<String, StoredStatus> = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    "State file {} is unreadable ({}), starting fresh",
                    self.path.display(),
                    e
                );
                return Ok(StatusMap::new());
            }
        };

        Ok(parsed
            .into_iter()
            .map(|(url, stored)| (url, stored.into()))
            .collect())
    }

    async fn save(&self, state: &StatusMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename keeps a crashed run from truncating the file.
        let tmp = self.tmp_path();
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

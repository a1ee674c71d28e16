//! Refresh bookkeeping.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::StorageError;
use crate::models::SnapshotId;

/// When each local document was last refreshed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tw_logs_last_refresh: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_roster_last_refresh: Option<DateTime<Utc>>,

    /// Fingerprint of the stored log document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tw_logs_snapshot: Option<SnapshotId>,
}

impl RefreshMetadata {
    /// Read metadata, or an empty record if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!("Saved refresh metadata to {:?}", path);
        Ok(())
    }

    pub fn mark_tw_logs(&mut self, snapshot: SnapshotId, at: DateTime<Utc>) {
        self.tw_logs_last_refresh = Some(at);
        self.tw_logs_snapshot = Some(snapshot);
    }

    pub fn mark_guild_roster(&mut self, at: DateTime<Utc>) {
        self.guild_roster_last_refresh = Some(at);
    }
}

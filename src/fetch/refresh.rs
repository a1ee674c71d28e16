//! Refreshing the local copies of upstream documents.

use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use super::{check_upstream_code, FetchError, LogSource};
use crate::models::SnapshotId;
use crate::storage::{
    load_guild_members, load_log_document, write_document, RefreshMetadata, StorageConfig,
};

/// What a refresh wrote.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub path: PathBuf,
    /// Events for a log refresh, members for a roster refresh
    pub count: usize,
    pub snapshot: Option<SnapshotId>,
}

/// Fetch the TW log document and store it under the data directory.
pub async fn refresh_tw_logs(
    source: &dyn LogSource,
    storage: &StorageConfig,
    ally_code: &str,
) -> Result<RefreshOutcome, FetchError> {
    let document = source.tw_logs(ally_code).await?;
    check_upstream_code(&document)?;

    let path = storage.tw_logs_path();
    write_document(&path, &document)?;
    let loaded = load_log_document(&path)?;

    let metadata_path = storage.metadata_path();
    let mut metadata = RefreshMetadata::load(&metadata_path)?;
    metadata.mark_tw_logs(loaded.snapshot.clone(), Utc::now());
    metadata.save(&metadata_path)?;

    info!(
        "Refreshed TW logs: {} events, snapshot {}",
        loaded.events.len(),
        loaded.snapshot
    );
    Ok(RefreshOutcome {
        path,
        count: loaded.events.len(),
        snapshot: Some(loaded.snapshot),
    })
}

/// Fetch the guild document and store it under the data directory.
pub async fn refresh_roster(
    source: &dyn LogSource,
    storage: &StorageConfig,
    guild_id: &str,
) -> Result<RefreshOutcome, FetchError> {
    let document = source.guild(guild_id).await?;
    check_upstream_code(&document)?;

    let path = storage.guild_data_path();
    write_document(&path, &document)?;
    let members = load_guild_members(&path)?;

    let metadata_path = storage.metadata_path();
    let mut metadata = RefreshMetadata::load(&metadata_path)?;
    metadata.mark_guild_roster(Utc::now());
    metadata.save(&metadata_path)?;

    info!("Refreshed guild roster: {} members", members.len());
    Ok(RefreshOutcome {
        path,
        count: members.len(),
        snapshot: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    struct StaticSource {
        logs: Value,
        guild: Value,
    }

    #[async_trait]
    impl LogSource for StaticSource {
        async fn tw_logs(&self, _ally_code: &str) -> Result<Value, FetchError> {
            Ok(self.logs.clone())
        }

        async fn guild(&self, _guild_id: &str) -> Result<Value, FetchError> {
            Ok(self.guild.clone())
        }
    }

    fn source() -> StaticSource {
        StaticSource {
            logs: json!({"data": [{"info": {"authorName": "Alice"}}, {}]}),
            guild: json!({"events": [{"guild": {"member": [
                {"playerName": "Alice"}, {"playerName": "Bob"}
            ]}}]}),
        }
    }

    #[test]
    fn test_refresh_tw_logs_writes_document_and_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageConfig::new(temp_dir.path().to_path_buf());

        let outcome =
            tokio_test::block_on(refresh_tw_logs(&source(), &storage, "123456789")).unwrap();
        assert_eq!(outcome.count, 2);
        assert!(storage.tw_logs_path().exists());

        let metadata = RefreshMetadata::load(&storage.metadata_path()).unwrap();
        assert!(metadata.tw_logs_last_refresh.is_some());
        assert_eq!(metadata.tw_logs_snapshot, outcome.snapshot);
        assert!(metadata.guild_roster_last_refresh.is_none());
    }

    #[tokio::test]
    async fn test_refresh_roster_keeps_log_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageConfig::new(temp_dir.path().to_path_buf());

        refresh_tw_logs(&source(), &storage, "123456789")
            .await
            .unwrap();
        let outcome = refresh_roster(&source(), &storage, "G1").await.unwrap();
        assert_eq!(outcome.count, 2);

        let metadata = RefreshMetadata::load(&storage.metadata_path()).unwrap();
        assert!(metadata.tw_logs_last_refresh.is_some());
        assert!(metadata.guild_roster_last_refresh.is_some());
    }

    #[tokio::test]
    async fn test_refresh_rejects_error_body() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageConfig::new(temp_dir.path().to_path_buf());
        let failing = StaticSource {
            logs: json!({"code": 403, "message": "forbidden"}),
            guild: json!({}),
        };

        let result = refresh_tw_logs(&failing, &storage, "123456789").await;
        assert!(matches!(result, Err(FetchError::Upstream { code: 403, .. })));
        assert!(!storage.tw_logs_path().exists());
    }
}

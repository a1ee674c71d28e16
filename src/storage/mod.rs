//! Local data directory operations.
//!
//! Handles reading and writing the files the analyzer works from:
//! - TW log documents (`tw_logs.json`)
//! - Guild membership documents (`guild_data.json`)
//! - Refresh metadata (`metadata.json`)

mod documents;
mod metadata;

pub use documents::*;
pub use metadata::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tw_logs_path(&self) -> PathBuf {
        self.data_dir.join("tw_logs.json")
    }

    pub fn guild_data_path(&self) -> PathBuf {
        self.data_dir.join("guild_data.json")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join("metadata.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.tw_logs_path(), PathBuf::from("/data/tw_logs.json"));
        assert_eq!(
            config.guild_data_path(),
            PathBuf::from("/data/guild_data.json")
        );
        assert_eq!(config.metadata_path(), PathBuf::from("/data/metadata.json"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}

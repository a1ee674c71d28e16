//! Source document loading.
//!
//! Log and guild documents are stored exactly as the upstream API returned
//! them. Capture tools sometimes prepend a text banner, so everything before
//! the first `{` is ignored when reading.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::StorageError;
use crate::models::{GuildMember, RawEvent, SnapshotId};

/// A parsed TW log document.
#[derive(Debug, Clone)]
pub struct LogDocument {
    pub events: Vec<RawEvent>,
    pub snapshot: SnapshotId,
}

/// Drop any text before the JSON body.
pub fn strip_header(text: &str) -> &str {
    match text.find('{') {
        Some(start) => &text[start..],
        None => text,
    }
}

/// The event array of a log document: `data` if present, else `events`.
pub fn event_list(document: &Value) -> &[Value] {
    document
        .get("data")
        .or_else(|| document.get("events"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Parse a TW log document from text.
pub fn parse_log_document(text: &str) -> Result<LogDocument, StorageError> {
    let body = strip_header(text);
    let document: Value = serde_json::from_str(body)?;
    let events: Vec<RawEvent> = event_list(&document)
        .iter()
        .map(RawEvent::from_value)
        .collect();

    Ok(LogDocument {
        events,
        snapshot: SnapshotId::from_bytes(body.as_bytes()),
    })
}

/// Load a TW log document from disk.
pub fn load_log_document(path: &Path) -> Result<LogDocument, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    let document = parse_log_document(&text)?;
    info!(
        "Loaded {} events from {:?} (snapshot {})",
        document.events.len(),
        path,
        document.snapshot
    );
    Ok(document)
}

/// Parse the member list out of a guild document.
///
/// `events` may be a single object or an array whose first element is used.
/// A non-zero `code` field means the upstream API returned an error body.
pub fn parse_guild_document(text: &str) -> Result<Vec<GuildMember>, StorageError> {
    let document: Value = serde_json::from_str(strip_header(text))?;

    if let Some(code) = document.get("code").and_then(Value::as_i64) {
        if code != 0 {
            let message = document
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message");
            return Err(StorageError::InvalidDocument(format!(
                "upstream error code {}: {}",
                code, message
            )));
        }
    }

    let event = match document.get("events") {
        Some(Value::Array(items)) => items.first(),
        other => other,
    };
    let Some(event) = event else {
        warn!("Guild document has no events");
        return Ok(Vec::new());
    };

    let members: Vec<GuildMember> = event
        .pointer("/guild/member")
        .and_then(Value::as_array)
        .map(|members| members.iter().map(GuildMember::from_value).collect())
        .unwrap_or_default();

    debug!("Guild document lists {} members", members.len());
    Ok(members)
}

/// Load guild members from disk.
pub fn load_guild_members(path: &Path) -> Result<Vec<GuildMember>, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let members = parse_guild_document(&fs::read_to_string(path)?)?;
    info!("Loaded {} guild members from {:?}", members.len(), path);
    Ok(members)
}

/// Ordered, non-empty player names.
pub fn roster_names(members: &[GuildMember]) -> Vec<String> {
    members
        .iter()
        .filter(|m| !m.player_name.is_empty())
        .map(|m| m.player_name.clone())
        .collect()
}

/// Write a fetched document unchanged, pretty-printed.
pub fn write_document(path: &Path, document: &Value) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, serde_json::to_string_pretty(document)?)?;
    debug!("Wrote document to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_strip_header() {
        assert_eq!(strip_header("Captured 2024-01-01\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_header("{}"), "{}");
        assert_eq!(strip_header("no json"), "no json");
    }

    #[test]
    fn test_event_list_prefers_data() {
        let doc = json!({"data": [{}], "events": [{}, {}]});
        assert_eq!(event_list(&doc).len(), 1);

        let doc = json!({"data": [], "events": [{}, {}]});
        assert!(event_list(&doc).is_empty());

        let doc = json!({"events": [{}, {}]});
        assert_eq!(event_list(&doc).len(), 2);

        let doc = json!({"data": "oops"});
        assert!(event_list(&doc).is_empty());
    }

    #[test]
    fn test_parse_log_document_with_header() {
        let text = "TW export\n{\"data\": [{\"info\": {\"authorName\": \"Alice\"}}, 7]}";
        let document = parse_log_document(text).unwrap();

        assert_eq!(document.events.len(), 2);
        assert_eq!(document.events[0].info.author_name, "Alice");
        assert_eq!(document.events[1], RawEvent::default());
        assert_eq!(document.snapshot.as_str().len(), 16);
    }

    #[test]
    fn test_snapshot_ignores_header() {
        let a = parse_log_document("{\"data\": []}").unwrap();
        let b = parse_log_document("banner\n{\"data\": []}").unwrap();
        assert_eq!(a.snapshot, b.snapshot);
    }

    #[test]
    fn test_parse_log_document_invalid_json() {
        let result = parse_log_document("{\"data\": [");
        assert!(matches!(result, Err(StorageError::Json(_))));
    }

    #[test]
    fn test_load_log_document_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_log_document(&temp_dir.path().join("tw_logs.json"));
        assert!(matches!(result, Err(StorageError::PathNotFound(_))));
    }

    #[test]
    fn test_parse_guild_document_shapes() {
        let as_array = json!({
            "events": [{"guild": {"member": [
                {"playerId": "1", "playerName": "Alice", "galacticPower": 9000000},
                {"playerId": "2", "playerName": ""},
                {"playerId": "3", "playerName": "Bob"}
            ]}}]
        });
        let members = parse_guild_document(&as_array.to_string()).unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(roster_names(&members), vec!["Alice", "Bob"]);

        let as_object = json!({
            "code": 0,
            "events": {"guild": {"member": [{"playerName": "Carol"}]}}
        });
        let members = parse_guild_document(&as_object.to_string()).unwrap();
        assert_eq!(roster_names(&members), vec!["Carol"]);

        let empty = parse_guild_document("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_guild_document_error_code() {
        let doc = json!({"code": 401, "message": "Unauthorized"});
        let result = parse_guild_document(&doc.to_string());
        assert!(matches!(result, Err(StorageError::InvalidDocument(_))));
    }

    #[test]
    fn test_write_and_load_documents() {
        let temp_dir = TempDir::new().unwrap();
        let logs = temp_dir.path().join("nested").join("tw_logs.json");
        let guild = temp_dir.path().join("guild_data.json");

        write_document(&logs, &json!({"data": [{}, {}]})).unwrap();
        write_document(
            &guild,
            &json!({"events": [{"guild": {"member": [{"playerName": "Alice"}]}}]}),
        )
        .unwrap();

        assert_eq!(load_log_document(&logs).unwrap().events.len(), 2);
        assert_eq!(load_guild_members(&guild).unwrap()[0].player_name, "Alice");
    }
}

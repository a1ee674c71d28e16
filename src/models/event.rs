//! Raw battle-log event shape.
//!
//! The upstream feed is loosely structured: fields go missing, change type
//! between numbers and strings, or arrive as `null`. Every field here is
//! deserialized leniently so one malformed record degrades to defaults
//! instead of failing the whole document.

use serde::Deserialize;
use serde_json::Value;

/// One raw event from the Territory War activity log.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    #[serde(deserialize_with = "lenient::object")]
    pub payload: EventPayload,

    #[serde(deserialize_with = "lenient::object")]
    pub info: EventInfo,
}

impl RawEvent {
    /// Map an arbitrary JSON value into a `RawEvent`.
    ///
    /// Non-object values produce an empty event, which classifies as noise.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    /// Activity-log marker key (empty when absent).
    pub fn key(&self) -> &str {
        &self.payload.zone_data.activity_log_message.key
    }
}

/// `payload` section of an event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPayload {
    #[serde(deserialize_with = "lenient::object")]
    pub zone_data: ZoneData,

    /// Present only when the event carries a non-empty squad snapshot.
    #[serde(deserialize_with = "lenient::non_empty_object")]
    pub war_squad: Option<WarSquad>,
}

/// `payload.zoneData` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneData {
    #[serde(deserialize_with = "lenient::object")]
    pub activity_log_message: ActivityLogMessage,

    #[serde(deserialize_with = "lenient::string")]
    pub zone_id: String,

    /// Guild of the acting player (the attacker for conflict events).
    #[serde(deserialize_with = "lenient::string")]
    pub guild_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityLogMessage {
    #[serde(deserialize_with = "lenient::string")]
    pub key: String,

    #[serde(deserialize_with = "lenient::vec")]
    pub param: Vec<LogParam>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogParam {
    #[serde(deserialize_with = "lenient::string_vec")]
    pub param_value: Vec<String>,
}

/// Snapshot of the defending squad involved in the event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarSquad {
    #[serde(deserialize_with = "lenient::string")]
    pub player_id: String,

    #[serde(deserialize_with = "lenient::string")]
    pub player_name: String,

    #[serde(deserialize_with = "lenient::number")]
    pub power: f64,

    #[serde(deserialize_with = "lenient::object")]
    pub squad: Squad,

    #[serde(deserialize_with = "lenient::opt_int")]
    pub squad_status: Option<i64>,

    #[serde(deserialize_with = "lenient::opt_int")]
    pub successful_defends: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Squad {
    #[serde(deserialize_with = "lenient::vec")]
    pub cell: Vec<SquadCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SquadCell {
    #[serde(deserialize_with = "lenient::opt_int")]
    pub cell_index: Option<i64>,

    #[serde(deserialize_with = "lenient::string")]
    pub unit_def_id: String,
}

/// `info` section: the author of the log line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventInfo {
    #[serde(deserialize_with = "lenient::string")]
    pub author_id: String,

    #[serde(deserialize_with = "lenient::string")]
    pub author_name: String,

    #[serde(deserialize_with = "lenient::int")]
    pub timestamp: i64,
}

/// Field deserializers that never fail.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_string(value: Value) -> String {
        match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    fn value_to_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(value_to_string(Value::deserialize(d)?))
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(d)?;
        let n = match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };
        Ok(if n.is_finite() && n > 0.0 { n } else { 0.0 })
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(value_to_i64(&Value::deserialize(d)?).unwrap_or(0))
    }

    pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(value_to_i64(&Value::deserialize(d)?))
    }

    pub fn object<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(d)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    pub fn non_empty_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(d)? {
            Value::Object(map) if !map.is_empty() => {
                Ok(serde_json::from_value(Value::Object(map)).ok())
            }
            _ => Ok(None),
        }
    }

    pub fn vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(d)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn string_vec<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::Array(items) => Ok(items.into_iter().map(value_to_string).collect()),
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_event_parse() {
        let value = json!({
            "payload": {
                "zoneData": {
                    "activityLogMessage": {
                        "key": "TERRITORY_CHANNEL_ACTIVITY_CONFLICT_SQUAD_WIN",
                        "param": [{"paramValue": ["42"]}]
                    },
                    "zoneId": "tw_jakku01_phase01_conflict01",
                    "guildId": "G1"
                },
                "warSquad": {
                    "playerId": "B",
                    "playerName": "Bob",
                    "power": 50000,
                    "squad": {"cell": [{"cellIndex": 0, "unitDefId": "GLREY:SEVEN_STAR"}]},
                    "squadStatus": 3,
                    "successfulDefends": 1
                }
            },
            "info": {"authorId": "A", "authorName": "Alice", "timestamp": "1700000000000"}
        });

        let event = RawEvent::from_value(&value);
        assert_eq!(event.key(), "TERRITORY_CHANNEL_ACTIVITY_CONFLICT_SQUAD_WIN");
        assert_eq!(event.info.author_name, "Alice");
        assert_eq!(event.info.timestamp, 1_700_000_000_000);

        let squad = event.payload.war_squad.expect("war squad present");
        assert_eq!(squad.player_name, "Bob");
        assert_eq!(squad.power, 50000.0);
        assert_eq!(squad.squad_status, Some(3));
        assert_eq!(squad.squad.cell[0].unit_def_id, "GLREY:SEVEN_STAR");
    }

    #[test]
    fn test_wrong_types_degrade_to_defaults() {
        let value = json!({
            "payload": {
                "zoneData": {"activityLogMessage": "oops", "zoneId": 7, "guildId": null},
                "warSquad": {"playerId": 123, "power": "not-a-number", "squad": []}
            },
            "info": []
        });

        let event = RawEvent::from_value(&value);
        assert_eq!(event.key(), "");
        assert_eq!(event.payload.zone_data.zone_id, "7");
        assert_eq!(event.payload.zone_data.guild_id, "");
        assert_eq!(event.info, EventInfo::default());

        let squad = event.payload.war_squad.expect("non-empty squad object");
        assert_eq!(squad.player_id, "123");
        assert_eq!(squad.power, 0.0);
        assert!(squad.squad.cell.is_empty());
    }

    #[test]
    fn test_empty_war_squad_is_absent() {
        let value = json!({"payload": {"warSquad": {}}});
        assert!(RawEvent::from_value(&value).payload.war_squad.is_none());

        let value = json!({"payload": {"warSquad": null}});
        assert!(RawEvent::from_value(&value).payload.war_squad.is_none());
    }

    #[test]
    fn test_non_object_event_is_empty() {
        assert_eq!(RawEvent::from_value(&json!("garbage")), RawEvent::default());
        assert_eq!(RawEvent::from_value(&json!(null)), RawEvent::default());
    }

    #[test]
    fn test_numeric_param_values_become_strings() {
        let value = json!({
            "payload": {"zoneData": {"activityLogMessage": {"param": [{"paramValue": [17, null]}]}}}
        });
        let event = RawEvent::from_value(&value);
        assert_eq!(
            event.payload.zone_data.activity_log_message.param[0].param_value,
            vec!["17".to_string(), String::new()]
        );
    }
}

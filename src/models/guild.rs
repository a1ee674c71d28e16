//! Guild membership snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One member of a guild roster document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuildMember {
    pub player_id: String,
    pub player_name: String,
    pub galactic_power: f64,
}

impl GuildMember {
    /// Read one `member[]` entry, defaulting anything missing or mistyped.
    pub fn from_value(value: &Value) -> Self {
        let text = |field: &str| match value.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let galactic_power = match value.get("galacticPower") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };

        Self {
            player_id: text("playerId"),
            player_name: text("playerName"),
            galactic_power,
        }
    }
}

//! Attack records derived from classified conflict events.

use serde::{Deserialize, Serialize};

/// Outcome of a single attack exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackResult {
    /// The attacker defeated the defending squad.
    Win,
    /// The defense held (failed or forfeited attack).
    Hold,
}

impl std::fmt::Display for AttackResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackResult::Win => write!(f, "Win"),
            AttackResult::Hold => write!(f, "Hold"),
        }
    }
}

/// One attack against a defensive squad, after deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackRecord {
    /// Winner of the exchange (`info.authorId`)
    pub attacker_id: String,

    /// Winner of the exchange (`info.authorName`)
    pub attacker_name: String,

    /// Owner of the defensive squad
    pub defender_id: String,

    pub defender_name: String,

    /// Base unit id of the squad leader, tier suffix stripped
    pub defending_leader: Option<String>,

    pub zone_id: String,

    /// Guild of the attacking side; decides the ledger partition
    pub attacking_guild_id: String,

    pub banners: u32,

    pub squad_power: f64,

    pub result: AttackResult,

    /// Log timestamp in epoch milliseconds (0 when absent)
    pub timestamp: i64,
}

impl AttackRecord {
    pub fn is_win(&self) -> bool {
        self.result == AttackResult::Win
    }

    pub fn is_hold(&self) -> bool {
        self.result == AttackResult::Hold
    }
}

/// Identity of a logical attack across duplicated log lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub attacker_id: String,
    pub defender_id: String,
    pub defending_leader: Option<String>,
    pub successful_defends: Option<i64>,
}

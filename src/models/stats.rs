//! Derived statistics models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Guild-level attack totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildStats {
    pub total_attacks: u32,
    pub total_banners: u32,
    /// Distinct attacker ids
    pub unique_players: u32,
    pub avg_banners: f64,
    pub avg_power: f64,
}

/// Per-attacker totals used by the top-performer and full player tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPerformance {
    pub player_id: String,
    pub name: String,
    pub total_banners: u32,
    pub avg_banners: f64,
    pub attacks: u32,
    pub avg_power: f64,
}

/// Matchup statistics for one defending leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderStat {
    pub leader: String,
    pub total_attempts: u32,
    pub wins: u32,
    pub holds: u32,
    /// Percentage (0-100)
    pub win_rate: f64,
    /// Percentage (0-100)
    pub hold_rate: f64,
    pub avg_banners_on_wins: f64,
}

/// Matchup statistics for one (defender, leader) squad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadStat {
    pub defender_name: String,
    pub leader: String,
    pub total_attempts: u32,
    pub wins: u32,
    pub holds: u32,
    pub win_rate: f64,
    pub hold_rate: f64,
    pub avg_banners_on_wins: f64,
}

/// A player's defensive footprint and how it held up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseContributor {
    pub player_name: String,
    pub squads_deployed: u32,
    pub avg_squad_power: f64,
    pub total_attempts: u32,
    /// Opponent wins against this player's squads
    pub wins: u32,
    pub holds: u32,
    pub hold_rate: f64,
    pub banners_given_up: u32,
    pub avg_banners_given_up: f64,
}

/// One row of the participation table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerParticipation {
    pub player_name: String,
    pub attacks: u32,
    pub offensive_banners: u32,
    pub defensive_banners: u32,
    pub total_banners: u32,
    pub wins: u32,
    pub squads_deployed: u32,
    pub defensive_holds: u32,
    pub participated_offense: bool,
    pub participated_defense: bool,
}

/// Guild-wide participation breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipationReport {
    pub total_players: u32,
    pub players_who_attacked: u32,
    pub players_who_defended: u32,
    pub min_banners_threshold: u32,
    pub underperformers: Vec<PlayerParticipation>,
    pub non_participants: Vec<PlayerParticipation>,
    pub all_participants: Vec<PlayerParticipation>,
}

/// Banner efficiency classification based on average banners per attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EfficiencyTier {
    High,
    Medium,
    Low,
}

impl EfficiencyTier {
    pub fn from_avg_banners(avg_banners: f64) -> Self {
        if avg_banners >= 60.0 {
            EfficiencyTier::High
        } else if avg_banners >= 40.0 {
            EfficiencyTier::Medium
        } else {
            EfficiencyTier::Low
        }
    }
}

impl fmt::Display for EfficiencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EfficiencyTier::High => write!(f, "High"),
            EfficiencyTier::Medium => write!(f, "Medium"),
            EfficiencyTier::Low => write!(f, "Low"),
        }
    }
}

/// Zone attack count for a single player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCount {
    pub zone_id: String,
    pub attacks: u32,
}

/// Detailed statistics for one of our attackers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetails {
    pub name: String,
    pub player_id: String,
    pub total_attacks: u32,
    pub total_banners: u32,
    pub avg_banners: f64,
    pub min_banners: u32,
    pub max_banners: u32,
    pub avg_power: f64,
    pub total_power: f64,
    pub efficiency_tier: EfficiencyTier,
    pub zones_attacked: Vec<ZoneCount>,
}

/// Side-by-side lookup of several players.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerComparison {
    pub players: Vec<PlayerDetails>,
    pub comparison_found: bool,
}

/// Per-attacker wins against times defeated on defense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttackSummary {
    pub attacker_id: String,
    pub attacker_name: String,
    pub wins: u32,
    pub defeats: u32,
    pub total_attacks: u32,
    /// "wins/total" when the player was also defeated, otherwise "wins"
    pub attacks: String,
    pub total_banners: u32,
    pub avg_banners: f64,
    pub avg_squad_power: f64,
}

//! Summary object returned by one analysis run.

use serde::Serialize;

use super::{
    AttackRecord, DefenseContributor, GuildStats, LeaderStat, PlayerPerformance, SnapshotId,
    SquadStat,
};

/// Everything the reports need from one pass over a log snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TwSummary {
    pub guild_name: String,
    pub snapshot_id: Option<SnapshotId>,

    /// Our guild's attack totals
    #[serde(flatten)]
    pub stats: GuildStats,

    pub opponent_stats: GuildStats,
    pub top_performers: Vec<PlayerPerformance>,

    /// Enemy leaders we attacked
    pub defending_leaders_we_faced: Vec<LeaderStat>,

    /// Our leaders the opponent attacked
    pub our_defending_leaders: Vec<LeaderStat>,

    pub detailed_enemy_squads: Vec<SquadStat>,
    pub detailed_our_squads: Vec<SquadStat>,
    pub defense_contributors: Vec<DefenseContributor>,

    /// Full ledgers, kept for ad hoc queries within the same run
    #[serde(skip)]
    pub our_attacks: Vec<AttackRecord>,

    #[serde(skip)]
    pub opponent_attacks: Vec<AttackRecord>,
}

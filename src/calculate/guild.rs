//! Guild totals and per-attacker rankings.

use std::collections::HashSet;

use super::{calculate_mean, OrderedGroups};
use crate::models::{AttackRecord, GuildStats, PlayerAttackSummary, PlayerPerformance};

/// Totals over one guild's attack records.
pub fn guild_stats(records: &[AttackRecord]) -> GuildStats {
    if records.is_empty() {
        return GuildStats::default();
    }

    let total_attacks = records.len() as u32;
    let total_banners = records.iter().fold(0u32, |sum, r| sum.saturating_add(r.banners));
    let total_power: f64 = records.iter().map(|r| r.squad_power).sum();
    let unique_players = records
        .iter()
        .map(|r| r.attacker_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u32;

    GuildStats {
        total_attacks,
        total_banners,
        unique_players,
        avg_banners: calculate_mean(total_banners as f64, total_attacks),
        avg_power: calculate_mean(total_power, total_attacks),
    }
}

#[derive(Debug, Default)]
struct AttackerTally {
    attacks: u32,
    banners: u32,
    power: f64,
}

/// Every attacker, sorted by total banners (stable on ties).
pub fn full_player_list(records: &[AttackRecord]) -> Vec<PlayerPerformance> {
    let mut groups: OrderedGroups<(String, String), AttackerTally> = OrderedGroups::new();
    for record in records {
        let tally = groups.entry((record.attacker_id.clone(), record.attacker_name.clone()));
        tally.attacks += 1;
        tally.banners = tally.banners.saturating_add(record.banners);
        tally.power += record.squad_power;
    }

    let mut players: Vec<PlayerPerformance> = groups
        .into_entries()
        .into_iter()
        .map(|((player_id, name), tally)| PlayerPerformance {
            player_id,
            name,
            total_banners: tally.banners,
            avg_banners: calculate_mean(tally.banners as f64, tally.attacks),
            attacks: tally.attacks,
            avg_power: calculate_mean(tally.power, tally.attacks),
        })
        .collect();

    players.sort_by(|a, b| b.total_banners.cmp(&a.total_banners));
    players
}

/// The `limit` highest-scoring attackers.
pub fn top_performers(records: &[AttackRecord], limit: usize) -> Vec<PlayerPerformance> {
    let mut players = full_player_list(records);
    players.truncate(limit);
    players
}

/// Per-attacker wins set against how often the player lost on defense.
///
/// `defenses` is the other guild's ledger: each record there names one of
/// this guild's players as the defender.
pub fn attack_summary(
    records: &[AttackRecord],
    defenses: &[AttackRecord],
) -> Vec<PlayerAttackSummary> {
    let mut defeats: OrderedGroups<(String, String), u32> = OrderedGroups::new();
    for record in defenses {
        *defeats.entry((record.defender_id.clone(), record.defender_name.clone())) += 1;
    }

    let mut summaries: Vec<PlayerAttackSummary> = full_player_list(records)
        .into_iter()
        .map(|player| {
            let key = (player.player_id.clone(), player.name.clone());
            let defeats = defeats.get(&key).copied().unwrap_or(0);
            let total_attacks = player.attacks + defeats;
            let attacks = if total_attacks > player.attacks {
                format!("{}/{}", player.attacks, total_attacks)
            } else {
                player.attacks.to_string()
            };

            PlayerAttackSummary {
                attacker_id: player.player_id,
                attacker_name: player.name,
                wins: player.attacks,
                defeats,
                total_attacks,
                attacks,
                total_banners: player.total_banners,
                avg_banners: player.avg_banners,
                avg_squad_power: player.avg_power,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.total_banners.cmp(&a.total_banners));
    summaries
}

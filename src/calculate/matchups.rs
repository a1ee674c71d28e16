//! Leader and squad matchup statistics.

use super::{calculate_mean, calculate_rate, OrderedGroups};
use crate::models::{AttackRecord, AttackResult, LeaderStat, SquadStat};

/// Attempt/outcome counts for one matchup group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchupTally {
    pub attempts: u32,
    pub wins: u32,
    pub holds: u32,
    pub banners_on_wins: u32,
}

impl MatchupTally {
    pub fn add(&mut self, record: &AttackRecord) {
        self.attempts += 1;
        match record.result {
            AttackResult::Win => {
                self.wins += 1;
                self.banners_on_wins = self.banners_on_wins.saturating_add(record.banners);
            }
            AttackResult::Hold => self.holds += 1,
        }
    }

    pub fn win_rate(&self) -> f64 {
        calculate_rate(self.wins, self.attempts)
    }

    pub fn hold_rate(&self) -> f64 {
        calculate_rate(self.holds, self.attempts)
    }

    pub fn avg_banners_on_wins(&self) -> f64 {
        calculate_mean(self.banners_on_wins as f64, self.wins)
    }
}

/// Matchup rates per defending leader, highest hold rate first.
///
/// Records without a leader are excluded.
pub fn leader_stats(records: &[AttackRecord], limit: usize) -> Vec<LeaderStat> {
    let mut groups: OrderedGroups<String, MatchupTally> = OrderedGroups::new();
    for record in records {
        if let Some(leader) = &record.defending_leader {
            groups.entry(leader.clone()).add(record);
        }
    }

    let mut stats: Vec<LeaderStat> = groups
        .into_entries()
        .into_iter()
        .map(|(leader, tally)| LeaderStat {
            leader,
            total_attempts: tally.attempts,
            wins: tally.wins,
            holds: tally.holds,
            win_rate: tally.win_rate(),
            hold_rate: tally.hold_rate(),
            avg_banners_on_wins: tally.avg_banners_on_wins(),
        })
        .collect();

    stats.sort_by(|a, b| b.hold_rate.total_cmp(&a.hold_rate));
    stats.truncate(limit);
    stats
}

/// Matchup rates per (defender, leader) squad.
///
/// Sorted by hold rate, then attempts, both descending.
pub fn detailed_squad_stats(records: &[AttackRecord]) -> Vec<SquadStat> {
    let mut groups: OrderedGroups<(String, String), MatchupTally> = OrderedGroups::new();
    for record in records {
        if let Some(leader) = &record.defending_leader {
            groups
                .entry((record.defender_name.clone(), leader.clone()))
                .add(record);
        }
    }

    let mut stats: Vec<SquadStat> = groups
        .into_entries()
        .into_iter()
        .map(|((defender_name, leader), tally)| SquadStat {
            defender_name,
            leader,
            total_attempts: tally.attempts,
            wins: tally.wins,
            holds: tally.holds,
            win_rate: tally.win_rate(),
            hold_rate: tally.hold_rate(),
            avg_banners_on_wins: tally.avg_banners_on_wins(),
        })
        .collect();

    stats.sort_by(|a, b| {
        b.hold_rate
            .total_cmp(&a.hold_rate)
            .then_with(|| b.total_attempts.cmp(&a.total_attempts))
    });
    stats
}

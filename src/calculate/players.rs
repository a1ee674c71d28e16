//! Single-player lookups over our attack records.

use super::{calculate_mean, OrderedGroups};
use crate::models::{AttackRecord, EfficiencyTier, PlayerComparison, PlayerDetails, ZoneCount};

/// Detailed stats for attackers whose name contains `query` (case-insensitive).
///
/// Name and id are taken from the first matching record.
pub fn player_details(records: &[AttackRecord], query: &str) -> Option<PlayerDetails> {
    let needle = query.to_lowercase();
    let matched: Vec<&AttackRecord> = records
        .iter()
        .filter(|r| r.attacker_name.to_lowercase().contains(&needle))
        .collect();

    let first = matched.first()?;
    let total_attacks = matched.len() as u32;
    let total_banners = matched.iter().fold(0u32, |sum, r| sum.saturating_add(r.banners));
    let total_power: f64 = matched.iter().map(|r| r.squad_power).sum();
    let avg_banners = calculate_mean(total_banners as f64, total_attacks);

    let mut zones: OrderedGroups<String, u32> = OrderedGroups::new();
    for record in &matched {
        *zones.entry(record.zone_id.clone()) += 1;
    }

    Some(PlayerDetails {
        name: first.attacker_name.clone(),
        player_id: first.attacker_id.clone(),
        total_attacks,
        total_banners,
        avg_banners,
        min_banners: matched.iter().map(|r| r.banners).min().unwrap_or(0),
        max_banners: matched.iter().map(|r| r.banners).max().unwrap_or(0),
        avg_power: calculate_mean(total_power, total_attacks),
        total_power,
        efficiency_tier: EfficiencyTier::from_avg_banners(avg_banners),
        zones_attacked: zones
            .into_entries()
            .into_iter()
            .map(|(zone_id, attacks)| ZoneCount { zone_id, attacks })
            .collect(),
    })
}

/// Look up several players at once; unmatched names are left out.
pub fn compare_players<S: AsRef<str>>(records: &[AttackRecord], names: &[S]) -> PlayerComparison {
    let players: Vec<PlayerDetails> = names
        .iter()
        .filter_map(|name| player_details(records, name.as_ref()))
        .collect();

    PlayerComparison {
        comparison_found: !players.is_empty(),
        players,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::test_records::win;

    fn records() -> Vec<AttackRecord> {
        let mut records = vec![
            win("Alice", "X", "GLREY", 64),
            win("Alice", "Y", "GLREY", 58),
            win("Bob", "X", "GLREY", 30),
        ];
        records[1].zone_id = "tw_zone_02".to_string();
        records
    }

    #[test]
    fn test_player_details_case_insensitive_partial() {
        let details = player_details(&records(), "ali").unwrap();

        assert_eq!(details.name, "Alice");
        assert_eq!(details.player_id, "id-Alice");
        assert_eq!(details.total_attacks, 2);
        assert_eq!(details.total_banners, 122);
        assert_eq!(details.min_banners, 58);
        assert_eq!(details.max_banners, 64);
        assert_eq!(details.avg_banners, 61.0);
        assert_eq!(details.efficiency_tier, EfficiencyTier::High);
        assert_eq!(details.zones_attacked.len(), 2);
        assert_eq!(details.zones_attacked[0].zone_id, "tw_zone_01");
    }

    #[test]
    fn test_player_details_not_found() {
        assert!(player_details(&records(), "zed").is_none());
        assert!(player_details(&[], "alice").is_none());
    }

    #[test]
    fn test_compare_players() {
        let comparison = compare_players(&records(), &["alice", "nobody", "BOB"]);
        assert!(comparison.comparison_found);
        assert_eq!(comparison.players.len(), 2);
        assert_eq!(comparison.players[1].efficiency_tier, EfficiencyTier::Low);

        let empty = compare_players(&records(), &["nobody"]);
        assert!(!empty.comparison_found);
    }

    #[test]
    fn test_player_details_large_banners_saturate() {
        let records = vec![
            win("Alice", "X", "GLREY", u32::MAX - 1),
            win("Alice", "Y", "GLREY", u32::MAX - 1),
        ];
        let details = player_details(&records, "alice").unwrap();
        assert_eq!(details.total_banners, u32::MAX);
        assert_eq!(details.max_banners, u32::MAX - 1);
    }
}

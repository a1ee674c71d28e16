//! Defensive footprint reconciliation.
//!
//! Explicit deploy events survive in the log only for squads that were never
//! attacked. Squads that were attacked show up only in the opponent's attack
//! records. The full footprint is the union of both, keyed by
//! (player name, leader), built in two ordered passes.

use tracing::{debug, info};

use super::{calculate_mean, MatchupTally, OrderedGroups};
use crate::models::{AttackRecord, DefenseContributor, DeployKind, DeploymentRecord};

#[derive(Debug, Default)]
struct InferredSquad {
    player_id: String,
    attacks: u32,
    power: f64,
}

/// Merge explicit deployments with squads inferred from the opponent's attacks.
///
/// Explicit rows come first in their original order, followed by one
/// inferred row per attacked (defender, leader) pair with no explicit match.
/// Inferred power is the mean squad power seen across those attacks.
pub fn reconcile_deployments(
    explicit: &[DeploymentRecord],
    opponent_attacks: &[AttackRecord],
) -> Vec<DeploymentRecord> {
    let mut known: OrderedGroups<(String, Option<String>), ()> = OrderedGroups::new();
    for deployment in explicit {
        known.entry(deployment.squad_key());
    }

    let mut inferred: OrderedGroups<(String, Option<String>), InferredSquad> =
        OrderedGroups::new();
    for attack in opponent_attacks {
        if attack.defender_name.is_empty() {
            continue;
        }
        let key = (attack.defender_name.clone(), attack.defending_leader.clone());
        if known.contains(&key) {
            continue;
        }
        let squad = inferred.entry(key);
        if squad.player_id.is_empty() {
            squad.player_id = attack.defender_id.clone();
        }
        squad.attacks += 1;
        squad.power += attack.squad_power;
    }

    if explicit.is_empty() {
        debug!("No explicit deployments; inferring defense entirely from attacked squads");
    }

    let mut deployments = explicit.to_vec();
    let inferred_rows: Vec<DeploymentRecord> = inferred
        .into_entries()
        .into_iter()
        .map(|((player_name, leader), squad)| DeploymentRecord {
            player_id: squad.player_id,
            player_name,
            leader,
            power: calculate_mean(squad.power, squad.attacks),
            kind: DeployKind::Squad,
            inferred: true,
        })
        .collect();

    info!(
        "Defense footprint: {} explicit deployments, {} inferred from attacks",
        deployments.len(),
        inferred_rows.len()
    );
    deployments.extend(inferred_rows);
    deployments
}

#[derive(Debug, Default)]
struct PlayerFootprint {
    squads: u32,
    power: f64,
}

/// Per-player defensive contribution, most holds first.
///
/// Players whose squads were never attacked report zero attempts.
pub fn defense_contributors(
    explicit: &[DeploymentRecord],
    opponent_attacks: &[AttackRecord],
) -> Vec<DefenseContributor> {
    let deployments = reconcile_deployments(explicit, opponent_attacks);

    let mut footprints: OrderedGroups<String, PlayerFootprint> = OrderedGroups::new();
    for deployment in &deployments {
        let footprint = footprints.entry(deployment.player_name.clone());
        footprint.squads += 1;
        footprint.power += deployment.power;
    }

    let mut tallies: OrderedGroups<String, MatchupTally> = OrderedGroups::new();
    for attack in opponent_attacks {
        tallies.entry(attack.defender_name.clone()).add(attack);
    }

    let mut contributors: Vec<DefenseContributor> = footprints
        .into_entries()
        .into_iter()
        .map(|(player_name, footprint)| {
            let tally = tallies.get(&player_name).copied().unwrap_or_default();
            DefenseContributor {
                squads_deployed: footprint.squads,
                avg_squad_power: calculate_mean(footprint.power, footprint.squads),
                total_attempts: tally.attempts,
                wins: tally.wins,
                holds: tally.holds,
                hold_rate: tally.hold_rate(),
                banners_given_up: tally.banners_on_wins,
                avg_banners_given_up: tally.avg_banners_on_wins(),
                player_name,
            }
        })
        .collect();

    contributors.sort_by(|a, b| {
        b.holds
            .cmp(&a.holds)
            .then_with(|| b.squads_deployed.cmp(&a.squads_deployed))
    });
    contributors
}

//! Participation reconciliation.
//!
//! Cross-references our attack ledger, the defensive footprint, raw deploy
//! counts and (optionally) the guild roster to classify every known player.
//! The roster is the only way a player who did nothing at all shows up.

use tracing::info;

use crate::calculate::OrderedGroups;
use crate::config::{AppConfig, BannerConfig};
use crate::ledger::DeployCounts;
use crate::models::{AttackRecord, DefenseContributor, ParticipationReport, PlayerParticipation};

/// Thresholds and banner constants for one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipationOptions {
    /// Attacking players below this total are underperformers
    pub min_banners: u32,
    /// Attacks needed to count as offensive participation
    pub min_attacks: u32,
    pub squad_deploy_bonus: u32,
    pub fleet_deploy_bonus: u32,
}

impl Default for ParticipationOptions {
    fn default() -> Self {
        let banners = BannerConfig::default();
        Self {
            min_banners: 50,
            min_attacks: 1,
            squad_deploy_bonus: banners.squad_deploy_bonus,
            fleet_deploy_bonus: banners.fleet_deploy_bonus,
        }
    }
}

impl ParticipationOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min_banners: config.analysis.min_banners,
            min_attacks: config.analysis.min_attacks,
            squad_deploy_bonus: config.banners.squad_deploy_bonus,
            fleet_deploy_bonus: config.banners.fleet_deploy_bonus,
        }
    }
}

/// Inputs gathered from one ledger pass.
#[derive(Debug, Clone, Copy)]
pub struct ParticipationInputs<'a> {
    pub our_attacks: &'a [AttackRecord],
    pub opponent_attacks: &'a [AttackRecord],
    pub contributors: &'a [DefenseContributor],
    pub deploy_counts: &'a DeployCounts,
    pub roster: Option<&'a [String]>,
}

#[derive(Debug, Default)]
struct Offense {
    attacks: u32,
    banners: u32,
    wins: u32,
}

/// Build the participation table, sorted by total banners.
pub fn participation_report(
    inputs: ParticipationInputs<'_>,
    options: ParticipationOptions,
) -> ParticipationReport {
    let mut offense: OrderedGroups<String, Offense> = OrderedGroups::new();
    for attack in inputs.our_attacks {
        let entry = offense.entry(attack.attacker_name.clone());
        entry.attacks += 1;
        entry.banners = entry.banners.saturating_add(attack.banners);
        if attack.is_win() {
            entry.wins += 1;
        }
    }

    // Candidate order: attackers, defenders, deployers, then roster.
    let mut candidates: OrderedGroups<String, ()> = OrderedGroups::new();
    let names = inputs
        .our_attacks
        .iter()
        .map(|a| a.attacker_name.as_str())
        .chain(inputs.opponent_attacks.iter().map(|a| a.defender_name.as_str()))
        .chain(inputs.contributors.iter().map(|c| c.player_name.as_str()))
        .chain(inputs.deploy_counts.iter().map(|(name, _)| name))
        .chain(inputs.roster.unwrap_or_default().iter().map(String::as_str));
    for name in names {
        if !name.is_empty() {
            candidates.entry(name.to_string());
        }
    }

    let mut players: Vec<PlayerParticipation> = candidates
        .into_entries()
        .into_iter()
        .map(|(player_name, ())| {
            let attack = offense.get(&player_name);
            let contributor = inputs
                .contributors
                .iter()
                .find(|c| c.player_name == player_name);
            let deploys = inputs.deploy_counts.get(&player_name);

            let attacks = attack.map_or(0, |a| a.attacks);
            let offensive_banners = attack.map_or(0, |a| a.banners);
            let defensive_banners = deploys
                .squads
                .saturating_mul(options.squad_deploy_bonus)
                .saturating_add(deploys.fleets.saturating_mul(options.fleet_deploy_bonus));
            let squads_deployed = contributor.map_or(0, |c| c.squads_deployed);

            PlayerParticipation {
                attacks,
                offensive_banners,
                defensive_banners,
                total_banners: offensive_banners.saturating_add(defensive_banners),
                wins: attack.map_or(0, |a| a.wins),
                squads_deployed,
                defensive_holds: contributor.map_or(0, |c| c.holds),
                participated_offense: attacks >= options.min_attacks,
                participated_defense: squads_deployed > 0,
                player_name,
            }
        })
        .collect();

    players.sort_by(|a, b| b.total_banners.cmp(&a.total_banners));

    let underperformers: Vec<PlayerParticipation> = players
        .iter()
        .filter(|p| p.participated_offense && p.total_banners < options.min_banners)
        .cloned()
        .collect();
    let non_participants: Vec<PlayerParticipation> = players
        .iter()
        .filter(|p| !p.participated_offense && !p.participated_defense)
        .cloned()
        .collect();

    let report = ParticipationReport {
        total_players: players.len() as u32,
        players_who_attacked: players.iter().filter(|p| p.participated_offense).count() as u32,
        players_who_defended: players.iter().filter(|p| p.participated_defense).count() as u32,
        min_banners_threshold: options.min_banners,
        underperformers,
        non_participants,
        all_participants: players,
    };

    info!(
        "Participation: {} players, {} attacked, {} defended, {} underperformers, {} non-participants",
        report.total_players,
        report.players_who_attacked,
        report.players_who_defended,
        report.underperformers.len(),
        report.non_participants.len()
    );

    report
}

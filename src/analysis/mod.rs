//! Analysis runs over one loaded log snapshot.
//!
//! [`TwAnalysis`] owns the event list, the optional roster, and the
//! configuration. Every view is derived fresh from the event list on each
//! call; nothing is cached between calls.

use tracing::{debug, info};

use crate::calculate::{
    attack_summary, compare_players, defense_contributors, detailed_squad_stats, full_player_list,
    guild_stats, leader_stats, player_details, top_performers,
};
use crate::classify::EventClassifier;
use crate::config::AppConfig;
use crate::ledger::{build_ledger, AttackLedger};
use crate::models::{
    ParticipationReport, PlayerAttackSummary, PlayerComparison, PlayerDetails, PlayerPerformance,
    RawEvent, SnapshotId, TwSummary,
};
use crate::participation::{participation_report, ParticipationInputs, ParticipationOptions};

/// One immutable event snapshot plus everything needed to analyze it.
#[derive(Debug, Clone)]
pub struct TwAnalysis {
    config: AppConfig,
    classifier: EventClassifier,
    events: Vec<RawEvent>,
    snapshot: Option<SnapshotId>,
    roster: Option<Vec<String>>,
}

impl TwAnalysis {
    /// An analysis with no events loaded yet.
    pub fn new(config: AppConfig) -> Self {
        let classifier = EventClassifier::new(config.guild.id.clone(), config.event_keys.clone());
        Self {
            config,
            classifier,
            events: Vec::new(),
            snapshot: None,
            roster: None,
        }
    }

    pub fn with_events(mut self, events: Vec<RawEvent>, snapshot: Option<SnapshotId>) -> Self {
        info!(
            "Loaded {} events (snapshot {})",
            events.len(),
            snapshot.as_ref().map_or("-", |s| s.as_str())
        );
        self.events = events;
        self.snapshot = snapshot;
        self
    }

    pub fn with_roster(mut self, roster: Vec<String>) -> Self {
        info!("Loaded roster with {} members", roster.len());
        self.roster = Some(roster);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Option<&SnapshotId> {
        self.snapshot.as_ref()
    }

    pub fn roster(&self) -> Option<&[String]> {
        self.roster.as_deref()
    }

    pub fn ledger(&self) -> AttackLedger {
        build_ledger(&self.events, &self.classifier)
    }

    /// Build the full summary object.
    pub fn summary(&self) -> TwSummary {
        let ledger = self.ledger();
        let analysis = &self.config.analysis;

        let summary = TwSummary {
            guild_name: self.config.guild.name.clone(),
            snapshot_id: self.snapshot.clone(),
            stats: guild_stats(&ledger.ours),
            opponent_stats: guild_stats(&ledger.opponents),
            top_performers: top_performers(&ledger.ours, analysis.top_performers_limit),
            defending_leaders_we_faced: leader_stats(&ledger.ours, analysis.leader_limit),
            our_defending_leaders: leader_stats(&ledger.opponents, analysis.leader_limit),
            detailed_enemy_squads: detailed_squad_stats(&ledger.ours),
            detailed_our_squads: detailed_squad_stats(&ledger.opponents),
            defense_contributors: defense_contributors(&ledger.deployments, &ledger.opponents),
            our_attacks: ledger.ours,
            opponent_attacks: ledger.opponents,
        };

        debug!(
            total_attacks = summary.stats.total_attacks,
            opponent_attacks = summary.opponent_stats.total_attacks,
            "Summary built"
        );
        summary
    }

    /// Participation thresholds from configuration.
    pub fn participation_options(&self) -> ParticipationOptions {
        ParticipationOptions::from_config(&self.config)
    }

    /// Participation table; the roster is consulted only when `use_roster` is set.
    pub fn participation_report(
        &self,
        options: ParticipationOptions,
        use_roster: bool,
    ) -> ParticipationReport {
        let ledger = self.ledger();
        let contributors = defense_contributors(&ledger.deployments, &ledger.opponents);
        let roster = if use_roster { self.roster() } else { None };

        participation_report(
            ParticipationInputs {
                our_attacks: &ledger.ours,
                opponent_attacks: &ledger.opponents,
                contributors: &contributors,
                deploy_counts: &ledger.deploy_counts,
                roster,
            },
            options,
        )
    }

    pub fn full_player_list(&self) -> Vec<PlayerPerformance> {
        full_player_list(&self.ledger().ours)
    }

    pub fn player_details(&self, name: &str) -> Option<PlayerDetails> {
        player_details(&self.ledger().ours, name)
    }

    pub fn compare_players<S: AsRef<str>>(&self, names: &[S]) -> PlayerComparison {
        compare_players(&self.ledger().ours, names)
    }

    /// Wins against defeats for our attackers.
    pub fn attack_summaries(&self) -> Vec<PlayerAttackSummary> {
        let ledger = self.ledger();
        attack_summary(&ledger.ours, &ledger.opponents)
    }
}

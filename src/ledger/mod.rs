//! Attack ledger construction.
//!
//! One ordered pass over the event list: classify, drop duplicate attacks,
//! and split survivors into our guild's and the opponent's sequences. Our
//! guild's explicit deployments are collected along the way.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{Classification, EventClassifier, SkipReason};
use crate::models::{AttackRecord, DeployKind, DeploymentRecord, RawEvent};

/// Raw deploy-event counts for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeployTally {
    pub squads: u32,
    pub fleets: u32,
}

/// Deploy-event counts per player name, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployCounts {
    index: HashMap<String, usize>,
    entries: Vec<(String, DeployTally)>,
}

impl DeployCounts {
    pub fn record(&mut self, player_name: &str, kind: DeployKind) {
        let idx = match self.index.get(player_name) {
            Some(&idx) => idx,
            None => {
                self.entries
                    .push((player_name.to_string(), DeployTally::default()));
                self.index
                    .insert(player_name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let tally = &mut self.entries[idx].1;
        match kind {
            DeployKind::Squad => tally.squads += 1,
            DeployKind::Fleet => tally.fleets += 1,
        }
    }

    pub fn get(&self, player_name: &str) -> DeployTally {
        self.index
            .get(player_name)
            .map(|&idx| self.entries[idx].1)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DeployTally)> {
        self.entries.iter().map(|(name, tally)| (name.as_str(), *tally))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counters describing one ledger pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub events_seen: usize,
    pub attacks_retained: usize,
    pub duplicates_dropped: usize,
    pub lock_state_filtered: usize,
    pub deploy_events: usize,
    pub skipped: usize,
}

/// Output of one pass over the event list.
#[derive(Debug, Clone, Default)]
pub struct AttackLedger {
    /// Attacks by our guild, in event order
    pub ours: Vec<AttackRecord>,

    /// Attacks by the opponent, in event order
    pub opponents: Vec<AttackRecord>,

    /// Our explicit deployments, one per (player, leader)
    pub deployments: Vec<DeploymentRecord>,

    /// Every own-guild deploy event, counted per player
    pub deploy_counts: DeployCounts,

    pub stats: LedgerStats,
}

/// Classify, deduplicate and partition an event list.
pub fn build_ledger(events: &[RawEvent], classifier: &EventClassifier) -> AttackLedger {
    let mut ledger = AttackLedger::default();
    let mut seen_attacks = HashSet::new();
    let mut seen_deployments = HashSet::new();

    for event in events {
        ledger.stats.events_seen += 1;

        match classifier.classify(event) {
            Classification::Attack(attack) => {
                if !seen_attacks.insert(attack.key) {
                    ledger.stats.duplicates_dropped += 1;
                    continue;
                }
                ledger.stats.attacks_retained += 1;
                if attack.record.attacking_guild_id == classifier.own_guild_id() {
                    ledger.ours.push(attack.record);
                } else {
                    ledger.opponents.push(attack.record);
                }
            }
            Classification::Deploy(deployment) => {
                ledger.stats.deploy_events += 1;
                ledger
                    .deploy_counts
                    .record(&deployment.player_name, deployment.kind);
                if seen_deployments.insert(deployment.squad_key()) {
                    ledger.deployments.push(deployment);
                }
            }
            Classification::Skip(reason) => {
                if reason == SkipReason::LockState {
                    ledger.stats.lock_state_filtered += 1;
                }
                ledger.stats.skipped += 1;
            }
        }
    }

    debug!(stats = ?ledger.stats, "Ledger pass complete");
    info!(
        "Parsed {} events: {} attacks by our guild, {} by opponent, {} deployments",
        ledger.stats.events_seen,
        ledger.ours.len(),
        ledger.opponents.len(),
        ledger.deployments.len()
    );

    ledger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fixtures::{deploy, Attack, OUR_GUILD, THEIR_GUILD};
    use crate::config::EventKeys;
    use crate::models::AttackResult;
    use serde_json::json;

    fn classifier() -> EventClassifier {
        EventClassifier::new(OUR_GUILD, EventKeys::default())
    }

    #[test]
    fn test_single_win_lands_in_ours() {
        let event = RawEvent::from_value(&json!({
            "payload": {
                "zoneData": {
                    "activityLogMessage": {
                        "key": "TERRITORY_CHANNEL_ACTIVITY_CONFLICT_SQUAD_WIN",
                        "param": [{"paramValue": ["42"]}]
                    },
                    "guildId": OUR_GUILD
                },
                "warSquad": {"playerId": "B", "playerName": "Bob", "power": 50000}
            },
            "info": {"authorId": "A", "authorName": "Alice"}
        }));

        let ledger = build_ledger(&[event], &classifier());
        assert_eq!(ledger.ours.len(), 1);
        assert!(ledger.opponents.is_empty());

        let record = &ledger.ours[0];
        assert_eq!(record.attacker_name, "Alice");
        assert_eq!(record.defender_name, "Bob");
        assert_eq!(record.banners, 42);
        assert_eq!(record.result, AttackResult::Win);
    }

    #[test]
    fn test_verbatim_duplicate_dropped() {
        let event = Attack::win(OUR_GUILD, "A", "B").event();
        let ledger = build_ledger(&[event.clone(), event], &classifier());

        assert_eq!(ledger.ours.len(), 1);
        assert_eq!(ledger.stats.duplicates_dropped, 1);
    }

    #[test]
    fn test_first_occurrence_wins_across_event_types() {
        // Same logical exchange logged as a hold first, then as a win.
        let hold = Attack::hold(OUR_GUILD, "A", "B").defends(1).event();
        let win = Attack::win(OUR_GUILD, "A", "B").defends(1).event();

        let ledger = build_ledger(&[hold, win], &classifier());
        assert_eq!(ledger.ours.len(), 1);
        assert_eq!(ledger.ours[0].result, AttackResult::Hold);
    }

    #[test]
    fn test_partition_and_order() {
        let events = vec![
            Attack::win(THEIR_GUILD, "X", "Bob").event(),
            Attack::win(OUR_GUILD, "A", "P1").event(),
            Attack::hold(THEIR_GUILD, "Carol", "Carol").leader("GLLEIA").event(),
            Attack::win(OUR_GUILD, "A", "P2").event(),
        ];

        let ledger = build_ledger(&events, &classifier());
        let ours: Vec<_> = ledger.ours.iter().map(|r| r.defender_name.as_str()).collect();
        let theirs: Vec<_> = ledger
            .opponents
            .iter()
            .map(|r| r.defender_name.as_str())
            .collect();

        assert_eq!(ours, vec!["P1", "P2"]);
        assert_eq!(theirs, vec!["Bob", "Carol"]);
    }

    #[test]
    fn test_partition_sizes_match_distinct_keys() {
        let events = vec![
            Attack::win(OUR_GUILD, "A", "B").defends(0).event(),
            Attack::win(OUR_GUILD, "A", "B").defends(0).event(),
            Attack::win(OUR_GUILD, "A", "B").defends(1).event(),
            Attack::win(THEIR_GUILD, "X", "Y").event(),
            Attack::hold(THEIR_GUILD, "X", "Y").event(),
        ];

        let ledger = build_ledger(&events, &classifier());
        // (A,B,GLREY,0), (A,B,GLREY,1), (X,Y,GLREY,None)
        assert_eq!(ledger.ours.len() + ledger.opponents.len(), 3);
        assert_eq!(ledger.stats.duplicates_dropped, 2);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let events = vec![
            Attack::win(OUR_GUILD, "A", "B").event(),
            Attack::hold(THEIR_GUILD, "X", "Y").event(),
        ];

        let first = build_ledger(&events, &classifier());
        let second = build_ledger(&events, &classifier());
        assert_eq!(first.ours, second.ours);
        assert_eq!(first.opponents, second.opponents);
    }

    #[test]
    fn test_lock_state_counted() {
        let mut locked = Attack::win(OUR_GUILD, "A", "B");
        locked.status = Some(2);

        let ledger = build_ledger(&[locked.event()], &classifier());
        assert!(ledger.ours.is_empty());
        assert_eq!(ledger.stats.lock_state_filtered, 1);
    }

    #[test]
    fn test_deployments_collected_and_counted() {
        let events = vec![
            deploy("Carol", "GLREY:SEVEN_STAR", 90000.0),
            deploy("Carol", "GLREY:SEVEN_STAR", 90000.0),
            deploy("Carol", "CAPITALEXECUTOR", 150000.0),
            deploy("Dave", "GLLEIA", 85000.0),
        ];

        let ledger = build_ledger(&events, &classifier());
        assert_eq!(ledger.deployments.len(), 3);
        assert_eq!(ledger.stats.deploy_events, 4);
        assert_eq!(
            ledger.deploy_counts.get("Carol"),
            DeployTally {
                squads: 2,
                fleets: 1
            }
        );
        assert_eq!(ledger.deploy_counts.get("Nobody"), DeployTally::default());

        let names: Vec<_> = ledger.deploy_counts.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Carol", "Dave"]);
    }

    #[test]
    fn test_empty_event_list() {
        let ledger = build_ledger(&[], &classifier());
        assert!(ledger.ours.is_empty());
        assert!(ledger.opponents.is_empty());
        assert!(ledger.deploy_counts.is_empty());
        assert_eq!(ledger.stats, LedgerStats::default());
    }
}

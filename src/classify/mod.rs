//! Event classification.
//!
//! Maps one [`RawEvent`] to a tagged result: an attack exchange, a defensive
//! deployment by our guild, or something to skip. Extraction is total: missing
//! or malformed fields fall back to empty strings, zero, or `None`.
//!
//! Field semantics worth knowing:
//! - `info.author*` is the *winner* of the exchange, not necessarily the
//!   player who started it.
//! - `warSquad.player*` is the owner of the defensive squad.
//! - `zoneData.guildId` is the guild of the attacking side.

use serde::Serialize;

use crate::config::EventKeys;
use crate::models::{
    AttackRecord, AttackResult, DedupKey, DeployKind, DeploymentRecord, RawEvent, WarSquad,
};

/// Semantic kind of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Win,
    Hold,
    SquadDeploy,
    FleetDeploy,
    Noise,
}

/// Why an event was not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkipReason {
    /// Key is not an attack or deployment marker
    Unrecognized,
    /// Empty-marker event with no squad: a zone-clearing marker
    ZoneCleared,
    /// Squad in a transient lock state
    LockState,
    /// Deployment by a guild other than ours
    ForeignDeployment,
}

/// An attack exchange extracted from one event.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedAttack {
    pub record: AttackRecord,
    pub key: DedupKey,
}

/// Result of classifying one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Skip(SkipReason),
    Attack(ClassifiedAttack),
    Deploy(DeploymentRecord),
}

impl Classification {
    pub fn kind(&self) -> EventKind {
        match self {
            Classification::Skip(_) => EventKind::Noise,
            Classification::Attack(attack) => match attack.record.result {
                AttackResult::Win => EventKind::Win,
                AttackResult::Hold => EventKind::Hold,
            },
            Classification::Deploy(deploy) => match deploy.kind {
                DeployKind::Squad => EventKind::SquadDeploy,
                DeployKind::Fleet => EventKind::FleetDeploy,
            },
        }
    }
}

/// Classifies events relative to our own guild.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    own_guild_id: String,
    keys: EventKeys,
}

impl EventClassifier {
    pub fn new(own_guild_id: impl Into<String>, keys: EventKeys) -> Self {
        Self {
            own_guild_id: own_guild_id.into(),
            keys,
        }
    }

    pub fn own_guild_id(&self) -> &str {
        &self.own_guild_id
    }

    /// Classify a single event.
    pub fn classify(&self, event: &RawEvent) -> Classification {
        let key = event.key();
        let keys = &self.keys;

        let fleet_key = keys.fleet_deploy.as_deref().filter(|k| !k.is_empty());
        if fleet_key == Some(key) {
            return self.classify_deploy(event, Some(DeployKind::Fleet));
        }
        if key == keys.deploy {
            return self.classify_deploy(event, None);
        }

        let is_win_key = key == keys.win;
        let is_empty_key = key == keys.empty;
        let squad = event.payload.war_squad.as_ref();

        if !is_win_key && !is_empty_key {
            return Classification::Skip(SkipReason::Unrecognized);
        }
        if is_empty_key && squad.is_none() {
            return Classification::Skip(SkipReason::ZoneCleared);
        }

        let status = squad.and_then(|s| s.squad_status);
        if status == Some(keys.lock_status) {
            return Classification::Skip(SkipReason::LockState);
        }

        // Key decides first; an explicit defeated status upgrades an empty-marker event.
        let result = if is_win_key || status == Some(keys.win_status) {
            AttackResult::Win
        } else {
            AttackResult::Hold
        };

        let zone = &event.payload.zone_data;
        let defending_leader = squad.and_then(|s| self.leader_of(s));
        let record = AttackRecord {
            attacker_id: event.info.author_id.clone(),
            attacker_name: event.info.author_name.clone(),
            defender_id: squad.map(|s| s.player_id.clone()).unwrap_or_default(),
            defender_name: squad.map(|s| s.player_name.clone()).unwrap_or_default(),
            defending_leader: defending_leader.clone(),
            zone_id: zone.zone_id.clone(),
            attacking_guild_id: zone.guild_id.clone(),
            banners: banners_of(event),
            squad_power: squad.map(|s| s.power).unwrap_or(0.0),
            result,
            timestamp: event.info.timestamp,
        };
        let key = DedupKey {
            attacker_id: record.attacker_id.clone(),
            defender_id: record.defender_id.clone(),
            defending_leader,
            successful_defends: squad.and_then(|s| s.successful_defends),
        };

        Classification::Attack(ClassifiedAttack { record, key })
    }

    /// Own-guild placement. Without a dedicated fleet marker the kind
    /// follows the leader: capital ships lead fleets.
    fn classify_deploy(&self, event: &RawEvent, kind: Option<DeployKind>) -> Classification {
        if event.payload.zone_data.guild_id != self.own_guild_id {
            return Classification::Skip(SkipReason::ForeignDeployment);
        }

        let squad = event.payload.war_squad.as_ref();
        let leader = squad.and_then(|s| self.leader_of(s));
        let kind = kind.unwrap_or_else(|| self.deploy_kind_of(leader.as_deref()));
        let pick = |from_squad: Option<&String>, fallback: &String| match from_squad {
            Some(value) if !value.is_empty() => value.clone(),
            _ => fallback.clone(),
        };

        Classification::Deploy(DeploymentRecord {
            player_id: pick(squad.map(|s| &s.player_id), &event.info.author_id),
            player_name: pick(squad.map(|s| &s.player_name), &event.info.author_name),
            leader,
            power: squad.map(|s| s.power).unwrap_or(0.0),
            kind,
            inferred: false,
        })
    }

    fn deploy_kind_of(&self, leader: Option<&str>) -> DeployKind {
        let prefix = self.keys.fleet_leader_prefix.as_str();
        match leader {
            Some(leader) if !prefix.is_empty() && leader.starts_with(prefix) => DeployKind::Fleet,
            _ => DeployKind::Squad,
        }
    }

    /// Base unit id of the unit in formation slot 0.
    fn leader_of(&self, squad: &WarSquad) -> Option<String> {
        let unit = squad
            .squad
            .cell
            .iter()
            .find(|cell| cell.cell_index == Some(0))
            .map(|cell| cell.unit_def_id.as_str())?;

        let separator = self.keys.leader_separator.as_str();
        let base = if separator.is_empty() {
            unit
        } else {
            unit.split_once(separator).map_or(unit, |(prefix, _)| prefix)
        };

        if base.is_empty() {
            None
        } else {
            Some(base.to_string())
        }
    }
}

/// First banner parameter as an integer; anything unparseable counts as 0.
fn banners_of(event: &RawEvent) -> u32 {
    event
        .payload
        .zone_data
        .activity_log_message
        .param
        .first()
        .and_then(|param| param.param_value.first())
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

//! Defensive deployment records.

use serde::{Deserialize, Serialize};

/// What kind of unit group was placed on defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeployKind {
    Squad,
    Fleet,
}

/// A defensive placement, either logged explicitly or inferred from attacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub player_id: String,
    pub player_name: String,
    pub leader: Option<String>,
    pub power: f64,
    pub kind: DeployKind,

    /// True when reconstructed from the opponent's attack log
    pub inferred: bool,
}

impl DeploymentRecord {
    /// Key used to reconcile explicit and inferred placements.
    pub fn squad_key(&self) -> (String, Option<String>) {
        (self.player_name.clone(), self.leader.clone())
    }
}

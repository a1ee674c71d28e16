use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{defense_contributors, detailed_squad_stats, leader_stats};
use crate::models::{DefenseContributor, LeaderStat, SquadStat};

/// Which side's defenses to report on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Enemy squads we attacked
    #[default]
    Enemy,
    /// Our squads the opponent attacked
    Ours,
}

#[derive(Debug, Deserialize)]
pub struct MatchupParams {
    pub side: Option<String>,
    pub limit: Option<usize>,
}

fn parse_side(side: Option<&str>) -> Result<Side, ApiError> {
    match side {
        None | Some("enemy") => Ok(Side::Enemy),
        Some("ours") => Ok(Side::Ours),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unknown side '{}': expected 'enemy' or 'ours'",
            other
        ))),
    }
}

#[derive(Debug, Serialize)]
pub struct LeadersResponse {
    pub side: Side,
    pub leaders: Vec<LeaderStat>,
}

pub async fn leaders(
    State(state): State<AppState>,
    Query(params): Query<MatchupParams>,
) -> Result<Json<LeadersResponse>, ApiError> {
    let side = parse_side(params.side.as_deref())?;
    let limit = params
        .limit
        .unwrap_or(state.analysis.config().analysis.leader_limit);
    let ledger = state.analysis.ledger();
    let records = match side {
        Side::Enemy => &ledger.ours,
        Side::Ours => &ledger.opponents,
    };

    Ok(Json(LeadersResponse {
        side,
        leaders: leader_stats(records, limit),
    }))
}

#[derive(Debug, Serialize)]
pub struct SquadsResponse {
    pub side: Side,
    pub squads: Vec<SquadStat>,
}

pub async fn squads(
    State(state): State<AppState>,
    Query(params): Query<MatchupParams>,
) -> Result<Json<SquadsResponse>, ApiError> {
    let side = parse_side(params.side.as_deref())?;
    let ledger = state.analysis.ledger();
    let records = match side {
        Side::Enemy => &ledger.ours,
        Side::Ours => &ledger.opponents,
    };

    let mut squads = detailed_squad_stats(records);
    if let Some(limit) = params.limit {
        squads.truncate(limit);
    }
    Ok(Json(SquadsResponse { side, squads }))
}

#[derive(Debug, Serialize)]
pub struct DefenseResponse {
    pub total_players: usize,
    pub total_squads: u32,
    pub contributors: Vec<DefenseContributor>,
}

pub async fn defense(State(state): State<AppState>) -> Json<DefenseResponse> {
    let ledger = state.analysis.ledger();
    let contributors = defense_contributors(&ledger.deployments, &ledger.opponents);

    Json(DefenseResponse {
        total_players: contributors.len(),
        total_squads: contributors.iter().map(|c| c.squads_deployed).sum(),
        contributors,
    })
}

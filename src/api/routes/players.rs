use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::models::{PlayerAttackSummary, PlayerDetails, PlayerPerformance};

#[derive(Debug, Deserialize)]
pub struct ListPlayersParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<PlayerPerformance>,
    pub pagination: PaginationMeta,
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<ListPlayersParams>,
) -> Json<PlayerListResponse> {
    let players = state.analysis.full_player_list();
    let pagination = Pagination::new(params.page, params.page_size);

    Json(PlayerListResponse {
        pagination: PaginationMeta::new(&pagination, players.len() as u32),
        players: pagination.slice(&players),
    })
}

pub async fn player_details(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PlayerDetails>, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("Player name is empty".to_string()));
    }

    state
        .analysis
        .player_details(&name)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Player '{}'", name)))
}

#[derive(Debug, Serialize)]
pub struct AttackSummaryResponse {
    pub attackers: Vec<PlayerAttackSummary>,
}

pub async fn attack_summary(State(state): State<AppState>) -> Json<AttackSummaryResponse> {
    Json(AttackSummaryResponse {
        attackers: state.analysis.attack_summaries(),
    })
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::test_support::{get_json, loaded_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_players_paginated() {
        let (status, json) = get_json(
            build_router(loaded_state()),
            "/api/players?page=1&page_size=1",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["players"].as_array().unwrap().len(), 1);
        assert_eq!(json["players"][0]["name"], "Alice");
        assert_eq!(json["pagination"]["total_items"], 2);
        assert_eq!(json["pagination"]["has_next"], true);
    }

    #[tokio::test]
    async fn test_list_players_last_possible_page() {
        let (status, json) = get_json(
            build_router(loaded_state()),
            "/api/players?page=4294967295&page_size=100",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["players"].as_array().unwrap().is_empty());
        assert_eq!(json["pagination"]["has_next"], false);
        assert_eq!(json["pagination"]["has_prev"], true);
    }

    #[tokio::test]
    async fn test_player_details_found() {
        let (status, json) = get_json(build_router(loaded_state()), "/api/players/ALI").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["total_attacks"], 2);
        assert_eq!(json["efficiency_tier"], "High");
    }

    #[tokio::test]
    async fn test_player_details_not_found() {
        let (status, json) = get_json(build_router(loaded_state()), "/api/players/nobody").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_attack_summary() {
        let (status, json) = get_json(build_router(loaded_state()), "/api/attacks").await;

        assert_eq!(status, StatusCode::OK);
        let bob = json["attackers"]
            .as_array()
            .unwrap()
            .iter()
            .find(|a| a["attacker_name"] == "Bob")
            .unwrap()
            .clone();
        assert_eq!(bob["attacks"], "1/2");
        assert_eq!(bob["defeats"], 1);
    }
}

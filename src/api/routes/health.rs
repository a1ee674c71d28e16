use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub events_loaded: usize,
    pub snapshot_id: Option<String>,
    pub roster_loaded: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let analysis = &state.analysis;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        events_loaded: analysis.events().len(),
        snapshot_id: analysis.snapshot().map(|s| s.to_string()),
        roster_loaded: analysis.roster().is_some(),
    })
}

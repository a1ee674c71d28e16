use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::models::TwSummary;

pub async fn summary(State(state): State<AppState>) -> Json<TwSummary> {
    Json(state.analysis.summary())
}

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::ParticipationReport;

#[derive(Debug, Deserialize)]
pub struct ParticipationParams {
    pub min_banners: Option<u32>,
    pub min_attacks: Option<u32>,
    /// Include roster-only players (default true)
    pub roster: Option<bool>,
}

pub async fn participation(
    State(state): State<AppState>,
    Query(params): Query<ParticipationParams>,
) -> Result<Json<ParticipationReport>, ApiError> {
    let mut options = state.analysis.participation_options();
    if let Some(min_banners) = params.min_banners {
        options.min_banners = min_banners;
    }
    if let Some(min_attacks) = params.min_attacks {
        if min_attacks == 0 {
            return Err(ApiError::BadRequest(
                "min_attacks must be greater than 0".to_string(),
            ));
        }
        options.min_attacks = min_attacks;
    }

    Ok(Json(state.analysis.participation_report(
        options,
        params.roster.unwrap_or(true),
    )))
}

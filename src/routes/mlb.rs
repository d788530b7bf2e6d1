use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::models::mlb::MlbPythagoreanTeam;
use crate::state::AppState;
use crate::stats::baseball;

// GET /mlb/pythagorean - Expected win % from runs scored and allowed
pub async fn pythagorean(
    State(state): State<AppState>,
) -> Result<Json<Vec<MlbPythagoreanTeam>>, ApiError> {
    let response = state
        .sportsfeeds()?
        .mlb_team_stats_totals()
        .await
        .map_err(ApiError::upstream("Failed to fetch MLB team stats"))?;

    let teams = response
        .team_stats_totals
        .iter()
        .map(baseball::pythagorean_team)
        .collect();

    Ok(Json(teams))
}

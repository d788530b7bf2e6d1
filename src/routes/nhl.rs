use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    response::Json,
};

use super::{load_csv, CsvQuery};
use crate::error::ApiError;
use crate::models::nhl::{
    AssistsStats, DangerZoneStats, GoalDifferentialStats, GoalsAgainstRanking, GoalsStats,
    ShotsToGoalStats, TimeToScoreStats,
};
use crate::state::AppState;
use crate::stats::{goal_diff, shots};

// GET /process-goals - Goals per team broken down by scorer position
pub async fn process_goals(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<BTreeMap<String, GoalsStats>>, ApiError> {
    let table = load_csv(&state, &query, "feb21shots.csv").await?;
    Ok(Json(shots::goals_by_position(&table)?))
}

// GET /process-assists - Assists per team by position and player
pub async fn process_assists(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<BTreeMap<String, AssistsStats>>, ApiError> {
    let table = load_csv(&state, &query, "shots_2024.csv").await?;
    Ok(Json(shots::assists_by_position(&table)?))
}

// GET /process-goals-against?season=2024 - Teams ranked by goals against per game
pub async fn process_goals_against(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<Vec<GoalsAgainstRanking>>, ApiError> {
    let table = load_csv(&state, &query, "march3.csv").await?;
    let season = query.season_or(&state.config.nhl_season);
    Ok(Json(shots::goals_against_rankings(&table, season)?))
}

// GET /process-goal-diff?season=2024 - Win rate by goal differential after two periods
pub async fn process_goal_diff(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<BTreeMap<String, GoalDifferentialStats>>, ApiError> {
    let table = load_csv(&state, &query, "feb21shots.csv").await?;
    let season = query.season_or(&state.config.nhl_season);
    Ok(Json(goal_diff::goal_differential(&table, season)?))
}

// GET /process-avgscoretime?season=2024 - Average minute of goals and opening goals
pub async fn process_avg_score_time(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<BTreeMap<String, TimeToScoreStats>>, ApiError> {
    let table = load_csv(&state, &query, "shots_2024.csv").await?;
    let season = query.season_or(&state.config.nhl_season);
    Ok(Json(shots::time_to_score(&table, season)?))
}

// GET /process-shotstogoals - Shot conversion per team
pub async fn process_shots_to_goals(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<BTreeMap<String, ShotsToGoalStats>>, ApiError> {
    let table = load_csv(&state, &query, "shotsfeb1.csv").await?;
    Ok(Json(shots::shots_to_goals(&table)?))
}

// GET /process-dangerzone - Teams ranked by share of slot shots allowed
pub async fn process_danger_zone(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<Vec<DangerZoneStats>>, ApiError> {
    let table = load_csv(&state, &query, "feb21shots.csv").await?;
    Ok(Json(shots::danger_zone(&table)?))
}

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;

use super::{load_csv, CsvQuery};
use crate::error::ApiError;
use crate::models::nhl::NhlPlayerDocument;
use crate::models::TrendLensSummary;
use crate::state::AppState;
use crate::stats::trendlens;
use crate::upstream::search_index::IndexTarget;

// GET /nhl/trendlens - Aggregate the shot export and push shooter documents to the index
pub async fn nhl_trendlens(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<TrendLensSummary>, ApiError> {
    let (index, index_name) = state.search_index(IndexTarget::Nhl)?;
    let table = load_csv(&state, &query, "march3.csv").await?;
    table.columns(trendlens::REQUIRED_COLUMNS)?;

    let now = Utc::now();
    let shots = trendlens::parse_shots(&table);
    let recent = trendlens::recent_window(&shots, now.naive_utc());
    tracing::info!(
        "Processing {} shots ({} in the recent window)",
        shots.len(),
        recent.len()
    );

    let season_players = trendlens::aggregate_players(&shots);
    let recent_players = trendlens::aggregate_players(recent.iter().copied());
    let games = trendlens::aggregate_games(&shots);

    let last_updated = now.to_rfc3339();
    let documents: Vec<NhlPlayerDocument> = season_players
        .values()
        .filter_map(|player| {
            trendlens::player_document(
                player,
                recent_players.get(&player.player_id),
                &last_updated,
            )
        })
        .collect();

    let saved = index
        .save_objects(index_name, &documents)
        .await
        .map_err(ApiError::upstream("Failed to save records to search index"))?;

    Ok(Json(TrendLensSummary {
        status: "success",
        player_count: Some(season_players.len()),
        game_count: Some(games.len()),
        records_saved: documents.len(),
        task_id: Some(saved.task_id),
        date: last_updated,
    }))
}

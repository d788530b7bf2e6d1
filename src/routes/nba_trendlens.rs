use std::collections::{BTreeSet, HashMap};

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{Days, Utc};

use super::DateQuery;
use crate::error::ApiError;
use crate::models::nba::{Matchup, NbaPlayerDocument, PlayerStatsEntry};
use crate::models::TrendLensSummary;
use crate::state::AppState;
use crate::stats::nba_trends;
use crate::stats::trendlens::RECENT_WINDOW_DAYS;
use crate::upstream::search_index::IndexTarget;
use crate::upstream::sportsfeeds::PlayerStatsQuery;

// GET /nba/trendlens?date=YYYYMMDD - Push season and recent-form documents for a slate's players
pub async fn nba_trendlens(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<TrendLensSummary>, ApiError> {
    let (index, index_name) = state.search_index(IndexTarget::Nba)?;
    let feeds = state.sportsfeeds()?;
    let season = &state.config.nba_season;

    // Defaults to yesterday's slate so the window ends on finished games
    let date = query.slate(1)?;
    let games = feeds
        .games_on(season, date)
        .await
        .map_err(ApiError::upstream("Error fetching schedule"))?;

    let teams: Vec<String> = games
        .iter()
        .map(Matchup::from)
        .flat_map(|m| [m.home_team.to_lowercase(), m.away_team.to_lowercase()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if teams.is_empty() {
        tracing::info!("No NBA games on {}, nothing to index", date);
        return Ok(Json(TrendLensSummary {
            status: "success",
            player_count: None,
            game_count: None,
            records_saved: 0,
            task_id: None,
            date: Utc::now().to_rfc3339(),
        }));
    }

    let window_start = date - Days::new(RECENT_WINDOW_DAYS as u64);
    let window = feeds
        .player_stats_totals(
            season,
            &PlayerStatsQuery {
                teams: &teams,
                date_range: Some((window_start, date)),
                ..Default::default()
            },
        )
        .await
        .map_err(ApiError::upstream("Error fetching player stats"))?;

    let season_totals = feeds
        .player_stats_totals(
            season,
            &PlayerStatsQuery {
                teams: &teams,
                ..Default::default()
            },
        )
        .await
        .map_err(ApiError::upstream("Error fetching current stats"))?;

    let window_by_player: HashMap<i64, &PlayerStatsEntry> = window
        .player_stats_totals
        .iter()
        .map(|entry| (entry.player.id, entry))
        .collect();

    let last_updated = Utc::now().to_rfc3339();
    let documents: Vec<NbaPlayerDocument> = season_totals
        .player_stats_totals
        .iter()
        .map(|entry| {
            nba_trends::player_document(
                entry,
                window_by_player.get(&entry.player.id).copied(),
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
        player_count: None,
        game_count: None,
        records_saved: documents.len(),
        task_id: Some(saved.task_id),
        date: Utc::now().to_rfc3339(),
    }))
}

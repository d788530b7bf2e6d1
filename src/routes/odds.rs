use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::odds::OddsEvent;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    /// `sport` groups events by their sport title.
    #[serde(rename = "groupBy")]
    pub group_by: Option<String>,
}

/// Buckets events under their `sport_title`.
pub fn group_by_sport(events: Vec<OddsEvent>) -> BTreeMap<String, Vec<OddsEvent>> {
    let mut grouped: BTreeMap<String, Vec<OddsEvent>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.sport_title.clone()).or_default().push(event);
    }
    grouped
}

// GET /nhl-events - Upcoming NHL events
pub async fn nhl_events(State(state): State<AppState>) -> Result<Json<Vec<OddsEvent>>, ApiError> {
    let events = state
        .odds()?
        .nhl_events()
        .await
        .map_err(ApiError::upstream("Failed to fetch events"))?;

    Ok(Json(events))
}

// GET /upcoming-events?groupBy=sport - Upcoming events across sports with h2h and spread odds
pub async fn upcoming_events(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Response, ApiError> {
    let events = state
        .odds()?
        .upcoming_odds()
        .await
        .map_err(ApiError::upstream("Failed to fetch events"))?;

    match query.group_by.as_deref() {
        Some("sport") => Ok(Json(group_by_sport(events)).into_response()),
        Some(other) => Err(ApiError::bad_request(format!(
            "Unsupported groupBy value '{}'",
            other
        ))),
        None => Ok(Json(events).into_response()),
    }
}

// GET /nba/games-today - NBA odds from the preferred sportsbooks
pub async fn nba_games_today(
    State(state): State<AppState>,
) -> Result<Json<Vec<OddsEvent>>, ApiError> {
    let events = state
        .odds()?
        .nba_odds()
        .await
        .map_err(ApiError::upstream("Failed to fetch events"))?;

    let filtered: Vec<OddsEvent> = events
        .into_iter()
        .filter_map(|mut event| {
            event.retain_preferred_bookmakers();
            (!event.bookmakers.is_empty()).then_some(event)
        })
        .collect();

    Ok(Json(filtered))
}

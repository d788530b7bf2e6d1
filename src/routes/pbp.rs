use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::nba::{MatchupInsight, RelativeEfficiency, SubunitStats, TeamScatterEfficiency};
use crate::state::AppState;
use crate::upstream::pbpstats::{PbpStatsClient, ScatterAxes};

const SCATTER_SEASON: &str = "2023-24";
const EFFICIENCY_SEASON: &str = "2024-25";

/// Team names pbpstats accepts on the relative efficiency endpoint.
const EFFICIENCY_TEAMS: [&str; 28] = [
    "Lakers", "Celtics", "Nets", "Warriors", "Bucks", "Heat", "Suns", "76ers", "Knicks",
    "Mavericks", "Timberwolves", "Nuggets", "Clippers", "Raptors", "Kings", "Pelicans", "Hawks",
    "Bulls", "Magic", "Hornets", "Cavaliers", "Pistons", "Pacers", "Thunder", "Wizards", "Spurs",
    "Jazz", "Rockets",
];

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterQuery {
    pub season: Option<String>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub x_axis_type: Option<String>,
    pub y_axis_type: Option<String>,
}

impl ScatterQuery {
    fn axes(self) -> ScatterAxes {
        let defaults = ScatterAxes::default();
        ScatterAxes {
            x_axis: non_empty(self.x_axis).unwrap_or(defaults.x_axis),
            y_axis: non_empty(self.y_axis).unwrap_or(defaults.y_axis),
            x_axis_type: non_empty(self.x_axis_type).unwrap_or(defaults.x_axis_type),
            y_axis_type: non_empty(self.y_axis_type).unwrap_or(defaults.y_axis_type),
        }
    }
}

// GET /nba/teamscatterplot - Team scatter plot data with configurable axes
pub async fn team_scatter_plot(
    State(state): State<AppState>,
    Query(mut query): Query<ScatterQuery>,
) -> Result<Json<Vec<TeamScatterEfficiency>>, ApiError> {
    let season = non_empty(query.season.take()).unwrap_or_else(|| SCATTER_SEASON.to_string());
    let data = state
        .pbpstats()
        .team_scatter(&season, &query.axes())
        .await
        .map_err(ApiError::upstream("Failed to fetch scatter plot data"))?;

    Ok(Json(data))
}

#[derive(Debug, Default, Deserialize)]
pub struct SeasonQuery {
    pub season: Option<String>,
}

// GET /nba/relative-efficiency?season=2024-25 - Relative off/def efficiency for each team
pub async fn relative_efficiency(
    State(state): State<AppState>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<BTreeMap<String, RelativeEfficiency>>, ApiError> {
    let season = non_empty(query.season).unwrap_or_else(|| EFFICIENCY_SEASON.to_string());
    let client = state.pbpstats();

    let mut teams = BTreeMap::new();
    for team in EFFICIENCY_TEAMS {
        let efficiency = client.relative_efficiency(team).await.map_err(|e| {
            tracing::error!("Failed to fetch efficiency for {}: {}", team, e);
            ApiError::upstream("Failed to fetch relative efficiency")(e)
        })?;
        if efficiency.season == season {
            teams.insert(team.to_string(), efficiency);
        }
    }

    Ok(Json(teams))
}

#[derive(Debug, Default, Deserialize)]
pub struct SubunitQuery {
    pub league: Option<String>,
    pub players: Option<String>,
}

// GET /nba/subunit?league=nba&players=... - Efficiency of a lineup subunit
pub async fn subunit(
    State(state): State<AppState>,
    Query(query): Query<SubunitQuery>,
) -> Result<Json<Vec<SubunitStats>>, ApiError> {
    let league = non_empty(query.league).unwrap_or_else(|| "nba".to_string());
    let players = non_empty(query.players)
        .ok_or_else(|| ApiError::bad_request("players query parameter is required"))?;

    let stats = state
        .pbpstats()
        .subunit_stats(&league, &players)
        .await
        .map_err(ApiError::upstream("Failed to fetch subunit stats"))?;

    Ok(Json(stats))
}

/// pbpstats names live teams by full name; the efficiency and shot
/// endpoints key on the leading three characters.
fn team_code(name: &str) -> String {
    name.chars().take(3).collect()
}

async fn matchup_insight(
    client: &PbpStatsClient<'_>,
    home: &str,
    away: &str,
) -> Result<MatchupInsight, crate::upstream::UpstreamError> {
    let home_eff = client.relative_efficiency(home).await?;
    let away_eff = client.relative_efficiency(away).await?;
    let home_shot = client.shot_query(home).await?;
    let away_shot = client.shot_query(away).await?;

    Ok(MatchupInsight {
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_off_eff: home_eff.relative_off_efficiency,
        home_def_eff: home_eff.relative_def_efficiency,
        away_off_eff: away_eff.relative_off_efficiency,
        away_def_eff: away_eff.relative_def_efficiency,
        home_shot_quality: home_shot.shot_quality,
        away_shot_quality: away_shot.shot_quality,
    })
}

// GET /nba/daily-matchups - Efficiency and shot quality for today's live games
pub async fn daily_matchups(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchupInsight>>, ApiError> {
    let client = state.pbpstats();
    let live = client
        .live_games()
        .await
        .map_err(ApiError::upstream("Failed to fetch matchups"))?;

    let mut insights = Vec::new();
    for game in &live.game_data {
        let (home, away) = (team_code(&game.home), team_code(&game.away));
        match matchup_insight(&client, &home, &away).await {
            Ok(insight) => insights.push(insight),
            Err(e) => tracing::warn!("Skipping {} vs {}: {}", home, away, e),
        }
    }

    if insights.is_empty() {
        return Err(ApiError::NoData(
            "No data available for today's matchups".to_string(),
        ));
    }

    Ok(Json(insights))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_codes_are_three_chars() {
        assert_eq!(team_code("Boston Celtics"), "Bos");
        assert_eq!(team_code("LA"), "LA");
    }

    #[test]
    fn blank_axes_fall_back_to_defaults() {
        let axes = ScatterQuery {
            x_axis: Some("".to_string()),
            y_axis: Some("Pace".to_string()),
            ..Default::default()
        }
        .axes();
        assert_eq!(axes.x_axis, "PtsPer100Poss");
        assert_eq!(axes.y_axis, "Pace");
        assert_eq!(axes.x_axis_type, "Team");
    }
}

use reqwest::Client;

use super::{read_json, UpstreamError};
use crate::models::nba::{LiveGamesResponse, RelativeEfficiency, ShotQuery, SubunitStats, TeamScatterEfficiency};

/// Axes for the team scatter plot endpoint.
#[derive(Debug, Clone)]
pub struct ScatterAxes {
    pub x_axis: String,
    pub y_axis: String,
    pub x_axis_type: String,
    pub y_axis_type: String,
}

impl Default for ScatterAxes {
    fn default() -> Self {
        Self {
            x_axis: "PtsPer100Poss".to_string(),
            y_axis: "SecondsPerPoss".to_string(),
            x_axis_type: "Team".to_string(),
            y_axis_type: "Team".to_string(),
        }
    }
}

/// pbpstats.com public API. No credentials.
pub struct PbpStatsClient<'a> {
    pub http: &'a Client,
    pub base_url: &'a str,
}

impl PbpStatsClient<'_> {
    pub async fn team_scatter(
        &self,
        season: &str,
        axes: &ScatterAxes,
    ) -> Result<Vec<TeamScatterEfficiency>, UpstreamError> {
        let url = format!("{}/get-scatter-plots/nba", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("Season", season),
                ("SeasonType", "Regular Season"),
                ("Xaxis", axes.x_axis.as_str()),
                ("Yaxis", axes.y_axis.as_str()),
                ("XaxisType", axes.x_axis_type.as_str()),
                ("YaxisType", axes.y_axis_type.as_str()),
            ])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn relative_efficiency(&self, team: &str) -> Result<RelativeEfficiency, UpstreamError> {
        let url = format!("{}/get-relative-off-def-efficiency/nba", self.base_url);
        let response = self.http.get(&url).query(&[("team", team)]).send().await?;
        read_json(response).await
    }

    pub async fn subunit_stats(&self, league: &str, players: &str) -> Result<Vec<SubunitStats>, UpstreamError> {
        let url = format!("{}/get-lineup-subunit-stats/{}", self.base_url, league);
        let response = self
            .http
            .get(&url)
            .query(&[("players", players)])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn live_games(&self) -> Result<LiveGamesResponse, UpstreamError> {
        let url = format!("{}/live/games/nba", self.base_url);
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    pub async fn shot_query(&self, team: &str) -> Result<ShotQuery, UpstreamError> {
        let url = format!("{}/get-shot-query-data/nba", self.base_url);
        let response = self.http.get(&url).query(&[("team", team)]).send().await?;
        read_json(response).await
    }
}

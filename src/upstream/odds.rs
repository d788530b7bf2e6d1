use reqwest::Client;

use super::{read_json, UpstreamError};
use crate::models::odds::OddsEvent;

const ODDS_QUERY: [(&str, &str); 3] = [
    ("regions", "us"),
    ("markets", "h2h,spreads"),
    ("oddsFormat", "american"),
];

/// The Odds API v4, keyed by `apiKey` query parameter.
pub struct OddsClient<'a> {
    pub http: &'a Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

impl OddsClient<'_> {
    pub async fn nhl_events(&self) -> Result<Vec<OddsEvent>, UpstreamError> {
        let url = format!("{}/sports/icehockey_nhl/events", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key), ("dateFormat", "iso")])
            .send()
            .await?;

        let events: Vec<OddsEvent> = read_json(response).await?;
        tracing::debug!("Fetched {} NHL events", events.len());
        Ok(events)
    }

    pub async fn upcoming_odds(&self) -> Result<Vec<OddsEvent>, UpstreamError> {
        self.sport_odds("upcoming").await
    }

    pub async fn nba_odds(&self) -> Result<Vec<OddsEvent>, UpstreamError> {
        self.sport_odds("basketball_nba").await
    }

    async fn sport_odds(&self, sport: &str) -> Result<Vec<OddsEvent>, UpstreamError> {
        let url = format!("{}/sports/{}/odds", self.base_url, sport);
        let response = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key)])
            .query(&ODDS_QUERY)
            .send()
            .await?;

        if let Some(remaining) = response.headers().get("x-requests-remaining") {
            tracing::info!(
                "Odds API requests remaining: {}",
                remaining.to_str().unwrap_or("?")
            );
        }

        read_json(response).await
    }
}

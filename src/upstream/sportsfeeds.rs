use std::num::NonZeroU32;
use std::time::Duration;

use chrono::NaiveDate;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::{decode, read_body, UpstreamError};
use crate::models::mlb::MlbTeamStatsResponse;
use crate::models::nba::{FeedGame, GamesResponse, PlayerStatsTotalsResponse, TeamStatsTotalsResponse};

const MAX_ATTEMPTS: u32 = 3;
const BASIC_AUTH_PASSWORD: &str = "MYSPORTSFEEDS";

/// Shared outbound budget for every MySportsFeeds call in the process.
pub fn feed_limiter(requests_per_minute: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_minute(requests_per_minute))
}

/// Filters for `player_stats_totals.json`. Empty fields are left off the URL.
#[derive(Debug, Default)]
pub struct PlayerStatsQuery<'q> {
    pub teams: &'q [String],
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub player: Option<&'q str>,
}

impl PlayerStatsQuery<'_> {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.teams.is_empty() {
            params.push(("team", self.teams.join(",")));
        }
        if let Some((from, to)) = self.date_range {
            params.push((
                "date",
                format!("{}-{}", from.format("%Y%m%d"), to.format("%Y%m%d")),
            ));
        }
        if let Some(player) = self.player {
            params.push(("player", player.to_string()));
        }
        params
    }
}

pub struct SportsFeedsClient<'a> {
    pub http: &'a Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub limiter: &'a DefaultDirectRateLimiter,
    pub backoff: Duration,
}

impl SportsFeedsClient<'_> {
    pub async fn team_stats_totals(
        &self,
        season: &str,
        team: Option<&str>,
    ) -> Result<TeamStatsTotalsResponse, UpstreamError> {
        let url = format!("{}/nba/{}/team_stats_totals.json", self.base_url, season);
        let params: Vec<(&str, String)> = team
            .map(|t| vec![("team", t.to_string())])
            .unwrap_or_default();

        decode_or_default(self.get(&url, &params).await?)
    }

    pub async fn player_stats_totals(
        &self,
        season: &str,
        query: &PlayerStatsQuery<'_>,
    ) -> Result<PlayerStatsTotalsResponse, UpstreamError> {
        let url = format!("{}/nba/{}/player_stats_totals.json", self.base_url, season);
        decode_or_default(self.get(&url, &query.params()).await?)
    }

    /// Games scheduled on `date`. A 204 from the feed means an empty slate.
    pub async fn games_on(&self, season: &str, date: NaiveDate) -> Result<Vec<FeedGame>, UpstreamError> {
        let url = format!(
            "{}/nba/{}/date/{}/games.json",
            self.base_url,
            season,
            date.format("%Y%m%d")
        );

        let response: GamesResponse = decode_or_default(self.get(&url, &[]).await?)?;
        Ok(response.games)
    }

    pub async fn mlb_team_stats_totals(&self) -> Result<MlbTeamStatsResponse, UpstreamError> {
        let url = format!("{}/mlb/current/team_stats_totals.json", self.base_url);
        decode_or_default(self.get(&url, &[]).await?)
    }

    /// Sends one GET, retrying on 429. `None` means the feed answered 204.
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Option<String>, UpstreamError> {
        for attempt in 0..MAX_ATTEMPTS {
            if self.limiter.check().is_err() {
                tracing::warn!("MySportsFeeds request budget exhausted, refusing {}", url);
                return Err(UpstreamError::RateLimited);
            }

            let response = self
                .http
                .get(url)
                .basic_auth(self.api_key, Some(BASIC_AUTH_PASSWORD))
                .query(params)
                .send()
                .await?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    if attempt + 1 < MAX_ATTEMPTS {
                        let wait = self.backoff * 2u32.pow(attempt);
                        tracing::warn!(
                            "MySportsFeeds returned 429 on attempt {}, retrying in {:?}",
                            attempt + 1,
                            wait
                        );
                        tokio::time::sleep(wait).await;
                    }
                }
                StatusCode::NO_CONTENT => return Ok(None),
                _ => return read_body(response).await.map(Some),
            }
        }

        Err(UpstreamError::RetriesExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }
}

/// An empty (204) answer decodes to the payload's empty value.
fn decode_or_default<T: DeserializeOwned + Default>(body: Option<String>) -> Result<T, UpstreamError> {
    match body {
        Some(body) => decode(&body),
        None => Ok(T::default()),
    }
}

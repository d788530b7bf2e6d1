use std::sync::Arc;

use governor::DefaultDirectRateLimiter;
use reqwest::Client;

use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::odds::OddsClient;
use crate::upstream::pbpstats::PbpStatsClient;
use crate::upstream::search_index::{IndexTarget, SearchIndexClient};
use crate::upstream::sportsfeeds::{feed_limiter, SportsFeedsClient};
use crate::upstream::build_http_client;

/// Read-only state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
    feed_limiter: Arc<DefaultDirectRateLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = build_http_client(config.upstream_timeout)?;
        let feed_limiter = Arc::new(feed_limiter(config.feed_requests_per_minute));
        Ok(Self {
            config: Arc::new(config),
            http,
            feed_limiter,
        })
    }

    pub fn odds(&self) -> Result<OddsClient<'_>, ApiError> {
        let api_key = self
            .config
            .odds_api_key
            .as_deref()
            .ok_or(ApiError::MissingCredential("ODDS_API_KEY"))?;

        Ok(OddsClient {
            http: &self.http,
            base_url: &self.config.odds_base_url,
            api_key,
        })
    }

    pub fn sportsfeeds(&self) -> Result<SportsFeedsClient<'_>, ApiError> {
        let api_key = self
            .config
            .sportsfeeds_api_key
            .as_deref()
            .ok_or(ApiError::MissingCredential("MYSPORTSFEEDS_API_KEY"))?;

        Ok(SportsFeedsClient {
            http: &self.http,
            base_url: &self.config.sportsfeeds_base_url,
            api_key,
            limiter: &self.feed_limiter,
            backoff: self.config.retry_backoff,
        })
    }

    pub fn pbpstats(&self) -> PbpStatsClient<'_> {
        PbpStatsClient {
            http: &self.http,
            base_url: &self.config.pbpstats_base_url,
        }
    }

    /// Client plus target index name for pushing documents.
    pub fn search_index(
        &self,
        target: IndexTarget,
    ) -> Result<(SearchIndexClient<'_>, &str), ApiError> {
        let search = &self.config.search;
        let app_id = search
            .app_id
            .as_deref()
            .ok_or(ApiError::MissingCredential("ALGOLIA_APP_ID"))?;
        let api_key = search
            .api_key
            .as_deref()
            .ok_or(ApiError::MissingCredential("ALGOLIA_API_KEY"))?;
        let (name, env_name) = match target {
            IndexTarget::Nba => (search.nba_index.as_deref(), "ALGOLIA_NBA_INDEX_NAME"),
            IndexTarget::Nhl => (search.nhl_index.as_deref(), "ALGOLIA_NHL_INDEX_NAME"),
        };
        let name = name.ok_or(ApiError::MissingCredential(env_name))?;

        let client = SearchIndexClient::new(&self.http, search.base_url.as_deref(), app_id, api_key);
        Ok((client, name))
    }
}

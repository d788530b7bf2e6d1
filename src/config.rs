use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";
pub const SPORTSFEEDS_BASE_URL: &str = "https://api.mysportsfeeds.com/v2.1/pull";
pub const PBPSTATS_BASE_URL: &str = "https://api.pbpstats.com";
pub const FEED_REQUESTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(100).unwrap();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not in the correct format: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Credentials for the hosted search index that trend documents are pushed to.
#[derive(Debug, Clone, Default)]
pub struct SearchIndexConfig {
    pub app_id: Option<String>,
    pub api_key: Option<String>,
    /// Overrides `https://{app_id}.algolia.net`; used by tests.
    pub base_url: Option<String>,
    pub nba_index: Option<String>,
    pub nhl_index: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub cors_origin: String,
    pub odds_api_key: Option<String>,
    pub sportsfeeds_api_key: Option<String>,
    pub search: SearchIndexConfig,
    pub nba_season: String,
    pub nhl_season: String,
    pub upstream_timeout: Duration,
    /// First wait after a 429 from MySportsFeeds; doubles on each retry.
    pub retry_backoff: Duration,
    /// Outbound MySportsFeeds budget shared by every handler.
    pub feed_requests_per_minute: NonZeroU32,
    pub odds_base_url: String,
    pub sportsfeeds_base_url: String,
    pub pbpstats_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            data_dir: PathBuf::from("data"),
            cors_origin: "http://localhost:3000".to_string(),
            odds_api_key: None,
            sportsfeeds_api_key: None,
            search: SearchIndexConfig::default(),
            nba_season: "2024-2025-regular".to_string(),
            nhl_season: "2024".to_string(),
            upstream_timeout: Duration::from_secs(10),
            retry_backoff: Duration::from_secs(1),
            feed_requests_per_minute: FEED_REQUESTS_PER_MINUTE,
            odds_base_url: ODDS_API_BASE_URL.to_string(),
            sportsfeeds_base_url: SPORTSFEEDS_BASE_URL.to_string(),
            pbpstats_base_url: PBPSTATS_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first so a
    /// local `.env` file is honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys fall back to
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(host) = get("HOST") {
            config.host = host
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "HOST", value: host })?;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: port })?;
        }
        if let Some(secs) = get("UPSTREAM_TIMEOUT_SECS") {
            let parsed: u64 = secs.parse().map_err(|_| ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                value: secs,
            })?;
            config.upstream_timeout = Duration::from_secs(parsed);
        }
        if let Some(limit) = get("MYSPORTSFEEDS_REQUESTS_PER_MINUTE") {
            config.feed_requests_per_minute =
                limit.parse().map_err(|_| ConfigError::Invalid {
                    name: "MYSPORTSFEEDS_REQUESTS_PER_MINUTE",
                    value: limit,
                })?;
        }
        if let Some(dir) = get("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(origin) = get("CORS_ORIGIN") {
            config.cors_origin = origin;
        }
        if let Some(season) = get("NBA_SEASON") {
            config.nba_season = season;
        }
        if let Some(season) = get("NHL_SEASON") {
            config.nhl_season = season;
        }

        if let Some(url) = get("ODDS_API_BASE_URL") {
            config.odds_base_url = url;
        }
        if let Some(url) = get("MYSPORTSFEEDS_BASE_URL") {
            config.sportsfeeds_base_url = url;
        }
        if let Some(url) = get("PBPSTATS_BASE_URL") {
            config.pbpstats_base_url = url;
        }

        config.odds_api_key = get("ODDS_API_KEY");
        config.sportsfeeds_api_key = get("MYSPORTSFEEDS_API_KEY");
        config.search = SearchIndexConfig {
            app_id: get("ALGOLIA_APP_ID"),
            api_key: get("ALGOLIA_API_KEY"),
            base_url: get("ALGOLIA_BASE_URL"),
            nba_index: get("ALGOLIA_NBA_INDEX_NAME").or_else(|| get("ALGOLIA_INDEX_NAME")),
            nhl_index: get("ALGOLIA_NHL_INDEX_NAME"),
        };

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

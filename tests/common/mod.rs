#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use statpad::config::{Config, SearchIndexConfig};
use statpad::state::AppState;
use tower::ServiceExt;

pub const FEED_AUTH: &str = "Basic ZmVlZC1rZXk6TVlTUE9SVFNGRUVEUw==";

/// Config with every upstream pointed at `upstream` and every credential set.
pub fn config(data_dir: &Path, upstream: &str) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        odds_api_key: Some("odds-key".to_string()),
        sportsfeeds_api_key: Some("feed-key".to_string()),
        search: SearchIndexConfig {
            app_id: Some("APPID".to_string()),
            api_key: Some("search-key".to_string()),
            base_url: Some(upstream.to_string()),
            nba_index: Some("nba_players".to_string()),
            nhl_index: Some("nhl_players".to_string()),
        },
        retry_backoff: Duration::ZERO,
        odds_base_url: upstream.to_string(),
        sportsfeeds_base_url: upstream.to_string(),
        pbpstats_base_url: upstream.to_string(),
        ..Default::default()
    }
}

pub fn app(config: Config) -> Router {
    statpad::app(AppState::new(config).unwrap())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

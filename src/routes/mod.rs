//! Axum handlers, one module per data source. Handlers stay thin: pull
//! inputs, call into `stats`, wrap the result in `Json`.

pub mod health;
pub mod mlb;
pub mod nba;
pub mod nba_trendlens;
pub mod nhl;
pub mod nhl_trendlens;
pub mod odds;
pub mod pbp;

use std::sync::LazyLock;

use chrono::{Days, NaiveDate, Utc};
use chrono_tz::America::New_York;
use regex::Regex;
use serde::Deserialize;

use crate::csv_data::{resolve_data_path, CsvTable};
use crate::error::ApiError;
use crate::state::AppState;

static SLATE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("slate date pattern is valid"));

/// `?filePath=...&season=...` accepted by every CSV-backed route.
#[derive(Debug, Default, Deserialize)]
pub struct CsvQuery {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    pub season: Option<String>,
}

impl CsvQuery {
    pub fn season_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.season
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
    }
}

/// `?date=YYYYMMDD` on the schedule-driven NBA routes.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// Loads the requested CSV from the data directory, falling back to
/// `default_file` when no `filePath` was given.
pub async fn load_csv(
    state: &AppState,
    query: &CsvQuery,
    default_file: &str,
) -> Result<CsvTable, ApiError> {
    let path = resolve_data_path(&state.config.data_dir, query.file_path.as_deref(), default_file)?;
    tracing::debug!("Loading CSV from {}", path.display());
    CsvTable::load_async(path).await
}

/// Today's date on the US East coast, where the NBA schedules its slate.
pub fn today_eastern() -> NaiveDate {
    Utc::now().with_timezone(&New_York).date_naive()
}

pub fn parse_slate_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let raw = raw.trim();
    if !SLATE_DATE.is_match(raw) {
        return Err(ApiError::bad_request(format!(
            "Invalid date '{}', expected YYYYMMDD",
            raw
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map_err(|_| ApiError::bad_request(format!("Invalid date '{}'", raw)))
}

impl DateQuery {
    /// The requested slate date, or today (Eastern) minus `days_back`.
    pub fn slate(&self, days_back: u64) -> Result<NaiveDate, ApiError> {
        match self.date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(raw) => parse_slate_date(raw),
            None => Ok(today_eastern() - Days::new(days_back)),
        }
    }
}

pub mod mlb;
pub mod nba;
pub mod nhl;
pub mod odds;

use serde::Serialize;

/// Result of pushing a batch of trend documents to the search index.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendLensSummary {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_count: Option<usize>,
    pub records_saved: usize,
    #[serde(rename = "taskID", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    pub date: String,
}

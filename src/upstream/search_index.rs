use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{read_json, UpstreamError};

/// Which player index a batch goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    Nba,
    Nhl,
}

#[derive(Serialize)]
struct BatchRequest<'a, T: Serialize> {
    requests: Vec<BatchOperation<'a, T>>,
}

#[derive(Serialize)]
struct BatchOperation<'a, T: Serialize> {
    action: &'static str,
    body: &'a T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    #[serde(rename = "taskID")]
    pub task_id: i64,
    #[serde(rename = "objectIDs", default)]
    pub object_ids: Vec<String>,
}

/// Write-only client for an Algolia-compatible index.
pub struct SearchIndexClient<'a> {
    pub http: &'a Client,
    pub base_url: String,
    pub app_id: &'a str,
    pub api_key: &'a str,
}

impl<'a> SearchIndexClient<'a> {
    pub fn new(http: &'a Client, base_url: Option<&str>, app_id: &'a str, api_key: &'a str) -> Self {
        let base_url = match base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.algolia.net", app_id),
        };
        Self {
            http,
            base_url,
            app_id,
            api_key,
        }
    }

    /// Upserts every document in one batch call. Documents must carry an
    /// `objectID`.
    pub async fn save_objects<T: Serialize>(
        &self,
        index: &str,
        documents: &[T],
    ) -> Result<BatchResponse, UpstreamError> {
        let url = format!("{}/1/indexes/{}/batch", self.base_url, index);
        let payload = BatchRequest {
            requests: documents
                .iter()
                .map(|body| BatchOperation {
                    action: "updateObject",
                    body,
                })
                .collect(),
        };

        let response = self
            .http
            .post(&url)
            .header("X-Algolia-Application-Id", self.app_id)
            .header("X-Algolia-API-Key", self.api_key)
            .json(&payload)
            .send()
            .await?;

        let saved: BatchResponse = read_json(response).await?;
        tracing::info!(
            "Saved {} records to index {} (task {})",
            documents.len(),
            index,
            saved.task_id
        );
        Ok(saved)
    }
}

//! Clients for the third-party APIs the handlers read from (and the search
//! index they write to).

pub mod odds;
pub mod pbpstats;
pub mod search_index;
pub mod sportsfeeds;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

const BODY_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("error parsing JSON: {source}, body preview: {preview}")]
    Decode {
        #[source]
        source: serde_json::Error,
        preview: String,
    },
    #[error("still rate limited after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
    #[error("outbound request budget exhausted")]
    RateLimited,
}

pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(5)
        .build()
}

/// Reads the body of a response, failing on any non-2xx status.
pub(crate) async fn read_body(response: Response) -> Result<String, UpstreamError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status,
            body: preview(&body),
        });
    }

    Ok(body)
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|source| UpstreamError::Decode {
        source,
        preview: preview(body),
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, UpstreamError> {
    let body = read_body(response).await?;
    decode(&body)
}

fn preview(body: &str) -> String {
    if body.chars().count() <= BODY_PREVIEW_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_bodies_are_truncated_in_errors() {
        let body = "x".repeat(250);
        let err = decode::<serde_json::Value>(&body).unwrap_err();
        match err {
            UpstreamError::Decode { preview, .. } => {
                assert_eq!(preview.len(), BODY_PREVIEW_CHARS + 3);
                assert!(preview.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_bodies_are_kept_whole() {
        assert_eq!(preview("{\"a\":"), "{\"a\":");
    }
}

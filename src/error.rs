use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to open CSV file")]
    CsvOpen(#[source] std::io::Error),
    #[error("Failed to parse CSV")]
    CsvParse(#[from] csv::Error),
    #[error("{0} is not set in the environment")]
    MissingCredential(&'static str),
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },
    /// Every upstream lookup behind a composite response failed.
    #[error("{0}")]
    NoData(String),
    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Wraps an upstream failure with what the handler was trying to fetch.
    pub fn upstream(context: &'static str) -> impl FnOnce(UpstreamError) -> Self {
        move |source| ApiError::Upstream { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream {
                source: UpstreamError::RateLimited,
                ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::CsvOpen(_)
            | ApiError::CsvParse(_)
            | ApiError::MissingCredential(_)
            | ApiError::Upstream { .. }
            | ApiError::NoData(_)
            | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "{}", self);
        }

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_bad_request() {
        assert_eq!(
            ApiError::bad_request("CSV does not contain required columns: event").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn rate_limited_upstream_is_unavailable() {
        let err = ApiError::upstream("Failed to fetch team stats")(UpstreamError::RateLimited);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().starts_with("Failed to fetch team stats"));
    }

    #[test]
    fn missing_file_is_server_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ApiError::CsvOpen(io).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Error types for the gateway.
//!
//! Every variant maps to a fixed client-facing message; details only go to
//! the server log.

use axum::Json;
use axum::http::header::ALLOW;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ErrorBody;

/// Failures talking to the event store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request to event store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("event store rejected insert ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Errors surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("method not allowed")]
    MethodNotAllowed,

    /// Expected behaviour, not logged as an application error.
    #[error("rate limit exceeded for {client}")]
    RateLimited { client: String },

    #[error("event store credentials are not configured")]
    MissingConfig,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MissingConfig | ApiError::Store(_) | ApiError::Metrics(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::InvalidBody(_) => "Invalid request body.",
            ApiError::MethodNotAllowed => "Method not allowed.",
            ApiError::RateLimited { .. } => "Too many spam alerts.",
            ApiError::MissingConfig => "Server configuration error.",
            ApiError::Store(_) => "Failed to record event.",
            ApiError::Metrics(_) => "Failed to collect metrics.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::RateLimited { client } => warn!(client = %client, "Rate limit exceeded"),
            ApiError::InvalidBody(e) => warn!(error = %e, "Rejected malformed body"),
            ApiError::MethodNotAllowed => {}
            other => error!(error = %other, "Request failed"),
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        let mut response = (self.status(), Json(body)).into_response();
        if let ApiError::MethodNotAllowed = self {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("POST, OPTIONS"));
        }
        response
    }
}

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use axum::http::header::{REFERER, USER_AGENT};
use tracing::info;
use crate::client_key::ClientKey;
use crate::error::ApiError;
use crate::metrics::{EVENTS_LOGGED, RATE_LIMITED, REQUEST_TOTAL, STORE_FAILURES, TRACKED_CLIENTS};
use crate::models::{LoggedResponse, SecurityEventRecord, SecurityEventRequest};
use crate::state::AppState;

fn header_string(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

// Empty body counts as an empty report
fn parse_report(body: &[u8]) -> Result<SecurityEventRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SecurityEventRequest::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// POST /api/security-log
///
/// Admission is decided before the body is looked at, so malformed
/// reports still use up the client's quota.
pub async fn security_log_handler(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LoggedResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    let store = state.store.as_ref().ok_or(ApiError::MissingConfig)?;

    let decision = state.limiter.check_and_record(&client, state.limiter.now_millis());
    TRACKED_CLIENTS.set(state.limiter.tracked_keys() as f64);
    if !decision.is_admit() {
        RATE_LIMITED.inc();
        return Err(ApiError::RateLimited { client });
    }

    let report = parse_report(&body)?;
    let record = SecurityEventRecord::from_request(
        report,
        client,
        header_string(&headers, USER_AGENT),
        header_string(&headers, REFERER),
    );

    store
        .insert(&record)
        .await
        .inspect_err(|_| STORE_FAILURES.inc())?;
    EVENTS_LOGGED.inc();

    info!(
        client = %record.ip_address,
        event_type = %record.event_type,
        "Security event logged"
    );
    Ok(Json(LoggedResponse::logged()))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

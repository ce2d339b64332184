use crate::error::ApiError;
use crate::metrics::render;

// Prometheus scrape endpoint
pub async fn metrics_handler() -> Result<String, ApiError> {
    render().map_err(ApiError::from)
}

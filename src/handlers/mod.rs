mod health;
mod metrics;
mod security_log;

use axum::{Router, middleware, routing::{get, post}};
use crate::cors::cors;
use crate::state::AppState;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use security_log::{method_not_allowed, security_log_handler};

// Router with every route and the cors layer
pub fn router(state: AppState) -> Router {
    let cors_policy = state.cors.clone();

    Router::new()
        .route(
            "/api/security-log",
            post(security_log_handler).fallback(method_not_allowed),
        )
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(cors_policy, cors))
        .with_state(state)
}

use std::sync::Arc;
use crate::cors::CorsPolicy;
use crate::rate_limit::RateLimiter;
use crate::store::EventStore;
// app's shared state, built once at startup

#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub store: Option<Arc<dyn EventStore>>, // None when credentials are missing
    pub cors: CorsPolicy,
}

impl AppState {
    pub fn new(limiter: Arc<RateLimiter>, store: Option<Arc<dyn EventStore>>, cors: CorsPolicy) -> Self {
        Self { limiter, store, cors }
    }
}

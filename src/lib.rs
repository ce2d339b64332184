//! Intentia gateway - security event ingestion behind a per-client
//! fixed-window rate limiter, writing admitted events to a Supabase table.

pub mod client_key;
pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod store;

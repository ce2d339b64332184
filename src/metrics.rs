use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, TextEncoder, register_counter, register_gauge};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("intentia_gateway_requests_total", "Total security log requests").unwrap();
    pub static ref EVENTS_LOGGED: Counter =
        register_counter!("intentia_gateway_events_logged_total", "Security events written to the store").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("intentia_gateway_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref STORE_FAILURES: Counter =
        register_counter!("intentia_gateway_store_failures_total", "Failed writes to the event store").unwrap();
    pub static ref TRACKED_CLIENTS: Gauge =
        register_gauge!("intentia_gateway_tracked_clients", "Client keys currently held by the rate limiter").unwrap();
}

// Text exposition of everything in the default registry
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

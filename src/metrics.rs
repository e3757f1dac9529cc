use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("marine_requests_total", "Total number of forecast requests").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("marine_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref UPSTREAM_ERRORS: Counter =
        register_counter!("marine_upstream_errors_total", "Failed upstream forecast fetches").unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "marine_upstream_latency_seconds",
        "Upstream forecast fetch latency in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_CLIENTS: Gauge =
        register_gauge!("marine_rate_limit_clients", "Client keys tracked by the rate limiter").unwrap();
}

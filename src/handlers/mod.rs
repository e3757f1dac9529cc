mod cors;
mod forecast;
mod health;
mod metrics;

pub use cors::cors_middleware;
pub use forecast::{client_identity, forecast_handler, method_not_allowed, zone_from_path};
pub use health::health_handler;
pub use metrics::metrics_handler;

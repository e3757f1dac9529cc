//! JSON proxy for NWS plain-text marine zone forecasts.
//!
//! ```text
//! GET /marine-forecast/{zone}
//!     → cors (preflight short-circuit, allow-origin on every response)
//!     → rate limit by client address
//!     → zone allow-list
//!     → upstream fetch → JSON envelope
//! ```

pub mod config;
pub mod error;
pub mod forecast;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod zones;

use axum::{
    Router, middleware,
    routing::{MethodFilter, get, on},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    cors_middleware, forecast_handler, health_handler, metrics_handler, method_not_allowed,
};
use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    // GET only; `get` would also route HEAD into the handler
    let forecast = on(MethodFilter::GET, forecast_handler).fallback(method_not_allowed);

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // bare prefix routes exist so a missing zone gets a JSON 400
        .route("/marine-forecast", forecast.clone())
        .route("/marine-forecast/", forecast.clone())
        // zone is the first segment; trailing segments are ignored
        .route("/marine-forecast/{*rest}", forecast)
        .layer(middleware::from_fn_with_state(state.clone(), cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

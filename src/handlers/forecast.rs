use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::error::ApiError;
use crate::metrics::{RATE_LIMIT_CLIENTS, RATE_LIMITED, REQUEST_TOTAL, UPSTREAM_ERRORS, UPSTREAM_LATENCY};
use crate::state::AppState;

pub const ROUTE_PREFIX: &str = "/marine-forecast";
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=1800";

// Used when no forwarded header or peer address is available
const FALLBACK_CLIENT: &str = "127.0.0.1";

/// Picks the key a request is rate limited under: first `X-Forwarded-For`
/// hop, then `X-Real-IP`, then the socket peer.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| FALLBACK_CLIENT.to_string())
}

/// Returns the path segment right after `/marine-forecast/`, if non-empty.
pub fn zone_from_path(path: &str) -> Option<&str> {
    path.strip_prefix(ROUTE_PREFIX)?
        .strip_prefix('/')?
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

pub async fn forecast_handler(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    REQUEST_TOTAL.inc();

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_identity(request.headers(), peer);

    let admitted = state.rate_limiter.admit(&client);
    RATE_LIMIT_CLIENTS.set(state.rate_limiter.tracked_clients() as f64);
    if !admitted {
        RATE_LIMITED.inc();
        tracing::warn!(client = %client, "rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    let zone_id = zone_from_path(request.uri().path())
        .ok_or(ApiError::MissingZone)?
        .to_ascii_uppercase();

    if !state.zones.validate(Some(&zone_id)) {
        tracing::debug!(client = %client, zone = %zone_id, "rejected unknown zone");
        return Err(ApiError::InvalidZone);
    }

    let start_time = Instant::now();
    let result = state.fetcher.fetch(&zone_id).await;
    UPSTREAM_LATENCY.observe(start_time.elapsed().as_secs_f64());

    let forecast = result.inspect_err(|_| UPSTREAM_ERRORS.inc())?;
    tracing::info!(client = %client, zone = %zone_id, "served marine forecast");

    Ok((
        [(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE))],
        Json(forecast),
    )
        .into_response())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

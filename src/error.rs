use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::forecast::UpstreamError;
use crate::models::ErrorBody;

/// Everything a forecast request can fail with, mapped to a client-safe response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("zone id required")]
    MissingZone,
    #[error("invalid zone id")]
    InvalidZone,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingZone | ApiError::InvalidZone => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, message) = match self {
            ApiError::MethodNotAllowed => ("Method not allowed", None),
            ApiError::MissingZone => (
                "Zone ID required",
                Some("Provide a marine zone ID in the path, e.g. /marine-forecast/PKZ125"),
            ),
            ApiError::InvalidZone => (
                "Invalid zone ID",
                Some("The requested zone is not a supported marine zone"),
            ),
            ApiError::RateLimited => (
                "Rate limit exceeded",
                Some("Rate limit exceeded. Try again later."),
            ),
            // upstream status and cause are never exposed
            ApiError::Upstream(_) => (
                "Internal server error",
                Some("Unable to fetch forecast data"),
            ),
        };
        ErrorBody { error, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::MissingZone.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidZone.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::Upstream(UpstreamError::Status(StatusCode::BAD_GATEWAY)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_body_hides_cause() {
        let body = ApiError::Upstream(UpstreamError::Status(StatusCode::SERVICE_UNAVAILABLE)).body();
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("503"));
        assert!(json.contains("Unable to fetch forecast data"));
    }

    #[test]
    fn invalid_zone_carries_no_caller_input() {
        let body = ApiError::InvalidZone.body();
        assert_eq!(body.error, "Invalid zone ID");
        assert_eq!(ApiError::InvalidZone.to_string(), "invalid zone id");
    }
}

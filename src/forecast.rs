use chrono::Utc;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::models::ForecastResponse;

/// Failure talking to the upstream forecast provider.
///
/// Details stay in the logs; clients only ever see a generic 500.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream responded with HTTP {0}")]
    Status(StatusCode),
    #[error("failed to reach upstream forecast service")]
    Transport(#[source] reqwest::Error),
    #[error("failed to read upstream forecast body")]
    Body(#[source] reqwest::Error),
}

// Fetches plain-text zone forecasts, one GET per call, no retries
#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    client: Client,
    base_url: String,
}

impl ForecastFetcher {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // <base>/<first two letters>/<zone>.txt, all lowercase
    pub fn forecast_url(&self, zone_id: &str) -> String {
        let zone = zone_id.to_ascii_lowercase();
        let region: String = zone.chars().take(2).collect();
        format!("{}/{}/{}.txt", self.base_url, region, zone)
    }

    pub async fn fetch(&self, zone_id: &str) -> Result<ForecastResponse, UpstreamError> {
        let url = self.forecast_url(zone_id);
        tracing::debug!(zone = zone_id, %url, "fetching marine forecast");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(zone = zone_id, %url, error = %e, "upstream request failed");
                UpstreamError::Transport(e)
            })?;

        let status = res.status();
        if !status.is_success() {
            tracing::error!(zone = zone_id, %url, %status, "upstream returned error status");
            return Err(UpstreamError::Status(status));
        }

        let text = res.text().await.map_err(|e| {
            tracing::error!(zone = zone_id, %url, error = %e, "failed to read upstream body");
            UpstreamError::Body(e)
        })?;

        Ok(ForecastResponse::from_text(zone_id, &text, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: &str) -> ForecastFetcher {
        ForecastFetcher::with_client(Client::new(), base)
    }

    #[test]
    fn builds_lowercase_url_with_region_segment() {
        let f = fetcher("https://tgftp.nws.noaa.gov/data/forecasts/marine/coastal");
        assert_eq!(
            f.forecast_url("PKZ125"),
            "https://tgftp.nws.noaa.gov/data/forecasts/marine/coastal/pk/pkz125.txt"
        );
        assert_eq!(
            f.forecast_url("anz530"),
            "https://tgftp.nws.noaa.gov/data/forecasts/marine/coastal/an/anz530.txt"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let f = fetcher("http://127.0.0.1:9000/coastal/");
        assert_eq!(f.forecast_url("PKZ011"), "http://127.0.0.1:9000/coastal/pk/pkz011.txt");
    }

    #[test]
    fn status_error_message_carries_code() {
        let err = UpstreamError::Status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "upstream responded with HTTP 503 Service Unavailable");
    }
}

use axum::http::HeaderValue;
use clap::Parser;
use std::time::Duration;
use thiserror::Error;

use crate::rate_limit::RateLimitPolicy;
use crate::zones::{DEFAULT_ZONES, is_zone_format};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_UPSTREAM_BASE: &str = "https://tgftp.nws.noaa.gov/data/forecasts/marine/coastal";
pub const USER_AGENT: &str = concat!(
    "marine-forecast-proxy/",
    env!("CARGO_PKG_VERSION"),
    " (marine zone forecast proxy)"
);

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "marine-forecast-proxy")]
#[command(about = "Rate limited JSON proxy for NWS marine zone forecasts")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // The single frontend origin allowed by CORS
    #[arg(long, default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    // Base URL of the plain-text coastal forecasts
    #[arg(short, long, default_value = DEFAULT_UPSTREAM_BASE)]
    pub upstream_base: String,

    // Upstream request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub upstream_timeout: u64,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 60)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 3600)]
    pub rate_window: u64,

    // Zone allow-list override (comma-separated)
    // Example: "PKZ125,PKZ126"
    #[arg(short, long)]
    pub zones: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("allowed origin {0:?} is not a valid header value")]
    InvalidOrigin(String),
    #[error("at least one zone is required")]
    EmptyZoneList,
    #[error("zone {0:?} does not look like a marine zone id (expected e.g. PKZ125)")]
    MalformedZone(String),
    #[error("rate limit must allow at least one request per window")]
    ZeroRateLimit,
    #[error("failed to build upstream HTTP client")]
    HttpClient(#[from] reqwest::Error),
}

/// Immutable settings handed to each component at construction.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub allowed_origin: HeaderValue,
    pub upstream_base: String,
    pub user_agent: String,
    pub upstream_timeout: Duration,
    pub rate_limit: RateLimitPolicy,
    pub zones: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allowed_origin: HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
            upstream_base: DEFAULT_UPSTREAM_BASE.to_string(),
            user_agent: USER_AGENT.to_string(),
            upstream_timeout: Duration::from_secs(10),
            rate_limit: RateLimitPolicy::default(),
            zones: DEFAULT_ZONES.iter().map(|z| z.to_string()).collect(),
        }
    }
}

impl ProxyConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let allowed_origin = HeaderValue::from_str(args.allowed_origin.trim())
            .map_err(|_| ConfigError::InvalidOrigin(args.allowed_origin.clone()))?;

        if args.rate_limit == 0 {
            return Err(ConfigError::ZeroRateLimit);
        }

        let zones = match &args.zones {
            Some(list) => parse_zone_list(list)?,
            None => DEFAULT_ZONES.iter().map(|z| z.to_string()).collect(),
        };

        Ok(Self {
            allowed_origin,
            upstream_base: args.upstream_base.clone(),
            user_agent: USER_AGENT.to_string(),
            upstream_timeout: Duration::from_secs(args.upstream_timeout),
            rate_limit: RateLimitPolicy {
                max_requests: args.rate_limit,
                window: Duration::from_secs(args.rate_window),
            },
            zones,
        })
    }
}

// Parse "PKZ125, pkz126" into uppercase zone ids
pub fn parse_zone_list(list: &str) -> Result<Vec<String>, ConfigError> {
    let zones: Vec<String> = list
        .split(',')
        .map(|s| s.trim()) // remove spaces
        .filter(|s| !s.is_empty()) // remove empty strings
        .map(|s| s.to_ascii_uppercase())
        .collect();

    if zones.is_empty() {
        return Err(ConfigError::EmptyZoneList);
    }
    if let Some(bad) = zones.iter().find(|z| !is_zone_format(z)) {
        return Err(ConfigError::MalformedZone(bad.clone()));
    }
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["marine-forecast-proxy"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn defaults_match_deploy_constants() {
        let config = ProxyConfig::from_args(&args(&[])).unwrap();
        assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
        assert_eq!(config.upstream_base, DEFAULT_UPSTREAM_BASE);
        assert_eq!(config.rate_limit, RateLimitPolicy::default());
        assert_eq!(config.zones.len(), DEFAULT_ZONES.len());
        assert!(config.user_agent.starts_with("marine-forecast-proxy/"));
    }

    #[test]
    fn overrides_from_flags() {
        let config = ProxyConfig::from_args(&args(&[
            "--allowed-origin",
            "https://boats.example.org",
            "--rate-limit",
            "5",
            "--rate-window",
            "30",
            "--zones",
            "pkz125, PKZ126,,",
        ]))
        .unwrap();

        assert_eq!(config.allowed_origin, "https://boats.example.org");
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window, Duration::from_secs(30));
        assert_eq!(config.zones, vec!["PKZ125", "PKZ126"]);
    }

    #[test]
    fn rejects_bad_zone_lists() {
        assert!(matches!(parse_zone_list(" , ,"), Err(ConfigError::EmptyZoneList)));
        assert!(matches!(
            parse_zone_list("PKZ125,harbor"),
            Err(ConfigError::MalformedZone(z)) if z == "HARBOR"
        ));
    }

    #[test]
    fn rejects_invalid_origin_and_zero_limit() {
        assert!(matches!(
            ProxyConfig::from_args(&args(&["--allowed-origin", "bad\norigin"])),
            Err(ConfigError::InvalidOrigin(_))
        ));
        assert!(matches!(
            ProxyConfig::from_args(&args(&["--rate-limit", "0"])),
            Err(ConfigError::ZeroRateLimit)
        ));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PERIOD_NAME: &str = "Marine Forecast";

// Forecast envelope returned to the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastProperties {
    pub updated: DateTime<Utc>,
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    pub detailed_forecast: String,
    pub short_forecast: String,
}

impl ForecastResponse {
    /// Wraps a plain-text zone forecast as a single period.
    ///
    /// The text product carries no machine-readable issue time, so `updated`
    /// is the time the proxy fetched it.
    pub fn from_text(zone_id: &str, text: &str, updated: DateTime<Utc>) -> Self {
        Self {
            properties: ForecastProperties {
                updated,
                periods: vec![ForecastPeriod {
                    name: PERIOD_NAME.to_string(),
                    detailed_forecast: text.trim().to_string(),
                    short_forecast: format!("Marine conditions for {}", zone_id.to_ascii_uppercase()),
                }],
            },
        }
    }
}

// Error body: {"error": ..., "message": ...}
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

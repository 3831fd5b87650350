//! Tomorrow.io weather provider client
//!
//! One HTTP request per call, no internal retries. The outcome is classified
//! into [`UpstreamResult`] so the orchestrator can decide whether fallback
//! resolution applies.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{GatewayError, Result};
use crate::location::Location;
use crate::types::{DataShape, ForecastParams};

pub const DEFAULT_BASE_URL: &str = "https://api.tomorrow.io/v4";

/// Outcome of a single provider request
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResult {
    /// Provider returned a JSON payload
    Success(Value),
    /// Provider did not understand the location
    Rejected { status: u16, reason: String },
    /// Network, timeout, or any other provider failure
    TransportError(String),
}

/// Weather data source consulted on cache misses
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(
        &self,
        shape: DataShape,
        location: &Location,
        params: &ForecastParams,
    ) -> UpstreamResult;
}

/// HTTP client for the Tomorrow.io v4 API
#[derive(Debug, Clone)]
pub struct TomorrowClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TomorrowClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build weather HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn request_for(
        &self,
        shape: DataShape,
        location: &Location,
        params: &ForecastParams,
    ) -> reqwest::RequestBuilder {
        let location = location.to_string();

        match shape {
            DataShape::Realtime => self
                .client
                .get(format!("{}/weather/realtime", self.base_url))
                .query(&[("location", location.as_str()), ("apikey", self.api_key.as_str())]),
            DataShape::Forecast => {
                let (start, end) = params.window(Utc::now());
                self.client
                    .get(format!("{}/timelines", self.base_url))
                    .query(&[
                        ("location", location.as_str()),
                        ("fields", params.fields()),
                        ("timesteps", params.timesteps()),
                        ("startTime", start.as_str()),
                        ("endTime", end.as_str()),
                        ("units", params.units()),
                        ("timezone", params.timezone()),
                        ("apikey", self.api_key.as_str()),
                    ])
            }
        }
    }
}

/// Statuses the provider uses for a location it cannot interpret
fn is_location_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
    )
}

fn rejection_reason(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.chars().take(500).collect())
}

#[async_trait]
impl WeatherProvider for TomorrowClient {
    async fn fetch(
        &self,
        shape: DataShape,
        location: &Location,
        params: &ForecastParams,
    ) -> UpstreamResult {
        debug!("Fetching {:?} weather for {}", shape, location);

        let resp = match self
            .request_for(shape, location, params)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return UpstreamResult::TransportError(format!("weather request failed: {e}")),
        };

        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                return UpstreamResult::TransportError(format!("failed to read weather response: {e}"))
            }
        };

        if status.is_success() {
            return match serde_json::from_str(&body) {
                Ok(json) => UpstreamResult::Success(json),
                Err(e) => UpstreamResult::TransportError(format!("invalid weather JSON: {e}")),
            };
        }

        if is_location_rejection(status) {
            let reason = rejection_reason(&body);
            debug!("Provider rejected location {} ({}): {}", location, status, reason);
            return UpstreamResult::Rejected {
                status: status.as_u16(),
                reason,
            };
        }

        UpstreamResult::TransportError(format!(
            "weather provider returned {}: {}",
            status,
            rejection_reason(&body)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_statuses() {
        assert!(is_location_rejection(StatusCode::BAD_REQUEST));
        assert!(is_location_rejection(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!is_location_rejection(StatusCode::UNAUTHORIZED));
        assert!(!is_location_rejection(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_location_rejection(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_rejection_reason_prefers_message() {
        let body = r#"{"code":400001,"type":"Invalid Query Parameters","message":"The location is invalid"}"#;
        assert_eq!(rejection_reason(body), "The location is invalid");
        assert_eq!(rejection_reason("plain text"), "plain text");
    }
}

//! Request-side types shared by the orchestrator and the upstream client

use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cache::{CacheKey, CacheKeyBuilder};
use crate::error::{GatewayError, Result};
use crate::location::Location;

pub const DEFAULT_FIELDS: &str = "temperature";
pub const DEFAULT_TIMESTEPS: &str = "1h";
pub const DEFAULT_UNITS: &str = "imperial";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Forecast window used when the caller omits `startTime` or `endTime`
pub const DEFAULT_FORECAST_WINDOW_DAYS: i64 = 2;

/// Shape of the payload requested from the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataShape {
    /// Current conditions
    Realtime,
    /// Multi-step timeline
    Forecast,
}

/// Public weather endpoints, each with a fixed cache policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /weather?lat=&lon=`
    RealtimeByCoordinates,
    /// `GET /weather?loc=`
    RealtimeByLocation,
    /// `GET /weather-forecast?location=`
    Forecast,
}

impl Endpoint {
    pub fn shape(&self) -> DataShape {
        match self {
            Endpoint::RealtimeByCoordinates | Endpoint::RealtimeByLocation => DataShape::Realtime,
            Endpoint::Forecast => DataShape::Forecast,
        }
    }

    /// Fixed TTL for entries written by this endpoint
    pub fn ttl(&self) -> Duration {
        match self {
            Endpoint::RealtimeByCoordinates => Duration::from_secs(10 * 60),
            Endpoint::RealtimeByLocation => Duration::from_secs(60 * 60),
            Endpoint::Forecast => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Key namespace. Each namespace belongs to exactly one endpoint, so an
    /// entry is only ever served under the TTL it was written with.
    pub fn namespace(&self) -> &'static str {
        match self {
            Endpoint::RealtimeByCoordinates => "weather-latlon",
            Endpoint::RealtimeByLocation => "weather",
            Endpoint::Forecast => "weather-forecast",
        }
    }

    /// Cache key for a request. Always derived from the caller's original
    /// location, never from coordinates produced by fallback resolution.
    pub fn cache_key(&self, location: &Location, params: &ForecastParams) -> CacheKey {
        let builder = CacheKeyBuilder::new(self.namespace()).identifier(location.cache_component());

        match self.shape() {
            DataShape::Realtime => builder.build(),
            DataShape::Forecast => {
                let window = params.explicit_window();
                builder
                    .param("fields", params.fields())
                    .param("timesteps", params.timesteps())
                    .optional_param("startTime", window.map(|(start, _)| start))
                    .optional_param("endTime", window.map(|(_, end)| end))
                    .param("units", params.units())
                    .param("timezone", params.timezone())
                    .build()
            }
        }
    }
}

/// Optional forecast parameters as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastParams {
    pub fields: Option<String>,
    pub timesteps: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub units: Option<String>,
    pub timezone: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ForecastParams {
    pub fn fields(&self) -> &str {
        non_empty(&self.fields).unwrap_or(DEFAULT_FIELDS)
    }

    pub fn timesteps(&self) -> &str {
        non_empty(&self.timesteps).unwrap_or(DEFAULT_TIMESTEPS)
    }

    pub fn units(&self) -> &str {
        non_empty(&self.units).unwrap_or(DEFAULT_UNITS)
    }

    pub fn timezone(&self) -> &str {
        non_empty(&self.timezone).unwrap_or(DEFAULT_TIMEZONE)
    }

    /// Start and end as supplied, only when both are present
    pub fn explicit_window(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.start_time)?, non_empty(&self.end_time)?))
    }

    /// Effective forecast window; defaults to `now .. now + 2 days`
    pub fn window(&self, now: DateTime<Utc>) -> (String, String) {
        match self.explicit_window() {
            Some((start, end)) => (start.to_string(), end.to_string()),
            None => {
                let end = now + ChronoDuration::days(DEFAULT_FORECAST_WINDOW_DAYS);
                (
                    now.to_rfc3339_opts(SecondsFormat::Millis, true),
                    end.to_rfc3339_opts(SecondsFormat::Millis, true),
                )
            }
        }
    }
}

/// A weather request before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherQuery {
    pub location_raw: String,
    pub params: ForecastParams,
}

impl WeatherQuery {
    pub fn new(location_raw: impl Into<String>) -> Self {
        Self {
            location_raw: location_raw.into(),
            params: ForecastParams::default(),
        }
    }

    pub fn with_params(mut self, params: ForecastParams) -> Self {
        self.params = params;
        self
    }

    /// Reject an empty location before any I/O happens
    pub fn validate(&self) -> Result<()> {
        if self.location_raw.trim().is_empty() {
            return Err(GatewayError::Input("Missing required location".to_string()));
        }
        Ok(())
    }
}

//! API routes for the weather gateway

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{GatewayError, Result};
use crate::location::Coordinates;
use crate::news::{NewsArticle, NewsClient, NewsQuery};
use crate::orchestrator::WeatherService;
use crate::places::{PlacesClient, PlacesOp, PlacesQuery};
use crate::types::{Endpoint, ForecastParams, WeatherQuery};

/// Application state
///
/// A service is `None` when its provider credential is not configured.
pub struct AppState {
    pub weather: Option<WeatherService>,
    pub places: Option<PlacesClient>,
    pub news: Option<NewsClient>,
}

impl AppState {
    fn weather(&self) -> Result<&WeatherService> {
        self.weather
            .as_ref()
            .ok_or_else(|| GatewayError::Config("Missing WEATHER_API_KEY".to_string()))
    }

    fn places(&self) -> Result<&PlacesClient> {
        self.places
            .as_ref()
            .ok_or_else(|| GatewayError::Config("Missing GOOGLE_MAPS_API_KEY".to_string()))
    }

    fn news(&self) -> Result<&NewsClient> {
        self.news
            .as_ref()
            .ok_or_else(|| GatewayError::Config("News feed is not configured".to_string()))
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `GET /weather` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct RealtimeQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub loc: Option<String>,
}

/// `GET /weather-forecast` query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQuery {
    pub location: Option<String>,
    pub latlng: Option<String>,
    pub fields: Option<String>,
    pub timesteps: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub units: Option<String>,
    pub timezone: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Realtime conditions by `lat`/`lon` or by free-text `loc`
pub async fn weather(
    State(app_state): State<Arc<AppState>>,
    query: std::result::Result<Query<RealtimeQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let service = app_state.weather()?;
    let Query(params) = query?;

    let body = match (present(&params.lat), present(&params.lon), present(&params.loc)) {
        (Some(lat), Some(lon), _) => {
            let coords = Coordinates::from_parts(lat, lon)?;
            service
                .retrieve_location(
                    Endpoint::RealtimeByCoordinates,
                    coords.into(),
                    &ForecastParams::default(),
                )
                .await?
        }
        (_, _, Some(loc)) => {
            service
                .retrieve(Endpoint::RealtimeByLocation, &WeatherQuery::new(loc))
                .await?
        }
        _ => return Err(GatewayError::Input("Missing lat/lon".to_string())),
    };

    Ok(Json(body))
}

/// Forecast timeline for `location` (alias `latlng`)
pub async fn weather_forecast(
    State(app_state): State<Arc<AppState>>,
    query: std::result::Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let service = app_state.weather()?;
    let Query(params) = query?;

    let location = present(&params.location)
        .or_else(|| present(&params.latlng))
        .ok_or_else(|| {
            GatewayError::Input("Missing required query param: location (lat,lng)".to_string())
        })?;

    let query = WeatherQuery::new(location).with_params(ForecastParams {
        fields: params.fields,
        timesteps: params.timesteps,
        start_time: params.start_time,
        end_time: params.end_time,
        units: params.units,
        timezone: params.timezone,
    });

    let body = service.retrieve(Endpoint::Forecast, &query).await?;
    Ok(Json(body))
}

/// Pass-through places autocomplete / geocode / reverse geocode
pub async fn google_places(
    State(app_state): State<Arc<AppState>>,
    query: std::result::Result<Query<PlacesQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let client = app_state.places()?;
    let Query(params) = query?;
    let op = PlacesOp::from_query(&params)?;
    let body = client.execute(&op).await?;
    Ok(Json(body))
}

/// Weather headlines for `loc` from the news search feed
pub async fn news(
    State(app_state): State<Arc<AppState>>,
    query: std::result::Result<Query<NewsQuery>, QueryRejection>,
) -> Result<Json<Vec<NewsArticle>>> {
    let client = app_state.news()?;
    let Query(params) = query?;
    let articles = client.search(params.loc.as_deref().unwrap_or("")).await?;
    Ok(Json(articles))
}

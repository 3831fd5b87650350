//! Google Maps places proxy
//!
//! Thin pass-through for place autocomplete, geocoding by place id and
//! reverse geocoding. Bodies are returned unchanged.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{GatewayError, Result};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Query parameters accepted by `GET /google-places`
#[derive(Debug, Default, Deserialize)]
pub struct PlacesQuery {
    pub op: Option<String>,
    pub input: Option<String>,
    pub place_id: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// A validated places operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacesOp {
    Autocomplete { input: String },
    Geocode { place_id: String },
    Reverse { lat: String, lng: String },
}

impl PlacesOp {
    pub fn from_query(query: &PlacesQuery) -> Result<Self> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        match query.op.as_deref().unwrap_or("") {
            "autocomplete" => Ok(PlacesOp::Autocomplete {
                input: text(&query.input),
            }),
            "geocode" => Ok(PlacesOp::Geocode {
                place_id: text(&query.place_id),
            }),
            "reverse" | "reverse_geocode" => {
                let lat = text(&query.lat);
                let lng = text(&query.lng);
                if lat.is_empty() || lng.is_empty() {
                    return Err(GatewayError::Input(
                        "Missing lat or lng for reverse geocode".to_string(),
                    ));
                }
                Ok(PlacesOp::Reverse { lat, lng })
            }
            _ => Err(GatewayError::Input("invalid op".to_string())),
        }
    }
}

/// HTTP client for the Google Maps web services
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build places HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub async fn execute(&self, op: &PlacesOp) -> Result<Value> {
        let request = match op {
            PlacesOp::Autocomplete { input } => self
                .client
                .get(format!("{}/place/autocomplete/json", self.base_url))
                .query(&[
                    ("input", input.as_str()),
                    ("key", self.api_key.as_str()),
                    ("types", "geocode"),
                ]),
            PlacesOp::Geocode { place_id } => self
                .client
                .get(format!("{}/geocode/json", self.base_url))
                .query(&[("place_id", place_id.as_str()), ("key", self.api_key.as_str())]),
            PlacesOp::Reverse { lat, lng } => {
                let latlng = format!("{lat},{lng}");
                self.client
                    .get(format!("{}/geocode/json", self.base_url))
                    .query(&[("latlng", latlng.as_str()), ("key", self.api_key.as_str())])
            }
        };

        debug!("Forwarding places request: {:?}", op);

        let resp = request.send().await?;
        let body = resp.json::<Value>().await?;
        Ok(body)
    }
}

//! Fallback location resolution
//!
//! When the weather provider cannot interpret a free-text location, a
//! generative text service is asked for the place's coordinates. Its reply is
//! free-form prose; the first strict decimal `lat,lng` pair in it is used.
//!
//! Replies are not reproducible across calls, so a resolver is never assumed
//! idempotent and is invoked at most once per request.

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{GatewayError, Result};
use crate::location::Coordinates;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Resolves free-text locations into coordinates
///
/// Contract: returns the coordinates of the place, or fails with
/// [`GatewayError::Resolution`] when no coordinate pair could be produced.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, location: &str) -> Result<Coordinates>;
}

fn reply_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(-?\d+\.\d+),(-?\d+\.\d+)").expect("reply pattern is valid")
    })
}

/// Extract the first decimal coordinate pair from a free-form reply
pub fn extract_coordinates(location: &str, reply: &str) -> Result<Coordinates> {
    let caps = reply_pattern()
        .captures(reply)
        .ok_or_else(|| GatewayError::Resolution {
            location: location.to_string(),
            reason: "no coordinate pair in reply".to_string(),
        })?;

    let lat = caps[1].parse::<f64>();
    let lng = caps[2].parse::<f64>();

    match (lat, lng) {
        (Ok(lat), Ok(lng)) => Coordinates::new(lat, lng).ok_or_else(|| GatewayError::Resolution {
            location: location.to_string(),
            reason: format!("coordinates out of range: {lat},{lng}"),
        }),
        _ => Err(GatewayError::Resolution {
            location: location.to_string(),
            reason: format!("unparsable coordinate pair: {}", &caps[0]),
        }),
    }
}

/// Prompt asking for a single `'''lat,lng'''` answer, anchored by examples
pub fn build_prompt(location: &str) -> String {
    format!(
        "You convert place descriptions into geographic coordinates.\n\
         Reply with the latitude and longitude in decimal degrees, formatted exactly as \
         '''<lat>,<lng>''' with no spaces. Use negative numbers for south and west.\n\n\
         Examples:\n\
         Location: Madison, Wisconsin\n\
         Answer: '''43.0722,-89.4008'''\n\
         Location: Eiffel Tower\n\
         Answer: '''48.8584,2.2945'''\n\
         Location: Sydney Opera House\n\
         Answer: '''-33.8568,151.2153'''\n\n\
         Location: {location}\n\
         Answer:"
    )
}

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiResolver {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiResolver {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build resolver HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    fn reply_text(body: &Value) -> String {
        body.get("candidates")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LocationResolver for GeminiResolver {
    async fn resolve(&self, location: &str) -> Result<Coordinates> {
        info!("Resolving free-text location via {}: {}", self.model, location);

        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(location) }]
            }]
        });

        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Transport(format!(
                "generative service returned {}: {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let body: Value = resp.json().await?;
        let reply = Self::reply_text(&body);
        debug!("Resolver reply for {}: {}", location, reply);

        extract_coordinates(location, &reply)
    }
}

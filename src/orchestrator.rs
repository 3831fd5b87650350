//! Weather retrieval pipeline
//!
//! Per request:
//!
//! 1. normalize the location (coordinates or free text)
//! 2. read the cache; a hit is returned as-is
//! 3. on a miss, query the provider
//! 4. if the provider rejects a free-text location, resolve it to coordinates
//!    once and retry the provider exactly once
//! 5. write successful payloads back under the original location's key
//!
//! All I/O within one request is sequential. Concurrent identical misses may
//! each reach the provider and overwrite the same key; last writer wins.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::error::{GatewayError, Result};
use crate::location::Location;
use crate::resolver::LocationResolver;
use crate::types::{Endpoint, ForecastParams, WeatherQuery};
use crate::upstream::{UpstreamResult, WeatherProvider};

/// Cache-aside weather retrieval with fallback location resolution
#[derive(Clone)]
pub struct WeatherService {
    cache: Arc<dyn CacheStore>,
    provider: Arc<dyn WeatherProvider>,
    resolver: Option<Arc<dyn LocationResolver>>,
}

impl WeatherService {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn WeatherProvider>,
        resolver: Option<Arc<dyn LocationResolver>>,
    ) -> Self {
        Self {
            cache,
            provider,
            resolver,
        }
    }

    /// Validate and normalize a raw query, then run the pipeline
    pub async fn retrieve(&self, endpoint: Endpoint, query: &WeatherQuery) -> Result<Value> {
        query.validate()?;
        let location = Location::normalize(&query.location_raw);
        self.retrieve_location(endpoint, location, &query.params).await
    }

    /// Run the pipeline for an already classified location
    pub async fn retrieve_location(
        &self,
        endpoint: Endpoint,
        location: Location,
        params: &ForecastParams,
    ) -> Result<Value> {
        let key = endpoint.cache_key(&location, params);

        if let Some(cached) = self.cache_read(&key).await {
            return Ok(cached);
        }

        let body = match self.provider.fetch(endpoint.shape(), &location, params).await {
            UpstreamResult::Success(body) => body,
            UpstreamResult::TransportError(cause) => return Err(GatewayError::Transport(cause)),
            UpstreamResult::Rejected { status, reason } => match &location {
                Location::Coordinates(_) => {
                    return Err(GatewayError::UpstreamRejected { status, reason })
                }
                Location::FreeText(text) => self.fallback(endpoint, text, params, reason).await?,
            },
        };

        self.cache_write(&key, &body, endpoint).await;
        Ok(body)
    }

    /// Resolve a rejected free-text location and retry the provider once
    async fn fallback(
        &self,
        endpoint: Endpoint,
        text: &str,
        params: &ForecastParams,
        rejection: String,
    ) -> Result<Value> {
        info!("Provider rejected '{}' ({}), attempting resolution", text, rejection);

        let resolver = self.resolver.as_ref().ok_or_else(|| {
            GatewayError::Config("Missing GEMINI_API_KEY; cannot resolve location".to_string())
        })?;

        let coords = resolver.resolve(text).await?;
        info!("Resolved '{}' to {}", text, coords);

        match self
            .provider
            .fetch(endpoint.shape(), &Location::Coordinates(coords), params)
            .await
        {
            UpstreamResult::Success(body) => Ok(body),
            UpstreamResult::Rejected { status, reason } => {
                Err(GatewayError::UpstreamRejected { status, reason })
            }
            UpstreamResult::TransportError(cause) => Err(GatewayError::Transport(cause)),
        }
    }

    /// Read errors count as misses
    async fn cache_read(&self, key: &str) -> Option<Value> {
        match self.cache.get(key).await {
            Ok(Some(value)) => {
                debug!("Cache hit: {}", key);
                Some(value)
            }
            Ok(None) => {
                debug!("Cache miss: {}", key);
                None
            }
            Err(e) => {
                warn!("Cache read failed for {}, treating as miss: {}", key, e);
                None
            }
        }
    }

    /// Best effort; failures are logged and never fail the request
    async fn cache_write(&self, key: &str, value: &Value, endpoint: Endpoint) {
        if let Err(e) = self.cache.set(key, value, endpoint.ttl()).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }
}

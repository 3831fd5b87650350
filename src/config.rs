//! Gateway configuration loaded from the environment
//!
//! A `.env` file in the working directory is honoured. Empty values count as
//! unset. Missing credentials are not fatal at start-up; each endpoint
//! reports its own configuration error at request time.

use crate::cache::CacheConfig;
use crate::{news, places, resolver, upstream};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://cs571-f25.github.io";

/// Runtime configuration for the gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub weather_api_key: Option<String>,
    pub weather_base_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    /// Upstash REST URL and token; both must be set to use the remote cache
    pub redis_rest: Option<(String, String)>,
    /// Capacity of the in-memory cache used when Upstash is not configured
    pub cache_max_entries: usize,
    pub maps_api_key: Option<String>,
    pub maps_base_url: String,
    pub news_base_url: String,
    pub allowed_origin: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            weather_base_url: upstream::DEFAULT_BASE_URL.to_string(),
            gemini_api_key: None,
            gemini_base_url: resolver::DEFAULT_BASE_URL.to_string(),
            gemini_model: resolver::DEFAULT_MODEL.to_string(),
            redis_rest: None,
            cache_max_entries: CacheConfig::default().max_entries,
            maps_api_key: None,
            maps_base_url: places::DEFAULT_BASE_URL.to_string(),
            news_base_url: news::DEFAULT_BASE_URL.to_string(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load `.env` (if any) and read configuration from the process environment
    pub fn from_env() -> Self {
        // A missing .env file is the normal case in deployment
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let redis_rest = match (get("UPSTASH_REDIS_REST_URL"), get("UPSTASH_REDIS_REST_TOKEN")) {
            (Some(url), Some(token)) => Some((url, token)),
            _ => None,
        };

        Self {
            weather_api_key: get("WEATHER_API_KEY").or_else(|| get("TOMORROW_API_KEY")),
            weather_base_url: get("WEATHER_API_BASE_URL").unwrap_or(defaults.weather_base_url),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_base_url: get("GEMINI_API_BASE_URL").unwrap_or(defaults.gemini_base_url),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            redis_rest,
            cache_max_entries: get("CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_max_entries),
            maps_api_key: get("GOOGLE_MAPS_API_KEY"),
            maps_base_url: get("GOOGLE_MAPS_API_BASE_URL").unwrap_or(defaults.maps_base_url),
            news_base_url: get("NEWS_FEED_BASE_URL").unwrap_or(defaults.news_base_url),
            allowed_origin: get("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
        }
    }
}

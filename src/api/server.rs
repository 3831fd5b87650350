//! API server for the weather gateway

use anyhow::Result;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::cache::{start_auto_cleanup, CacheConfig, CacheStore, MemoryCache, UpstashCache};
use crate::config::GatewayConfig;
use crate::news::NewsClient;
use crate::orchestrator::WeatherService;
use crate::places::PlacesClient;
use crate::resolver::{GeminiResolver, LocationResolver};
use crate::upstream::TomorrowClient;

use super::middleware::{cors_middleware, CorsPolicy};
use super::routes::{google_places, health_check, news, weather, weather_forecast, AppState};

/// Configuration for the API server
pub struct ApiServerConfig {
    pub host: String,
    pub port: u16,
    pub gateway: GatewayConfig,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            gateway: GatewayConfig::from_env(),
        }
    }
}

/// Build the router with CORS and request tracing applied to every route
pub fn create_router(app_state: Arc<AppState>, cors: CorsPolicy) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/weather", get(weather))
        .route("/weather-forecast", get(weather_forecast))
        .route("/google-places", get(google_places))
        .route("/news", get(news))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn_with_state(cors, cors_middleware)),
        )
}

/// Wire concrete clients from configuration
///
/// Services whose credential is missing are left out so their endpoints
/// answer with a configuration error.
pub fn build_state(config: &GatewayConfig) -> Result<AppState> {
    let weather = match &config.weather_api_key {
        Some(key) => {
            let cache: Arc<dyn CacheStore> = match &config.redis_rest {
                Some((url, token)) => {
                    info!("Using Upstash cache at {}", url);
                    Arc::new(UpstashCache::new(url.clone(), token.clone())?)
                }
                None => {
                    info!("Upstash credentials not set, using in-memory cache");
                    let cache_config = CacheConfig::builder()
                        .max_entries(config.cache_max_entries)
                        .build();
                    cache_config
                        .validate()
                        .map_err(|e| anyhow::anyhow!("invalid cache configuration: {e}"))?;
                    let memory = Arc::new(MemoryCache::new(cache_config));
                    tokio::spawn(start_auto_cleanup(memory.clone()));
                    memory
                }
            };

            let resolver: Option<Arc<dyn LocationResolver>> = match &config.gemini_api_key {
                Some(key) => Some(Arc::new(GeminiResolver::new(
                    config.gemini_base_url.clone(),
                    config.gemini_model.clone(),
                    key.clone(),
                )?)),
                None => {
                    warn!("GEMINI_API_KEY not set, free-text fallback resolution disabled");
                    None
                }
            };

            let provider = Arc::new(TomorrowClient::new(config.weather_base_url.clone(), key.clone())?);
            Some(WeatherService::new(cache, provider, resolver))
        }
        None => {
            warn!("WEATHER_API_KEY not set, weather endpoints will return 500");
            None
        }
    };

    let places = match &config.maps_api_key {
        Some(key) => Some(PlacesClient::new(config.maps_base_url.clone(), key.clone())?),
        None => None,
    };

    let news = Some(NewsClient::new(config.news_base_url.clone())?);

    Ok(AppState {
        weather,
        places,
        news,
    })
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
}

impl ApiServer {
    /// Create a new API server with configuration
    pub fn new(config: ApiServerConfig) -> Self {
        Self { config }
    }

    /// Create a new API server with default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: ApiServerConfig::default(),
        }
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        let app_state = Arc::new(build_state(&self.config.gateway)?);
        let cors = CorsPolicy::new(&self.config.gateway.allowed_origin)?;
        let app = create_router(app_state, cors);

        let addr = format!("{}:{}", self.config.host, self.config.port);
        info!("Starting API server on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

//! # Weather Gateway
//!
//! Fronts a third-party weather provider with a cache-aside layer and a
//! fallback location-resolution step.
//!
//! A request flows through the [`orchestrator::WeatherService`]:
//!
//! ```text
//! normalize -> cache read -> [miss] provider -> [rejected free text] resolver
//!           -> provider retry -> cache write -> response
//! ```
//!
//! Every collaborator sits behind a trait ([`CacheStore`], [`WeatherProvider`],
//! [`LocationResolver`]) and is injected, so tests substitute in-memory fakes.
//!
//! ```no_run
//! use std::sync::Arc;
//! use weather_gateway::{
//!     CacheConfig, Endpoint, MemoryCache, TomorrowClient, WeatherQuery, WeatherService,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = WeatherService::new(
//!         Arc::new(MemoryCache::new(CacheConfig::default())),
//!         Arc::new(TomorrowClient::new("https://api.tomorrow.io/v4", "api-key")?),
//!         None,
//!     );
//!
//!     let body = service
//!         .retrieve(Endpoint::RealtimeByLocation, &WeatherQuery::new("43.0722,-89.4008"))
//!         .await?;
//!     println!("{}", body);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod location;
pub mod news;
pub mod orchestrator;
pub mod places;
pub mod resolver;
pub mod types;
pub mod upstream;

pub use api::{ApiServer, ApiServerConfig};
pub use cache::{CacheConfig, CacheKeyBuilder, CacheStats, CacheStore, MemoryCache, UpstashCache};
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use location::{Coordinates, Location};
pub use news::{NewsArticle, NewsClient};
pub use orchestrator::WeatherService;
pub use places::{PlacesClient, PlacesOp};
pub use resolver::{extract_coordinates, GeminiResolver, LocationResolver};
pub use types::{DataShape, Endpoint, ForecastParams, WeatherQuery};
pub use upstream::{TomorrowClient, UpstreamResult, WeatherProvider};

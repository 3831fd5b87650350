//! # Response Cache
//!
//! Cache-aside storage for upstream weather payloads.
//!
//! ## Features
//!
//! - **Pluggable backends**: the [`CacheStore`] trait is all the orchestrator sees
//! - **TTL-based expiration**: absence and expiry are indistinguishable to callers
//! - **In-memory store**: LRU-bounded [`MemoryCache`] with background cleanup
//! - **Remote store**: [`UpstashCache`] speaking the Upstash Redis REST protocol
//! - **Deterministic keys**: [`CacheKeyBuilder`] namespaces and parameterises keys
//!
//! ## Example
//!
//! ```rust
//! use weather_gateway::cache::{CacheConfig, CacheStore, MemoryCache};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! # async fn example() -> weather_gateway::Result<()> {
//! let cache = MemoryCache::new(CacheConfig::builder().max_entries(1_000).build());
//!
//! cache.set("weather:Paris", &json!({"temp": 12.5}), Duration::from_secs(600)).await?;
//!
//! if let Some(value) = cache.get("weather:Paris").await? {
//!     println!("Cache hit: {}", value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod key;
pub mod store;
pub mod types;
pub mod upstash;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use entry::CacheEntry;
pub use key::CacheKeyBuilder;
pub use store::{start_auto_cleanup, CacheStore, MemoryCache};
pub use types::{CacheKey, CacheStats};
pub use upstash::UpstashCache;

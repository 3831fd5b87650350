//! Upstash Redis REST cache backend
//!
//! Commands are sent as JSON arrays to the database's REST endpoint, e.g.
//! `["SET", "weather:Paris", "{...}", "EX", "600"]`. Values are stored as
//! serialized JSON strings and parsed back on read.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::cache::store::CacheStore;
use crate::error::{GatewayError, Result};

/// Reply envelope for every Upstash REST command
#[derive(Debug, Deserialize)]
struct UpstashReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Remote cache backed by Upstash Redis
#[derive(Debug, Clone)]
pub struct UpstashCache {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl UpstashCache {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build cache HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn command(&self, args: Value) -> Result<Option<Value>> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await
            .map_err(|e| GatewayError::Cache(format!("request failed: {e}")))?;

        let status = resp.status();
        let reply: UpstashReply = resp
            .json()
            .await
            .map_err(|e| GatewayError::Cache(format!("unreadable reply ({status}): {e}")))?;

        if let Some(error) = reply.error {
            return Err(GatewayError::Cache(error));
        }
        if !status.is_success() {
            return Err(GatewayError::Cache(format!("unexpected status {status}")));
        }

        Ok(reply.result.filter(|v| !v.is_null()))
    }
}

#[async_trait]
impl CacheStore for UpstashCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        debug!("Upstash GET {}", key);

        match self.command(json!(["GET", key])).await? {
            Some(Value::String(raw)) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| GatewayError::Cache(format!("stored value for {key} is not JSON: {e}"))),
            Some(other) => Ok(Some(other)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<()> {
        debug!("Upstash SET {} (ttl {:?})", key, ttl);

        let serialized = serde_json::to_string(value)
            .map_err(|e| GatewayError::Cache(format!("failed to serialize value: {e}")))?;
        let seconds = ttl.as_secs().max(1).to_string();

        self.command(json!(["SET", key, serialized, "EX", seconds]))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_parses_stored_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!(["GET", "weather:Paris"])))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "result": "{\"temp\":12.5}" })),
            )
            .mount(&mock_server)
            .await;

        let cache = UpstashCache::new(mock_server.uri(), "secret").unwrap();
        let value = cache.get("weather:Paris").await.unwrap();

        assert_eq!(value, Some(json!({ "temp": 12.5 })));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
            .mount(&mock_server)
            .await;

        let cache = UpstashCache::new(mock_server.uri(), "secret").unwrap();
        assert_eq!(cache.get("weather:nowhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_sends_expiry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_json(json!(["SET", "weather:Paris", "{\"temp\":1}", "EX", "600"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "OK" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cache = UpstashCache::new(mock_server.uri(), "secret").unwrap();
        cache
            .set("weather:Paris", &json!({ "temp": 1 }), Duration::from_secs(600))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_reply_is_cache_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })),
            )
            .mount(&mock_server)
            .await;

        let cache = UpstashCache::new(mock_server.uri(), "wrong").unwrap();
        let err = cache.get("weather:Paris").await.unwrap_err();

        assert!(matches!(err, GatewayError::Cache(ref msg) if msg == "Unauthorized"));
    }
}

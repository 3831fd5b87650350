//! Deterministic cache key construction

use crate::cache::types::CacheKey;

/// Builder for namespaced cache keys
///
/// Produces `namespace:identifier`, followed by `?k=v&k=v` when parameters
/// are present. Parameters keep insertion order, so callers must add them in
/// a fixed order.
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    namespace: String,
    identifier: String,
    params: Vec<(String, String)>,
}

impl CacheKeyBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: String::new(),
            params: Vec::new(),
        }
    }

    /// Set the primary identifier
    pub fn identifier(mut self, id: impl Into<String>) -> Self {
        self.identifier = id.into();
        self
    }

    /// Add a parameter to the key
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add a parameter only when a value is present
    pub fn optional_param(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    pub fn build(self) -> CacheKey {
        let mut key = format!("{}:{}", self.namespace, self.identifier);

        if !self.params.is_empty() {
            let params_str: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            key.push('?');
            key.push_str(&params_str.join("&"));
        }

        key
    }
}

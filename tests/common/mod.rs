//! In-memory fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use weather_gateway::{
    CacheStore, Coordinates, DataShape, ForecastParams, GatewayError, Location, LocationResolver,
    Result, UpstreamResult, WeatherProvider,
};

/// Cache that records every read and write
#[derive(Default)]
pub struct SpyCache {
    pub entries: Mutex<HashMap<String, (Value, Duration)>>,
    pub reads: AtomicUsize,
    pub writes: Mutex<Vec<(String, Value, Duration)>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl SpyCache {
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn seed(&self, key: &str, value: Value) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, Duration::from_secs(60)));
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<(String, Value, Duration)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheStore for SpyCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(GatewayError::Cache("store unavailable".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()))
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.clone(), ttl));
        if self.fail_writes {
            return Err(GatewayError::Cache("store unavailable".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.clone(), ttl));
        Ok(())
    }
}

/// Provider that replays scripted outcomes and records each call
#[derive(Default)]
pub struct ScriptedProvider {
    pub outcomes: Mutex<VecDeque<UpstreamResult>>,
    pub calls: Mutex<Vec<(DataShape, Location)>>,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<UpstreamResult>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(DataShape, Location)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for ScriptedProvider {
    async fn fetch(
        &self,
        shape: DataShape,
        location: &Location,
        _params: &ForecastParams,
    ) -> UpstreamResult {
        self.calls.lock().unwrap().push((shape, location.clone()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| UpstreamResult::TransportError("no scripted outcome".to_string()))
    }
}

/// Deterministic resolver standing in for the generative service
pub struct StubResolver {
    pub reply: Option<Coordinates>,
    pub calls: Mutex<Vec<String>>,
}

impl StubResolver {
    pub fn resolving_to(lat: f64, lng: f64) -> Self {
        Self {
            reply: Coordinates::new(lat, lng),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unresolvable() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocationResolver for StubResolver {
    async fn resolve(&self, location: &str) -> Result<Coordinates> {
        self.calls.lock().unwrap().push(location.to_string());
        self.reply.ok_or_else(|| GatewayError::Resolution {
            location: location.to_string(),
            reason: "no coordinate pair in reply".to_string(),
        })
    }
}

pub fn rejected() -> UpstreamResult {
    UpstreamResult::Rejected {
        status: 400,
        reason: "The location is invalid".to_string(),
    }
}

//! Location normalization
//!
//! Classifies the caller's location expression once, up front, as either a
//! numeric coordinate pair or free text. The resulting [`Location`] is
//! threaded through the rest of the pipeline unchanged.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{GatewayError, Result};

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?\d+\.\d+),([+-]?\d+\.\d+)$").expect("coordinate pattern is valid")
    })
}

/// A validated geographic coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting values outside the geographic range
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }

    /// Parse separately supplied latitude and longitude query values
    pub fn from_parts(lat: &str, lng: &str) -> Result<Self> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GatewayError::Input(format!("Invalid latitude: {lat}")))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| GatewayError::Input(format!("Invalid longitude: {lng}")))?;

        Self::new(lat, lng).ok_or_else(|| {
            GatewayError::Input(format!("Coordinates out of range: {lat},{lng}"))
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A classified location expression
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Already numeric; no fallback resolution is possible
    Coordinates(Coordinates),
    /// City, address, or anything that is not a strict `lat,lng` pair
    FreeText(String),
}

impl Location {
    /// Classify a raw location string. Never fails.
    ///
    /// Only a strict `<lat>,<lng>` pair with decimal fractions and in-range
    /// values becomes [`Location::Coordinates`]; everything else is passed
    /// through unchanged as [`Location::FreeText`].
    pub fn normalize(raw: &str) -> Self {
        let parsed = coordinate_pattern().captures(raw).and_then(|caps| {
            let lat = caps[1].parse::<f64>().ok()?;
            let lng = caps[2].parse::<f64>().ok()?;
            Coordinates::new(lat, lng)
        });

        match parsed {
            Some(coords) => Location::Coordinates(coords),
            None => Location::FreeText(raw.to_string()),
        }
    }

    /// Deterministic component used in cache keys
    pub fn cache_component(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates(coords) => write!(f, "{coords}"),
            Location::FreeText(text) => f.write_str(text),
        }
    }
}

impl From<Coordinates> for Location {
    fn from(coords: Coordinates) -> Self {
        Location::Coordinates(coords)
    }
}

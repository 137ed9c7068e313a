//! Screen configuration.
//!
//! Passed across the JNI boundary as JSON. Every field is optional and
//! falls back to the shipped defaults.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recorder::StopPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vertical span of the map viewport in degrees.
    pub latitude_delta: f64,
    /// Horizontal span of the map viewport in degrees.
    pub longitude_delta: f64,
    pub marker_title: Option<String>,
    pub stop_policy: StopPolicy,
    /// `chrono` format string for trip start/end times.
    pub time_format: String,
    pub permission_denied_message: String,
    pub location_unavailable_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latitude_delta: 0.0922,
            longitude_delta: 0.0421,
            marker_title: Some("My Location".to_string()),
            stop_policy: StopPolicy::default(),
            time_format: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
            permission_denied_message: "Permission to access location was denied".to_string(),
            location_unavailable_message: "Current location is unavailable".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON config. Blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;

        if StrftimeItems::new(&config.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidTimeFormat(config.time_format));
        }

        Ok(config)
    }
}

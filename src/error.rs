//! Crate-wide error type.

use thiserror::Error;

/// Everything that can go wrong between the location source and the screen.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Permission to access location was denied")]
    PermissionDenied,

    #[error("Current location is unavailable")]
    CoordinateUnavailable,

    #[error("Invalid coordinate: lat {latitude}, lon {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Screen is not ready for input")]
    NotReady,

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    #[error("GPX parse error: {0}")]
    Gpx(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Location source abstraction.
//!
//! The core never talks to a GPS chip or a platform SDK directly. A
//! frontend hands it a [`LocationProvider`], or on Android pushes the
//! results of the platform calls through the JNI bridge.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate from values read off an untrusted boundary.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(Error::InvalidCoordinate { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }
}

/// Outcome of the foreground location permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Granted,
    Denied,
}

/// Source of the device position.
///
/// Both operations are one-shot futures; the caller awaits them on
/// whatever executor drives the UI.
#[allow(async_fn_in_trait)]
pub trait LocationProvider {
    /// Ask for foreground location access.
    async fn request_permission(&mut self) -> Permission;

    /// Read the current device position.
    ///
    /// Fails with [`Error::CoordinateUnavailable`] when no fix exists.
    async fn current_coordinate(&mut self) -> Result<Coordinate>;
}

/// Provider with a fixed answer, for desktop frontends and tests.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    pub permission: Permission,
    pub coordinate: Option<Coordinate>,
}

impl FixedLocation {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            permission: Permission::Granted,
            coordinate: Some(coordinate),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Permission::Denied,
            coordinate: None,
        }
    }

    pub fn without_fix() -> Self {
        Self {
            permission: Permission::Granted,
            coordinate: None,
        }
    }
}

impl LocationProvider for FixedLocation {
    async fn request_permission(&mut self) -> Permission {
        self.permission
    }

    async fn current_coordinate(&mut self) -> Result<Coordinate> {
        if self.permission == Permission::Denied {
            return Err(Error::PermissionDenied);
        }
        self.coordinate.ok_or(Error::CoordinateUnavailable)
    }
}

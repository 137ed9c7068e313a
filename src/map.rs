//! Map view model handed to the platform map widget.

use serde::Serialize;

use crate::config::Config;
use crate::location::Coordinate;

/// Visible area of the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapRegion {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub region: MapRegion,
    pub markers: Vec<Marker>,
}

impl MapView {
    /// Viewport centred on `position` with a single marker on it.
    pub fn centered_on(position: Coordinate, config: &Config) -> Self {
        Self {
            region: MapRegion {
                center: position,
                latitude_delta: config.latitude_delta,
                longitude_delta: config.longitude_delta,
            },
            markers: vec![Marker {
                coordinate: position,
                title: config.marker_title.clone(),
            }],
        }
    }
}

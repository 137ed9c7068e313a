//! Distance computations.
//!
//! Great-circle distance between two WGS84 coordinates (lat/lon in
//! degrees) and the display formatting used by the trip list.

use crate::location::Coordinate;

/// Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates in kilometres.
///
/// Symmetric, zero for identical points, and roughly 20015 km for
/// antipodes.
pub fn haversine_km(start: &Coordinate, end: &Coordinate) -> f64 {
    let lat1 = start.latitude.to_radians();
    let lat2 = end.latitude.to_radians();
    let dlat = (end.latitude - start.latitude).to_radians();
    let dlon = (end.longitude - start.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1 near antipodes.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Format a distance for a trip row.
pub fn format_distance(km: f64) -> String {
    if km >= 1.0 {
        format!("{km:.2} km")
    } else {
        let meters = km * 1000.0;
        format!("{} m", (meters / 10.0).round() as i64 * 10)
    }
}

//! Geofence checks for arena entry
//!
//! Distances come from the haversine formula on a spherical Earth
//! model, which is accurate to well under a meter at arena scale.

use crate::core::types::Coordinates;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters
pub fn haversine_meters(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// True when `position` lies within `radius_m` meters of `center`
pub fn within_radius(position: Coordinates, center: Coordinates, radius_m: f64) -> bool {
    haversine_meters(position, center) <= radius_m
}

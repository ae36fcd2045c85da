//! Great-circle distance.

use crate::records::model::Location;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const FEET_PER_METER: f64 = 3.28084;

/// Haversine distance in meters on a spherical earth.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}

pub fn distance_ft(a: Location, b: Location) -> f64 {
    haversine_m(a.latitude, a.longitude, b.latitude, b.longitude) * FEET_PER_METER
}

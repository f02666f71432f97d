//! Great-circle distance helper for deriving physical extents.

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculates the great circle distance in kilometers between two
/// `(lat, lon)` points given in decimal degrees, using the haversine
/// formula.
pub fn haversine(coord1: (f64, f64), coord2: (f64, f64)) -> f64 {
    let (lat1, lon1) = (coord1.0.to_radians(), coord1.1.to_radians());
    let (lat2, lon2) = (coord2.0.to_radians(), coord2.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

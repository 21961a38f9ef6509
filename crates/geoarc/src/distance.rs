use geo::Coord;

/// Mean Earth radius in metres used by every distance in this crate.
///
/// Distances are spherical, not ellipsoidal; the error is well below marker
/// placement precision.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two lon/lat points, in metres.
pub fn haversine_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_M
}

/// Returns true if `point` is within `radius_m` metres of `center` (inclusive).
#[inline]
pub fn point_in_circle(point: Coord<f64>, center: Coord<f64>, radius_m: f64) -> bool {
    haversine_distance(point, center) <= radius_m
}

/// Central angle in radians between two lon/lat points (haversine formula).
pub(crate) fn central_angle(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let (lat1, lat2) = (a.y.to_radians(), b.y.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Initial great-circle bearing from `a` to `b`, in radians.
pub(crate) fn initial_bearing(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let (lat1, lat2) = (a.y.to_radians(), b.y.to_radians());
    let d_lng = (b.x - a.x).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    y.atan2(x)
}

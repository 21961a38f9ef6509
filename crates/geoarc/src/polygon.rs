use geo::{Coord, LineString, Polygon};

use crate::angle::{delta_lng, inverse_mercator, is_pole, mercator};
use crate::distance::{central_angle, haversine_distance, initial_bearing, EARTH_RADIUS_M};

/// Distance in metres within which a point counts as lying on an edge.
pub const DEFAULT_EDGE_TOLERANCE_M: f64 = 0.1;

// ---------------------------------------------------------------------------
// Ring validity
// ---------------------------------------------------------------------------

/// Returns true if `ring` cannot bound an area: fewer than three distinct
/// vertices, or any non-finite coordinate.
pub fn is_degenerate(ring: &LineString<f64>) -> bool {
    let mut distinct: [Option<Coord<f64>>; 3] = [None; 3];
    let mut count = 0;
    for coord in ring.coords() {
        if !(coord.x.is_finite() && coord.y.is_finite()) { return true }
        if count < 3 && !distinct[..count].iter().flatten().any(|c| c == coord) {
            distinct[count] = Some(*coord);
            count += 1;
        }
    }
    count < 3
}

// ---------------------------------------------------------------------------
// Containment
// ---------------------------------------------------------------------------

/// Ray-crossing containment test of `point` against a single ring.
///
/// Edges are great-circle arcs when `geodesic` is set and rhumb lines
/// (straight in Mercator) otherwise. Longitudes are taken relative to each
/// edge's start and wrapped into `[-π, π)`, so rings that cross the
/// antimeridian behave like any other ring. A point equal to a vertex is
/// inside. Degenerate rings contain nothing.
pub fn contains_location(point: Coord<f64>, ring: &LineString<f64>, geodesic: bool) -> bool {
    let coords = &ring.0;
    if is_degenerate(ring) { return false }

    let lat3 = point.y.to_radians();
    let lng3 = point.x.to_radians();

    let prev = coords[coords.len() - 1];
    let mut lat1 = prev.y.to_radians();
    let mut lng1 = prev.x.to_radians();

    let mut crossings = 0usize;
    for next in coords {
        let d_lng3 = delta_lng(lng1, lng3);
        if lat3 == lat1 && d_lng3 == 0.0 { return true }

        let lat2 = next.y.to_radians();
        let lng2 = next.x.to_radians();
        if crosses(lat1, lat2, delta_lng(lng1, lng2), lat3, d_lng3, geodesic) {
            crossings += 1;
        }

        lat1 = lat2;
        lng1 = lng2;
    }
    crossings % 2 == 1
}

/// Whether the northward ray from `(lat3, lng3)` crosses the edge from
/// `(lat1, 0)` to `(lat2, lng2)`. Longitudes are already offset by the edge
/// start.
fn crosses(lat1: f64, lat2: f64, lng2: f64, lat3: f64, lng3: f64, geodesic: bool) -> bool {
    // Both ends on the same side of the ray.
    if (lng3 >= 0.0 && lng3 >= lng2) || (lng3 < 0.0 && lng3 < lng2) { return false }
    // South pole, or an edge touching either pole.
    if lat3 <= -std::f64::consts::FRAC_PI_2 { return false }
    if is_pole(lat1) || is_pole(lat2) { return false }
    if lng2 <= -std::f64::consts::PI { return false }

    let linear_lat = (lat1 * (lng2 - lng3) + lat2 * lng3) / lng2;
    // Northern hemisphere, point below the lat/lng chord.
    if lat1 >= 0.0 && lat2 >= 0.0 && lat3 < linear_lat { return false }
    // Southern hemisphere, point above the chord.
    if lat1 <= 0.0 && lat2 <= 0.0 && lat3 >= linear_lat { return true }
    // North pole.
    if lat3 >= std::f64::consts::FRAC_PI_2 { return true }

    // Compare against the edge latitude at lng3 through a monotonic function.
    if geodesic {
        lat3.tan() >= tan_lat_great_circle(lat1, lat2, lng2, lng3)
    } else {
        mercator(lat3) >= mercator_lat_rhumb(lat1, lat2, lng2, lng3)
    }
}

/// tan(latitude) of the great circle through `(lat1, 0)` and `(lat2, lng2)` at `lng3`.
#[inline]
fn tan_lat_great_circle(lat1: f64, lat2: f64, lng2: f64, lng3: f64) -> f64 {
    (lat1.tan() * (lng2 - lng3).sin() + lat2.tan() * lng3.sin()) / lng2.sin()
}

/// Mercator latitude of the rhumb line through `(lat1, 0)` and `(lat2, lng2)` at `lng3`.
#[inline]
fn mercator_lat_rhumb(lat1: f64, lat2: f64, lng2: f64, lng3: f64) -> f64 {
    (mercator(lat1) * (lng2 - lng3) + mercator(lat2) * lng3) / lng2
}

// ---------------------------------------------------------------------------
// Edge proximity
// ---------------------------------------------------------------------------

/// Returns true if `point` lies within `tolerance_m` metres of any edge of
/// the (implicitly closed) `ring`.
pub fn is_location_on_edge(
    point: Coord<f64>,
    ring: &LineString<f64>,
    geodesic: bool,
    tolerance_m: f64,
) -> bool {
    if is_degenerate(ring) { return false }

    let coords = &ring.0;
    let mut prev = coords[coords.len() - 1];
    for &next in coords {
        let distance = if geodesic {
            distance_to_arc(point, prev, next)
        } else {
            distance_to_rhumb(point, prev, next)
        };
        if distance <= tolerance_m { return true }
        prev = next;
    }
    false
}

/// Distance in metres from `p` to the great-circle arc `a -> b`.
fn distance_to_arc(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d12 = central_angle(a, b);
    let d13 = central_angle(a, p);
    if d12 == 0.0 { return d13 * EARTH_RADIUS_M }

    let delta = initial_bearing(a, p) - initial_bearing(a, b);
    // Foot of the perpendicular falls behind `a`.
    if delta.cos() < 0.0 { return d13 * EARTH_RADIUS_M }

    let cross_track = (d13.sin() * delta.sin()).clamp(-1.0, 1.0).asin();
    let along_track = (d13.cos() / cross_track.cos()).clamp(-1.0, 1.0).acos();
    if along_track > d12 {
        haversine_distance(p, b)
    } else {
        cross_track.abs() * EARTH_RADIUS_M
    }
}

/// Distance in metres from `p` to the rhumb segment `a -> b`.
///
/// The closest point is located in a Mercator plane centred on `p`, mapped
/// back to lon/lat and measured with the haversine formula, so the result is
/// always a true distance to a point of the segment.
fn distance_to_rhumb(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lng_p = p.x.to_radians();
    let y_p = mercator(p.y.to_radians());

    // `b` is unwrapped relative to `a` so the segment never jumps across the
    // antimeridian of `p`.
    let x_a = delta_lng(lng_p, a.x.to_radians());
    let x_b = x_a + delta_lng(a.x.to_radians(), b.x.to_radians());
    let a = Coord { x: x_a, y: mercator(a.y.to_radians()) - y_p };
    let b = Coord { x: x_b, y: mercator(b.y.to_radians()) - y_p };
    if !(y_p.is_finite() && a.y.is_finite() && b.y.is_finite()) {
        return f64::INFINITY;
    }

    let d = b - a;
    let len2 = d.x * d.x + d.y * d.y;
    let t = if len2 == 0.0 { 0.0 } else { (-(a.x * d.x + a.y * d.y) / len2).clamp(0.0, 1.0) };
    let closest = a + d * t;
    let closest = Coord {
        x: (lng_p + closest.x).to_degrees(),
        y: inverse_mercator(y_p + closest.y).to_degrees(),
    };
    haversine_distance(p, closest)
}

// ---------------------------------------------------------------------------
// Polygons with holes
// ---------------------------------------------------------------------------

/// Returns true if `point` is inside or on the boundary of `polygon`.
///
/// The point must be inside or on an edge of the exterior ring and not
/// strictly inside any hole; a point on a hole's boundary still borders the
/// polygon. A degenerate exterior never contains; degenerate holes are
/// ignored.
pub fn point_in_polygon(
    point: Coord<f64>,
    polygon: &Polygon<f64>,
    geodesic: bool,
    tolerance_m: f64,
) -> bool {
    let exterior = polygon.exterior();
    if is_degenerate(exterior) { return false }

    if !is_location_on_edge(point, exterior, geodesic, tolerance_m)
        && !contains_location(point, exterior, geodesic)
    {
        return false;
    }

    polygon.interiors().iter()
        .filter(|hole| !is_degenerate(hole))
        .all(|hole| {
            is_location_on_edge(point, hole, geodesic, tolerance_m)
                || !contains_location(point, hole, geodesic)
        })
}

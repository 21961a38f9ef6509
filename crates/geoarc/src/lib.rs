//! Spherical containment predicates over lon/lat coordinates.
//!
//! All inputs are `geo` types in degrees with `x = longitude` and
//! `y = latitude`. Every function is pure and total: malformed input yields a
//! conservative `false`, never a panic.

mod angle;
pub mod distance;
pub mod polygon;

pub use distance::{haversine_distance, point_in_circle, EARTH_RADIUS_M};
pub use polygon::{
    contains_location, is_degenerate, is_location_on_edge, point_in_polygon,
    DEFAULT_EDGE_TOLERANCE_M,
};

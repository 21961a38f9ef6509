use std::fmt;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    #[inline] pub const fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }

    /// Returns true if both components are finite numbers.
    #[inline] pub fn is_finite(&self) -> bool { self.lat.is_finite() && self.lng.is_finite() }

    /// Convert to a `geo` coordinate (x = longitude, y = latitude).
    #[inline] pub fn to_coord(self) -> Coord<f64> { Coord { x: self.lng, y: self.lat } }
}

impl From<Coord<f64>> for Position {
    fn from(coord: Coord<f64>) -> Self { Self::new(coord.y, coord.x) }
}

impl From<Point<f64>> for Position {
    fn from(point: Point<f64>) -> Self { point.0.into() }
}

impl From<Position> for Coord<f64> {
    fn from(position: Position) -> Self { position.to_coord() }
}

impl From<Position> for Point<f64> {
    fn from(position: Position) -> Self { Point(position.to_coord()) }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

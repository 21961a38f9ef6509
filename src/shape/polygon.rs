use geo::{Coord, CoordsIter, LineString, Polygon};

use crate::types::Position;

use super::ShapeError;

/// A filled polygon overlay: an outer ring, optional holes and display flags.
///
/// Rings are stored as a `geo::Polygon` in lon/lat, so they are always
/// closed. Defaults match a freshly added map polygon: visible, planar
/// (rhumb) edges, drawn beneath markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePolygon {
    geometry: Polygon<f64>,
    pub geodesic: bool,
    pub visible: bool,
    pub above_markers: bool,
}

impl ShapePolygon {
    /// Construct a polygon from its outer boundary.
    pub fn new(points: impl IntoIterator<Item = Position>) -> Self {
        Self::from_polygon(Polygon::new(to_ring(points), vec![]))
    }

    /// Construct from an existing `geo` polygon (x = longitude, y = latitude).
    pub fn from_polygon(geometry: Polygon<f64>) -> Self {
        Self { geometry, geodesic: false, visible: true, above_markers: false }
    }

    /// Add a hole ring.
    pub fn with_hole(mut self, points: impl IntoIterator<Item = Position>) -> Self {
        let ring = to_ring(points);
        self.geometry.interiors_push(ring);
        self
    }

    pub fn with_geodesic(mut self, geodesic: bool) -> Self { self.geodesic = geodesic; self }

    pub fn with_visible(mut self, visible: bool) -> Self { self.visible = visible; self }

    pub fn with_above_markers(mut self, above: bool) -> Self { self.above_markers = above; self }

    /// Get a reference to the underlying geometry.
    #[inline] pub fn geometry(&self) -> &Polygon<f64> { &self.geometry }

    /// Outer boundary positions, including the closing vertex.
    pub fn points(&self) -> impl Iterator<Item = Position> + '_ {
        self.geometry.exterior().coords().copied().map(Position::from)
    }

    /// Number of hole rings.
    #[inline] pub fn num_holes(&self) -> usize { self.geometry.interiors().len() }

    /// Returns true if `position` is inside, or within `tolerance_m` of the
    /// boundary of, this polygon. Visibility flags are not considered.
    pub fn contains_or_borders(&self, position: Position, tolerance_m: f64) -> bool {
        geoarc::point_in_polygon(position.to_coord(), &self.geometry, self.geodesic, tolerance_m)
    }

    pub(super) fn validate(&self) -> Result<(), ShapeError> {
        if self.geometry.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite()) {
            Ok(())
        } else {
            Err(ShapeError::NonFiniteCoordinate)
        }
    }
}

fn to_ring(points: impl IntoIterator<Item = Position>) -> LineString<f64> {
    points.into_iter().map(Coord::from).collect()
}

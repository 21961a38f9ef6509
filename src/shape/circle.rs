use crate::types::Position;

use super::ShapeError;

/// A filled circle overlay with a radius in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCircle {
    pub center: Position,
    pub radius_m: f64,
    pub visible: bool,
    pub above_markers: bool,
}

impl ShapeCircle {
    /// Visible circle drawn beneath markers.
    pub fn new(center: Position, radius_m: f64) -> Self {
        Self { center, radius_m, visible: true, above_markers: false }
    }

    pub fn with_visible(mut self, visible: bool) -> Self { self.visible = visible; self }

    pub fn with_above_markers(mut self, above: bool) -> Self { self.above_markers = above; self }

    /// Returns true if `position` is within the radius (great-circle distance).
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        geoarc::point_in_circle(position.to_coord(), self.center.to_coord(), self.radius_m)
    }

    pub(super) fn validate(&self) -> Result<(), ShapeError> {
        if !self.center.is_finite() { return Err(ShapeError::NonFiniteCoordinate) }
        if !self.radius_m.is_finite() || self.radius_m < 0.0 {
            return Err(ShapeError::InvalidRadius(self.radius_m));
        }
        Ok(())
    }
}

mod circle;
mod polygon;
mod registry;

use std::{fmt, ops::ControlFlow};

use crate::types::Position;

pub use circle::ShapeCircle;
pub use polygon::ShapePolygon;
pub use registry::ShapeRegistry;

/// Errors raised when a shape is admitted into a `ShapeRegistry`.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A vertex or circle center has a NaN or infinite component.
    NonFiniteCoordinate,
    /// A circle radius is negative or not finite.
    InvalidRadius(f64),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteCoordinate => write!(f, "shape has a non-finite coordinate"),
            Self::InvalidRadius(r) => write!(f, "circle radius must be finite and non-negative, got {r}"),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Any overlay that can cover markers.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(ShapePolygon),
    Circle(ShapeCircle),
}

impl Shape {
    #[inline]
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Polygon(p) => p.visible,
            Self::Circle(c) => c.visible,
        }
    }

    #[inline]
    pub fn is_above_markers(&self) -> bool {
        match self {
            Self::Polygon(p) => p.above_markers,
            Self::Circle(c) => c.above_markers,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Self::Polygon(p) => p.visible = visible,
            Self::Circle(c) => c.visible = visible,
        }
    }

    pub fn set_above_markers(&mut self, above: bool) {
        match self {
            Self::Polygon(p) => p.above_markers = above,
            Self::Circle(c) => c.above_markers = above,
        }
    }

    /// Pure geometry: is `position` inside or on the boundary of this shape.
    /// `tolerance_m` only applies to polygon edges.
    pub fn contains_or_borders(&self, position: Position, tolerance_m: f64) -> bool {
        match self {
            Self::Polygon(p) => p.contains_or_borders(position, tolerance_m),
            Self::Circle(c) => c.contains(position),
        }
    }

    /// Returns true if this shape hides a marker at `position`: it must be
    /// visible, drawn above markers, and contain or border the position.
    #[inline]
    pub fn covers(&self, position: Position, tolerance_m: f64) -> bool {
        self.is_visible() && self.is_above_markers() && self.contains_or_borders(position, tolerance_m)
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        match self {
            Self::Polygon(p) => p.validate(),
            Self::Circle(c) => c.validate(),
        }
    }
}

impl From<ShapePolygon> for Shape {
    fn from(polygon: ShapePolygon) -> Self { Self::Polygon(polygon) }
}

impl From<ShapeCircle> for Shape {
    fn from(circle: ShapeCircle) -> Self { Self::Circle(circle) }
}

/// Read-only view over the live set of shapes.
///
/// A visitor can stop the walk early by returning `ControlFlow::Break`.
pub trait ShapeSource {
    fn for_each_shape(&self, visit: &mut dyn FnMut(&Shape) -> ControlFlow<()>) -> ControlFlow<()>;
}

impl ShapeSource for [Shape] {
    fn for_each_shape(&self, visit: &mut dyn FnMut(&Shape) -> ControlFlow<()>) -> ControlFlow<()> {
        self.iter().try_for_each(|shape| visit(shape))
    }
}

impl ShapeSource for Vec<Shape> {
    fn for_each_shape(&self, visit: &mut dyn FnMut(&Shape) -> ControlFlow<()>) -> ControlFlow<()> {
        self.as_slice().for_each_shape(visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ShapePolygon {
        ShapePolygon::new([
            Position::new(0.0, 0.0),
            Position::new(0.0, 2.0),
            Position::new(2.0, 2.0),
            Position::new(2.0, 0.0),
        ])
    }

    #[test]
    fn covers_requires_both_flags() {
        let inside = Position::new(1.0, 1.0);
        let mut shape = Shape::from(square());
        assert!(!shape.covers(inside, 0.1));

        shape.set_above_markers(true);
        assert!(shape.covers(inside, 0.1));

        shape.set_visible(false);
        assert!(!shape.covers(inside, 0.1));
        assert!(shape.contains_or_borders(inside, 0.1));
    }

    #[test]
    fn circle_flags_round_trip_through_shape() {
        let mut shape = Shape::from(ShapeCircle::new(Position::new(0.0, 0.0), 10.0));
        assert!(shape.is_visible());
        assert!(!shape.is_above_markers());
        shape.set_above_markers(true);
        assert!(shape.is_above_markers());
        assert!(shape.covers(Position::new(0.0, 0.0), 0.1));
    }

    #[test]
    fn slice_walk_stops_on_break() {
        let shapes = vec![
            Shape::from(ShapeCircle::new(Position::new(0.0, 0.0), 1.0)),
            Shape::from(ShapeCircle::new(Position::new(1.0, 1.0), 1.0)),
            Shape::from(ShapeCircle::new(Position::new(2.0, 2.0), 1.0)),
        ];
        let mut seen = 0;
        let flow = shapes.for_each_shape(&mut |_| {
            seen += 1;
            if seen == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        });
        assert!(flow.is_break());
        assert_eq!(seen, 2);
    }

    #[test]
    fn error_messages() {
        assert_eq!(ShapeError::NonFiniteCoordinate.to_string(), "shape has a non-finite coordinate");
        assert_eq!(
            ShapeError::InvalidRadius(-2.0).to_string(),
            "circle radius must be finite and non-negative, got -2"
        );
    }
}

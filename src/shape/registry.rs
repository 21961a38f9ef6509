use std::ops::ControlFlow;

use ahash::AHashMap;

use crate::types::ShapeId;

use super::{Shape, ShapeError, ShapeSource};

/// The live set of polygons and circles, keyed by identity.
///
/// Polygons and circles share one key space: inserting a circle under a
/// polygon's id replaces the polygon. Stored shapes are only changed through
/// `insert` and the flag setters, so every stored shape has passed validation.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: AHashMap<ShapeId, Shape>,
}

impl ShapeRegistry {
    pub fn new() -> Self { Self::default() }

    /// Get the number of shapes.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no shapes.
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    #[inline] pub fn get(&self, id: &ShapeId) -> Option<&Shape> { self.shapes.get(id) }

    #[inline] pub fn contains(&self, id: &ShapeId) -> bool { self.shapes.contains_key(id) }

    /// Iterate over all shapes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&ShapeId, &Shape)> { self.shapes.iter() }

    /// Add or replace a shape. Returns the shape previously stored under `id`.
    /// The registry is left untouched if `shape` fails validation.
    pub fn insert(&mut self, id: ShapeId, shape: impl Into<Shape>) -> Result<Option<Shape>, ShapeError> {
        let shape = shape.into();
        shape.validate()?;
        Ok(self.shapes.insert(id, shape))
    }

    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> { self.shapes.remove(id) }

    /// Toggle a shape's visibility. Returns false if no such shape exists.
    pub fn set_visible(&mut self, id: &ShapeId, visible: bool) -> bool {
        self.shapes.get_mut(id).map(|shape| shape.set_visible(visible)).is_some()
    }

    /// Toggle whether a shape is drawn above markers. Returns false if no such shape exists.
    pub fn set_above_markers(&mut self, id: &ShapeId, above: bool) -> bool {
        self.shapes.get_mut(id).map(|shape| shape.set_above_markers(above)).is_some()
    }

    pub fn clear(&mut self) { self.shapes.clear(); }
}

impl ShapeSource for ShapeRegistry {
    fn for_each_shape(&self, visit: &mut dyn FnMut(&Shape) -> ControlFlow<()>) -> ControlFlow<()> {
        self.shapes.values().try_for_each(|shape| visit(shape))
    }
}

mod ids;
mod position;

pub use ids::{ClusterId, MarkerId, ShapeId};
pub use position::Position;

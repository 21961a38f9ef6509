mod map;
mod store;

pub use map::OverlayMap;
pub use store::{MapMarker, MarkerStore};

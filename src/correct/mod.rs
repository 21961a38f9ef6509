mod engine;
mod marker;

pub use engine::{Correction, CorrectionEngine, CorrectionStats};
pub use marker::{ClusterBridge, Marker, MarkerView, MarkerViews};

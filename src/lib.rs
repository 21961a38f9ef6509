#![doc = "mapcover: shape-based marker visibility correction for map overlays"]
mod config;
mod correct;
mod ledger;
mod overlay;
mod shape;
mod types;

#[doc(inline)]
pub use config::CorrectionConfig;

#[doc(inline)]
pub use correct::{ClusterBridge, Correction, CorrectionEngine, CorrectionStats, Marker, MarkerView, MarkerViews};

#[doc(inline)]
pub use ledger::VisibilityLedger;

#[doc(inline)]
pub use overlay::{MapMarker, MarkerStore, OverlayMap};

#[doc(inline)]
pub use shape::{Shape, ShapeCircle, ShapeError, ShapePolygon, ShapeRegistry, ShapeSource};

#[doc(inline)]
pub use types::{ClusterId, MarkerId, Position, ShapeId};

/// Containment math, re-exported for callers that work with raw `geo` types.
pub use geoarc as geomath;

use std::{fmt, sync::Arc};

/// Stable identity of one on-map marker.
///
/// Identities are plain values, so the ledger never holds a reference to the
/// marker itself. `MarkerStore` never reuses an identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkerId({})", self.0)
    }
}

/// Identity of a cluster a marker belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u64);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClusterId({})", self.0)
    }
}

/// Identity of a polygon or circle, as handed out by the host (usually a UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(Arc<str>);

impl ShapeId {
    pub fn new(id: impl Into<Arc<str>>) -> Self { Self(id.into()) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for ShapeId {
    fn from(id: String) -> Self { Self::new(id) }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

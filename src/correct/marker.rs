use crate::types::{MarkerId, Position};

/// The capabilities the engine needs from an on-map marker.
pub trait Marker {
    fn id(&self) -> MarkerId;
    fn position(&self) -> Position;
    /// Currently displayed visibility.
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

/// An enumerable collection of live markers.
pub trait MarkerView {
    fn visit_markers(&mut self, visit: &mut dyn FnMut(&mut dyn Marker));
}

/// The clustering collaborator: supplies the markers it currently displays,
/// cluster glyphs included, in place of the individual markers they group.
pub trait ClusterBridge {
    fn visit_displayed(&mut self, visit: &mut dyn FnMut(&mut dyn Marker));
}

impl<M: Marker> MarkerView for [M] {
    fn visit_markers(&mut self, visit: &mut dyn FnMut(&mut dyn Marker)) {
        for marker in self.iter_mut() { visit(marker) }
    }
}

impl<M: Marker> MarkerView for Vec<M> {
    fn visit_markers(&mut self, visit: &mut dyn FnMut(&mut dyn Marker)) {
        self.as_mut_slice().visit_markers(visit)
    }
}

/// Every view of the markers on one map, as walked by `correct_all`.
pub struct MarkerViews<'a> {
    /// Markers added directly to the map.
    pub direct: &'a mut dyn MarkerView,
    /// Markers currently displayed by the clusterer.
    pub clustered: Option<&'a mut dyn ClusterBridge>,
    /// Markers held by a marker-manager collection.
    pub managed: Option<&'a mut dyn MarkerView>,
}

impl<'a> MarkerViews<'a> {
    pub fn new(direct: &'a mut dyn MarkerView) -> Self {
        Self { direct, clustered: None, managed: None }
    }

    pub fn with_clusters(mut self, clusters: &'a mut dyn ClusterBridge) -> Self {
        self.clustered = Some(clusters);
        self
    }

    pub fn with_managed(mut self, managed: &'a mut dyn MarkerView) -> Self {
        self.managed = Some(managed);
        self
    }
}

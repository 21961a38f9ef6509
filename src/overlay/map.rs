use std::fmt;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::CorrectionConfig;
use crate::correct::{ClusterBridge, CorrectionEngine, CorrectionStats, Marker, MarkerView, MarkerViews};
use crate::shape::{Shape, ShapeRegistry};
use crate::types::{ClusterId, MarkerId, Position, ShapeId};

use super::store::{MapMarker, MarkerStore};

/// The overlays of one map, with marker visibility kept consistent after
/// every mutation that can change coverage.
///
/// Marker mutations re-correct the affected marker; shape mutations re-run
/// `correct_all` over the direct markers, the cluster bridge and the managed
/// view, when those are attached.
pub struct OverlayMap {
    markers: MarkerStore,
    shapes: ShapeRegistry,
    engine: CorrectionEngine,
    clusters: Option<Box<dyn ClusterBridge>>,
    managed: Option<Box<dyn MarkerView>>,
}

impl Default for OverlayMap {
    fn default() -> Self { Self::new(&CorrectionConfig::default()) }
}

impl fmt::Debug for OverlayMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayMap")
            .field("markers", &self.markers.len())
            .field("shapes", &self.shapes.len())
            .field("engine", &self.engine)
            .field("clusters", &self.clusters.is_some())
            .field("managed", &self.managed.is_some())
            .finish()
    }
}

impl OverlayMap {
    pub fn new(config: &CorrectionConfig) -> Self {
        Self {
            markers: MarkerStore::new(),
            shapes: ShapeRegistry::new(),
            engine: CorrectionEngine::new(config),
            clusters: None,
            managed: None,
        }
    }

    #[inline] pub fn markers(&self) -> &MarkerStore { &self.markers }

    #[inline] pub fn shapes(&self) -> &ShapeRegistry { &self.shapes }

    #[inline] pub fn engine(&self) -> &CorrectionEngine { &self.engine }

    #[inline] pub fn marker(&self, id: MarkerId) -> Option<&MapMarker> { self.markers.get(id) }

    pub fn is_covered(&self, position: Position) -> bool {
        self.engine.is_covered(&self.shapes, position)
    }

    // -----------------------------------------------------------------------
    // Markers
    // -----------------------------------------------------------------------

    /// Place a marker and correct it against the current shapes.
    pub fn add_marker(&mut self, position: Position, visible: bool) -> MarkerId {
        let id = self.markers.add(position, visible);
        self.correct_marker(id);
        id
    }

    /// Move a marker and re-correct it. Returns false if it does not exist.
    pub fn move_marker(&mut self, id: MarkerId, position: Position) -> bool {
        if !self.markers.set_position(id, position) { return false }
        self.correct_marker(id);
        true
    }

    /// Change a marker's own visibility. Any saved pre-correction flag is
    /// discarded, then the marker is re-corrected so a covered marker stays
    /// hidden until uncovered.
    pub fn set_marker_visible(&mut self, id: MarkerId, visible: bool) -> bool {
        let Some(marker) = self.markers.get_mut(id) else { return false };
        self.engine.remove(id);
        marker.set_visible(visible);
        self.correct_marker(id);
        true
    }

    /// Record which cluster a marker is grouped into. Call
    /// [`refresh_clusters`](Self::refresh_clusters) once the clusterer has
    /// re-rendered.
    ///
    /// The tag does not exempt the marker from correction: grouped markers
    /// are corrected like any other, so they come back with the right
    /// visibility when their cluster dissolves.
    pub fn set_marker_cluster(&mut self, id: MarkerId, cluster: Option<ClusterId>) -> bool {
        self.markers.set_cluster(id, cluster)
    }

    /// Delete a marker and its correction bookkeeping.
    pub fn remove_marker(&mut self, id: MarkerId) -> Option<MapMarker> {
        let removed = self.markers.remove(id)?;
        self.engine.remove(id);
        Some(removed)
    }

    /// Drop bookkeeping for a marker owned elsewhere (a cluster glyph or a
    /// managed marker) that has been deleted.
    pub fn release_marker(&mut self, id: MarkerId) {
        self.engine.remove(id);
    }

    fn correct_marker(&mut self, id: MarkerId) {
        if let Some(marker) = self.markers.get_mut(id) {
            self.engine.apply_correction(&self.shapes, marker);
        }
    }

    // -----------------------------------------------------------------------
    // Shapes
    // -----------------------------------------------------------------------

    /// Add or replace a shape, then re-correct every marker.
    pub fn upsert_shape(&mut self, id: impl Into<ShapeId>, shape: impl Into<Shape>) -> Result<CorrectionStats> {
        let id = id.into();
        self.shapes.insert(id.clone(), shape)
            .with_context(|| format!("Failed to add shape {id}"))?;
        debug!(shape = %id, "shape upserted");
        Ok(self.correct_all())
    }

    /// Remove a shape, then re-correct every marker. Returns false if it did not exist.
    pub fn remove_shape(&mut self, id: &ShapeId) -> bool {
        if self.shapes.remove(id).is_none() { return false }
        debug!(shape = %id, "shape removed");
        self.correct_all();
        true
    }

    pub fn set_shape_visible(&mut self, id: &ShapeId, visible: bool) -> bool {
        if !self.shapes.set_visible(id, visible) { return false }
        self.correct_all();
        true
    }

    pub fn set_shape_above_markers(&mut self, id: &ShapeId, above: bool) -> bool {
        if !self.shapes.set_above_markers(id, above) { return false }
        self.correct_all();
        true
    }

    // -----------------------------------------------------------------------
    // Collaborators
    // -----------------------------------------------------------------------

    /// Attach the clustering collaborator whose displayed markers are corrected
    /// alongside the direct ones.
    pub fn set_cluster_bridge(&mut self, clusters: Box<dyn ClusterBridge>) {
        self.clusters = Some(clusters);
    }

    pub fn take_cluster_bridge(&mut self) -> Option<Box<dyn ClusterBridge>> { self.clusters.take() }

    pub fn cluster_bridge_mut(&mut self) -> Option<&mut (dyn ClusterBridge + 'static)> {
        self.clusters.as_deref_mut()
    }

    /// Attach a marker-manager collection corrected after the cluster view.
    pub fn set_managed_view(&mut self, managed: Box<dyn MarkerView>) {
        self.managed = Some(managed);
    }

    pub fn take_managed_view(&mut self) -> Option<Box<dyn MarkerView>> { self.managed.take() }

    /// Correct the cluster bridge's displayed markers after a cluster re-render.
    pub fn refresh_clusters(&mut self) -> CorrectionStats {
        match self.clusters.as_deref_mut() {
            Some(clusters) => self.engine.apply_corrections(&self.shapes, &mut Displayed(clusters)),
            None => CorrectionStats::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Whole-map operations
    // -----------------------------------------------------------------------

    /// Re-correct every marker in every attached view.
    pub fn correct_all(&mut self) -> CorrectionStats {
        let mut views = MarkerViews::new(&mut self.markers);
        if let Some(clusters) = self.clusters.as_deref_mut() { views = views.with_clusters(clusters); }
        if let Some(managed) = self.managed.as_deref_mut() { views = views.with_managed(managed); }
        self.engine.correct_all(&self.shapes, views)
    }

    /// Enable or disable correction. Enabling does not re-correct markers that
    /// changed while it was off; call [`correct_all`](Self::correct_all) for that.
    pub fn set_correction_enabled(&mut self, enabled: bool) {
        self.engine.set_enabled(enabled);
    }

    /// Drop every marker, shape and saved visibility, e.g. before a new map load.
    /// Attached collaborators are kept.
    pub fn reset(&mut self) {
        self.markers.clear();
        self.shapes.clear();
        self.engine.clear();
    }
}

/// Presents a cluster bridge's displayed markers as a plain marker view.
struct Displayed<'a>(&'a mut dyn ClusterBridge);

impl MarkerView for Displayed<'_> {
    fn visit_markers(&mut self, visit: &mut dyn FnMut(&mut dyn Marker)) {
        self.0.visit_displayed(visit)
    }
}

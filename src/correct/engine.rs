use std::ops::ControlFlow;

use ahash::AHashSet;
use tracing::{debug, info, trace};

use crate::config::CorrectionConfig;
use crate::ledger::VisibilityLedger;
use crate::shape::ShapeSource;
use crate::types::{MarkerId, Position};

use super::marker::{Marker, MarkerView, MarkerViews};

/// What one correction did to one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// The marker was covered and visible; it is now hidden.
    Hidden,
    /// The marker is no longer covered; its saved visibility was put back.
    Restored(bool),
    /// Nothing to do: covered but already hidden, or uncovered with nothing saved.
    Unchanged,
    /// Correction is disabled.
    Skipped,
}

/// Totals for a batch of corrections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionStats {
    /// Distinct markers examined.
    pub visited: usize,
    pub hidden: usize,
    pub restored: usize,
}

impl CorrectionStats {
    fn record(&mut self, correction: Correction) {
        self.visited += 1;
        match correction {
            Correction::Hidden => self.hidden += 1,
            Correction::Restored(_) => self.restored += 1,
            Correction::Unchanged | Correction::Skipped => {}
        }
    }
}

/// Hides markers that sit beneath visible above-markers shapes and restores
/// them once uncovered.
///
/// The engine owns only the ledger; shapes and markers are borrowed for each
/// call. Every mutating operation takes `&mut self`, so a correction pass can
/// never be re-entered from a marker callback.
#[derive(Debug, Clone)]
pub struct CorrectionEngine {
    ledger: VisibilityLedger,
    enabled: bool,
    edge_tolerance_m: f64,
}

impl Default for CorrectionEngine {
    fn default() -> Self { Self::new(&CorrectionConfig::default()) }
}

impl CorrectionEngine {
    pub fn new(config: &CorrectionConfig) -> Self {
        Self {
            ledger: VisibilityLedger::new(),
            enabled: config.enabled,
            edge_tolerance_m: config.edge_tolerance_m,
        }
    }

    #[inline] pub fn is_enabled(&self) -> bool { self.enabled }

    /// Turn correction on or off. The ledger is kept as-is either way.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            info!(enabled, saved = self.ledger.len(), "marker visibility correction toggled");
        }
        self.enabled = enabled;
    }

    #[inline] pub fn edge_tolerance_m(&self) -> f64 { self.edge_tolerance_m }

    #[inline] pub fn ledger(&self) -> &VisibilityLedger { &self.ledger }

    /// Returns true if any visible above-markers shape contains or borders
    /// `position`. Stops at the first covering shape.
    pub fn is_covered<S: ShapeSource + ?Sized>(&self, shapes: &S, position: Position) -> bool {
        let tolerance = self.edge_tolerance_m;
        shapes.for_each_shape(&mut |shape| {
            if shape.covers(position, tolerance) { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        }).is_break()
    }

    /// Hide or restore a single marker according to the current shapes.
    pub fn apply_correction<S, M>(&mut self, shapes: &S, marker: &mut M) -> Correction
    where
        S: ShapeSource + ?Sized,
        M: Marker + ?Sized,
    {
        if !self.enabled { return Correction::Skipped }
        self.correct(shapes, marker)
    }

    /// Correct every marker in `view`, each independently.
    pub fn apply_corrections<S, V>(&mut self, shapes: &S, view: &mut V) -> CorrectionStats
    where
        S: ShapeSource + ?Sized,
        V: MarkerView + ?Sized,
    {
        let mut stats = CorrectionStats::default();
        if !self.enabled { return stats }

        view.visit_markers(&mut |marker| stats.record(self.correct(shapes, marker)));
        stats
    }

    /// Correct the direct, clustered and managed marker views in that order.
    /// A marker present in several views is corrected once.
    pub fn correct_all<S: ShapeSource + ?Sized>(&mut self, shapes: &S, views: MarkerViews<'_>) -> CorrectionStats {
        let mut stats = CorrectionStats::default();
        if !self.enabled { return stats }

        let mut seen: AHashSet<MarkerId> = AHashSet::new();
        let mut visit = |marker: &mut dyn Marker| {
            if seen.insert(marker.id()) {
                stats.record(self.correct(shapes, marker));
            }
        };

        views.direct.visit_markers(&mut visit);
        if let Some(clusters) = views.clustered { clusters.visit_displayed(&mut visit); }
        if let Some(managed) = views.managed { managed.visit_markers(&mut visit); }

        debug!(visited = stats.visited, hidden = stats.hidden, restored = stats.restored, "correction pass finished");
        stats
    }

    /// Drop bookkeeping for a marker that is being deleted. Its visibility is
    /// left alone. Active even while correction is disabled.
    pub fn remove(&mut self, marker: MarkerId) {
        self.ledger.forget(marker);
    }

    /// Drop all bookkeeping, e.g. before the map's overlays are rebuilt.
    /// Active even while correction is disabled.
    pub fn clear(&mut self) {
        self.ledger.clear();
    }

    fn correct<S, M>(&mut self, shapes: &S, marker: &mut M) -> Correction
    where
        S: ShapeSource + ?Sized,
        M: Marker + ?Sized,
    {
        let id = marker.id();
        let position = marker.position();

        if self.is_covered(shapes, position) {
            if !marker.is_visible() {
                trace!(marker = %id, "covered marker already hidden");
                return Correction::Unchanged;
            }
            self.ledger.save(id, true);
            marker.set_visible(false);
            debug!(marker = %id, %position, "hid covered marker");
            return Correction::Hidden;
        }

        match self.ledger.restore(id) {
            Some(original) => {
                marker.set_visible(original);
                debug!(marker = %id, %position, visible = original, "restored uncovered marker");
                Correction::Restored(original)
            }
            None => {
                trace!(marker = %id, "uncovered marker has nothing to restore");
                Correction::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Shape, ShapeCircle, ShapePolygon};
    use crate::correct::ClusterBridge;

    #[derive(Debug, Clone)]
    struct Pin {
        id: MarkerId,
        position: Position,
        visible: bool,
        writes: usize,
    }

    impl Pin {
        fn new(id: u64, lat: f64, lng: f64, visible: bool) -> Self {
            Self { id: MarkerId(id), position: Position::new(lat, lng), visible, writes: 0 }
        }
    }

    impl Marker for Pin {
        fn id(&self) -> MarkerId { self.id }
        fn position(&self) -> Position { self.position }
        fn is_visible(&self) -> bool { self.visible }
        fn set_visible(&mut self, visible: bool) { self.visible = visible; self.writes += 1; }
    }

    struct Glyphs(Vec<Pin>);

    impl ClusterBridge for Glyphs {
        fn visit_displayed(&mut self, visit: &mut dyn FnMut(&mut dyn Marker)) {
            for pin in &mut self.0 { visit(pin) }
        }
    }

    fn square(above: bool, visible: bool) -> Shape {
        ShapePolygon::new([
            Position::new(0.0, 0.0),
            Position::new(0.0, 2.0),
            Position::new(2.0, 2.0),
            Position::new(2.0, 0.0),
        ])
        .with_above_markers(above)
        .with_visible(visible)
        .into()
    }

    #[test]
    fn covered_visible_marker_is_hidden_and_saved() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut pin = Pin::new(1, 1.0, 1.0, true);

        assert_eq!(engine.apply_correction(&shapes, &mut pin), Correction::Hidden);
        assert!(!pin.visible);
        assert_eq!(engine.ledger().get(pin.id), Some(true));
    }

    #[test]
    fn uncovering_restores_saved_flag() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut pin = Pin::new(1, 1.0, 1.0, true);
        engine.apply_correction(&shapes, &mut pin);

        pin.position = Position::new(5.0, 5.0);
        assert_eq!(engine.apply_correction(&shapes, &mut pin), Correction::Restored(true));
        assert!(pin.visible);
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn covered_hidden_marker_is_left_alone() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut pin = Pin::new(1, 1.0, 1.0, false);

        assert_eq!(engine.apply_correction(&shapes, &mut pin), Correction::Unchanged);
        assert!(!pin.visible);
        assert_eq!(pin.writes, 0);
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn uncovered_without_entry_is_untouched() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut pin = Pin::new(1, 9.0, 9.0, false);

        assert_eq!(engine.apply_correction(&shapes, &mut pin), Correction::Unchanged);
        assert_eq!(pin.writes, 0);
    }

    #[test]
    fn repeated_correction_is_idempotent() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut pin = Pin::new(1, 1.0, 1.0, true);

        engine.apply_correction(&shapes, &mut pin);
        assert_eq!(engine.apply_correction(&shapes, &mut pin), Correction::Unchanged);
        assert!(!pin.visible);
        assert_eq!(engine.ledger().len(), 1);
        assert_eq!(engine.ledger().get(pin.id), Some(true));
    }

    #[test]
    fn flags_gate_coverage() {
        let engine = CorrectionEngine::default();
        let inside = Position::new(1.0, 1.0);
        assert!(engine.is_covered(&vec![square(true, true)], inside));
        assert!(!engine.is_covered(&vec![square(false, true)], inside));
        assert!(!engine.is_covered(&vec![square(true, false)], inside));
        assert!(!engine.is_covered(&Vec::<Shape>::new(), inside));
    }

    #[test]
    fn any_single_shape_suffices() {
        let engine = CorrectionEngine::default();
        let shapes = vec![
            square(false, true),
            ShapeCircle::new(Position::new(40.0, 40.0), 10.0).with_above_markers(true).into(),
            ShapeCircle::new(Position::new(1.0, 1.0), 10.0).with_above_markers(true).into(),
        ];
        assert!(engine.is_covered(&shapes, Position::new(1.0, 1.0)));
        assert!(engine.is_covered(&shapes, Position::new(40.0, 40.0)));
        assert!(!engine.is_covered(&shapes, Position::new(20.0, 20.0)));
    }

    #[test]
    fn disabled_engine_touches_nothing() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::new(&CorrectionConfig { enabled: false, ..Default::default() });
        let mut pins = vec![Pin::new(1, 1.0, 1.0, true)];

        assert_eq!(engine.apply_correction(&shapes, &mut pins[0]), Correction::Skipped);
        assert_eq!(engine.apply_corrections(&shapes, &mut pins), CorrectionStats::default());
        assert_eq!(engine.correct_all(&shapes, MarkerViews::new(&mut pins)), CorrectionStats::default());
        assert!(pins[0].visible);
        assert_eq!(pins[0].writes, 0);
        assert!(engine.ledger().is_empty());
        // Still answers pure queries.
        assert!(engine.is_covered(&shapes, Position::new(1.0, 1.0)));
    }

    #[test]
    fn reenabling_resumes_from_frozen_ledger() {
        let mut shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut pin = Pin::new(1, 1.0, 1.0, true);
        engine.apply_correction(&shapes, &mut pin);

        engine.set_enabled(false);
        shapes.clear();
        assert_eq!(engine.apply_correction(&shapes, &mut pin), Correction::Skipped);
        assert_eq!(engine.ledger().get(pin.id), Some(true));

        engine.set_enabled(true);
        assert_eq!(engine.apply_correction(&shapes, &mut pin), Correction::Restored(true));
        assert!(pin.visible);
    }

    #[test]
    fn remove_and_clear_work_while_disabled() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut pins = vec![Pin::new(1, 1.0, 1.0, true), Pin::new(2, 1.5, 1.5, true)];
        engine.apply_corrections(&shapes, &mut pins);
        assert_eq!(engine.ledger().len(), 2);

        engine.set_enabled(false);
        engine.remove(MarkerId(1));
        assert!(!engine.ledger().contains(MarkerId(1)));
        assert!(!pins[0].visible, "remove must not touch visibility");

        engine.clear();
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn batch_stats() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut pins = vec![
            Pin::new(1, 1.0, 1.0, true),
            Pin::new(2, 1.2, 1.2, true),
            Pin::new(3, 8.0, 8.0, true),
        ];
        let stats = engine.apply_corrections(&shapes, &mut pins);
        assert_eq!(stats, CorrectionStats { visited: 3, hidden: 2, restored: 0 });

        for pin in &mut pins { pin.position = Position::new(9.0, 9.0) }
        let stats = engine.apply_corrections(&shapes, &mut pins);
        assert_eq!(stats, CorrectionStats { visited: 3, hidden: 0, restored: 2 });
    }

    #[test]
    fn correct_all_visits_each_identity_once() {
        let shapes = vec![square(true, true)];
        let mut engine = CorrectionEngine::default();
        let mut direct = vec![Pin::new(1, 1.0, 1.0, true), Pin::new(2, 5.0, 5.0, true)];
        let mut glyphs = Glyphs(vec![Pin::new(10, 1.0, 1.5, true), Pin::new(1, 1.0, 1.0, true)]);
        let mut managed = vec![Pin::new(2, 5.0, 5.0, true), Pin::new(20, 0.5, 0.5, true)];

        let views = MarkerViews::new(&mut direct).with_clusters(&mut glyphs).with_managed(&mut managed);
        let stats = engine.correct_all(&shapes, views);

        assert_eq!(stats, CorrectionStats { visited: 4, hidden: 3, restored: 0 });
        assert!(!direct[0].visible);
        assert!(!glyphs.0[0].visible);
        // The duplicate of marker 1 in the cluster view was skipped.
        assert_eq!(glyphs.0[1].writes, 0);
        assert!(!managed[1].visible);
        assert_eq!(engine.ledger().len(), 3);
    }

    #[test]
    fn tolerance_comes_from_config() {
        let engine = CorrectionEngine::new(&CorrectionConfig { edge_tolerance_m: 5.0, ..Default::default() });
        assert_eq!(engine.edge_tolerance_m(), 5.0);
        // ~1.1 m west of the square's western edge.
        let near_edge = Position::new(1.0, -1e-5);
        assert!(engine.is_covered(&vec![square(true, true)], near_edge));
        assert!(!CorrectionEngine::default().is_covered(&vec![square(true, true)], near_edge));
    }
}

use ahash::AHashMap;

use crate::correct::{Marker, MarkerView};
use crate::types::{ClusterId, MarkerId, Position};

/// A marker placed directly on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    id: MarkerId,
    position: Position,
    visible: bool,
    /// Grouping tag for the host. Correction ignores it.
    cluster: Option<ClusterId>,
}

impl MapMarker {
    #[inline] pub fn id(&self) -> MarkerId { self.id }
    #[inline] pub fn position(&self) -> Position { self.position }
    /// Displayed visibility, after correction.
    #[inline] pub fn is_visible(&self) -> bool { self.visible }
    #[inline] pub fn cluster(&self) -> Option<ClusterId> { self.cluster }
}

impl Marker for MapMarker {
    fn id(&self) -> MarkerId { self.id }
    fn position(&self) -> Position { self.position }
    fn is_visible(&self) -> bool { self.visible }
    fn set_visible(&mut self, visible: bool) { self.visible = visible; }
}

/// Markers added directly to the map, keyed by identity.
///
/// Identities come from a monotonic counter and are never reused, so a stale
/// identity can never alias a newer marker.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: AHashMap<MarkerId, MapMarker>,
    next_id: u64,
}

impl MarkerStore {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn len(&self) -> usize { self.markers.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.markers.is_empty() }

    #[inline] pub fn get(&self, id: MarkerId) -> Option<&MapMarker> { self.markers.get(&id) }

    #[inline] pub fn contains(&self, id: MarkerId) -> bool { self.markers.contains_key(&id) }

    pub fn iter(&self) -> impl Iterator<Item = &MapMarker> { self.markers.values() }

    /// Place a new marker and return its identity.
    pub fn add(&mut self, position: Position, visible: bool) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(id, MapMarker { id, position, visible, cluster: None });
        id
    }

    pub fn remove(&mut self, id: MarkerId) -> Option<MapMarker> { self.markers.remove(&id) }

    pub(super) fn get_mut(&mut self, id: MarkerId) -> Option<&mut MapMarker> { self.markers.get_mut(&id) }

    pub(super) fn set_position(&mut self, id: MarkerId, position: Position) -> bool {
        self.get_mut(id).map(|marker| marker.position = position).is_some()
    }

    pub(super) fn set_cluster(&mut self, id: MarkerId, cluster: Option<ClusterId>) -> bool {
        self.get_mut(id).map(|marker| marker.cluster = cluster).is_some()
    }

    /// Markers belonging to `cluster`.
    pub fn in_cluster(&self, cluster: ClusterId) -> impl Iterator<Item = &MapMarker> {
        self.markers.values().filter(move |marker| marker.cluster == Some(cluster))
    }

    pub fn clear(&mut self) { self.markers.clear(); }
}

impl MarkerView for MarkerStore {
    fn visit_markers(&mut self, visit: &mut dyn FnMut(&mut dyn Marker)) {
        for marker in self.markers.values_mut() { visit(marker) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut store = MarkerStore::new();
        let a = store.add(Position::new(0.0, 0.0), true);
        store.remove(a);
        let b = store.add(Position::new(0.0, 0.0), true);
        assert_ne!(a, b);
        assert_eq!(store.len(), 1);
        assert!(!store.contains(a));
    }

    #[test]
    fn cluster_membership() {
        let mut store = MarkerStore::new();
        let a = store.add(Position::new(0.0, 0.0), true);
        let b = store.add(Position::new(1.0, 1.0), true);
        store.add(Position::new(2.0, 2.0), true);

        assert!(store.set_cluster(a, Some(ClusterId(1))));
        assert!(store.set_cluster(b, Some(ClusterId(1))));
        assert_eq!(store.in_cluster(ClusterId(1)).count(), 2);

        assert!(store.set_cluster(a, None));
        assert_eq!(store.in_cluster(ClusterId(1)).map(|m| m.id()).collect::<Vec<_>>(), vec![b]);
        assert!(!store.set_cluster(MarkerId(99), None));
    }

    #[test]
    fn view_visits_every_marker() {
        let mut store = MarkerStore::new();
        for i in 0..3 { store.add(Position::new(i as f64, 0.0), true); }
        let mut seen = Vec::new();
        store.visit_markers(&mut |marker| seen.push(marker.id()));
        seen.sort_unstable();
        assert_eq!(seen, vec![MarkerId(0), MarkerId(1), MarkerId(2)]);
    }
}

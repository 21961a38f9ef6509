use std::collections::hash_map::Entry;

use ahash::AHashMap;

use crate::types::MarkerId;

/// Saved pre-correction visibility for every marker currently hidden by a
/// covering shape.
///
/// An entry exists exactly while the engine holds a marker hidden. Entries are
/// keyed by `MarkerId`, never by the marker itself, so the ledger cannot keep a
/// deleted marker alive; callers drop entries for deleted markers with
/// [`forget`](Self::forget).
#[derive(Debug, Clone, Default)]
pub struct VisibilityLedger {
    saved: AHashMap<MarkerId, bool>,
}

impl VisibilityLedger {
    pub fn new() -> Self { Self::default() }

    /// Record `original` for `marker` unless an entry already exists. Returns
    /// true if the entry was inserted.
    ///
    /// A marker covered by several shapes in one pass keeps the flag saved the
    /// first time, not the already-overridden `false`.
    pub fn save(&mut self, marker: MarkerId, original: bool) -> bool {
        match self.saved.entry(marker) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => { slot.insert(original); true }
        }
    }

    /// Remove and return the saved flag, or `None` if no correction was active.
    #[inline]
    pub fn restore(&mut self, marker: MarkerId) -> Option<bool> { self.saved.remove(&marker) }

    /// Drop any entry for `marker` without reporting it.
    #[inline]
    pub fn forget(&mut self, marker: MarkerId) { self.saved.remove(&marker); }

    /// Drop all entries.
    pub fn clear(&mut self) { self.saved.clear(); }

    /// Saved flag for `marker`, if it is currently hidden by correction.
    #[inline]
    pub fn get(&self, marker: MarkerId) -> Option<bool> { self.saved.get(&marker).copied() }

    #[inline] pub fn contains(&self, marker: MarkerId) -> bool { self.saved.contains_key(&marker) }

    /// Number of markers currently hidden by correction.
    #[inline] pub fn len(&self) -> usize { self.saved.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.saved.is_empty() }

    /// Iterate over `(marker, original visibility)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, bool)> + '_ {
        self.saved.iter().map(|(&id, &visible)| (id, visible))
    }
}

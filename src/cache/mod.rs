//! Per-container break cache
//!
//! Each rendered container moves through
//! `Uncomputed -> Computed -> (Extended | Invalidated)`, and `Invalidated`
//! returns to `Computed` on the next read. Reads of a `Computed` or
//! `Extended` entry are served without touching the geometry.

use crate::layout::{AdditionalBreaks, BreakParams, BreakSequence};
use crate::ContainerId;
use rustc_hash::FxHashMap;

/// Lifecycle of one container's cached breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakState {
    Uncomputed,
    Computed,
    Extended,
    Invalidated,
}

impl BreakState {
    /// Whether the cached sequence can be served as-is
    pub fn is_fresh(self) -> bool {
        matches!(self, BreakState::Computed | BreakState::Extended)
    }
}

/// Cached breaks for a single container
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub state: BreakState,
    pub breaks: BreakSequence,
    /// Container height the breaks were computed for
    pub height: f32,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            state: BreakState::Uncomputed,
            breaks: BreakSequence::new(),
            height: 0.0,
        }
    }
}

/// Counters for observing cache behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub full_computations: u64,
    pub extensions: u64,
    pub hits: u64,
}

/// Outcome of a read-through lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Served from cache
    Hit(&'a BreakSequence),
    /// Freshly generated and stored
    Computed(&'a BreakSequence),
}

impl<'a> Lookup<'a> {
    pub fn breaks(&self) -> &'a BreakSequence {
        match self {
            Lookup::Hit(breaks) | Lookup::Computed(breaks) => breaks,
        }
    }
}

/// Break sequences keyed by container
#[derive(Debug, Default)]
pub struct BreakCache {
    entries: FxHashMap<ContainerId, CacheEntry>,
    stats: CacheStats,
}

impl BreakCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a container. Returns false if it was already known.
    pub fn register(&mut self, container: ContainerId) -> bool {
        if self.entries.contains_key(&container) {
            return false;
        }
        self.entries.insert(container, CacheEntry::new());
        true
    }

    /// Forget a container entirely
    pub fn remove(&mut self, container: ContainerId) -> Option<CacheEntry> {
        self.entries.remove(&container)
    }

    pub fn contains(&self, container: ContainerId) -> bool {
        self.entries.contains_key(&container)
    }

    pub fn containers(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, container: ContainerId) -> Option<&CacheEntry> {
        self.entries.get(&container)
    }

    pub fn state(&self, container: ContainerId) -> Option<BreakState> {
        self.entries.get(&container).map(|e| e.state)
    }

    pub fn breaks(&self, container: ContainerId) -> Option<&BreakSequence> {
        self.entries.get(&container).map(|e| &e.breaks)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every cached sequence. Configuration applies to all containers
    /// alike, so there is no partial form of this.
    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.breaks.clear();
            entry.state = BreakState::Invalidated;
        }
    }

    /// Drop one container's sequence, e.g. after its content shrank
    pub fn invalidate(&mut self, container: ContainerId) {
        if let Some(entry) = self.entries.get_mut(&container) {
            entry.breaks.clear();
            entry.state = BreakState::Invalidated;
        }
    }

    /// Serve the cached sequence, computing it first if the entry is stale.
    /// Unknown containers are registered on the way.
    pub fn get_or_compute(
        &mut self,
        container: ContainerId,
        height: f32,
        params: &BreakParams,
    ) -> Lookup<'_> {
        let entry = self.entries.entry(container).or_insert_with(CacheEntry::new);

        if entry.state.is_fresh() {
            self.stats.hits += 1;
            return Lookup::Hit(&entry.breaks);
        }

        entry.breaks = params.generate(height);
        entry.height = height;
        entry.state = BreakState::Computed;
        self.stats.full_computations += 1;

        Lookup::Computed(&entry.breaks)
    }

    /// Extend a fresh entry to `new_height`, appending the new breaks in
    /// place. Returns `None` when the entry is missing or stale, in which
    /// case the caller must go through [`BreakCache::get_or_compute`].
    pub fn extend(
        &mut self,
        container: ContainerId,
        new_height: f32,
        params: &BreakParams,
    ) -> Option<AdditionalBreaks> {
        let entry = self.entries.get_mut(&container)?;
        if !entry.state.is_fresh() || new_height <= entry.height {
            return None;
        }

        let additional = params.extend(&entry.breaks, entry.height, new_height);
        entry.breaks.append(&additional);
        entry.height = new_height;
        entry.state = BreakState::Extended;
        self.stats.extensions += 1;

        Some(additional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BreakParams {
        BreakParams {
            page_height: 900.0,
            calibration_offset: 0.0,
            min_spacing: 50.0,
        }
    }

    #[test]
    fn test_register_starts_uncomputed() {
        let mut cache = BreakCache::new();
        assert!(cache.register(ContainerId(1)));
        assert!(!cache.register(ContainerId(1)));
        assert_eq!(cache.state(ContainerId(1)), Some(BreakState::Uncomputed));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_second_read_is_a_hit() {
        let mut cache = BreakCache::new();
        let first = cache
            .get_or_compute(ContainerId(1), 2000.0, &params())
            .breaks()
            .clone();
        let second = cache.get_or_compute(ContainerId(1), 2000.0, &params());
        assert!(matches!(second, Lookup::Hit(_)));
        assert_eq!(second.breaks(), &first);

        let stats = cache.stats();
        assert_eq!(stats.full_computations, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(cache.state(ContainerId(1)), Some(BreakState::Computed));
    }

    #[test]
    fn test_extend_appends_in_place() {
        let mut cache = BreakCache::new();
        cache.get_or_compute(ContainerId(1), 2000.0, &params());

        let additional = cache.extend(ContainerId(1), 3000.0, &params()).unwrap();
        assert_eq!(additional.as_slice(), &[2700.0]);
        assert_eq!(
            cache.breaks(ContainerId(1)).unwrap().offsets(),
            &[900.0, 1800.0, 2700.0]
        );
        assert_eq!(cache.state(ContainerId(1)), Some(BreakState::Extended));
        assert_eq!(cache.entry(ContainerId(1)).unwrap().height, 3000.0);
        assert_eq!(cache.stats().extensions, 1);
    }

    #[test]
    fn test_extend_requires_fresh_entry() {
        let mut cache = BreakCache::new();
        assert!(cache.extend(ContainerId(1), 3000.0, &params()).is_none());

        cache.register(ContainerId(1));
        assert!(cache.extend(ContainerId(1), 3000.0, &params()).is_none());

        cache.get_or_compute(ContainerId(1), 2000.0, &params());
        cache.invalidate_all();
        assert!(cache.extend(ContainerId(1), 3000.0, &params()).is_none());
    }

    #[test]
    fn test_extend_ignores_shrink() {
        let mut cache = BreakCache::new();
        cache.get_or_compute(ContainerId(1), 2000.0, &params());
        assert!(cache.extend(ContainerId(1), 1500.0, &params()).is_none());
        assert_eq!(cache.state(ContainerId(1)), Some(BreakState::Computed));
    }

    #[test]
    fn test_invalidate_all_forces_recompute() {
        let mut cache = BreakCache::new();
        cache.get_or_compute(ContainerId(1), 2000.0, &params());
        cache.get_or_compute(ContainerId(2), 5000.0, &params());

        cache.invalidate_all();
        for id in [ContainerId(1), ContainerId(2)] {
            assert_eq!(cache.state(id), Some(BreakState::Invalidated));
            assert!(cache.breaks(id).unwrap().is_empty());
        }

        let lookup = cache.get_or_compute(ContainerId(1), 2000.0, &params());
        assert!(matches!(lookup, Lookup::Computed(_)));
        assert_eq!(cache.state(ContainerId(1)), Some(BreakState::Computed));
        assert_eq!(cache.stats().full_computations, 3);
    }

    #[test]
    fn test_invalidate_single_container() {
        let mut cache = BreakCache::new();
        cache.get_or_compute(ContainerId(1), 2000.0, &params());
        cache.get_or_compute(ContainerId(2), 2000.0, &params());

        cache.invalidate(ContainerId(1));
        assert_eq!(cache.state(ContainerId(1)), Some(BreakState::Invalidated));
        assert_eq!(cache.state(ContainerId(2)), Some(BreakState::Computed));
    }

    #[test]
    fn test_remove() {
        let mut cache = BreakCache::new();
        cache.get_or_compute(ContainerId(1), 2000.0, &params());
        assert!(cache.remove(ContainerId(1)).is_some());
        assert!(!cache.contains(ContainerId(1)));
        assert!(cache.is_empty());
    }
}

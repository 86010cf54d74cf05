//! LRU Tracker Module
//!
//! Access-order bookkeeping for capacity eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order with a monotonic tick per key.
///
/// `by_tick` is ordered oldest first, so eviction pops its first entry.
#[derive(Debug, Default)]
pub struct LruTracker {
    by_tick: BTreeMap<u64, String>,
    ticks: HashMap<String, u64>,
    next_tick: u64,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if unknown.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(previous) = self.ticks.insert(key.to_string(), tick) {
            self.by_tick.remove(&previous);
        }
        self.by_tick.insert(tick, key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_in_insertion_order() {
        let mut lru = LruTracker::new();
        lru.touch("auction:id:id=1");
        lru.touch("auction:id:id=2");
        lru.touch("auction:id:id=3");

        assert_eq!(lru.evict_oldest().as_deref(), Some("auction:id:id=1"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("auction:id:id=2"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("auction:id:id=3"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_touch_moves_key_to_newest() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");

        assert_eq!(lru.evict_oldest().as_deref(), Some("b"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("c"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("a"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_remove_unknown_key_is_noop() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.remove("missing");

        assert_eq!(lru.evict_oldest().as_deref(), Some("a"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_evict_empty() {
        let mut lru = LruTracker::new();
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_removed_key_is_never_evicted() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.remove("a");

        assert_eq!(lru.evict_oldest().as_deref(), Some("b"));
        assert_eq!(lru.evict_oldest(), None);
    }
}

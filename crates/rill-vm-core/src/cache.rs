//! Instruction replay cache
//!
//! Holds the bytes consumed while at least one loop is open so a loop body
//! can run again without asking the stream for them a second time. Entries
//! are indexed by their offset from the outermost loop start, which is the
//! lowest position the cache ever has to serve.

use rustc_hash::FxHashMap;

/// Replay buffer keyed by instruction position
///
/// Positions recorded in order from the base live in a dense buffer.
/// Positions reached by a forward jump past its end are kept in a sparse
/// map until the dense run catches up with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionCache {
    base: usize,
    dense: Vec<u8>,
    sparse: FxHashMap<usize, u8>,
}

impl InstructionCache {
    /// Create an empty cache whose first entry will be at `base`
    pub fn new(base: usize) -> Self {
        Self {
            base,
            dense: Vec::new(),
            sparse: FxHashMap::default(),
        }
    }

    /// Position of the outermost loop start
    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// Cached byte at `position`
    #[inline]
    pub fn get(&self, position: usize) -> Option<u8> {
        let offset = position.checked_sub(self.base)?;
        match self.dense.get(offset) {
            Some(&byte) => Some(byte),
            None => self.sparse.get(&offset).copied(),
        }
    }

    /// Record `byte` at `position`
    ///
    /// An existing entry is never overwritten: a position keeps the byte it
    /// was first recorded with. Positions below the base are ignored.
    pub fn record(&mut self, position: usize, byte: u8) {
        let Some(offset) = position.checked_sub(self.base) else {
            return;
        };
        if offset < self.dense.len() {
            debug_assert_eq!(
                self.dense[offset], byte,
                "cache entry at {position} changed within a run"
            );
            return;
        }
        if offset > self.dense.len() {
            let cached = *self.sparse.entry(offset).or_insert(byte);
            debug_assert_eq!(cached, byte, "cache entry at {position} changed within a run");
            return;
        }

        self.dense.push(byte);
        while let Some(next) = self.sparse.remove(&self.dense.len()) {
            self.dense.push(next);
        }
    }

    /// Number of cached positions
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len() + self.sparse.len()
    }

    /// Whether nothing has been recorded yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty() && self.sparse.is_empty()
    }

    /// Whether `position` has an entry
    #[inline]
    pub fn contains(&self, position: usize) -> bool {
        self.get(position).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_misses() {
        let cache = InstructionCache::new(5);
        assert!(cache.is_empty());
        assert_eq!(cache.get(5), None);
        assert_eq!(cache.get(0), None);
    }

    #[test]
    fn test_record_and_replay() {
        let mut cache = InstructionCache::new(2);
        for (i, byte) in b"[+-]".iter().enumerate() {
            cache.record(2 + i, *byte);
        }
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.get(2), Some(b'['));
        assert_eq!(cache.get(5), Some(b']'));
        assert_eq!(cache.get(6), None);
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn test_entries_are_immutable() {
        let mut cache = InstructionCache::new(0);
        cache.record(0, b'[');
        cache.record(0, b'[');
        assert_eq!(cache.get(0), Some(b'['));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_gaps_stay_unserved() {
        let mut cache = InstructionCache::new(0);
        cache.record(0, b'[');
        cache.record(3, b'+');
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(0));
        assert!(!cache.contains(1));
        assert!(!cache.contains(2));
        assert!(cache.contains(3));
    }

    #[test]
    fn test_gap_filled_in_order_joins_dense_run() {
        let mut cache = InstructionCache::new(5);
        cache.record(5, b'[');
        cache.record(8, b']');
        cache.record(6, b'+');
        cache.record(7, b'-');
        assert_eq!(cache.len(), 4);
        assert!(cache.sparse.is_empty());
        assert_eq!(cache.dense, b"[+-]");
    }

    #[test]
    fn test_far_positions_do_not_allocate_the_gap() {
        let mut cache = InstructionCache::new(1);
        cache.record(1, b'[');
        cache.record(usize::MAX, b'-');
        cache.record(usize::MAX - 1, b'j');
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.dense.len(), 1);
        assert_eq!(cache.get(usize::MAX), Some(b'-'));
        assert_eq!(cache.get(usize::MAX - 1), Some(b'j'));
        assert_eq!(cache.get(2), None);
    }

    #[test]
    fn test_positions_below_base_are_ignored() {
        let mut cache = InstructionCache::new(10);
        cache.record(4, b'+');
        assert!(cache.is_empty());
    }
}

//! Transposition table
//!
//! Zobrist key -> cached search result. Collisions overwrite
//! unconditionally: no aging, no depth preference, no eviction. Memory is
//! bounded only by the number of distinct positions visited, and a deep
//! entry can be replaced by a shallower one, so callers must never rely on
//! an entry surviving unrelated stores.

use rustc_hash::FxHashMap;

use crate::board::Move;

/// How a cached score bounds the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub score: i32,
    pub depth: i32,
    pub best_move: Move,
    pub bound: Bound,
}

#[derive(Default)]
pub struct TranspositionTable {
    table: FxHashMap<u64, TTEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }

    /// Store, overwriting whatever the key held.
    pub fn set(&mut self, key: u64, entry: TTEntry) {
        self.table.insert(key, entry);
    }

    pub fn get(&self, key: u64) -> Option<TTEntry> {
        self.table.get(&key).copied()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: i32, depth: i32, bound: Bound) -> TTEntry {
        TTEntry {
            score,
            depth,
            best_move: Move::new(0, 1),
            bound,
        }
    }

    #[test]
    fn test_store_and_probe() {
        let mut tt = TranspositionTable::new();
        tt.set(0x1111, entry(42, 3, Bound::Exact));

        let got = tt.get(0x1111).expect("entry should exist");
        assert_eq!(got.score, 42);
        assert_eq!(got.depth, 3);
        assert_eq!(got.bound, Bound::Exact);

        assert!(tt.get(0x9999).is_none());
    }

    #[test]
    fn test_collision_overwrites_unconditionally() {
        let mut tt = TranspositionTable::new();
        // A deep exact entry...
        tt.set(0xABCD, entry(100, 10, Bound::Exact));
        // ...is evicted even by a shallower bound
        tt.set(0xABCD, entry(7, 2, Bound::UpperBound));

        let got = tt.get(0xABCD).expect("entry should exist");
        assert_eq!(got.score, 7);
        assert_eq!(got.depth, 2);
        assert_eq!(got.bound, Bound::UpperBound);
    }

    #[test]
    fn test_clear() {
        let mut tt = TranspositionTable::new();
        tt.set(1, entry(1, 1, Bound::LowerBound));
        tt.set(2, entry(2, 1, Bound::Exact));
        assert_eq!(tt.len(), 2);
        tt.clear();
        assert!(tt.is_empty());
        assert!(tt.get(1).is_none());
    }
}

//! Per-column string interning.
//!
//! Text columns store one `u32` id per row. Comparison and predicate work is
//! done once per distinct string and then looked up by id.

use std::collections::HashMap;

/// Interned string table for compact storage and cheap comparison
#[derive(Debug, Clone, Default)]
pub struct StringInterner {
    strings: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its id.
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }
        let id = u32::try_from(self.strings.len()).unwrap_or(u32::MAX);
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), id);
        id
    }

    /// Resolve an id back to its string.
    pub fn resolve(&self, id: u32) -> Option<&str> {
        self.strings.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Ordinal rank of every interned string, indexed by id.
    ///
    /// `ranks[a] < ranks[b]` iff `resolve(a) < resolve(b)` by byte order.
    pub fn ordinal_ranks(&self) -> Vec<u32> {
        let mut order: Vec<usize> = (0..self.strings.len()).collect();
        order.sort_unstable_by(|&a, &b| {
            let sa = self.strings.get(a).map_or("", String::as_str);
            let sb = self.strings.get(b).map_or("", String::as_str);
            sa.cmp(sb)
        });
        let mut ranks = vec![0_u32; self.strings.len()];
        for (rank, id) in order.into_iter().enumerate() {
            if let Some(slot) = ranks.get_mut(id) {
                *slot = u32::try_from(rank).unwrap_or(u32::MAX);
            }
        }
        ranks
    }

    /// Evaluate a predicate once per distinct string, indexed by id.
    pub fn matches<F>(&self, mut pred: F) -> Vec<bool>
    where
        F: FnMut(&str) -> bool,
    {
        self.strings.iter().map(|s| pred(s)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedupes() {
        let mut t = StringInterner::new();
        let a = t.intern("Engineering");
        let b = t.intern("Sales");
        let c = t.intern("Engineering");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(t.len(), 2);
        assert_eq!(t.resolve(b), Some("Sales"));
        assert_eq!(t.resolve(99), None);
    }

    #[test]
    fn test_ordinal_ranks_follow_byte_order() {
        let mut t = StringInterner::new();
        let z = t.intern("zeta");
        let a = t.intern("alpha");
        let upper = t.intern("Zeta");
        let ranks = t.ordinal_ranks();
        // Uppercase sorts before lowercase in ordinal comparison
        assert!(ranks[upper as usize] < ranks[a as usize]);
        assert!(ranks[a as usize] < ranks[z as usize]);
    }
}

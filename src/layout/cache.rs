//! Layout result cache.
//!
//! One slot per [`LayoutKind`]. Header and body geometry are requested
//! independently every frame, so each kind owns its slot and never evicts
//! the other. A slot is replaced when the fingerprint of its inputs changes.

use std::sync::Arc;

use serde::Serialize;

use super::{Fingerprint, Geometry, GeometrySolver, LayoutInput};
use crate::error::LayoutError;

/// Which row geometry is requested
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Header,
    Body,
}

impl LayoutKind {
    pub const ALL: [Self; 2] = [Self::Header, Self::Body];

    fn slot(self) -> usize {
        match self {
            Self::Header => 0,
            Self::Body => 1,
        }
    }
}

/// Solved geometry stored under the fingerprint of its inputs
#[derive(Debug, Clone)]
pub struct LayoutCacheEntry {
    pub key: Fingerprint,
    pub geometry: Arc<Geometry>,
}

/// Hit/miss counters since construction
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Fixed two-slot memo in front of a [`GeometrySolver`]
#[derive(Debug)]
pub struct LayoutCache<S> {
    slots: [Option<LayoutCacheEntry>; 2],
    solver: S,
    stats: CacheStats,
}

impl<S: GeometrySolver> LayoutCache<S> {
    pub fn new(solver: S) -> Self {
        Self {
            slots: [None, None],
            solver,
            stats: CacheStats::default(),
        }
    }

    /// Geometry for `kind`, solving only when the inputs' fingerprint differs
    /// from the stored one.
    ///
    /// On solver failure the slot keeps its previous entry and the error is
    /// returned; the other kind's slot is never touched.
    pub fn get_layout(
        &mut self,
        kind: LayoutKind,
        input: &LayoutInput<'_>,
    ) -> Result<Arc<Geometry>, LayoutError> {
        let key = Fingerprint::of(input);
        if let Some(entry) = self.entry(kind).filter(|e| e.key == key) {
            let geometry = Arc::clone(&entry.geometry);
            self.stats.hits += 1;
            tracing::trace!(?kind, "layout cache hit");
            return Ok(geometry);
        }

        self.stats.misses += 1;
        tracing::debug!(?kind, columns = input.columns.len(), "layout cache miss, solving");
        let geometry = match self.solver.resolve(input) {
            Ok(g) => Arc::new(g),
            Err(e) => {
                tracing::warn!(?kind, error = %e, "layout solve failed");
                return Err(e);
            }
        };
        if let Some(slot) = self.slots.get_mut(kind.slot()) {
            *slot = Some(LayoutCacheEntry {
                key,
                geometry: Arc::clone(&geometry),
            });
        }
        Ok(geometry)
    }

    /// Whether `get_layout(kind, input)` would be a hit.
    pub fn is_cached(&self, kind: LayoutKind, input: &LayoutInput<'_>) -> bool {
        let key = Fingerprint::of(input);
        self.entry(kind).is_some_and(|e| e.key == key)
    }

    pub fn entry(&self, kind: LayoutKind) -> Option<&LayoutCacheEntry> {
        self.slots.get(kind.slot()).and_then(Option::as_ref)
    }

    /// Clear both slots. The next request of each kind misses.
    pub fn invalidate(&mut self) {
        tracing::debug!("layout cache invalidated");
        self.slots = [None, None];
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::layout::{ContainerLayout, SizingContext};
    use crate::types::Column;

    /// Solver fake that records how often it ran.
    #[derive(Default)]
    struct Counting {
        calls: usize,
    }

    impl GeometrySolver for Counting {
        fn resolve(&mut self, input: &LayoutInput<'_>) -> Result<Geometry, LayoutError> {
            self.calls += 1;
            if input.container.gap < 0.0 {
                return Err(LayoutError::InvalidDirective("negative gap".to_string()));
            }
            Ok(Geometry {
                cells: Vec::new(),
                width: input.sizing.viewport_width,
                height: input.sizing.row_height,
            })
        }
    }

    fn sizing(row_height: f32) -> SizingContext {
        SizingContext {
            viewport_width: 800.0,
            row_height,
            line_height: 20.0,
        }
    }

    #[test]
    fn test_hit_after_miss() {
        let cols = vec![Column::new("a")];
        let container = ContainerLayout::default();
        let input = LayoutInput {
            columns: &cols,
            container: &container,
            sizing: sizing(36.0),
        };
        let mut cache = LayoutCache::new(Counting::default());
        let a = cache.get_layout(LayoutKind::Body, &input).unwrap();
        let b = cache.get_layout(LayoutKind::Body, &input).unwrap();
        assert_eq!(cache.solver().calls, 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_kinds_do_not_compete() {
        let cols = vec![Column::new("a")];
        let container = ContainerLayout::default();
        let header = LayoutInput {
            columns: &cols,
            container: &container,
            sizing: sizing(40.0),
        };
        let body = LayoutInput {
            sizing: sizing(36.0),
            ..header
        };
        let mut cache = LayoutCache::new(Counting::default());
        for _ in 0..3 {
            cache.get_layout(LayoutKind::Header, &header).unwrap();
            cache.get_layout(LayoutKind::Body, &body).unwrap();
        }
        assert_eq!(cache.solver().calls, 2);
    }

    #[test]
    fn test_failure_leaves_other_slot() {
        let cols = vec![Column::new("a")];
        let good = ContainerLayout::default();
        let bad = ContainerLayout {
            gap: -1.0,
            ..ContainerLayout::default()
        };
        let mut cache = LayoutCache::new(Counting::default());
        let header = LayoutInput {
            columns: &cols,
            container: &good,
            sizing: sizing(40.0),
        };
        cache.get_layout(LayoutKind::Header, &header).unwrap();

        let body = LayoutInput {
            columns: &cols,
            container: &bad,
            sizing: sizing(36.0),
        };
        assert!(cache.get_layout(LayoutKind::Body, &body).is_err());
        assert!(cache.is_cached(LayoutKind::Header, &header));
        assert!(cache.entry(LayoutKind::Body).is_none());
    }

    #[test]
    fn test_invalidate_forces_one_resolve_per_kind() {
        let cols = vec![Column::new("a")];
        let container = ContainerLayout::default();
        let input = LayoutInput {
            columns: &cols,
            container: &container,
            sizing: sizing(36.0),
        };
        let mut cache = LayoutCache::new(Counting::default());
        cache.get_layout(LayoutKind::Body, &input).unwrap();
        cache.invalidate();
        assert!(!cache.is_cached(LayoutKind::Body, &input));
        cache.get_layout(LayoutKind::Body, &input).unwrap();
        cache.get_layout(LayoutKind::Body, &input).unwrap();
        assert_eq!(cache.solver().calls, 2);
    }
}

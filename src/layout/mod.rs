//! Row geometry: solver boundary, fingerprinting and the two-slot cache.
//!
//! This module handles:
//! - Column and container directives in, per-cell rectangles out
//! - Fingerprinting every geometry-affecting input (scroll is excluded)
//! - Memoizing header and body geometry in independent slots
//! - Viewport sizing and scroll clamping
//! - Flat buffer export for renderers

pub mod buffer;
mod cache;
mod fingerprint;
mod geometry;
mod solver;
mod viewport;

pub use cache::{CacheStats, LayoutCache, LayoutCacheEntry, LayoutKind};
pub use fingerprint::Fingerprint;
pub use geometry::{
    CellRect, ContainerLayout, CrossAlign, Direction, Geometry, Justify, LayoutInput, PlacedCell,
    SizingContext, Wrap,
};
pub use solver::{GeometrySolver, TaffySolver};
pub use viewport::Viewport;

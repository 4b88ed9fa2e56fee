//! Row pipeline stages: sort, filter, and window.
//!
//! Each stage is a pure function over row ids. The orchestrator in
//! [`crate::engine`] memoizes their outputs across frames.

mod filter;
mod sort;
mod window;

pub use filter::{apply_filter, validate_conditions, FilterSet};
pub use sort::{apply_sort, validate_sort_keys, SortState};
pub use window::{clamp_scroll, compute_window, max_scroll, RowWindow};

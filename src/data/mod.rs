//! Columnar dataset supplied by the upstream data provider.
//!
//! The engine never mutates a loaded dataset; it only orders and filters
//! [`RowId`]s that index into it.

mod dataset;
mod intern;

pub use dataset::{CellValue, ColumnData, ColumnType, Dataset, DatasetBuilder, RowId};
pub use intern::StringInterner;

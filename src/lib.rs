//! gridview - windowed query and layout engine for virtualized tables
//!
//! Turns a columnar dataset plus sort and filter state into the minimal
//! visible row window for each frame, and memoizes flexbox cell geometry so
//! scrolling never re-runs the layout solver:
//! - Stable multi-key sort with nulls last
//! - AND-combined column predicates plus a global text search
//! - Overscanned row windows with idempotent scroll clamping
//! - Header and body geometry cached under a structural fingerprint
//! - 10^6 rows at one query per animation frame
//!
//! # Usage (Rust)
//!
//! ```
//! use gridview::{Column, Dataset, EngineConfig, QueryEngine, SortKey};
//!
//! let mut engine = QueryEngine::new(&EngineConfig::default())?;
//! let dataset = Dataset::builder(3)
//!     .text("name", [Some("Ada"), Some("Grace"), Some("Linus")])
//!     .number("salary", [Some(120_000.0), Some(98_000.0), None])
//!     .build()?;
//! engine.load(vec![Column::new("name"), Column::new("salary")], dataset)?;
//! engine.set_sort(vec![SortKey::descending("salary")])?;
//!
//! let frame = engine.query(0.0)?;
//! assert_eq!(frame.row_ids, vec![0, 1, 2]);
//! # Ok::<(), gridview::GridError>(())
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableEngine } from 'gridview';
//! await init();
//! const engine = new TableEngine();
//! engine.setColumns(columns);
//! engine.setData(rows);
//! const frame = engine.query(scrollTop);
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod layout;
pub mod query;
pub mod types;
pub mod view;
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use config::EngineConfig;
pub use data::{CellValue, ColumnData, ColumnType, Dataset, RowId};
pub use engine::{EnginePhase, EngineState, EngineStats, QueryEngine, QueryResult};
pub use error::{GridError, LayoutError, Result};
pub use layout::{
    ContainerLayout, Geometry, GeometrySolver, LayoutCache, LayoutKind, TaffySolver, Viewport,
};
pub use query::RowWindow;
pub use types::*;
pub use view::{SharedEngine, TableView};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

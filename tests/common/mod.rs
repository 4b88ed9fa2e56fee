//! Shared fixtures for integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use std::cell::Cell;
use std::rc::Rc;

use gridview::layout::{CellRect, LayoutInput};
use gridview::{
    Align, Column, Dataset, EngineConfig, Geometry, GeometrySolver, LayoutError, QueryEngine,
};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

pub const DEPARTMENTS: [&str; 4] = ["Engineering", "Sales", "Support", "Finance"];

/// Column model of the employee fixture
pub fn employee_columns() -> Vec<Column> {
    vec![
        Column::new("id").with_width(60.0).with_align(Align::Right),
        Column::new("name").with_flex(1.0, 1.0),
        Column::new("department").with_width(140.0),
        Column::new("salary").with_width(120.0).with_align(Align::Right),
        Column::new("active").with_width(80.0).with_align(Align::Center),
        Column::new("notes").with_width(200.0).sortable(false).filterable(false),
    ]
}

/// Deterministic employee rows as row-major JSON.
///
/// Salaries cycle through 60k..=150k in 10k steps; every 7th salary is null.
pub fn employee_rows(count: usize) -> Vec<Vec<Value>> {
    (0..count)
        .map(|i| {
            let salary = if i % 7 == 6 {
                Value::Null
            } else {
                json!(60_000 + (i % 10) * 10_000)
            };
            vec![
                json!(i),
                json!(format!("Employee {i:05}")),
                json!(DEPARTMENTS[i % DEPARTMENTS.len()]),
                salary,
                json!(i % 3 != 0),
                json!(format!("note {}", i % 11)),
            ]
        })
        .collect()
}

pub fn employee_dataset(count: usize) -> Dataset {
    Dataset::from_rows(&employee_columns(), &employee_rows(count)).unwrap()
}

/// Route engine logs to the test harness; `RUST_LOG=gridview=debug` shows them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine loaded with `count` employees and default configuration
pub fn employee_engine(count: usize) -> QueryEngine {
    init_tracing();
    let mut engine = QueryEngine::new(&EngineConfig::default()).unwrap();
    engine
        .load(employee_columns(), employee_dataset(count))
        .unwrap();
    engine
}

/// Geometry solver that lays cells out left to right and counts invocations.
#[derive(Clone, Default)]
pub struct CountingSolver {
    pub calls: Rc<Cell<usize>>,
}

impl CountingSolver {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl GeometrySolver for CountingSolver {
    fn resolve(&mut self, input: &LayoutInput<'_>) -> Result<Geometry, LayoutError> {
        self.calls.set(self.calls.get() + 1);
        if !input.container.gap.is_finite() {
            return Err(LayoutError::InvalidDirective("gap".to_string()));
        }
        let mut x = input.container.padding.left;
        let cells = input
            .columns
            .iter()
            .enumerate()
            .map(|(col, c)| {
                let width = match c.width {
                    gridview::Width::Fixed(px) => px,
                    gridview::Width::Auto => 100.0,
                };
                let rect = CellRect {
                    col,
                    x,
                    y: 0.0,
                    width,
                    height: input.sizing.row_height,
                    align: c.align,
                    padding: c.padding,
                };
                x += width + input.container.gap;
                rect
            })
            .collect();
        Ok(Geometry {
            cells,
            width: input.sizing.viewport_width,
            height: input.sizing.row_height,
        })
    }
}

//! JavaScript binding.
//!
//! `TableEngine` is a thin adapter: payloads are decoded with
//! `serde_wasm_bindgen`, every call is forwarded to [`QueryEngine`], and
//! errors surface as thrown `Error`s.
//!
//! ```javascript
//! import init, { TableEngine } from 'gridview';
//! await init();
//! const engine = new TableEngine();
//! engine.setColumns([{ id: 'name', width: 200 }, { id: 'salary', width: 120 }]);
//! engine.setData([['Ada', 120000], ['Linus', 95000]]);
//! const frame = engine.query(scrollTop);
//! const cells = engine.layoutBuffer(); // 16 floats per cell
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::data::{Dataset, RowId};
use crate::engine::{QueryEngine, QueryResult};
use crate::error::GridError;
use crate::layout::ContainerLayout;
use crate::query::RowWindow;
use crate::types::{Column, FilterCondition, FilterOperator, SortKey};

/// Filter payload with the operator kept as a string, so an unknown
/// operator is reported as a validation error rather than a decode error.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsFilterCondition {
    column_id: String,
    operator: String,
    #[serde(default)]
    value: Value,
}

impl TryFrom<JsFilterCondition> for FilterCondition {
    type Error = GridError;

    fn try_from(c: JsFilterCondition) -> Result<Self, GridError> {
        let operator: FilterOperator = c.operator.parse()?;
        Ok(Self::new(c.column_id, operator, c.value))
    }
}

/// Serializable frame summary returned by `query`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsFrame<'a> {
    row_window: RowWindow,
    row_ids: &'a [RowId],
    total_count: usize,
    filtered_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_error: Option<String>,
}

impl<'a> From<&'a QueryResult> for JsFrame<'a> {
    fn from(r: &'a QueryResult) -> Self {
        Self {
            row_window: r.row_window,
            row_ids: &r.row_ids,
            total_count: r.total_count,
            filtered_count: r.filtered_count,
            header_error: r.header.as_ref().err().map(ToString::to_string),
            body_error: r.body.as_ref().err().map(ToString::to_string),
        }
    }
}

#[wasm_bindgen]
pub struct TableEngine {
    engine: QueryEngine,
    config: EngineConfig,
    last: Option<QueryResult>,
}

#[wasm_bindgen]
impl TableEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<TableEngine, JsError> {
        console_error_panic_hook::set_once();
        let config = EngineConfig::default();
        Ok(Self {
            engine: QueryEngine::new(&config)?,
            config,
            last: None,
        })
    }

    /// Apply a partial configuration object; omitted fields take defaults.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config)?;
        self.engine.set_config(&config)?;
        self.config = config;
        Ok(())
    }

    #[wasm_bindgen(js_name = setColumns)]
    pub fn set_columns(&mut self, columns: JsValue) -> Result<(), JsError> {
        let columns: Vec<Column> = serde_wasm_bindgen::from_value(columns)?;
        self.engine.set_columns(columns)?;
        Ok(())
    }

    /// Load row-major data; cell `i` of each row belongs to column `i`.
    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&mut self, rows: JsValue) -> Result<(), JsError> {
        let rows: Vec<Vec<Value>> = serde_wasm_bindgen::from_value(rows)?;
        let columns = self.engine.state().columns().to_vec();
        let dataset = Dataset::from_rows(&columns, &rows)?;
        self.engine.load(columns, dataset)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = rowCount)]
    pub fn row_count(&self) -> usize {
        self.engine.state().dataset().row_count()
    }

    #[wasm_bindgen(js_name = setSort)]
    pub fn set_sort(&mut self, keys: JsValue) -> Result<(), JsError> {
        let keys: Vec<SortKey> = serde_wasm_bindgen::from_value(keys)?;
        self.engine.set_sort(keys)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleSort)]
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<(), JsError> {
        self.engine.toggle_sort(column_id)?;
        Ok(())
    }

    /// Active sort keys as `[{ columnId, direction }]`
    #[wasm_bindgen(js_name = sortKeys)]
    pub fn sort_keys(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.engine.state().sort_keys())?)
    }

    #[wasm_bindgen(js_name = setFilters)]
    pub fn set_filters(&mut self, conditions: JsValue) -> Result<(), JsError> {
        let raw: Vec<JsFilterCondition> = serde_wasm_bindgen::from_value(conditions)?;
        let conditions = raw
            .into_iter()
            .map(FilterCondition::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.engine.set_filters(conditions)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setGlobalFilter)]
    pub fn set_global_filter(&mut self, text: Option<String>) {
        self.engine.set_global_filter(text);
    }

    #[wasm_bindgen(js_name = setContainer)]
    pub fn set_container(&mut self, container: JsValue) -> Result<(), JsError> {
        let container: ContainerLayout = serde_wasm_bindgen::from_value(container)?;
        self.engine.set_container(container);
        Ok(())
    }

    /// Resize the viewport, keeping row metrics.
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<(), JsError> {
        let mut viewport = *self.engine.state().viewport();
        viewport.resize(width, height);
        self.engine.set_viewport(viewport)?;
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        Ok(())
    }

    #[wasm_bindgen(js_name = invalidateLayout)]
    pub fn invalidate_layout(&mut self) {
        self.engine.invalidate_layout();
    }

    /// Run one frame's query.
    ///
    /// Returns `{ rowWindow, rowIds, totalCount, filteredCount }`, plus
    /// `headerError` / `bodyError` when a layout kind failed.
    pub fn query(&mut self, scroll_top: f64) -> Result<JsValue, JsError> {
        let result = self.engine.query(scroll_top)?;
        let value = serde_wasm_bindgen::to_value(&JsFrame::from(&result))?;
        self.last = Some(result);
        Ok(value)
    }

    /// Cells of the last query as a flat buffer, 16 floats per cell.
    #[wasm_bindgen(js_name = layoutBuffer)]
    pub fn layout_buffer(&self) -> js_sys::Float32Array {
        let buf = self
            .last
            .as_ref()
            .map(QueryResult::layout_buffer)
            .unwrap_or_default();
        js_sys::Float32Array::from(buf.as_slice())
    }

    /// Current configuration as a plain object
    pub fn config(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.config)?)
    }
}

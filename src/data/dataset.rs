use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StringInterner;
use crate::error::{GridError, Result};
use crate::types::Column;

/// Stable identifier of a row: its position in the loaded dataset
pub type RowId = u32;

/// Value type of a dataset column
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Text,
    Bool,
}

/// Typed column storage
#[derive(Debug, Clone)]
pub enum ColumnData {
    /// Dense f64 values, `NaN` marks null
    Number(Vec<f64>),
    /// Interned strings, `None` marks null
    Text {
        ids: Vec<Option<u32>>,
        intern: StringInterner,
    },
    Bool(Vec<Option<bool>>),
}

/// Borrowed view of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Null,
    Number(f64),
    Text(&'a str),
    Bool(bool),
}

impl CellValue<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl ColumnData {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Number(_) => ColumnType::Number,
            Self::Text { .. } => ColumnType::Text,
            Self::Bool(_) => ColumnType::Bool,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Number(v) => v.len(),
            Self::Text { ids, .. } => ids.len(),
            Self::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read one cell. Out-of-range rows read as null.
    pub fn value(&self, row: RowId) -> CellValue<'_> {
        let idx = row as usize;
        match self {
            Self::Number(v) => match v.get(idx) {
                Some(n) if !n.is_nan() => CellValue::Number(*n),
                _ => CellValue::Null,
            },
            Self::Text { ids, intern } => ids
                .get(idx)
                .copied()
                .flatten()
                .and_then(|id| intern.resolve(id))
                .map_or(CellValue::Null, CellValue::Text),
            Self::Bool(v) => v
                .get(idx)
                .copied()
                .flatten()
                .map_or(CellValue::Null, CellValue::Bool),
        }
    }

    fn from_json_column(rows: &[Vec<Value>], col_idx: usize) -> Self {
        let cells = rows.iter().map(|row| row.get(col_idx).unwrap_or(&Value::Null));
        match detect_type(rows, col_idx) {
            ColumnType::Number => {
                Self::Number(cells.map(|v| v.as_f64().unwrap_or(f64::NAN)).collect())
            }
            ColumnType::Bool => Self::Bool(cells.map(Value::as_bool).collect()),
            ColumnType::Text => {
                let mut intern = StringInterner::new();
                let ids = cells
                    .map(|v| match v {
                        Value::Null => None,
                        Value::String(s) => Some(intern.intern(s)),
                        other => Some(intern.intern(&other.to_string())),
                    })
                    .collect();
                Self::Text { ids, intern }
            }
        }
    }
}

/// Column type from the first non-null value; all-null columns are text.
fn detect_type(rows: &[Vec<Value>], col_idx: usize) -> ColumnType {
    rows.iter()
        .filter_map(|row| row.get(col_idx))
        .find(|v| !v.is_null())
        .map_or(ColumnType::Text, |v| match v {
            Value::Number(_) => ColumnType::Number,
            Value::Bool(_) => ColumnType::Bool,
            _ => ColumnType::Text,
        })
}

/// Immutable columnar dataset addressed by column id and [`RowId`]
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<(String, ColumnData)>,
    by_id: HashMap<String, usize>,
    row_count: usize,
}

impl Dataset {
    /// Empty dataset with no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a dataset with a fixed row count.
    pub fn builder(row_count: usize) -> DatasetBuilder {
        DatasetBuilder {
            row_count,
            columns: Vec::new(),
        }
    }

    /// Ingest row-major JSON rows. Cell `i` of each row belongs to `columns[i]`.
    ///
    /// Each column's type is detected from its first non-null value. Cells that
    /// do not fit the detected type, and cells missing from short rows, read as null.
    pub fn from_rows(columns: &[Column], rows: &[Vec<Value>]) -> Result<Self> {
        let mut builder = Self::builder(rows.len());
        for (col_idx, col) in columns.iter().enumerate() {
            builder = builder.column(&col.id, ColumnData::from_json_column(rows, col_idx));
        }
        let dataset = builder.build()?;
        tracing::debug!(
            rows = dataset.row_count,
            columns = dataset.columns.len(),
            "ingested JSON rows"
        );
        Ok(dataset)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, id: &str) -> Option<&ColumnData> {
        self.by_id
            .get(id)
            .and_then(|&idx| self.columns.get(idx))
            .map(|(_, data)| data)
    }

    pub fn column_type(&self, id: &str) -> Option<ColumnType> {
        self.column(id).map(ColumnData::column_type)
    }

    /// Read one cell; unknown columns read as null.
    pub fn value(&self, column_id: &str, row: RowId) -> CellValue<'_> {
        self.column(column_id)
            .map_or(CellValue::Null, |data| data.value(row))
    }

    /// Row ids in load order.
    pub fn row_ids(&self) -> Vec<RowId> {
        let n = u32::try_from(self.row_count).unwrap_or(u32::MAX);
        (0..n).collect()
    }
}

/// Typed construction of a [`Dataset`]
#[derive(Debug)]
pub struct DatasetBuilder {
    row_count: usize,
    columns: Vec<(String, ColumnData)>,
}

impl DatasetBuilder {
    #[must_use]
    pub fn column(mut self, id: &str, data: ColumnData) -> Self {
        self.columns.push((id.to_string(), data));
        self
    }

    #[must_use]
    pub fn number(self, id: &str, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let data = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        self.column(id, ColumnData::Number(data))
    }

    #[must_use]
    pub fn bool(self, id: &str, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        self.column(id, ColumnData::Bool(values.into_iter().collect()))
    }

    #[must_use]
    pub fn text<S: AsRef<str>>(self, id: &str, values: impl IntoIterator<Item = Option<S>>) -> Self {
        let mut intern = StringInterner::new();
        let ids = values
            .into_iter()
            .map(|v| v.map(|s| intern.intern(s.as_ref())))
            .collect();
        self.column(id, ColumnData::Text { ids, intern })
    }

    pub fn build(self) -> Result<Dataset> {
        if u32::try_from(self.row_count).is_err() {
            return Err(GridError::validation(format!(
                "dataset has {} rows, more than a u32 row id can address",
                self.row_count
            )));
        }
        let mut by_id = HashMap::with_capacity(self.columns.len());
        for (idx, (id, data)) in self.columns.iter().enumerate() {
            if data.len() != self.row_count {
                return Err(GridError::validation(format!(
                    "column {id:?} has {} values, expected {}",
                    data.len(),
                    self.row_count
                )));
            }
            if by_id.insert(id.clone(), idx).is_some() {
                return Err(GridError::validation(format!(
                    "duplicate dataset column {id:?}"
                )));
            }
        }
        Ok(Dataset {
            columns: self.columns,
            by_id,
            row_count: self.row_count,
        })
    }
}

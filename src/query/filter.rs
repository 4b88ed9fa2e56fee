//! Predicate filtering over row ids.
//!
//! Explicit conditions are ANDed. A non-empty global text additionally
//! requires a case-insensitive substring hit in at least one filterable
//! text column. Output preserves input order.

use serde_json::Value;

use crate::data::{CellValue, ColumnData, Dataset, RowId};
use crate::error::{GridError, Result};
use crate::types::{find_column, Column, FilterCondition, FilterOperator};

type RowTest<'a> = Box<dyn Fn(RowId) -> bool + 'a>;

/// Active filter conditions plus the optional global text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    conditions: Vec<FilterCondition>,
    global_text: Option<String>,
}

impl FilterSet {
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// Global text, `None` when unset or blank
    pub fn global_text(&self) -> Option<&str> {
        self.global_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.global_text().is_none()
    }

    /// Replace the condition list. On error the current conditions are kept.
    pub fn set_conditions(
        &mut self,
        columns: &[Column],
        conditions: Vec<FilterCondition>,
    ) -> Result<()> {
        validate_conditions(columns, &conditions)?;
        self.conditions = conditions;
        Ok(())
    }

    pub fn set_global_text(&mut self, text: Option<String>) {
        self.global_text = text;
    }

    /// Drop conditions whose column no longer exists or is no longer filterable.
    pub fn retain_valid(&mut self, columns: &[Column]) -> bool {
        let before = self.conditions.len();
        self.conditions
            .retain(|c| find_column(columns, &c.column_id).is_some_and(|col| col.filterable));
        self.conditions.len() != before
    }

    pub fn clear(&mut self) {
        self.conditions.clear();
        self.global_text = None;
    }
}

/// Check conditions against the column model.
pub fn validate_conditions(columns: &[Column], conditions: &[FilterCondition]) -> Result<()> {
    for cond in conditions {
        let col = find_column(columns, &cond.column_id).ok_or_else(|| {
            GridError::validation(format!(
                "cannot filter by unknown column {:?}",
                cond.column_id
            ))
        })?;
        if !col.filterable {
            return Err(GridError::validation(format!(
                "column {:?} is not filterable",
                cond.column_id
            )));
        }
    }
    Ok(())
}

/// Return the subset of `row_ids` matching every condition and the global text.
pub fn apply_filter(
    dataset: &Dataset,
    columns: &[Column],
    row_ids: &[RowId],
    conditions: &[FilterCondition],
    global_text: Option<&str>,
) -> Result<Vec<RowId>> {
    validate_conditions(columns, conditions)?;

    let mut tests: Vec<RowTest<'_>> = conditions
        .iter()
        .map(|cond| compile_condition(dataset.column(&cond.column_id), cond))
        .collect();

    if let Some(needle) = global_text.filter(|t| !t.trim().is_empty()) {
        tests.push(compile_global(dataset, columns, needle));
    }

    if tests.is_empty() {
        return Ok(row_ids.to_vec());
    }

    Ok(row_ids
        .iter()
        .copied()
        .filter(|&row| tests.iter().all(|test| test(row)))
        .collect())
}

/// Text form of a filter operand; `None` for JSON null.
fn operand_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn operand_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn operand_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Outcome of an ordering comparison under `op`, for non-null values.
fn ordered(op: FilterOperator, ord: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};
    match (op, ord) {
        (FilterOperator::Eq, Some(o)) => o == Equal,
        (FilterOperator::Neq, Some(o)) => o != Equal,
        (FilterOperator::Neq, None) => true,
        (FilterOperator::Gt, Some(o)) => o == Greater,
        (FilterOperator::Lt, Some(o)) => o == Less,
        (FilterOperator::Gte, Some(o)) => o != Less,
        (FilterOperator::Lte, Some(o)) => o != Greater,
        _ => false,
    }
}

fn compile_condition<'a>(data: Option<&'a ColumnData>, cond: &FilterCondition) -> RowTest<'a> {
    let op = cond.operator;
    let null_matches = op == FilterOperator::Neq;

    let Some(data) = data else {
        // Column absent from the dataset: every cell is missing
        return Box::new(move |_| null_matches);
    };

    if op == FilterOperator::Contains {
        let Some(needle) = operand_text(&cond.value).map(|s| s.to_lowercase()) else {
            return Box::new(|_| false);
        };
        return match data {
            ColumnData::Text { ids, intern } => {
                let hits = intern.matches(|s| contains_ci(s, &needle));
                lookup_test(ids, hits, false)
            }
            other => Box::new(move |row| match other.value(row) {
                CellValue::Null => false,
                cell => contains_ci(&cell.to_string(), &needle),
            }),
        };
    }

    match data {
        ColumnData::Number(values) => {
            let target = operand_number(&cond.value);
            Box::new(move |row| match values.get(row as usize) {
                Some(v) if !v.is_nan() => {
                    let ord = target.map(|t| {
                        if (v - t).abs() < f64::EPSILON {
                            std::cmp::Ordering::Equal
                        } else {
                            v.partial_cmp(&t).unwrap_or(std::cmp::Ordering::Equal)
                        }
                    });
                    ordered(op, ord)
                }
                _ => null_matches,
            })
        }
        ColumnData::Text { ids, intern } => {
            let target = operand_text(&cond.value);
            let hits = intern.matches(|s| ordered(op, target.as_deref().map(|t| s.cmp(t))));
            lookup_test(ids, hits, null_matches)
        }
        ColumnData::Bool(values) => {
            let target = operand_bool(&cond.value);
            Box::new(move |row| match values.get(row as usize).copied().flatten() {
                Some(v) => ordered(op, target.map(|t| v.cmp(&t))),
                None => null_matches,
            })
        }
    }
}

/// Per-row test backed by a per-intern-id result table.
fn lookup_test(ids: &[Option<u32>], hits: Vec<bool>, null_matches: bool) -> RowTest<'_> {
    Box::new(move |row| match ids.get(row as usize).copied().flatten() {
        Some(id) => hits.get(id as usize).copied().unwrap_or(false),
        None => null_matches,
    })
}

/// OR across every filterable text column.
fn compile_global<'a>(dataset: &'a Dataset, columns: &[Column], needle: &str) -> RowTest<'a> {
    let needle = needle.to_lowercase();
    let tables: Vec<RowTest<'a>> = columns
        .iter()
        .filter(|c| c.filterable)
        .filter_map(|c| match dataset.column(&c.id) {
            Some(ColumnData::Text { ids, intern }) => {
                let hits = intern.matches(|s| contains_ci(s, &needle));
                Some(lookup_test(ids, hits, false))
            }
            _ => None,
        })
        .collect();
    Box::new(move |row| tables.iter().any(|test| test(row)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name"),
            Column::new("department"),
            Column::new("salary"),
            Column::new("notes").filterable(false),
        ]
    }

    fn dataset() -> Dataset {
        Dataset::builder(5)
            .text(
                "name",
                [Some("Alice"), Some("Bob"), Some("Carol"), Some("Dan"), Some("Eve")],
            )
            .text(
                "department",
                [Some("Engineering"), Some("Sales"), Some("Engineering"), None, Some("Engineering")],
            )
            .number(
                "salary",
                [Some(120_000.0), Some(150_000.0), Some(90_000.0), Some(110_000.0), None],
            )
            .text("notes", [Some("x"), None, None, None, None])
            .build()
            .unwrap()
    }

    fn run(conditions: &[FilterCondition], global: Option<&str>) -> Vec<RowId> {
        let ds = dataset();
        apply_filter(&ds, &columns(), &ds.row_ids(), conditions, global).unwrap()
    }

    #[test]
    fn test_and_of_conditions() {
        let conds = vec![
            FilterCondition::new("salary", FilterOperator::Gte, json!(100_000)),
            FilterCondition::new("department", FilterOperator::Eq, json!("Engineering")),
        ];
        assert_eq!(run(&conds, None), vec![0]);
    }

    #[test]
    fn test_missing_value_only_matches_neq() {
        let gt = vec![FilterCondition::new("salary", FilterOperator::Lt, json!(1e9))];
        assert_eq!(run(&gt, None), vec![0, 1, 2, 3]);

        let neq = vec![FilterCondition::new("department", FilterOperator::Neq, json!("Sales"))];
        assert_eq!(run(&neq, None), vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_contains_case_insensitive() {
        let conds = vec![FilterCondition::new("department", FilterOperator::Contains, json!("ENG"))];
        assert_eq!(run(&conds, None), vec![0, 2, 4]);

        // Numbers are matched on their string form
        let conds = vec![FilterCondition::new("salary", FilterOperator::Contains, json!("50"))];
        assert_eq!(run(&conds, None), vec![1]);
    }

    #[test]
    fn test_global_text_ors_text_columns() {
        assert_eq!(run(&[], Some("al")), vec![0, 1]);
        assert_eq!(run(&[], Some("   ")), vec![0, 1, 2, 3, 4]);
        // Non-filterable columns are not searched
        assert!(run(&[], Some("x")).is_empty());
    }

    #[test]
    fn test_non_filterable_rejected() {
        let ds = dataset();
        let conds = vec![FilterCondition::new("notes", FilterOperator::Eq, json!("x"))];
        let err = apply_filter(&ds, &columns(), &ds.row_ids(), &conds, None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_output_preserves_input_order() {
        let ds = dataset();
        let input = vec![4, 2, 0];
        let conds = vec![FilterCondition::new("department", FilterOperator::Eq, json!("Engineering"))];
        let out = apply_filter(&ds, &columns(), &input, &conds, None).unwrap();
        assert_eq!(out, vec![4, 2, 0]);
    }
}

//! Multi-key stable sort over row ids.
//!
//! Keys are compared in order; rows that tie on every key keep their input
//! order. Nulls sort last in both directions.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::data::{ColumnData, Dataset, RowId};
use crate::error::{GridError, Result};
use crate::types::{find_column, Column, SortDirection, SortKey};

/// Check a sort-key list against the column model.
///
/// Rejects unknown columns, columns marked `sortable: false`, and duplicate ids.
pub fn validate_sort_keys(columns: &[Column], keys: &[SortKey]) -> Result<()> {
    let mut seen = HashSet::with_capacity(keys.len());
    for key in keys {
        let col = find_column(columns, &key.column_id).ok_or_else(|| {
            GridError::validation(format!("cannot sort by unknown column {:?}", key.column_id))
        })?;
        if !col.sortable {
            return Err(GridError::validation(format!(
                "column {:?} is not sortable",
                key.column_id
            )));
        }
        if !seen.insert(key.column_id.as_str()) {
            return Err(GridError::validation(format!(
                "duplicate sort key for column {:?}",
                key.column_id
            )));
        }
    }
    Ok(())
}

/// Column prepared for comparison: text columns are reduced to ordinal ranks.
enum SortColumn<'a> {
    Number(&'a [f64]),
    Text {
        ids: &'a [Option<u32>],
        ranks: Vec<u32>,
    },
    Bool(&'a [Option<bool>]),
    /// Column absent from the dataset: every value is null
    Missing,
}

impl<'a> SortColumn<'a> {
    fn prepare(data: Option<&'a ColumnData>) -> Self {
        match data {
            Some(ColumnData::Number(values)) => Self::Number(values),
            Some(ColumnData::Text { ids, intern }) => Self::Text {
                ids,
                ranks: intern.ordinal_ranks(),
            },
            Some(ColumnData::Bool(values)) => Self::Bool(values),
            None => Self::Missing,
        }
    }

    fn compare(&self, a: RowId, b: RowId, direction: SortDirection) -> Ordering {
        let (a, b) = (a as usize, b as usize);
        match self {
            Self::Number(values) => {
                let get = |i: usize| values.get(i).copied().filter(|v| !v.is_nan());
                nulls_last(get(a), get(b), direction, |x, y| {
                    x.partial_cmp(y).unwrap_or(Ordering::Equal)
                })
            }
            Self::Text { ids, ranks } => {
                let get = |i: usize| {
                    ids.get(i)
                        .copied()
                        .flatten()
                        .and_then(|id| ranks.get(id as usize).copied())
                };
                nulls_last(get(a), get(b), direction, Ord::cmp)
            }
            Self::Bool(values) => {
                let get = |i: usize| values.get(i).copied().flatten();
                nulls_last(get(a), get(b), direction, Ord::cmp)
            }
            Self::Missing => Ordering::Equal,
        }
    }
}

/// Null-aware comparison: direction applies to values only, nulls always trail.
fn nulls_last<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => cmp(&a, &b),
            SortDirection::Descending => cmp(&a, &b).reverse(),
        },
    }
}

/// Return `row_ids` permuted by `keys`.
///
/// The sort is stable: sorting already-sorted input by the same keys returns
/// the input unchanged. An empty key list returns the input order.
pub fn apply_sort(
    dataset: &Dataset,
    columns: &[Column],
    row_ids: &[RowId],
    keys: &[SortKey],
) -> Result<Vec<RowId>> {
    validate_sort_keys(columns, keys)?;

    let mut sorted = row_ids.to_vec();
    if keys.is_empty() {
        return Ok(sorted);
    }

    let prepared: Vec<(SortColumn<'_>, SortDirection)> = keys
        .iter()
        .map(|key| (SortColumn::prepare(dataset.column(&key.column_id)), key.direction))
        .collect();

    sorted.sort_by(|&a, &b| {
        prepared
            .iter()
            .map(|(col, direction)| col.compare(a, b, *direction))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    Ok(sorted)
}

/// Ordered list of active sort keys with an optional concurrency cap.
///
/// When the cap is reached, adding another key evicts the oldest one.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    keys: Vec<SortKey>,
    max_keys: Option<usize>,
}

impl SortState {
    pub fn new(max_keys: Option<usize>) -> Self {
        Self {
            keys: Vec::new(),
            max_keys,
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn max_keys(&self) -> Option<usize> {
        self.max_keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Direction of the key for `column_id`, if the column is sorted.
    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column_id == column_id)
            .map(|k| k.direction)
    }

    /// Change the cap; existing keys beyond it are evicted oldest-first.
    pub fn set_max_keys(&mut self, max_keys: Option<usize>) {
        self.max_keys = max_keys;
        self.enforce_cap();
    }

    /// Replace the key list. On error the current keys are kept.
    pub fn set(&mut self, columns: &[Column], keys: Vec<SortKey>) -> Result<()> {
        validate_sort_keys(columns, &keys)?;
        self.keys = keys;
        self.enforce_cap();
        Ok(())
    }

    /// Key list after one toggle of `column_id`, without applying it.
    ///
    /// unsorted → ascending → descending → unsorted.
    pub fn toggled(&self, columns: &[Column], column_id: &str) -> Result<Vec<SortKey>> {
        validate_sort_keys(columns, &[SortKey::ascending(column_id)])?;

        let mut keys = self.keys.clone();
        match keys.iter().position(|k| k.column_id == column_id) {
            None => keys.push(SortKey::ascending(column_id)),
            Some(pos) => {
                let is_ascending = keys
                    .get(pos)
                    .is_some_and(|k| k.direction == SortDirection::Ascending);
                if is_ascending {
                    if let Some(key) = keys.get_mut(pos) {
                        key.direction = SortDirection::Descending;
                    }
                } else {
                    keys.remove(pos);
                }
            }
        }
        Ok(keys)
    }

    /// Apply one toggle of `column_id`. On error the current keys are kept.
    pub fn toggle(&mut self, columns: &[Column], column_id: &str) -> Result<()> {
        self.keys = self.toggled(columns, column_id)?;
        self.enforce_cap();
        Ok(())
    }

    /// Drop keys whose column no longer exists or is no longer sortable.
    ///
    /// Returns true when any key was removed.
    pub fn retain_valid(&mut self, columns: &[Column]) -> bool {
        let before = self.keys.len();
        self.keys
            .retain(|k| find_column(columns, &k.column_id).is_some_and(|c| c.sortable));
        self.keys.len() != before
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    fn enforce_cap(&mut self) {
        if let Some(cap) = self.max_keys {
            let excess = self.keys.len().saturating_sub(cap);
            if excess > 0 {
                tracing::debug!(evicted = excess, cap, "sort key cap reached, evicting oldest");
                self.keys.drain(..excess);
            }
        }
    }
}

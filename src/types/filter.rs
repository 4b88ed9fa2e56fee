use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GridError;

/// Comparison operators for a column filter
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    #[serde(alias = "equals")]
    Eq,
    #[serde(alias = "notEquals")]
    Neq,
    Contains,
    #[serde(alias = "greaterThan")]
    Gt,
    #[serde(alias = "lessThan")]
    Lt,
    #[serde(alias = "greaterThanOrEqual")]
    Gte,
    #[serde(alias = "lessThanOrEqual")]
    Lte,
}

impl std::str::FromStr for FilterOperator {
    type Err = GridError;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op {
            "eq" | "equals" => Ok(Self::Eq),
            "neq" | "notEquals" => Ok(Self::Neq),
            "contains" => Ok(Self::Contains),
            "gt" | "greaterThan" => Ok(Self::Gt),
            "lt" | "lessThan" => Ok(Self::Lt),
            "gte" | "greaterThanOrEqual" => Ok(Self::Gte),
            "lte" | "lessThanOrEqual" => Ok(Self::Lte),
            other => Err(GridError::validation(format!(
                "unknown filter operator {other:?}"
            ))),
        }
    }
}

/// A single per-column predicate. Conditions in a set are combined with AND.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub column_id: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterCondition {
    pub fn new(column_id: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            column_id: column_id.into(),
            operator,
            value,
        }
    }
}

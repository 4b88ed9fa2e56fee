//! Engine configuration.
//!
//! Every field has a default, so `{}` is a valid configuration document.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::layout::Viewport;

fn default_row_height() -> f32 {
    36.0
}

fn default_header_height() -> f32 {
    40.0
}

fn default_line_height() -> f32 {
    20.0
}

fn default_viewport_width() -> f32 {
    800.0
}

fn default_viewport_height() -> f32 {
    500.0
}

fn default_overscan() -> usize {
    5
}

/// Sizing, overscan and sort-key cap of one engine instance
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    #[serde(default = "default_header_height")]
    pub header_height: f32,
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    /// Includes the header row
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    /// Rows materialized beyond each viewport edge
    #[serde(default = "default_overscan")]
    pub overscan: usize,
    /// Concurrent sort keys; `None` is unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sort_keys: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            header_height: default_header_height(),
            line_height: default_line_height(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            overscan: default_overscan(),
            max_sort_keys: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-finite sizes, non-positive row heights and a zero sort-key cap.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("rowHeight", self.row_height),
            ("lineHeight", self.line_height),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(GridError::validation(format!(
                    "{name} must be a positive number, got {v}"
                )));
            }
        }
        let non_negative = [
            ("headerHeight", self.header_height),
            ("viewportWidth", self.viewport_width),
            ("viewportHeight", self.viewport_height),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(GridError::validation(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }
        if self.max_sort_keys == Some(0) {
            return Err(GridError::validation("maxSortKeys must be at least 1"));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
            header_height: self.header_height,
            row_height: self.row_height,
            line_height: self.line_height,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.viewport().body_height(), 460.0);
        assert_eq!(config.viewport(), Viewport::default());
    }

    #[test]
    fn test_partial_document() {
        let config = EngineConfig::from_json(r#"{"rowHeight": 24, "maxSortKeys": 2}"#).unwrap();
        assert_eq!(config.row_height, 24.0);
        assert_eq!(config.max_sort_keys, Some(2));
        assert_eq!(config.overscan, 5);
    }

    #[test]
    fn test_rejects_bad_sizes() {
        let err = EngineConfig::from_json(r#"{"rowHeight": 0}"#).unwrap_err();
        assert!(err.is_validation());
        let err = EngineConfig::from_json(r#"{"viewportHeight": -1}"#).unwrap_err();
        assert!(err.is_validation());
        let err = EngineConfig::from_json(r#"{"maxSortKeys": 0}"#).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json("{rowHeight").unwrap_err();
        assert!(matches!(err, GridError::Json(_)));
    }
}

//! Structured error types for gridview.
//!
//! Mutations that fail validation leave engine state untouched; layout
//! failures are reported per layout kind and never poison the other slot.

/// Failure raised by the geometry solver or by malformed layout directives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The constraint solver rejected its input.
    #[error("Solver failure: {0}")]
    Solver(String),

    /// A column or container directive cannot be expressed.
    #[error("Invalid layout directive: {0}")]
    InvalidDirective(String),
}

/// All errors surfaced by the query engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Rejected mutation: disabled column, unknown column, duplicate key,
    /// or malformed configuration.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An internal row-window invariant was violated.
    #[error("Row window out of bounds: {0}")]
    Bounds(String),

    /// Geometry could not be resolved.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// JSON payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for errors caused by a rejected caller mutation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

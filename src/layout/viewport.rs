//! Viewport dimensions and scroll clamping.

use serde::{Deserialize, Serialize};

use super::SizingContext;
use crate::config::EngineConfig;
use crate::query::{clamp_scroll, max_scroll};

/// Visible area of the table, in CSS pixels.
///
/// The header row is pinned at the top; the body scrolls beneath it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f32,
    /// Total height including the header row
    pub height: f32,
    pub header_height: f32,
    pub row_height: f32,
    pub line_height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        EngineConfig::default().viewport()
    }
}

impl Viewport {
    /// Height available to body rows
    pub fn body_height(&self) -> f64 {
        f64::from((self.height - self.header_height).max(0.0))
    }

    pub fn header_sizing(&self) -> SizingContext {
        SizingContext {
            viewport_width: self.width,
            row_height: self.header_height,
            line_height: self.line_height,
        }
    }

    pub fn body_sizing(&self) -> SizingContext {
        SizingContext {
            viewport_width: self.width,
            row_height: self.row_height,
            line_height: self.line_height,
        }
    }

    pub fn max_scroll(&self, row_count: usize) -> f64 {
        max_scroll(row_count, f64::from(self.row_height), self.body_height())
    }

    /// Clamp a scroll position for `row_count` body rows
    pub fn clamp_scroll(&self, scroll_top: f64, row_count: usize) -> f64 {
        clamp_scroll(scroll_top, self.max_scroll(row_count))
    }

    /// Apply a scroll delta to `current`. Repeated small deltas and one large
    /// jump clamp to the same value.
    pub fn scroll_by(&self, current: f64, delta: f64, row_count: usize) -> f64 {
        self.clamp_scroll(self.clamp_scroll(current, row_count) + delta, row_count)
    }

    /// Set absolute scroll position
    pub fn set_scroll(&self, scroll_top: f64, row_count: usize) -> f64 {
        self.clamp_scroll(scroll_top, row_count)
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Screen y of the top edge of logical body row `row`.
    #[allow(clippy::cast_precision_loss)]
    pub fn row_screen_y(&self, row: usize, scroll_top: f64) -> f64 {
        f64::from(self.header_height) + row as f64 * f64::from(self.row_height) - scroll_top
    }
}

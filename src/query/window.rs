//! Row window calculation for virtualized scrolling.
//!
//! Pure arithmetic, called once per frame. It never touches the layout solver.

use serde::Serialize;

/// Contiguous slice of logical rows (after sort and filter) to materialize
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowWindow {
    /// First materialized row (inclusive)
    pub start_index: usize,
    /// One past the last materialized row
    pub end_index: usize,
    /// Vertical offset of `start_index` in body coordinates
    pub offset_y: f64,
    /// Height of the whole filtered row set
    pub total_height: f64,
    /// `end_index - start_index`
    pub visible_count: usize,
    /// Scroll position after clamping
    pub scroll_top: f64,
    /// Largest valid scroll position
    pub max_scroll: f64,
}

impl RowWindow {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start_index..self.end_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }
}

/// Largest scroll offset that still fills the viewport.
#[allow(clippy::cast_precision_loss)]
pub fn max_scroll(row_count: usize, row_height: f64, body_height: f64) -> f64 {
    (row_count as f64 * row_height - body_height).max(0.0)
}

/// Clamp a scroll offset into `[0, max_scroll]`. Non-finite input clamps to 0.
///
/// Idempotent: clamping an already clamped value returns it unchanged.
pub fn clamp_scroll(scroll_top: f64, max_scroll: f64) -> f64 {
    if scroll_top.is_nan() {
        return 0.0;
    }
    scroll_top.min(max_scroll).max(0.0)
}

/// Compute the row window for a scroll position.
///
/// `start = max(0, floor(scroll / row_height) - overscan)` and the window
/// spans `ceil(body_height / row_height) + 2 * overscan` rows, cut at
/// `row_count`. When every row fits in the viewport the window is the
/// whole row set.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn compute_window(
    scroll_top: f64,
    row_count: usize,
    row_height: f64,
    body_height: f64,
    overscan: usize,
) -> RowWindow {
    if row_count == 0 || row_height <= 0.0 || !row_height.is_finite() {
        return RowWindow {
            start_index: 0,
            end_index: 0,
            offset_y: 0.0,
            total_height: 0.0,
            visible_count: 0,
            scroll_top: 0.0,
            max_scroll: 0.0,
        };
    }

    let body_height = body_height.max(0.0);
    let max = max_scroll(row_count, row_height, body_height);
    let clamped = clamp_scroll(scroll_top, max);

    let first_visible = (clamped / row_height).floor() as usize;
    let start_index = first_visible.saturating_sub(overscan).min(row_count);
    let span = ((body_height / row_height).ceil() as usize).saturating_add(overscan.saturating_mul(2));
    let end_index = start_index.saturating_add(span).min(row_count);

    RowWindow {
        start_index,
        end_index,
        offset_y: start_index as f64 * row_height,
        total_height: row_count as f64 * row_height,
        visible_count: end_index - start_index,
        scroll_top: clamped,
        max_scroll: max,
    }
}

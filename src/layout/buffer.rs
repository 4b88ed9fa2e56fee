//! Flat `f32` cell buffer for renderers.
//!
//! Each cell occupies [`LAYOUT_STRIDE`] consecutive floats, so a renderer on
//! the other side of the wasm boundary can walk the buffer without decoding.

use super::{CellRect, PlacedCell};

/// Number of f32 fields per cell
pub const LAYOUT_STRIDE: usize = 16;

pub const FIELD_ROW: usize = 0;
pub const FIELD_COL: usize = 1;
pub const FIELD_X: usize = 2;
pub const FIELD_Y: usize = 3;
pub const FIELD_WIDTH: usize = 4;
pub const FIELD_HEIGHT: usize = 5;
/// 0 = left, 1 = center, 2 = right
pub const FIELD_ALIGN: usize = 6;
pub const FIELD_PADDING_TOP: usize = 7;
pub const FIELD_PADDING_RIGHT: usize = 8;
pub const FIELD_PADDING_BOTTOM: usize = 9;
pub const FIELD_PADDING_LEFT: usize = 10;
pub const FIELD_BORDER_TOP: usize = 11;
pub const FIELD_BORDER_RIGHT: usize = 12;
pub const FIELD_BORDER_BOTTOM: usize = 13;
pub const FIELD_BORDER_LEFT: usize = 14;
pub const FIELD_RESERVED: usize = 15;

/// Row value written for header cells
pub const HEADER_ROW: f32 = -1.0;

/// Encode one cell. `row` is a logical body row or [`HEADER_ROW`].
#[allow(clippy::cast_precision_loss)]
pub fn encode(row: f32, rect: &CellRect) -> [f32; LAYOUT_STRIDE] {
    let [pt, pr, pb, pl] = rect.padding.as_array();
    [
        row,
        rect.col as f32,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        rect.align.code(),
        pt,
        pr,
        pb,
        pl,
        // Borders are painted by the renderer; slots kept for layout parity
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
    ]
}

/// Append header cells, then body cells, to `buf`.
#[allow(clippy::cast_precision_loss)]
pub fn write_cells<'a>(
    buf: &mut Vec<f32>,
    header: &[CellRect],
    body: impl IntoIterator<Item = &'a PlacedCell>,
) {
    for rect in header {
        buf.extend_from_slice(&encode(HEADER_ROW, rect));
    }
    for cell in body {
        buf.extend_from_slice(&encode(cell.row as f32, &cell.rect));
    }
}

/// Required buffer length for `cell_count` cells
pub const fn buf_len(cell_count: usize) -> usize {
    cell_count * LAYOUT_STRIDE
}

pub fn cell_count(buf: &[f32]) -> usize {
    buf.len() / LAYOUT_STRIDE
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn read_index(buf: &[f32], cell_idx: usize, field: usize) -> Option<usize> {
    let v = *buf.get(cell_idx.checked_mul(LAYOUT_STRIDE)?.checked_add(field)?)?;
    if v.is_finite() && v >= 0.0 {
        Some(v as usize)
    } else {
        None
    }
}

/// Logical row of cell `cell_idx`; `None` for header cells or out of range.
pub fn read_row(buf: &[f32], cell_idx: usize) -> Option<usize> {
    read_index(buf, cell_idx, FIELD_ROW)
}

pub fn read_col(buf: &[f32], cell_idx: usize) -> Option<usize> {
    read_index(buf, cell_idx, FIELD_COL)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{Align, Padding};

    fn rect(col: usize, x: f32, align: Align, padding: Padding) -> CellRect {
        CellRect {
            col,
            x,
            y: 40.0,
            width: 100.0,
            height: 36.0,
            align,
            padding,
        }
    }

    #[test]
    fn test_write_and_read() {
        let header = vec![rect(0, 0.0, Align::Left, Padding::default())];
        let body = vec![PlacedCell {
            row: 4,
            row_id: 17,
            rect: rect(
                2,
                110.0,
                Align::Right,
                Padding {
                    top: 4.0,
                    right: 8.0,
                    bottom: 4.0,
                    left: 8.0,
                },
            ),
        }];
        let mut buf = Vec::new();
        write_cells(&mut buf, &header, &body);

        assert_eq!(buf.len(), buf_len(2));
        assert_eq!(cell_count(&buf), 2);
        assert_eq!(read_row(&buf, 0), None);
        assert_eq!(read_col(&buf, 0), Some(0));
        assert_eq!(read_row(&buf, 1), Some(4));
        assert_eq!(read_col(&buf, 1), Some(2));

        let base = LAYOUT_STRIDE;
        assert_eq!(buf[base + FIELD_X], 110.0);
        assert_eq!(buf[base + FIELD_ALIGN], 2.0);
        assert_eq!(buf[base + FIELD_PADDING_RIGHT], 8.0);
        assert_eq!(buf[base + FIELD_PADDING_LEFT], 8.0);
        assert_eq!(buf[base + FIELD_BORDER_TOP], 0.0);
        assert_eq!(buf[base + FIELD_RESERVED], 0.0);
    }

    #[test]
    fn test_read_out_of_range() {
        assert_eq!(read_row(&[], 0), None);
        assert_eq!(read_col(&[0.0; LAYOUT_STRIDE], 1), None);
    }
}

//! Row window and scroll clamping tests
//!
//! Window bounds for arbitrary scroll input, clamping at both ends of the
//! row set, and data sets smaller than the viewport.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use gridview::query::{clamp_scroll, compute_window, max_scroll};
use gridview::Viewport;
use proptest::prelude::*;
use test_case::test_case;

const ROW_HEIGHT: f64 = 36.0;
const BODY_HEIGHT: f64 = 460.0;

fn body_viewport() -> Viewport {
    Viewport {
        width: 800.0,
        height: 500.0,
        header_height: 40.0,
        row_height: 36.0,
        line_height: 20.0,
    }
}

#[test]
fn test_max_scroll_for_ten_thousand_rows() {
    assert_eq!(max_scroll(10_000, ROW_HEIGHT, BODY_HEIGHT), 359_540.0);
    let w = compute_window(0.0, 10_000, ROW_HEIGHT, BODY_HEIGHT, 5);
    assert_eq!(w.max_scroll, 359_540.0);
    assert_eq!(w.total_height, 360_000.0);
}

#[test]
fn test_large_jump_clamps_exactly() {
    let vp = body_viewport();
    let once = vp.scroll_by(0.0, 999_999.0, 10_000);
    assert_eq!(once, 359_540.0);
    assert_eq!(vp.scroll_by(once, 999_999.0, 10_000), 359_540.0);
    assert_eq!(vp.scroll_by(once, 1.0, 10_000), 359_540.0);
}

#[test]
fn test_window_at_end_is_cut() {
    let w = compute_window(359_540.0, 10_000, ROW_HEIGHT, BODY_HEIGHT, 5);
    assert_eq!(w.end_index, 10_000);
    // floor(359540 / 36) = 9987, minus overscan
    assert_eq!(w.start_index, 9_982);
    assert_eq!(w.offset_y, 9_982.0 * ROW_HEIGHT);
}

#[test_case(0.0 ; "at top")]
#[test_case(100.0 ; "mid")]
#[test_case(1e9 ; "far past end")]
#[test_case(-500.0 ; "negative")]
#[test_case(f64::NAN ; "nan")]
fn test_small_dataset_is_one_window(scroll_top: f64) {
    let w = compute_window(scroll_top, 5, ROW_HEIGHT, BODY_HEIGHT, 5);
    assert_eq!(w.max_scroll, 0.0);
    assert_eq!(w.scroll_top, 0.0);
    assert_eq!(w.start_index, 0);
    assert_eq!(w.end_index, 5);
    assert_eq!(w.visible_count, 5);
}

#[test_case(0, 0 ; "no overscan")]
#[test_case(3, 6 ; "three rows each side")]
fn test_visible_count_includes_overscan(overscan: usize, extra: usize) {
    // Mid-list so neither edge cuts the window
    let w = compute_window(36_000.0, 10_000, ROW_HEIGHT, BODY_HEIGHT, overscan);
    // ceil(460 / 36) = 13
    assert_eq!(w.visible_count, 13 + extra);
}

#[test]
fn test_zero_rows() {
    let w = compute_window(250.0, 0, ROW_HEIGHT, BODY_HEIGHT, 5);
    assert!(w.is_empty());
    assert_eq!(w.total_height, 0.0);
}

proptest! {
    #[test]
    fn window_bounds_hold(
        scroll in prop_oneof![any::<f64>(), -1e7f64..1e7],
        rows in 0usize..200_000,
        overscan in 0usize..20,
    ) {
        let w = compute_window(scroll, rows, ROW_HEIGHT, BODY_HEIGHT, overscan);
        prop_assert!(w.start_index <= w.end_index);
        prop_assert!(w.end_index <= rows);
        prop_assert_eq!(w.visible_count, w.end_index - w.start_index);
        prop_assert_eq!(w.offset_y, w.start_index as f64 * ROW_HEIGHT);
        prop_assert_eq!(w.total_height, rows as f64 * ROW_HEIGHT);
        prop_assert!(w.scroll_top >= 0.0 && w.scroll_top <= w.max_scroll);
    }

    #[test]
    fn clamp_is_idempotent(scroll in any::<f64>(), max in 0.0f64..1e9) {
        let once = clamp_scroll(scroll, max);
        prop_assert_eq!(clamp_scroll(once, max), once);
    }

    #[test]
    fn deltas_and_jump_agree_past_the_end(steps in 1usize..50) {
        let vp = body_viewport();
        let mut stepped = 0.0;
        for _ in 0..steps {
            stepped = vp.scroll_by(stepped, 400_000.0 / steps as f64, 10_000);
        }
        prop_assert_eq!(stepped, vp.scroll_by(0.0, 400_000.0, 10_000));
    }
}

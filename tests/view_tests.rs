//! Shared view tests
//!
//! Several views over one engine handle, scroll coalescing and clamping of
//! pending scroll input.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::rc::Rc;

use common::employee_engine;
use gridview::view::share;
use gridview::TableView;
use test_case::test_case;

// 10_000 rows * 36px minus a 460px body
const MAX_SCROLL: f64 = 359_540.0;

#[test]
fn test_views_share_one_engine() {
    let engine = share(employee_engine(1_000));
    let mut list = TableView::new(Rc::clone(&engine));
    let mut minimap = TableView::new(Rc::clone(&engine));

    list.scroll_by(360.0).unwrap();
    engine.borrow_mut().toggle_sort("name").unwrap();
    engine.borrow_mut().toggle_sort("name").unwrap();
    let sorts_before = engine.borrow().stats().sorts;

    let a = list.frame().unwrap();
    let b = minimap.frame().unwrap();
    assert_eq!(a.filtered_count, b.filtered_count);
    assert_eq!(b.row_ids.first(), Some(&999));
    assert_eq!(a.row_window.scroll_top, 360.0);
    assert_eq!(b.row_window.scroll_top, 0.0);
    // Both views reused one sort
    assert_eq!(engine.borrow().stats().sorts, sorts_before + 1);
}

#[test]
fn test_deltas_coalesce_into_one_query() {
    let engine = share(employee_engine(10_000));
    let mut view = TableView::new(Rc::clone(&engine));
    assert_eq!(view.pending_scroll(), None);

    view.scroll_by(100.0).unwrap();
    view.scroll_by(100.0).unwrap();
    assert_eq!(view.pending_scroll(), Some(200.0));
    view.scroll_to(720.0).unwrap();
    view.scroll_by(-20.0).unwrap();
    assert_eq!(view.pending_scroll(), Some(700.0));

    let result = view.frame().unwrap();
    assert_eq!(result.row_window.scroll_top, 700.0);
    assert_eq!(view.scroll_top(), 700.0);
    assert_eq!(view.pending_scroll(), None);
    assert_eq!(engine.borrow().stats().queries, 1);
}

#[test_case(-50.0, 0.0 ; "above top")]
#[test_case(1_000.0, 1_000.0 ; "inside range")]
#[test_case(1.0e9, MAX_SCROLL ; "past end")]
#[test_case(f64::NAN, 0.0 ; "nan")]
fn test_scroll_to_clamps_pending(requested: f64, expected: f64) {
    let mut view = TableView::new(share(employee_engine(10_000)));
    view.scroll_to(requested).unwrap();
    assert_eq!(view.pending_scroll(), Some(expected));
}

#[test]
fn test_scroll_clamps_at_end() {
    let mut view = TableView::new(share(employee_engine(10_000)));
    view.scroll_by(999_999.0).unwrap();
    assert_eq!(view.frame().unwrap().row_window.scroll_top, MAX_SCROLL);
    view.scroll_by(500.0).unwrap();
    assert_eq!(view.frame().unwrap().row_window.scroll_top, MAX_SCROLL);
    // Leaving the end takes one delta, not the overshoot
    view.scroll_by(-36.0).unwrap();
    assert_eq!(view.frame().unwrap().row_window.scroll_top, MAX_SCROLL - 36.0);
}

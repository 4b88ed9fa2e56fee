//! Views over a shared engine.
//!
//! Several views can observe one [`QueryEngine`] by holding the same
//! [`SharedEngine`] handle; mutations made through any handle are seen by all.
//! Each view owns only its scroll position and coalesces scroll input so that
//! one [`TableView::frame`] call runs one query.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{QueryEngine, QueryResult};
use crate::error::Result;
use crate::layout::{GeometrySolver, TaffySolver};

/// Engine handle injected into every view that shares its state
pub type SharedEngine<S = TaffySolver> = Rc<RefCell<QueryEngine<S>>>;

/// Wrap an engine for injection into views.
pub fn share<S: GeometrySolver>(engine: QueryEngine<S>) -> SharedEngine<S> {
    Rc::new(RefCell::new(engine))
}

/// Scroll state of one view plus the scroll input received since the last frame
#[derive(Debug)]
pub struct TableView<S = TaffySolver> {
    engine: SharedEngine<S>,
    scroll_top: f64,
    pending: Option<f64>,
}

impl<S: GeometrySolver> TableView<S> {
    pub fn new(engine: SharedEngine<S>) -> Self {
        Self {
            engine,
            scroll_top: 0.0,
            pending: None,
        }
    }

    pub fn engine(&self) -> &SharedEngine<S> {
        &self.engine
    }

    /// Scroll position of the last frame
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Scroll position the next frame will query
    pub fn pending_scroll(&self) -> Option<f64> {
        self.pending
    }

    /// Add a scroll delta. Each delta is clamped against the current row
    /// count, so many small deltas land where one large jump would.
    pub fn scroll_by(&mut self, delta: f64) -> Result<()> {
        let base = self.pending.unwrap_or(self.scroll_top);
        let mut engine = self.engine.borrow_mut();
        let rows = engine.filtered_rows()?.len();
        let next = engine.state().viewport().scroll_by(base, delta, rows);
        self.pending = Some(next);
        Ok(())
    }

    /// Request an absolute scroll position; the latest request wins.
    pub fn scroll_to(&mut self, scroll_top: f64) -> Result<()> {
        let mut engine = self.engine.borrow_mut();
        let rows = engine.filtered_rows()?.len();
        self.pending = Some(engine.state().viewport().set_scroll(scroll_top, rows));
        Ok(())
    }

    /// Run exactly one query with the coalesced scroll position.
    pub fn frame(&mut self) -> Result<QueryResult> {
        let requested = self.pending.take().unwrap_or(self.scroll_top);
        let result = self.engine.borrow_mut().query(requested)?;
        self.scroll_top = result.row_window.scroll_top;
        Ok(result)
    }
}

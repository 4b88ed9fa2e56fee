//! Query orchestrator.
//!
//! Owns the [`EngineState`] and composes sort, filter, window and layout into
//! one synchronous [`QueryEngine::query`] call per frame. The sorted and the
//! sorted+filtered permutations are memoized separately, so a scroll-only
//! query does no pipeline work and a filter change reuses the sort.

use std::sync::Arc;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::data::{Dataset, RowId};
use crate::error::{GridError, LayoutError, Result};
use crate::layout::{
    CacheStats, CellRect, ContainerLayout, Geometry, GeometrySolver, LayoutCache, LayoutInput,
    LayoutKind, PlacedCell, TaffySolver, Viewport,
};
use crate::query::{apply_filter, apply_sort, compute_window, FilterSet, RowWindow, SortState};
use crate::types::{validate_columns, Column, FilterCondition, SortKey};

/// Lifecycle of an engine instance
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnginePhase {
    /// No data loaded
    Idle,
    /// Data loaded, between queries
    Ready,
    /// Inside a `query` call
    Querying,
}

/// Everything a query reads. Mutated only through [`QueryEngine`] setters.
#[derive(Debug, Clone)]
pub struct EngineState {
    dataset: Dataset,
    columns: Vec<Column>,
    sort: SortState,
    filters: FilterSet,
    container: ContainerLayout,
    viewport: Viewport,
    overscan: usize,
    generation: u64,
}

impl EngineState {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        self.sort.keys()
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn container(&self) -> &ContainerLayout {
        &self.container
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Bumped on every `load`
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Pipeline counters, for verifying memoization
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub sorts: u64,
    pub filters: u64,
    pub queries: u64,
    pub layout: CacheStats,
}

/// Memoized permutations; `None` means stale.
#[derive(Debug, Default)]
struct PipelineMemo {
    sorted: Option<Vec<RowId>>,
    filtered: Option<Vec<RowId>>,
}

impl PipelineMemo {
    fn invalidate_sort(&mut self) {
        self.sorted = None;
        self.filtered = None;
    }

    fn invalidate_filter(&mut self) {
        self.filtered = None;
    }
}

/// Output of one frame's query
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub row_window: RowWindow,
    /// Dataset rows inside the window, in display order
    pub row_ids: Vec<RowId>,
    pub total_count: usize,
    pub filtered_count: usize,
    /// Header row geometry, pinned at the top of the viewport
    pub header: std::result::Result<Arc<Geometry>, LayoutError>,
    /// One-row body template; see [`QueryResult::body_cells`]
    pub body: std::result::Result<Arc<Geometry>, LayoutError>,
    /// Viewport the query ran against
    pub viewport: Viewport,
}

impl QueryResult {
    /// Solved geometry for one layout kind, or the solver failure as a crate error.
    pub fn geometry(&self, kind: LayoutKind) -> Result<Arc<Geometry>> {
        let slot = match kind {
            LayoutKind::Header => &self.header,
            LayoutKind::Body => &self.body,
        };
        Ok(Arc::clone(slot.as_ref().map_err(Clone::clone)?))
    }

    /// Header cells in viewport coordinates. Unaffected by scroll.
    pub fn header_cells(&self) -> Vec<CellRect> {
        self.geometry(LayoutKind::Header)
            .map(|g| g.cells.clone())
            .unwrap_or_default()
    }

    /// Body template expanded to every windowed row, in viewport coordinates.
    ///
    /// `y = headerHeight + row * rowHeight - scrollTop`, plus the template's
    /// own offset within the row. Empty when body layout failed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn body_cells(&self) -> Vec<PlacedCell> {
        let Ok(template) = self.geometry(LayoutKind::Body) else {
            return Vec::new();
        };
        let scroll_top = self.row_window.scroll_top;
        self.row_window
            .range()
            .zip(&self.row_ids)
            .flat_map(|(row, &row_id)| {
                let row_y = self.viewport.row_screen_y(row, scroll_top);
                template.cells.iter().map(move |cell| PlacedCell {
                    row,
                    row_id,
                    rect: CellRect {
                        y: (row_y + f64::from(cell.y)) as f32,
                        ..cell.clone()
                    },
                })
            })
            .collect()
    }

    /// Header then body cells as a flat `f32` buffer.
    pub fn layout_buffer(&self) -> Vec<f32> {
        let header = self.header_cells();
        let body = self.body_cells();
        let mut buf =
            Vec::with_capacity(crate::layout::buffer::buf_len(header.len() + body.len()));
        crate::layout::buffer::write_cells(&mut buf, &header, &body);
        buf
    }
}

/// `(id, filterable)` pairs in id order.
fn filter_coverage(columns: &[Column]) -> Vec<(&str, bool)> {
    let mut pairs: Vec<(&str, bool)> = columns
        .iter()
        .map(|c| (c.id.as_str(), c.filterable))
        .collect();
    pairs.sort_unstable();
    pairs
}

fn validate_viewport(viewport: &Viewport) -> Result<()> {
    EngineConfig {
        row_height: viewport.row_height,
        header_height: viewport.header_height,
        line_height: viewport.line_height,
        viewport_width: viewport.width,
        viewport_height: viewport.height,
        ..EngineConfig::default()
    }
    .validate()
}

/// Windowed query engine over one dataset.
///
/// Single-threaded: one owner drives it from the frame loop. Views that must
/// share state hold a [`crate::view::SharedEngine`] handle to one instance.
#[derive(Debug)]
pub struct QueryEngine<S = TaffySolver> {
    state: EngineState,
    cache: LayoutCache<S>,
    memo: PipelineMemo,
    phase: EnginePhase,
    stats: EngineStats,
}

impl QueryEngine<TaffySolver> {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Self::with_solver(config, TaffySolver::new())
    }
}

impl<S: GeometrySolver> QueryEngine<S> {
    /// Engine with a custom geometry solver.
    pub fn with_solver(config: &EngineConfig, solver: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: EngineState {
                dataset: Dataset::empty(),
                columns: Vec::new(),
                sort: SortState::new(config.max_sort_keys),
                filters: FilterSet::default(),
                container: ContainerLayout::default(),
                viewport: config.viewport(),
                overscan: config.overscan,
                generation: 0,
            },
            cache: LayoutCache::new(solver),
            memo: PipelineMemo::default(),
            phase: EnginePhase::Idle,
            stats: EngineStats::default(),
        })
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            layout: self.cache.stats(),
            ..self.stats
        }
    }

    pub fn solver(&self) -> &S {
        self.cache.solver()
    }

    /// Replace columns and data together.
    ///
    /// Sort keys and conditions that no longer apply to the new columns are
    /// dropped. Moves the engine to `Ready`.
    pub fn load(&mut self, columns: Vec<Column>, dataset: Dataset) -> Result<()> {
        validate_columns(&columns)?;
        self.state.columns = columns;
        self.state.dataset = dataset;
        self.state.generation += 1;
        self.state.sort.retain_valid(&self.state.columns);
        self.state.filters.retain_valid(&self.state.columns);
        self.memo.invalidate_sort();
        self.cache.invalidate();
        self.phase = EnginePhase::Ready;
        tracing::debug!(
            rows = self.state.dataset.row_count(),
            columns = self.state.columns.len(),
            generation = self.state.generation,
            "dataset loaded"
        );
        Ok(())
    }

    /// Replace the column model, keeping the dataset.
    pub fn set_columns(&mut self, columns: Vec<Column>) -> Result<()> {
        if let Err(e) = validate_columns(&columns) {
            tracing::warn!(error = %e, "rejected column model");
            return Err(e);
        }
        let coverage_changed =
            filter_coverage(&self.state.columns) != filter_coverage(&columns);
        self.state.columns = columns;
        if self.state.sort.retain_valid(&self.state.columns) {
            self.memo.invalidate_sort();
        }
        let pruned = self.state.filters.retain_valid(&self.state.columns);
        // Global text searches every filterable column
        if pruned || coverage_changed {
            self.memo.invalidate_filter();
        }
        self.cache.invalidate();
        Ok(())
    }

    /// Replace the sort keys. On error the previous keys stay active.
    pub fn set_sort(&mut self, keys: Vec<SortKey>) -> Result<()> {
        let before = self.state.sort.keys().to_vec();
        if let Err(e) = self.state.sort.set(&self.state.columns, keys) {
            tracing::warn!(error = %e, "rejected sort keys");
            return Err(e);
        }
        if self.state.sort.keys() != before.as_slice() {
            self.memo.invalidate_sort();
        }
        Ok(())
    }

    /// Cycle one column through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<()> {
        if let Err(e) = self.state.sort.toggle(&self.state.columns, column_id) {
            tracing::warn!(error = %e, column_id, "rejected sort toggle");
            return Err(e);
        }
        self.memo.invalidate_sort();
        Ok(())
    }

    /// Replace the filter conditions. On error the previous conditions stay active.
    pub fn set_filters(&mut self, conditions: Vec<FilterCondition>) -> Result<()> {
        if conditions == self.state.filters.conditions() {
            return Ok(());
        }
        if let Err(e) = self
            .state
            .filters
            .set_conditions(&self.state.columns, conditions)
        {
            tracing::warn!(error = %e, "rejected filter conditions");
            return Err(e);
        }
        self.memo.invalidate_filter();
        Ok(())
    }

    /// Set or clear the global text filter.
    pub fn set_global_filter(&mut self, text: Option<String>) {
        let before = self.state.filters.global_text().map(str::to_owned);
        self.state.filters.set_global_text(text);
        if self.state.filters.global_text() != before.as_deref() {
            self.memo.invalidate_filter();
        }
    }

    /// Change viewport size or row metrics. Geometry is re-solved lazily
    /// through the fingerprint.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        validate_viewport(&viewport)?;
        self.state.viewport = viewport;
        Ok(())
    }

    /// Apply sizing, overscan and sort-key cap from a configuration.
    pub fn set_config(&mut self, config: &EngineConfig) -> Result<()> {
        config.validate()?;
        self.state.viewport = config.viewport();
        self.state.overscan = config.overscan;
        let before = self.state.sort.keys().len();
        self.state.sort.set_max_keys(config.max_sort_keys);
        if self.state.sort.keys().len() != before {
            self.memo.invalidate_sort();
        }
        Ok(())
    }

    pub fn set_container(&mut self, container: ContainerLayout) {
        self.state.container = container;
    }

    /// Force both layout kinds to re-solve on the next query.
    pub fn invalidate_layout(&mut self) {
        self.cache.invalidate();
    }

    /// Sorted and filtered row ids, recomputing only stale stages.
    pub fn filtered_rows(&mut self) -> Result<&[RowId]> {
        let state = &self.state;
        if self.memo.sorted.is_none() {
            let sorted = apply_sort(
                &state.dataset,
                &state.columns,
                &state.dataset.row_ids(),
                state.sort.keys(),
            )?;
            self.stats.sorts += 1;
            tracing::debug!(rows = sorted.len(), keys = state.sort.keys().len(), "re-sorted");
            self.memo.sorted = Some(sorted);
            self.memo.filtered = None;
        }
        if self.memo.filtered.is_none() {
            let sorted = self.memo.sorted.as_deref().unwrap_or_default();
            let filtered = if state.filters.is_empty() {
                sorted.to_vec()
            } else {
                apply_filter(
                    &state.dataset,
                    &state.columns,
                    sorted,
                    state.filters.conditions(),
                    state.filters.global_text(),
                )?
            };
            self.stats.filters += 1;
            tracing::debug!(
                rows = sorted.len(),
                kept = filtered.len(),
                conditions = state.filters.conditions().len(),
                "re-filtered"
            );
            self.memo.filtered = Some(filtered);
        }
        Ok(self.memo.filtered.as_deref().unwrap_or_default())
    }

    /// Run the pipeline for one frame.
    ///
    /// Sort and filter errors propagate unchanged. Layout failures are
    /// reported per kind inside the result.
    pub fn query(&mut self, scroll_top: f64) -> Result<QueryResult> {
        let _span = tracing::debug_span!("query", scroll_top).entered();
        let resting = if self.phase == EnginePhase::Idle {
            EnginePhase::Idle
        } else {
            EnginePhase::Ready
        };
        self.phase = EnginePhase::Querying;
        let result = self.run_query(scroll_top);
        self.phase = resting;
        result
    }

    fn run_query(&mut self, scroll_top: f64) -> Result<QueryResult> {
        self.stats.queries += 1;
        let viewport = self.state.viewport;
        let overscan = self.state.overscan;
        let total_count = self.state.dataset.row_count();

        let filtered = self.filtered_rows()?;
        let filtered_count = filtered.len();
        let row_window = compute_window(
            scroll_top,
            filtered_count,
            f64::from(viewport.row_height),
            viewport.body_height(),
            overscan,
        );
        if row_window.start_index > row_window.end_index || row_window.end_index > filtered_count
        {
            return Err(GridError::Bounds(format!(
                "window {}..{} outside {filtered_count} rows",
                row_window.start_index, row_window.end_index
            )));
        }
        let row_ids = filtered
            .get(row_window.range())
            .ok_or_else(|| {
                GridError::Bounds(format!(
                    "cannot slice rows {:?} of {filtered_count}",
                    row_window.range()
                ))
            })?
            .to_vec();
        tracing::trace!(
            start = row_window.start_index,
            end = row_window.end_index,
            scroll_top = row_window.scroll_top,
            "row window"
        );

        let header = self.cache.get_layout(
            LayoutKind::Header,
            &LayoutInput {
                columns: &self.state.columns,
                container: &self.state.container,
                sizing: viewport.header_sizing(),
            },
        );
        let body = self.cache.get_layout(
            LayoutKind::Body,
            &LayoutInput {
                columns: &self.state.columns,
                container: &self.state.container,
                sizing: viewport.body_sizing(),
            },
        );

        Ok(QueryResult {
            row_window,
            row_ids,
            total_count,
            filtered_count,
            header,
            body,
            viewport,
        })
    }
}

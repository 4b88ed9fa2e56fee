//! Inputs and outputs of the geometry solver.

use serde::{Deserialize, Serialize};

use crate::types::{Align, Column, Padding};

/// Main axis of the cell container
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Wrap {
    #[default]
    NoWrap,
    Wrap,
}

/// Main-axis distribution of free space
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Cross-axis placement of cells
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CrossAlign {
    FlexStart,
    FlexEnd,
    Center,
    #[default]
    Stretch,
}

/// Container-level layout directives shared by header and body rows
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerLayout {
    pub direction: Direction,
    pub wrap: Wrap,
    pub justify: Justify,
    pub align: CrossAlign,
    /// Gap between adjacent cells in pixels
    pub gap: f32,
    pub padding: Padding,
}

/// Sizing context of one row kind
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SizingContext {
    pub viewport_width: f32,
    /// Header height for header rows, row height for body rows
    pub row_height: f32,
    pub line_height: f32,
}

/// Everything that affects geometry. Scroll position is not part of it.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub columns: &'a [Column],
    pub container: &'a ContainerLayout,
    pub sizing: SizingContext,
}

/// One cell's box relative to its row origin
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellRect {
    /// Column position in the column model
    pub col: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub align: Align,
    pub padding: Padding,
}

/// Solver output for one row kind: one rect per column, in column order
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub cells: Vec<CellRect>,
    /// Container size as resolved by the solver
    pub width: f32,
    pub height: f32,
}

impl Geometry {
    pub fn cell(&self, col: usize) -> Option<&CellRect> {
        self.cells.get(col)
    }
}

/// A template cell placed at an absolute position for one logical row
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacedCell {
    /// Logical row index in sorted and filtered order
    pub row: usize,
    /// Dataset row the cell shows
    pub row_id: u32,
    pub rect: CellRect,
}

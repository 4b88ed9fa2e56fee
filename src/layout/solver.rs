//! Geometry solver boundary.
//!
//! The cache only needs `resolve(input) -> geometry`. [`TaffySolver`] is the
//! default flexbox implementation; tests substitute closures that count calls.

use taffy::geometry::{Rect, Size};
use taffy::style::{
    AlignItems, AvailableSpace, Dimension, Display, FlexDirection, FlexWrap, JustifyContent,
    LengthPercentage, Style,
};
use taffy::{TaffyError, TaffyTree};

use super::{CellRect, ContainerLayout, CrossAlign, Direction, Geometry, Justify, LayoutInput, Wrap};
use crate::error::LayoutError;
use crate::types::{Basis, Column, Padding, Width};

/// Turns column and container directives into per-cell rectangles.
///
/// Implementations must be deterministic: equal inputs give equal geometry.
pub trait GeometrySolver {
    fn resolve(&mut self, input: &LayoutInput<'_>) -> Result<Geometry, LayoutError>;
}

impl<F> GeometrySolver for F
where
    F: FnMut(&LayoutInput<'_>) -> Result<Geometry, LayoutError>,
{
    fn resolve(&mut self, input: &LayoutInput<'_>) -> Result<Geometry, LayoutError> {
        self(input)
    }
}

/// Flexbox solver backed by a reusable Taffy tree.
pub struct TaffySolver {
    tree: TaffyTree<()>,
}

impl Default for TaffySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaffySolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaffySolver").finish_non_exhaustive()
    }
}

fn solver_err(e: TaffyError) -> LayoutError {
    LayoutError::Solver(e.to_string())
}

fn padding_rect(p: &Padding) -> Rect<LengthPercentage> {
    Rect {
        left: LengthPercentage::length(p.left),
        right: LengthPercentage::length(p.right),
        top: LengthPercentage::length(p.top),
        bottom: LengthPercentage::length(p.bottom),
    }
}

fn check_directives(input: &LayoutInput<'_>) -> Result<(), LayoutError> {
    let bad = |v: f32| !v.is_finite() || v < 0.0;
    let s = &input.sizing;
    if bad(s.viewport_width) || bad(s.row_height) || bad(s.line_height) {
        return Err(LayoutError::InvalidDirective(format!(
            "sizing context must be finite and non-negative: {s:?}"
        )));
    }
    let c = input.container;
    if bad(c.gap) || c.padding.as_array().into_iter().any(bad) {
        return Err(LayoutError::InvalidDirective(format!(
            "container gap and padding must be finite and non-negative (gap {})",
            c.gap
        )));
    }
    Ok(())
}

impl TaffySolver {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
        }
    }

    fn container_style(container: &ContainerLayout, input: &LayoutInput<'_>) -> Style {
        let sizing = input.sizing;
        Style {
            display: Display::Flex,
            flex_direction: match container.direction {
                Direction::Row => FlexDirection::Row,
                Direction::RowReverse => FlexDirection::RowReverse,
                Direction::Column => FlexDirection::Column,
                Direction::ColumnReverse => FlexDirection::ColumnReverse,
            },
            flex_wrap: match container.wrap {
                Wrap::NoWrap => FlexWrap::NoWrap,
                Wrap::Wrap => FlexWrap::Wrap,
            },
            justify_content: Some(match container.justify {
                Justify::FlexStart => JustifyContent::FlexStart,
                Justify::FlexEnd => JustifyContent::FlexEnd,
                Justify::Center => JustifyContent::Center,
                Justify::SpaceBetween => JustifyContent::SpaceBetween,
                Justify::SpaceAround => JustifyContent::SpaceAround,
                Justify::SpaceEvenly => JustifyContent::SpaceEvenly,
            }),
            align_items: Some(match container.align {
                CrossAlign::FlexStart => AlignItems::FlexStart,
                CrossAlign::FlexEnd => AlignItems::FlexEnd,
                CrossAlign::Center => AlignItems::Center,
                CrossAlign::Stretch => AlignItems::Stretch,
            }),
            gap: Size {
                width: LengthPercentage::length(container.gap),
                height: LengthPercentage::length(container.gap),
            },
            padding: padding_rect(&container.padding),
            size: Size {
                width: Dimension::length(sizing.viewport_width),
                // Wrapped rows grow to fit their lines
                height: match container.wrap {
                    Wrap::NoWrap => Dimension::length(sizing.row_height),
                    Wrap::Wrap => Dimension::auto(),
                },
            },
            min_size: Size {
                width: Dimension::auto(),
                height: Dimension::length(sizing.row_height),
            },
            ..Style::default()
        }
    }

    fn cell_style(col: &Column, line_height: f32) -> Style {
        Style {
            size: Size {
                width: match col.width {
                    Width::Fixed(px) => Dimension::length(px),
                    Width::Auto => Dimension::auto(),
                },
                height: Dimension::auto(),
            },
            flex_grow: col.flex_grow,
            flex_shrink: col.flex_shrink,
            flex_basis: match col.basis {
                Basis::Auto => Dimension::auto(),
                Basis::Length(px) => Dimension::length(px),
                Basis::Percent(p) => Dimension::percent(p / 100.0),
            },
            padding: padding_rect(&col.padding),
            min_size: Size {
                width: col.min_width.map_or(Dimension::auto(), Dimension::length),
                height: Dimension::length(line_height + col.padding.top + col.padding.bottom),
            },
            max_size: Size {
                width: col.max_width.map_or(Dimension::auto(), Dimension::length),
                height: Dimension::auto(),
            },
            ..Style::default()
        }
    }

    fn solve_tree(&mut self, input: &LayoutInput<'_>) -> Result<Geometry, LayoutError> {
        let children = input
            .columns
            .iter()
            .map(|col| {
                self.tree
                    .new_leaf(Self::cell_style(col, input.sizing.line_height))
                    .map_err(solver_err)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let root = self
            .tree
            .new_with_children(Self::container_style(input.container, input), &children)
            .map_err(solver_err)?;

        self.tree
            .compute_layout(
                root,
                Size {
                    width: AvailableSpace::Definite(input.sizing.viewport_width),
                    height: AvailableSpace::MaxContent,
                },
            )
            .map_err(solver_err)?;

        let cells = children
            .iter()
            .zip(input.columns)
            .enumerate()
            .map(|(col_idx, (&node, col))| {
                let layout = self.tree.layout(node).map_err(solver_err)?;
                Ok(CellRect {
                    col: col_idx,
                    x: layout.location.x,
                    y: layout.location.y,
                    width: layout.size.width,
                    height: layout.size.height,
                    align: col.align,
                    padding: col.padding,
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        let root_layout = self.tree.layout(root).map_err(solver_err)?;
        Ok(Geometry {
            cells,
            width: root_layout.size.width,
            height: root_layout.size.height,
        })
    }
}

impl GeometrySolver for TaffySolver {
    fn resolve(&mut self, input: &LayoutInput<'_>) -> Result<Geometry, LayoutError> {
        check_directives(input)?;
        let result = self.solve_tree(input);
        // The tree is rebuilt per solve; never carry nodes across calls
        self.tree.clear();
        result
    }
}

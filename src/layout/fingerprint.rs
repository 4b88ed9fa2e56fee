//! Structural fingerprint over geometry-affecting inputs.
//!
//! Covers ordered column sizing rules, container directives and the sizing
//! context. Labels, capabilities (sortable/filterable) and scroll position do
//! not affect geometry and are left out.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::{ContainerLayout, LayoutInput, SizingContext};
use crate::types::{Basis, Column, Padding, Width};

/// Cache key for solved geometry
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(input: &LayoutInput<'_>) -> Self {
        let mut h = DefaultHasher::new();
        input.columns.len().hash(&mut h);
        for col in input.columns {
            hash_column(col, &mut h);
        }
        hash_container(input.container, &mut h);
        hash_sizing(&input.sizing, &mut h);
        Self(h.finish())
    }
}

fn hash_f32(v: f32, h: &mut impl Hasher) {
    // -0.0 and 0.0 lay out identically
    let v = if v == 0.0 { 0.0 } else { v };
    v.to_bits().hash(h);
}

fn hash_opt_f32(v: Option<f32>, h: &mut impl Hasher) {
    v.is_some().hash(h);
    if let Some(v) = v {
        hash_f32(v, h);
    }
}

fn hash_padding(p: &Padding, h: &mut impl Hasher) {
    for side in p.as_array() {
        hash_f32(side, h);
    }
}

fn hash_column(col: &Column, h: &mut impl Hasher) {
    col.id.hash(h);
    match col.width {
        Width::Auto => 0_u8.hash(h),
        Width::Fixed(px) => {
            1_u8.hash(h);
            hash_f32(px, h);
        }
    }
    hash_f32(col.flex_grow, h);
    hash_f32(col.flex_shrink, h);
    match col.basis {
        Basis::Auto => 0_u8.hash(h),
        Basis::Length(px) => {
            1_u8.hash(h);
            hash_f32(px, h);
        }
        Basis::Percent(p) => {
            2_u8.hash(h);
            hash_f32(p, h);
        }
    }
    hash_opt_f32(col.min_width, h);
    hash_opt_f32(col.max_width, h);
    hash_padding(&col.padding, h);
    col.align.hash(h);
}

fn hash_container(c: &ContainerLayout, h: &mut impl Hasher) {
    c.direction.hash(h);
    c.wrap.hash(h);
    c.justify.hash(h);
    c.align.hash(h);
    hash_f32(c.gap, h);
    hash_padding(&c.padding, h);
}

fn hash_sizing(s: &SizingContext, h: &mut impl Hasher) {
    hash_f32(s.viewport_width, h);
    hash_f32(s.row_height, h);
    hash_f32(s.line_height, h);
}

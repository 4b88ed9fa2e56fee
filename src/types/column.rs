use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Horizontal alignment of cell content
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Numeric code used by the flat layout buffer.
    pub fn code(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 1.0,
            Self::Right => 2.0,
        }
    }
}

/// Raw JSON form shared by [`Width`] and [`Basis`]: a number or a keyword string.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
enum RawSize {
    Number(f32),
    Text(String),
}

/// Preferred column width: a fixed pixel value or `"auto"`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(try_from = "RawSize", into = "RawSize")]
pub enum Width {
    #[default]
    Auto,
    Fixed(f32),
}

impl TryFrom<RawSize> for Width {
    type Error = String;

    fn try_from(raw: RawSize) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSize::Number(px) => Ok(Self::Fixed(px)),
            RawSize::Text(s) if s.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            RawSize::Text(s) => Err(format!("width must be a number or \"auto\", got {s:?}")),
        }
    }
}

impl From<Width> for RawSize {
    fn from(w: Width) -> Self {
        match w {
            Width::Auto => Self::Text("auto".to_string()),
            Width::Fixed(px) => Self::Number(px),
        }
    }
}

/// Flex basis: pixels, a percentage of the container (`"25%"`), or `"auto"`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(try_from = "RawSize", into = "RawSize")]
pub enum Basis {
    #[default]
    Auto,
    Length(f32),
    /// Percentage in the 0..=100 range
    Percent(f32),
}

impl TryFrom<RawSize> for Basis {
    type Error = String;

    fn try_from(raw: RawSize) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSize::Number(px) => Ok(Self::Length(px)),
            RawSize::Text(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("auto") {
                    return Ok(Self::Auto);
                }
                s.strip_suffix('%')
                    .and_then(|p| p.trim().parse::<f32>().ok())
                    .map(Self::Percent)
                    .ok_or_else(|| format!("basis must be a number, percentage or \"auto\", got {s:?}"))
            }
        }
    }
}

impl From<Basis> for RawSize {
    fn from(b: Basis) -> Self {
        match b {
            Basis::Auto => Self::Text("auto".to_string()),
            Basis::Length(px) => Self::Number(px),
            Basis::Percent(p) => Self::Text(format!("{p}%")),
        }
    }
}

/// Inner cell padding in pixels
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    /// Same padding on every side
    pub fn uniform(px: f32) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

fn enabled() -> bool {
    true
}

/// Static per-column metadata: identity, sizing rules and capabilities
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique column identifier, also the dataset column key
    pub id: String,
    /// Display label (not used for layout)
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub width: Width,
    #[serde(default)]
    pub flex_grow: f32,
    #[serde(default)]
    pub flex_shrink: f32,
    #[serde(default)]
    pub basis: Basis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f32>,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default)]
    pub align: Align,
    #[serde(default = "enabled")]
    pub sortable: bool,
    #[serde(default = "enabled")]
    pub filterable: bool,
    #[serde(default = "enabled")]
    pub selectable: bool,
}

impl Column {
    /// Auto-width column with every capability enabled
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            header: id.clone(),
            id,
            width: Width::Auto,
            flex_grow: 0.0,
            flex_shrink: 0.0,
            basis: Basis::Auto,
            min_width: None,
            max_width: None,
            padding: Padding::default(),
            align: Align::Left,
            sortable: true,
            filterable: true,
            selectable: true,
        }
    }

    #[must_use]
    pub fn with_width(mut self, px: f32) -> Self {
        self.width = Width::Fixed(px);
        self
    }

    #[must_use]
    pub fn with_flex(mut self, grow: f32, shrink: f32) -> Self {
        self.flex_grow = grow;
        self.flex_shrink = shrink;
        self
    }

    #[must_use]
    pub fn with_basis(mut self, basis: Basis) -> Self {
        self.basis = basis;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, min_width: Option<f32>, max_width: Option<f32>) -> Self {
        self.min_width = min_width;
        self.max_width = max_width;
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    #[must_use]
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    fn check_sizes(&self) -> Result<()> {
        let invalid = |what: &str| {
            Err(GridError::validation(format!(
                "column {:?}: {what} must be finite and non-negative",
                self.id
            )))
        };
        let bad = |v: f32| !v.is_finite() || v < 0.0;

        if bad(self.flex_grow) {
            return invalid("flexGrow");
        }
        if bad(self.flex_shrink) {
            return invalid("flexShrink");
        }
        if let Width::Fixed(px) = self.width {
            if bad(px) {
                return invalid("width");
            }
        }
        match self.basis {
            Basis::Length(v) | Basis::Percent(v) if bad(v) => return invalid("basis"),
            _ => {}
        }
        if self.min_width.is_some_and(bad) {
            return invalid("minWidth");
        }
        if self.max_width.is_some_and(bad) {
            return invalid("maxWidth");
        }
        if self.padding.as_array().into_iter().any(bad) {
            return invalid("padding");
        }
        Ok(())
    }
}

/// Validate a column set: unique ids and sane sizing values.
pub fn validate_columns(columns: &[Column]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(columns.len());
    for col in columns {
        if col.id.is_empty() {
            return Err(GridError::validation("column id must not be empty"));
        }
        if !seen.insert(col.id.as_str()) {
            return Err(GridError::validation(format!(
                "duplicate column id {:?}",
                col.id
            )));
        }
        col.check_sizes()?;
    }
    Ok(())
}

/// Find a column by id
pub fn find_column<'a>(columns: &'a [Column], id: &str) -> Option<&'a Column> {
    columns.iter().find(|c| c.id == id)
}

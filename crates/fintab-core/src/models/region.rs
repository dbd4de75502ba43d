//! Table region model produced by boundary detection.

use serde::{Deserialize, Serialize};

/// How the columns of a region are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorStyle {
    TabSeparated,
    FixedWidth,
    SpaceSeparated,
}

impl SeparatorStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TabSeparated => "tab_separated",
            Self::FixedWidth => "fixed_width",
            Self::SpaceSeparated => "space_separated",
        }
    }
}

/// Coarse structural class of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// Reliable column separators (tabs or fixed columns).
    Structured,
    /// Columns recovered from whitespace runs.
    SemiStructured,
    /// Mostly `label: value` lines.
    KeyValue,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::SemiStructured => "semi_structured",
            Self::KeyValue => "key_value",
        }
    }
}

impl From<SeparatorStyle> for TableType {
    fn from(style: SeparatorStyle) -> Self {
        match style {
            SeparatorStyle::TabSeparated | SeparatorStyle::FixedWidth => Self::Structured,
            SeparatorStyle::SpaceSeparated => Self::SemiStructured,
        }
    }
}

/// A contiguous run of lines believed to hold one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    /// 0-based index of the first line in the source text.
    pub start_line: usize,

    /// 0-based index of the last line in the source text (inclusive).
    pub end_line: usize,

    /// The region's lines, verbatim.
    pub lines: Vec<String>,

    /// Structural confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Column separator style.
    pub separator: SeparatorStyle,

    /// Structural class.
    pub table_type: TableType,
}

impl TableRegion {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 1-based inclusive span, e.g. `3-10`.
    pub fn span_label(&self) -> String {
        format!("{}-{}", self.start_line + 1, self.end_line + 1)
    }
}

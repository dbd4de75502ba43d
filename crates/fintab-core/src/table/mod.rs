//! Table detection, header mapping and line splitting.

mod detector;
mod mapper;
mod splitter;

pub use detector::{best_region, looks_like_table_data, TableBoundaryDetector};
pub use mapper::{keyword_field_type, SemanticFieldMapper, TableSchema};
pub(crate) use mapper::unique_name;
pub use splitter::{split_columns, LineColumnSplitter};

use crate::rules::{has_amount, has_date};

/// Whether a line is a data row: long enough and holding a date or amount.
pub fn is_data_line(line: &str, min_length: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= min_length && (has_date(trimmed) || has_amount(trimmed))
}

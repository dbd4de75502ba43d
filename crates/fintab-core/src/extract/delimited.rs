//! Comma-separated text with a header row.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{ExtractionStrategy, Result};
use crate::models::record::{ExtractedRecord, ExtractionResult, RecordSource, SchemaDescriptor};
use crate::rules::{has_amount, has_date, is_null_marker};
use crate::table::unique_name;

const DELIMITED_CONFIDENCE: f32 = 0.95;

/// Parses text that is already a clean CSV table.
///
/// Only accepts input whose first line is a comma-separated header free of
/// dates and amounts and whose rows all share the header's width; anything
/// else is left to table detection.
#[derive(Debug, Clone, Default)]
pub struct DelimitedStrategy;

impl DelimitedStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionStrategy for DelimitedStrategy {
    fn name(&self) -> &'static str {
        "delimited"
    }

    fn extract(&self, text: &str) -> Result<Option<ExtractionResult>> {
        let Some(header_line) = text.lines().find(|l| !l.trim().is_empty()) else {
            return Ok(None);
        };
        if !header_line.contains(',') || has_date(header_line) || has_amount(header_line) {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.trim().as_bytes());

        let mut seen = HashMap::new();
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| unique_name(h, &mut seen))
            .collect();
        if headers.len() < 2 || headers.iter().any(|h| h.is_empty()) {
            return Ok(None);
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) if matches!(e.kind(), csv::ErrorKind::UnequalLengths { .. }) => {
                    debug!("Rows have uneven widths, not delimited text: {}", e);
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            let data: BTreeMap<String, Option<String>> = headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.clone(), (!is_null_marker(v)).then(|| v.to_string())))
                .collect();

            records.push(ExtractedRecord::new(
                records.len(),
                data,
                DELIMITED_CONFIDENCE,
                RecordSource::Delimited,
            ));
        }

        if records.is_empty() {
            return Ok(None);
        }

        let columns = headers.len();
        let mut schema = SchemaDescriptor::new("delimited_text").with_columns(headers);
        schema.table_type = Some("structured".to_string());
        schema.separator = Some("comma_separated".to_string());

        let notes = vec![format!(
            "Parsed as comma-separated text with {} columns and {} rows",
            columns,
            records.len()
        )];

        Ok(Some(ExtractionResult::new(
            records,
            DELIMITED_CONFIDENCE,
            DELIMITED_CONFIDENCE,
            schema,
            notes,
        )))
    }
}

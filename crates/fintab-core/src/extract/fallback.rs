//! Direct date/description/amount scanning for text without tables.

use std::collections::BTreeMap;

use tracing::debug;

use super::{ExtractionStrategy, Result};
use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractedRecord, ExtractionResult, RecordSource, SchemaDescriptor};
use crate::rules::{normalize_amount, AmountExtractor, DateExtractor, FieldExtractor};

const COLUMNS: [&str; 3] = ["Date", "Description", "Amount"];

/// Pulls `date ... amount` triples out of individual lines.
#[derive(Debug, Clone)]
pub struct FallbackLineScanner {
    min_line_length: usize,
    record_confidence: f32,
    empty_confidence: f32,
}

impl FallbackLineScanner {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            min_line_length: config.fallback_min_line_length,
            record_confidence: config.fallback_confidence,
            empty_confidence: config.fallback_empty_confidence,
        }
    }

    /// Scan every line; never fails.
    pub fn scan(&self, text: &str) -> ExtractionResult {
        let dates = DateExtractor::new();
        let amounts = AmountExtractor::new();

        let mut records = Vec::new();
        let mut scanned = 0;

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.len() < self.min_line_length {
                continue;
            }
            scanned += 1;

            let Some(date) = dates.extract(line) else {
                continue;
            };
            let Some(amount) = amounts.extract(line) else {
                continue;
            };
            let (Some((date_start, date_end)), Some((amount_start, amount_end))) =
                (date.position, amount.position)
            else {
                continue;
            };

            let between = if amount_start >= date_end {
                &line[date_end..amount_start]
            } else {
                &line[amount_end..date_start]
            };
            let description = between.trim();

            let mut data = BTreeMap::new();
            data.insert(COLUMNS[0].to_string(), Some(date.value));
            data.insert(
                COLUMNS[1].to_string(),
                (!description.is_empty()).then(|| description.to_string()),
            );
            data.insert(COLUMNS[2].to_string(), normalize_amount(&amount.source));

            records.push(
                ExtractedRecord::new(
                    records.len(),
                    data,
                    self.record_confidence,
                    RecordSource::LineScan,
                )
                .with_source_line(idx + 1),
            );
        }

        debug!("Line scan matched {} of {} lines", records.len(), scanned);

        let notes = vec![
            "No table structure detected, scanned lines for date and amount pairs".to_string(),
            format!("Extracted {} records by line scan", records.len()),
        ];

        let schema = SchemaDescriptor::new("line_scan")
            .with_columns(COLUMNS.iter().map(|c| c.to_string()).collect());

        ExtractionResult::new(
            records,
            self.record_confidence,
            self.empty_confidence,
            schema,
            notes,
        )
    }
}

impl Default for FallbackLineScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for FallbackLineScanner {
    fn name(&self) -> &'static str {
        "line_scan"
    }

    fn extract(&self, text: &str) -> Result<Option<ExtractionResult>> {
        Ok(Some(self.scan(text)))
    }
}

//! Record extraction from detected table regions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::{ExtractionStrategy, Result};
use crate::models::config::FintabConfig;
use crate::models::record::{
    ExtractedRecord, ExtractionResult, FieldType, RecordSource, SchemaDescriptor,
};
use crate::models::region::TableRegion;
use crate::rules::{is_null_marker, normalize_amount, parse_date};
use crate::table::{
    best_region, is_data_line, LineColumnSplitter, SemanticFieldMapper, TableBoundaryDetector,
};

/// Drives the mapper and splitter over the lines of one region.
#[derive(Debug, Clone)]
pub struct DataExtractionOrchestrator {
    mapper: SemanticFieldMapper,
    splitter: LineColumnSplitter,
    record_confidence: f32,
    empty_confidence: f32,
    min_data_line_length: usize,
}

impl DataExtractionOrchestrator {
    pub fn new() -> Self {
        Self::from_config(&FintabConfig::default())
    }

    pub fn from_config(config: &FintabConfig) -> Self {
        Self {
            mapper: SemanticFieldMapper::from_config(
                &config.detection,
                &config.mapping,
                config.extraction.min_data_line_length,
            ),
            splitter: LineColumnSplitter::new(),
            record_confidence: config.extraction.record_confidence,
            empty_confidence: config.extraction.empty_confidence,
            min_data_line_length: config.extraction.min_data_line_length,
        }
    }

    /// Turn every data line after the header into a typed record.
    pub fn extract_region(&self, region: &TableRegion) -> Result<ExtractionResult> {
        let schema = self.mapper.map_region(region)?;
        let layout = schema.layout();

        let mut records = Vec::new();
        let mut skipped = 0;
        let mut dates: Vec<NaiveDate> = Vec::new();

        for (offset, line) in region
            .lines
            .iter()
            .enumerate()
            .skip(schema.header_index + 1)
        {
            if !is_data_line(line, self.min_data_line_length) {
                skipped += 1;
                continue;
            }

            let values = self.splitter.split(line, &layout);
            let mut data = BTreeMap::new();

            for (mapping, value) in schema.mappings.iter().zip(values) {
                let cell = clean_value(&value, mapping.field_type);
                if mapping.field_type == FieldType::Date {
                    dates.extend(cell.as_deref().and_then(parse_date));
                }
                data.insert(mapping.standard_name.clone(), cell);
            }

            records.push(
                ExtractedRecord::new(
                    records.len(),
                    data,
                    self.record_confidence,
                    RecordSource::TableRegion,
                )
                .with_source_line(region.start_line + offset + 1),
            );
        }

        debug!(
            "Region {} yielded {} records, {} lines skipped",
            region.span_label(),
            records.len(),
            skipped
        );

        let mut notes = vec![
            format!(
                "Detected {} table at lines {} (confidence {:.2})",
                region.table_type.as_str(),
                region.span_label(),
                region.confidence
            ),
            format!("Mapped {} columns: {}", schema.mappings.len(), schema.header_list()),
            format!("Extracted {} records from table region", records.len()),
        ];
        if skipped > 0 {
            notes.push(format!("Skipped {} non-data lines", skipped));
        }
        if let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) {
            notes.push(format!("Dates span {} to {}", first, last));
        }

        let columns = schema
            .mappings
            .iter()
            .map(|m| m.standard_name.clone())
            .collect();
        let mut schema_detected = SchemaDescriptor::new("detected_table").with_columns(columns);
        schema_detected.table_type = Some(region.table_type.as_str().to_string());
        schema_detected.separator = Some(region.separator.as_str().to_string());
        schema_detected.lines = Some(region.span_label());

        Ok(ExtractionResult::new(
            records,
            self.record_confidence,
            self.empty_confidence,
            schema_detected,
            notes,
        ))
    }
}

impl Default for DataExtractionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Null out empty markers and normalize money columns.
fn clean_value(value: &str, field_type: FieldType) -> Option<String> {
    let value = value.trim();
    if is_null_marker(value) {
        return None;
    }
    if field_type.is_monetary() {
        return normalize_amount(value);
    }
    Some(value.to_string())
}

/// Detect regions, keep the most confident one, and extract it.
#[derive(Debug, Clone)]
pub struct TableRegionStrategy {
    detector: TableBoundaryDetector,
    orchestrator: DataExtractionOrchestrator,
}

impl TableRegionStrategy {
    pub fn from_config(config: &FintabConfig) -> Self {
        Self {
            detector: TableBoundaryDetector::from_config(&config.detection),
            orchestrator: DataExtractionOrchestrator::from_config(config),
        }
    }
}

impl Default for TableRegionStrategy {
    fn default() -> Self {
        Self::from_config(&FintabConfig::default())
    }
}

impl ExtractionStrategy for TableRegionStrategy {
    fn name(&self) -> &'static str {
        "table_region"
    }

    fn extract(&self, text: &str) -> Result<Option<ExtractionResult>> {
        let regions = self.detector.detect(text);
        let Some(region) = best_region(&regions) else {
            return Ok(None);
        };

        let mut result = self.orchestrator.extract_region(region)?;
        if regions.len() > 1 {
            result.processing_notes.insert(
                0,
                format!(
                    "Found {} candidate table regions, using the most confident",
                    regions.len()
                ),
            );
        }

        Ok(Some(result))
    }
}

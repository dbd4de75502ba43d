//! Header discovery and semantic column typing.

use std::collections::HashMap;

use tracing::debug;

use super::is_data_line;
use super::splitter::split_columns;
use crate::error::ExtractionError;
use crate::models::config::{DetectionConfig, MappingConfig};
use crate::models::record::{FieldMapping, FieldType};
use crate::models::region::TableRegion;
use crate::rules::keywords::FIELD_KEYWORDS;
use crate::rules::{has_amount, has_date, header_keyword_count};

/// Confidence given to a type read straight off the header text.
const KEYWORD_CONFIDENCE: f32 = 0.9;
/// Confidence given to columns that could not be typed.
const UNKNOWN_CONFIDENCE: f32 = 0.2;

/// Columns discovered for one table region.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Index of the header line within the region.
    pub header_index: usize,
    /// One mapping per column, in column order.
    pub mappings: Vec<FieldMapping>,
}

impl TableSchema {
    /// Field type of every column, in order.
    pub fn layout(&self) -> Vec<FieldType> {
        self.mappings.iter().map(|m| m.field_type).collect()
    }

    /// Standard column names joined for display.
    pub fn header_list(&self) -> String {
        self.mappings
            .iter()
            .map(|m| m.standard_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Locates the header of a region and types its columns.
#[derive(Debug, Clone)]
pub struct SemanticFieldMapper {
    header_scan_lines: usize,
    min_header_keywords: usize,
    sample_lines: usize,
    inference_threshold: f32,
    max_sample_values: usize,
    min_data_line_length: usize,
}

impl SemanticFieldMapper {
    pub fn new() -> Self {
        Self::from_config(&DetectionConfig::default(), &MappingConfig::default(), 5)
    }

    pub fn from_config(
        detection: &DetectionConfig,
        mapping: &MappingConfig,
        min_data_line_length: usize,
    ) -> Self {
        Self {
            header_scan_lines: detection.header_scan_lines,
            min_header_keywords: detection.min_header_keywords,
            sample_lines: mapping.sample_lines,
            inference_threshold: mapping.inference_threshold,
            max_sample_values: mapping.max_sample_values,
            min_data_line_length,
        }
    }

    /// Index of the header line: the most keyword-rich of the first lines,
    /// or the first line when none has enough keywords.
    pub fn find_header(&self, region: &TableRegion) -> usize {
        let mut best: Option<(usize, usize)> = None;

        for (idx, line) in region.lines.iter().take(self.header_scan_lines).enumerate() {
            let hits = header_keyword_count(line);
            if hits >= self.min_header_keywords && best.is_none_or(|(_, top)| hits > top) {
                best = Some((idx, hits));
            }
        }

        best.map(|(idx, _)| idx).unwrap_or(0)
    }

    /// Discover the header and assign a field type to every column.
    pub fn map_region(&self, region: &TableRegion) -> Result<TableSchema, ExtractionError> {
        if region.is_empty() {
            return Err(ExtractionError::InvalidRegion(format!(
                "region at lines {} has no lines",
                region.span_label()
            )));
        }

        let header_index = self.find_header(region);
        let headers = split_columns(&region.lines[header_index]);
        if headers.is_empty() {
            return Err(ExtractionError::EmptyHeader {
                line: region.start_line + header_index + 1,
            });
        }

        debug!("Header at line {}: {:?}", region.start_line + header_index + 1, headers);

        let samples = self.collect_samples(region, header_index, headers.len());
        let mut seen: HashMap<String, usize> = HashMap::new();

        let mappings = headers
            .iter()
            .zip(samples)
            .map(|(header, column_samples)| {
                let mut mapping = self.map_column(header, &column_samples);
                mapping.standard_name = unique_name(&mapping.standard_name, &mut seen);
                mapping
            })
            .collect();

        Ok(TableSchema {
            header_index,
            mappings,
        })
    }

    fn map_column(&self, header: &str, samples: &[String]) -> FieldMapping {
        let kept: Vec<String> = samples.iter().take(self.max_sample_values).cloned().collect();

        if let Some(field_type) = keyword_field_type(header) {
            return FieldMapping::new(header, field_type, KEYWORD_CONFIDENCE).with_samples(kept);
        }

        if let Some((field_type, ratio)) = self.infer_from_samples(samples) {
            debug!("Column '{}' inferred as {} ({:.2})", header, field_type, ratio);
            return FieldMapping::new(header, field_type, ratio).with_samples(kept);
        }

        FieldMapping::new(header, FieldType::Unknown, UNKNOWN_CONFIDENCE).with_samples(kept)
    }

    fn infer_from_samples(&self, samples: &[String]) -> Option<(FieldType, f32)> {
        if samples.is_empty() {
            return None;
        }
        let total = samples.len() as f32;

        let date_ratio = samples.iter().filter(|v| has_date(v)).count() as f32 / total;
        if date_ratio > self.inference_threshold {
            return Some((FieldType::Date, date_ratio));
        }

        let amount_ratio = samples.iter().filter(|v| has_amount(v)).count() as f32 / total;
        if amount_ratio > self.inference_threshold {
            return Some((FieldType::Amount, amount_ratio));
        }

        None
    }

    /// Values per column position from the data lines following the header.
    fn collect_samples(
        &self,
        region: &TableRegion,
        header_index: usize,
        columns: usize,
    ) -> Vec<Vec<String>> {
        let mut samples = vec![Vec::new(); columns];

        for line in region
            .lines
            .iter()
            .skip(header_index + 1)
            .take(self.sample_lines)
            .filter(|l| is_data_line(l, self.min_data_line_length))
        {
            for (column, value) in split_columns(line).into_iter().take(columns).enumerate() {
                samples[column].push(value);
            }
        }

        samples
    }
}

impl Default for SemanticFieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Field type named by the header text, if any keyword matches.
///
/// Header words are compared whole; keywords of four letters or more also
/// match as a prefix ("Withdrawals", "Deposits").
pub fn keyword_field_type(header: &str) -> Option<FieldType> {
    let lower = header.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    FIELD_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            words.iter().any(|word| {
                keywords
                    .iter()
                    .any(|kw| *word == *kw || (kw.len() >= 4 && word.starts_with(kw)))
            })
        })
        .map(|(field_type, _)| *field_type)
}

/// Suffix repeated column names ("Date", "Date 2") so record keys stay distinct.
pub(crate) fn unique_name(name: &str, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(name.to_string()).or_insert(0);
    *count += 1;
    if *count == 1 {
        name.to_string()
    } else {
        format!("{} {}", name, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::{SeparatorStyle, TableType};
    use pretty_assertions::assert_eq;

    fn region(lines: &[&str]) -> TableRegion {
        TableRegion {
            start_line: 0,
            end_line: lines.len().saturating_sub(1),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            confidence: 1.0,
            separator: SeparatorStyle::SpaceSeparated,
            table_type: TableType::SemiStructured,
        }
    }

    #[test]
    fn test_keyword_field_types() {
        assert_eq!(keyword_field_type("Date"), Some(FieldType::Date));
        assert_eq!(keyword_field_type("Value Date"), Some(FieldType::Date));
        assert_eq!(keyword_field_type("Description"), Some(FieldType::Description));
        assert_eq!(keyword_field_type("Withdrawals"), Some(FieldType::Debit));
        assert_eq!(keyword_field_type("Debit Amount"), Some(FieldType::Debit));
        assert_eq!(keyword_field_type("Cr"), Some(FieldType::Credit));
        assert_eq!(keyword_field_type("Closing Bal."), Some(FieldType::Balance));
        assert_eq!(keyword_field_type("Chq No"), Some(FieldType::Reference));
        assert_eq!(keyword_field_type("Amt (INR)"), Some(FieldType::Amount));
        assert_eq!(keyword_field_type("Voucher"), Some(FieldType::InvoiceNumber));
        assert_eq!(keyword_field_type("Party Name"), Some(FieldType::Customer));
        assert_eq!(keyword_field_type("Supplier"), Some(FieldType::Vendor));
        assert_eq!(keyword_field_type("GST"), Some(FieldType::Tax));
        assert_eq!(keyword_field_type("Branch"), None);
    }

    #[test]
    fn test_maps_bank_header() {
        let region = region(&[
            "Date Description Reference Debit Credit Balance",
            "01/02/2025  Office Rent Payment  CHQ001  15,000.00  35,000.00",
            "01/03/2025  Client Payment Received  DEP001  25,000.00  60,000.00",
        ]);
        let schema = SemanticFieldMapper::new().map_region(&region).unwrap();

        assert_eq!(schema.header_index, 0);
        let names: Vec<&str> = schema.mappings.iter().map(|m| m.standard_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Date", "Description", "Reference", "Debit Amount", "Credit Amount", "Balance"]
        );
        assert_eq!(schema.mappings[0].sample_values, vec!["01/02/2025", "01/03/2025"]);
    }

    #[test]
    fn test_header_found_below_preamble() {
        let region = region(&[
            "Statement period 01/01/2025 to 31/01/2025 total 1,000.00",
            "Date  Description  Amount  Balance",
            "02/01/2025  Card purchase  450.00  9,550.00",
        ]);
        let schema = SemanticFieldMapper::new().map_region(&region).unwrap();

        assert_eq!(schema.header_index, 1);
        assert_eq!(schema.header_list(), "Date, Description, Amount, Balance");
    }

    #[test]
    fn test_infers_types_from_samples() {
        let region = region(&[
            "Posted  Memo  Sum",
            "01/02/2025  Rent  1,000.00",
            "02/02/2025  Fees  20.00",
            "03/02/2025  Misc  5.50",
        ]);
        let schema = SemanticFieldMapper::new().map_region(&region).unwrap();

        assert_eq!(schema.mappings[0].field_type, FieldType::Date);
        assert_eq!(schema.mappings[0].confidence, 1.0);
        assert_eq!(schema.mappings[1].field_type, FieldType::Unknown);
        assert_eq!(schema.mappings[1].standard_name, "Memo");
        assert_eq!(schema.mappings[2].field_type, FieldType::Amount);
        assert_eq!(schema.mappings[2].standard_name, "Amount");
    }

    #[test]
    fn test_duplicate_names_are_suffixed() {
        let region = region(&[
            "Txn Date  Value Date  Amount",
            "01/02/2025  01/02/2025  10.00",
            "02/02/2025  02/02/2025  12.00",
        ]);
        let schema = SemanticFieldMapper::new().map_region(&region).unwrap();

        assert_eq!(schema.mappings[0].standard_name, "Date");
        assert_eq!(schema.mappings[1].standard_name, "Date 2");
    }

    #[test]
    fn test_empty_header_is_an_error() {
        let region = region(&["| | |", "01/02/2025 | Rent | 10.00", "02/02/2025 | Fee | 1.00"]);
        let err = SemanticFieldMapper::new().map_region(&region).unwrap_err();

        assert!(matches!(err, ExtractionError::EmptyHeader { line: 1 }));
    }
}

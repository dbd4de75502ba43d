//! Field, record and result models produced by the extraction pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Semantic type of a discovered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Date,
    Description,
    Reference,
    Amount,
    Debit,
    Credit,
    Balance,
    Account,
    InvoiceNumber,
    Customer,
    Vendor,
    Tax,
    Unknown,
}

impl FieldType {
    /// Canonical column label, `None` for [`FieldType::Unknown`].
    pub fn standard_name(&self) -> Option<&'static str> {
        match self {
            Self::Date => Some("Date"),
            Self::Description => Some("Description"),
            Self::Reference => Some("Reference"),
            Self::Amount => Some("Amount"),
            Self::Debit => Some("Debit Amount"),
            Self::Credit => Some("Credit Amount"),
            Self::Balance => Some("Balance"),
            Self::Account => Some("Account Number"),
            Self::InvoiceNumber => Some("Invoice Number"),
            Self::Customer => Some("Customer Name"),
            Self::Vendor => Some("Vendor Name"),
            Self::Tax => Some("Tax Amount"),
            Self::Unknown => None,
        }
    }

    /// Whether values of this type are money columns that get normalized.
    pub fn is_monetary(&self) -> bool {
        matches!(
            self,
            Self::Amount | Self::Debit | Self::Credit | Self::Balance | Self::Tax
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Reference => "reference",
            Self::Amount => "amount",
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::Balance => "balance",
            Self::Account => "account",
            Self::InvoiceNumber => "invoice_number",
            Self::Customer => "customer",
            Self::Vendor => "vendor",
            Self::Tax => "tax",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding between one discovered column and its semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Header text as it appeared in the document.
    pub original_name: String,

    /// Inferred semantic type.
    pub field_type: FieldType,

    /// Canonical column label used as the record key.
    pub standard_name: String,

    /// Confidence of the type assignment (0.0 - 1.0).
    pub confidence: f32,

    /// Up to a few values seen in this column while inferring its type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_values: Vec<String>,
}

impl FieldMapping {
    /// Create a mapping whose standard name is looked up from the field type.
    pub fn new(original_name: impl Into<String>, field_type: FieldType, confidence: f32) -> Self {
        let original_name = original_name.into();
        let standard_name = field_type
            .standard_name()
            .map(str::to_string)
            .unwrap_or_else(|| original_name.clone());

        Self {
            original_name,
            field_type,
            standard_name,
            confidence,
            sample_values: Vec::new(),
        }
    }

    pub fn with_samples(mut self, samples: Vec<String>) -> Self {
        self.sample_values = samples;
        self
    }
}

/// Which strategy produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Comma-separated text with a header row.
    Delimited,
    /// A row of a detected table region.
    TableRegion,
    /// A line matched by the fallback scanner.
    LineScan,
}

/// One extracted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Synthetic identifier, stable for a given input.
    pub id: String,

    /// Position among the extracted rows (0-based, header excluded).
    pub row_index: usize,

    /// Column values keyed by standard name; `None` for empty cells.
    pub data: BTreeMap<String, Option<String>>,

    /// Confidence of this record (0.0 - 1.0).
    pub confidence: f32,

    /// Strategy that produced this record.
    pub source: RecordSource,

    /// 1-based line number of the source text the row came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<usize>,
}

impl ExtractedRecord {
    pub fn new(
        row_index: usize,
        data: BTreeMap<String, Option<String>>,
        confidence: f32,
        source: RecordSource,
    ) -> Self {
        let prefix = match source {
            RecordSource::Delimited => "csv",
            RecordSource::TableRegion => "tbl",
            RecordSource::LineScan => "line",
        };

        Self {
            id: format!("{}-{:05}", prefix, row_index),
            row_index,
            data,
            confidence,
            source,
            source_line: None,
        }
    }

    pub fn with_source_line(mut self, line: usize) -> Self {
        self.source_line = Some(line);
        self
    }

    /// Value of a column, flattening missing keys and null cells.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.data.get(column).and_then(|v| v.as_deref())
    }
}

/// Description of the structure that was recognised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Name of the strategy output format, e.g. `detected_table`.
    pub format: String,

    /// Table type of the chosen region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,

    /// Column separator style of the chosen region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Comma-separated list of standard column names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,

    /// Record keys in column order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// 1-based inclusive line span of the chosen region, e.g. `3-10`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<String>,
}

impl SchemaDescriptor {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Default::default()
        }
    }

    /// Set the column order and the display header list together.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.headers = Some(columns.join(", "));
        self.columns = columns;
        self
    }
}

/// Aggregate output of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted rows in document order.
    pub records: Vec<ExtractedRecord>,

    /// Number of records.
    pub total_records: usize,

    /// Overall confidence of the extraction (0.0 - 1.0).
    pub extraction_confidence: f32,

    /// Recognised structure.
    pub schema_detected: SchemaDescriptor,

    /// Human-readable notes on the path taken.
    pub processing_notes: Vec<String>,
}

impl ExtractionResult {
    /// Build a result, choosing the confidence by whether any record exists.
    pub fn new(
        records: Vec<ExtractedRecord>,
        confidence: f32,
        empty_confidence: f32,
        schema_detected: SchemaDescriptor,
        processing_notes: Vec<String>,
    ) -> Self {
        let extraction_confidence = if records.is_empty() {
            empty_confidence
        } else {
            confidence
        };

        Self {
            total_records: records.len(),
            records,
            extraction_confidence,
            schema_detected,
            processing_notes,
        }
    }

    /// Zero-record result describing a failure.
    pub fn failed(note: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            total_records: 0,
            extraction_confidence: 0.0,
            schema_detected: SchemaDescriptor::new("failed"),
            processing_notes: vec![note.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_name_lookup() {
        let mapping = FieldMapping::new("Withdrawals", FieldType::Debit, 0.9);
        assert_eq!(mapping.standard_name, "Debit Amount");

        let mapping = FieldMapping::new("Branch Code", FieldType::Unknown, 0.1);
        assert_eq!(mapping.standard_name, "Branch Code");
    }

    #[test]
    fn test_money_columns() {
        assert!(FieldType::Tax.is_monetary());
        assert!(FieldType::Balance.is_monetary());
        assert!(!FieldType::Reference.is_monetary());
        assert!(!FieldType::Date.is_monetary());
    }

    #[test]
    fn test_field_type_serializes_snake_case() {
        let json = serde_json::to_string(&FieldType::InvoiceNumber).unwrap();
        assert_eq!(json, "\"invoice_number\"");
    }

    #[test]
    fn test_result_confidence_depends_on_records() {
        let empty = ExtractionResult::new(Vec::new(), 0.85, 0.3, SchemaDescriptor::new("t"), vec![]);
        assert_eq!(empty.extraction_confidence, 0.3);
        assert_eq!(empty.total_records, 0);

        let record = ExtractedRecord::new(0, BTreeMap::new(), 0.85, RecordSource::TableRegion);
        let full = ExtractionResult::new(vec![record], 0.85, 0.3, SchemaDescriptor::new("t"), vec![]);
        assert_eq!(full.extraction_confidence, 0.85);
        assert_eq!(full.total_records, 1);
    }

    #[test]
    fn test_record_ids_carry_source() {
        let record = ExtractedRecord::new(7, BTreeMap::new(), 0.6, RecordSource::LineScan);
        assert_eq!(record.id, "line-00007");
    }

    #[test]
    fn test_failed_result() {
        let result = ExtractionResult::failed("Extraction failed: boom");
        assert_eq!(result.extraction_confidence, 0.0);
        assert!(result.is_empty());
        assert_eq!(result.processing_notes, vec!["Extraction failed: boom".to_string()]);
    }
}

//! Core library for schema-less table extraction from financial documents.
//!
//! This crate provides:
//! - Document type classification (bank statement, invoice, registers)
//! - Table region detection in free-form text
//! - Header to standard field mapping with content-based inference
//! - Line splitting with debit/credit/balance reconstruction
//! - A strategy pipeline that always yields a result, falling back to line scanning

pub mod classify;
pub mod error;
pub mod extract;
pub mod models;
pub mod rules;
pub mod table;

pub use classify::{ClassificationResult, DocumentType, DocumentTypeClassifier};
pub use error::{ConfigError, ExtractionError, FintabError, Result};
pub use extract::{
    DataExtractionOrchestrator, DelimitedStrategy, DocumentProcessor, DocumentReport,
    ExtractionStrategy, FallbackLineScanner, TableRegionStrategy,
};
pub use models::config::FintabConfig;
pub use models::record::{
    ExtractedRecord, ExtractionResult, FieldMapping, FieldType, RecordSource, SchemaDescriptor,
};
pub use models::region::{SeparatorStyle, TableRegion, TableType};
pub use table::{LineColumnSplitter, SemanticFieldMapper, TableBoundaryDetector, TableSchema};

/// Extract records from document text with the default configuration.
pub fn extract(text: &str) -> ExtractionResult {
    DocumentProcessor::new().extract(text)
}

/// Classify and extract a document with the default configuration.
pub fn process_document(text: &str, filename: Option<&str>) -> DocumentReport {
    DocumentProcessor::new().process(text, filename)
}

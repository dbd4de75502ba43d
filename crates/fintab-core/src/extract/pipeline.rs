//! Ordered strategy pipeline with failure containment.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    DelimitedStrategy, ExtractionStrategy, FallbackLineScanner, TableRegionStrategy,
};
use crate::classify::{ClassificationResult, DocumentTypeClassifier};
use crate::models::config::FintabConfig;
use crate::models::record::ExtractionResult;

/// Classification and extraction of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub classification: ClassificationResult,
    pub extraction: ExtractionResult,
}

/// Runs extraction strategies in order until one produces a result.
pub struct DocumentProcessor {
    classifier: DocumentTypeClassifier,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl DocumentProcessor {
    /// Create a processor with the default configuration.
    pub fn new() -> Self {
        Self::build(&FintabConfig::default())
    }

    /// Create a processor from a validated configuration.
    pub fn from_config(config: &FintabConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &FintabConfig) -> Self {
        let mut strategies: Vec<Box<dyn ExtractionStrategy>> = Vec::new();
        if config.extraction.enable_delimited {
            strategies.push(Box::new(DelimitedStrategy::new()));
        }
        strategies.push(Box::new(TableRegionStrategy::from_config(config)));
        strategies.push(Box::new(FallbackLineScanner::from_config(&config.extraction)));

        Self {
            classifier: DocumentTypeClassifier::new(),
            strategies,
        }
    }

    /// Replace the strategy list.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Extract records from document text.
    ///
    /// Never fails: a strategy error becomes a zero-record result with
    /// confidence 0.0 and a note naming the failure.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        info!("Extracting records from {} characters of text", text.len());

        for strategy in &self.strategies {
            match strategy.extract(text) {
                Ok(Some(result)) => {
                    info!(
                        "Strategy {} produced {} records (confidence {:.2})",
                        strategy.name(),
                        result.total_records,
                        result.extraction_confidence
                    );
                    return result;
                }
                Ok(None) => debug!("Strategy {} not applicable", strategy.name()),
                Err(e) => {
                    warn!("Strategy {} failed: {}", strategy.name(), e);
                    return ExtractionResult::failed(format!("Extraction failed: {}", e));
                }
            }
        }

        ExtractionResult::failed("No extraction strategy produced a result")
    }

    /// Classify and extract a document.
    pub fn process(&self, text: &str, filename: Option<&str>) -> DocumentReport {
        let classification = self.classifier.classify(text, filename);
        let mut extraction = self.extract(text);

        extraction.processing_notes.insert(
            0,
            format!(
                "Classified as {} (confidence {:.2})",
                classification.document_type, classification.confidence
            ),
        );

        DocumentReport {
            classification,
            extraction,
        }
    }

    /// Classify a document without extracting it.
    pub fn classify(&self, text: &str, filename: Option<&str>) -> ClassificationResult {
        self.classifier.classify(text, filename)
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::extract::Result;

    struct Broken;

    impl ExtractionStrategy for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn extract(&self, _text: &str) -> Result<Option<ExtractionResult>> {
            Err(ExtractionError::InvalidRegion("test failure".to_string()))
        }
    }

    #[test]
    fn test_strategy_error_becomes_failed_result() {
        let processor = DocumentProcessor::new().with_strategies(vec![Box::new(Broken)]);
        let result = processor.extract("01/02/2025  Rent  100.00");

        assert_eq!(result.total_records, 0);
        assert_eq!(result.extraction_confidence, 0.0);
        assert_eq!(
            result.processing_notes,
            vec!["Extraction failed: invalid table region: test failure".to_string()]
        );
    }

    #[test]
    fn test_empty_strategy_list() {
        let processor = DocumentProcessor::new().with_strategies(Vec::new());
        let result = processor.extract("anything");

        assert_eq!(result.extraction_confidence, 0.0);
        assert_eq!(result.schema_detected.format, "failed");
    }

    #[test]
    fn test_disabling_delimited_parsing() {
        let mut config = FintabConfig::default();
        config.extraction.enable_delimited = false;
        let processor = DocumentProcessor::from_config(&config).unwrap();

        let result = processor.extract("Name,Code\nAcme,1\nGlobex,2");
        assert_eq!(result.schema_detected.format, "line_scan");
    }

    #[test]
    fn test_process_prepends_classification_note() {
        let report = DocumentProcessor::new().process("Hello world", None);

        assert_eq!(report.extraction.processing_notes[0], "Classified as other (confidence 0.00)");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = FintabConfig::default();
        config.extraction.record_confidence = 2.0;

        assert!(DocumentProcessor::from_config(&config).is_err());
    }
}

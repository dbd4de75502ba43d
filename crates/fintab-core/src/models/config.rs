//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Main configuration for the fintab pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FintabConfig {
    /// Table boundary detection configuration.
    pub detection: DetectionConfig,

    /// Header discovery and column typing configuration.
    pub mapping: MappingConfig,

    /// Record extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Table boundary detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum number of lines a region needs to be kept.
    pub min_table_lines: usize,

    /// Number of leading region lines searched for a header.
    pub header_scan_lines: usize,

    /// Header keyword hits needed to treat a line as a header.
    pub min_header_keywords: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_table_lines: 3,
            header_scan_lines: 5,
            min_header_keywords: 2,
        }
    }
}

/// Header discovery and column typing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Lines after the header sampled for type inference.
    pub sample_lines: usize,

    /// Ratio of matching samples above which a column is typed (0.0 - 1.0).
    pub inference_threshold: f32,

    /// Sample values kept on each field mapping.
    pub max_sample_values: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            sample_lines: 5,
            inference_threshold: 0.6,
            max_sample_values: 3,
        }
    }
}

/// Record extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Confidence given to each record read from a table region.
    pub record_confidence: f32,

    /// Aggregate confidence when a table region produced no records.
    pub empty_confidence: f32,

    /// Shortest trimmed line treated as a data row.
    pub min_data_line_length: usize,

    /// Shortest trimmed line the fallback scanner looks at.
    pub fallback_min_line_length: usize,

    /// Confidence given to each fallback record.
    pub fallback_confidence: f32,

    /// Aggregate confidence when the fallback scanner found nothing.
    pub fallback_empty_confidence: f32,

    /// Try comma-separated parsing before table detection.
    pub enable_delimited: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            record_confidence: 0.85,
            empty_confidence: 0.3,
            min_data_line_length: 5,
            fallback_min_line_length: 10,
            fallback_confidence: 0.6,
            fallback_empty_confidence: 0.2,
            enable_delimited: true,
        }
    }
}

impl FintabConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that every value is within its usable range.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        non_zero("detection.min_table_lines", self.detection.min_table_lines)?;
        non_zero("detection.header_scan_lines", self.detection.header_scan_lines)?;
        non_zero("detection.min_header_keywords", self.detection.min_header_keywords)?;
        non_zero("mapping.sample_lines", self.mapping.sample_lines)?;

        unit_interval("mapping.inference_threshold", self.mapping.inference_threshold)?;
        unit_interval("extraction.record_confidence", self.extraction.record_confidence)?;
        unit_interval("extraction.empty_confidence", self.extraction.empty_confidence)?;
        unit_interval("extraction.fallback_confidence", self.extraction.fallback_confidence)?;
        unit_interval(
            "extraction.fallback_empty_confidence",
            self.extraction.fallback_empty_confidence,
        )?;

        Ok(())
    }
}

fn non_zero(field: &str, value: usize) -> std::result::Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn unit_interval(field: &str, value: f32) -> std::result::Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: format!("{} is outside 0.0 - 1.0", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FintabConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FintabConfig =
            serde_json::from_str(r#"{"detection": {"min_table_lines": 4}}"#).unwrap();

        assert_eq!(config.detection.min_table_lines, 4);
        assert_eq!(config.detection.header_scan_lines, 5);
        assert_eq!(config.mapping.sample_lines, 5);
        assert!(config.extraction.enable_delimited);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let mut config = FintabConfig::default();
        config.mapping.inference_threshold = 1.5;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mapping.inference_threshold"));
    }

    #[test]
    fn test_rejects_zero_table_size() {
        let mut config = FintabConfig::default();
        config.detection.min_table_lines = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_header_keywords() {
        let mut config = FintabConfig::default();
        config.detection.min_header_keywords = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("detection.min_header_keywords"));
    }
}

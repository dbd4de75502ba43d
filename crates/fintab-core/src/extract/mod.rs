//! Record extraction strategies and the document pipeline.

mod delimited;
mod fallback;
mod orchestrator;
mod pipeline;

pub use delimited::DelimitedStrategy;
pub use fallback::FallbackLineScanner;
pub use orchestrator::{DataExtractionOrchestrator, TableRegionStrategy};
pub use pipeline::{DocumentProcessor, DocumentReport};

use crate::error::ExtractionError;
use crate::models::record::ExtractionResult;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// One way of turning document text into records.
///
/// `Ok(None)` means the strategy does not apply and the next one should be
/// tried; `Err` aborts the pipeline.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Attempt extraction.
    fn extract(&self, text: &str) -> Result<Option<ExtractionResult>>;
}

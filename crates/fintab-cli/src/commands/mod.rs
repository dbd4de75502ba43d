//! CLI subcommands.

pub mod batch;
pub mod classify;
pub mod config;
pub mod process;

use std::fs;
use std::path::Path;

use tracing::debug;

use fintab_core::FintabConfig;

/// Load the configuration from `-c` or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FintabConfig> {
    match config_path {
        Some(path) => Ok(FintabConfig::from_file(Path::new(path))?),
        None => Ok(FintabConfig::default()),
    }
}

/// Read a document as text: plain text files directly, PDFs through
/// their embedded text layer.
pub fn read_document(path: &Path) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "txt" | "csv" | "tsv" | "text" => fs::read_to_string(path)?,
        "pdf" => {
            let data = fs::read(path)?;
            let text = pdf_extract::extract_text_from_mem(&data)
                .map_err(|e| anyhow::anyhow!("Failed to extract PDF text: {}", e))?;
            debug!("Extracted {} characters from PDF", text.len());
            text
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    if text.trim().is_empty() {
        anyhow::bail!("No text found in {}", path.display());
    }

    Ok(text)
}

/// Whether batch mode should pick up a file.
pub fn is_supported(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "txt" | "csv" | "tsv" | "text" | "pdf")
}

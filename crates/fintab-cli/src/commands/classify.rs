//! Classify command - report the document type only.

use std::path::PathBuf;

use clap::Args;
use console::style;

use fintab_core::DocumentTypeClassifier;

use super::read_document;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input file (text, CSV or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Print the classification as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = read_document(&args.input)?;
    let filename = args.input.file_name().and_then(|n| n.to_str());
    let result = DocumentTypeClassifier::new().classify(&text, filename);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {} (confidence {:.2})",
        style("ℹ").blue(),
        style(result.document_type).bold(),
        result.confidence
    );
    println!("  {}", result.reasoning);
    if !result.key_indicators.is_empty() {
        println!("  Indicators: {}", result.key_indicators.join(", "));
    }
    if result.potential_misclassification {
        println!("  {}", style("Low confidence, classification may be wrong").yellow());
    }

    Ok(())
}

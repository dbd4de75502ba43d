//! Process command - extract records from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fintab_core::{DocumentProcessor, DocumentReport};

use super::{load_config, read_document};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (text, CSV or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON report
    Json,
    /// One CSV row per record
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading document...");
    let text = read_document(&args.input)?;

    pb.set_message("Extracting records...");
    let processor = DocumentProcessor::from_config(&config)?;
    let filename = args.input.file_name().and_then(|n| n.to_str());
    let report = processor.process(&text, filename);

    pb.finish_and_clear();

    let output = format_report(&report, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Classification: {} ({:.1}%)",
            style("ℹ").blue(),
            report.classification.document_type,
            report.classification.confidence * 100.0
        );
        println!(
            "{} Extraction confidence: {:.1}% over {} records",
            style("ℹ").blue(),
            report.extraction.extraction_confidence * 100.0,
            report.extraction.total_records
        );
        if report.classification.potential_misclassification {
            println!("{} Document type may be misclassified", style("!").yellow());
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_report(report: &DocumentReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

/// Column names in the detected header order, then any other record keys.
fn record_columns(report: &DocumentReport) -> Vec<String> {
    let mut columns = report.extraction.schema_detected.columns.clone();
    for record in &report.extraction.records {
        for key in record.data.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn format_csv(report: &DocumentReport) -> anyhow::Result<String> {
    let columns = record_columns(report);
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["id".to_string(), "row_index".to_string()];
    header.extend(columns.iter().cloned());
    header.push("confidence".to_string());
    wtr.write_record(&header)?;

    for record in &report.extraction.records {
        let mut row = vec![record.id.clone(), record.row_index.to_string()];
        for column in &columns {
            row.push(record.get(column).unwrap_or_default().to_string());
        }
        row.push(format!("{:.2}", record.confidence));
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &DocumentReport) -> String {
    let classification = &report.classification;
    let extraction = &report.extraction;
    let mut output = String::new();

    output.push_str(&format!(
        "Document type: {} (confidence {:.2})\n",
        classification.document_type, classification.confidence
    ));
    if !classification.key_indicators.is_empty() {
        output.push_str(&format!(
            "Indicators: {}\n",
            classification.key_indicators.join(", ")
        ));
    }
    output.push('\n');

    output.push_str(&format!("Format: {}\n", extraction.schema_detected.format));
    if let Some(headers) = &extraction.schema_detected.headers {
        output.push_str(&format!("Columns: {}\n", headers));
    }
    output.push_str(&format!(
        "Records: {} (confidence {:.2})\n",
        extraction.total_records, extraction.extraction_confidence
    ));
    output.push('\n');

    for record in &extraction.records {
        let cells: Vec<String> = record
            .data
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.as_deref().unwrap_or("-")))
            .collect();
        output.push_str(&format!("  [{}] {}\n", record.row_index, cells.join("  ")));
    }

    if !extraction.processing_notes.is_empty() {
        output.push_str("\nNotes:\n");
        for note in &extraction.processing_notes {
            output.push_str(&format!("  - {}\n", note));
        }
    }

    output
}

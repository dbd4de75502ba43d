//! Command-line tests for the `fintab` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STATEMENT: &str = "ACME BANK
Statement of Account

Date Description Reference Debit Credit Balance
01/01/2025  Opening Balance  OB001  50,000.00
01/02/2025  Office Rent Payment  CHQ001  15,000.00  35,000.00
01/03/2025  Client Payment Received  DEP001  25,000.00  60,000.00
";

fn fintab() -> Command {
    Command::cargo_bin("fintab").unwrap()
}

fn write_statement(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, STATEMENT).unwrap();
    path
}

#[test]
fn test_process_prints_json_report() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(dir.path(), "march.txt");

    fintab()
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"document_type\": \"bank_statement\""))
        .stdout(predicate::str::contains("\"total_records\": 3"))
        .stdout(predicate::str::contains("\"format\": \"detected_table\""));
}

#[test]
fn test_process_csv_output() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(dir.path(), "march.txt");

    fintab()
        .args(["process", "-f", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "id,row_index,Date,Description,Reference,Debit Amount,Credit Amount,Balance,confidence",
        ))
        .stdout(predicate::str::contains(
            "tbl-00001,1,01/02/2025,Office Rent Payment,CHQ001,\"15,000.00\",,\"35,000.00\",0.85",
        ));
}

#[test]
fn test_process_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(dir.path(), "march.txt");
    let output = dir.path().join("out.txt");

    fintab()
        .args(["process", "-f", "text", "--show-confidence", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"))
        .stdout(predicate::str::contains("Extraction confidence: 85.0% over 3 records"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("Document type: bank_statement"));
    assert!(written.contains("Records: 3 (confidence 0.85)"));
}

#[test]
fn test_process_missing_file() {
    fintab()
        .args(["process", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scan.png");
    fs::write(&input, [0u8, 1, 2]).unwrap();

    fintab()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: png"));
}

#[test]
fn test_classify_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, "Tax Invoice\nCustomer: Acme Traders\nGST 18%\n").unwrap();

    fintab()
        .args(["classify", "--json"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"document_type\": \"sales_register\""))
        .stdout(predicate::str::contains("bank_statement").not());
}

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    fintab()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    fintab()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "detection.min_table_lines"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));

    fintab()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.enable_delimited", "false"])
        .assert()
        .success();

    fintab()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "extraction.enable_delimited"])
        .assert()
        .success()
        .stdout(predicate::str::diff("false\n"));
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    fintab()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "mapping.inference_threshold", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mapping.inference_threshold"));

    fintab()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "mapping.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_disables_delimited_parsing() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let input = dir.path().join("export.csv");
    fs::write(&input, "Date,Description,Amount\n01/02/2025,Rent,1200.00\n").unwrap();

    fintab()
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"format\": \"delimited_text\""));

    fintab()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.enable_delimited", "false"])
        .assert()
        .success();

    fintab()
        .arg("-c")
        .arg(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("delimited_text").not());
}

#[test]
fn test_batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    write_statement(dir.path(), "jan.txt");
    write_statement(dir.path(), "feb.txt");
    fs::write(dir.path().join("notes.txt"), "Hello world\nJust some notes\n").unwrap();
    let out = dir.path().join("out");
    let pattern = format!("{}/*.txt", dir.path().display());

    fintab()
        .args(["batch", "--summary", "-j", "2", "-o"])
        .arg(&out)
        .arg(&pattern)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files to process"));

    assert!(out.join("jan.json").exists());
    assert!(out.join("feb.json").exists());
    assert!(out.join("notes.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("filename,status,document_type"));
    assert!(lines[1].starts_with("feb.txt,success,bank_statement"));
    assert!(lines[2].starts_with("jan.txt,success,bank_statement"));
    assert!(lines[3].starts_with("notes.txt,success,other,0.00,line_scan,0,0.20"));
}

#[test]
fn test_batch_without_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    fintab()
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

//! Table boundary detection over linearized text.

use std::collections::HashMap;

use tracing::debug;

use crate::models::config::DetectionConfig;
use crate::models::region::{SeparatorStyle, TableRegion, TableType};
use crate::rules::patterns::KEY_VALUE_LINE;
use crate::rules::{has_amount, has_date, header_keyword_count};

/// Scanner state while walking the lines.
enum ScanState {
    OutsideTable,
    InTable { start: usize, lines: Vec<String> },
}

/// Segments text into candidate table regions.
#[derive(Debug, Clone)]
pub struct TableBoundaryDetector {
    min_table_lines: usize,
    min_header_keywords: usize,
}

impl TableBoundaryDetector {
    pub fn new() -> Self {
        Self::from_config(&DetectionConfig::default())
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            min_table_lines: config.min_table_lines,
            min_header_keywords: config.min_header_keywords,
        }
    }

    /// Find all table regions in document order.
    pub fn detect(&self, text: &str) -> Vec<TableRegion> {
        let mut regions = Vec::new();
        let mut state = ScanState::OutsideTable;

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                if let ScanState::InTable { start, lines } =
                    std::mem::replace(&mut state, ScanState::OutsideTable)
                {
                    self.close_region(start, lines, &mut regions);
                }
                continue;
            }

            match &mut state {
                ScanState::InTable { lines, .. } => lines.push(line.to_string()),
                ScanState::OutsideTable => {
                    if looks_like_table_data(line)
                        || header_keyword_count(line) >= self.min_header_keywords
                    {
                        state = ScanState::InTable {
                            start: idx,
                            lines: vec![line.to_string()],
                        };
                    }
                }
            }
        }

        if let ScanState::InTable { start, lines } = state {
            self.close_region(start, lines, &mut regions);
        }

        debug!("Detected {} table regions", regions.len());
        regions
    }

    fn close_region(&self, start: usize, lines: Vec<String>, regions: &mut Vec<TableRegion>) {
        if lines.len() < self.min_table_lines {
            debug!(
                "Dropping {}-line block at line {} (minimum {})",
                lines.len(),
                start + 1,
                self.min_table_lines
            );
            return;
        }

        let separator = separator_style(&lines);
        let table_type = if is_key_value_block(&lines) {
            TableType::KeyValue
        } else {
            TableType::from(separator)
        };

        let region = TableRegion {
            start_line: start,
            end_line: start + lines.len() - 1,
            confidence: structural_confidence(&lines),
            separator,
            table_type,
            lines,
        };

        debug!(
            "Region lines {} confidence {:.2} ({})",
            region.span_label(),
            region.confidence,
            region.separator.as_str()
        );
        regions.push(region);
    }
}

impl Default for TableBoundaryDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the most confident region; the earliest wins ties.
pub fn best_region(regions: &[TableRegion]) -> Option<&TableRegion> {
    let mut best: Option<&TableRegion> = None;
    for region in regions {
        if best.is_none_or(|b| region.confidence > b.confidence) {
            best = Some(region);
        }
    }
    best
}

/// Whether a single line looks like a table row.
pub fn looks_like_table_data(line: &str) -> bool {
    let amount = has_amount(line);

    (has_date(line) && amount)
        || line.contains('\t')
        || (line.split_whitespace().count() >= 3 && amount)
}

/// `0.4 * date ratio + 0.4 * amount ratio + 0.2 * token count consistency`.
fn structural_confidence(lines: &[String]) -> f32 {
    if lines.is_empty() {
        return 0.0;
    }
    let total = lines.len() as f32;

    let date_lines = lines.iter().filter(|l| has_date(l)).count() as f32;
    let amount_lines = lines.iter().filter(|l| has_amount(l)).count() as f32;

    let mut token_counts: HashMap<usize, usize> = HashMap::new();
    for line in lines {
        *token_counts.entry(line.split_whitespace().count()).or_default() += 1;
    }
    let most_common = token_counts.values().copied().max().unwrap_or(0) as f32;

    let confidence =
        0.4 * (date_lines / total) + 0.4 * (amount_lines / total) + 0.2 * (most_common / total);
    confidence.clamp(0.0, 1.0)
}

fn separator_style(lines: &[String]) -> SeparatorStyle {
    let tabbed = lines.iter().filter(|l| l.contains('\t')).count();

    if tabbed * 2 > lines.len() {
        SeparatorStyle::TabSeparated
    } else if is_fixed_width(lines) {
        SeparatorStyle::FixedWidth
    } else {
        SeparatorStyle::SpaceSeparated
    }
}

// TODO: detect fixed-width layouts from gap columns shared by every row.
fn is_fixed_width(_lines: &[String]) -> bool {
    false
}

fn is_key_value_block(lines: &[String]) -> bool {
    let pairs = lines.iter().filter(|l| KEY_VALUE_LINE.is_match(l)).count();
    pairs * 2 > lines.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "Date Description Reference Debit Credit Balance
01/02/2025  Office Rent Payment  CHQ001  15,000.00  35,000.00
01/03/2025  Client Payment Received  DEP001  25,000.00  60,000.00";

    #[test]
    fn test_detects_statement_region() {
        let regions = TableBoundaryDetector::new().detect(STATEMENT);

        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert_eq!(region.start_line, 0);
        assert_eq!(region.end_line, 2);
        assert!(region.confidence > 0.6, "confidence {}", region.confidence);
        assert_eq!(region.separator, SeparatorStyle::SpaceSeparated);
        assert_eq!(region.table_type, TableType::SemiStructured);
    }

    #[test]
    fn test_blank_line_closes_region() {
        let text = "Account Statement
01/01/2025  Opening  100.00
01/02/2025  Fee  10.00
01/03/2025  Fee  10.00

Notes follow here
02/01/2025  Interest  1.00
02/02/2025  Interest  1.00
02/03/2025  Interest  1.00
02/04/2025  Interest  1.00";
        let regions = TableBoundaryDetector::new().detect(text);

        assert_eq!(regions.len(), 2);
        assert_eq!((regions[0].start_line, regions[0].end_line), (1, 3));
        assert_eq!((regions[1].start_line, regions[1].end_line), (6, 9));
        assert!(regions[0].end_line < regions[1].start_line);
    }

    #[test]
    fn test_short_blocks_are_dropped() {
        let text = "01/01/2025  Opening  100.00\n01/02/2025  Fee  10.00\n\nThe end";
        assert!(TableBoundaryDetector::new().detect(text).is_empty());
    }

    #[test]
    fn test_noisy_rows_stay_in_region() {
        let text = "01/01/2025  Opening  100.00
carried forward from page 1
01/02/2025  Fee  10.00";
        let regions = TableBoundaryDetector::new().detect(text);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 3);
    }

    #[test]
    fn test_prose_does_not_open_region() {
        let text = "Hello world\nJust some notes\nNothing tabular here";
        assert!(TableBoundaryDetector::new().detect(text).is_empty());
    }

    #[test]
    fn test_tab_separated_region() {
        let text = "Date\tDescription\tAmount\n01/02/2025\tRent\t100.00\n01/03/2025\tFee\t5.00";
        let regions = TableBoundaryDetector::new().detect(text);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].separator, SeparatorStyle::TabSeparated);
        assert_eq!(regions[0].table_type, TableType::Structured);
    }

    #[test]
    fn test_integer_amount_rows_form_region() {
        let text = "01/02/2025  Rent  500\n02/02/2025  Fee  15\n03/02/2025  Salary  25000";
        let regions = TableBoundaryDetector::new().detect(text);

        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].start_line, regions[0].end_line), (0, 2));
        assert!(regions[0].confidence > 0.9, "confidence {}", regions[0].confidence);
    }

    #[test]
    fn test_year_and_code_numbers_do_not_open_region() {
        let text = "Statement for January 2025\nInvoice No INV-204 issued\nGST rate 18% applies";
        assert!(TableBoundaryDetector::new().detect(text).is_empty());
    }

    #[test]
    fn test_key_value_region() {
        let text = "Invoice Date: 01/02/2025 total 1,000.00
Customer: Acme Traders
Tax Amount: 180.00";
        let regions = TableBoundaryDetector::new().detect(text);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].table_type, TableType::KeyValue);
    }

    #[test]
    fn test_three_dated_amount_lines_are_confident() {
        let text = "Statement for January
opening remarks without numbers
01/01/2025 A 1.00
02/01/2025 Bb 22.50
03/01/2025 Ccc 333.75";
        let regions = TableBoundaryDetector::new().detect(text);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].start_line, 2);
        assert!(regions[0].confidence >= 0.5);
    }

    #[test]
    fn test_best_region_prefers_first_on_tie() {
        let text = "01/01/2025 A 1.00\n01/02/2025 B 2.00\n01/03/2025 C 3.00\n\n01/04/2025 D 4.00\n01/05/2025 E 5.00\n01/06/2025 F 6.00";
        let regions = TableBoundaryDetector::new().detect(text);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].confidence, regions[1].confidence);
        assert_eq!(best_region(&regions).unwrap().start_line, 0);
    }
}

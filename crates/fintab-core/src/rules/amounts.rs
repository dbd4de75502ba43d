//! Amount detection and normalization.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{find_amounts, NUMERIC_TOKEN};
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
///
/// Dates are masked before matching so `01.02.2025` never yields `01.02`,
/// and years or code numbers are not read as integer amounts.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        find_amounts(text)
            .into_iter()
            .filter_map(|(start, end)| {
                let raw = &text[start..end];
                parse_amount_token(raw)
                    .map(|amount| ExtractionMatch::new(amount, 0.8, raw).with_position(start, end))
            })
            .collect()
    }
}

/// Parse a token that is purely numeric once grouping commas are removed.
///
/// `15,000.00` and `-250` parse; `CHQ001`, `12%` and `1.2.3` do not.
pub fn parse_amount_token(token: &str) -> Option<Decimal> {
    let cleaned = token.trim().replace(',', "");
    if !NUMERIC_TOKEN.is_match(&cleaned) {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Strip a money value down to digits, grouping commas and one decimal point.
///
/// Returns `None` when no digit survives.
pub fn normalize_amount(value: &str) -> Option<String> {
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    // Currency prefixes such as "Rs." leave stray leading points behind.
    let kept = kept.trim_matches(|c| c == ',' || c == '.');

    let normalized = match kept.rfind('.') {
        Some(last_dot) => {
            let (integer, fraction) = kept.split_at(last_dot);
            format!("{}{}", integer.replace('.', ""), fraction)
        }
        None => kept.to_string(),
    };

    if normalized.chars().any(|c| c.is_ascii_digit()) {
        Some(normalized)
    } else {
        None
    }
}

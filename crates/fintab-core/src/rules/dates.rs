//! Date detection and parsing.

use chrono::NaiveDate;

use super::patterns::DATE_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// Formats tried in order; statements are read day-first.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d %b %Y",
    "%d-%b-%Y", "%d %B %Y", "%d-%B-%Y", "%d %b, %Y",
];

const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%d-%b-%y", "%d %b %y"];

/// Date field extractor.
///
/// Yields the date text as written; use [`parse_date`] for a calendar value.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_PATTERN
            .find_iter(text)
            .map(|m| {
                let confidence = if parse_date(m.as_str()).is_some() { 0.9 } else { 0.5 };
                ExtractionMatch::new(m.as_str().to_string(), confidence, m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Byte offset just past a date that opens the line (after leading spaces).
pub fn leading_date_end(line: &str) -> Option<usize> {
    let offset = line.len() - line.trim_start().len();
    DATE_PATTERN
        .find(&line[offset..])
        .filter(|m| m.start() == 0)
        .map(|m| offset + m.end())
}

/// Parse a date token into a calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    // chrono reads "25" for %Y as the year 25, so pick the table up front
    let trailing_digits = s.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    let leading_digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    let formats = if leading_digits < 4 && trailing_digits <= 2 {
        SHORT_YEAR_FORMATS
    } else {
        DATE_FORMATS
    };

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

//! Common regex patterns for financial statement lines.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Dates: 01/02/2025, 01-02-25, 01.02.2025, 2025-02-01, 01 Jan 2025, 01-Jan-25
    pub static ref DATE_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:\d{1,2}[/\-.]\d{1,2}[/\-.](?:\d{4}|\d{2})|\d{4}[/\-.]\d{1,2}[/\-.]\d{1,2}|\d{1,2}[\s\-](?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*[\s\-,]+(?:\d{4}|\d{2}))\b"
    ).unwrap();

    // Amounts: 15,000.00 / 1,50,000 / 250.5 / 25000 (bare integers need two digits)
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"\b(?:\d{1,3}(?:,\d{2,3})+(?:\.\d{1,2})?|\d+\.\d{1,2}|\d{2,})\b"
    ).unwrap();

    // A whole token that is a number once grouping commas are removed
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(
        r"^-?\d+(?:\.\d+)?$"
    ).unwrap();

    // Transaction reference codes: CHQ001, DEP-12, OB001, NEFT/8812
    pub static ref REFERENCE_CODE: Regex = Regex::new(
        r"^[A-Za-z]{1,6}[-/]?\d+[A-Za-z0-9]*$"
    ).unwrap();

    // Column gaps in space-aligned text
    pub static ref MULTI_SPACE: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();

    // Label/value lines: "Account Holder: ACME Ltd"
    pub static ref KEY_VALUE_LINE: Regex = Regex::new(
        r"^\s*[A-Za-z][A-Za-z0-9 ./()&\-]{0,39}:\s*\S"
    ).unwrap();
}

/// Whether the line contains a date.
pub fn has_date(line: &str) -> bool {
    DATE_PATTERN.is_match(line)
}

/// Whether the line contains a money amount outside of any date.
pub fn has_amount(line: &str) -> bool {
    !find_amounts(line).is_empty()
}

/// Byte spans of the money amounts in a line, dates excluded.
///
/// Bare integers are dropped when they read as a year (`2025`), a
/// percentage (`18%`), part of a code (`INV-204`, `NEFT/8812`), a time
/// (`10:30`) or part of a longer dotted number.
pub fn find_amounts(line: &str) -> Vec<(usize, usize)> {
    let masked = mask_dates(line);

    AMOUNT_PATTERN
        .find_iter(&masked)
        .filter(|m| is_amount_match(masked.as_bytes(), m.start(), m.end()))
        .map(|m| (m.start(), m.end()))
        .collect()
}

fn is_amount_match(bytes: &[u8], start: usize, end: usize) -> bool {
    let token = &bytes[start..end];
    if token.iter().any(|b| *b == b',' || *b == b'.') {
        return true;
    }

    if token.len() == 4 && (token.starts_with(b"19") || token.starts_with(b"20")) {
        return false;
    }

    let before = start.checked_sub(1).map(|i| bytes[i]);
    let before_that = start.checked_sub(2).map(|i| bytes[i]);
    let after = bytes.get(end).copied();
    let after_that = bytes.get(end + 1).copied();

    if after == Some(b'%') {
        return false;
    }

    let joined_before = matches!(before, Some(b'-' | b'/' | b':'))
        && before_that.is_some_and(|b| b.is_ascii_alphanumeric());
    let joined_after = matches!(after, Some(b'-' | b'/' | b':'))
        && after_that.is_some_and(|b| b.is_ascii_alphanumeric());
    let dotted = (before == Some(b'.') && before_that.is_some_and(|b| b.is_ascii_digit()))
        || (after == Some(b'.') && after_that.is_some_and(|b| b.is_ascii_digit()));

    !(joined_before || joined_after || dotted)
}

/// Replace every date with spaces of the same byte length.
///
/// Offsets into the returned string stay valid for the original line, so
/// amount matches can be mapped back without dotted dates being read as
/// decimals.
pub fn mask_dates(line: &str) -> String {
    let mut masked = String::with_capacity(line.len());
    let mut last = 0;

    for m in DATE_PATTERN.find_iter(line) {
        masked.push_str(&line[last..m.start()]);
        masked.push_str(&" ".repeat(m.len()));
        last = m.end();
    }
    masked.push_str(&line[last..]);

    masked
}

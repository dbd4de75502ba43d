//! Splitting of header and data lines into column values.

use tracing::trace;

use crate::models::record::FieldType;
use crate::rules::keywords::{CREDIT_KEYWORDS, DEBIT_KEYWORDS, REFERENCE_PREFIXES};
use crate::rules::patterns::{MULTI_SPACE, REFERENCE_CODE};
use crate::rules::{leading_date_end, parse_amount_token, EntrySide};

/// Split a header-style line: tab, pipe, whitespace runs, single spaces.
///
/// Tokens are trimmed and empty tokens dropped.
pub fn split_columns(line: &str) -> Vec<String> {
    let parts: Vec<&str> = if line.contains('\t') {
        line.split('\t').collect()
    } else if line.contains('|') {
        line.split('|').collect()
    } else {
        let wide: Vec<&str> = MULTI_SPACE.split(line.trim()).collect();
        if wide.len() == 1 {
            line.split_whitespace().collect()
        } else {
            wide
        }
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on runs of two or more spaces, or on single spaces when that
/// yields fewer than two tokens. Second value tells which split was used.
fn natural_split(text: &str) -> (Vec<String>, bool) {
    let wide: Vec<String> = MULTI_SPACE
        .split(text.trim())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if wide.len() >= 2 {
        (wide, true)
    } else {
        (text.split_whitespace().map(str::to_string).collect(), false)
    }
}

/// Pieces of a transaction row recovered by amount-aware reconstruction.
#[derive(Debug, Clone, PartialEq)]
struct TransactionParts {
    date: String,
    description: String,
    reference: Option<String>,
    amount: Option<String>,
    side: EntrySide,
    balance: Option<String>,
}

/// Splits data lines into a fixed number of column values.
///
/// The column layout (one field type per column) lets transaction rows be
/// rebuilt by meaning rather than by position when the line has no
/// reliable separators.
#[derive(Debug, Clone, Default)]
pub struct LineColumnSplitter;

impl LineColumnSplitter {
    pub fn new() -> Self {
        Self
    }

    /// Split `line` into exactly `layout.len()` trimmed values.
    pub fn split(&self, line: &str, layout: &[FieldType]) -> Vec<String> {
        let expected = layout.len();

        if line.contains('\t') {
            let values = line.split('\t').map(|v| v.trim().to_string()).collect();
            return fit(values, expected);
        }

        if line.contains('|') {
            let mut values: Vec<String> = line.split('|').map(|v| v.trim().to_string()).collect();
            if values.first().is_some_and(|v| v.is_empty()) {
                values.remove(0);
            }
            if values.last().is_some_and(|v| v.is_empty()) {
                values.pop();
            }
            return fit(values, expected);
        }

        match self.reconstruct(line, layout) {
            Some(values) => fit(values, expected),
            None => fit(natural_split(line).0, expected),
        }
    }

    /// Rebuild a date-led transaction row around its numeric tokens.
    fn reconstruct(&self, line: &str, layout: &[FieldType]) -> Option<Vec<String>> {
        let has_money_slot = layout.iter().any(|t| t.is_monetary());
        if !layout.contains(&FieldType::Date) || !has_money_slot {
            return None;
        }

        let date_end = leading_date_end(line)?;
        let (rest, columnar) = natural_split(&line[date_end..]);
        // Without a reference column a trailing text group stays in the description
        let columnar = columnar && layout.contains(&FieldType::Reference);

        let mut tokens = Vec::with_capacity(rest.len() + 1);
        tokens.push(line[..date_end].trim().to_string());
        tokens.extend(rest);

        if tokens.len() < 4 {
            return None;
        }

        let candidates: Vec<usize> = (1..tokens.len())
            .filter(|&i| parse_amount_token(&tokens[i]).is_some())
            .collect();

        let parts = match candidates.as_slice() {
            [only] => {
                let only = *only;
                let middle = &tokens[1..only];
                let (description, reference) = describe(middle, &tokens[only + 1..], columnar);

                if only == tokens.len() - 1 {
                    // Sole trailing number: a running balance, nothing to classify
                    TransactionParts {
                        date: tokens[0].clone(),
                        description,
                        reference,
                        amount: None,
                        side: EntrySide::BalanceOnly,
                        balance: Some(tokens[only].clone()),
                    }
                } else {
                    let side = decide_side(reference.as_deref(), &description);
                    let (amount, balance) = match side {
                        EntrySide::BalanceOnly => (None, Some(tokens[only].clone())),
                        _ => (Some(tokens[only].clone()), None),
                    };
                    TransactionParts {
                        date: tokens[0].clone(),
                        description,
                        reference,
                        amount,
                        side,
                        balance,
                    }
                }
            }
            [first, second] => {
                let (first, second) = (*first, *second);
                let trailing: Vec<String> = tokens[first + 1..second]
                    .iter()
                    .chain(&tokens[second + 1..])
                    .cloned()
                    .collect();
                let (description, reference) = describe(&tokens[1..first], &trailing, columnar);
                let side = decide_side(reference.as_deref(), &description);
                let amount = match side {
                    EntrySide::BalanceOnly => None,
                    _ => Some(tokens[first].clone()),
                };

                TransactionParts {
                    date: tokens[0].clone(),
                    description,
                    reference,
                    amount,
                    side,
                    balance: Some(tokens[second].clone()),
                }
            }
            _ => {
                trace!("{} amount candidates, keeping positional split", candidates.len());
                return Some(tokens);
            }
        };

        trace!("Reconstructed row {:?}", parts);
        Some(place(parts, layout))
    }
}

/// Separate the text between date and amounts into description and reference.
fn describe(middle: &[String], trailing: &[String], columnar: bool) -> (String, Option<String>) {
    let mut words: Vec<String> = middle.to_vec();

    let reference_at = words
        .iter()
        .rposition(|w| REFERENCE_CODE.is_match(w))
        .or_else(|| (columnar && words.len() >= 2).then(|| words.len() - 1));
    let reference = reference_at.map(|i| words.remove(i));

    words.extend(trailing.iter().cloned());
    (words.join(" "), reference)
}

/// Decide the ledger side of a transaction amount.
///
/// Reference prefix first, then description keywords (credit words before
/// debit words), then debit. Rows whose prefix and description both miss
/// the tables are booked as debits even when they are deposits.
fn decide_side(reference: Option<&str>, description: &str) -> EntrySide {
    if let Some(reference) = reference {
        let upper = reference.to_uppercase();
        if let Some((_, side)) = REFERENCE_PREFIXES
            .iter()
            .find(|(prefix, _)| upper.starts_with(prefix))
        {
            return *side;
        }
    }

    let lower = description.to_lowercase();
    if CREDIT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return EntrySide::Credit;
    }
    if DEBIT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return EntrySide::Debit;
    }

    EntrySide::Debit
}

/// Lay transaction parts out in column order.
fn place(parts: TransactionParts, layout: &[FieldType]) -> Vec<String> {
    let has_side_columns = layout.contains(&FieldType::Debit) || layout.contains(&FieldType::Credit);
    let wanted = match parts.side {
        EntrySide::Debit => FieldType::Debit,
        EntrySide::Credit => FieldType::Credit,
        EntrySide::BalanceOnly => FieldType::Balance,
    };
    let amount_column = if has_side_columns && layout.contains(&wanted) {
        wanted
    } else {
        FieldType::Amount
    };

    let description = match (&parts.reference, layout.contains(&FieldType::Reference)) {
        (Some(reference), false) => format!("{} {}", parts.description, reference)
            .trim()
            .to_string(),
        _ => parts.description.clone(),
    };

    let mut placed_date = false;
    layout
        .iter()
        .map(|field| match field {
            FieldType::Date if !placed_date => {
                placed_date = true;
                parts.date.clone()
            }
            FieldType::Description => description.clone(),
            FieldType::Reference => parts.reference.clone().unwrap_or_default(),
            FieldType::Balance => parts.balance.clone().unwrap_or_default(),
            f if *f == amount_column => parts.amount.clone().unwrap_or_default(),
            _ => String::new(),
        })
        .collect()
}

/// Pad with empty strings or truncate to the expected column count.
fn fit(mut values: Vec<String>, expected: usize) -> Vec<String> {
    values.truncate(expected);
    values.resize(expected, String::new());
    values
}

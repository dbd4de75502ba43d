//! Fixed keyword and prefix tables.

use crate::models::record::FieldType;

/// Words that mark a line as a table header.
pub const HEADER_KEYWORDS: &[&str] = &[
    "date",
    "description",
    "amount",
    "debit",
    "credit",
    "balance",
    "reference",
    "invoice",
    "customer",
    "vendor",
    "tax",
];

/// Header words per field type, checked top to bottom.
///
/// Specific money columns come before the generic amount words so that
/// "Debit Amount" and "Closing Balance" keep their meaning, and dates come
/// before amounts so that "Value Date" stays a date.
pub const FIELD_KEYWORDS: &[(FieldType, &[&str])] = &[
    (FieldType::Debit, &["debit", "dr", "withdrawal", "expense"]),
    (FieldType::Credit, &["credit", "cr", "deposit", "income"]),
    (FieldType::Balance, &["balance", "bal", "closing"]),
    (FieldType::Date, &["date", "dt", "time"]),
    (FieldType::Tax, &["tax", "gst", "vat", "cgst", "sgst", "igst"]),
    (FieldType::Amount, &["amount", "amt", "value", "total"]),
    (FieldType::Reference, &["reference", "ref", "cheque", "chq", "txn"]),
    (FieldType::InvoiceNumber, &["invoice", "bill", "voucher"]),
    (FieldType::Account, &["account", "acct"]),
    (FieldType::Customer, &["customer", "client", "party"]),
    (FieldType::Vendor, &["vendor", "supplier"]),
    (FieldType::Description, &["description", "desc", "particulars", "narration"]),
];

/// Description words suggesting money leaving the account.
pub const DEBIT_KEYWORDS: &[&str] = &[
    "payment",
    "withdrawal",
    "purchase",
    "rent",
    "paid",
    "transfer to",
    "atm",
    "fee",
    "charge",
    "emi",
    "expense",
    "debit",
    "utility",
];

/// Description words suggesting money entering the account.
pub const CREDIT_KEYWORDS: &[&str] = &[
    "received",
    "deposit",
    "refund",
    "interest",
    "transfer from",
    "credit",
    "income",
    "receipt",
    "salary credit",
    "cashback",
];

/// Which side of the ledger a transaction amount belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySide {
    Debit,
    Credit,
    /// The amount is a balance; neither debit nor credit is set.
    BalanceOnly,
}

/// Reference code prefixes with a known ledger side.
pub const REFERENCE_PREFIXES: &[(&str, EntrySide)] = &[
    ("DEP", EntrySide::Credit),
    ("CHQ", EntrySide::Debit),
    ("AUTO", EntrySide::Debit),
    ("OB", EntrySide::BalanceOnly),
];

/// Cell values that mean "no value".
pub const NULL_MARKERS: &[&str] = &["", "-", "nil", "null"];

/// Number of header keywords contained in the line.
pub fn header_keyword_count(line: &str) -> usize {
    let lower = line.to_lowercase();
    HEADER_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count()
}

/// Whether a cell holds one of the null markers.
pub fn is_null_marker(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    NULL_MARKERS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_keyword_count() {
        assert_eq!(
            header_keyword_count("Date Description Reference Debit Credit Balance"),
            6
        );
        assert_eq!(header_keyword_count("01/02/2025  Rent  15,000.00"), 0);
    }

    #[test]
    fn test_null_markers() {
        assert!(is_null_marker(" - "));
        assert!(is_null_marker("NIL"));
        assert!(is_null_marker("Null"));
        assert!(is_null_marker(""));
        assert!(!is_null_marker("0.00"));
    }
}

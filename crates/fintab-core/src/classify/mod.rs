//! Keyword-based document type classification.
//!
//! The result is advisory: it is reported alongside the extraction but never
//! changes which extraction strategy runs.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coarse category of a financial document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    BankStatement,
    Invoice,
    SalesRegister,
    PurchaseRegister,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankStatement => "bank_statement",
            Self::Invoice => "invoice",
            Self::SalesRegister => "sales_register",
            Self::PurchaseRegister => "purchase_register",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicator keywords per category, in tie-break order.
const CATEGORY_KEYWORDS: &[(DocumentType, &[&str])] = &[
    (
        DocumentType::BankStatement,
        &[
            "transaction",
            "debit",
            "credit",
            "balance",
            "bank",
            "statement",
            "account",
            "withdrawal",
            "deposit",
        ],
    ),
    (
        DocumentType::Invoice,
        &["invoice", "bill to", "due date", "tax", "subtotal", "total due", "gstin", "hsn"],
    ),
    (
        DocumentType::SalesRegister,
        &["invoice", "customer", "sales", "gst", "cgst", "sgst", "bill"],
    ),
    (
        DocumentType::PurchaseRegister,
        &["purchase", "vendor", "supplier", "purchase order", "tds", "payable"],
    ),
];

/// Outcome of document classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Best matching category.
    pub document_type: DocumentType,
    /// `min(score / 10, 1.0)` of the winning category.
    pub confidence: f32,
    /// Short explanation of the decision.
    pub reasoning: String,
    /// Keywords of the winning category found in the text or filename.
    pub key_indicators: Vec<String>,
    /// Set when the confidence is below 0.8.
    pub potential_misclassification: bool,
}

/// Scores text against fixed keyword lists.
#[derive(Debug, Clone, Default)]
pub struct DocumentTypeClassifier;

impl DocumentTypeClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify document text, counting keyword hits in the filename too.
    pub fn classify(&self, text: &str, filename: Option<&str>) -> ClassificationResult {
        let text = text.to_lowercase();
        let filename = filename.map(str::to_lowercase).unwrap_or_default();

        let mut best: Option<(DocumentType, usize, Vec<String>)> = None;

        for (category, keywords) in CATEGORY_KEYWORDS {
            let mut score = 0;
            let mut indicators = Vec::new();

            for kw in keywords.iter() {
                let hits = text.matches(kw).count() + filename.matches(kw).count();
                if hits > 0 {
                    score += hits;
                    indicators.push((*kw).to_string());
                }
            }

            debug!("Category {} scored {}", category, score);

            // Strictly greater keeps the earliest category on ties
            if best.as_ref().is_none_or(|(_, top, _)| score > *top) {
                best = Some((*category, score, indicators));
            }
        }

        match best {
            Some((document_type, score, key_indicators)) if score > 0 => {
                let confidence = (score as f32 / 10.0).min(1.0);
                ClassificationResult {
                    document_type,
                    confidence,
                    reasoning: format!(
                        "Keyword scan found {} indicator hits for {}",
                        score, document_type
                    ),
                    key_indicators,
                    potential_misclassification: confidence < 0.8,
                }
            }
            _ => ClassificationResult {
                document_type: DocumentType::Other,
                confidence: 0.0,
                reasoning: "No financial document indicators found".to_string(),
                key_indicators: Vec::new(),
                potential_misclassification: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_statement() {
        let text = "ACME BANK\nAccount Statement\nDate Description Debit Credit Balance";
        let result = DocumentTypeClassifier::new().classify(text, None);

        assert_eq!(result.document_type, DocumentType::BankStatement);
        // bank, account, statement, debit, credit, balance
        assert_eq!(result.confidence, 0.6);
        assert!(result.key_indicators.contains(&"balance".to_string()));
    }

    #[test]
    fn test_confidence_caps_at_one() {
        let text = "balance ".repeat(20);
        let result = DocumentTypeClassifier::new().classify(&text, None);

        assert_eq!(result.confidence, 1.0);
        assert!(!result.potential_misclassification);
    }

    #[test]
    fn test_filename_contributes() {
        let result = DocumentTypeClassifier::new().classify("", Some("purchase_register_q1.pdf"));

        assert_eq!(result.document_type, DocumentType::PurchaseRegister);
        assert_eq!(result.confidence, 0.1);
    }

    #[test]
    fn test_no_indicators_is_other() {
        let result = DocumentTypeClassifier::new().classify("Hello world", None);

        assert_eq!(result.document_type, DocumentType::Other);
        assert_eq!(result.confidence, 0.0);
        assert!(result.key_indicators.is_empty());
    }

    #[test]
    fn test_tie_goes_to_first_category() {
        // "invoice" scores once for invoice and once for sales_register
        let result = DocumentTypeClassifier::new().classify("invoice", None);

        assert_eq!(result.document_type, DocumentType::Invoice);
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::DocumentType;

const BANK_INDICATORS: &[&str] = &[
    "transaction",
    "debit",
    "credit",
    "balance",
    "bank",
    "statement",
    "account",
];
const SALES_INDICATORS: &[&str] = &[
    "invoice", "customer", "sales", "gst", "cgst", "sgst", "bill",
];
const PURCHASE_INDICATORS: &[&str] = &[
    "purchase", "vendor", "supplier", "po", "tds", "payable",
];

/// Outcome of keyword-based document classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub document_type: DocumentType,
    /// 0-1, scaled by how many indicators matched
    pub confidence: f64,
    pub key_indicators: Vec<String>,
    pub reasoning: String,
    pub potential_misclassification: bool,
}

/// Classify document content by scoring type-specific indicator keywords
/// against the content and the file name. Ties break in the order
/// bank > sales > purchase, the same precedence the indicators were tuned
/// with upstream.
pub fn classify(content: &str, filename: &str) -> Classification {
    let content_lower = content.to_lowercase();
    let filename_lower = filename.to_lowercase();

    let matches = |indicators: &[&str]| -> Vec<String> {
        indicators
            .iter()
            .filter(|ind| content_lower.contains(*ind) || filename_lower.contains(*ind))
            .map(|ind| ind.to_string())
            .collect()
    };

    let bank = matches(BANK_INDICATORS);
    let sales = matches(SALES_INDICATORS);
    let purchase = matches(PURCHASE_INDICATORS);

    let max_score = bank.len().max(sales.len()).max(purchase.len());

    if max_score == 0 {
        return Classification {
            document_type: DocumentType::Other,
            confidence: 0.2,
            key_indicators: vec!["analysis_unclear".to_string()],
            reasoning: "No clear financial document indicators found".to_string(),
            potential_misclassification: true,
        };
    }

    let (document_type, indicators) = if bank.len() == max_score {
        (DocumentType::BankStatement, bank)
    } else if sales.len() == max_score {
        (DocumentType::SalesRegister, sales)
    } else {
        (DocumentType::PurchaseRegister, purchase)
    };

    let confidence = (0.5 + max_score as f64 * 0.1).min(0.9);

    Classification {
        document_type,
        confidence,
        reasoning: format!(
            "Pattern-based classification found {} indicators for {}",
            max_score, document_type
        ),
        key_indicators: indicators,
        potential_misclassification: confidence < 0.8,
    }
}

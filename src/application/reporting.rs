use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, JournalEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    pub period: Option<String>,
    pub ledgers: Vec<LedgerBalance>,
    pub total_debit: Amount,
    pub total_credit: Amount,
    pub is_balanced: bool,
    pub generated_at: DateTime<Utc>,
}

/// One ledger line: debit and credit totals for a single account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerBalance {
    pub ledger_name: String,
    pub debit: Amount,
    pub credit: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gstr2aReport {
    pub period: Option<String>,
    pub entries: Vec<Gstr2aEntry>,
    pub total_taxable_value: Amount,
    pub total_cgst: Amount,
    pub total_sgst: Amount,
    pub total_igst: Amount,
    pub total_invoice_value: Amount,
    pub supplier_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// One inward supply line reconstructed from a purchase register row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gstr2aEntry {
    pub supplier_name: Option<String>,
    pub supplier_gstin: Option<String>,
    pub invoice_no: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub taxable_value: Amount,
    pub cgst: Amount,
    pub sgst: Amount,
    pub igst: Amount,
    pub invoice_value: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gstr3bReport {
    pub period: Option<String>,
    /// Section 3.1: outward taxable supplies, from sales registers
    pub outward_supplies: TaxSummary,
    /// Section 4: eligible input tax credit, from purchase registers
    pub input_tax_credit: TaxSummary,
    pub tax_payable: TaxPayable,
    pub generated_at: DateTime<Utc>,
}

/// Tax totals folded from one side of the return.
/// `total_tax` includes amounts from generic tax columns that could not be
/// attributed to a specific head.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxSummary {
    pub taxable_value: Amount,
    pub cgst: Amount,
    pub sgst: Amount,
    pub igst: Amount,
    pub total_tax: Amount,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxPayable {
    pub cgst: Amount,
    pub sgst: Amount,
    pub igst: Amount,
    pub total: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankReconciliationReport {
    pub period: Option<String>,
    pub matched: Vec<MatchedTransaction>,
    pub unmatched_bank: Vec<BankTransaction>,
    pub unmatched_book: Vec<JournalEntry>,
    pub summary: ReconciliationSummary,
    pub generated_at: DateTime<Utc>,
}

/// One statement line reconstructed from a bank statement row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransaction {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub debit: Amount,
    pub credit: Amount,
    pub balance: Option<Amount>,
}

impl BankTransaction {
    /// The movement on the line, whichever side carries it.
    pub fn amount(&self) -> Amount {
        if self.debit != 0.0 {
            self.debit
        } else {
            self.credit
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedTransaction {
    pub transaction: BankTransaction,
    pub entry: JournalEntry,
    pub amount: Amount,
    /// Days between the statement date and the book date (absolute)
    pub date_offset_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub bank_transaction_count: usize,
    pub book_entry_count: usize,
    pub matched_count: usize,
    pub bank_total: Amount,
    pub book_total: Amount,
    /// Percentage of bank transactions that found a book entry
    pub match_rate: f64,
}

/// Per-tenant processing counters for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub documents_processed: i64,
    pub validation_errors: i64,
    /// 0-100: share of stored documents that processed cleanly
    pub compliance_score: i64,
}

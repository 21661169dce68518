use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::domain::fields::{self, alias};
use crate::domain::{
    approx_equal, dates_within, round2, Amount, Document, DocumentId, DocumentStatus, DocumentType,
    JournalEntry, RowRecord, TenantId,
};
use crate::storage::Repository;

use super::reporting::{
    BankReconciliationReport, BankTransaction, Gstr2aEntry, Gstr2aReport, Gstr3bReport,
    LedgerBalance, MatchedTransaction, ProcessingStats, ReconciliationSummary, TaxPayable,
    TaxSummary, TrialBalanceReport,
};
use super::{AnalyzerConfig, AppError};

/// Application service providing high-level operations over stored documents
/// and journal entries. This is the primary interface for any client
/// (API, worker, TUI, etc.).
pub struct AnalyzerService {
    repo: Repository,
    config: AnalyzerConfig,
}

/// Filter for report generation
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub period: Option<String>,
}

/// Filter for querying documents
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub document_type: Option<DocumentType>,
    pub period: Option<String>,
    pub status: Option<DocumentStatus>,
    pub limit: Option<usize>,
}

/// Extracted rows of one document, shaped for tabular display
#[derive(Debug, Clone)]
pub struct ExtractedDataSet {
    pub document_id: DocumentId,
    pub document_type: DocumentType,
    pub file_name: String,
    pub headers: Vec<String>,
    pub records: Vec<RowRecord>,
    pub total_records: usize,
    pub extracted_at: DateTime<Utc>,
}

impl AnalyzerService {
    /// Create a new service with the given repository and default tunables.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            config: AnalyzerConfig::default(),
        }
    }

    pub fn with_config(repo: Repository, config: AnalyzerConfig) -> Self {
        Self { repo, config }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    // ========================
    // Document operations
    // ========================

    /// Persist a document with its extracted data.
    pub async fn store_document(&self, document: &Document) -> Result<(), AppError> {
        self.repo.save_document(document).await?;
        Ok(())
    }

    /// Get a document by id, scoped to the tenant.
    pub async fn get_document(
        &self,
        tenant_id: TenantId,
        id: DocumentId,
    ) -> Result<Document, AppError> {
        self.repo
            .get_document(tenant_id, id)
            .await?
            .ok_or(AppError::DocumentNotFound(id))
    }

    /// List documents, newest first.
    pub async fn list_documents(
        &self,
        tenant_id: TenantId,
        filter: &DocumentFilter,
    ) -> Result<Vec<Document>, AppError> {
        Ok(self
            .repo
            .list_documents_filtered(
                tenant_id,
                filter.document_type,
                filter.period.as_deref(),
                filter.status,
                filter.limit,
            )
            .await?)
    }

    /// Delete a document.
    pub async fn delete_document(
        &self,
        tenant_id: TenantId,
        id: DocumentId,
    ) -> Result<(), AppError> {
        if self.repo.get_document(tenant_id, id).await?.is_none() {
            return Err(AppError::DocumentNotFound(id));
        }
        self.repo.delete_document(tenant_id, id).await?;
        Ok(())
    }

    /// Mark a stored document's processing status.
    pub async fn set_document_status(
        &self,
        tenant_id: TenantId,
        id: DocumentId,
        status: DocumentStatus,
    ) -> Result<(), AppError> {
        if self.repo.get_document(tenant_id, id).await?.is_none() {
            return Err(AppError::DocumentNotFound(id));
        }
        self.repo.update_document_status(tenant_id, id, status).await?;
        Ok(())
    }

    /// Extracted data of processed documents, one set per document that
    /// actually holds records.
    pub async fn extracted_data_sets(
        &self,
        tenant_id: TenantId,
        filter: &DocumentFilter,
    ) -> Result<Vec<ExtractedDataSet>, AppError> {
        let documents = self.list_documents(tenant_id, filter).await?;

        Ok(documents
            .into_iter()
            .filter_map(|doc| {
                let data = doc.extracted_data?;
                if data.records.is_empty() {
                    return None;
                }
                Some(ExtractedDataSet {
                    document_id: doc.id,
                    document_type: doc.document_type,
                    file_name: doc.file_name,
                    headers: data.headers,
                    total_records: data.total_records,
                    records: data.records,
                    extracted_at: doc.updated_at,
                })
            })
            .collect())
    }

    // ========================
    // Journal operations
    // ========================

    /// Record a single journal entry.
    pub async fn record_journal_entry(&self, entry: &JournalEntry) -> Result<(), AppError> {
        if entry.debit_amount < 0.0 || entry.credit_amount < 0.0 {
            return Err(AppError::InvalidAmount(
                "Journal amounts must not be negative".to_string(),
            ));
        }
        self.repo.save_journal_entry(entry).await?;
        Ok(())
    }

    /// Record a batch of journal entries.
    pub async fn record_journal_entries(&self, entries: &[JournalEntry]) -> Result<(), AppError> {
        for entry in entries {
            self.record_journal_entry(entry).await?;
        }
        Ok(())
    }

    /// List journal entries within an optional date range.
    pub async fn list_journal_entries(
        &self,
        tenant_id: TenantId,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntry>, AppError> {
        Ok(self
            .repo
            .list_journal_entries(tenant_id, from_date, to_date)
            .await?)
    }

    // ========================
    // Trial Balance
    // ========================

    /// Fold journal entries into per-ledger debit/credit totals.
    pub async fn trial_balance(
        &self,
        tenant_id: TenantId,
        filter: &ReportFilter,
    ) -> Result<TrialBalanceReport, AppError> {
        validate_range(filter)?;

        let entries = self
            .repo
            .list_journal_entries(tenant_id, filter.from_date, filter.to_date)
            .await?;

        // BTreeMap: output ordered by ledger name regardless of entry order
        let mut ledgers: BTreeMap<String, (Amount, Amount)> = BTreeMap::new();
        for entry in &entries {
            let name = entry.ledger_name();
            let key = if name.is_empty() {
                "Unclassified".to_string()
            } else {
                name.to_string()
            };
            let slot = ledgers.entry(key).or_insert((0.0, 0.0));
            slot.0 += entry.debit_amount;
            slot.1 += entry.credit_amount;
        }

        let mut total_debit = 0.0;
        let mut total_credit = 0.0;
        let ledgers: Vec<LedgerBalance> = ledgers
            .into_iter()
            .map(|(ledger_name, (debit, credit))| {
                total_debit += debit;
                total_credit += credit;
                LedgerBalance {
                    ledger_name,
                    debit: round2(debit),
                    credit: round2(credit),
                }
            })
            .collect();

        let total_debit = round2(total_debit);
        let total_credit = round2(total_credit);
        let is_balanced = (total_debit - total_credit).abs() < self.config.amount_tolerance;

        info!(
            tenant = %tenant_id,
            ledgers = ledgers.len(),
            entries = entries.len(),
            is_balanced,
            "generated trial balance"
        );

        Ok(TrialBalanceReport {
            period: filter.period.clone(),
            ledgers,
            total_debit,
            total_credit,
            is_balanced,
            generated_at: Utc::now(),
        })
    }

    // ========================
    // GSTR-2A
    // ========================

    /// Rebuild inward supplies from purchase register rows.
    pub async fn gstr2a(
        &self,
        tenant_id: TenantId,
        filter: &ReportFilter,
    ) -> Result<Gstr2aReport, AppError> {
        validate_range(filter)?;

        let documents = self
            .documents_for_report(tenant_id, DocumentType::PurchaseRegister, filter)
            .await?;

        let mut entries = Vec::new();
        let mut suppliers: HashSet<String> = HashSet::new();
        let mut total_taxable = 0.0;
        let mut total_cgst = 0.0;
        let mut total_sgst = 0.0;
        let mut total_igst = 0.0;
        let mut total_invoice = 0.0;

        for document in &documents {
            for row in document.records() {
                let supplier_name = fields::field_str(row, alias::VENDOR);
                let supplier_gstin = fields::field_str(row, alias::GSTIN);
                let invoice_no = fields::field_str(row, alias::INVOICE_NO);
                let invoice_date = fields::field_date(row, alias::DATE);

                // Blank rows and trailing summary rows carry no identity
                let has_identity = supplier_name.is_some()
                    || supplier_gstin.is_some()
                    || invoice_no.is_some()
                    || invoice_date.is_some();
                if !has_identity {
                    continue;
                }
                if !in_range(invoice_date, filter) {
                    continue;
                }

                let taxable_value = fields::field_amount(row, alias::TAXABLE_VALUE);
                let cgst = fields::field_amount(row, alias::CGST);
                let sgst = fields::field_amount(row, alias::SGST);
                let igst = fields::field_amount(row, alias::IGST);
                let mut invoice_value = fields::field_amount(row, alias::TOTAL);
                if invoice_value == 0.0 {
                    invoice_value = taxable_value + cgst + sgst + igst;
                }

                if let Some(key) = supplier_gstin.as_deref().or(supplier_name.as_deref()) {
                    suppliers.insert(key.to_uppercase());
                }

                total_taxable += taxable_value;
                total_cgst += cgst;
                total_sgst += sgst;
                total_igst += igst;
                total_invoice += invoice_value;

                entries.push(Gstr2aEntry {
                    supplier_name,
                    supplier_gstin,
                    invoice_no,
                    invoice_date,
                    taxable_value,
                    cgst,
                    sgst,
                    igst,
                    invoice_value,
                });
            }
        }

        info!(
            tenant = %tenant_id,
            documents = documents.len(),
            entries = entries.len(),
            "generated GSTR-2A"
        );

        Ok(Gstr2aReport {
            period: filter.period.clone(),
            entries,
            total_taxable_value: round2(total_taxable),
            total_cgst: round2(total_cgst),
            total_sgst: round2(total_sgst),
            total_igst: round2(total_igst),
            total_invoice_value: round2(total_invoice),
            supplier_count: suppliers.len(),
            generated_at: Utc::now(),
        })
    }

    // ========================
    // GSTR-3B
    // ========================

    /// Summary return: outward supplies vs input tax credit.
    pub async fn gstr3b(
        &self,
        tenant_id: TenantId,
        filter: &ReportFilter,
    ) -> Result<Gstr3bReport, AppError> {
        validate_range(filter)?;

        let sales = self
            .documents_for_report(tenant_id, DocumentType::SalesRegister, filter)
            .await?;
        let purchases = self
            .documents_for_report(tenant_id, DocumentType::PurchaseRegister, filter)
            .await?;

        let outward_supplies = fold_tax_summary(&sales, filter);
        let input_tax_credit = fold_tax_summary(&purchases, filter);

        let tax_payable = TaxPayable {
            cgst: round2(outward_supplies.cgst - input_tax_credit.cgst),
            sgst: round2(outward_supplies.sgst - input_tax_credit.sgst),
            igst: round2(outward_supplies.igst - input_tax_credit.igst),
            total: round2(outward_supplies.total_tax - input_tax_credit.total_tax),
        };

        info!(
            tenant = %tenant_id,
            sales_documents = sales.len(),
            purchase_documents = purchases.len(),
            net_tax = tax_payable.total,
            "generated GSTR-3B"
        );

        Ok(Gstr3bReport {
            period: filter.period.clone(),
            outward_supplies,
            input_tax_credit,
            tax_payable,
            generated_at: Utc::now(),
        })
    }

    // ========================
    // Bank Reconciliation
    // ========================

    /// Match bank statement lines against book entries by amount and date.
    pub async fn bank_reconciliation(
        &self,
        tenant_id: TenantId,
        filter: &ReportFilter,
    ) -> Result<BankReconciliationReport, AppError> {
        validate_range(filter)?;

        let documents = self
            .documents_for_report(tenant_id, DocumentType::BankStatement, filter)
            .await?;
        let entries = self
            .repo
            .list_journal_entries(tenant_id, filter.from_date, filter.to_date)
            .await?;

        let transactions: Vec<BankTransaction> = documents
            .iter()
            .flat_map(|doc| doc.records().iter())
            .filter_map(|row| self.row_to_transaction(row, filter))
            .collect();

        let mut matched = Vec::new();
        let mut unmatched_bank = Vec::new();
        let mut used = vec![false; entries.len()];

        for transaction in &transactions {
            let candidate = transaction.date.and_then(|txn_date| {
                entries.iter().enumerate().find(|(i, entry)| {
                    !used[*i]
                        && self.amount_matches(transaction, entry)
                        && dates_within(txn_date, entry.entry_date, self.config.date_tolerance_days)
                })
            });

            match candidate {
                Some((index, entry)) => {
                    used[index] = true;
                    let offset = transaction
                        .date
                        .map(|d| (d - entry.entry_date).num_days().abs())
                        .unwrap_or(0);
                    matched.push(MatchedTransaction {
                        transaction: transaction.clone(),
                        entry: entry.clone(),
                        amount: transaction.amount(),
                        date_offset_days: offset,
                    });
                }
                None => unmatched_bank.push(transaction.clone()),
            }
        }

        let unmatched_book: Vec<JournalEntry> = entries
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(entry, _)| entry.clone())
            .collect();

        let bank_total: Amount = transactions.iter().map(|t| t.amount()).sum();
        let book_total: Amount = entries.iter().map(|e| e.amount()).sum();
        let match_rate = if transactions.is_empty() {
            0.0
        } else {
            round2(matched.len() as f64 / transactions.len() as f64 * 100.0)
        };

        info!(
            tenant = %tenant_id,
            bank_transactions = transactions.len(),
            book_entries = entries.len(),
            matched = matched.len(),
            match_rate,
            "generated bank reconciliation"
        );

        Ok(BankReconciliationReport {
            period: filter.period.clone(),
            summary: ReconciliationSummary {
                bank_transaction_count: transactions.len(),
                book_entry_count: entries.len(),
                matched_count: matched.len(),
                bank_total: round2(bank_total),
                book_total: round2(book_total),
                match_rate,
            },
            matched,
            unmatched_bank,
            unmatched_book,
            generated_at: Utc::now(),
        })
    }

    // ========================
    // Statistics
    // ========================

    /// Per-tenant processing counters.
    pub async fn processing_stats(&self, tenant_id: TenantId) -> Result<ProcessingStats, AppError> {
        let (total, failed) = self.repo.count_documents(tenant_id).await?;
        let successful = total - failed;
        let compliance_score = (successful as f64 / total.max(1) as f64 * 100.0).round() as i64;

        Ok(ProcessingStats {
            documents_processed: total,
            validation_errors: failed,
            compliance_score,
        })
    }

    // ========================
    // Helpers
    // ========================

    async fn documents_for_report(
        &self,
        tenant_id: TenantId,
        document_type: DocumentType,
        filter: &ReportFilter,
    ) -> Result<Vec<Document>, AppError> {
        Ok(self
            .repo
            .list_documents_filtered(
                tenant_id,
                Some(document_type),
                filter.period.as_deref(),
                None,
                None,
            )
            .await?)
    }

    fn row_to_transaction(&self, row: &RowRecord, filter: &ReportFilter) -> Option<BankTransaction> {
        let debit = fields::field_amount(row, alias::DEBIT);
        let credit = fields::field_amount(row, alias::CREDIT);
        if debit == 0.0 && credit == 0.0 {
            return None;
        }

        let date = fields::field_date(row, alias::DATE);
        let description = fields::field_str(row, alias::DESCRIPTION);
        // Statement summary rows have amounts but no date and no narration
        if date.is_none() && description.is_none() {
            return None;
        }
        if !in_range(date, filter) {
            return None;
        }

        let balance =
            fields::resolve(row, alias::BALANCE).map(|_| fields::field_amount(row, alias::BALANCE));

        Some(BankTransaction {
            date,
            description,
            reference: fields::field_str(row, alias::REFERENCE),
            debit,
            credit,
            balance,
        })
    }

    /// A statement amount may sit on either side of the book entry;
    /// direction conventions vary per client.
    fn amount_matches(&self, transaction: &BankTransaction, entry: &JournalEntry) -> bool {
        let amount = transaction.amount();
        (entry.debit_amount != 0.0 && approx_equal(amount, entry.debit_amount))
            || (entry.credit_amount != 0.0 && approx_equal(amount, entry.credit_amount))
    }
}

fn validate_range(filter: &ReportFilter) -> Result<(), AppError> {
    if let (Some(from), Some(to)) = (filter.from_date, filter.to_date) {
        if from > to {
            return Err(AppError::InvalidDateRange { from, to });
        }
    }
    Ok(())
}

/// Rows without a parseable date stay in the report; filtering is
/// best-effort over whatever the extractor recovered.
fn in_range(date: Option<NaiveDate>, filter: &ReportFilter) -> bool {
    let Some(date) = date else { return true };
    if let Some(from) = filter.from_date {
        if date < from {
            return false;
        }
    }
    if let Some(to) = filter.to_date {
        if date > to {
            return false;
        }
    }
    true
}

/// Single pass over register rows into per-head tax totals.
fn fold_tax_summary(documents: &[Document], filter: &ReportFilter) -> TaxSummary {
    let mut summary = TaxSummary::default();

    for document in documents {
        for row in document.records() {
            // Blank rows and trailing summary rows carry no identity
            let date = fields::field_date(row, alias::DATE);
            let has_identity = date.is_some()
                || fields::field_str(row, alias::VENDOR).is_some()
                || fields::field_str(row, alias::CUSTOMER).is_some()
                || fields::field_str(row, alias::INVOICE_NO).is_some();
            if !has_identity || !in_range(date, filter) {
                continue;
            }

            let taxable_value = fields::field_amount(row, alias::TAXABLE_VALUE);
            let cgst = fields::field_amount(row, alias::CGST);
            let sgst = fields::field_amount(row, alias::SGST);
            let igst = fields::field_amount(row, alias::IGST);
            let heads = cgst + sgst + igst;

            // Generic tax column only counts when no specific head resolved
            let tax = if heads != 0.0 {
                heads
            } else {
                fields::field_amount(row, alias::TAX)
            };

            if taxable_value == 0.0 && tax == 0.0 {
                continue;
            }

            summary.taxable_value += taxable_value;
            summary.cgst += cgst;
            summary.sgst += sgst;
            summary.igst += igst;
            summary.total_tax += tax;
        }
    }

    summary.taxable_value = round2(summary.taxable_value);
    summary.cgst = round2(summary.cgst);
    summary.sgst = round2(summary.sgst);
    summary.igst = round2(summary.igst);
    summary.total_tax = round2(summary.total_tax);
    summary
}

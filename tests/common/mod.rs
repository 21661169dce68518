// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use khata::application::AnalyzerService;
use khata::domain::{Document, DocumentType, ExtractedData, JournalEntry, RowRecord, TenantId};
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(AnalyzerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = AnalyzerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

pub fn tenant() -> TenantId {
    Uuid::new_v4()
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn row(value: serde_json::Value) -> RowRecord {
    value.as_object().unwrap().clone()
}

/// Test fixture: documents shaped like the registers clients actually upload
pub struct SampleDocuments;

impl SampleDocuments {
    /// Sales register: two invoices, one intra-state (CGST+SGST), one
    /// inter-state (IGST)
    pub fn sales_register(tenant_id: TenantId) -> Document {
        let headers = vec![
            "Date".to_string(),
            "Customer".to_string(),
            "Invoice#".to_string(),
            "Taxable Value".to_string(),
            "CGST".to_string(),
            "SGST".to_string(),
            "IGST".to_string(),
            "Total".to_string(),
        ];
        let records = vec![
            row(json!({
                "Date": "15-01-2025",
                "Customer": "Acme Corporation",
                "Invoice#": "INV-101",
                "Taxable Value": "1000.00",
                "CGST": "90.00",
                "SGST": "90.00",
                "IGST": "",
                "Total": "1180.00",
            })),
            row(json!({
                "Date": "20-01-2025",
                "Customer": "TechNova Inc.",
                "Invoice#": "INV-102",
                "Taxable Value": "2000.00",
                "CGST": "",
                "SGST": "",
                "IGST": "360.00",
                "Total": "2360.00",
            })),
        ];

        Document::new(tenant_id, "sales_q1.csv", DocumentType::SalesRegister)
            .with_period("Q1_2025")
            .with_extracted_data(ExtractedData::new(headers, records, 0.95))
    }

    /// Purchase register: two bills plus the trailing summary row a
    /// spreadsheet export leaves behind
    pub fn purchase_register(tenant_id: TenantId) -> Document {
        let headers = vec![
            "Date".to_string(),
            "Vendor".to_string(),
            "GSTIN".to_string(),
            "Bill No".to_string(),
            "Taxable Value".to_string(),
            "CGST".to_string(),
            "SGST".to_string(),
            "IGST".to_string(),
            "Total".to_string(),
        ];
        let records = vec![
            row(json!({
                "Date": "10-01-2025",
                "Vendor": "Office Supplies Co.",
                "GSTIN": "27AABCU9603R1ZM",
                "Bill No": "PB-201",
                "Taxable Value": "500.00",
                "CGST": "45.00",
                "SGST": "45.00",
                "IGST": "",
                "Total": "590.00",
            })),
            row(json!({
                "Date": "18-01-2025",
                "Vendor": "Tech Hardware Ltd.",
                "GSTIN": "29AAACT2727Q1ZS",
                "Bill No": "PB-202",
                "Taxable Value": "1500.00",
                "CGST": "",
                "SGST": "",
                "IGST": "270.00",
                "Total": "1770.00",
            })),
            // Summary row: no date, no vendor, only totals
            row(json!({
                "Date": "TOTAL",
                "Vendor": "",
                "GSTIN": "",
                "Bill No": "",
                "Taxable Value": "2000.00",
                "CGST": "45.00",
                "SGST": "45.00",
                "IGST": "270.00",
                "Total": "2360.00",
            })),
        ];

        Document::new(tenant_id, "purchases_q1.csv", DocumentType::PurchaseRegister)
            .with_period("Q1_2025")
            .with_extracted_data(ExtractedData::new(headers, records, 0.95))
    }

    /// Bank statement: one credit, one debit, one line with no book entry
    pub fn bank_statement(tenant_id: TenantId) -> Document {
        let headers = vec![
            "Date".to_string(),
            "Description".to_string(),
            "Ref No".to_string(),
            "Debit".to_string(),
            "Credit".to_string(),
            "Balance".to_string(),
        ];
        let records = vec![
            row(json!({
                "Date": "16-01-2025",
                "Description": "NEFT from Acme Corporation",
                "Ref No": "UTR-8841",
                "Debit": "",
                "Credit": "1180.00",
                "Balance": "51180.00",
            })),
            row(json!({
                "Date": "21-01-2025",
                "Description": "Cheque to Office Supplies Co.",
                "Ref No": "CHQ-044",
                "Debit": "590.00",
                "Credit": "",
                "Balance": "50590.00",
            })),
            row(json!({
                "Date": "25-01-2025",
                "Description": "Bank charges",
                "Ref No": "",
                "Debit": "25.00",
                "Credit": "",
                "Balance": "50565.00",
            })),
        ];

        Document::new(tenant_id, "statement_jan.csv", DocumentType::BankStatement)
            .with_period("Q1_2025")
            .with_extracted_data(ExtractedData::new(headers, records, 0.95))
    }
}

/// Test fixture: a small balanced book
pub struct SampleJournal;

impl SampleJournal {
    /// Four-ledger balanced book: debits 125000, credits 125000
    pub async fn seed_balanced(service: &AnalyzerService, tenant_id: TenantId) -> Result<()> {
        let entries = vec![
            JournalEntry::new(tenant_id, "Cash", 50000.0, 0.0, parse_date("2025-01-05")),
            JournalEntry::new(
                tenant_id,
                "Accounts Receivable",
                75000.0,
                0.0,
                parse_date("2025-01-10"),
            ),
            JournalEntry::new(
                tenant_id,
                "Accounts Payable",
                0.0,
                45000.0,
                parse_date("2025-01-12"),
            ),
            JournalEntry::new(tenant_id, "Revenue", 0.0, 80000.0, parse_date("2025-01-15")),
        ];
        service.record_journal_entries(&entries).await?;
        Ok(())
    }

    /// Entries whose amounts and dates line up with the sample bank
    /// statement, plus one stale entry nothing matches
    pub async fn seed_for_reconciliation(
        service: &AnalyzerService,
        tenant_id: TenantId,
    ) -> Result<()> {
        let entries = vec![
            // Book records the receipt a day before the bank clears it
            JournalEntry::new(
                tenant_id,
                "Accounts Receivable",
                1180.0,
                0.0,
                parse_date("2025-01-15"),
            )
            .with_description("Acme invoice settlement"),
            JournalEntry::new(
                tenant_id,
                "Accounts Payable",
                0.0,
                590.0,
                parse_date("2025-01-21"),
            )
            .with_description("Office Supplies bill payment"),
            JournalEntry::new(
                tenant_id,
                "Rent Expense",
                9999.0,
                0.0,
                parse_date("2025-01-05"),
            ),
        ];
        service.record_journal_entries(&entries).await?;
        Ok(())
    }
}

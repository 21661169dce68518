use std::io::Read;

use anyhow::Result;
use serde_json::{json, Value};
use tracing::info;

use crate::application::AnalyzerService;
use crate::domain::fields::{self, alias};
use crate::domain::{
    Document, DocumentStatus, DocumentType, ExtractedData, JournalEntry, RowRecord, TenantId,
};

use super::classify::{classify, Classification};

/// Row-level counters for an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate and classify without persisting anything
    pub dry_run: bool,
    /// Skip classification and force this document type
    pub document_type: Option<DocumentType>,
    /// Reporting period label to stamp on the document
    pub period: Option<String>,
}

/// Outcome of a register import: the stored document plus what the
/// classifier and the row loop found.
#[derive(Debug, Clone)]
pub struct RegisterImport {
    pub document: Document,
    pub classification: Classification,
    pub report: ImportReport,
    pub stored: bool,
}

/// Importer for loading extracted register data into the analyzer
pub struct Importer<'a> {
    service: &'a AnalyzerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a AnalyzerService) -> Self {
        Self { service }
    }

    /// Import a CSV register: classify the content, parse rows into
    /// extracted records, and store the resulting document.
    pub async fn import_register_csv<R: Read>(
        &self,
        mut reader: R,
        original_name: &str,
        tenant_id: TenantId,
        options: ImportOptions,
    ) -> Result<RegisterImport> {
        // Registers arrive in whatever encoding the client exported;
        // lossy decoding mirrors the latin-1 fallback upstream
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let content = String::from_utf8_lossy(&bytes);

        let classification = match options.document_type {
            Some(document_type) => Classification {
                document_type,
                confidence: 1.0,
                key_indicators: vec!["manual_override".to_string()],
                reasoning: "Document type supplied by caller".to_string(),
                potential_misclassification: false,
            },
            None => classify(&content, original_name),
        };

        let mut report = ImportReport::default();
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records: Vec<RowRecord> = Vec::new();
        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    report.errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let row = record_to_row(&headers, &record);
            if row.values().all(is_blank) {
                report.skipped += 1;
                continue;
            }
            if is_summary_row(&record) {
                report.skipped += 1;
                continue;
            }

            records.push(row);
            report.imported += 1;
        }

        let confidence = if records.is_empty() { 0.3 } else { 0.95 };
        if records.is_empty() {
            report.errors.push(ImportError {
                line: 0,
                field: None,
                error: "No data rows found".to_string(),
            });
        }

        let metadata = json!({
            "classification": {
                "confidence": classification.confidence,
                "reasoning": classification.reasoning,
                "key_indicators": classification.key_indicators,
            },
            "extraction": {
                "confidence": confidence,
                "total_records": records.len(),
                "skipped": report.skipped,
                "errors": report.errors.len(),
            },
        });

        let mut document = Document::new(tenant_id, original_name, classification.document_type)
            .with_metadata(metadata)
            .with_extracted_data(ExtractedData::new(headers, records, confidence));
        if document.records().is_empty() {
            document = document.with_status(DocumentStatus::Failed);
        }
        if let Some(period) = &options.period {
            document = document.with_period(period.clone());
        }

        let stored = !options.dry_run;
        if stored {
            self.service.store_document(&document).await?;
        }

        info!(
            tenant = %tenant_id,
            file = original_name,
            document_type = %document.document_type,
            imported = report.imported,
            skipped = report.skipped,
            errors = report.errors.len(),
            stored,
            "imported register"
        );

        Ok(RegisterImport {
            document,
            classification,
            report,
            stored,
        })
    }

    /// Import journal entries from CSV. Columns resolve through the same
    /// alias lists the aggregators use.
    pub async fn import_journal_csv<R: Read>(
        &self,
        reader: R,
        tenant_id: TenantId,
        options: ImportOptions,
    ) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2;

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    report.errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let row = record_to_row(&headers, &record);
            if row.values().all(is_blank) || is_summary_row(&record) {
                report.skipped += 1;
                continue;
            }

            let Some(account_name) = fields::field_str(&row, alias::ACCOUNT_NAME) else {
                report.errors.push(ImportError {
                    line,
                    field: Some("account_name".to_string()),
                    error: "Missing account name".to_string(),
                });
                continue;
            };

            let Some(entry_date) = fields::field_date(&row, alias::DATE) else {
                report.errors.push(ImportError {
                    line,
                    field: Some("date".to_string()),
                    error: "Missing or unparseable date".to_string(),
                });
                continue;
            };

            let debit = fields::field_amount(&row, alias::DEBIT);
            let credit = fields::field_amount(&row, alias::CREDIT);

            let mut entry = JournalEntry::new(tenant_id, account_name, debit, credit, entry_date);
            if let Some(code) = fields::field_str(&row, alias::ACCOUNT_CODE) {
                entry = entry.with_account_code(code);
            }
            if let Some(description) = fields::field_str(&row, alias::DESCRIPTION) {
                entry = entry.with_description(description);
            }

            if options.dry_run {
                report.imported += 1;
                continue;
            }

            match self.service.record_journal_entry(&entry).await {
                Ok(()) => report.imported += 1,
                Err(e) => report.errors.push(ImportError {
                    line,
                    field: None,
                    error: format!("Journal entry rejected: {}", e),
                }),
            }
        }

        info!(
            tenant = %tenant_id,
            imported = report.imported,
            skipped = report.skipped,
            errors = report.errors.len(),
            "imported journal entries"
        );

        Ok(report)
    }
}

fn record_to_row(headers: &[String], record: &csv::StringRecord) -> RowRecord {
    let mut row = RowRecord::new();
    for (i, value) in record.iter().enumerate() {
        let header = headers
            .get(i)
            .filter(|h| !h.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("column_{}", i));
        row.insert(header, Value::String(value.trim().to_string()));
    }
    row
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty(),
        Value::Null => true,
        _ => false,
    }
}

/// Trailing summary rows ("TOTAL,...") would double every aggregate.
fn is_summary_row(record: &csv::StringRecord) -> bool {
    record
        .iter()
        .find(|cell| !cell.trim().is_empty())
        .is_some_and(|cell| cell.trim().eq_ignore_ascii_case("total"))
}

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Document, DocumentId, DocumentStatus, DocumentType, ExtractedData, JournalEntry, TenantId,
};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying documents and journal entries.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Document operations
    // ========================

    /// Save a new document to the database.
    pub async fn save_document(&self, document: &Document) -> Result<()> {
        let metadata_json = serde_json::to_string(&document.metadata)?;
        let extracted_json = document
            .extracted_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO documents (id, tenant_id, file_name, original_name, document_type, status, period, metadata, extracted_data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(document.id.to_string())
        .bind(document.tenant_id.to_string())
        .bind(&document.file_name)
        .bind(&document.original_name)
        .bind(document.document_type.as_str())
        .bind(document.status.as_str())
        .bind(&document.period)
        .bind(&metadata_json)
        .bind(&extracted_json)
        .bind(document.created_at.to_rfc3339())
        .bind(document.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save document")?;
        Ok(())
    }

    /// Get a document by ID, scoped to the tenant.
    pub async fn get_document(
        &self,
        tenant_id: TenantId,
        id: DocumentId,
    ) -> Result<Option<Document>> {
        let row = sqlx::query(
            r#"
            SELECT id, tenant_id, file_name, original_name, document_type, status, period, metadata, extracted_data, created_at, updated_at
            FROM documents
            WHERE id = ? AND tenant_id = ?
            "#,
        )
        .bind(id.to_string())
        .bind(tenant_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch document")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_document(&row)?)),
            None => Ok(None),
        }
    }

    /// List documents with optional filters, newest first.
    pub async fn list_documents_filtered(
        &self,
        tenant_id: TenantId,
        document_type: Option<DocumentType>,
        period: Option<&str>,
        status: Option<DocumentStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>> {
        // Build query dynamically based on filters
        let mut query = String::from(
            "SELECT id, tenant_id, file_name, original_name, document_type, status, period, metadata, extracted_data, created_at, updated_at FROM documents WHERE tenant_id = ?"
        );

        if document_type.is_some() {
            query.push_str(" AND document_type = ?");
        }
        if period.is_some() {
            query.push_str(" AND period = ?");
        }
        if status.is_some() {
            query.push_str(" AND status = ?");
        }

        query.push_str(" ORDER BY created_at DESC");

        if let Some(lim) = limit {
            query.push_str(&format!(" LIMIT {}", lim));
        }

        let mut sql_query = sqlx::query(&query).bind(tenant_id.to_string());

        if let Some(dt) = document_type {
            sql_query = sql_query.bind(dt.as_str());
        }
        if let Some(p) = period {
            sql_query = sql_query.bind(p);
        }
        if let Some(st) = status {
            sql_query = sql_query.bind(st.as_str());
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list documents")?;

        rows.iter().map(Self::row_to_document).collect()
    }

    /// Update a document's processing status.
    pub async fn update_document_status(
        &self,
        tenant_id: TenantId,
        id: DocumentId,
        status: DocumentStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE documents SET status = ?, updated_at = ? WHERE id = ? AND tenant_id = ?")
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .bind(tenant_id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to update document status")?;
        Ok(())
    }

    /// Delete a document.
    pub async fn delete_document(&self, tenant_id: TenantId, id: DocumentId) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE id = ? AND tenant_id = ?")
            .bind(id.to_string())
            .bind(tenant_id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete document")?;
        Ok(())
    }

    /// Count documents for a tenant: (total, failed).
    pub async fn count_documents(&self, tenant_id: TenantId) -> Result<(i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COALESCE(SUM(CASE WHEN status = 'failed' THEN 1 ELSE 0 END), 0) as failed
            FROM documents
            WHERE tenant_id = ?
            "#,
        )
        .bind(tenant_id.to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to count documents")?;

        Ok((row.get("total"), row.get("failed")))
    }

    fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document> {
        let id_str: String = row.get("id");
        let tenant_str: String = row.get("tenant_id");
        let type_str: String = row.get("document_type");
        let status_str: String = row.get("status");
        let metadata_json: String = row.get("metadata");
        let extracted_json: Option<String> = row.get("extracted_data");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");

        let extracted_data: Option<ExtractedData> = extracted_json
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .context("Invalid extracted_data JSON")?;

        Ok(Document {
            id: Uuid::parse_str(&id_str).context("Invalid document ID")?,
            tenant_id: Uuid::parse_str(&tenant_str).context("Invalid tenant ID")?,
            file_name: row.get("file_name"),
            original_name: row.get("original_name"),
            document_type: DocumentType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid document type: {}", type_str))?,
            status: DocumentStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid document status: {}", status_str))?,
            period: row.get("period"),
            metadata: serde_json::from_str(&metadata_json).unwrap_or_default(),
            extracted_data,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .context("Invalid updated_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Journal entry operations
    // ========================

    /// Save a new journal entry to the database.
    pub async fn save_journal_entry(&self, entry: &JournalEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO journal_entries (id, tenant_id, account_name, account_code, debit_amount, credit_amount, entry_date, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.tenant_id.to_string())
        .bind(&entry.account_name)
        .bind(&entry.account_code)
        .bind(entry.debit_amount)
        .bind(entry.credit_amount)
        .bind(entry.entry_date.format("%Y-%m-%d").to_string())
        .bind(&entry.description)
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save journal entry")?;
        Ok(())
    }

    /// List journal entries within an optional date range, ordered by date.
    pub async fn list_journal_entries(
        &self,
        tenant_id: TenantId,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntry>> {
        let mut query = String::from(
            "SELECT id, tenant_id, account_name, account_code, debit_amount, credit_amount, entry_date, description, created_at FROM journal_entries WHERE tenant_id = ?"
        );

        let from_str = from_date.map(|d| d.format("%Y-%m-%d").to_string());
        let to_str = to_date.map(|d| d.format("%Y-%m-%d").to_string());

        if from_str.is_some() {
            query.push_str(" AND entry_date >= ?");
        }
        if to_str.is_some() {
            query.push_str(" AND entry_date <= ?");
        }

        query.push_str(" ORDER BY entry_date, created_at");

        let mut sql_query = sqlx::query(&query).bind(tenant_id.to_string());

        if let Some(ref from) = from_str {
            sql_query = sql_query.bind(from);
        }
        if let Some(ref to) = to_str {
            sql_query = sql_query.bind(to);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list journal entries")?;

        rows.iter().map(Self::row_to_journal_entry).collect()
    }

    fn row_to_journal_entry(row: &sqlx::sqlite::SqliteRow) -> Result<JournalEntry> {
        let id_str: String = row.get("id");
        let tenant_str: String = row.get("tenant_id");
        let entry_date_str: String = row.get("entry_date");
        let created_at_str: String = row.get("created_at");

        Ok(JournalEntry {
            id: Uuid::parse_str(&id_str).context("Invalid journal entry ID")?,
            tenant_id: Uuid::parse_str(&tenant_str).context("Invalid tenant ID")?,
            account_name: row.get("account_name"),
            account_code: row.get("account_code"),
            debit_amount: row.get("debit_amount"),
            credit_amount: row.get("credit_amount"),
            entry_date: NaiveDate::parse_from_str(&entry_date_str, "%Y-%m-%d")
                .context("Invalid entry_date")?,
            description: row.get("description"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

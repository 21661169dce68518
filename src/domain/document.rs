use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub type DocumentId = Uuid;
pub type TenantId = Uuid;

/// One extracted row: column name -> cell value, exactly as the upstream
/// extractor produced it. Column names are unpredictable; the field
/// extractor resolves them through alias lists.
pub type RowRecord = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Vendor bills and purchase invoices
    PurchaseRegister,
    /// Customer invoices with GST breakup
    SalesRegister,
    /// Bank transaction listings
    BankStatement,
    /// Anything the classifier could not place
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::PurchaseRegister => "purchase_register",
            DocumentType::SalesRegister => "sales_register",
            DocumentType::BankStatement => "bank_statement",
            DocumentType::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "purchase_register" => Some(DocumentType::PurchaseRegister),
            "sales_register" => Some(DocumentType::SalesRegister),
            "bank_statement" => Some(DocumentType::BankStatement),
            "other" => Some(DocumentType::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(DocumentStatus::Pending),
            "completed" => Some(DocumentStatus::Completed),
            "failed" => Some(DocumentStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rows extracted from a document, plus what the extractor learned about it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedData {
    pub headers: Vec<String>,
    pub records: Vec<RowRecord>,
    pub total_records: usize,
    pub confidence: f64,
}

impl ExtractedData {
    pub fn new(headers: Vec<String>, records: Vec<RowRecord>, confidence: f64) -> Self {
        let total_records = records.len();
        Self {
            headers,
            records,
            total_records,
            confidence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub tenant_id: TenantId,
    pub file_name: String,
    pub original_name: String,
    pub document_type: DocumentType,
    pub status: DocumentStatus,
    /// Reporting period label, e.g. "Q1_2025"
    pub period: Option<String>,
    /// Free-form processing metadata (classification notes, counters)
    pub metadata: Value,
    pub extracted_data: Option<ExtractedData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        tenant_id: TenantId,
        original_name: impl Into<String>,
        document_type: DocumentType,
    ) -> Self {
        let id = Uuid::new_v4();
        let original_name = original_name.into();
        let now = Utc::now();
        Self {
            id,
            tenant_id,
            file_name: format!("{}_{}", id, original_name),
            original_name,
            document_type,
            status: DocumentStatus::Pending,
            period: None,
            metadata: Value::Null,
            extracted_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_extracted_data(mut self, data: ExtractedData) -> Self {
        self.extracted_data = Some(data);
        self.status = DocumentStatus::Completed;
        self
    }

    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }

    /// Extracted rows, or an empty slice for documents that never finished
    /// processing.
    pub fn records(&self) -> &[RowRecord] {
        self.extracted_data
            .as_ref()
            .map(|d| d.records.as_slice())
            .unwrap_or(&[])
    }
}

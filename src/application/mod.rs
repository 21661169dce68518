mod config;
mod error;
pub mod reporting;
mod service;

pub use config::AnalyzerConfig;
pub use error::AppError;
pub use service::{AnalyzerService, DocumentFilter, ExtractedDataSet, ReportFilter};

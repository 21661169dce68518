use serde::{Deserialize, Serialize};

use crate::domain::{Amount, AMOUNT_TOLERANCE, DATE_TOLERANCE_DAYS};

/// Tunables for the matching and balancing logic.
/// Defaults reproduce the statutory behavior; embedders can deserialize an
/// override from their own configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Two amounts closer than this are equal
    pub amount_tolerance: Amount,
    /// Maximum day gap for bank/book date matching
    pub date_tolerance_days: i64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: AMOUNT_TOLERANCE,
            date_tolerance_days: DATE_TOLERANCE_DAYS,
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::numeric::Amount;
use super::TenantId;

pub type JournalEntryId = Uuid;

/// A book entry sourced from the client's accounting system.
/// Exactly one of debit/credit is normally non-zero, but imported books are
/// not trusted to guarantee that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub tenant_id: TenantId,
    pub account_name: String,
    pub account_code: Option<String>,
    pub debit_amount: Amount,
    pub credit_amount: Amount,
    pub entry_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(
        tenant_id: TenantId,
        account_name: impl Into<String>,
        debit_amount: Amount,
        credit_amount: Amount,
        entry_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            account_name: account_name.into(),
            account_code: None,
            debit_amount,
            credit_amount,
            entry_date,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_account_code(mut self, code: impl Into<String>) -> Self {
        self.account_code = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The ledger this entry aggregates under: account name, falling back to
    /// the account code when the name is blank.
    pub fn ledger_name(&self) -> &str {
        let name = self.account_name.trim();
        if !name.is_empty() {
            return name;
        }
        self.account_code.as_deref().unwrap_or("").trim()
    }

    /// The single-sided amount of the entry, whichever side carries it.
    pub fn amount(&self) -> Amount {
        if self.debit_amount != 0.0 {
            self.debit_amount
        } else {
            self.credit_amount
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ledger_name_prefers_account_name() {
        let entry = JournalEntry::new(Uuid::new_v4(), "Cash", 100.0, 0.0, date(2025, 1, 1))
            .with_account_code("1001");
        assert_eq!(entry.ledger_name(), "Cash");
    }

    #[test]
    fn test_ledger_name_falls_back_to_code() {
        let entry = JournalEntry::new(Uuid::new_v4(), "  ", 100.0, 0.0, date(2025, 1, 1))
            .with_account_code("1001");
        assert_eq!(entry.ledger_name(), "1001");
    }

    #[test]
    fn test_amount_picks_nonzero_side() {
        let debit = JournalEntry::new(Uuid::new_v4(), "Cash", 250.0, 0.0, date(2025, 1, 1));
        assert_eq!(debit.amount(), 250.0);

        let credit = JournalEntry::new(Uuid::new_v4(), "Sales", 0.0, 980.0, date(2025, 1, 1));
        assert_eq!(credit.amount(), 980.0);
    }
}

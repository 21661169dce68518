use chrono::NaiveDate;
use serde_json::Value;

use super::dates::parse_flexible_date;
use super::numeric::{amount_or_zero, Amount};
use super::RowRecord;

/// Canonical alias lists for the column names seen across real registers.
/// Ordering matters: earlier aliases win when several columns qualify.
pub mod alias {
    pub const DATE: &[&str] = &[
        "date",
        "invoice_date",
        "bill_date",
        "transaction_date",
        "txn_date",
        "value_date",
        "purchase_date",
    ];
    pub const CUSTOMER: &[&str] = &[
        "customer_name",
        "customer",
        "client",
        "buyer",
        "party_name",
        "party",
    ];
    pub const VENDOR: &[&str] = &[
        "vendor_name",
        "vendor",
        "supplier_name",
        "supplier",
        "party_name",
        "party",
    ];
    pub const INVOICE_NO: &[&str] = &[
        "invoice_no",
        "invoice_number",
        "invoice",
        "bill_no",
        "voucher_no",
        "po_no",
        "purchase_order_no",
        "po",
    ];
    pub const REFERENCE: &[&str] = &[
        "reference_no",
        "reference",
        "ref_no",
        "transaction_id",
        "utr",
        "cheque_no",
    ];
    pub const GSTIN: &[&str] = &[
        "gstin",
        "vendor_gstin",
        "customer_gstin",
        "supplier_gstin",
        "gstin_uin",
        "gst_no",
        "gst_number",
    ];
    pub const TAXABLE_VALUE: &[&str] = &[
        "taxable_value",
        "taxable_amount",
        "taxable",
        "base_amount",
        "amount",
    ];
    pub const CGST: &[&str] = &["cgst_amount", "cgst"];
    pub const SGST: &[&str] = &["sgst_amount", "sgst"];
    pub const IGST: &[&str] = &["igst_amount", "igst"];
    pub const TAX: &[&str] = &["tax_amount", "gst", "tax", "vat"];
    pub const TOTAL: &[&str] = &[
        "total_amount",
        "invoice_amount",
        "invoice_value",
        "grand_total",
        "bill_amount",
        "total",
    ];
    pub const DEBIT: &[&str] = &["debit_amount", "debit", "withdrawal", "dr_amount", "dr"];
    pub const CREDIT: &[&str] = &["credit_amount", "credit", "deposit", "cr_amount", "cr"];
    pub const BALANCE: &[&str] = &["closing_balance", "running_balance", "balance"];
    pub const DESCRIPTION: &[&str] = &["description", "narration", "particulars", "details"];
    pub const ACCOUNT_NAME: &[&str] = &["account_name", "ledger_name", "account", "ledger"];
    pub const ACCOUNT_CODE: &[&str] = &["account_code", "ledger_code", "code"];
}

/// Normalize a header for comparison: lowercase, non-alphanumerics collapsed
/// to single underscores. "Tax (18%)" -> "tax_18", "Invoice#" -> "invoice".
pub fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    for ch in header.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// True when `token` appears in `header` bounded by underscores or the
/// string edges. Keeps short aliases like "dr" from matching "address".
fn contains_token(header: &str, token: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = header[start..].find(token) {
        let begin = start + pos;
        let end = begin + token.len();
        let left_ok = begin == 0 || header.as_bytes()[begin - 1] == b'_';
        let right_ok = end == header.len() || header.as_bytes()[end] == b'_';
        if left_ok && right_ok {
            return true;
        }
        start = begin + token.len().max(1);
    }
    false
}

/// Resolve a field from a row given its alias list.
/// Exact normalized matches win; token-bounded containment is the fallback
/// that recovers headers like "Tax (18%)" or "Debit Amount (INR)".
pub fn resolve<'a>(row: &'a RowRecord, aliases: &[&str]) -> Option<&'a Value> {
    for alias in aliases {
        for (header, value) in row {
            if normalize_header(header) == *alias {
                return Some(value);
            }
        }
    }
    for alias in aliases {
        for (header, value) in row {
            if contains_token(&normalize_header(header), alias) {
                return Some(value);
            }
        }
    }
    None
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Extract a string field, trimmed; None when absent or blank.
pub fn field_str(row: &RowRecord, aliases: &[&str]) -> Option<String> {
    resolve(row, aliases).and_then(value_to_string)
}

/// Extract an amount field; absent or malformed cells count as zero.
pub fn field_amount(row: &RowRecord, aliases: &[&str]) -> Amount {
    match resolve(row, aliases) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => amount_or_zero(s),
        _ => 0.0,
    }
}

/// Extract a date field; None when absent or unparseable.
pub fn field_date(row: &RowRecord, aliases: &[&str]) -> Option<NaiveDate> {
    field_str(row, aliases).and_then(|s| parse_flexible_date(&s))
}

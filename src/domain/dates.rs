use chrono::NaiveDate;

/// Maximum day gap for two dates to be considered the same event.
/// Bank value dates routinely lag book dates by a day.
pub const DATE_TOLERANCE_DAYS: i64 = 1;

/// Parse a date cell in any of the formats the registers actually use.
/// Ambiguous numeric dates parse day-first, which is how the source
/// documents are written.
pub fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%d-%m-%Y",
        "%d/%m/%Y",
        "%Y/%m/%d",
        "%d-%b-%Y",
        "%d %b %Y",
        "%d-%m-%y",
        "%d/%m/%y",
    ];

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    // RFC 3339 / ISO timestamps: retry on the date part alone
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    if date_part != trimmed {
        for format in FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
                return Some(date);
            }
        }
    }

    None
}

/// Approximate date equality within `tolerance_days`.
pub fn dates_within(a: NaiveDate, b: NaiveDate, tolerance_days: i64) -> bool {
    (a - b).num_days().abs() <= tolerance_days
}

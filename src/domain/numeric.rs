use std::fmt;

/// Amounts flow through the reports as floats. The source material is
/// spreadsheet cells and currency-formatted strings with no common scale,
/// and every balance check in the reports uses a 0.01 tolerance.
pub type Amount = f64;

/// Tolerance under which two amounts are considered equal.
pub const AMOUNT_TOLERANCE: Amount = 0.01;

/// Parse a currency-formatted string into an amount.
/// Tolerates symbols and separators: "₹ 1,23,456.78" -> 123456.78,
/// "Rs. 500" -> 500.0, "(250.00)" -> -250.0.
/// Fails on blank or non-numeric input.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    // Accounting notation: parentheses mean negative
    let (body, parenthesized) =
        if let Some(inner) = trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            (inner, true)
        } else {
            (trimmed, false)
        };

    // Keep digits, decimal point and sign; drop currency symbols, letter
    // prefixes ("Rs", "INR", "Dr"), group separators and whitespace
    let mut cleaned = String::with_capacity(body.len());
    for ch in body.chars() {
        match ch {
            '0'..='9' | '.' => cleaned.push(ch),
            '-' if cleaned.is_empty() => cleaned.push(ch),
            ',' | ' ' | '\u{a0}' | '\'' => {}
            '₹' | '$' | '€' | '£' => {}
            c if c.is_alphabetic() => {}
            _ => return Err(ParseAmountError::InvalidFormat(input.to_string())),
        }
    }

    if cleaned.is_empty() || cleaned == "-" {
        return Err(ParseAmountError::InvalidFormat(input.to_string()));
    }

    let value: Amount = cleaned
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))?;

    Ok(if parenthesized { -value } else { value })
}

/// Parse an amount, treating blank or malformed cells as zero.
/// Aggregators fold thousands of loosely-typed cells; a bad cell must not
/// poison the whole report.
pub fn amount_or_zero(input: &str) -> Amount {
    parse_amount(input).unwrap_or(0.0)
}

/// Approximate equality within [`AMOUNT_TOLERANCE`].
pub fn approx_equal(a: Amount, b: Amount) -> bool {
    (a - b).abs() < AMOUNT_TOLERANCE
}

/// Round to two decimal places for report output.
pub fn round2(value: Amount) -> Amount {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "empty amount"),
            ParseAmountError::InvalidFormat(s) => write!(f, "invalid amount format: {}", s),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_amount("50.00"), Ok(50.0));
        assert_eq!(parse_amount("50"), Ok(50.0));
        assert_eq!(parse_amount("12.5"), Ok(12.5));
        assert_eq!(parse_amount("0.01"), Ok(0.01));
        assert_eq!(parse_amount("-250.75"), Ok(-250.75));
    }

    #[test]
    fn test_parse_currency_symbols() {
        assert_eq!(parse_amount("₹1500.00"), Ok(1500.0));
        assert_eq!(parse_amount("₹ 1500"), Ok(1500.0));
        assert_eq!(parse_amount("$99.99"), Ok(99.99));
        assert_eq!(parse_amount("Rs. 500"), Ok(500.0));
        assert_eq!(parse_amount("Rs 4,75,689"), Ok(475689.0));
        assert_eq!(parse_amount("INR 1200"), Ok(1200.0));
    }

    #[test]
    fn test_parse_group_separators() {
        // Indian grouping
        assert_eq!(parse_amount("1,23,456.78"), Ok(123456.78));
        // Western grouping
        assert_eq!(parse_amount("1,234,567.89"), Ok(1234567.89));
        assert_eq!(parse_amount("12 500.00"), Ok(12500.0));
    }

    #[test]
    fn test_parse_parenthesized_negative() {
        assert_eq!(parse_amount("(250.00)"), Ok(-250.0));
        assert_eq!(parse_amount("(₹1,000)"), Ok(-1000.0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("   ").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("TOTAL").is_err());
        assert!(parse_amount("12.34.56").is_err());
    }

    #[test]
    fn test_amount_or_zero() {
        assert_eq!(amount_or_zero("100.50"), 100.5);
        assert_eq!(amount_or_zero(""), 0.0);
        assert_eq!(amount_or_zero("n/a"), 0.0);
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(100.0, 100.0));
        assert!(approx_equal(100.0, 100.005));
        assert!(!approx_equal(100.0, 100.02));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.567), 10.57);
        assert_eq!(round2(10.564), 10.56);
        assert_eq!(round2(-2.678), -2.68);
    }
}

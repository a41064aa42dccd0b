//! Display formatting for amounts, dates and text.
//!
//! These mirror what the storefront shows: whole-unit currency amounts with
//! thousands separators and long-form US dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::CurrencyCode;

/// Error returned by [`format_date`] when the input is not a recognizable date.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date: {0}")]
pub struct DateFormatError(pub String);

/// Format an amount as currency with no fractional digits.
///
/// Rounds half away from zero and groups thousands with commas, e.g.
/// `1234.5` PKR → `"Rs 1,235"`. Negative amounts get a leading minus.
#[must_use]
pub fn format_currency(amount: Decimal, currency: CurrencyCode) -> String {
    let rounded = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().trunc().to_string();

    format!("{sign}{} {}", currency.symbol(), group_thousands(&digits))
}

/// Insert a comma every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format an ISO date or timestamp as e.g. `"June 5, 2025"`.
///
/// Accepts RFC 3339 timestamps (the date is taken in the timestamp's own
/// offset), naive `YYYY-MM-DDTHH:MM:SS` timestamps and plain `YYYY-MM-DD`
/// dates.
///
/// # Errors
///
/// Returns [`DateFormatError`] if the string matches none of those shapes.
pub fn format_date(date: &str) -> Result<String, DateFormatError> {
    let trimmed = date.trim();

    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| DateFormatError(date.to_owned()))?;

    Ok(format_naive_date(parsed))
}

/// Format a timestamp in any timezone as e.g. `"June 5, 2025"`.
#[must_use]
pub fn format_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String {
    format_naive_date(datetime.date_naive())
}

fn format_naive_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Truncate text to at most `max_length` characters, appending `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((byte_index, _)) => format!("{}...", text.get(..byte_index).unwrap_or(text)),
        None => text.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(Decimal::from(1000), CurrencyCode::PKR), "Rs 1,000");
        assert_eq!(format_currency(Decimal::from(2800), CurrencyCode::PKR), "Rs 2,800");
        assert_eq!(
            format_currency(Decimal::from(1_234_567), CurrencyCode::PKR),
            "Rs 1,234,567"
        );
        assert_eq!(format_currency(Decimal::from(999), CurrencyCode::PKR), "Rs 999");
        assert_eq!(format_currency(Decimal::ZERO, CurrencyCode::PKR), "Rs 0");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(Decimal::new(185, 1), CurrencyCode::PKR), "Rs 19");
        assert_eq!(format_currency(Decimal::new(1849, 2), CurrencyCode::PKR), "Rs 18");
        assert_eq!(format_currency(Decimal::new(-25, 1), CurrencyCode::PKR), "-Rs 3");
    }

    #[test]
    fn test_format_currency_other_symbols() {
        assert_eq!(format_currency(Decimal::from(5), CurrencyCode::USD), "$ 5");
        assert_eq!(format_currency(Decimal::new(-4, 1), CurrencyCode::GBP), "£ 0");
    }

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date("2025-06-05T10:00:00Z").unwrap(), "June 5, 2025");
        assert_eq!(format_date("2025-06-05T10:00:00.123Z").unwrap(), "June 5, 2025");
        assert_eq!(format_date("2025-12-31").unwrap(), "December 31, 2025");
        assert_eq!(format_date("2025-01-02T03:04:05").unwrap(), "January 2, 2025");
    }

    #[test]
    fn test_format_date_invalid() {
        assert_eq!(
            format_date("yesterday"),
            Err(DateFormatError("yesterday".to_string()))
        );
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(format_datetime(&dt), "March 9, 2024");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_text("a longer sentence", 8), "a longer...");
        assert_eq!(truncate_text("ñandú rosa", 5), "ñandú...");
    }
}

// Utility helpers for date parsing and console formatting.
//
// This module centralizes the "dirty" string/date handling so the rest of
// the code can assume clean, typed values.
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse a date-like string while being forgiving about the formats that
/// show up in extracts (`YYYY-MM-DD` and `DD/MM/YYYY`).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

/// Whole-calendar-month difference between two dates.
///
/// The day of month is ignored on purpose: the 31st of one month and the
/// 1st of the next are already one month apart. The expiry rule is defined
/// in these coarse terms.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

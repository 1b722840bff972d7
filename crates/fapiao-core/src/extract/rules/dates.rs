//! Invoice date extraction.

use chrono::Datelike;
use regex::Regex;
use tracing::trace;

use super::patterns::{DATE_ANY, DATE_CHINESE, DATE_LABELED};
use crate::normalize::parse_date;

/// Ordered date patterns: labeled 开票日期 (with OCR-mangled label
/// variants) first, then bare Chinese dates, then any separator date.
fn date_rules() -> [(&'static str, &'static Regex); 3] {
    [
        ("labeled", &DATE_LABELED),
        ("chinese", &DATE_CHINESE),
        ("any-separator", &DATE_ANY),
    ]
}

/// Extract the invoice date as an ISO `YYYY-MM-DD` string.
///
/// Every match of every pattern is validated against the real calendar and
/// the `min_year..=max_year` window; the first date surviving both checks
/// wins. OCR-confused separators are handled by the normalizer.
pub fn extract_invoice_date(text: &str, min_year: i32, max_year: i32) -> Option<String> {
    for (name, pattern) in date_rules() {
        for caps in pattern.captures_iter(text) {
            if let Some(date) = parse_date(&caps[1]) {
                if (min_year..=max_year).contains(&date.year()) {
                    trace!(rule = name, "date rule fired");
                    return Some(date.format("%Y-%m-%d").to_string());
                }
            }
        }
    }
    None
}

//! Normalization of OCR-noisy date and amount strings.
//!
//! OCR output for Chinese invoices routinely substitutes visually similar
//! characters for the date units: 洗 for the 年 separator and 晶 for 月 or
//! 日. The parsers here accept those confusions so a single misread glyph
//! does not lose the field.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

lazy_static! {
    // YYYY年MM月DD日 with OCR-confused units, also covers - and / separators.
    static ref DATE_UNITS: Regex =
        Regex::new(r"(\d{4})\s*[年洗/\-]\s*(\d{1,2})\s*[月晶/\-]\s*(\d{1,2})\s*[日晶]?").unwrap();

    // Fixed-width YYYYMMDD with no separator at all.
    static ref DATE_COMPACT: Regex = Regex::new(r"^\s*(\d{4})(\d{2})(\d{2})\s*$").unwrap();
}

/// Parse a date string into a calendar date, tolerating OCR confusions.
///
/// Returns `None` when the text holds no recognizable date or the digits do
/// not form a real calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let caps = DATE_UNITS.captures(raw).or_else(|| DATE_COMPACT.captures(raw))?;

    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalize a date string to ISO `YYYY-MM-DD`, zero-padding month and day.
///
/// On parse failure the original string is returned unchanged so the caller
/// can surface the raw value for manual entry. Idempotent over valid ISO
/// input.
pub fn normalize_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    }
}

/// Parse a currency string into a decimal, stripping currency marks and
/// thousands separators. Returns `None` on non-numeric content.
pub fn normalize_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '¥' | '￥' | ',' | '，') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

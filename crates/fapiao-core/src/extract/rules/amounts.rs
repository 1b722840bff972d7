//! Amount extraction: pre-tax amount, tax amount, and tax-inclusive total.
//!
//! Amounts are distinguished by nearby literal markers rather than by
//! magnitude: the 6% VAT rate splits a service-row into amount and tax, a
//! 合计 row carries the pre-tax/tax pair, and (小写) marks the
//! tax-inclusive total in figures.

use rust_decimal::Decimal;
use tracing::trace;

use super::patterns::{
    AMOUNT_RATE_ROW, AMOUNT_RATE_ROW_PRETAX, AMOUNT_RATE_SIMPLE, AMOUNT_SUBTOTAL_ROW,
    AMOUNT_TAX_LABELED, TOTAL_AFTER_WORDS_LABEL, TOTAL_FIGURES, TOTAL_FIGURES_STRICT,
    TOTAL_LABELED, TOTAL_WORDS_LINE,
};
use crate::normalize::normalize_amount;

/// Monetary fields recovered from raw text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmountFields {
    /// Pre-tax amount.
    pub amount: Option<Decimal>,
    /// Tax amount.
    pub tax_amount: Option<Decimal>,
    /// Tax-inclusive total (价税合计).
    pub total_amount: Option<Decimal>,
}

fn extract_tax(text: &str) -> Option<Decimal> {
    // Starred service row: amount, taxable base, 6%, tax.
    if let Some(caps) = AMOUNT_RATE_ROW.captures(text) {
        if let Some(tax) = normalize_amount(&caps[3]) {
            trace!(rule = "rate-row", "tax rule fired");
            return Some(tax);
        }
    }

    // Subtotal row: 合计 ￥amount ￥tax.
    if let Some(caps) = AMOUNT_SUBTOTAL_ROW.captures(text) {
        if let Some(tax) = normalize_amount(&caps[2]) {
            trace!(rule = "subtotal-row", "tax rule fired");
            return Some(tax);
        }
    }

    if let Some(caps) = AMOUNT_TAX_LABELED.captures(text) {
        if let Some(tax) = normalize_amount(&caps[1]) {
            trace!(rule = "labeled", "tax rule fired");
            return Some(tax);
        }
    }

    // Bare "amount 6% tax" fragment.
    if let Some(caps) = AMOUNT_RATE_SIMPLE.captures(text) {
        if let Some(tax) = normalize_amount(&caps[2]) {
            trace!(rule = "rate-simple", "tax rule fired");
            return Some(tax);
        }
    }

    None
}

fn extract_total(text: &str) -> Option<Decimal> {
    let candidates = [
        ("figures", TOTAL_FIGURES.captures(text)),
        ("after-words-label", TOTAL_AFTER_WORDS_LABEL.captures(text)),
        ("labeled", TOTAL_LABELED.captures(text)),
        ("words-line", TOTAL_WORDS_LINE.captures(text)),
    ];

    for (name, caps) in candidates {
        if let Some(caps) = caps {
            if let Some(total) = normalize_amount(&caps[1]) {
                trace!(rule = name, "total rule fired");
                return Some(total);
            }
        }
    }

    // Last resort: the strict (小写)¥NNN rendering.
    TOTAL_FIGURES_STRICT
        .captures(text)
        .and_then(|caps| normalize_amount(&caps[1]))
}

fn extract_pre_tax(text: &str) -> Option<Decimal> {
    // The pre-tax amount comes from the same rows that carry the tax.
    if let Some(caps) = AMOUNT_RATE_ROW_PRETAX.captures(text) {
        if let Some(amount) = normalize_amount(&caps[1]) {
            trace!(rule = "rate-row", "amount rule fired");
            return Some(amount);
        }
    }

    if let Some(caps) = AMOUNT_SUBTOTAL_ROW.captures(text) {
        if let Some(amount) = normalize_amount(&caps[1]) {
            trace!(rule = "subtotal-row", "amount rule fired");
            return Some(amount);
        }
    }

    None
}

/// Extract all monetary fields from raw invoice text.
pub fn extract_amounts(text: &str) -> AmountFields {
    AmountFields {
        amount: extract_pre_tax(text),
        tax_amount: extract_tax(text),
        total_amount: extract_total(text),
    }
}

//! Invoice content (goods/services description) extraction.

use super::patterns::{
    CONTENT_FEE, CONTENT_GOODS_SUFFIX, CONTENT_LABELED, CONTENT_SERVICE_KEYWORD, CONTENT_STARRED,
    CONTENT_TECH_FEE,
};
use super::{first_plausible, CandidateRule};

fn collapse(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn starred(text: &str) -> Option<String> {
    CONTENT_STARRED.captures(text).map(|c| collapse(&c[1]))
}

fn labeled(text: &str) -> Option<String> {
    CONTENT_LABELED.captures(text).map(|c| collapse(&c[1]))
}

fn tech_fee_line(text: &str) -> Option<String> {
    CONTENT_TECH_FEE.captures(text).map(|c| collapse(&c[1]))
}

fn fee_line(text: &str) -> Option<String> {
    CONTENT_FEE.captures(text).map(|c| collapse(&c[1]))
}

fn service_keyword_line(text: &str) -> Option<String> {
    CONTENT_SERVICE_KEYWORD.captures(text).map(|c| collapse(&c[1]))
}

fn goods_suffix_line(text: &str) -> Option<String> {
    CONTENT_GOODS_SUFFIX.captures(text).map(|c| collapse(&c[1]))
}

/// Ordered candidates: star-quoted categories, then labeled fields, then
/// progressively looser keyword lines.
static RULES: &[CandidateRule<String>] = &[
    CandidateRule { name: "starred", apply: starred },
    CandidateRule { name: "labeled", apply: labeled },
    CandidateRule { name: "tech-fee-line", apply: tech_fee_line },
    CandidateRule { name: "fee-line", apply: fee_line },
    CandidateRule { name: "service-keyword-line", apply: service_keyword_line },
    CandidateRule { name: "goods-suffix-line", apply: goods_suffix_line },
];

/// Extract the invoice content; whitespace is collapsed and matches
/// shorter than `min_length` characters are rejected.
pub fn extract_invoice_content(text: &str, min_length: usize) -> Option<String> {
    first_plausible(RULES, text, |c| c.chars().count() >= min_length)
}

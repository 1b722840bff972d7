//! Invoice number extraction.

use super::patterns::{
    NUMBER_BARE_LONG, NUMBER_LABELED, NUMBER_LABELED_LONG, NUMBER_LOOSE, NUMBER_SUFFIX_LABEL,
};
use super::{first_plausible, CandidateRule};

fn labeled_long(text: &str) -> Option<String> {
    NUMBER_LABELED_LONG.captures(text).map(|c| c[1].to_string())
}

fn labeled(text: &str) -> Option<String> {
    NUMBER_LABELED.captures(text).map(|c| c[1].to_string())
}

fn bare_long(text: &str) -> Option<String> {
    NUMBER_BARE_LONG.captures(text).map(|c| c[1].to_string())
}

fn loose_label(text: &str) -> Option<String> {
    NUMBER_LOOSE.captures(text).map(|c| c[1].to_string())
}

fn suffix_label(text: &str) -> Option<String> {
    NUMBER_SUFFIX_LABEL.captures(text).map(|c| c[1].to_string())
}

/// Ordered candidates: an explicit 发票号码 label wins over a bare 20-digit
/// run, which wins over loose 号/号码 labels.
static RULES: &[CandidateRule<String>] = &[
    CandidateRule { name: "labeled-long", apply: labeled_long },
    CandidateRule { name: "labeled", apply: labeled },
    CandidateRule { name: "bare-long", apply: bare_long },
    CandidateRule { name: "loose-label", apply: loose_label },
    CandidateRule { name: "suffix-label", apply: suffix_label },
];

/// Extract the invoice number: a digit run of at least `min_length`.
pub fn extract_invoice_number(text: &str, min_length: usize) -> Option<String> {
    first_plausible(RULES, text, |n| {
        n.len() >= min_length && n.chars().all(|c| c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labeled_twenty_digit_number() {
        let text = "电子发票（普通发票）\n发票号码：12345678901234567890\n开票日期：2025年03月20日";
        assert_eq!(
            extract_invoice_number(text, 8),
            Some("12345678901234567890".to_string())
        );
    }

    #[test]
    fn test_labeled_eight_digit_number() {
        assert_eq!(
            extract_invoice_number("发票号码: 25339527", 8),
            Some("25339527".to_string())
        );
    }

    #[test]
    fn test_bare_long_run_without_label() {
        let text = "某某发票\n24312000000012345678\n其他内容";
        assert_eq!(
            extract_invoice_number(text, 8),
            Some("24312000000012345678".to_string())
        );
    }

    #[test]
    fn test_loose_label_fallback() {
        assert_eq!(
            extract_invoice_number("发票代码与号码：87654321", 8),
            Some("87654321".to_string())
        );
    }

    #[test]
    fn test_short_runs_rejected() {
        assert_eq!(extract_invoice_number("发票号码：1234567", 8), None);
        assert_eq!(extract_invoice_number("金额 123.45", 8), None);
    }
}

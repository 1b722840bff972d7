//! Seller and buyer company-name extraction.
//!
//! Party names are the noisiest fields on OCR'd invoices: role labels run
//! into the name, columns interleave, and names truncate mid-word. Each
//! label-anchored capture therefore goes through a cleanup pass that strips
//! role-label noise and, when a company suffix is present, re-extracts the
//! longest company-shaped substring (truncated fragments are shorter than
//! complete names, so longest wins).

use regex::Regex;
use tracing::trace;

use super::patterns::{
    BUYER_AFTER_LABEL, BUYER_CITY_COMPANY, BUYER_FULL_LABEL, BUYER_RECEIVER, BUYER_SECTION,
    BUYER_SHORT_LABEL, BUYER_SPLIT_LABEL, COMPANY_CORE, NAME_LEADING_NOISE, NAME_TRAILING_NOISE,
    SELLER_COMPANY_LINE, SELLER_FULL_LABEL, SELLER_ISSUER, SELLER_SECTION, SELLER_SHORT_LABEL,
    SELLER_SPLIT_LABEL,
};

fn seller_rules() -> [(&'static str, &'static Regex); 6] {
    [
        ("split-label", &SELLER_SPLIT_LABEL),
        ("full-label", &SELLER_FULL_LABEL),
        ("section", &SELLER_SECTION),
        ("issuer", &SELLER_ISSUER),
        ("short-label", &SELLER_SHORT_LABEL),
        ("company-line", &SELLER_COMPANY_LINE),
    ]
}

fn buyer_rules() -> [(&'static str, &'static Regex); 7] {
    [
        ("split-label", &BUYER_SPLIT_LABEL),
        ("full-label", &BUYER_FULL_LABEL),
        ("section", &BUYER_SECTION),
        ("receiver", &BUYER_RECEIVER),
        ("short-label", &BUYER_SHORT_LABEL),
        ("after-label", &BUYER_AFTER_LABEL),
        ("city-company", &BUYER_CITY_COMPANY),
    ]
}

/// Strip role-label noise, re-extract the longest company-suffix substring,
/// and drop remaining whitespace.
fn clean_name(raw: &str) -> String {
    let no_lead = NAME_LEADING_NOISE.replace(raw.trim(), "");
    let name = NAME_TRAILING_NOISE.replace(no_lead.as_ref(), "");

    let best = COMPANY_CORE
        .find_iter(name.as_ref())
        .map(|m| m.as_str())
        .max_by_key(|c| c.chars().count())
        .unwrap_or(name.as_ref());

    best.split_whitespace().collect::<String>()
}

fn extract_party(
    rules: &[(&'static str, &'static Regex)],
    text: &str,
    min_length: usize,
) -> Option<String> {
    for (name, pattern) in rules {
        for caps in pattern.captures_iter(text) {
            let cleaned = clean_name(&caps[1]);
            if cleaned.chars().count() >= min_length {
                trace!(rule = name, "party rule fired");
                return Some(cleaned);
            }
        }
    }
    None
}

/// Extract the seller company name.
pub fn extract_seller_name(text: &str, min_length: usize) -> Option<String> {
    extract_party(&seller_rules(), text, min_length)
}

/// Extract the buyer company name.
pub fn extract_buyer_name(text: &str, min_length: usize) -> Option<String> {
    extract_party(&buyer_rules(), text, min_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labeled_seller() {
        let text = "销售方名称：北京快快科技有限公司 统一社会信用代码/纳税人识别号：91110108MA01E8JU7C";
        assert_eq!(
            extract_seller_name(text, 3),
            Some("北京快快科技有限公司".to_string())
        );
    }

    #[test]
    fn test_split_label_with_noise() {
        // OCR split the 销售方 label and glued role noise onto the name.
        let text = "售方 名称：称北京快快科技有限公司\n纳税人识别号：91110108MA01E8JU7C";
        assert_eq!(
            extract_seller_name(text, 3),
            Some("北京快快科技有限公司".to_string())
        );
    }

    #[test]
    fn test_longest_company_substring_wins() {
        // The capture carries trailing column noise; the company core is
        // re-extracted and the longest fragment kept.
        let text = "购买方名称：上海商贸 上海宏远商贸有限公司 销售方";
        assert_eq!(
            extract_buyer_name(text, 3),
            Some("上海宏远商贸有限公司".to_string())
        );
    }

    #[test]
    fn test_buyer_city_company_fallback() {
        let text = "北京某某文化传播有限公司 统一社会信用代码/纳税人识别号：91110105MA00ABCD12";
        assert_eq!(
            extract_buyer_name(text, 3),
            Some("北京某某文化传播有限公司".to_string())
        );
    }

    #[test]
    fn test_too_short_names_rejected() {
        assert_eq!(extract_seller_name("销售方名称：公司", 3), None);
        assert_eq!(extract_seller_name("没有相关信息", 3), None);
    }
}

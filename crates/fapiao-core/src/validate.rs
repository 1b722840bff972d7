//! Field-level validation of extracted records.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::invoice::InvoiceData;

lazy_static! {
    // Unified social credit code (18) or legacy taxpayer id (15).
    static ref TAX_ID_SHAPE: Regex = Regex::new(r"^[A-Z0-9]{15,18}$").unwrap();
}

/// An invoice number is a digit run of at least `min_length`.
pub fn validate_invoice_number(number: &str, min_length: usize) -> bool {
    number.len() >= min_length && number.bytes().all(|b| b.is_ascii_digit())
}

/// Check the shape of a tax id (15 to 18 uppercase alphanumerics).
pub fn validate_tax_id(tax_id: &str) -> bool {
    TAX_ID_SHAPE.is_match(tax_id)
}

/// Fuzzy company-name comparison, tolerant of OCR truncation: names match
/// when one contains the other after whitespace removal.
pub fn validate_company_match(extracted: &str, expected: &str) -> bool {
    let a: String = extracted.split_whitespace().collect();
    let b: String = expected.split_whitespace().collect();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Validate a finished record, returning one message per issue found.
///
/// Empty fields are not issues (the record schema allows them); only
/// present-but-malformed values and inconsistent amounts are reported.
pub fn validate_record(record: &InvoiceData, tolerance: Decimal) -> Vec<String> {
    let mut issues = Vec::new();

    if !record.invoice_number.is_empty() && !validate_invoice_number(&record.invoice_number, 8) {
        issues.push(format!("invoice number is malformed: {}", record.invoice_number));
    }
    if !record.seller_tax_id.is_empty() && !validate_tax_id(&record.seller_tax_id) {
        issues.push(format!("seller tax id is malformed: {}", record.seller_tax_id));
    }
    if !record.buyer_tax_id.is_empty() && !validate_tax_id(&record.buyer_tax_id) {
        issues.push(format!("buyer tax id is malformed: {}", record.buyer_tax_id));
    }
    if !record.amounts_consistent(tolerance) {
        issues.push("total does not equal amount plus tax".to_string());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_invoice_number_shape() {
        assert!(validate_invoice_number("25339527", 8));
        assert!(validate_invoice_number("12345678901234567890", 8));
        assert!(!validate_invoice_number("2533952", 8));
        assert!(!validate_invoice_number("25339A27", 8));
    }

    #[test]
    fn test_tax_id_shape() {
        assert!(validate_tax_id("91110108MA01E8JU7C"));
        assert!(validate_tax_id("110108600037341"));
        assert!(!validate_tax_id("91110108"));
        assert!(!validate_tax_id("91110108ma01e8ju7c"));
    }

    #[test]
    fn test_company_match_tolerates_truncation() {
        assert!(validate_company_match("北京快快科技", "北京快快科技有限公司"));
        assert!(validate_company_match("北京 快快科技有限公司", "北京快快科技有限公司"));
        assert!(!validate_company_match("上海宏远商贸有限公司", "北京快快科技有限公司"));
        assert!(!validate_company_match("", "北京快快科技有限公司"));
    }

    #[test]
    fn test_record_issues() {
        let record = InvoiceData {
            invoice_number: "25339527".to_string(),
            seller_tax_id: "bad-id".to_string(),
            amount: Decimal::from_str("100.00").ok(),
            tax_amount: Decimal::from_str("6.00").ok(),
            total_amount: Decimal::from_str("200.00").ok(),
            ..Default::default()
        };

        let issues = validate_record(&record, Decimal::new(1, 2));
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("seller tax id"));
        assert!(issues[1].contains("total"));
    }

    #[test]
    fn test_empty_record_has_no_issues() {
        let issues = validate_record(&InvoiceData::default(), Decimal::new(1, 2));
        assert!(issues.is_empty());
    }
}

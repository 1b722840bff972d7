//! Invoice type classification.

use crate::models::invoice::InvoiceType;

/// Keyword sets in fixed priority order. Electronic/travel keywords come
/// first; 专用 must be checked before 普通 so that text containing
/// "增值税专用发票" is not swallowed by the general pattern.
static KEYWORDS: &[(InvoiceType, &[&str])] = &[
    (InvoiceType::Electronic, &["电子发票", "电子普通发票", "滴滴", "出行"]),
    (InvoiceType::VatSpecial, &["增值税专用发票", "专用发票"]),
    (InvoiceType::VatGeneral, &["增值税普通发票", "普通发票"]),
    (InvoiceType::Paper, &["纸质发票"]),
];

/// Classify the invoice type from raw text.
///
/// Falls back to broader context when no keyword matches: 电子-flavored
/// text is electronic, anything mentioning 增值税 is a general VAT
/// invoice, everything else is [`InvoiceType::Other`].
pub fn classify_invoice_type(text: &str) -> InvoiceType {
    for (invoice_type, keywords) in KEYWORDS {
        if keywords.iter().any(|k| text.contains(k)) {
            return *invoice_type;
        }
    }

    if ["电子", "滴滴", "出行"].iter().any(|k| text.contains(k)) {
        InvoiceType::Electronic
    } else if text.contains("增值税") {
        InvoiceType::VatGeneral
    } else {
        InvoiceType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_electronic_keywords_win() {
        assert_eq!(classify_invoice_type("电子发票（普通发票）"), InvoiceType::Electronic);
        assert_eq!(classify_invoice_type("滴滴出行行程单"), InvoiceType::Electronic);
    }

    #[test]
    fn test_special_checked_before_general() {
        // Contains both 专用 and the substring that the general pattern
        // would otherwise match.
        assert_eq!(classify_invoice_type("增值税专用发票"), InvoiceType::VatSpecial);
        assert_eq!(classify_invoice_type("增值税普通发票"), InvoiceType::VatGeneral);
    }

    #[test]
    fn test_context_fallback() {
        assert_eq!(classify_invoice_type("电子行程单"), InvoiceType::Electronic);
        assert_eq!(classify_invoice_type("增值税征收"), InvoiceType::VatGeneral);
        assert_eq!(classify_invoice_type("收据"), InvoiceType::Other);
    }
}

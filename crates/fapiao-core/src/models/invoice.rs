//! Canonical invoice record produced by the extraction core.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Type of invoice document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceType {
    /// Special VAT invoice (增值税专用发票, input-tax deductible).
    VatSpecial,
    /// General VAT invoice (增值税普通发票).
    VatGeneral,
    /// Electronic invoice (电子发票).
    Electronic,
    /// Paper invoice (纸质发票).
    Paper,
    /// Anything that could not be classified.
    #[default]
    Other,
}

impl InvoiceType {
    /// Classify from a provider's type label (e.g. "增值税专用发票").
    ///
    /// Providers always report some VAT invoice type, so the fallback is
    /// the general invoice rather than [`InvoiceType::Other`].
    pub fn from_provider_label(label: &str) -> Self {
        if label.contains("专用") {
            InvoiceType::VatSpecial
        } else {
            InvoiceType::VatGeneral
        }
    }
}

/// Source document kind, as reported by the upstream OCR step.
///
/// Only used to select which raw-text path ran upstream; the extraction
/// core itself is format-agnostic once text is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Image,
    Pdf,
}

/// A fully normalized invoice record.
///
/// Every field is always present when serialized: unresolved string fields
/// are empty strings and unresolved amounts serialize as `""`, never null.
/// The record is constructed once per extraction call and not mutated
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceData {
    /// Invoice number, a digit run of at least 8 characters.
    pub invoice_number: String,

    /// Description of the invoiced goods or services.
    pub invoice_content: String,

    /// Invoice date as ISO `YYYY-MM-DD`, or the raw OCR string when the
    /// date could not be parsed (kept for manual review).
    pub invoice_date: String,

    /// Classified invoice type.
    pub invoice_type: InvoiceType,

    /// Pre-tax amount.
    #[serde(with = "amount_field")]
    pub amount: Option<Decimal>,

    /// Tax amount.
    #[serde(with = "amount_field")]
    pub tax_amount: Option<Decimal>,

    /// Tax-inclusive total (价税合计).
    #[serde(with = "amount_field")]
    pub total_amount: Option<Decimal>,

    /// Seller company name.
    pub seller_name: String,

    /// Seller unified social credit code / taxpayer id.
    pub seller_tax_id: String,

    /// Buyer company name.
    pub buyer_name: String,

    /// Buyer unified social credit code / taxpayer id.
    pub buyer_tax_id: String,
}

impl InvoiceData {
    /// Completeness bar for auto-commit: invoice number, pre-tax amount and
    /// invoice date must all be resolved. Everything else may be filled in
    /// by a human later.
    pub fn is_complete(&self) -> bool {
        !self.invoice_number.is_empty() && self.amount.is_some() && !self.invoice_date.is_empty()
    }

    /// Check `total_amount == amount + tax_amount` within the given
    /// tolerance. Trivially true unless all three amounts are present.
    pub fn amounts_consistent(&self, tolerance: Decimal) -> bool {
        match (self.amount, self.tax_amount, self.total_amount) {
            (Some(amount), Some(tax), Some(total)) => (total - (amount + tax)).abs() <= tolerance,
            _ => true,
        }
    }
}

/// Intermediate record built up as extraction rules fire.
///
/// Same shape as [`InvoiceData`] but every field optional; becomes a record
/// via [`ExtractionCandidate::into_record`].
#[derive(Debug, Clone, Default)]
pub struct ExtractionCandidate {
    pub invoice_number: Option<String>,
    pub invoice_content: Option<String>,
    pub invoice_date: Option<String>,
    pub invoice_type: Option<InvoiceType>,
    pub amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub seller_name: Option<String>,
    pub seller_tax_id: Option<String>,
    pub buyer_name: Option<String>,
    pub buyer_tax_id: Option<String>,
}

impl ExtractionCandidate {
    /// True if no rule resolved any field at all.
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.invoice_content.is_none()
            && self.invoice_date.is_none()
            && self.invoice_type.is_none()
            && self.amount.is_none()
            && self.tax_amount.is_none()
            && self.total_amount.is_none()
            && self.seller_name.is_none()
            && self.seller_tax_id.is_none()
            && self.buyer_name.is_none()
            && self.buyer_tax_id.is_none()
    }

    /// Finalize into a record: unresolved strings become empty, the total
    /// is derived from amount + tax when absent.
    pub fn into_record(self) -> InvoiceData {
        let total_amount = self.total_amount.or(match (self.amount, self.tax_amount) {
            (Some(amount), Some(tax)) => Some(amount + tax),
            _ => None,
        });

        InvoiceData {
            invoice_number: self.invoice_number.unwrap_or_default(),
            invoice_content: self.invoice_content.unwrap_or_default(),
            invoice_date: self.invoice_date.unwrap_or_default(),
            invoice_type: self.invoice_type.unwrap_or_default(),
            amount: self.amount,
            tax_amount: self.tax_amount,
            total_amount,
            seller_name: self.seller_name.unwrap_or_default(),
            seller_tax_id: self.seller_tax_id.unwrap_or_default(),
            buyer_name: self.buyer_name.unwrap_or_default(),
            buyer_tax_id: self.buyer_tax_id.unwrap_or_default(),
        }
    }
}

/// Serde adapter for optional amounts: `None` serializes as an empty string
/// so the flat JSON record never contains null.
mod amount_field {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &Option<Decimal>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => Serialize::serialize(d, ser),
            None => ser.serialize_str(""),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(Decimal),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Decimal>, D::Error> {
        match Raw::deserialize(de)? {
            Raw::Number(d) => Ok(Some(d)),
            Raw::Text(s) if s.trim().is_empty() => Ok(None),
            Raw::Text(s) => Decimal::from_str(s.trim())
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_serialized_record_has_no_nulls() {
        let record = InvoiceData::default();
        let json = serde_json::to_value(&record).unwrap();
        let map = json.as_object().unwrap();

        assert_eq!(map.len(), 11);
        for (key, value) in map {
            assert!(!value.is_null(), "field {} serialized as null", key);
        }
        assert_eq!(map["amount"], serde_json::json!(""));
        assert_eq!(map["invoice_type"], serde_json::json!("OTHER"));
    }

    #[test]
    fn test_record_round_trip() {
        let record = InvoiceData {
            invoice_number: "12345678901234567890".to_string(),
            amount: Some(dec("100.00")),
            invoice_date: "2025-03-20".to_string(),
            invoice_type: InvoiceType::VatSpecial,
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: InvoiceData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_total_derived_from_amount_and_tax() {
        let candidate = ExtractionCandidate {
            amount: Some(dec("100.00")),
            tax_amount: Some(dec("6.00")),
            ..Default::default()
        };

        let record = candidate.into_record();
        assert_eq!(record.total_amount, Some(dec("106.00")));
        assert!(record.amounts_consistent(dec("0.01")));
    }

    #[test]
    fn test_completeness_policy() {
        let mut record = InvoiceData {
            invoice_number: "25123456".to_string(),
            amount: Some(dec("88.00")),
            invoice_date: "2024-11-02".to_string(),
            ..Default::default()
        };
        // Missing seller_tax_id (and every other party field) is still complete.
        assert!(record.is_complete());

        record.invoice_date.clear();
        assert!(!record.is_complete());
    }

    #[test]
    fn test_provider_type_label() {
        assert_eq!(
            InvoiceType::from_provider_label("增值税专用发票"),
            InvoiceType::VatSpecial
        );
        assert_eq!(
            InvoiceType::from_provider_label("增值税普通发票"),
            InvoiceType::VatGeneral
        );
        assert_eq!(
            InvoiceType::from_provider_label("区块链电子发票"),
            InvoiceType::VatGeneral
        );
    }
}

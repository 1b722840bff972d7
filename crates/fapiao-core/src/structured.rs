//! Mapping of provider-structured recognition results to the canonical
//! candidate.
//!
//! Recognition providers return a flat map of named fields (`InvoiceNum`,
//! `TotalAmount`, ...). Values are strings except for line-item fields,
//! which may arrive as a list. The mapper is total: unknown keys are
//! ignored, missing keys leave the candidate field unset, and malformed
//! amounts or dates fall back to unset rather than failing the call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::invoice::{ExtractionCandidate, InvoiceType};
use crate::normalize::{normalize_amount, normalize_date};

/// A single provider field value: a plain string, or a list of strings for
/// multi-row fields such as commodity names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Flatten to a single string; list values are joined with `", "`.
    fn joined(&self) -> String {
        match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Structured fields as returned by a recognition provider.
pub type ProviderFields = HashMap<String, FieldValue>;

fn text_field(fields: &ProviderFields, key: &str) -> Option<String> {
    fields.get(key).map(FieldValue::joined).filter(|s| !s.is_empty())
}

/// Map provider fields to an extraction candidate.
///
/// Dates are normalized to ISO form (raw value kept when unparseable) and
/// amounts go through the same normalizer as the raw-text path, so currency
/// marks and thousands separators in provider output are tolerated.
pub fn map_provider_fields(fields: &ProviderFields) -> ExtractionCandidate {
    let invoice_type = text_field(fields, "InvoiceType").map(|label| {
        let kind = InvoiceType::from_provider_label(&label);
        trace!(label = %label, ?kind, "classified provider invoice type");
        kind
    });

    ExtractionCandidate {
        invoice_number: text_field(fields, "InvoiceNum"),
        invoice_content: text_field(fields, "CommodityName"),
        invoice_date: text_field(fields, "InvoiceDate").map(|d| normalize_date(&d)),
        invoice_type: invoice_type.or(Some(InvoiceType::VatGeneral)),
        amount: text_field(fields, "TotalAmount").and_then(|v| normalize_amount(&v)),
        tax_amount: text_field(fields, "TotalTax").and_then(|v| normalize_amount(&v)),
        total_amount: text_field(fields, "AmountInFiguers").and_then(|v| normalize_amount(&v)),
        seller_name: text_field(fields, "SellerName"),
        seller_tax_id: text_field(fields, "SellerRegisterNum"),
        buyer_name: text_field(fields, "PurchaserName"),
        buyer_tax_id: text_field(fields, "PurchaserRegisterNum"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn sample_fields() -> ProviderFields {
        let mut fields = ProviderFields::new();
        fields.insert("InvoiceNum".into(), text("25339527"));
        fields.insert("InvoiceDate".into(), text("2025年03月20日"));
        fields.insert("InvoiceType".into(), text("增值税专用发票"));
        fields.insert("TotalAmount".into(), text("390.38"));
        fields.insert("TotalTax".into(), text("23.42"));
        fields.insert("AmountInFiguers".into(), text("413.80"));
        fields.insert("SellerName".into(), text("北京快快科技有限公司"));
        fields.insert("SellerRegisterNum".into(), text("91110108MA01E8JU7C"));
        fields.insert("PurchaserName".into(), text("上海宏远商贸有限公司"));
        fields.insert("PurchaserRegisterNum".into(), text("91310115MA1K4EX234"));
        fields.insert("CommodityName".into(), text("餐饮服务"));
        fields
    }

    #[test]
    fn test_full_mapping() {
        let candidate = map_provider_fields(&sample_fields());

        assert_eq!(candidate.invoice_number.as_deref(), Some("25339527"));
        assert_eq!(candidate.invoice_date.as_deref(), Some("2025-03-20"));
        assert_eq!(candidate.invoice_type, Some(InvoiceType::VatSpecial));
        assert_eq!(candidate.amount, Some(Decimal::new(39038, 2)));
        assert_eq!(candidate.tax_amount, Some(Decimal::new(2342, 2)));
        assert_eq!(candidate.total_amount, Some(Decimal::new(41380, 2)));
        assert_eq!(candidate.seller_name.as_deref(), Some("北京快快科技有限公司"));
        assert_eq!(candidate.buyer_tax_id.as_deref(), Some("91310115MA1K4EX234"));
    }

    #[test]
    fn test_commodity_list_joined() {
        let mut fields = ProviderFields::new();
        fields.insert(
            "CommodityName".into(),
            FieldValue::List(vec!["住宿服务".into(), "餐饮服务".into()]),
        );

        let candidate = map_provider_fields(&fields);
        assert_eq!(
            candidate.invoice_content.as_deref(),
            Some("住宿服务, 餐饮服务")
        );
    }

    #[test]
    fn test_missing_type_defaults_to_general() {
        let fields = ProviderFields::new();
        let candidate = map_provider_fields(&fields);
        assert_eq!(candidate.invoice_type, Some(InvoiceType::VatGeneral));
        assert!(candidate.invoice_number.is_none());
    }

    #[test]
    fn test_malformed_amount_left_unset() {
        let mut fields = ProviderFields::new();
        fields.insert("TotalAmount".into(), text("不适用"));
        let candidate = map_provider_fields(&fields);
        assert_eq!(candidate.amount, None);
    }

    #[test]
    fn test_unparseable_date_kept_raw() {
        let mut fields = ProviderFields::new();
        fields.insert("InvoiceDate".into(), text("日期不详"));
        let candidate = map_provider_fields(&fields);
        assert_eq!(candidate.invoice_date.as_deref(), Some("日期不详"));
    }
}

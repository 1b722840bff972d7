//! Extraction orchestrator.
//!
//! Field resolution is two-phase: provider-structured fields (when the
//! caller has them) are mapped first, then rule-based extraction over the
//! raw text fills whatever the provider left unresolved. Structured values
//! always win because providers see the original image, not the
//! possibly-mangled text the rules see.

use std::time::Instant;

use chrono::{Datelike, Utc};
use tracing::{debug, info};

use crate::dedup::{DuplicateChecker, InvoiceLookup};
use crate::error::{ExtractionError, Result};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{DocumentKind, ExtractionCandidate, InvoiceData};
use crate::structured::{map_provider_fields, ProviderFields};
use crate::validate::validate_record;

use super::rules::{
    classify_invoice_type, extract_amounts, extract_buyer_name, extract_invoice_content,
    extract_invoice_date, extract_invoice_number, extract_seller_name, extract_tax_ids,
};

/// Result of a single extraction call.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// The finalized invoice record.
    pub invoice: InvoiceData,
    /// The raw text the rules ran over, kept for manual review.
    pub raw_text: String,
    /// One message per unresolved or malformed field.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Outcome of processing an invoice against a record store.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Not seen before; safe to store.
    Fresh(ExtractionReport),
    /// Matches an already-stored invoice.
    Duplicate(ExtractionReport),
}

/// Invoice field extractor.
#[derive(Debug, Clone, Default)]
pub struct InvoiceExtractor {
    config: ExtractionConfig,
}

impl InvoiceExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with the given configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract an invoice record from raw text plus optional
    /// provider-structured fields.
    ///
    /// Returns [`ExtractionError::NoData`] when neither source yields a
    /// single field.
    pub fn extract(
        &self,
        kind: DocumentKind,
        raw_text: &str,
        structured: Option<&ProviderFields>,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();

        info!(
            ?kind,
            chars = raw_text.chars().count(),
            structured = structured.is_some(),
            "extracting invoice fields"
        );

        let mut candidate = structured.map(map_provider_fields).unwrap_or_default();

        // A provider response that resolved nothing (the mapper still
        // defaults the type) counts as no structured input at all.
        {
            let mut probe = candidate.clone();
            probe.invoice_type = None;
            if probe.is_empty() {
                candidate = ExtractionCandidate::default();
            }
        }

        self.fill_from_text(&mut candidate, raw_text);

        if candidate.is_empty() {
            return Err(ExtractionError::NoData.into());
        }

        if candidate.invoice_type.is_none() {
            candidate.invoice_type = Some(classify_invoice_type(raw_text));
        }

        let invoice = candidate.into_record();
        let mut warnings = Vec::new();
        for (value, field) in [
            (&invoice.invoice_number, "invoice number"),
            (&invoice.invoice_date, "invoice date"),
            (&invoice.seller_name, "seller name"),
        ] {
            if value.is_empty() {
                warnings.push(format!("could not extract {field}"));
            }
        }
        if invoice.amount.is_none() {
            warnings.push("could not extract amount".to_string());
        }
        warnings.extend(validate_record(&invoice, self.config.amount_tolerance));

        debug!(
            invoice_number = %invoice.invoice_number,
            invoice_type = ?invoice.invoice_type,
            complete = invoice.is_complete(),
            warnings = warnings.len(),
            "extraction finished"
        );

        Ok(ExtractionReport {
            invoice,
            raw_text: raw_text.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Extract and check against a record store in one step.
    pub fn process(
        &self,
        kind: DocumentKind,
        raw_text: &str,
        structured: Option<&ProviderFields>,
        store: &dyn InvoiceLookup,
    ) -> Result<Outcome> {
        let report = self.extract(kind, raw_text, structured)?;

        let checker = DuplicateChecker::new(self.config.amount_tolerance);
        if checker.is_duplicate(store, &report.invoice) {
            info!(
                invoice_number = %report.invoice.invoice_number,
                "invoice already stored"
            );
            Ok(Outcome::Duplicate(report))
        } else {
            Ok(Outcome::Fresh(report))
        }
    }

    fn fill_from_text(&self, candidate: &mut ExtractionCandidate, text: &str) {
        let cfg = &self.config;

        if candidate.invoice_number.is_none() {
            candidate.invoice_number = extract_invoice_number(text, cfg.min_number_length);
        }
        if candidate.invoice_content.is_none() {
            candidate.invoice_content = extract_invoice_content(text, cfg.min_content_length);
        }
        if candidate.invoice_date.is_none() {
            // Future years are OCR misreads; invoices are never post-dated.
            let max_year = Utc::now().year();
            candidate.invoice_date = extract_invoice_date(text, cfg.min_year, max_year);
        }
        if candidate.seller_name.is_none() {
            candidate.seller_name = extract_seller_name(text, cfg.min_name_length);
        }
        if candidate.buyer_name.is_none() {
            candidate.buyer_name = extract_buyer_name(text, cfg.min_name_length);
        }

        let (seller_tax_id, buyer_tax_id) = extract_tax_ids(text);
        if candidate.seller_tax_id.is_none() {
            candidate.seller_tax_id = seller_tax_id;
        }
        if candidate.buyer_tax_id.is_none() {
            candidate.buyer_tax_id = buyer_tax_id;
        }

        let amounts = extract_amounts(text);
        candidate.amount = candidate.amount.or(amounts.amount);
        candidate.tax_amount = candidate.tax_amount.or(amounts.tax_amount);
        candidate.total_amount = candidate.total_amount.or(amounts.total_amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::{InvoiceKey, MemoryStore};
    use crate::models::invoice::InvoiceType;
    use crate::structured::FieldValue;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const SAMPLE_TEXT: &str = "\
电子发票（普通发票）
发票号码：25339527
开票日期：2025年03月20日
销售方名称：北京快快科技有限公司 统一社会信用代码/纳税人识别号：91110108MA01E8JU7C
购买方名称：上海宏远商贸有限公司 统一社会信用代码/纳税人识别号：91310115MA1K4EX234
*餐饮服务*餐饮服务 390.38 413.80 6% 23.42
合 计 ￥390.38 ￥23.42
价税合计（大写）☒肆佰壹拾叁圆捌角整 (小写)￥413.80";

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_full_text_extraction() {
        let extractor = InvoiceExtractor::new();
        let report = extractor
            .extract(DocumentKind::Image, SAMPLE_TEXT, None)
            .unwrap();

        let invoice = &report.invoice;
        assert_eq!(invoice.invoice_number, "25339527");
        assert_eq!(invoice.invoice_date, "2025-03-20");
        assert_eq!(invoice.invoice_type, InvoiceType::Electronic);
        assert_eq!(invoice.invoice_content, "餐饮服务");
        assert_eq!(invoice.amount, Some(dec("390.38")));
        assert_eq!(invoice.tax_amount, Some(dec("23.42")));
        assert_eq!(invoice.total_amount, Some(dec("413.80")));
        assert_eq!(invoice.seller_name, "北京快快科技有限公司");
        assert_eq!(invoice.seller_tax_id, "91110108MA01E8JU7C");
        assert_eq!(invoice.buyer_name, "上海宏远商贸有限公司");
        assert_eq!(invoice.buyer_tax_id, "91310115MA1K4EX234");

        assert!(invoice.is_complete());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_structured_fields_win_over_text() {
        let mut fields = ProviderFields::new();
        fields.insert(
            "InvoiceNum".into(),
            FieldValue::Text("99999999".to_string()),
        );
        fields.insert(
            "InvoiceType".into(),
            FieldValue::Text("增值税专用发票".to_string()),
        );

        let extractor = InvoiceExtractor::new();
        let report = extractor
            .extract(DocumentKind::Pdf, SAMPLE_TEXT, Some(&fields))
            .unwrap();

        // Provider number and type override the text rules; everything
        // else is filled from text.
        assert_eq!(report.invoice.invoice_number, "99999999");
        assert_eq!(report.invoice.invoice_type, InvoiceType::VatSpecial);
        assert_eq!(report.invoice.invoice_date, "2025-03-20");
        assert_eq!(report.invoice.amount, Some(dec("390.38")));
    }

    #[test]
    fn test_no_data_at_all() {
        let extractor = InvoiceExtractor::new();
        let err = extractor
            .extract(DocumentKind::Image, "乱码乱码", None)
            .unwrap_err();
        assert!(err.to_string().contains("no invoice data"));
    }

    #[test]
    fn test_empty_provider_map_falls_back_to_text() {
        let fields = ProviderFields::new();
        let extractor = InvoiceExtractor::new();
        let report = extractor
            .extract(DocumentKind::Image, SAMPLE_TEXT, Some(&fields))
            .unwrap();
        // The mapper's defaulted type must not survive an otherwise empty
        // provider response.
        assert_eq!(report.invoice.invoice_type, InvoiceType::Electronic);
    }

    #[test]
    fn test_partial_extraction_reports_warnings() {
        let extractor = InvoiceExtractor::new();
        let report = extractor
            .extract(DocumentKind::Image, "发票号码：25339527", None)
            .unwrap();

        assert_eq!(report.invoice.invoice_number, "25339527");
        assert!(!report.invoice.is_complete());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("invoice date")));
        assert!(report.warnings.iter().any(|w| w.contains("amount")));
    }

    #[test]
    fn test_process_detects_duplicate() {
        let extractor = InvoiceExtractor::new();
        let mut store = MemoryStore::new();

        let outcome = extractor
            .process(DocumentKind::Image, SAMPLE_TEXT, None, &store)
            .unwrap();
        let report = match outcome {
            Outcome::Fresh(report) => report,
            Outcome::Duplicate(_) => panic!("first sighting flagged as duplicate"),
        };
        store.insert(InvoiceKey::from(&report.invoice));

        let outcome = extractor
            .process(DocumentKind::Image, SAMPLE_TEXT, None, &store)
            .unwrap();
        assert!(matches!(outcome, Outcome::Duplicate(_)));
    }
}

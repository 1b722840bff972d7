//! Core library for Chinese VAT invoice (fapiao) processing.
//!
//! This crate provides:
//! - Normalization of OCR-noisy date and amount strings
//! - Rule-based field extraction from raw invoice text
//! - Mapping of provider-structured recognition results to the canonical schema
//! - Composite-key duplicate detection against an existing record store

pub mod dedup;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod structured;
pub mod validate;

pub use dedup::{DuplicateChecker, InvoiceKey, InvoiceLookup, MemoryStore};
pub use error::{ExtractionError, FapiaoError, Result};
pub use extract::{ExtractionReport, InvoiceExtractor, Outcome};
pub use models::config::ExtractionConfig;
pub use models::invoice::{DocumentKind, ExtractionCandidate, InvoiceData, InvoiceType};
pub use normalize::{normalize_amount, normalize_date, parse_date};
pub use structured::{map_provider_fields, FieldValue, ProviderFields};

//! Invoice field extraction.

mod extractor;
pub mod rules;

pub use extractor::{ExtractionReport, InvoiceExtractor, Outcome};

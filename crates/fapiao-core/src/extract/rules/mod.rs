//! Rule-based field extractors for Chinese VAT invoices.
//!
//! Each field has an ordered list of candidate rules, tried most-specific
//! first. The first candidate that matches and passes the field's
//! plausibility check wins; this precedence policy is deliberate, because
//! with OCR noise "first specific match" beats "all matches, pick longest".

pub mod amounts;
pub mod content;
pub mod dates;
pub mod invoice_type;
pub mod number;
pub mod parties;
pub mod patterns;
pub mod tax_ids;

pub use amounts::{extract_amounts, AmountFields};
pub use content::extract_invoice_content;
pub use dates::extract_invoice_date;
pub use invoice_type::classify_invoice_type;
pub use number::extract_invoice_number;
pub use parties::{extract_buyer_name, extract_seller_name};
pub use tax_ids::extract_tax_ids;

use tracing::trace;

/// A single extraction candidate: a pure function from raw text to an
/// optional value, with a name for diagnostics.
pub struct CandidateRule<T> {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<T>,
}

/// Evaluate rules in priority order; the first value passing the
/// plausibility check is returned and no further rules run.
pub fn first_plausible<T>(
    rules: &[CandidateRule<T>],
    text: &str,
    plausible: impl Fn(&T) -> bool,
) -> Option<T> {
    for rule in rules {
        if let Some(value) = (rule.apply)(text) {
            if plausible(&value) {
                trace!(rule = rule.name, "candidate rule fired");
                return Some(value);
            }
        }
    }
    None
}

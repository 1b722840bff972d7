//! Seller and buyer tax-id extraction.
//!
//! Tax ids (unified social credit code, 18 chars, or the older 15-char
//! taxpayer id) are laid out seller-first on VAT invoices, so document
//! order disambiguates which party an id belongs to.

use super::patterns::{TAX_ID_LABELED, TAX_ID_SELLER_LABEL, TAX_ID_SELLER_SECTION};
use super::{first_plausible, CandidateRule};

fn seller_section(text: &str) -> Option<String> {
    TAX_ID_SELLER_SECTION.captures(text).map(|c| c[1].to_string())
}

fn seller_label(text: &str) -> Option<String> {
    TAX_ID_SELLER_LABEL.captures(text).map(|c| c[1].to_string())
}

fn first_labeled(text: &str) -> Option<String> {
    // The first labeled occurrence in the document is the seller's.
    TAX_ID_LABELED.captures(text).map(|c| c[1].to_string())
}

static SELLER_RULES: &[CandidateRule<String>] = &[
    CandidateRule { name: "seller-section", apply: seller_section },
    CandidateRule { name: "seller-label", apply: seller_label },
    CandidateRule { name: "first-labeled", apply: first_labeled },
];

/// Extract `(seller_tax_id, buyer_tax_id)` from raw text.
///
/// The seller id comes from seller-anchored patterns (or the first labeled
/// occurrence); the second labeled occurrence is the buyer's. A single id
/// with the seller still unresolved is assigned to the buyer, since the
/// seller id is normally caught by the more specific patterns first.
pub fn extract_tax_ids(text: &str) -> (Option<String>, Option<String>) {
    let seller = first_plausible(SELLER_RULES, text, |_| true);

    let all: Vec<String> = TAX_ID_LABELED
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect();

    let buyer = if all.len() >= 2 {
        Some(all[1].clone())
    } else if all.len() == 1 && seller.is_none() {
        Some(all[0].clone())
    } else {
        None
    };

    (seller, buyer)
}

//! Duplicate detection against an existing record store.
//!
//! The primary key of an invoice is composite: the invoice number narrows
//! the candidate set, and a second field (seller, or amount together with
//! date) confirms the match. Invoice numbers alone are not unique across
//! issuers, so a bare number match is never treated as a duplicate.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::invoice::InvoiceData;

/// The identifying fields of a stored invoice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceKey {
    pub invoice_number: String,
    pub seller_name: String,
    pub amount: Option<Decimal>,
    /// ISO `YYYY-MM-DD`, or empty when unresolved.
    pub invoice_date: String,
}

impl From<&InvoiceData> for InvoiceKey {
    fn from(record: &InvoiceData) -> Self {
        Self {
            invoice_number: record.invoice_number.clone(),
            seller_name: record.seller_name.clone(),
            amount: record.amount,
            invoice_date: record.invoice_date.clone(),
        }
    }
}

/// Lookup of stored invoices by invoice number.
pub trait InvoiceLookup {
    /// All stored keys carrying exactly this invoice number.
    fn find_by_number(&self, invoice_number: &str) -> Vec<InvoiceKey>;
}

/// Duplicate checker over an [`InvoiceLookup`] store.
#[derive(Debug, Clone)]
pub struct DuplicateChecker {
    tolerance: Decimal,
}

impl DuplicateChecker {
    /// Create a checker with the given amount-comparison tolerance.
    pub fn new(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    /// Fast path: does any stored record carry this invoice number?
    ///
    /// Used to skip expensive processing early; a positive answer still
    /// needs [`DuplicateChecker::is_duplicate`] to confirm.
    pub fn number_exists(&self, store: &dyn InvoiceLookup, invoice_number: &str) -> bool {
        !invoice_number.is_empty() && !store.find_by_number(invoice_number).is_empty()
    }

    /// True when `record` matches a stored invoice on number plus a
    /// confirming field: same seller name, or same amount (within
    /// tolerance) on the same date.
    pub fn is_duplicate(&self, store: &dyn InvoiceLookup, record: &InvoiceData) -> bool {
        if record.invoice_number.is_empty() {
            return false;
        }

        for existing in store.find_by_number(&record.invoice_number) {
            let seller_match =
                !record.seller_name.is_empty() && existing.seller_name == record.seller_name;

            let amount_match = match (existing.amount, record.amount) {
                (Some(a), Some(b)) => (a - b).abs() <= self.tolerance,
                _ => false,
            };
            let date_match =
                !record.invoice_date.is_empty() && existing.invoice_date == record.invoice_date;

            if seller_match || (amount_match && date_match) {
                debug!(
                    invoice_number = %record.invoice_number,
                    seller_match,
                    amount_match,
                    date_match,
                    "duplicate invoice detected"
                );
                return true;
            }
        }

        false
    }
}

/// In-memory [`InvoiceLookup`] store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<InvoiceKey>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invoice's key.
    pub fn insert(&mut self, key: InvoiceKey) {
        self.records.push(key);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl InvoiceLookup for MemoryStore {
    fn find_by_number(&self, invoice_number: &str) -> Vec<InvoiceKey> {
        self.records
            .iter()
            .filter(|key| key.invoice_number == invoice_number)
            .cloned()
            .collect()
    }
}

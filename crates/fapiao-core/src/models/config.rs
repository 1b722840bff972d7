//! Configuration for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Extraction configuration.
///
/// Plausibility thresholds live here rather than in the rules so that a
/// caller can tighten or relax them without touching rule order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum digit count for an accepted invoice number.
    pub min_number_length: usize,

    /// Minimum character count for accepted invoice content.
    pub min_content_length: usize,

    /// Minimum character count for accepted company names.
    pub min_name_length: usize,

    /// Earliest plausible invoice year.
    pub min_year: i32,

    /// Tolerance when checking `total = amount + tax` and when comparing
    /// amounts during duplicate detection.
    pub amount_tolerance: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_number_length: 8,
            min_content_length: 2,
            min_name_length: 3,
            min_year: 2000,
            amount_tolerance: Decimal::new(1, 2),
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

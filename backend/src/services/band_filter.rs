//! Outlier band filter on the actual/expected duration ratio.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::CompletionRecord;

pub const DEFAULT_MIN_MULTIPLIER: f64 = 0.5;
pub const DEFAULT_MAX_MULTIPLIER: f64 = 2.0;

/// Inclusive multiplier band `[lower, upper]` applied to `actual / expected`.
///
/// Records without a positive expected duration have no ratio and are always
/// included. Whether that should hold for extreme durations is still an open
/// product question; the rule is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandFilter {
    lower: f64,
    upper: f64,
}

/// Disjoint split of the input records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandPartition {
    pub included: Vec<CompletionRecord>,
    pub excluded: Vec<CompletionRecord>,
}

impl Default for BandFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_MULTIPLIER, DEFAULT_MAX_MULTIPLIER)
    }
}

impl BandFilter {
    /// Build a band from two multipliers given in either order.
    pub fn new(min_multiplier: f64, max_multiplier: f64) -> Self {
        Self {
            lower: min_multiplier.min(max_multiplier),
            upper: min_multiplier.max(max_multiplier),
        }
    }

    /// Parse one user-entered multiplier.
    pub fn parse_multiplier(raw: &str) -> Result<f64, ValidationError> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ValidationError::InvalidMultiplier(raw.to_string()))
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Whether the record stays in the analysis.
    pub fn includes(&self, record: &CompletionRecord) -> bool {
        match record.expected_ratio() {
            Some(ratio) => ratio >= self.lower && ratio <= self.upper,
            None => true,
        }
    }

    /// Split records into included and excluded, preserving input order.
    pub fn partition(&self, records: Vec<CompletionRecord>) -> BandPartition {
        let (included, excluded): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| self.includes(r));
        BandPartition { included, excluded }
    }
}

//! Diagnostics accumulator for non-fatal parsing and conversion events.
//!
//! Unrecognized formats and missing conversion rates never fail the
//! pipeline; they are appended here and reported after the batch. The
//! accumulator is explicit (threaded through calls, not ambient global
//! state) so tests are deterministic and parallel workers can keep
//! per-worker buffers and merge them afterward.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Append-only channels for non-fatal diagnostic events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Price or date text that matched no known pattern.
    pub unrecognized_formats: Vec<String>,
    /// Currency codes encountered with no rate entry (one event per
    /// conversion, not deduplicated).
    pub missing_rates: Vec<String>,
}

impl Diagnostics {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record text that matched no known price/date pattern.
    pub fn record_unrecognized(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(text = %text, "unrecognized format");
        self.unrecognized_formats.push(text);
    }

    /// Record a conversion attempted without a rate entry.
    pub fn record_missing_rate(&mut self, currency: &str) {
        warn!(currency = %currency, "missing conversion rate, using 1:1");
        self.missing_rates.push(currency.to_string());
    }

    /// Distinct currencies that were missing a rate, for batch reporting.
    pub fn missing_rate_currencies(&self) -> Vec<String> {
        let mut currencies = self.missing_rates.clone();
        currencies.sort();
        currencies.dedup();
        currencies
    }

    /// Fold another accumulator into this one (per-worker buffer merge).
    pub fn merge(&mut self, other: Diagnostics) {
        self.unrecognized_formats.extend(other.unrecognized_formats);
        self.missing_rates.extend(other.missing_rates);
    }

    /// True if no events were recorded.
    pub fn is_empty(&self) -> bool {
        self.unrecognized_formats.is_empty() && self.missing_rates.is_empty()
    }
}

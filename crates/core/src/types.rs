//! Core data types for the collection appraiser.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Milliseconds in one day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Convert a timestamp difference to fractional days.
#[inline]
pub fn ms_to_days(delta_ms: i64) -> f64 {
    delta_ms as f64 / MS_PER_DAY
}

/// A raw sale record as handed over by the market data collector.
///
/// All fields are free-form text and may fail to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSale {
    /// Price text, e.g. "CA$30", "EUR 24.99", "1,250 JPY".
    pub price_text: String,
    /// Condition text, e.g. "Very Good", "VG+", "sealed".
    pub condition_text: String,
    /// Human-readable sale date, e.g. "2024-03-12" or "12 Mar 24".
    pub date_text: String,
}

/// A single historical sale observation for an item.
///
/// Immutable; produced by parsing a [`RawSale`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleObservation {
    /// ISO 4217 currency code, e.g. "USD".
    pub currency: String,
    /// Sale amount in original currency units.
    pub amount: f64,
    /// Condition tier label as reported (free text).
    pub condition: String,
    /// Original sale date display string.
    pub sale_date: String,
    /// Sale timestamp derived from the display string.
    pub ts_ms: TimestampMs,
}

/// A sale observation normalized to base currency units.
///
/// Transient: derived per computation and never persisted.
#[derive(Debug, Clone)]
pub struct NormalizedObservation {
    /// Amount in whole base-currency units.
    pub amount_base: i64,
    /// Resolved condition tier (unrecognized labels become `Unknown`).
    pub tier: ConditionTier,
    /// Sale timestamp.
    pub ts_ms: TimestampMs,
    /// Original currency code.
    pub currency: String,
    /// Original sale date display string.
    pub sale_date: String,
}

/// Quality tier for a physical item's condition.
///
/// Variants are declared in priority order (best first), so the derived
/// `Ord` gives the canonical fallback order with `Unknown` strictly last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConditionTier {
    New,
    LikeNew,
    VeryGood,
    Good,
    Acceptable,
    /// Sentinel for unrecognized observation labels. Never produced by
    /// condition resolution; reserved for observation data.
    Unknown,
}

impl ConditionTier {
    /// The five canonical tiers in priority order (best first).
    pub const CANONICAL: [ConditionTier; 5] = [
        ConditionTier::New,
        ConditionTier::LikeNew,
        ConditionTier::VeryGood,
        ConditionTier::Good,
        ConditionTier::Acceptable,
    ];

    /// Parse a canonical tier label, case-insensitively.
    ///
    /// Returns `None` for anything that is not one of the five canonical
    /// names; use [`ConditionTier::from_label`] to bucket into `Unknown`.
    pub fn parse(text: &str) -> Option<ConditionTier> {
        let trimmed = text.trim();
        Self::CANONICAL
            .iter()
            .copied()
            .find(|tier| tier.label().eq_ignore_ascii_case(trimmed))
    }

    /// Resolve an observation label, bucketing unrecognized text into
    /// `Unknown`.
    pub fn from_label(text: &str) -> ConditionTier {
        Self::parse(text).unwrap_or(ConditionTier::Unknown)
    }

    /// Display label for this tier.
    pub fn label(self) -> &'static str {
        match self {
            ConditionTier::New => "New",
            ConditionTier::LikeNew => "Like New",
            ConditionTier::VeryGood => "Very Good",
            ConditionTier::Good => "Good",
            ConditionTier::Acceptable => "Acceptable",
            ConditionTier::Unknown => "Unknown",
        }
    }

    /// Is this one of the five canonical tiers?
    pub fn is_canonical(self) -> bool {
        self != ConditionTier::Unknown
    }
}

/// Exchange-rate table for a chosen base currency.
///
/// Rates are units of the quoted currency per one base unit, so
/// `rates[base] == 1.0` exactly (enforced at construction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    /// Base currency code.
    pub base: String,
    /// Date the rates were sourced (staleness is the rate provider's
    /// contract, not ours).
    pub as_of: NaiveDate,
    /// Rate map: currency code -> units per base unit.
    pub rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    /// Create a rate table, enforcing the base-rate invariant.
    ///
    /// An empty rate map is the one fatal condition in the system.
    pub fn new(
        base: impl Into<String>,
        as_of: NaiveDate,
        mut rates: HashMap<String, f64>,
    ) -> Result<Self> {
        let base = base.into().to_ascii_uppercase();
        if rates.is_empty() {
            return Err(Error::rate_table("empty rate map"));
        }
        rates.insert(base.clone(), 1.0);
        Ok(Self { base, as_of, rates })
    }

    /// Look up the rate for a currency code.
    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(&currency.to_ascii_uppercase()).copied()
    }

    /// Is this currency the table's base?
    pub fn is_base(&self, currency: &str) -> bool {
        self.base.eq_ignore_ascii_case(currency)
    }
}

/// A caller-selected set of currencies treated as "local" for weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Region name, e.g. "north-america".
    pub name: String,
    /// Currency codes in the region (uppercase).
    pub currencies: Vec<String>,
}

impl Region {
    /// Create a region from a name and currency codes.
    pub fn new(name: impl Into<String>, currencies: &[&str]) -> Self {
        Self {
            name: name.into(),
            currencies: currencies.iter().map(|c| c.to_ascii_uppercase()).collect(),
        }
    }

    /// Is the currency part of this region?
    pub fn contains(&self, currency: &str) -> bool {
        self.currencies.iter().any(|c| c.eq_ignore_ascii_case(currency))
    }
}

/// Descriptive and weighted statistics for one condition tier of one item.
///
/// Recomputed fully on every aggregation call; never updated incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierStatistics {
    /// The tier these statistics describe.
    pub tier: ConditionTier,
    /// Number of observations (always > 0).
    pub count: u32,
    /// Exact order-statistic median (half-units possible for even counts).
    pub median: f64,
    /// Arithmetic mean, rounded to whole base units.
    pub mean: i64,
    /// Minimum observed value.
    pub min: i64,
    /// Maximum observed value.
    pub max: i64,
    /// 25th percentile (linear interpolation between order statistics).
    pub p25: f64,
    /// 75th percentile (linear interpolation between order statistics).
    pub p75: f64,
    /// Mean weighted by the three-factor observation weights.
    pub weighted_mean: f64,
    /// Observations within the recent window (last 12 months).
    pub recent_count: u32,
    /// Oldest sale date display string.
    pub oldest_sale: String,
    /// Oldest sale timestamp.
    pub oldest_ts: TimestampMs,
    /// Newest sale date display string.
    pub newest_sale: String,
    /// Newest sale timestamp.
    pub newest_ts: TimestampMs,
}

impl TierStatistics {
    /// Interquartile range (Q3 - Q1), the scale for dispersion weighting.
    #[inline]
    pub fn iqr(&self) -> f64 {
        self.p75 - self.p25
    }
}

/// How the final estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationClass {
    /// Statistics existed for the requested tier.
    Exact,
    /// Another tier's statistics were used.
    Fallback,
    /// No market data at all; depreciated purchase price used.
    NoData,
}

/// Final valuation for one item, in base currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Estimated current value in whole base units.
    pub estimate: i64,
    /// Tier whose statistics backed the estimate (`None` for no-data).
    pub tier_used: Option<ConditionTier>,
    /// Classification of how the estimate was obtained.
    pub class: ValuationClass,
    /// No market data and no purchase price: the zero estimate must not
    /// be reported as a valid value.
    pub unvaluable: bool,
}

/// One item from the owner's collection, as handed over by the collection
/// loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Item title, for reporting.
    pub title: String,
    /// Original purchase amount, if known.
    pub purchase_amount: Option<f64>,
    /// Currency of the purchase amount.
    pub purchase_currency: Option<String>,
    /// Owner-reported condition text.
    pub condition_text: Option<String>,
    /// Owner-reported play count.
    pub play_count: Option<u32>,
}

/// Per-item output handed to the report writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemValuation {
    /// Item title.
    pub title: String,
    /// The valuation result in base units.
    pub result: ValuationResult,
    /// Tier statistics that backed the valuation.
    pub tiers: Vec<TierStatistics>,
    /// Purchase price converted to base units, if known.
    pub purchase_base: Option<i64>,
    /// Purchase price converted to the display currency, if known.
    pub purchase_display: Option<i64>,
    /// Estimate converted to the display currency.
    pub estimate_display: i64,
}

/// Aggregate totals across a whole collection, in display currency units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Number of items evaluated.
    pub item_count: u32,
    /// Sum of purchase prices (items with a known purchase only).
    pub total_purchase: i64,
    /// Sum of estimates.
    pub total_estimate: i64,
    /// Percentage change from purchase to estimate (0 if no purchases).
    pub delta_pct: f64,
    /// Items flagged unvaluable.
    pub unvaluable_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse_case_insensitive() {
        assert_eq!(ConditionTier::parse("new"), Some(ConditionTier::New));
        assert_eq!(ConditionTier::parse("LIKE NEW"), Some(ConditionTier::LikeNew));
        assert_eq!(ConditionTier::parse(" very good "), Some(ConditionTier::VeryGood));
        assert_eq!(ConditionTier::parse("Mint"), None);
    }

    #[test]
    fn test_tier_from_label_buckets_unknown() {
        assert_eq!(ConditionTier::from_label("Good"), ConditionTier::Good);
        assert_eq!(ConditionTier::from_label("VG+"), ConditionTier::Unknown);
    }

    #[test]
    fn test_tier_order_unknown_last() {
        assert!(ConditionTier::New < ConditionTier::Acceptable);
        for tier in ConditionTier::CANONICAL {
            assert!(tier < ConditionTier::Unknown);
        }
    }

    #[test]
    fn test_rate_table_base_invariant() {
        let mut rates = HashMap::new();
        rates.insert("EUR".to_string(), 0.9);
        let table = ExchangeRateTable::new(
            "usd",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            rates,
        )
        .unwrap();

        assert_eq!(table.base, "USD");
        assert_eq!(table.rate("USD"), Some(1.0));
        assert!(table.is_base("usd"));
    }

    #[test]
    fn test_rate_table_empty_is_fatal() {
        let result = ExchangeRateTable::new(
            "USD",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            HashMap::new(),
        );
        assert!(matches!(result, Err(Error::RateTable(_))));
    }

    #[test]
    fn test_region_contains() {
        let region = Region::new("north-america", &["usd", "CAD"]);
        assert!(region.contains("USD"));
        assert!(region.contains("cad"));
        assert!(!region.contains("EUR"));
    }
}

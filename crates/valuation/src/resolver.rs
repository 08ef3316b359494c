//! Fallback-aware valuation resolution.
//!
//! Picks the one estimate to report from an item's tier statistics:
//! exact tier match, canonical-priority fallback, or the fixed
//! depreciation rule when no market data exists at all.

use appraiser_core::config::ValuationConfig;
use appraiser_core::{ConditionTier, TierStatistics, ValuationClass, ValuationResult};

/// Resolves one estimate from per-tier statistics.
pub struct ValuationResolver {
    no_data_depreciation: f64,
}

impl ValuationResolver {
    /// Create a resolver from configuration.
    pub fn new(config: &ValuationConfig) -> Self {
        Self {
            no_data_depreciation: config.no_data_depreciation,
        }
    }

    /// Resolve the estimate for one item.
    ///
    /// `purchase_base` is the original purchase price in whole base units,
    /// if known. With no statistics and no purchase price the result is a
    /// zero estimate flagged `unvaluable` — never a silent valid zero.
    pub fn resolve(
        &self,
        tiers: &[TierStatistics],
        target: ConditionTier,
        purchase_base: Option<i64>,
    ) -> ValuationResult {
        if tiers.is_empty() {
            return match purchase_base {
                Some(purchase) if purchase > 0 => ValuationResult {
                    estimate: (purchase as f64 * self.no_data_depreciation).round() as i64,
                    tier_used: None,
                    class: ValuationClass::NoData,
                    unvaluable: false,
                },
                _ => ValuationResult {
                    estimate: 0,
                    tier_used: None,
                    class: ValuationClass::NoData,
                    unvaluable: true,
                },
            };
        }

        if let Some(stats) = tiers.iter().find(|s| s.tier == target) {
            return Self::from_stats(stats, ValuationClass::Exact);
        }

        // Walk the canonical priority order; first tier with data wins.
        for tier in ConditionTier::CANONICAL {
            if let Some(stats) = tiers.iter().find(|s| s.tier == tier) {
                return Self::from_stats(stats, ValuationClass::Fallback);
            }
        }

        // Only Unknown-tier data exists: take the first record anyway.
        Self::from_stats(&tiers[0], ValuationClass::Fallback)
    }

    fn from_stats(stats: &TierStatistics, class: ValuationClass) -> ValuationResult {
        ValuationResult {
            estimate: stats.weighted_mean.round() as i64,
            tier_used: Some(stats.tier),
            class,
            unvaluable: false,
        }
    }
}

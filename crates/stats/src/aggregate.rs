//! Tier-level statistics aggregation.
//!
//! Groups one item's normalized observations by condition tier and
//! computes descriptive plus weighted statistics per tier. Statistics are
//! recomputed fully on every call; nothing is updated incrementally.

use crate::weighting::{weighted_mean, WeightingEngine};
use appraiser_core::config::Config;
use appraiser_core::{
    ms_to_days, ConditionTier, NormalizedObservation, Region, TierStatistics, TimestampMs,
};
use std::collections::BTreeMap;

/// Aggregates observations into per-tier statistics.
pub struct TierAggregator {
    weighting: WeightingEngine,
    recent_window_days: i64,
}

impl TierAggregator {
    /// Create an aggregator from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            weighting: WeightingEngine::new(config.weighting.clone()),
            recent_window_days: config.valuation.recent_window_days,
        }
    }

    /// Compute statistics for every tier present in the observations.
    ///
    /// Output is sorted in canonical tier order (New first), with
    /// `Unknown` last. Tiers with no observations are absent.
    pub fn aggregate(
        &self,
        observations: &[NormalizedObservation],
        region: &Region,
        now_ms: TimestampMs,
    ) -> Vec<TierStatistics> {
        // BTreeMap keyed by tier: iteration order is the tier's total
        // order, which is the canonical order with Unknown last.
        let mut groups: BTreeMap<ConditionTier, Vec<&NormalizedObservation>> = BTreeMap::new();
        for obs in observations {
            groups.entry(obs.tier).or_default().push(obs);
        }

        groups
            .into_iter()
            .map(|(tier, group)| self.compute_tier(tier, &group, region, now_ms))
            .collect()
    }

    fn compute_tier(
        &self,
        tier: ConditionTier,
        group: &[&NormalizedObservation],
        region: &Region,
        now_ms: TimestampMs,
    ) -> TierStatistics {
        let mut values: Vec<i64> = group.iter().map(|o| o.amount_base).collect();
        values.sort_unstable();

        let count = values.len();
        let median = exact_median(&values);
        let p25 = percentile(&values, 25.0);
        let p75 = percentile(&values, 75.0);
        let sum: i64 = values.iter().sum();
        let mean = (sum as f64 / count as f64).round() as i64;

        let oldest = group.iter().min_by_key(|o| o.ts_ms).unwrap();
        let newest = group.iter().max_by_key(|o| o.ts_ms).unwrap();

        let regional_count = group.iter().filter(|o| region.contains(&o.currency)).count();
        let iqr = p75 - p25;
        let weights: Vec<f64> = group
            .iter()
            .map(|o| {
                self.weighting
                    .observation_weight(o, median, iqr, region, regional_count, now_ms)
            })
            .collect();
        let raw_values: Vec<f64> = group.iter().map(|o| o.amount_base as f64).collect();

        let recent_count = group
            .iter()
            .filter(|o| ms_to_days(now_ms - o.ts_ms) <= self.recent_window_days as f64)
            .count();

        TierStatistics {
            tier,
            count: count as u32,
            median,
            mean,
            min: values[0],
            max: values[count - 1],
            p25,
            p75,
            weighted_mean: weighted_mean(&raw_values, &weights),
            recent_count: recent_count as u32,
            oldest_sale: oldest.sale_date.clone(),
            oldest_ts: oldest.ts_ms,
            newest_sale: newest.sale_date.clone(),
            newest_ts: newest.ts_ms,
        }
    }
}

/// Exact order-statistic median: the middle element, or the average of the
/// two middle elements for even counts. No interpolation.
fn exact_median(sorted: &[i64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    }
}

/// Percentile by linear interpolation between order statistics:
/// `index = (p/100)·(n-1)`, interpolating between floor and ceiling.
fn percentile(sorted: &[i64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0] as f64;
    }
    let index = (p / 100.0) * (n - 1) as f64;
    let lo = index.floor() as usize;
    let hi = index.ceil() as usize;
    if lo == hi {
        return sorted[lo] as f64;
    }
    let frac = index - lo as f64;
    sorted[lo] as f64 + (sorted[hi] - sorted[lo]) as f64 * frac
}

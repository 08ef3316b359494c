//! Three-factor observation weighting.
//!
//! Each observation gets three independent weights, combined by
//! multiplication:
//! - temporal: half-life decay by sale age
//! - dispersion: Gaussian falloff by distance from the tier median, in IQRs
//! - region: discount for sales outside the caller's currency region
//!
//! Outliers are down-weighted, never excluded.

use appraiser_core::config::WeightingConfig;
use appraiser_core::{ms_to_days, NormalizedObservation, Region, TimestampMs};

/// Weight calculator for a fixed configuration.
pub struct WeightingEngine {
    config: WeightingConfig,
}

impl WeightingEngine {
    /// Create a weighting engine.
    pub fn new(config: WeightingConfig) -> Self {
        Self { config }
    }

    /// Temporal weight: `0.5^(age / half_life)`, continuous.
    ///
    /// Future-dated sales (age <= 0) clamp to 1.0. There is no lower
    /// floor; the weight decays asymptotically toward zero.
    pub fn temporal_weight(&self, age_days: f64) -> f64 {
        if age_days <= 0.0 {
            return 1.0;
        }
        0.5_f64.powf(age_days / self.config.half_life_days)
    }

    /// Price-dispersion weight: `exp(-d²/2)` with
    /// `d = |value - median| / iqr`, floored at the configured minimum.
    ///
    /// A zero IQR means the tier has no usable scale; every observation
    /// in it weighs 1.0.
    pub fn dispersion_weight(&self, value: f64, tier_median: f64, tier_iqr: f64) -> f64 {
        if tier_iqr <= 0.0 {
            return 1.0;
        }
        let distance = (value - tier_median).abs() / tier_iqr;
        (-distance * distance / 2.0).exp().max(self.config.dispersion_floor)
    }

    /// Currency-region weight.
    ///
    /// In-region observations weigh 1.0, foreign ones the configured
    /// discount — but only once the tier holds at least
    /// `min_regional_observations` in-region sales. With less regional
    /// evidence everything weighs 1.0.
    pub fn region_weight(&self, currency: &str, region: &Region, regional_count: usize) -> f64 {
        if regional_count < self.config.min_regional_observations {
            return 1.0;
        }
        if region.contains(currency) {
            1.0
        } else {
            self.config.foreign_weight
        }
    }

    /// Combined weight for one observation within its tier group.
    pub fn observation_weight(
        &self,
        obs: &NormalizedObservation,
        tier_median: f64,
        tier_iqr: f64,
        region: &Region,
        regional_count: usize,
        now_ms: TimestampMs,
    ) -> f64 {
        let age_days = ms_to_days(now_ms - obs.ts_ms);
        self.temporal_weight(age_days)
            * self.dispersion_weight(obs.amount_base as f64, tier_median, tier_iqr)
            * self.region_weight(&obs.currency, region, regional_count)
    }

    /// Combined weights for a tier's observations.
    pub fn combined_weights(
        &self,
        observations: &[NormalizedObservation],
        tier_median: f64,
        tier_iqr: f64,
        region: &Region,
        now_ms: TimestampMs,
    ) -> Vec<f64> {
        let regional_count = observations
            .iter()
            .filter(|o| region.contains(&o.currency))
            .count();
        observations
            .iter()
            .map(|o| {
                self.observation_weight(o, tier_median, tier_iqr, region, regional_count, now_ms)
            })
            .collect()
    }
}

/// Weighted mean: `Σ(value·w) / Σ(w)`, 0 if the denominator is 0.
///
/// The zero guard is unreachable with floored weights but kept explicit.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    weighted_sum / total_weight
}

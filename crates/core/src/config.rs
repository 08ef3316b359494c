//! Configuration structures for the collection appraiser.

use crate::error::{Error, Result};
use crate::types::ConditionTier;
use serde::{Deserialize, Serialize};

/// Main configuration for the valuation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Currency handling configuration.
    pub currency: CurrencyConfig,
    /// Condition resolution configuration.
    pub condition: ConditionConfig,
    /// Observation weighting configuration.
    pub weighting: WeightingConfig,
    /// Valuation resolution configuration.
    pub valuation: ValuationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyConfig::default(),
            condition: ConditionConfig::default(),
            weighting: WeightingConfig::default(),
            valuation: ValuationConfig::default(),
        }
    }
}

impl Config {
    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<()> {
        self.condition.validate()?;
        self.weighting.validate()?;
        self.valuation.validate()
    }
}

/// Currency handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency assumed for a bare "$" symbol.
    pub bare_symbol_currency: String,
    /// Currency the final report is rendered in.
    pub display_currency: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            bare_symbol_currency: "USD".to_string(),
            display_currency: "USD".to_string(),
        }
    }
}

/// One play-count threshold: counts up to and including `max_plays` map to
/// `tier`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayThreshold {
    /// Inclusive upper bound on play count.
    pub max_plays: u32,
    /// Tier assigned at or below the bound.
    pub tier: ConditionTier,
}

/// Condition resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Ascending, non-overlapping play-count thresholds. Counts above the
    /// last threshold map to `Acceptable`.
    pub play_thresholds: Vec<PlayThreshold>,
    /// Tier used when no other signal is available.
    pub default_tier: ConditionTier,
}

impl Default for ConditionConfig {
    fn default() -> Self {
        Self {
            play_thresholds: vec![
                PlayThreshold { max_plays: 1, tier: ConditionTier::New },
                PlayThreshold { max_plays: 10, tier: ConditionTier::LikeNew },
                PlayThreshold { max_plays: 15, tier: ConditionTier::VeryGood },
                PlayThreshold { max_plays: 25, tier: ConditionTier::Good },
            ],
            default_tier: ConditionTier::VeryGood,
        }
    }
}

impl ConditionConfig {
    /// Validate threshold ordering and tier choices.
    pub fn validate(&self) -> Result<()> {
        let mut prev: Option<u32> = None;
        for threshold in &self.play_thresholds {
            if !threshold.tier.is_canonical() {
                return Err(Error::config("play threshold maps to Unknown tier"));
            }
            if let Some(p) = prev {
                if threshold.max_plays <= p {
                    return Err(Error::config("play thresholds must be strictly ascending"));
                }
            }
            prev = Some(threshold.max_plays);
        }
        if !self.default_tier.is_canonical() {
            return Err(Error::config("default tier must be canonical"));
        }
        Ok(())
    }
}

/// Observation weighting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightingConfig {
    /// Temporal half-life in days (weight halves per interval).
    pub half_life_days: f64,
    /// Lower bound on the price-dispersion weight.
    pub dispersion_floor: f64,
    /// Weight applied to observations outside the selected region.
    pub foreign_weight: f64,
    /// Minimum in-region observations before region weighting activates.
    pub min_regional_observations: usize,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            half_life_days: 365.0,
            dispersion_floor: 0.01,
            foreign_weight: 0.3,
            min_regional_observations: 2,
        }
    }
}

impl WeightingConfig {
    /// Validate weighting parameters.
    pub fn validate(&self) -> Result<()> {
        if self.half_life_days <= 0.0 {
            return Err(Error::config("half_life_days must be positive"));
        }
        if !(0.0..=1.0).contains(&self.dispersion_floor) {
            return Err(Error::config("dispersion_floor must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.foreign_weight) {
            return Err(Error::config("foreign_weight must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Valuation resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Depreciation factor applied to the purchase price when an item has
    /// no market data.
    pub no_data_depreciation: f64,
    /// Window for the recent-sales count, in days.
    pub recent_window_days: i64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            no_data_depreciation: 0.6,
            recent_window_days: 365,
        }
    }
}

impl ValuationConfig {
    /// Validate valuation parameters.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.no_data_depreciation) {
            return Err(Error::config("no_data_depreciation must be in [0, 1]"));
        }
        if self.recent_window_days <= 0 {
            return Err(Error::config("recent_window_days must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weighting.half_life_days, 365.0);
        assert_eq!(config.valuation.no_data_depreciation, 0.6);
    }

    #[test]
    fn test_default_thresholds() {
        let config = ConditionConfig::default();
        assert_eq!(config.play_thresholds.len(), 4);
        assert_eq!(config.play_thresholds[0].max_plays, 1);
        assert_eq!(config.play_thresholds[0].tier, ConditionTier::New);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let mut config = ConditionConfig::default();
        config.play_thresholds.reverse();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_default_tier_rejected() {
        let config = ConditionConfig {
            default_tier: ConditionTier::Unknown,
            ..ConditionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_weighting_rejected() {
        let config = WeightingConfig {
            foreign_weight: 1.5,
            ..WeightingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Condition-tier resolution.
//!
//! Determines the quality tier to value an item at. Pure, total,
//! deterministic: every input combination resolves to exactly one of the
//! five canonical tiers, never `Unknown`.

use appraiser_core::config::{ConditionConfig, PlayThreshold};
use appraiser_core::ConditionTier;

/// Resolves the target tier for an item from the available signals.
pub struct ConditionResolver {
    thresholds: Vec<PlayThreshold>,
    default_tier: ConditionTier,
}

impl ConditionResolver {
    /// Create a resolver from configuration.
    pub fn new(config: &ConditionConfig) -> Self {
        Self {
            thresholds: config.play_thresholds.clone(),
            default_tier: config.default_tier,
        }
    }

    /// Resolve the tier to value an item at. Cascade, first match wins:
    ///
    /// 1. Condition text equal (case-insensitively) to a canonical label.
    /// 2. Caller-supplied default tier.
    /// 3. Play count mapped through the ascending inclusive thresholds;
    ///    counts above the last threshold resolve to `Acceptable`.
    /// 4. The configured ultimate default.
    pub fn resolve(
        &self,
        condition_text: Option<&str>,
        caller_default: Option<ConditionTier>,
        play_count: Option<u32>,
    ) -> ConditionTier {
        if let Some(tier) = condition_text.and_then(ConditionTier::parse) {
            return tier;
        }
        if let Some(tier) = caller_default.filter(|t| t.is_canonical()) {
            return tier;
        }
        if let Some(count) = play_count {
            for threshold in &self.thresholds {
                if count <= threshold.max_plays {
                    return threshold.tier;
                }
            }
            return ConditionTier::Acceptable;
        }
        self.default_tier
    }
}

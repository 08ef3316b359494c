//! Statistics computation for the collection appraiser.
//!
//! This crate handles:
//! - The three-factor observation weighting model
//!   (temporal decay, price dispersion, currency region)
//! - Tier-level descriptive and weighted statistics aggregation

pub mod aggregate;
pub mod weighting;

pub use aggregate::TierAggregator;
pub use weighting::{weighted_mean, WeightingEngine};

//! Valuation resolution for the collection appraiser.
//!
//! This crate provides:
//! - Condition-tier resolution (text, caller default, play count cascade)
//! - Fallback-aware valuation resolution
//! - The per-item evaluation engine and portfolio totals

pub mod condition;
pub mod engine;
pub mod resolver;

pub use condition::ConditionResolver;
pub use engine::Appraiser;
pub use resolver::ValuationResolver;

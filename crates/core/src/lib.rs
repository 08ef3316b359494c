//! Core types and configuration for the collection appraiser.
//!
//! This crate provides shared types used across all other crates:
//! - Sale observation and valuation types
//! - Condition tier enumeration
//! - Exchange rate table
//! - Configuration structures
//! - Diagnostics accumulator
//! - Common error types

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use config::Config;
pub use diagnostics::Diagnostics;
pub use error::{Error, Result};
pub use types::*;

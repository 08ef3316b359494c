//! Observation normalization for the collection appraiser.
//!
//! This crate handles:
//! - Free-form price text parsing (symbol, "CODE amount", "amount CODE")
//! - Sale-date text parsing
//! - Currency conversion against an exchange-rate table
//! - Raw sale records -> normalized base-currency observations

pub mod convert;
pub mod date;
pub mod observation;
pub mod price;

pub use convert::Converter;
pub use date::parse_sale_date;
pub use observation::{normalize, parse_observation};
pub use price::PriceParser;

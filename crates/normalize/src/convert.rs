//! Currency conversion against an exchange-rate table.
//!
//! Every conversion rounds to the nearest whole unit, so rounding error
//! compounds across chained conversions. Aggregation depends on this
//! whole-unit behavior; do not defer the rounding.

use appraiser_core::{Diagnostics, ExchangeRateTable};

/// Converter over a read-only rate table.
///
/// Rates are units of the quoted currency per one base unit, so converting
/// to base divides and converting from base multiplies.
pub struct Converter<'a> {
    table: &'a ExchangeRateTable,
}

impl<'a> Converter<'a> {
    /// Create a converter for the given table.
    pub fn new(table: &'a ExchangeRateTable) -> Self {
        Self { table }
    }

    /// Convert an amount in `from` currency to whole base units.
    ///
    /// A missing (or non-positive) rate falls back to 1:1 and records a
    /// missing-rate diagnostic; this never fails.
    pub fn to_base(&self, amount: f64, from: &str, diags: &mut Diagnostics) -> i64 {
        if self.table.is_base(from) {
            return amount.round() as i64;
        }
        match self.table.rate(from) {
            Some(rate) if rate > 0.0 => (amount / rate).round() as i64,
            _ => {
                diags.record_missing_rate(from);
                amount.round() as i64
            }
        }
    }

    /// Convert an amount in base units to whole units of `to` currency.
    ///
    /// Same missing-rate fallback as [`Converter::to_base`].
    pub fn from_base(&self, amount: f64, to: &str, diags: &mut Diagnostics) -> i64 {
        if self.table.is_base(to) {
            return amount.round() as i64;
        }
        match self.table.rate(to) {
            Some(rate) if rate > 0.0 => (amount * rate).round() as i64,
            _ => {
                diags.record_missing_rate(to);
                amount.round() as i64
            }
        }
    }
}

//! Raw sale records -> typed, base-currency observations.

use crate::convert::Converter;
use crate::date::parse_sale_date;
use crate::price::PriceParser;
use appraiser_core::{
    ConditionTier, Diagnostics, ExchangeRateTable, NormalizedObservation, RawSale,
    SaleObservation,
};

/// Parse one raw sale into a typed observation.
///
/// Returns `None` if the price or date text is unusable, recording a
/// diagnostic; the record is skipped, not failed.
pub fn parse_observation(
    raw: &RawSale,
    parser: &PriceParser,
    diags: &mut Diagnostics,
) -> Option<SaleObservation> {
    let (currency, amount) = parser.parse(&raw.price_text, diags)?;

    let date_text = raw.date_text.trim();
    let ts_ms = match parse_sale_date(date_text) {
        Some(ts) => ts,
        None => {
            if !date_text.is_empty() {
                diags.record_unrecognized(date_text);
            }
            return None;
        }
    };

    Some(SaleObservation {
        currency,
        amount,
        condition: raw.condition_text.trim().to_string(),
        sale_date: date_text.to_string(),
        ts_ms,
    })
}

/// Normalize observations to whole base-currency units.
///
/// Tier labels are resolved here; unrecognized labels bucket into
/// `ConditionTier::Unknown` rather than being dropped.
pub fn normalize(
    observations: &[SaleObservation],
    table: &ExchangeRateTable,
    diags: &mut Diagnostics,
) -> Vec<NormalizedObservation> {
    let converter = Converter::new(table);
    observations
        .iter()
        .map(|obs| NormalizedObservation {
            amount_base: converter.to_base(obs.amount, &obs.currency, diags),
            tier: ConditionTier::from_label(&obs.condition),
            ts_ms: obs.ts_ms,
            currency: obs.currency.to_ascii_uppercase(),
            sale_date: obs.sale_date.clone(),
        })
        .collect()
}

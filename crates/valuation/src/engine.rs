//! Per-item evaluation engine.
//!
//! Wires the pipeline together: raw sales -> typed observations ->
//! base-currency normalization -> tier statistics -> resolved valuation,
//! plus display-currency conversion and collection-level totals.

use appraiser_core::config::Config;
use appraiser_core::{
    Diagnostics, ExchangeRateTable, ItemRecord, ItemValuation, PortfolioSummary, RawSale,
    Region, Result, TimestampMs,
};
use appraiser_normalize::{normalize, parse_observation, Converter, PriceParser};
use appraiser_stats::TierAggregator;
use chrono::Utc;
use tracing::debug;

use crate::condition::ConditionResolver;
use crate::resolver::ValuationResolver;

/// Evaluation engine for a collection of items.
///
/// Holds the read-only rate table and region selection; per-item
/// evaluation is independent, so batch evaluation parallelizes with
/// per-worker [`Diagnostics`] buffers merged afterward.
pub struct Appraiser {
    parser: PriceParser,
    condition: ConditionResolver,
    aggregator: TierAggregator,
    resolver: ValuationResolver,
    table: ExchangeRateTable,
    region: Region,
    display_currency: String,
}

impl Appraiser {
    /// Create an appraiser.
    ///
    /// This is the one place hard failures surface: an invalid
    /// configuration, or a rate table rejected at construction upstream.
    pub fn new(config: &Config, table: ExchangeRateTable, region: Region) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: PriceParser::new(&config.currency),
            condition: ConditionResolver::new(&config.condition),
            aggregator: TierAggregator::new(config),
            resolver: ValuationResolver::new(&config.valuation),
            display_currency: config.currency.display_currency.clone(),
            table,
            region,
        })
    }

    /// Evaluate one item against its raw sale observations, using the
    /// current time as "now".
    pub fn evaluate_item(
        &self,
        item: &ItemRecord,
        sales: &[RawSale],
        diags: &mut Diagnostics,
    ) -> ItemValuation {
        self.evaluate_item_at(item, sales, Utc::now().timestamp_millis(), diags)
    }

    /// Evaluate one item with an explicit "now" timestamp.
    pub fn evaluate_item_at(
        &self,
        item: &ItemRecord,
        sales: &[RawSale],
        now_ms: TimestampMs,
        diags: &mut Diagnostics,
    ) -> ItemValuation {
        let observations: Vec<_> = sales
            .iter()
            .filter_map(|raw| parse_observation(raw, &self.parser, diags))
            .collect();
        let normalized = normalize(&observations, &self.table, diags);
        let tiers = self.aggregator.aggregate(&normalized, &self.region, now_ms);

        let target = self
            .condition
            .resolve(item.condition_text.as_deref(), None, item.play_count);

        let converter = Converter::new(&self.table);
        let purchase_base = match (item.purchase_amount, item.purchase_currency.as_deref()) {
            (Some(amount), Some(currency)) => Some(converter.to_base(amount, currency, diags)),
            // No currency recorded: the loader's amounts are in base units.
            (Some(amount), None) => Some(amount.round() as i64),
            _ => None,
        };

        let result = self.resolver.resolve(&tiers, target, purchase_base);

        debug!(
            title = %item.title,
            target = %target.label(),
            class = ?result.class,
            estimate = result.estimate,
            "evaluated item"
        );

        let purchase_display = purchase_base
            .map(|p| converter.from_base(p as f64, &self.display_currency, diags));
        let estimate_display =
            converter.from_base(result.estimate as f64, &self.display_currency, diags);

        ItemValuation {
            title: item.title.clone(),
            result,
            tiers,
            purchase_base,
            purchase_display,
            estimate_display,
        }
    }

    /// Aggregate totals across per-item outputs, in display currency.
    ///
    /// Simple summation: purchases where known, estimates for every item,
    /// percentage delta of the two sums.
    pub fn summarize(valuations: &[ItemValuation]) -> PortfolioSummary {
        let mut summary = PortfolioSummary {
            item_count: valuations.len() as u32,
            ..PortfolioSummary::default()
        };

        for valuation in valuations {
            if let Some(purchase) = valuation.purchase_display {
                summary.total_purchase += purchase;
            }
            summary.total_estimate += valuation.estimate_display;
            if valuation.result.unvaluable {
                summary.unvaluable_count += 1;
            }
        }

        if summary.total_purchase > 0 {
            summary.delta_pct = (summary.total_estimate - summary.total_purchase) as f64
                / summary.total_purchase as f64
                * 100.0;
        }

        summary
    }

    /// The display currency outputs are converted to.
    pub fn display_currency(&self) -> &str {
        &self.display_currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appraiser_core::{ConditionTier, ValuationClass};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    const NOW: TimestampMs = 1704067200000; // 2024-01-01

    fn make_table() -> ExchangeRateTable {
        let mut rates = HashMap::new();
        rates.insert("CAD".to_string(), 1.35);
        rates.insert("EUR".to_string(), 0.9);
        ExchangeRateTable::new("USD", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), rates)
            .unwrap()
    }

    fn make_appraiser() -> Appraiser {
        let region = Region::new("north-america", &["USD", "CAD"]);
        Appraiser::new(&Config::default(), make_table(), region).unwrap()
    }

    fn make_item(condition: Option<&str>, purchase: Option<f64>) -> ItemRecord {
        ItemRecord {
            title: "Test Item".to_string(),
            purchase_amount: purchase,
            purchase_currency: purchase.map(|_| "USD".to_string()),
            condition_text: condition.map(|c| c.to_string()),
            play_count: None,
        }
    }

    fn sale(price: &str, condition: &str, date: &str) -> RawSale {
        RawSale {
            price_text: price.to_string(),
            condition_text: condition.to_string(),
            date_text: date.to_string(),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.weighting.half_life_days = -1.0;
        let region = Region::new("us", &["USD"]);
        assert!(Appraiser::new(&config, make_table(), region).is_err());
    }

    #[test]
    fn test_exact_valuation_end_to_end() {
        let appraiser = make_appraiser();
        let mut diags = Diagnostics::new();

        let sales = vec![
            sale("$50", "New", "2023-12-30"),
            sale("$60", "New", "2023-12-30"),
            sale("$70", "New", "2023-12-30"),
        ];
        let item = make_item(Some("New"), Some(40.0));

        let valuation = appraiser.evaluate_item_at(&item, &sales, NOW, &mut diags);

        assert_eq!(valuation.result.class, ValuationClass::Exact);
        assert_eq!(valuation.result.tier_used, Some(ConditionTier::New));
        assert_eq!(valuation.tiers.len(), 1);
        assert_eq!(valuation.tiers[0].count, 3);
        assert_eq!(valuation.tiers[0].median, 60.0);
        // Same-day sales, symmetric spread: estimate lands on the center.
        assert_eq!(valuation.result.estimate, 60);
        assert_eq!(valuation.purchase_base, Some(40));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_fallback_when_tier_missing() {
        let appraiser = make_appraiser();
        let mut diags = Diagnostics::new();

        let sales = vec![
            sale("$80", "Like New", "2023-12-01"),
            sale("$84", "Like New", "2023-12-15"),
        ];
        let item = make_item(Some("New"), None);

        let valuation = appraiser.evaluate_item_at(&item, &sales, NOW, &mut diags);

        assert_eq!(valuation.result.class, ValuationClass::Fallback);
        assert_eq!(valuation.result.tier_used, Some(ConditionTier::LikeNew));
    }

    #[test]
    fn test_no_data_uses_depreciated_purchase() {
        let appraiser = make_appraiser();
        let mut diags = Diagnostics::new();

        let item = make_item(None, Some(1000.0));
        let valuation = appraiser.evaluate_item_at(&item, &[], NOW, &mut diags);

        assert_eq!(valuation.result.class, ValuationClass::NoData);
        assert_eq!(valuation.result.estimate, 600);
        assert!(!valuation.result.unvaluable);
    }

    #[test]
    fn test_unvaluable_flagged() {
        let appraiser = make_appraiser();
        let mut diags = Diagnostics::new();

        let item = make_item(None, None);
        let valuation = appraiser.evaluate_item_at(&item, &[], NOW, &mut diags);

        assert!(valuation.result.unvaluable);
        assert_eq!(valuation.result.estimate, 0);
    }

    #[test]
    fn test_unusable_sales_are_skipped_not_fatal() {
        let appraiser = make_appraiser();
        let mut diags = Diagnostics::new();

        let sales = vec![
            sale("$55", "Good", "2023-12-01"),
            sale("around fifty 5", "Good", "2023-12-02"),
            sale("$60", "Good", "someday"),
        ];
        let item = make_item(Some("Good"), None);

        let valuation = appraiser.evaluate_item_at(&item, &sales, NOW, &mut diags);

        // Only the first sale survives parsing.
        assert_eq!(valuation.tiers[0].count, 1);
        assert_eq!(diags.unrecognized_formats.len(), 2);
    }

    #[test]
    fn test_multi_currency_normalization() {
        let appraiser = make_appraiser();
        let mut diags = Diagnostics::new();

        let sales = vec![
            sale("CA$135", "Good", "2023-12-01"), // 100 USD
            sale("$100", "Good", "2023-12-02"),
            sale("EUR 90", "Good", "2023-12-03"), // 100 USD
        ];
        let item = make_item(Some("Good"), None);

        let valuation = appraiser.evaluate_item_at(&item, &sales, NOW, &mut diags);

        let stats = &valuation.tiers[0];
        assert_eq!(stats.min, 100);
        assert_eq!(stats.max, 100);
        assert_eq!(valuation.result.estimate, 100);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_summarize_totals() {
        let appraiser = make_appraiser();
        let mut diags = Diagnostics::new();

        let gained = appraiser.evaluate_item_at(
            &make_item(Some("New"), Some(50.0)),
            &[sale("$100", "New", "2023-12-30"), sale("$100", "New", "2023-12-31")],
            NOW,
            &mut diags,
        );
        let no_data = appraiser.evaluate_item_at(&make_item(None, Some(100.0)), &[], NOW, &mut diags);
        let unvaluable = appraiser.evaluate_item_at(&make_item(None, None), &[], NOW, &mut diags);

        let summary = Appraiser::summarize(&[gained, no_data, unvaluable]);

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total_purchase, 150);
        assert_eq!(summary.total_estimate, 160); // 100 + 60 + 0
        assert_eq!(summary.unvaluable_count, 1);
        assert!((summary.delta_pct - 6.6667).abs() < 0.01);
    }
}

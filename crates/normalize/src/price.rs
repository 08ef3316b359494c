//! Free-form price text parsing.
//!
//! Marketplace listings report prices as symbol-prefixed text ("CA$30"),
//! as "CODE amount", or as "amount CODE". Amounts use "." as the decimal
//! separator; "," is treated as a thousands separator. Anything
//! unrecognized yields `None` and a diagnostic, never an error.

use appraiser_core::config::CurrencyConfig;
use appraiser_core::Diagnostics;

/// Parser for free-form price text.
pub struct PriceParser {
    /// Symbol/prefix lookup table, sorted longest prefix first so that
    /// country-qualified prefixes ("CA$") win over bare symbols ("$").
    symbols: Vec<(String, String)>,
}

impl PriceParser {
    /// Create a parser with the default symbol table.
    ///
    /// The bare "$" maps to the configured default currency.
    pub fn new(config: &CurrencyConfig) -> Self {
        let mut symbols: Vec<(String, String)> = [
            ("CA$", "CAD"),
            ("C$", "CAD"),
            ("US$", "USD"),
            ("AU$", "AUD"),
            ("A$", "AUD"),
            ("NZ$", "NZD"),
            ("HK$", "HKD"),
            ("S$", "SGD"),
            ("R$", "BRL"),
            ("MX$", "MXN"),
            ("€", "EUR"),
            ("£", "GBP"),
            ("¥", "JPY"),
            ("₩", "KRW"),
            ("₹", "INR"),
            ("zł", "PLN"),
            ("kr", "SEK"),
        ]
        .iter()
        .map(|(s, c)| (s.to_string(), c.to_string()))
        .collect();

        symbols.push(("$".to_string(), config.bare_symbol_currency.to_ascii_uppercase()));

        // Longest prefix first; any strict prefix is shorter in bytes.
        symbols.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self { symbols }
    }

    /// Parse price text into `(currency code, amount)`.
    ///
    /// Forms tried in order: symbol prefix, "CODE amount", "amount CODE".
    /// Empty/whitespace input yields `None` silently; input containing a
    /// digit that matches no form yields `None` and records an
    /// unrecognized-format diagnostic.
    pub fn parse(&self, text: &str, diags: &mut Diagnostics) -> Option<(String, f64)> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        // (a) Symbol/prefix table, longest first.
        for (symbol, code) in &self.symbols {
            if let Some(rest) = trimmed.strip_prefix(symbol.as_str()) {
                if let Some(amount) = parse_amount(rest) {
                    return Some((code.clone(), amount));
                }
            }
        }

        // (b) Three-letter code followed by a number: "CAD 30" or "CAD30".
        let leading_alpha: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if leading_alpha.len() == 3 {
            let rest = &trimmed[leading_alpha.len()..];
            if let Some(amount) = parse_amount(rest) {
                return Some((leading_alpha.to_ascii_uppercase(), amount));
            }
        }

        // (c) Number followed by a three-letter code: "30 CAD".
        let trailing_alpha: String = trimmed
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if trailing_alpha.len() == 3 {
            let rest = &trimmed[..trimmed.len() - trailing_alpha.len()];
            if let Some(amount) = parse_amount(rest) {
                return Some((trailing_alpha.to_ascii_uppercase(), amount));
            }
        }

        if trimmed.chars().any(|c| c.is_ascii_digit()) {
            diags.record_unrecognized(trimmed);
        }
        None
    }
}

/// Parse a numeric amount, stripping thousands separators first.
fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Some(amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PriceParser {
        PriceParser::new(&CurrencyConfig::default())
    }

    #[test]
    fn test_country_qualified_dollar() {
        let mut diags = Diagnostics::new();
        let p = parser();

        assert_eq!(p.parse("CA$30", &mut diags), Some(("CAD".to_string(), 30.0)));
        assert_eq!(p.parse("US$25", &mut diags), Some(("USD".to_string(), 25.0)));
        assert_eq!(p.parse("A$19.50", &mut diags), Some(("AUD".to_string(), 19.5)));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_bare_dollar_uses_default_currency() {
        let mut diags = Diagnostics::new();
        assert_eq!(parser().parse("$25", &mut diags), Some(("USD".to_string(), 25.0)));
    }

    #[test]
    fn test_non_dollar_symbols() {
        let mut diags = Diagnostics::new();
        let p = parser();

        assert_eq!(p.parse("€24.99", &mut diags), Some(("EUR".to_string(), 24.99)));
        assert_eq!(p.parse("£18", &mut diags), Some(("GBP".to_string(), 18.0)));
        assert_eq!(p.parse("¥3,500", &mut diags), Some(("JPY".to_string(), 3500.0)));
    }

    #[test]
    fn test_code_then_amount() {
        let mut diags = Diagnostics::new();
        let p = parser();

        assert_eq!(p.parse("CAD 30", &mut diags), Some(("CAD".to_string(), 30.0)));
        assert_eq!(p.parse("eur 12.50", &mut diags), Some(("EUR".to_string(), 12.5)));
    }

    #[test]
    fn test_amount_then_code() {
        let mut diags = Diagnostics::new();
        assert_eq!(
            parser().parse("1,250.75 JPY", &mut diags),
            Some(("JPY".to_string(), 1250.75))
        );
    }

    #[test]
    fn test_empty_input_silent() {
        let mut diags = Diagnostics::new();
        assert_eq!(parser().parse("   ", &mut diags), None);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unrecognized_with_digit_is_diagnosed() {
        let mut diags = Diagnostics::new();
        assert_eq!(parser().parse("about 30 bucks", &mut diags), None);
        assert_eq!(diags.unrecognized_formats.len(), 1);
    }

    #[test]
    fn test_unrecognized_without_digit_silent() {
        let mut diags = Diagnostics::new();
        assert_eq!(parser().parse("free", &mut diags), None);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_thousands_separators_stripped() {
        let mut diags = Diagnostics::new();
        assert_eq!(
            parser().parse("$1,234,567.89", &mut diags),
            Some(("USD".to_string(), 1_234_567.89))
        );
    }
}

use serde::Serialize;

use crate::models::InstrumentQuote;

/// Quote expressed the other way round (`1 / price`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InvertedQuote {
    pub value: f64,
    pub change: f64,
}

/// Inverts a `price`/`change` pair.
///
/// The change is `1/p - 1/(p - c)`, or 0 when the previous price is zero or the change is
/// not finite. `None` when the price is zero or not finite.
///
/// # Examples
///
/// ```
/// use macrodash_data::derived::invert_quote;
///
/// let inverted = invert_quote(1.25, 0.0).unwrap();
/// assert_eq!(inverted.value, 0.8);
/// assert!(invert_quote(0.0, 0.1).is_none());
/// ```
pub fn invert_quote(price: f64, change: f64) -> Option<InvertedQuote> {
    if !price.is_finite() || price == 0.0 {
        return None;
    }

    let value = 1.0 / price;
    let previous = price - change;
    let change = if change.is_finite() && previous != 0.0 {
        value - 1.0 / previous
    } else {
        0.0
    };

    Some(InvertedQuote { value, change })
}

/// Swaps the legs of a six-letter pair, keeping any `=X` suffix (`GBPUSD=X` -> `USDGBP=X`).
pub fn flip_pair_symbol(symbol: &str) -> String {
    let (pair, suffix) = match symbol.strip_suffix("=X") {
        Some(pair) => (pair, "=X"),
        None => (symbol, ""),
    };
    if pair.len() != 6 || !pair.is_ascii() {
        return symbol.to_string();
    }
    format!("{}{}{}", &pair[3..], &pair[..3], suffix)
}

/// Inverts a pair quote, flipping its symbol and recomputing the percent change.
pub fn invert_instrument_quote(quote: &InstrumentQuote) -> Option<InstrumentQuote> {
    let inverted = invert_quote(quote.price, quote.change)?;
    let previous = inverted.value - inverted.change;
    let change_percent = if previous != 0.0 {
        inverted.change / previous * 100.0
    } else {
        0.0
    };

    let symbol = flip_pair_symbol(&quote.symbol);
    let pair = symbol.trim_end_matches("=X");
    let legs = (pair.len() == 6 && pair.is_ascii()).then(|| (&pair[..3], &pair[3..]));

    Some(InstrumentQuote {
        symbol: symbol.to_string(),
        display_name: legs
            .map(|(base, quote_leg)| format!("{}/{}", base, quote_leg))
            .or_else(|| quote.display_name.clone()),
        price: inverted.value,
        change: inverted.change,
        change_percent,
        currency: legs.map(|(_, quote_leg)| quote_leg.to_string()),
        exchange: quote.exchange.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_quote() {
        let inv = invert_quote(1.25, 0.05).unwrap();
        assert!((inv.value - 0.8).abs() < 1e-12);
        assert!((inv.change - (0.8 - 1.0 / 1.2)).abs() < 1e-12);
    }

    #[test]
    fn test_invert_quote_degenerate_inputs() {
        assert!(invert_quote(0.0, 1.0).is_none());
        assert!(invert_quote(f64::INFINITY, 1.0).is_none());
        // Previous price would be zero
        assert_eq!(invert_quote(2.0, 2.0).unwrap().change, 0.0);
        assert_eq!(invert_quote(2.0, f64::NAN).unwrap().change, 0.0);
    }

    #[test]
    fn test_double_inversion_round_trips() {
        let once = invert_quote(1.3456, -0.0123).unwrap();
        let twice = invert_quote(once.value, once.change).unwrap();
        assert!((twice.value - 1.3456).abs() < 1e-9);
        assert!((twice.change + 0.0123).abs() < 1e-9);
    }

    #[test]
    fn test_flip_pair_symbol() {
        assert_eq!(flip_pair_symbol("GBPUSD=X"), "USDGBP=X");
        assert_eq!(flip_pair_symbol("EURUSD"), "USDEUR");
        assert_eq!(flip_pair_symbol("^GSPC"), "^GSPC");
    }

    #[test]
    fn test_invert_instrument_quote() {
        let mut quote = InstrumentQuote::new("GBPUSD=X", 1.25, 0.05, 4.1667);
        quote.currency = Some("USD".to_string());

        let inv = invert_instrument_quote(&quote).unwrap();
        assert_eq!(inv.symbol, "USDGBP=X");
        assert_eq!(inv.display_name.as_deref(), Some("USD/GBP"));
        assert_eq!(inv.currency.as_deref(), Some("GBP"));
        assert!((inv.price - 0.8).abs() < 1e-12);

        // Previous inverted price is 1/1.2
        let expected_pct = (0.8 - 1.0 / 1.2) / (1.0 / 1.2) * 100.0;
        assert!((inv.change_percent - expected_pct).abs() < 1e-9);
    }
}

//! Financial Modeling Prep `stable/quote` decoder.
//!
//! The endpoint answers with either a single row object or an array holding one row.

use serde::Deserialize;
use serde_json::Value;

use super::number_from_value;
use crate::models::InstrumentQuote;
use crate::normalizer::{ProviderTicker, SymbolNormalizer};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpQuoteRow {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    /// Number or numeric string such as `"1.25"`
    #[serde(default, alias = "changePercentage")]
    pub changes_percentage: Option<Value>,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FmpQuotePayload {
    Many(Vec<FmpQuoteRow>),
    One(FmpQuoteRow),
}

impl FmpQuotePayload {
    /// The first row, if any.
    pub fn into_row(self) -> Option<FmpQuoteRow> {
        match self {
            Self::Many(rows) => rows.into_iter().next(),
            Self::One(row) => Some(row),
        }
    }
}

/// Reads a change percentage, falling back to `change / previous * 100`, then to 0.
pub fn parse_change_pct(raw: Option<&Value>, previous: Option<f64>, change: f64) -> f64 {
    if let Some(pct) = raw.and_then(parse_percent) {
        return pct;
    }
    match previous {
        Some(prev) if prev != 0.0 && prev.is_finite() => change / prev * 100.0,
        _ => 0.0,
    }
}

fn parse_percent(value: &Value) -> Option<f64> {
    if let Value::String(s) = value {
        let trimmed = s.trim().trim_end_matches('%').trim();
        return number_from_value(&Value::String(trimmed.to_string()));
    }
    number_from_value(value)
}

/// Maps a provider row onto the quote returned for `requested`.
///
/// Price defaults to 0. Previous close is reported or derived as `price - change`; change is
/// reported or derived as `price - previous`.
pub fn to_instrument_quote(
    requested: &str,
    ticker: &ProviderTicker,
    row: &FmpQuoteRow,
    normalizer: &SymbolNormalizer,
) -> InstrumentQuote {
    let price = row.price.unwrap_or(0.0);
    let previous = row.previous_close.or_else(|| Some(row.price? - row.change?));
    let change = row
        .change
        .or_else(|| previous.map(|prev| price - prev))
        .unwrap_or(0.0);
    let change_percent = parse_change_pct(row.changes_percentage.as_ref(), previous, change);

    let display_name = row
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| ticker.symbol.clone());

    InstrumentQuote {
        symbol: requested.to_string(),
        display_name: Some(display_name),
        price,
        change,
        change_percent,
        currency: normalizer.currency_for(ticker, row.currency.as_deref()),
        exchange: row.exchange.clone(),
    }
}

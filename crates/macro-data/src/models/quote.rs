use serde::{Deserialize, Serialize};

/// Normalized market quote for one requested ticker.
///
/// `symbol` is the ticker the caller asked for, before substitution or remapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentQuote {
    pub symbol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    pub price: f64,

    /// Absolute change versus previous close
    pub change: f64,

    /// Change versus previous close, in percent
    pub change_percent: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

impl InstrumentQuote {
    /// Create a quote with minimal required fields
    pub fn new(symbol: impl Into<String>, price: f64, change: f64, change_percent: f64) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: None,
            price,
            change,
            change_percent,
            currency: None,
            exchange: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_new() {
        let quote = InstrumentQuote::new("^GSPC", 5000.0, 25.0, 0.5);
        assert_eq!(quote.symbol, "^GSPC");
        assert!(quote.display_name.is_none());
        assert_eq!(quote.change, 25.0);
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let mut quote = InstrumentQuote::new("BTC-USD", 60000.0, -600.0, -0.99);
        quote.currency = Some("USD".to_string());
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["changePercent"], -0.99);
        assert_eq!(json["currency"], "USD");
        assert!(json.get("displayName").is_none());
    }
}

//! Provider payload decoders.
//!
//! Each submodule owns the typed wire structures of one upstream format and reduces them to
//! [`CountryMetricMap`](crate::models::CountryMetricMap)s, series or quotes. Decoders are pure:
//! a payload with an unexpected shape decodes to `None` (no data) instead of an error.
//!
//! - `sdmx` - SDMX-JSON (ECB)
//! - `jsonstat` - JSON-stat cubes (Eurostat)
//! - `world_bank` - `[metadata, rows]` pages (World Bank)
//! - `fred` - flat observation arrays (FRED)
//! - `fmp` - quote rows (Financial Modeling Prep)

pub mod fmp;
pub mod fred;
pub mod jsonstat;
pub mod sdmx;
pub mod world_bank;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::MacroDataError;
use crate::models::DataSource;

/// Parses a response body into a provider's wire structure.
pub fn parse_body<T: DeserializeOwned>(
    source: DataSource,
    body: &str,
) -> Result<T, MacroDataError> {
    serde_json::from_str(body).map_err(|e| MacroDataError::decode(source.as_str(), e.to_string()))
}

/// Numeric reading of a JSON scalar. Numeric strings are accepted, non-finite results are not.
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

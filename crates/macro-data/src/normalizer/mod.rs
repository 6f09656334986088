//! Symbol and country code normalization.
//!
//! - `countries` - ISO-3 <-> ISO-2 table for the tracked countries
//! - `symbols` - ticker mapping, substitution and blocklist for the quote provider

mod countries;
mod symbols;

pub use countries::{CountryTable, TrackedCountry, DEFAULT_COUNTRIES};
pub use symbols::{NormalizedBatch, ProviderTicker, SymbolNormalizer, SymbolTables, TickerKind};

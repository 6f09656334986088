//! Macro Dashboard Data Crate
//!
//! This crate normalizes and merges macroeconomic and market data from public statistical
//! and market providers for the macro dashboard.
//!
//! # Overview
//!
//! The crate supports:
//! - Decoding SDMX-JSON (ECB), JSON-stat (Eurostat), World Bank, FRED and FMP payloads
//! - Derived metrics: year-over-year change, real wage growth, FX inversion, per capita,
//!   yield curve spreads
//! - Ticker and country code normalization
//! - Merging per-country maps from several sources with an explicit priority order
//! - Cancellable, partially failing panel loads
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |    Transport     | --> |  Provider client |  (URL building, one per upstream)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Decoder      |  (wire format -> CountryMetricMap)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | Derived / Merge  |  (pure calculators, source priority)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | DashboardService |  (panel views)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CountryMetricMap`] - Latest observation per country
//! - [`Observation`] / [`SeriesPoint`] - A period with a (possibly missing) value
//! - [`InstrumentQuote`] - Normalized market quote
//! - [`MergedMap`] - Merge result with per-country provenance
//! - [`DashboardService`] - Loads every panel through an injected [`Transport`]

pub mod dashboard;
pub mod decoder;
pub mod derived;
pub mod errors;
pub mod merge;
pub mod models;
pub mod normalizer;
pub mod provider;

// Re-export all public types from models
pub use models::{
    CountryCode, CountryMetricMap, CountrySeriesMap, DataSource, InstrumentQuote, Metric,
    Observation, PeriodLabel, PeriodOrder, SeriesPoint,
};

// Re-export error types
pub use errors::{ErrorClass, MacroDataError};

pub use merge::{merge, MergeOrder, MergedMap, SourceMaps};
pub use normalizer::{CountryTable, SymbolNormalizer, SymbolTables};

// Re-export provider types
pub use provider::{
    EcbClient, EurostatClient, FmpClient, FredClient, MemoryTransport, ProviderEndpoints,
    ReqwestTransport, Transport, WorldBankClient,
};

pub use dashboard::{DashboardConfig, DashboardService};

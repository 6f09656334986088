//! Macro data models
//!
//! This module contains the core data types shared by decoders, calculators and views:
//! - `types` - Type aliases for common identifiers (CountryCode)
//! - `period` - Period labels and provider-specific ordering (PeriodLabel, PeriodOrder)
//! - `observation` - Single values and series points (Observation, SeriesPoint)
//! - `country_map` - Latest-per-country and history-per-country maps
//! - `quote` - Normalized market quotes (InstrumentQuote)
//! - `source` - Data source and metric identifiers (DataSource, Metric)

mod country_map;
mod observation;
mod period;
mod quote;
mod source;
mod types;

pub use country_map::{CountryMetricMap, CountrySeriesMap};
pub use observation::{Observation, SeriesPoint};
pub use period::{PeriodLabel, PeriodOrder};
pub use quote::InstrumentQuote;
pub use source::{DataSource, Metric};
pub use types::CountryCode;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upstream data source, also used as provider id in logs and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// European Central Bank statistical data warehouse (SDMX-JSON)
    Ecb,
    /// Eurostat dissemination API (JSON-stat)
    Eurostat,
    /// World Bank indicators API (tabular JSON)
    WorldBank,
    /// St. Louis Fed FRED observations
    Fred,
    /// Financial Modeling Prep quotes
    Fmp,
    /// Computed locally from other sources
    Derived,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ecb => "ECB",
            Self::Eurostat => "EUROSTAT",
            Self::WorldBank => "WORLD_BANK",
            Self::Fred => "FRED",
            Self::Fmp => "FMP",
            Self::Derived => "DERIVED",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-country macro metric shown on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// GDP, millions of the source's currency
    Gdp,
    GdpPerCapita,
    /// Inflation, percent year over year
    Inflation,
    /// Unemployment, percent of active population
    Unemployment,
    /// Long-term government bond yield (or lending rate proxy), percent
    LongTermRate,
    /// Nominal wage growth minus CPI growth, percent
    RealWageGrowth,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Gdp,
        Metric::GdpPerCapita,
        Metric::Inflation,
        Metric::Unemployment,
        Metric::LongTermRate,
        Metric::RealWageGrowth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gdp => "gdp",
            Self::GdpPerCapita => "gdpPerCapita",
            Self::Inflation => "inflation",
            Self::Unemployment => "unemployment",
            Self::LongTermRate => "longTermRate",
            Self::RealWageGrowth => "realWageGrowth",
        }
    }
}

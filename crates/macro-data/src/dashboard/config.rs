//! Stock panel configuration.

use serde::{Deserialize, Serialize};

use crate::derived::PopulationTable;
use crate::provider::{
    EcbRequest, EurostatQuery, FredSeriesSpec, DEFAULT_CHUNK_SIZE, DEFAULT_PER_PAGE,
};

/// Euro-area members covered by the regional sources.
pub const EURO_AREA: [&str; 8] = ["DE", "FR", "ES", "NL", "IT", "LT", "EE", "LV"];

/// Countries covered by the World Bank indicators.
pub const GLOBAL: [&str; 5] = ["JP", "CN", "US", "RU", "IN"];

/// World Bank indicator codes used by the macro panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBankIndicators {
    /// GDP, current US$ (rescaled to millions)
    pub gdp: String,
    pub gdp_per_capita: String,
    /// CPI inflation, annual %
    pub inflation: String,
    pub unemployment: String,
    /// Lending rate, used where no long-term bond yield is published
    pub lending_rate: String,
    /// Nominal income level used as the wage series
    pub wage_level: String,
    /// CPI level series
    pub cpi_level: String,
}

impl Default for WorldBankIndicators {
    fn default() -> Self {
        Self {
            gdp: "NY.GDP.MKTP.CD".to_string(),
            gdp_per_capita: "NY.GDP.PCAP.CD".to_string(),
            inflation: "FP.CPI.TOTL.ZG".to_string(),
            unemployment: "SL.UEM.TOTL.ZS".to_string(),
            lending_rate: "FR.INR.LEND".to_string(),
            wage_level: "NY.GNP.PCAP.CN".to_string(),
            cpi_level: "FP.CPI.TOTL".to_string(),
        }
    }
}

/// Treasury tenor shown on the yield curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tenor {
    #[serde(rename = "3M")]
    ThreeMonth,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYear,
    #[serde(rename = "10Y")]
    TenYear,
    #[serde(rename = "30Y")]
    ThirtyYear,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenorSpec {
    pub tenor: Tenor,
    pub series_id: String,
}

/// FX pair shown on the FX panel, read from a quote ticker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxPairSpec {
    /// Display label, USD first (`USD/CNY`)
    pub label: String,
    pub symbol: String,
    /// The ticker quotes the label's pair the other way round.
    #[serde(default)]
    pub invert: bool,
}

impl FxPairSpec {
    fn new(label: &str, symbol: &str, invert: bool) -> Self {
        Self {
            label: label.to_string(),
            symbol: symbol.to_string(),
            invert,
        }
    }
}

/// Everything the dashboard fetches, with the stock defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub ecb_gdp: EcbRequest,
    pub ecb_inflation: EcbRequest,
    pub ecb_usd_eur: EcbRequest,
    pub eurostat_unemployment: EurostatQuery,
    pub eurostat_long_term_rates: EurostatQuery,
    pub population: PopulationTable,
    pub world_bank_countries: Vec<String>,
    pub world_bank_indicators: WorldBankIndicators,
    pub world_bank_per_page: u32,
    pub fred_series: Vec<FredSeriesSpec>,
    pub treasury_tenors: Vec<TenorSpec>,
    pub indices: Vec<String>,
    pub assets: Vec<String>,
    pub fx_pairs: Vec<FxPairSpec>,
    pub quote_chunk_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let euro_area = EURO_AREA.join("+");
        let to_strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let population = [
            ("DE", 84_000_000.0),
            ("FR", 68_000_000.0),
            ("ES", 48_000_000.0),
            ("NL", 18_000_000.0),
            ("IT", 59_000_000.0),
            ("LT", 2_900_000.0),
            ("EE", 1_360_000.0),
            ("LV", 1_850_000.0),
        ]
        .into_iter()
        .map(|(c, p)| (c.into(), p))
        .collect();

        let tenor = |tenor, series_id: &str| TenorSpec {
            tenor,
            series_id: series_id.to_string(),
        };

        Self {
            ecb_gdp: EcbRequest::new(
                format!("MNA/A.N.{}.W2.S1.S1.B.B1GQ._Z._Z._Z.EUR.V.N", euro_area),
                "2015",
            ),
            ecb_inflation: EcbRequest::new(
                format!("ICP/M.{}.N.000000.4.ANR", euro_area),
                "2019-01",
            ),
            ecb_usd_eur: EcbRequest::new("EXR/D.USD.EUR.SP00.A", "2025-01-01"),
            eurostat_unemployment: EurostatQuery::new("une_rt_m")
                .filter("freq", "M")
                .filter("s_adj", "SA")
                .filter("unit", "PC_ACT")
                .filter("sex", "T")
                .geo(EURO_AREA)
                .since("2019-01"),
            eurostat_long_term_rates: EurostatQuery::new("irt_lt_mcby_m")
                .filter("freq", "M")
                .filter("int_rt", "MCBY")
                .geo(EURO_AREA)
                .since("2019-01"),
            population,
            world_bank_countries: to_strings(&GLOBAL),
            world_bank_indicators: WorldBankIndicators::default(),
            world_bank_per_page: DEFAULT_PER_PAGE,
            fred_series: vec![
                FredSeriesSpec::level("fedFunds", "DFF"),
                FredSeriesSpec::level("primeRate", "MPRIME"),
                FredSeriesSpec::yoy("inflationCPI", "CPIAUCSL"),
                FredSeriesSpec::level("treasury10y", "DGS10"),
                FredSeriesSpec::level("treasury2y", "DGS2"),
                FredSeriesSpec::level("treasury30y", "DGS30"),
                FredSeriesSpec::level("mortgage30y", "MORTGAGE30US"),
                FredSeriesSpec::level("autoLoan60m", "RIFLPBCIANM60NM"),
                FredSeriesSpec::level("creditCardAPR", "TERMCBCCALLNS"),
                FredSeriesSpec::level("treasury3m", "DGS3MO"),
                FredSeriesSpec::level("treasury1y", "DGS1"),
            ],
            treasury_tenors: vec![
                tenor(Tenor::ThreeMonth, "DGS3MO"),
                tenor(Tenor::OneYear, "DGS1"),
                tenor(Tenor::TwoYear, "DGS2"),
                tenor(Tenor::TenYear, "DGS10"),
                tenor(Tenor::ThirtyYear, "DGS30"),
            ],
            indices: to_strings(&["^GSPC", "^NDX", "^DJI", "^STOXX50E", "^FTSE", "^N225", "^HSI"]),
            assets: to_strings(&["BTC-USD", "ETH-USD"]),
            fx_pairs: vec![
                FxPairSpec::new("USD/CNY", "CNY=X", false),
                FxPairSpec::new("USD/GBP", "GBPUSD=X", true),
                FxPairSpec::new("USD/CHF", "CHF=X", false),
                FxPairSpec::new("USD/JPY", "JPY=X", false),
            ],
            quote_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requests() {
        let config = DashboardConfig::default();
        assert_eq!(
            config.ecb_gdp.endpoint,
            "MNA/A.N.DE+FR+ES+NL+IT+LT+EE+LV.W2.S1.S1.B.B1GQ._Z._Z._Z.EUR.V.N"
        );
        assert_eq!(
            config.ecb_inflation.endpoint,
            "ICP/M.DE+FR+ES+NL+IT+LT+EE+LV.N.000000.4.ANR"
        );
        assert_eq!(config.eurostat_unemployment.geo.len(), 8);
        assert_eq!(config.population.len(), 8);
        assert!(config.fred_series.iter().any(|s| s.series_id == "CPIAUCSL" && s.yoy));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{ "indices": ["^GSPC"], "quoteChunkSize": 4 }"#).unwrap();
        assert_eq!(config.indices, vec!["^GSPC"]);
        assert_eq!(config.quote_chunk_size, 4);
        assert_eq!(config.assets, vec!["BTC-USD", "ETH-USD"]);
    }
}

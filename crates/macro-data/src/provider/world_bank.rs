//! World Bank indicators API client.

use std::sync::Arc;

use tracing::{debug, warn};

use super::endpoints::build_url;
use super::transport::Transport;
use crate::decoder::{parse_body, world_bank};
use crate::errors::MacroDataError;
use crate::models::{CountryMetricMap, CountrySeriesMap, DataSource};
use crate::normalizer::CountryTable;

pub const DEFAULT_PER_PAGE: u32 = 1000;

#[derive(Clone)]
pub struct WorldBankClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    countries: Arc<CountryTable>,
    per_page: u32,
}

impl WorldBankClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        countries: Arc<CountryTable>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            countries,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Indicator URL for ISO-2 `countries`. Codes missing from the country table are left out.
    pub fn indicator_url(&self, countries: &[String], indicator: &str) -> String {
        let iso3: Vec<&str> = countries
            .iter()
            .filter_map(|c| {
                let code = self.countries.iso2_to_iso3(c);
                if code.is_none() {
                    warn!("No ISO-3 code for '{}', skipping", c);
                }
                code
            })
            .collect();
        let path = format!("country/{}/indicator/{}", iso3.join(";"), indicator);
        let per_page = self.per_page.to_string();
        build_url(
            &self.base_url,
            &path,
            &[("format", "json"), ("per_page", per_page.as_str())],
        )
    }

    pub async fn fetch(
        &self,
        countries: &[String],
        indicator: &str,
    ) -> Result<world_bank::WorldBankResponse, MacroDataError> {
        let body = self
            .transport
            .get(DataSource::WorldBank, &self.indicator_url(countries, indicator))
            .await?;
        parse_body(DataSource::WorldBank, &body)
    }

    /// Latest non-null value per country.
    pub async fn latest(
        &self,
        countries: &[String],
        indicator: &str,
    ) -> Result<Option<CountryMetricMap>, MacroDataError> {
        let response = self.fetch(countries, indicator).await?;
        let map = world_bank::latest_by_country(&response, &self.countries);
        debug!(
            "World Bank {}: {} countries",
            indicator,
            map.as_ref().map(|m| m.len()).unwrap_or(0)
        );
        Ok(map)
    }

    /// Ascending history per country.
    pub async fn history(
        &self,
        countries: &[String],
        indicator: &str,
    ) -> Result<Option<CountrySeriesMap>, MacroDataError> {
        let response = self.fetch(countries, indicator).await?;
        Ok(world_bank::history_by_country(&response, &self.countries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryTransport;

    const BASE: &str = "https://wb.test";

    fn countries(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_indicator_url_maps_to_iso3() {
        let client = WorldBankClient::new(
            Arc::new(MemoryTransport::new()),
            BASE,
            Arc::new(CountryTable::default()),
        );
        assert_eq!(
            client.indicator_url(&countries(&["JP", "CN", "XX"]), "NY.GDP.MKTP.CD"),
            "https://wb.test/country/JPN;CHN/indicator/NY.GDP.MKTP.CD?format=json&per_page=1000"
        );
    }

    #[tokio::test]
    async fn test_latest_and_history() {
        let body = r#"[
            { "page": 1, "pages": 1, "per_page": 1000, "total": 3 },
            [
                { "countryiso3code": "IND", "date": "2023", "value": 5.4 },
                { "countryiso3code": "IND", "date": "2022", "value": 6.7 },
                { "countryiso3code": "IND", "date": "2021", "value": null }
            ]
        ]"#;
        let transport = MemoryTransport::new().with_body(BASE, body);
        let client =
            WorldBankClient::new(Arc::new(transport), BASE, Arc::new(CountryTable::default()));

        let latest = client
            .latest(&countries(&["IN"]), "FP.CPI.TOTL.ZG")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.value("IN"), Some(5.4));

        let history = client
            .history(&countries(&["IN"]), "FP.CPI.TOTL.ZG")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(history["IN"].len(), 2);
        assert_eq!(history["IN"][0].value, 6.7);
    }
}

//! Eurostat dissemination API client (JSON-stat).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::endpoints::build_url;
use super::transport::Transport;
use crate::decoder::{jsonstat, parse_body};
use crate::errors::MacroDataError;
use crate::models::{CountryMetricMap, DataSource};

/// Dataset query: fixed dimension filters, a repeated `geo` filter and a start period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EurostatQuery {
    pub dataset: String,
    #[serde(default)]
    pub filters: Vec<(String, String)>,
    #[serde(default)]
    pub geo: Vec<String>,
    #[serde(default)]
    pub since_time_period: Option<String>,
}

impl EurostatQuery {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            filters: Vec::new(),
            geo: Vec::new(),
            since_time_period: None,
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn geo<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.geo.extend(countries.into_iter().map(Into::into));
        self
    }

    pub fn since(mut self, period: impl Into<String>) -> Self {
        self.since_time_period = Some(period.into());
        self
    }
}

#[derive(Clone)]
pub struct EurostatClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl EurostatClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn dataset_url(&self, query: &EurostatQuery) -> String {
        let mut params: Vec<(&str, &str)> = query
            .filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        params.extend(query.geo.iter().map(|g| ("geo", g.as_str())));
        if let Some(since) = query.since_time_period.as_deref() {
            params.push(("sinceTimePeriod", since));
        }
        build_url(&self.base_url, &query.dataset, &params)
    }

    pub async fn fetch(
        &self,
        query: &EurostatQuery,
    ) -> Result<jsonstat::JsonStatDataset, MacroDataError> {
        let body = self
            .transport
            .get(DataSource::Eurostat, &self.dataset_url(query))
            .await?;
        parse_body(DataSource::Eurostat, &body)
    }

    /// Latest value per `geo`; `Ok(None)` when the cube lacks a `geo` or `time` dimension.
    pub async fn latest_by_country(
        &self,
        query: &EurostatQuery,
    ) -> Result<Option<CountryMetricMap>, MacroDataError> {
        let dataset = self.fetch(query).await?;
        let map = jsonstat::latest_by_country(&dataset);
        debug!(
            "Eurostat {}: {} countries",
            query.dataset,
            map.as_ref().map(|m| m.len()).unwrap_or(0)
        );
        Ok(map)
    }
}

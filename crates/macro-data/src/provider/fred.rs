//! FRED observations client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::endpoints::build_url;
use super::transport::Transport;
use crate::decoder::fred::{self, FredResponse, FredSeries};
use crate::decoder::parse_body;
use crate::errors::MacroDataError;
use crate::models::DataSource;

/// One series on the US economics table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FredSeriesSpec {
    /// Key used in the rendered table (`fedFunds`, `treasury10y`, ...)
    pub key: String,
    pub series_id: String,
    /// Report year-over-year percent change instead of the level.
    #[serde(default)]
    pub yoy: bool,
}

impl FredSeriesSpec {
    pub fn level(key: impl Into<String>, series_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            series_id: series_id.into(),
            yoy: false,
        }
    }

    pub fn yoy(key: impl Into<String>, series_id: impl Into<String>) -> Self {
        Self {
            yoy: true,
            ..Self::level(key, series_id)
        }
    }
}

#[derive(Clone)]
pub struct FredClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: Option<String>,
}

impl FredClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Observations URL. The key parameter is omitted when no key is configured so a proxy
    /// can inject it.
    pub fn observations_url(&self, series_id: &str) -> String {
        let mut params = vec![("series_id", series_id)];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("api_key", key));
        }
        params.push(("file_type", "json"));
        build_url(&self.base_url, "fred/series/observations", &params)
    }

    pub async fn fetch(&self, series_id: &str) -> Result<FredResponse, MacroDataError> {
        let body = self
            .transport
            .get(DataSource::Fred, &self.observations_url(series_id))
            .await?;
        parse_body(DataSource::Fred, &body)
    }

    pub async fn series(&self, spec: &FredSeriesSpec) -> Result<FredSeries, MacroDataError> {
        let response = self.fetch(&spec.series_id).await?;
        debug!(
            "FRED {}: {} observations",
            spec.series_id,
            response.observations.len()
        );

        Ok(if spec.yoy {
            fred::latest_yoy(&spec.series_id, &response)
        } else {
            fred::latest(&spec.series_id, &response)
        })
    }
}

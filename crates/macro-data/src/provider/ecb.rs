//! ECB statistical data warehouse client (SDMX-JSON).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::endpoints::build_url;
use super::transport::Transport;
use crate::decoder::{parse_body, sdmx};
use crate::errors::MacroDataError;
use crate::models::{CountryMetricMap, DataSource, Observation};

/// One SDMX data query: `{flow}/{key}` plus an optional start period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcbRequest {
    pub endpoint: String,
    #[serde(default)]
    pub start_period: Option<String>,
}

impl EcbRequest {
    pub fn new(endpoint: impl Into<String>, start_period: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            start_period: Some(start_period.into()),
        }
    }
}

#[derive(Clone)]
pub struct EcbClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl EcbClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn data_url(&self, request: &EcbRequest) -> String {
        let path = format!("service/data/{}", request.endpoint.trim_matches('/'));
        let mut params = Vec::with_capacity(2);
        if let Some(start) = request.start_period.as_deref() {
            params.push(("startPeriod", start));
        }
        params.push(("format", "jsondata"));
        build_url(&self.base_url, &path, &params)
    }

    pub async fn fetch(&self, request: &EcbRequest) -> Result<sdmx::SdmxMessage, MacroDataError> {
        let body = self
            .transport
            .get(DataSource::Ecb, &self.data_url(request))
            .await?;
        parse_body(DataSource::Ecb, &body)
    }

    /// Latest observation per reference area; `Ok(None)` when the message holds no series.
    pub async fn latest_by_country(
        &self,
        request: &EcbRequest,
    ) -> Result<Option<CountryMetricMap>, MacroDataError> {
        let message = self.fetch(request).await?;
        let map = sdmx::latest_by_country(&message);
        debug!(
            "ECB {}: {} areas",
            request.endpoint,
            map.as_ref().map(|m| m.len()).unwrap_or(0)
        );
        Ok(map)
    }

    /// Latest observation of the first series in the message.
    pub async fn latest_value(
        &self,
        request: &EcbRequest,
    ) -> Result<Option<Observation>, MacroDataError> {
        let message = self.fetch(request).await?;
        Ok(sdmx::first_series_latest(&message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryTransport;

    const BASE: &str = "https://ecb.test";

    #[test]
    fn test_data_url() {
        let client = EcbClient::new(Arc::new(MemoryTransport::new()), BASE);
        let url = client.data_url(&EcbRequest::new("ICP/M.DE+FR.N.000000.4.ANR", "2019-01"));
        assert_eq!(
            url,
            "https://ecb.test/service/data/ICP/M.DE+FR.N.000000.4.ANR?startPeriod=2019-01&format=jsondata"
        );
    }

    #[tokio::test]
    async fn test_latest_by_country() {
        let body = r#"{
            "dataSets": [{ "series": { "0": { "observations": { "0": [2.1], "1": [2.4] } } } }],
            "structure": { "dimensions": {
                "series": [{ "id": "REF_AREA", "values": [{ "id": "FR" }] }],
                "observation": [{ "id": "TIME_PERIOD", "values": [{ "id": "2024-04" }, { "id": "2024-05" }] }]
            } }
        }"#;
        let transport =
            MemoryTransport::new().with_body(format!("{}/service/data/ICP", BASE), body);
        let client = EcbClient::new(Arc::new(transport), BASE);

        let map = client
            .latest_by_country(&EcbRequest::new("ICP/M.FR.N.000000.4.ANR", "2019-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(map.value("FR"), Some(2.4));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let transport = MemoryTransport::new().with_body(BASE, "<html>maintenance</html>");
        let client = EcbClient::new(Arc::new(transport), BASE);

        let err = client
            .latest_value(&EcbRequest::new("EXR/D.USD.EUR.SP00.A", "2025-01-01"))
            .await
            .unwrap_err();
        assert_eq!(err.class(), crate::errors::ErrorClass::Decode);
    }
}

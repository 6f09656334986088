//! HTTP transport seam shared by all provider clients.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::MacroDataError;
use crate::models::DataSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Performs GET requests for provider clients.
///
/// Implementations return the body of 2xx responses only. Any other status is an error, so
/// callers never decode an error page.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, source: DataSource, url: &str) -> Result<String, MacroDataError>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, source: DataSource, url: &str) -> Result<String, MacroDataError> {
        let provider = source.as_str().to_string();
        debug!("{} request: {}", provider, redact_keys(url));

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MacroDataError::Timeout {
                        provider: provider.clone(),
                    }
                } else {
                    MacroDataError::Transport {
                        provider: provider.clone(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MacroDataError::RateLimited { provider });
        }

        if !status.is_success() {
            return Err(MacroDataError::HttpStatus {
                provider,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| MacroDataError::Transport {
            provider,
            message: format!("Failed to read body: {}", e),
        })
    }
}

/// Strips API key values from a URL before it is logged.
pub(crate) fn redact_keys(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((k, _)) if is_key_param(k) => format!("{}=***", k),
            _ => pair.to_string(),
        })
        .collect();
    format!("{}?{}", base, query.join("&"))
}

fn is_key_param(name: &str) -> bool {
    name.eq_ignore_ascii_case("api_key") || name.eq_ignore_ascii_case("apikey")
}

/// Canned response served by [`MemoryTransport`].
#[derive(Clone, Debug)]
pub enum CannedResponse {
    Ok(String),
    Status(u16),
}

/// In-memory [`Transport`] keyed by URL prefix, for offline runs and tests.
///
/// The longest registered prefix matching a URL wins; unmatched URLs answer 404. Every
/// requested URL is recorded.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    routes: Arc<Mutex<HashMap<String, CannedResponse>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for URLs starting with `prefix`.
    pub fn with_body(self, prefix: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(prefix.into(), CannedResponse::Ok(body.into()));
        self
    }

    /// Answers URLs starting with `prefix` with a non-2xx `status`.
    pub fn with_status(self, prefix: impl Into<String>, status: u16) -> Self {
        self.insert(prefix.into(), CannedResponse::Status(status));
        self
    }

    fn insert(&self, prefix: String, response: CannedResponse) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(prefix, response);
        }
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn lookup(&self, url: &str) -> Option<CannedResponse> {
        let routes = self.routes.lock().ok()?;
        routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, source: DataSource, url: &str) -> Result<String, MacroDataError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        let provider = source.as_str().to_string();
        match self.lookup(url) {
            Some(CannedResponse::Ok(body)) => Ok(body),
            Some(CannedResponse::Status(429)) => Err(MacroDataError::RateLimited { provider }),
            Some(CannedResponse::Status(status)) => {
                Err(MacroDataError::HttpStatus { provider, status })
            }
            None => Err(MacroDataError::HttpStatus {
                provider,
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorClass;

    #[test]
    fn test_redact_keys() {
        assert_eq!(
            redact_keys("https://x/fred?series_id=DFF&api_key=secret&file_type=json"),
            "https://x/fred?series_id=DFF&api_key=***&file_type=json"
        );
        assert_eq!(redact_keys("https://x/quote?apikey=abc"), "https://x/quote?apikey=***");
        assert_eq!(redact_keys("https://x/plain"), "https://x/plain");
    }

    #[tokio::test]
    async fn test_memory_transport_longest_prefix_wins() {
        let transport = MemoryTransport::new()
            .with_body("https://api/", "generic")
            .with_body("https://api/quote?symbol=^GSPC", "specific");

        let body = transport
            .get(DataSource::Fmp, "https://api/quote?symbol=^GSPC&apikey=k")
            .await
            .unwrap();
        assert_eq!(body, "specific");

        let body = transport.get(DataSource::Fmp, "https://api/other").await.unwrap();
        assert_eq!(body, "generic");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_memory_transport_statuses() {
        let transport = MemoryTransport::new()
            .with_status("https://ecb/", 503)
            .with_status("https://fmp/", 429);

        let err = transport.get(DataSource::Ecb, "https://ecb/x").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503 from ECB");

        let err = transport.get(DataSource::Fmp, "https://fmp/x").await.unwrap_err();
        assert!(matches!(err, MacroDataError::RateLimited { .. }));
        assert_eq!(err.class(), ErrorClass::Transport);

        let err = transport.get(DataSource::Fred, "https://nowhere").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404 from FRED");
    }
}

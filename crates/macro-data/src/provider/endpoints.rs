use serde::{Deserialize, Serialize};

pub const ECB_BASE_URL: &str = "https://data-api.ecb.europa.eu";
pub const EUROSTAT_BASE_URL: &str =
    "https://ec.europa.eu/eurostat/api/dissemination/statistics/1.0/data";
pub const WORLD_BANK_BASE_URL: &str = "https://api.worldbank.org/v2";
pub const FRED_BASE_URL: &str = "https://api.stlouisfed.org";
pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com";

/// Base URLs and API keys of the upstream providers.
///
/// Any base URL may point at a same-origin passthrough proxy instead of the real host; in that
/// case the keys can be left empty and injected by the proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderEndpoints {
    pub ecb_base_url: String,
    pub eurostat_base_url: String,
    pub world_bank_base_url: String,
    pub fred_base_url: String,
    pub fmp_base_url: String,
    #[serde(skip_serializing)]
    pub fred_api_key: Option<String>,
    #[serde(skip_serializing)]
    pub fmp_api_key: Option<String>,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            ecb_base_url: ECB_BASE_URL.to_string(),
            eurostat_base_url: EUROSTAT_BASE_URL.to_string(),
            world_bank_base_url: WORLD_BANK_BASE_URL.to_string(),
            fred_base_url: FRED_BASE_URL.to_string(),
            fmp_base_url: FMP_BASE_URL.to_string(),
            fred_api_key: None,
            fmp_api_key: None,
        }
    }
}

impl ProviderEndpoints {
    /// Every provider served from one base URL, as when running behind a local proxy or a
    /// test server. Keys stay unset.
    pub fn all_at(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            ecb_base_url: format!("{}/ecb", base),
            eurostat_base_url: format!("{}/eurostat", base),
            world_bank_base_url: format!("{}/worldbank", base),
            fred_base_url: format!("{}/fred", base),
            fmp_base_url: format!("{}/fmp", base),
            fred_api_key: None,
            fmp_api_key: None,
        }
    }
}

/// Joins a base URL, a path and query parameters. Parameter values are percent-encoded;
/// repeated keys are kept in order.
pub fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    for (i, (key, value)) in params.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

use std::{net::SocketAddr, path::Path, time::Duration};

use anyhow::Context;
use macrodash_data::{DashboardConfig, ProviderEndpoints};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub upstream_timeout: Duration,
    pub endpoints: ProviderEndpoints,
    pub dashboard: DashboardConfig,
    /// Upper bound on tickers accepted by `/quotes`
    pub max_quote_symbols: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            upstream_timeout: Duration::from_millis(15_000),
            endpoints: ProviderEndpoints::default(),
            dashboard: DashboardConfig::default(),
            max_quote_symbols: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `MD_*` settings through `lookup`. Unset or empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(addr) = var("MD_LISTEN_ADDR") {
            config.listen_addr = addr
                .parse()
                .with_context(|| format!("Invalid MD_LISTEN_ADDR '{}'", addr))?;
        }
        if let Some(origins) = var("MD_CORS_ALLOW_ORIGINS") {
            config.cors_allow = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(ms) = var("MD_REQUEST_TIMEOUT_MS") {
            config.request_timeout = Duration::from_millis(
                ms.parse()
                    .with_context(|| format!("Invalid MD_REQUEST_TIMEOUT_MS '{}'", ms))?,
            );
        }
        if let Some(ms) = var("MD_UPSTREAM_TIMEOUT_MS") {
            config.upstream_timeout = Duration::from_millis(
                ms.parse()
                    .with_context(|| format!("Invalid MD_UPSTREAM_TIMEOUT_MS '{}'", ms))?,
            );
        }

        if let Some(path) = var("MD_DASHBOARD_CONFIG") {
            config.dashboard = load_dashboard_config(Path::new(&path))?;
        }
        if let Some(size) = var("MD_QUOTE_CHUNK_SIZE") {
            config.dashboard.quote_chunk_size = size
                .parse()
                .with_context(|| format!("Invalid MD_QUOTE_CHUNK_SIZE '{}'", size))?;
        }
        if let Some(max) = var("MD_MAX_QUOTE_SYMBOLS") {
            config.max_quote_symbols = max
                .parse()
                .with_context(|| format!("Invalid MD_MAX_QUOTE_SYMBOLS '{}'", max))?;
        }

        let endpoints = &mut config.endpoints;
        if let Some(base) = var("MD_PROXY_BASE_URL") {
            *endpoints = ProviderEndpoints::all_at(&base);
        }
        let overrides = [
            ("MD_ECB_BASE_URL", &mut endpoints.ecb_base_url),
            ("MD_EUROSTAT_BASE_URL", &mut endpoints.eurostat_base_url),
            ("MD_WORLD_BANK_BASE_URL", &mut endpoints.world_bank_base_url),
            ("MD_FRED_BASE_URL", &mut endpoints.fred_base_url),
            ("MD_FMP_BASE_URL", &mut endpoints.fmp_base_url),
        ];
        for (key, target) in overrides {
            if let Some(url) = var(key) {
                *target = url;
            }
        }
        endpoints.fred_api_key = var("MD_FRED_API_KEY");
        endpoints.fmp_api_key = var("MD_FMP_API_KEY");

        Ok(config)
    }
}

fn load_dashboard_config(path: &Path) -> anyhow::Result<DashboardConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Reading dashboard config {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Parsing dashboard config {}", path.display()))
}

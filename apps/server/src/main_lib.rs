use std::sync::Arc;

use crate::config::Config;
use macrodash_data::{DashboardService, ReqwestTransport, Transport};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub dashboard: DashboardService,
    pub max_quote_symbols: usize,
}

pub fn init_tracing() {
    let log_format = std::env::var("MD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    let transport: Arc<dyn Transport> =
        Arc::new(ReqwestTransport::with_timeout(config.upstream_timeout));
    build_state_with_transport(config, transport)
}

/// State over a caller-provided transport (canned responses in tests, a proxy client, ...).
pub fn build_state_with_transport(config: &Config, transport: Arc<dyn Transport>) -> Arc<AppState> {
    tracing::info!(
        "Upstreams: ECB {}, Eurostat {}, World Bank {}, FRED {}, FMP {}",
        config.endpoints.ecb_base_url,
        config.endpoints.eurostat_base_url,
        config.endpoints.world_bank_base_url,
        config.endpoints.fred_base_url,
        config.endpoints.fmp_base_url,
    );
    if config.endpoints.fmp_api_key.is_none() {
        tracing::warn!("MD_FMP_API_KEY not set; quote requests rely on a key-injecting proxy");
    }

    let dashboard = DashboardService::new(transport, &config.endpoints, config.dashboard.clone());
    Arc::new(AppState {
        dashboard,
        max_quote_symbols: config.max_quote_symbols,
    })
}

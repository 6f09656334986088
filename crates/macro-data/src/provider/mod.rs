//! Upstream provider clients.
//!
//! Every client builds its URLs from [`ProviderEndpoints`] and performs requests through an
//! injected [`Transport`], so the same code runs against the real hosts, a passthrough proxy
//! or canned responses.

mod ecb;
mod endpoints;
mod eurostat;
mod fmp;
mod fred;
mod transport;
mod world_bank;

pub use ecb::{EcbClient, EcbRequest};
pub use endpoints::{
    build_url, ProviderEndpoints, ECB_BASE_URL, EUROSTAT_BASE_URL, FMP_BASE_URL, FRED_BASE_URL,
    WORLD_BANK_BASE_URL,
};
pub use eurostat::{EurostatClient, EurostatQuery};
pub use fmp::{FmpClient, DEFAULT_CHUNK_SIZE};
pub use fred::{FredClient, FredSeriesSpec};
pub use transport::{CannedResponse, MemoryTransport, ReqwestTransport, Transport};
pub use world_bank::{WorldBankClient, DEFAULT_PER_PAGE};

//! Dashboard panels.
//!
//! - `config` - what each panel fetches (series ids, tickers, country sets)
//! - `outcome` - per-source fetch outcomes, cancellation and status reporting
//! - `service` - [`DashboardService`], which loads the panels
//! - `views` - panel payloads

mod config;
mod outcome;
mod service;
mod views;

pub use config::{
    DashboardConfig, FxPairSpec, Tenor, TenorSpec, WorldBankIndicators, EURO_AREA, GLOBAL,
};
pub use outcome::{run_cancellable, FetchOutcome, SourceSlot, SourceState, SourceStatus};
pub use service::DashboardService;
pub use views::{
    CurvePoint, FxRate, FxView, MacroView, QuotesView, UsEconomicsView, UsSeriesRow,
    YieldCurveView,
};

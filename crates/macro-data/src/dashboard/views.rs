//! Panel payloads returned by [`DashboardService`](super::DashboardService).

use std::collections::BTreeMap;

use serde::Serialize;

use super::config::Tenor;
use super::outcome::SourceStatus;
use crate::derived::TermSpread;
use crate::merge::MergedMap;
use crate::models::{InstrumentQuote, Metric, SeriesPoint};

/// Per-country macro table: one merged map per metric.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroView {
    pub metrics: BTreeMap<Metric, MergedMap>,
    pub sources: Vec<SourceStatus>,
}

impl MacroView {
    pub fn metric(&self, metric: Metric) -> Option<&MergedMap> {
        self.metrics.get(&metric)
    }
}

/// One row of the US economics table.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsSeriesRow {
    pub key: String,
    pub series_id: String,
    pub latest: Option<SeriesPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsEconomicsView {
    pub series: Vec<UsSeriesRow>,
}

impl UsEconomicsView {
    pub fn row(&self, key: &str) -> Option<&UsSeriesRow> {
        self.series.iter().find(|r| r.key == key)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub tenor: Tenor,
    pub series_id: String,
    pub latest: Option<SeriesPoint>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldCurveView {
    pub points: Vec<CurvePoint>,
    pub spreads: Vec<TermSpread>,
    pub sources: Vec<SourceStatus>,
}

impl YieldCurveView {
    pub fn yield_at(&self, tenor: Tenor) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.tenor == tenor)
            .and_then(|p| p.latest.as_ref())
            .map(|p| p.value)
    }
}

/// Quotes for a list of requested tickers.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesView {
    pub quotes: Vec<InstrumentQuote>,
    /// Requested tickers without a quote (blocked, substituted away or missing upstream)
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuotesView {
    pub fn quote(&self, symbol: &str) -> Option<&InstrumentQuote> {
        self.quotes.iter().find(|q| q.symbol == symbol)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FxRate {
    pub pair: String,
    pub value: Option<f64>,
    pub change: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FxView {
    pub rates: Vec<FxRate>,
    pub sources: Vec<SourceStatus>,
}

impl FxView {
    pub fn rate(&self, pair: &str) -> Option<&FxRate> {
        self.rates.iter().find(|r| r.pair == pair)
    }
}

use std::sync::Arc;

use futures::future::{join_all, try_join_all};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::{DashboardConfig, Tenor};
use super::outcome::{run_cancellable, FetchOutcome, SourceSlot, SourceStatus};
use super::views::{
    CurvePoint, FxRate, FxView, MacroView, QuotesView, UsEconomicsView, UsSeriesRow,
    YieldCurveView,
};
use crate::derived::{
    invert_instrument_quote, per_capita, real_wage_growth_by_country, rescale, term_spreads,
    TreasuryYields,
};
use crate::errors::MacroDataError;
use crate::merge::{merge, MergeOrder, MergedMap, SourceMaps};
use crate::models::{CountryMetricMap, CountrySeriesMap, DataSource, Metric};
use crate::normalizer::{CountryTable, SymbolNormalizer, SymbolTables};
use crate::provider::{
    EcbClient, EurostatClient, FmpClient, FredClient, FredSeriesSpec, ProviderEndpoints,
    Transport, WorldBankClient,
};

/// World Bank GDP is reported in US$; the panel shows millions.
const TO_MILLIONS: f64 = 1e-6;

/// World Bank indicators for the macro view, fetched as one group.
#[derive(Debug)]
struct WorldBankGroup {
    gdp: Option<CountryMetricMap>,
    gdp_per_capita: Option<CountryMetricMap>,
    inflation: Option<CountryMetricMap>,
    unemployment: Option<CountryMetricMap>,
    lending_rate: Option<CountryMetricMap>,
    wages: Option<CountrySeriesMap>,
    cpi: Option<CountrySeriesMap>,
}

/// Loads dashboard panels from the upstream providers.
///
/// Fetches inside a view run concurrently and never fail the view: each source reports its
/// own status. The World Bank indicators and the US economics series load as groups that
/// succeed or fail together. Every load takes a cancellation token; a cancelled fetch contributes nothing.
#[derive(Clone)]
pub struct DashboardService {
    ecb: EcbClient,
    eurostat: EurostatClient,
    world_bank: WorldBankClient,
    fred: FredClient,
    fmp: FmpClient,
    normalizer: Arc<SymbolNormalizer>,
    config: Arc<DashboardConfig>,
}

impl DashboardService {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: &ProviderEndpoints,
        config: DashboardConfig,
    ) -> Self {
        Self::with_tables(
            transport,
            endpoints,
            config,
            CountryTable::default(),
            SymbolTables::free_tier(),
        )
    }

    pub fn with_tables(
        transport: Arc<dyn Transport>,
        endpoints: &ProviderEndpoints,
        config: DashboardConfig,
        countries: CountryTable,
        symbols: SymbolTables,
    ) -> Self {
        let countries = Arc::new(countries);
        Self {
            ecb: EcbClient::new(transport.clone(), &endpoints.ecb_base_url),
            eurostat: EurostatClient::new(transport.clone(), &endpoints.eurostat_base_url),
            world_bank: WorldBankClient::new(
                transport.clone(),
                &endpoints.world_bank_base_url,
                countries,
            )
            .with_per_page(config.world_bank_per_page),
            fred: FredClient::new(
                transport.clone(),
                &endpoints.fred_base_url,
                endpoints.fred_api_key.clone(),
            ),
            fmp: FmpClient::new(
                transport,
                &endpoints.fmp_base_url,
                endpoints.fmp_api_key.clone(),
            )
            .with_chunk_size(config.quote_chunk_size),
            normalizer: Arc::new(SymbolNormalizer::new(symbols)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &SymbolNormalizer {
        &self.normalizer
    }

    /// Per-country macro table, regional sources overridden by the World Bank.
    pub async fn load_macro(&self, cancel: &CancellationToken) -> MacroView {
        let cfg = &*self.config;
        let countries = &cfg.world_bank_countries;
        let indicators = &cfg.world_bank_indicators;

        let (ecb_gdp, ecb_inflation, unemployment, long_term_rates, world_bank) = tokio::join!(
            run_cancellable(cancel, DataSource::Ecb, self.ecb.latest_by_country(&cfg.ecb_gdp)),
            run_cancellable(
                cancel,
                DataSource::Ecb,
                self.ecb.latest_by_country(&cfg.ecb_inflation)
            ),
            run_cancellable(
                cancel,
                DataSource::Eurostat,
                self.eurostat.latest_by_country(&cfg.eurostat_unemployment)
            ),
            run_cancellable(
                cancel,
                DataSource::Eurostat,
                self.eurostat.latest_by_country(&cfg.eurostat_long_term_rates)
            ),
            run_cancellable(cancel, DataSource::WorldBank, async {
                let client = &self.world_bank;
                let (gdp, gdp_per_capita, inflation, unemployment, lending_rate, wages, cpi) =
                    tokio::try_join!(
                        client.latest(countries, &indicators.gdp),
                        client.latest(countries, &indicators.gdp_per_capita),
                        client.latest(countries, &indicators.inflation),
                        client.latest(countries, &indicators.unemployment),
                        client.latest(countries, &indicators.lending_rate),
                        client.history(countries, &indicators.wage_level),
                        client.history(countries, &indicators.cpi_level),
                    )?;
                Ok::<_, MacroDataError>(Some(WorldBankGroup {
                    gdp,
                    gdp_per_capita,
                    inflation,
                    unemployment,
                    lending_rate,
                    wages,
                    cpi,
                }))
            }),
        );

        let mut view = MacroView::default();
        let sources = &mut view.sources;
        let ecb_gdp = record(sources, "ecb.gdp", DataSource::Ecb, ecb_gdp);
        let ecb_inflation = record(sources, "ecb.inflation", DataSource::Ecb, ecb_inflation);
        let unemployment = record(
            sources,
            "eurostat.unemployment",
            DataSource::Eurostat,
            unemployment,
        );
        let long_term_rates = record(
            sources,
            "eurostat.longTermRates",
            DataSource::Eurostat,
            long_term_rates,
        );

        // One World Bank failure fails every World Bank slot.
        let wb = DataSource::WorldBank;
        let wb_gdp = record(sources, "worldBank.gdp", wb, world_bank.project(|g| g.gdp.clone()));
        let wb_gdp_per_capita = record(
            sources,
            "worldBank.gdpPerCapita",
            wb,
            world_bank.project(|g| g.gdp_per_capita.clone()),
        );
        let wb_inflation = record(
            sources,
            "worldBank.inflation",
            wb,
            world_bank.project(|g| g.inflation.clone()),
        );
        let wb_unemployment = record(
            sources,
            "worldBank.unemployment",
            wb,
            world_bank.project(|g| g.unemployment.clone()),
        );
        let wb_lending_rate = record(
            sources,
            "worldBank.lendingRate",
            wb,
            world_bank.project(|g| g.lending_rate.clone()),
        );
        let wb_wages = record(
            sources,
            "worldBank.wages",
            wb,
            world_bank.project(|g| g.wages.clone()),
        );
        let wb_cpi = record(sources, "worldBank.cpi", wb, world_bank.project(|g| g.cpi.clone()));

        let gdp_per_capita = ecb_gdp
            .data
            .as_ref()
            .map(|totals| per_capita(totals, &cfg.population));
        let real_wages = match (&wb_wages.data, &wb_cpi.data) {
            (Some(wages), Some(cpi)) => Some(real_wage_growth_by_country(wages, cpi)),
            _ => None,
        };

        let metrics = &mut view.metrics;
        metrics.insert(
            Metric::Gdp,
            merge_metric(
                DataSource::Ecb,
                ecb_gdp.data,
                wb_gdp.data.as_ref().map(|m| rescale(m, TO_MILLIONS)),
            ),
        );
        metrics.insert(
            Metric::GdpPerCapita,
            merge_metric(DataSource::Derived, gdp_per_capita, wb_gdp_per_capita.data),
        );
        metrics.insert(
            Metric::Inflation,
            merge_metric(DataSource::Ecb, ecb_inflation.data, wb_inflation.data),
        );
        metrics.insert(
            Metric::Unemployment,
            merge_metric(DataSource::Eurostat, unemployment.data, wb_unemployment.data),
        );
        metrics.insert(
            Metric::LongTermRate,
            merge_metric(DataSource::Eurostat, long_term_rates.data, wb_lending_rate.data),
        );
        metrics.insert(
            Metric::RealWageGrowth,
            merge_metric(DataSource::Derived, real_wages, None),
        );

        info!(
            "Macro view loaded: {} metrics, {} sources",
            view.metrics.len(),
            view.sources.len()
        );
        view
    }

    /// Latest value of every configured FRED series.
    ///
    /// The series load as one group: a single failed request fails every row.
    pub async fn load_us_economics(&self, cancel: &CancellationToken) -> UsEconomicsView {
        let specs = &self.config.fred_series;
        let outcome = run_cancellable(cancel, DataSource::Fred, async {
            try_join_all(specs.iter().map(|spec| self.fred.series(spec)))
                .await
                .map(Some)
        })
        .await;

        let series = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let slot = SourceSlot::from_outcome(outcome.project(|all| all.get(i).cloned()));
                UsSeriesRow {
                    key: spec.key.clone(),
                    series_id: spec.series_id.clone(),
                    latest: slot.data.as_ref().and_then(|s| s.latest.clone()),
                    change: slot.data.as_ref().and_then(|s| s.change()),
                    error: slot.error,
                }
            })
            .collect();

        UsEconomicsView { series }
    }

    /// Treasury curve points and term spreads.
    pub async fn yield_curves(&self, cancel: &CancellationToken) -> YieldCurveView {
        let tenors = &self.config.treasury_tenors;
        let outcomes = join_all(tenors.iter().map(|t| {
            let spec = FredSeriesSpec::level(t.series_id.clone(), t.series_id.clone());
            run_cancellable(cancel, DataSource::Fred, async move {
                self.fred.series(&spec).await.map(Some)
            })
        }))
        .await;

        let mut view = YieldCurveView::default();
        for (tenor, outcome) in tenors.iter().zip(outcomes) {
            let slot = record(
                &mut view.sources,
                &format!("fred.{}", tenor.series_id),
                DataSource::Fred,
                outcome,
            );
            view.points.push(CurvePoint {
                tenor: tenor.tenor,
                series_id: tenor.series_id.clone(),
                latest: slot.data.and_then(|s| s.latest),
            });
        }

        let yields = TreasuryYields {
            three_month: view.yield_at(Tenor::ThreeMonth),
            one_year: view.yield_at(Tenor::OneYear),
            two_year: view.yield_at(Tenor::TwoYear),
            ten_year: view.yield_at(Tenor::TenYear),
            thirty_year: view.yield_at(Tenor::ThirtyYear),
        };
        view.spreads = term_spreads(&yields);
        view
    }

    /// Quotes for arbitrary dashboard tickers.
    pub async fn load_quotes<S>(&self, symbols: &[S], cancel: &CancellationToken) -> QuotesView
    where
        S: AsRef<str> + Sync,
    {
        let outcome = run_cancellable(cancel, DataSource::Fmp, async {
            Ok::<_, MacroDataError>(Some(self.fmp.quotes(symbols, &self.normalizer).await))
        })
        .await;

        let slot = SourceSlot::from_outcome(outcome);
        let quotes = slot.data.unwrap_or_default();

        let mut missing: Vec<String> = Vec::new();
        for symbol in symbols.iter().map(|s| s.as_ref().trim()) {
            if symbol.is_empty() || missing.iter().any(|m| m == symbol) {
                continue;
            }
            if !quotes.iter().any(|q| q.symbol == symbol) {
                missing.push(symbol.to_string());
            }
        }
        debug!("Quotes loaded: {} returned, {} missing", quotes.len(), missing.len());

        QuotesView {
            quotes,
            missing,
            error: slot.error,
        }
    }

    pub async fn load_indices(&self, cancel: &CancellationToken) -> QuotesView {
        self.load_quotes(&self.config.indices, cancel).await
    }

    pub async fn load_assets(&self, cancel: &CancellationToken) -> QuotesView {
        self.load_quotes(&self.config.assets, cancel).await
    }

    /// USD/EUR from the ECB reference rate, the other pairs from the quote provider.
    pub async fn load_fx(&self, cancel: &CancellationToken) -> FxView {
        let cfg = &*self.config;
        let symbols: Vec<&str> = cfg.fx_pairs.iter().map(|p| p.symbol.as_str()).collect();

        let (usd_eur, quotes) = tokio::join!(
            run_cancellable(cancel, DataSource::Ecb, self.ecb.latest_value(&cfg.ecb_usd_eur)),
            run_cancellable(cancel, DataSource::Fmp, async {
                Ok::<_, MacroDataError>(Some(self.fmp.quotes(&symbols, &self.normalizer).await))
            }),
        );

        let mut view = FxView::default();
        let usd_eur = record(&mut view.sources, "ecb.usdEur", DataSource::Ecb, usd_eur);
        let quotes = record(&mut view.sources, "fmp.fx", DataSource::Fmp, quotes);

        view.rates.push(FxRate {
            pair: "USD/EUR".to_string(),
            value: usd_eur.data.and_then(|o| o.value),
            change: None,
        });

        let quotes = quotes.data.unwrap_or_default();
        for pair in &cfg.fx_pairs {
            let quote = quotes.iter().find(|q| q.symbol == pair.symbol);
            let quote = if pair.invert {
                quote.and_then(invert_instrument_quote)
            } else {
                quote.cloned()
            };
            view.rates.push(FxRate {
                pair: pair.label.clone(),
                value: quote.as_ref().map(|q| q.price),
                change: quote.as_ref().map(|q| q.change),
            });
        }

        view
    }
}

/// Stores an outcome in a fresh slot and reports its status.
fn record<T>(
    statuses: &mut Vec<SourceStatus>,
    key: &str,
    source: DataSource,
    outcome: FetchOutcome<T>,
) -> SourceSlot<T> {
    let slot = SourceSlot::from_outcome(outcome);
    statuses.push(SourceStatus::of(key, source, &slot));
    slot
}

/// `primary` overridden by the World Bank.
fn merge_metric(
    primary_source: DataSource,
    primary: Option<CountryMetricMap>,
    world_bank: Option<CountryMetricMap>,
) -> MergedMap {
    let mut maps = SourceMaps::new();
    if let Some(map) = primary {
        maps.insert(primary_source, map);
    }
    if let Some(map) = world_bank {
        maps.insert(DataSource::WorldBank, map);
    }
    merge(&MergeOrder::regional_then_world_bank(primary_source), &maps)
}

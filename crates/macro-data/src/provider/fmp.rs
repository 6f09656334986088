//! Financial Modeling Prep quote client.
//!
//! The free tier has no batch endpoint, so batches are issued one symbol per request. Requests
//! go out in chunks: chunks run one after another, symbols inside a chunk run concurrently.
//! A symbol that fails for any reason is logged and left out; the batch never fails.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::endpoints::build_url;
use super::transport::Transport;
use crate::decoder::fmp::{to_instrument_quote, FmpQuotePayload, FmpQuoteRow};
use crate::decoder::parse_body;
use crate::errors::MacroDataError;
use crate::models::{DataSource, InstrumentQuote};
use crate::normalizer::SymbolNormalizer;

pub const DEFAULT_CHUNK_SIZE: usize = 8;

#[derive(Clone)]
pub struct FmpClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: Option<String>,
    chunk_size: usize,
}

impl FmpClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn quote_url(&self, symbol: &str) -> String {
        let mut params = vec![("symbol", symbol)];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("apikey", key));
        }
        build_url(&self.base_url, "stable/quote", &params)
    }

    /// One quote row. `Ok(None)` when the provider answered with an empty array.
    pub async fn quote(&self, symbol: &str) -> Result<Option<FmpQuoteRow>, MacroDataError> {
        let body = self
            .transport
            .get(DataSource::Fmp, &self.quote_url(symbol))
            .await?;
        let payload: FmpQuotePayload = parse_body(DataSource::Fmp, &body)?;
        Ok(payload.into_row())
    }

    /// Rows for `symbols`, in request order, failures dropped.
    pub async fn quote_batch(&self, symbols: &[String]) -> Vec<FmpQuoteRow> {
        let mut rows = Vec::with_capacity(symbols.len());

        for chunk in symbols.chunks(self.chunk_size) {
            let results = join_all(chunk.iter().map(|s| self.quote(s))).await;
            for (symbol, result) in chunk.iter().zip(results) {
                match result {
                    Ok(Some(row)) => rows.push(row),
                    Ok(None) => debug!("FMP returned no row for {}", symbol),
                    Err(e) => warn!("FMP quote for {} failed: {}", symbol, e),
                }
            }
        }

        rows
    }

    /// Quotes for dashboard tickers, keyed back to the requested symbols.
    ///
    /// Blocked tickers and tickers the provider did not return are absent from the result.
    pub async fn quotes<S: AsRef<str>>(
        &self,
        requested: &[S],
        normalizer: &SymbolNormalizer,
    ) -> Vec<InstrumentQuote> {
        let batch = normalizer.normalize_batch(requested);
        if batch.universe.is_empty() {
            return Vec::new();
        }

        let rows = self.quote_batch(&batch.universe).await;
        let by_symbol: HashMap<String, FmpQuoteRow> = rows
            .into_iter()
            .filter_map(|row| Some((row.symbol.as_deref()?.to_ascii_uppercase(), row)))
            .collect();

        batch
            .requested
            .iter()
            .filter_map(|original| {
                let ticker = batch.upstream_for(original)?;
                let row = by_symbol.get(&ticker.symbol.to_ascii_uppercase())?;
                Some(to_instrument_quote(original, ticker, row, normalizer))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryTransport;

    const BASE: &str = "https://fmp.test";

    fn quote_prefix(symbol: &str) -> String {
        format!("{}/stable/quote?symbol={}", BASE, urlencoding::encode(symbol))
    }

    fn row_body(symbol: &str, price: f64) -> String {
        format!(
            r#"[{{ "symbol": "{}", "name": "{}", "price": {}, "change": 1.0, "changesPercentage": "0.5" }}]"#,
            symbol, symbol, price
        )
    }

    #[test]
    fn test_quote_url() {
        let client = FmpClient::new(Arc::new(MemoryTransport::new()), BASE, Some("k".into()));
        assert_eq!(
            client.quote_url("^GSPC"),
            "https://fmp.test/stable/quote?symbol=%5EGSPC&apikey=k"
        );
    }

    #[tokio::test]
    async fn test_quote_batch_drops_failures() {
        let transport = MemoryTransport::new()
            .with_body(quote_prefix("AAA"), row_body("AAA", 10.0))
            .with_status(quote_prefix("BBB"), 402)
            .with_body(quote_prefix("CCC"), "not json")
            .with_body(quote_prefix("DDD"), "[]")
            .with_body(quote_prefix("EEE"), row_body("EEE", 20.0));
        let client = FmpClient::new(Arc::new(transport.clone()), BASE, None).with_chunk_size(2);

        let symbols: Vec<String> = ["AAA", "BBB", "CCC", "DDD", "EEE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = client.quote_batch(&symbols).await;

        let got: Vec<_> = rows.iter().filter_map(|r| r.symbol.clone()).collect();
        assert_eq!(got, vec!["AAA", "EEE"]);
        assert_eq!(transport.requests().len(), 5);
    }

    #[tokio::test]
    async fn test_quotes_map_back_to_requested_symbols() {
        let transport = MemoryTransport::new()
            .with_body(quote_prefix("GBPUSD"), row_body("GBPUSD", 1.25))
            .with_body(quote_prefix("^RUT"), row_body("^RUT", 2000.0))
            .with_body(quote_prefix("BTCUSD"), row_body("btcusd", 60000.0));
        let client = FmpClient::new(Arc::new(transport.clone()), BASE, None);
        let normalizer = SymbolNormalizer::default();

        let quotes = client
            .quotes(&["GBPUSD=X", "^NDX", "QQQ", "BTC-USD", "^GSPC"], &normalizer)
            .await;

        let symbols: Vec<_> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        // QQQ is blocked, ^GSPC has no row
        assert_eq!(symbols, vec!["GBPUSD=X", "^NDX", "BTC-USD"]);
        assert_eq!(quotes[0].currency.as_deref(), Some("USD"));
        assert_eq!(quotes[1].display_name.as_deref(), Some("^RUT"));
        assert_eq!(quotes[2].change_percent, 0.5);

        // The blocked ticker is never requested
        assert!(transport.requests().iter().all(|u| !u.contains("QQQ")));
    }

    #[tokio::test]
    async fn test_quotes_all_blocked_makes_no_requests() {
        let transport = MemoryTransport::new();
        let client = FmpClient::new(Arc::new(transport.clone()), BASE, None);

        let quotes = client
            .quotes(&["QQQ", "GC=F"], &SymbolNormalizer::default())
            .await;
        assert!(quotes.is_empty());
        assert!(transport.requests().is_empty());
    }
}

//! Ticker normalization for the quote provider.
//!
//! Dashboard panels ask for Yahoo-style tickers (`GBPUSD=X`, `CNY=X`, `BTC-USD`, `^GSPC`).
//! The quote provider wants its own conventions and refuses some instruments on the free
//! tier. This module maps one to the other using injected tables; it never performs I/O.

use std::collections::{HashMap, HashSet};

use log::debug;

/// Kind of upstream instrument a ticker was mapped to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickerKind {
    /// Currency pair, `BASEQUOTE`
    Fx,
    /// Crypto pair against USD, `BTCUSD`
    Crypto,
    /// Index known to be available as-is
    Index,
    /// Anything else, passed through unchanged
    Other,
}

/// Upstream ticker resolved for one requested symbol.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProviderTicker {
    pub symbol: String,
    pub kind: TickerKind,
}

impl ProviderTicker {
    fn new(symbol: impl Into<String>, kind: TickerKind) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
        }
    }

    /// Quote leg of an FX pair (`GBPUSD` -> `USD`).
    pub fn quote_currency(&self) -> Option<&str> {
        match self.kind {
            TickerKind::Fx => self.symbol.get(3..),
            _ => None,
        }
    }
}

/// Immutable ticker tables injected into the normalizer.
#[derive(Clone, Debug, Default)]
pub struct SymbolTables {
    /// Tickers that need a paid data tier. They resolve to "no instrument".
    pub blocklist: HashSet<String>,
    /// Ticker -> replacement instrument.
    pub substitutions: HashMap<String, String>,
    /// Indices known to be served under their own name.
    pub index_passthrough: HashSet<String>,
    /// Instruments quoted in USD even when the provider omits the currency.
    pub usd_commodities: HashSet<String>,
}

impl SymbolTables {
    /// Tables used by the dashboard's free-tier quote account.
    pub fn free_tier() -> Self {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            blocklist: set(&[
                "GC=F", "CL=F", "^NDX", "000300.SS", "RUB=X", "USDRUB", "QQQ", "ASHR", "CLUSD",
            ]),
            substitutions: [("^NDX", "^RUT"), ("XAUUSD", "GCUSD"), ("WTIUSD", "USO")]
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            index_passthrough: set(&[
                "^GSPC", "^DJI", "^STOXX50E", "^FTSE", "^N225", "^HSI", "^RUT",
            ]),
            usd_commodities: set(&["WTIUSD", "BRENTUSD"]),
        }
    }
}

/// Requested symbols after batch normalization.
#[derive(Clone, Debug, Default)]
pub struct NormalizedBatch {
    /// Distinct non-empty requested symbols, in request order.
    pub requested: Vec<String>,
    /// Requested symbol -> upstream ticker (`None` when blocked).
    pub mapping: HashMap<String, Option<ProviderTicker>>,
    /// Distinct upstream tickers to fetch, in request order.
    pub universe: Vec<String>,
}

impl NormalizedBatch {
    pub fn upstream_for(&self, requested: &str) -> Option<&ProviderTicker> {
        self.mapping.get(requested).and_then(|t| t.as_ref())
    }
}

/// Maps dashboard tickers to quote-provider tickers.
///
/// Normalization is total: unknown tickers pass through unchanged unless blocked.
#[derive(Clone, Debug)]
pub struct SymbolNormalizer {
    tables: SymbolTables,
}

impl SymbolNormalizer {
    pub fn new(tables: SymbolTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &SymbolTables {
        &self.tables
    }

    pub fn is_blocked(&self, symbol: &str) -> bool {
        self.tables.blocklist.contains(symbol)
    }

    /// Applies the substitution table until it reaches a fixed point.
    ///
    /// Bounded by the table size, so a cyclic table stops instead of looping.
    pub fn substitute(&self, symbol: &str) -> String {
        let mut current = symbol.to_string();
        for _ in 0..=self.tables.substitutions.len() {
            match self.tables.substitutions.get(&current) {
                Some(next) if *next != current => current = next.clone(),
                _ => break,
            }
        }
        current
    }

    /// Resolve one requested ticker. `None` means "no instrument".
    ///
    /// Substitution runs on the requested ticker and again on the FX or crypto symbol it
    /// maps to, so a resolved symbol always resolves to itself.
    pub fn normalize(&self, raw: &str) -> Option<ProviderTicker> {
        let symbol = self.substitute(raw.trim());

        if symbol.is_empty() || self.is_blocked(&symbol) {
            return None;
        }

        let mapped = map_fx_symbol(&symbol)
            .map(|fx| (fx, TickerKind::Fx))
            .or_else(|| map_crypto_symbol(&symbol).map(|c| (c, TickerKind::Crypto)));

        let ticker = match mapped {
            Some((mapped, kind)) => {
                let replaced = self.substitute(&mapped);
                if replaced == mapped {
                    ProviderTicker::new(mapped, kind)
                } else {
                    debug!("Mapped ticker '{}' substituted with '{}'", mapped, replaced);
                    self.classify(replaced)
                }
            }
            None => self.classify(symbol),
        };

        (!self.is_blocked(&ticker.symbol)).then_some(ticker)
    }

    fn classify(&self, symbol: String) -> ProviderTicker {
        let kind = if self.tables.index_passthrough.contains(&symbol) {
            TickerKind::Index
        } else {
            TickerKind::Other
        };
        ProviderTicker::new(symbol, kind)
    }

    /// Normalize a batch of requested tickers, deduplicating both sides.
    pub fn normalize_batch<S: AsRef<str>>(&self, symbols: &[S]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();
        let mut seen_upstream = HashSet::new();

        for raw in symbols {
            let raw = raw.as_ref().trim();
            if raw.is_empty() || batch.mapping.contains_key(raw) {
                continue;
            }

            let ticker = self.normalize(raw);
            match &ticker {
                Some(t) => {
                    if seen_upstream.insert(t.symbol.clone()) {
                        batch.universe.push(t.symbol.clone());
                    }
                }
                None => debug!("Ticker '{}' is blocked, skipping", raw),
            }

            batch.requested.push(raw.to_string());
            batch.mapping.insert(raw.to_string(), ticker);
        }

        batch
    }

    /// Currency of a quote: the FX quote leg, else what the provider reported, else USD for
    /// known USD commodities.
    pub fn currency_for(&self, ticker: &ProviderTicker, reported: Option<&str>) -> Option<String> {
        if let Some(quote) = ticker.quote_currency() {
            return Some(quote.to_string());
        }
        if let Some(reported) = reported.filter(|c| !c.trim().is_empty()) {
            return Some(reported.to_string());
        }
        self.tables
            .usd_commodities
            .contains(&ticker.symbol)
            .then(|| "USD".to_string())
    }
}

impl Default for SymbolNormalizer {
    fn default() -> Self {
        Self::new(SymbolTables::free_tier())
    }
}

/// `GBPUSD=X` -> `GBPUSD`, `CNY=X` -> `USDCNY`.
fn map_fx_symbol(symbol: &str) -> Option<String> {
    let code = symbol.strip_suffix("=X")?;
    if !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    match code.len() {
        6 => Some(code.to_string()),
        3 => Some(format!("USD{}", code)),
        _ => None,
    }
}

/// `BTC-USD` -> `BTCUSD` (2 to 5 letter base, case-insensitive).
fn map_crypto_symbol(symbol: &str) -> Option<String> {
    let upper = symbol.to_ascii_uppercase();
    let base = upper.strip_suffix("-USD")?;
    if !(2..=5).contains(&base.len()) || !base.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    Some(format!("{}USD", base))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> SymbolNormalizer {
        SymbolNormalizer::default()
    }

    #[test]
    fn test_fx_pair_maps_to_itself() {
        let t = normalizer().normalize("GBPUSD=X").unwrap();
        assert_eq!(t.symbol, "GBPUSD");
        assert_eq!(t.kind, TickerKind::Fx);
        assert_eq!(t.quote_currency(), Some("USD"));
    }

    #[test]
    fn test_single_currency_implies_usd_base() {
        let t = normalizer().normalize("CNY=X").unwrap();
        assert_eq!(t.symbol, "USDCNY");
        assert_eq!(t.quote_currency(), Some("CNY"));
    }

    #[test]
    fn test_crypto_mapping() {
        let t = normalizer().normalize("btc-usd").unwrap();
        assert_eq!(t.symbol, "BTCUSD");
        assert_eq!(t.kind, TickerKind::Crypto);
        assert!(normalizer().normalize("TOOLONG-USD").unwrap().kind != TickerKind::Crypto);
    }

    #[test]
    fn test_blocked_tickers_resolve_to_nothing() {
        let n = normalizer();
        assert!(n.normalize("GC=F").is_none());
        assert!(n.normalize("QQQ").is_none());
        // RUB=X maps to USDRUB which is itself blocked
        assert!(n.normalize("RUB=X").is_none());
    }

    #[test]
    fn test_substitution_beats_blocklist() {
        let t = normalizer().normalize("^NDX").unwrap();
        assert_eq!(t.symbol, "^RUT");
        assert_eq!(t.kind, TickerKind::Index);
    }

    #[test]
    fn test_commodity_substitution() {
        let n = normalizer();
        assert_eq!(n.normalize("XAUUSD").unwrap().symbol, "GCUSD");
        assert_eq!(n.normalize("WTIUSD").unwrap().symbol, "USO");
    }

    #[test]
    fn test_unknown_passes_through() {
        let t = normalizer().normalize("BRENTUSD").unwrap();
        assert_eq!(t.symbol, "BRENTUSD");
        assert_eq!(t.kind, TickerKind::Other);
    }

    #[test]
    fn test_canonical_ticker_is_unchanged() {
        let n = normalizer();
        for canonical in ["GBPUSD", "USDCNY", "BTCUSD", "^GSPC", "GCUSD"] {
            assert_eq!(n.normalize(canonical).unwrap().symbol, canonical);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        for raw in [
            "^NDX", "XAUUSD", "WTIUSD", "GBPUSD=X", "ETH-USD", "^FTSE", "XAUUSD=X", "WTI-USD",
        ] {
            let once = n.normalize(raw).unwrap();
            let twice = n.normalize(&once.symbol).unwrap();
            assert_eq!(once.symbol, twice.symbol, "{}", raw);
        }
    }

    #[test]
    fn test_mapped_symbol_is_substituted() {
        let n = normalizer();
        for raw in ["XAUUSD=X", "xau-usd"] {
            let once = n.normalize(raw).unwrap();
            assert_eq!(once.symbol, "GCUSD", "{}", raw);
            assert_eq!(once.kind, TickerKind::Other);
            assert_eq!(n.normalize(&once.symbol).unwrap().symbol, "GCUSD");
        }
        assert_eq!(n.normalize("WTI-USD").unwrap().symbol, "USO");
    }

    #[test]
    fn test_mapped_substitution_checks_blocklist() {
        let mut tables = SymbolTables::free_tier();
        tables.substitutions.insert("EURUSD".into(), "QQQ".into());
        let n = SymbolNormalizer::new(tables);
        assert!(n.normalize("EURUSD=X").is_none());
    }

    #[test]
    fn test_substitution_chain_and_cycle() {
        let mut tables = SymbolTables::default();
        tables.substitutions.insert("A".into(), "B".into());
        tables.substitutions.insert("B".into(), "C".into());
        tables.substitutions.insert("X".into(), "Y".into());
        tables.substitutions.insert("Y".into(), "X".into());
        let n = SymbolNormalizer::new(tables);

        assert_eq!(n.substitute("A"), "C");
        assert_eq!(n.substitute("C"), "C");
        // Terminates on cycles
        let cyc = n.substitute("X");
        assert!(cyc == "X" || cyc == "Y");
    }

    #[test]
    fn test_batch_dedupes_and_drops_blocked() {
        let n = normalizer();
        let batch = n.normalize_batch(&["^GSPC", "^GSPC", "", "QQQ", "^NDX", "^RUT"]);

        assert_eq!(batch.requested, vec!["^GSPC", "QQQ", "^NDX", "^RUT"]);
        assert_eq!(batch.universe, vec!["^GSPC", "^RUT"]);
        assert!(batch.upstream_for("QQQ").is_none());
        assert_eq!(batch.upstream_for("^NDX").unwrap().symbol, "^RUT");
    }

    #[test]
    fn test_currency_for() {
        let n = normalizer();
        let fx = n.normalize("JPY=X").unwrap();
        // FX leg wins over whatever the provider reports
        assert_eq!(n.currency_for(&fx, Some("USD")).as_deref(), Some("JPY"));

        let brent = n.normalize("BRENTUSD").unwrap();
        assert_eq!(n.currency_for(&brent, None).as_deref(), Some("USD"));

        let index = n.normalize("^N225").unwrap();
        assert_eq!(n.currency_for(&index, Some("JPY")).as_deref(), Some("JPY"));
        assert!(n.currency_for(&index, Some("")).is_none());
    }
}

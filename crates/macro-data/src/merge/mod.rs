//! Cross-provider override merge.
//!
//! Per-country maps of one metric are layered in an explicit [`MergeOrder`]: later sources
//! replace whole observations of earlier ones. Recency is never compared, so an override
//! source wins even when the primary source reports a newer period.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::models::{CountryCode, CountryMetricMap, DataSource, Observation};

/// Decoded maps of one metric, keyed by the source that produced them.
pub type SourceMaps = BTreeMap<DataSource, CountryMetricMap>;

/// Sources of one metric, least authoritative first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOrder(Vec<DataSource>);

impl MergeOrder {
    pub fn new(sources: impl IntoIterator<Item = DataSource>) -> Self {
        Self(sources.into_iter().collect())
    }

    /// A regional source overridden by the World Bank.
    pub fn regional_then_world_bank(regional: DataSource) -> Self {
        Self::new([regional, DataSource::WorldBank])
    }

    pub fn sources(&self) -> &[DataSource] {
        &self.0
    }
}

/// Merged map of one metric with the source of each winning entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedMap {
    pub values: CountryMetricMap,
    pub provenance: BTreeMap<CountryCode, DataSource>,
}

impl MergedMap {
    pub fn get(&self, country: &str) -> Option<&Observation> {
        self.values.get(country)
    }

    pub fn source_of(&self, country: &str) -> Option<DataSource> {
        self.provenance.get(country).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Layers `maps` in `order`. Sources missing from `maps` contribute nothing; maps whose
/// source is not in `order` are ignored.
pub fn merge(order: &MergeOrder, maps: &SourceMaps) -> MergedMap {
    let mut merged = MergedMap::default();

    for source in order.sources() {
        let Some(map) = maps.get(source) else {
            debug!("Merge source {} absent, skipping", source);
            continue;
        };
        for (country, observation) in map.iter() {
            merged.values.insert(country.clone(), observation.clone());
            merged.provenance.insert(country.clone(), *source);
        }
    }

    for source in maps.keys().filter(|s| !order.sources().contains(s)) {
        debug!("Merge source {} not in merge order, ignored", source);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&'static str, &str, f64)]) -> CountryMetricMap {
        let mut out = CountryMetricMap::new();
        for (country, period, value) in entries {
            out.insert(*country, Observation::with_value(*period, *value));
        }
        out
    }

    #[test]
    fn test_later_source_overrides_shared_keys() {
        let mut maps = SourceMaps::new();
        maps.insert(DataSource::Ecb, map(&[("DE", "2024", 1.0), ("FR", "2024", 2.0)]));
        maps.insert(DataSource::WorldBank, map(&[("DE", "2022", 9.0), ("US", "2023", 3.0)]));

        let merged = merge(&MergeOrder::regional_then_world_bank(DataSource::Ecb), &maps);

        assert_eq!(merged.len(), 3);
        // Older World Bank period still wins
        assert_eq!(merged.values.value("DE"), Some(9.0));
        assert_eq!(merged.source_of("DE"), Some(DataSource::WorldBank));
        assert_eq!(merged.source_of("FR"), Some(DataSource::Ecb));
        assert_eq!(merged.source_of("US"), Some(DataSource::WorldBank));
    }

    #[test]
    fn test_order_is_explicit_not_positional() {
        let mut maps = SourceMaps::new();
        maps.insert(DataSource::Ecb, map(&[("DE", "2024", 1.0)]));
        maps.insert(DataSource::WorldBank, map(&[("DE", "2024", 9.0)]));

        let merged = merge(&MergeOrder::new([DataSource::WorldBank, DataSource::Ecb]), &maps);
        assert_eq!(merged.values.value("DE"), Some(1.0));
    }

    #[test]
    fn test_absent_source_contributes_nothing() {
        let mut maps = SourceMaps::new();
        maps.insert(DataSource::Eurostat, map(&[("NL", "2024-05", 3.6)]));

        let merged = merge(
            &MergeOrder::regional_then_world_bank(DataSource::Eurostat),
            &maps,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.source_of("NL"), Some(DataSource::Eurostat));
    }

    #[test]
    fn test_unlisted_source_is_ignored() {
        let mut maps = SourceMaps::new();
        maps.insert(DataSource::Fred, map(&[("US", "2024", 5.0)]));

        let merged = merge(&MergeOrder::new([DataSource::WorldBank]), &maps);
        assert!(merged.is_empty());
    }
}

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use super::observation::{Observation, SeriesPoint};
use super::period::PeriodOrder;
use super::types::CountryCode;

/// Latest observation of one metric per country.
///
/// Holds at most one entry per country. Keys are ordered so serialized output is stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryMetricMap(BTreeMap<CountryCode, Observation>);

impl CountryMetricMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Unconditionally sets the entry for `country`.
    pub fn insert(&mut self, country: impl Into<CountryCode>, observation: Observation) {
        self.0.insert(country.into(), observation);
    }

    /// Keeps `observation` only if the country has no entry yet or it is strictly later
    /// under `order`. Returns whether the map changed.
    pub fn upsert_latest(
        &mut self,
        country: impl Into<CountryCode>,
        observation: Observation,
        order: PeriodOrder,
    ) -> bool {
        match self.0.entry(country.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(observation);
                true
            }
            btree_map::Entry::Occupied(mut slot) => {
                if order.is_later(&observation.period, &slot.get().period) {
                    slot.insert(observation);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn get(&self, country: &str) -> Option<&Observation> {
        self.0.get(country)
    }

    /// Value for `country`, if present and non-null.
    pub fn value(&self, country: &str) -> Option<f64> {
        self.get(country).and_then(|o| o.value)
    }

    pub fn contains(&self, country: &str) -> bool {
        self.0.contains_key(country)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, &Observation)> {
        self.0.iter()
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryCode> {
        self.0.keys()
    }
}

impl IntoIterator for CountryMetricMap {
    type Item = (CountryCode, Observation);
    type IntoIter = btree_map::IntoIter<CountryCode, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(CountryCode, Observation)> for CountryMetricMap {
    fn from_iter<T: IntoIterator<Item = (CountryCode, Observation)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Full ascending history per country, nulls removed.
pub type CountrySeriesMap = BTreeMap<CountryCode, Vec<SeriesPoint>>;

use std::collections::BTreeMap;

use crate::models::{CountryCode, CountryMetricMap, Observation};

/// Population by country, in persons.
pub type PopulationTable = BTreeMap<CountryCode, f64>;

/// Per-capita value from totals in millions.
///
/// The period is carried over from each total. The value is null when the total is null or
/// the population is unknown or not positive.
pub fn per_capita(
    totals_millions: &CountryMetricMap,
    population: &PopulationTable,
) -> CountryMetricMap {
    totals_millions
        .iter()
        .map(|(country, total)| {
            let value = total.value.and_then(|millions| {
                let persons = population.get(country).copied().filter(|p| *p > 0.0)?;
                Some(millions * 1_000_000.0 / persons)
            });
            (country.clone(), Observation::new(total.period.clone(), value))
        })
        .collect()
}

/// Multiplies every present value by `factor`.
pub fn rescale(map: &CountryMetricMap, factor: f64) -> CountryMetricMap {
    map.iter()
        .map(|(country, obs)| {
            let value = obs.value.map(|v| v * factor).filter(|v| v.is_finite());
            (country.clone(), Observation::new(obs.period.clone(), value))
        })
        .collect()
}

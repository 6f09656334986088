use std::collections::HashMap;

use super::yoy::consecutive_yoy;
use crate::models::{CountryMetricMap, CountrySeriesMap, Observation, PeriodLabel, SeriesPoint};

/// Real wage growth for the newest period where both wage and CPI growth are known.
///
/// Both inputs are ascending level series. Growth is taken between consecutive points and
/// the result is `wage growth - CPI growth`, in percentage points.
pub fn real_wage_growth(wages: &[SeriesPoint], cpi: &[SeriesPoint]) -> Option<Observation> {
    if wages.len() < 2 || cpi.len() < 2 {
        return None;
    }

    let cpi_growth: HashMap<PeriodLabel, f64> = consecutive_yoy(cpi)
        .into_iter()
        .map(|p| (p.period, p.value))
        .collect();

    consecutive_yoy(wages).into_iter().rev().find_map(|wage| {
        let inflation = cpi_growth.get(&wage.period)?;
        Some(Observation::with_value(wage.period, wage.value - inflation))
    })
}

/// [`real_wage_growth`] for every country present in both maps.
pub fn real_wage_growth_by_country(
    wages: &CountrySeriesMap,
    cpi: &CountrySeriesMap,
) -> CountryMetricMap {
    wages
        .iter()
        .filter_map(|(country, wage_series)| {
            let observation = real_wage_growth(wage_series, cpi.get(country)?)?;
            Some((country.clone(), observation))
        })
        .collect()
}

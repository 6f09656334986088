//! SDMX-JSON decoder (ECB statistical data warehouse).
//!
//! Series are keyed by colon-delimited dimension indices (`"0:3:0:0"`); observations are keyed
//! by a numeric time index. Only the latest observation of each series is kept.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::number_from_value;
use crate::models::{CountryCode, CountryMetricMap, Observation, PeriodLabel, PeriodOrder};

const REF_AREA: &str = "REF_AREA";
const TIME_PERIOD: &str = "TIME_PERIOD";

// ============================================================================
// Wire Structures
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdmxMessage {
    #[serde(default)]
    pub data_sets: Vec<SdmxDataSet>,
    #[serde(default)]
    pub structure: Option<SdmxStructure>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SdmxDataSet {
    #[serde(default)]
    pub series: Option<BTreeMap<String, SdmxSeries>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SdmxSeries {
    /// Time index -> `[value, attribute indices...]`
    #[serde(default)]
    pub observations: BTreeMap<String, Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SdmxStructure {
    #[serde(default)]
    pub dimensions: SdmxDimensions,
}

#[derive(Debug, Default, Deserialize)]
pub struct SdmxDimensions {
    #[serde(default)]
    pub series: Vec<SdmxDimension>,
    #[serde(default)]
    pub observation: Vec<SdmxDimension>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SdmxDimension {
    pub id: String,
    #[serde(default)]
    pub values: Vec<SdmxDimensionValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SdmxDimensionValue {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// Decoding
// ============================================================================

impl SdmxMessage {
    fn series(&self) -> Option<&BTreeMap<String, SdmxSeries>> {
        self.data_sets.first()?.series.as_ref()
    }

    fn series_dimensions(&self) -> &[SdmxDimension] {
        self.structure
            .as_ref()
            .map(|s| s.dimensions.series.as_slice())
            .unwrap_or(&[])
    }

    fn time_values(&self) -> &[SdmxDimensionValue] {
        self.structure
            .as_ref()
            .and_then(|s| s.dimensions.observation.iter().find(|d| d.id == TIME_PERIOD))
            .map(|d| d.values.as_slice())
            .unwrap_or(&[])
    }
}

/// Latest observation per reference area.
///
/// Returns `None` when the message has no first data set, no series object, or an empty one.
/// Reference areas that cannot be resolved are labelled `REF_<index>`.
pub fn latest_by_country(message: &SdmxMessage) -> Option<CountryMetricMap> {
    let series = message.series()?;
    if series.is_empty() {
        return None;
    }

    let dimensions = message.series_dimensions();
    let ref_area_pos = dimensions.iter().position(|d| d.id == REF_AREA);
    let time_values = message.time_values();

    let mut out = CountryMetricMap::new();
    for (key, entry) in series {
        let Some(observation) = latest_observation(entry, time_values) else {
            continue;
        };
        let country = resolve_ref_area(key, ref_area_pos, dimensions);
        out.upsert_latest(country, observation, PeriodOrder::Date);
    }

    Some(out)
}

/// Latest observation of the first series, ordered by dimension indices.
///
/// Used for single-series flows such as the EUR reference exchange rate.
pub fn first_series_latest(message: &SdmxMessage) -> Option<Observation> {
    let series = message.series()?;
    let (_, first) = series
        .iter()
        .min_by_key(|(key, _)| series_key_indices(key))?;
    latest_observation(first, message.time_values())
}

fn series_key_indices(key: &str) -> Vec<usize> {
    key.split(':')
        .map(|part| part.parse().unwrap_or(usize::MAX))
        .collect()
}

fn resolve_ref_area(
    key: &str,
    position: Option<usize>,
    dimensions: &[SdmxDimension],
) -> CountryCode {
    let Some(position) = position else {
        return format!("REF_{}", key).into();
    };
    let Some(part) = key.split(':').nth(position) else {
        return format!("REF_{}", key).into();
    };

    part.parse::<usize>()
        .ok()
        .and_then(|idx| dimensions[position].values.get(idx))
        .map(|value| CountryCode::from(value.id.clone()))
        .unwrap_or_else(|| format!("REF_{}", part).into())
}

/// Observation at the highest numeric time index of a series.
fn latest_observation(
    series: &SdmxSeries,
    time_values: &[SdmxDimensionValue],
) -> Option<Observation> {
    let (idx, values) = series
        .observations
        .iter()
        .filter_map(|(k, v)| k.parse::<usize>().ok().map(|idx| (idx, v)))
        .max_by_key(|(idx, _)| *idx)?;

    let period = time_values
        .get(idx)
        .map(|v| PeriodLabel::Text(v.id.clone()))
        .unwrap_or(PeriodLabel::Numeric(idx as i64));
    let value = values.first().and_then(number_from_value);

    Some(Observation::new(period, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(value: Value) -> SdmxMessage {
        serde_json::from_value(value).unwrap()
    }

    fn gdp_message() -> SdmxMessage {
        message(json!({
            "dataSets": [{
                "series": {
                    "0:2": { "observations": { "0": [100], "1": [110], "2": [121] } }
                }
            }],
            "structure": {
                "dimensions": {
                    "series": [
                        { "id": "REF_AREA", "values": [{ "id": "DE" }, { "id": "FR" }, { "id": "ES" }] },
                        { "id": "UNIT", "values": [{ "id": "A" }, { "id": "B" }, { "id": "EUR" }] }
                    ],
                    "observation": [
                        { "id": "TIME_PERIOD", "values": [{ "id": "2020" }, { "id": "2021" }, { "id": "2022" }] }
                    ]
                }
            }
        }))
    }

    #[test]
    fn test_latest_picks_max_time_index() {
        let map = latest_by_country(&gdp_message()).unwrap();
        let de = map.get("DE").unwrap();
        assert_eq!(de.period, PeriodLabel::from("2022"));
        assert_eq!(de.value, Some(121.0));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_time_index_is_numeric_not_lexicographic() {
        let msg = message(json!({
            "dataSets": [{ "series": { "0": { "observations": { "9": [1.0], "10": [2.0] } } } }],
            "structure": { "dimensions": { "series": [{ "id": "REF_AREA", "values": [{ "id": "IT" }] }] } }
        }));
        let map = latest_by_country(&msg).unwrap();
        // No TIME_PERIOD dimension: period falls back to the raw index
        assert_eq!(map.get("IT").unwrap().period, PeriodLabel::Numeric(10));
        assert_eq!(map.value("IT"), Some(2.0));
    }

    #[test]
    fn test_unresolved_ref_area_fallbacks() {
        let msg = message(json!({
            "dataSets": [{ "series": { "7:0": { "observations": { "0": ["3.5"] } } } }],
            "structure": { "dimensions": { "series": [{ "id": "REF_AREA", "values": [{ "id": "DE" }] }] } }
        }));
        let map = latest_by_country(&msg).unwrap();
        assert_eq!(map.value("REF_7"), Some(3.5));

        let msg = message(json!({
            "dataSets": [{ "series": { "1:0": { "observations": { "0": [1] } } } }]
        }));
        let map = latest_by_country(&msg).unwrap();
        assert!(map.contains("REF_1:0"));
    }

    #[test]
    fn test_non_numeric_value_is_null() {
        let msg = message(json!({
            "dataSets": [{ "series": { "0": { "observations": { "0": ["NaN"], "1": [null] } } } }],
            "structure": { "dimensions": { "series": [{ "id": "REF_AREA", "values": [{ "id": "LV" }] }] } }
        }));
        let map = latest_by_country(&msg).unwrap();
        assert!(map.contains("LV"));
        assert_eq!(map.value("LV"), None);
    }

    #[test]
    fn test_missing_series_is_no_data() {
        assert!(latest_by_country(&message(json!({}))).is_none());
        assert!(latest_by_country(&message(json!({ "dataSets": [{}] }))).is_none());
        assert!(latest_by_country(&message(json!({ "dataSets": [{ "series": {} }] }))).is_none());
    }

    #[test]
    fn test_first_series_latest() {
        let msg = message(json!({
            "dataSets": [{
                "series": {
                    "10:0": { "observations": { "0": [9.9] } },
                    "2:0": { "observations": { "0": [1.08], "1": [1.09] } }
                }
            }],
            "structure": {
                "dimensions": {
                    "observation": [{ "id": "TIME_PERIOD", "values": [{ "id": "2025-01-02" }, { "id": "2025-01-03" }] }]
                }
            }
        }));
        let obs = first_series_latest(&msg).unwrap();
        assert_eq!(obs.period, PeriodLabel::from("2025-01-03"));
        assert_eq!(obs.value, Some(1.09));
    }
}

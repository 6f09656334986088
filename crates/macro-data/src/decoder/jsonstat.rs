//! JSON-stat 2.0 decoder (Eurostat dissemination API).
//!
//! A dataset is a dense cube flattened row-major: the last dimension in `id` varies fastest.
//! Values are addressed by a single linear index, either as a sparse object or a dense array.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;

use super::number_from_value;
use crate::models::{CountryMetricMap, Observation, PeriodLabel, PeriodOrder};

pub const GEO: &str = "geo";
pub const TIME: &str = "time";

// ============================================================================
// Wire Structures
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct JsonStatDataset {
    #[serde(default)]
    pub id: Vec<String>,
    #[serde(default)]
    pub size: Vec<usize>,
    #[serde(default)]
    pub dimension: HashMap<String, JsonStatDimension>,
    #[serde(default)]
    pub value: JsonStatValues,
}

#[derive(Debug, Default, Deserialize)]
pub struct JsonStatDimension {
    #[serde(default)]
    pub category: JsonStatCategory,
}

#[derive(Debug, Default, Deserialize)]
pub struct JsonStatCategory {
    #[serde(default)]
    pub index: Option<CategoryIndex>,
    #[serde(default)]
    pub label: HashMap<String, String>,
}

/// Category positions: `{"DE": 0, "FR": 1}` or `["DE", "FR"]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CategoryIndex {
    Positions(HashMap<String, usize>),
    Ordered(Vec<String>),
}

/// Cube values: sparse `{"4": 7.5}` or dense `[null, 1.2, ...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum JsonStatValues {
    Sparse(BTreeMap<String, Value>),
    Dense(Vec<Value>),
}

impl Default for JsonStatValues {
    fn default() -> Self {
        Self::Sparse(BTreeMap::new())
    }
}

impl JsonStatValues {
    /// Non-null values with their linear index. Keys that are not integers are skipped.
    fn entries(&self) -> Vec<(usize, f64)> {
        match self {
            Self::Sparse(map) => map
                .iter()
                .filter_map(|(k, v)| Some((k.parse().ok()?, number_from_value(v)?)))
                .collect(),
            Self::Dense(values) => values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| Some((i, number_from_value(v)?)))
                .collect(),
        }
    }
}

// ============================================================================
// Index Arithmetic
// ============================================================================

/// Decodes a linear index into per-dimension coordinates (last dimension fastest).
///
/// Returns `None` if any dimension is empty or the index lies outside the cube.
///
/// # Examples
///
/// ```
/// use macrodash_data::decoder::jsonstat::decode_index;
///
/// assert_eq!(decode_index(4, &[2, 3]), Some(vec![1, 1]));
/// assert_eq!(decode_index(6, &[2, 3]), None);
/// ```
pub fn decode_index(index: usize, size: &[usize]) -> Option<Vec<usize>> {
    let total = cube_len(size)?;
    if index >= total {
        return None;
    }

    let mut coords = vec![0; size.len()];
    let mut rest = index;
    for i in (0..size.len()).rev() {
        coords[i] = rest % size[i];
        rest /= size[i];
    }
    Some(coords)
}

/// Inverse of [`decode_index`].
pub fn encode_index(coords: &[usize], size: &[usize]) -> Option<usize> {
    if coords.len() != size.len() {
        return None;
    }
    coords.iter().zip(size).try_fold(0usize, |acc, (&c, &n)| {
        if c >= n {
            return None;
        }
        acc.checked_mul(n)?.checked_add(c)
    })
}

fn cube_len(size: &[usize]) -> Option<usize> {
    if size.contains(&0) {
        return None;
    }
    size.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

// ============================================================================
// Decoding
// ============================================================================

/// Coordinate -> category code for one dimension, built once per response.
fn inverse_index(category: &JsonStatCategory) -> HashMap<usize, &str> {
    match &category.index {
        Some(CategoryIndex::Positions(map)) => {
            map.iter().map(|(code, &pos)| (pos, code.as_str())).collect()
        }
        Some(CategoryIndex::Ordered(codes)) => codes
            .iter()
            .enumerate()
            .map(|(pos, code)| (pos, code.as_str()))
            .collect(),
        None => HashMap::new(),
    }
}

/// Latest observation per `geo` code, comparing `time` labels as dates.
///
/// Returns `None` when the dataset has no `geo`/`time` dimension or `id` and `size` disagree.
pub fn latest_by_country(dataset: &JsonStatDataset) -> Option<CountryMetricMap> {
    if dataset.id.len() != dataset.size.len() {
        return None;
    }
    let geo_pos = dataset.id.iter().position(|d| d == GEO)?;
    let time_pos = dataset.id.iter().position(|d| d == TIME)?;

    let geo_category = &dataset.dimension.get(GEO)?.category;
    let time_category = &dataset.dimension.get(TIME)?.category;
    let geo_codes = inverse_index(geo_category);
    let time_codes = inverse_index(time_category);

    let mut out = CountryMetricMap::new();
    for (index, value) in dataset.value.entries() {
        let Some(coords) = decode_index(index, &dataset.size) else {
            continue;
        };
        let geo = geo_codes.get(&coords[geo_pos]).copied();
        let time = time_codes.get(&coords[time_pos]).copied();
        let (Some(geo), Some(time)) = (geo, time) else {
            continue;
        };

        let label = time_category
            .label
            .get(time)
            .map(String::as_str)
            .unwrap_or(time);
        out.upsert_latest(
            geo.to_string(),
            Observation::with_value(PeriodLabel::from(label), value),
            PeriodOrder::Date,
        );
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(value: Value) -> JsonStatDataset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_index_last_dimension_fastest() {
        assert_eq!(decode_index(4, &[2, 3]), Some(vec![1, 1]));
        assert_eq!(decode_index(0, &[2, 3]), Some(vec![0, 0]));
        assert_eq!(decode_index(5, &[2, 3]), Some(vec![1, 2]));
        assert_eq!(decode_index(7, &[1, 1, 2, 4]), Some(vec![0, 0, 1, 3]));
    }

    #[test]
    fn test_decode_index_rejects_bad_input() {
        assert_eq!(decode_index(6, &[2, 3]), None);
        assert_eq!(decode_index(0, &[2, 0, 3]), None);
    }

    #[test]
    fn test_encode_index() {
        assert_eq!(encode_index(&[1, 1], &[2, 3]), Some(4));
        assert_eq!(encode_index(&[2, 0], &[2, 3]), None);
        assert_eq!(encode_index(&[1], &[2, 3]), None);
    }

    #[test]
    fn test_latest_by_country_sparse() {
        let ds = dataset(json!({
            "id": ["freq", "geo", "time"],
            "size": [1, 2, 3],
            "dimension": {
                "geo": { "category": { "index": { "DE": 0, "FR": 1 } } },
                "time": { "category": {
                    "index": { "2024-01": 0, "2024-02": 1, "2024-03": 2 },
                    "label": { "2024-01": "2024-01", "2024-02": "2024-02", "2024-03": "2024-03" }
                } }
            },
            "value": { "0": 3.1, "1": 3.0, "4": 7.5, "5": null }
        }));

        let map = latest_by_country(&ds).unwrap();
        assert_eq!(map.value("DE"), Some(3.0));
        assert_eq!(map.get("DE").unwrap().period, PeriodLabel::from("2024-02"));
        // 5 is null, so FR stops at index 4 -> time 1
        assert_eq!(map.value("FR"), Some(7.5));
        assert_eq!(map.get("FR").unwrap().period, PeriodLabel::from("2024-02"));
    }

    #[test]
    fn test_latest_by_country_dense_with_ordered_index() {
        let ds = dataset(json!({
            "id": ["geo", "time"],
            "size": [2, 2],
            "dimension": {
                "geo": { "category": { "index": ["NL", "EE"] } },
                "time": { "category": { "index": ["2023M12", "2024M01"] } }
            },
            "value": [3.6, 3.7, null, 7.9]
        }));

        let map = latest_by_country(&ds).unwrap();
        assert_eq!(map.value("NL"), Some(3.7));
        // No label entry: code is used
        assert_eq!(map.get("EE").unwrap().period, PeriodLabel::from("2024M01"));
        assert_eq!(map.value("EE"), Some(7.9));
    }

    #[test]
    fn test_unresolvable_coordinates_are_skipped() {
        let ds = dataset(json!({
            "id": ["geo", "time"],
            "size": [2, 3],
            "dimension": {
                "geo": { "category": { "index": { "DE": 0 } } },
                "time": { "category": { "index": { "2024-01": 0, "2024-02": 1, "2024-03": 2 } } }
            },
            "value": { "4": 7.5, "99": 1.0, "x": 2.0 }
        }));

        let map = latest_by_country(&ds).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_dimensions_is_no_data() {
        let ds = dataset(json!({ "id": ["geo"], "size": [1], "value": {} }));
        assert!(latest_by_country(&ds).is_none());

        let ds = dataset(json!({ "id": ["geo", "time"], "size": [1], "value": {} }));
        assert!(latest_by_country(&ds).is_none());
    }
}

//! World Bank indicators API decoder.
//!
//! Responses are a two-element array `[metadata, rows]`. Failed queries come back as a
//! one-element array carrying a `message` list, which decodes to no data.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::number_from_value;
use crate::models::{
    CountryCode, CountryMetricMap, CountrySeriesMap, Observation, PeriodLabel, PeriodOrder,
    SeriesPoint,
};
use crate::normalizer::CountryTable;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WorldBankResponse {
    Page(WorldBankPage, Option<Vec<WorldBankRow>>),
    Message(Vec<Value>),
}

/// Page metadata. Numbers are sometimes sent as strings.
#[derive(Debug, Default, Deserialize)]
pub struct WorldBankPage {
    #[serde(default)]
    pub page: Option<Value>,
    #[serde(default)]
    pub pages: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
}

/// One data row. Aggregates and gaps come back with null fields.
#[derive(Debug, Deserialize)]
pub struct WorldBankRow {
    #[serde(default)]
    pub countryiso3code: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl WorldBankRow {
    fn country(&self, countries: &CountryTable) -> Option<CountryCode> {
        countries.iso3_to_iso2(self.countryiso3code.as_deref()?)
    }
}

impl WorldBankResponse {
    /// Data rows, or `None` for error payloads and pages without a rows array.
    pub fn rows(&self) -> Option<&[WorldBankRow]> {
        match self {
            Self::Page(page, rows) => {
                let pages = page.pages.as_ref().and_then(number_from_value).unwrap_or(1.0);
                if pages > 1.0 {
                    warn!(
                        "World Bank response spans {} pages, only the first is decoded",
                        pages
                    );
                }
                rows.as_deref()
            }
            Self::Message(items) => {
                warn!(
                    "World Bank payload has no data page: {}",
                    serde_json::to_string(items).unwrap_or_default()
                );
                None
            }
        }
    }
}

/// Latest non-null value per tracked country, comparing years numerically.
///
/// Zero is a valid value; only nulls are skipped.
pub fn latest_by_country(
    response: &WorldBankResponse,
    countries: &CountryTable,
) -> Option<CountryMetricMap> {
    let rows = response.rows()?;
    let mut out = CountryMetricMap::new();

    for row in rows {
        let (Some(iso2), Some(date), Some(value)) =
            (row.country(countries), row.date.as_deref(), row.value)
        else {
            continue;
        };
        out.upsert_latest(
            iso2,
            Observation::with_value(date, value),
            PeriodOrder::Numeric,
        );
    }

    Some(out)
}

/// Full ascending history per tracked country, nulls and unreadable years removed.
pub fn history_by_country(
    response: &WorldBankResponse,
    countries: &CountryTable,
) -> Option<CountrySeriesMap> {
    let rows = response.rows()?;
    let mut out = CountrySeriesMap::new();

    for row in rows {
        let (Some(iso2), Some(date)) = (row.country(countries), row.date.as_deref()) else {
            continue;
        };
        let Some(value) = row.value.filter(|v| v.is_finite()) else {
            continue;
        };
        let period = PeriodLabel::from(date);
        if period.as_number().is_none() {
            continue;
        }
        out.entry(iso2).or_default().push(SeriesPoint::new(period, value));
    }

    for series in out.values_mut() {
        series.sort_by(|a, b| {
            PeriodOrder::Numeric
                .compare(&a.period, &b.period)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> WorldBankResponse {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> WorldBankResponse {
        response(json!([
            { "page": 1, "pages": 1, "per_page": 1000, "total": 6 },
            [
                { "countryiso3code": "USA", "date": "2023", "value": 3.4 },
                { "countryiso3code": "USA", "date": "2024", "value": null },
                { "countryiso3code": "USA", "date": "2022", "value": 8.0 },
                { "countryiso3code": "JPN", "date": "2023", "value": 0.0 },
                { "countryiso3code": "GBR", "date": "2023", "value": 6.7 },
                { "countryiso3code": "", "date": "2023", "value": 1.0 }
            ]
        ]))
    }

    #[test]
    fn test_latest_by_country() {
        let map = latest_by_country(&sample(), &CountryTable::default()).unwrap();

        assert_eq!(map.value("US"), Some(3.4));
        assert_eq!(map.get("US").unwrap().period, PeriodLabel::from("2023"));
        // Zero is data, not missing
        assert_eq!(map.value("JP"), Some(0.0));
        // Untracked countries and aggregates are dropped
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_history_by_country_sorted_ascending() {
        let map = history_by_country(&sample(), &CountryTable::default()).unwrap();
        let us = &map["US"];

        assert_eq!(us.len(), 2);
        assert_eq!(us[0], SeriesPoint::new("2022", 8.0));
        assert_eq!(us[1], SeriesPoint::new("2023", 3.4));
    }

    #[test]
    fn test_error_payload_is_no_data() {
        let resp = response(json!([
            { "message": [{ "id": "120", "key": "Invalid value", "value": "The provided parameter value is not valid" }] }
        ]));
        assert!(latest_by_country(&resp, &CountryTable::default()).is_none());
    }

    #[test]
    fn test_page_without_rows_is_no_data() {
        let resp = response(json!([{ "page": 0, "pages": 0, "total": 0 }, null]));
        assert!(latest_by_country(&resp, &CountryTable::default()).is_none());
        assert!(history_by_country(&resp, &CountryTable::default()).is_none());
    }

    #[test]
    fn test_null_row_fields_skip_only_that_row() {
        let resp = response(json!([
            { "page": 1, "pages": 1, "total": 3 },
            [
                { "countryiso3code": null, "date": "2023", "value": 1.5 },
                { "countryiso3code": "DEU", "date": null, "value": 2.0 },
                { "countryiso3code": "JPN", "date": "2023", "value": 3.2 }
            ]
        ]));
        assert!(matches!(resp, WorldBankResponse::Page(..)));

        let map = latest_by_country(&resp, &CountryTable::default()).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.value("JP"), Some(3.2));

        let history = history_by_country(&resp, &CountryTable::default()).unwrap();
        assert_eq!(history["JP"], vec![SeriesPoint::new("2023", 3.2)]);
    }

    #[test]
    fn test_string_page_metadata() {
        let resp = response(json!([
            { "page": "1", "pages": "3", "total": "1" },
            [{ "countryiso3code": "IND", "date": "2021", "value": 5.1 }]
        ]));
        let map = latest_by_country(&resp, &CountryTable::default()).unwrap();
        assert_eq!(map.value("IN"), Some(5.1));
    }
}

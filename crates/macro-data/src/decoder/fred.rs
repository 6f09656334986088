//! FRED `series/observations` decoder.
//!
//! Observations arrive oldest first with string values; `"."` marks a missing period.

use serde::{Deserialize, Serialize};

use crate::derived::yoy_percent;
use crate::models::{PeriodLabel, SeriesPoint};

/// Positional distance used to find the year-ago observation of a monthly series.
pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Default, Deserialize)]
pub struct FredResponse {
    #[serde(default)]
    pub observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
pub struct FredObservation {
    pub date: String,
    pub value: String,
}

impl FredObservation {
    fn point(&self) -> Option<SeriesPoint> {
        let value = self.value.trim();
        if value == "." {
            return None;
        }
        let value: f64 = value.parse().ok()?;
        value
            .is_finite()
            .then(|| SeriesPoint::new(PeriodLabel::from(self.date.as_str()), value))
    }
}

/// Latest reading of one FRED series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FredSeries {
    pub series_id: String,
    pub latest: Option<SeriesPoint>,
    /// Observation before `latest`; absent for YoY-derived series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<SeriesPoint>,
}

impl FredSeries {
    pub fn empty(series_id: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            ..Default::default()
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.latest.as_ref().map(|p| p.value)
    }

    /// `latest - previous`, when both exist.
    pub fn change(&self) -> Option<f64> {
        Some(self.latest.as_ref()?.value - self.previous.as_ref()?.value)
    }
}

/// Non-missing observations, newest first, with their position in the reversed series.
fn newest_first(response: &FredResponse) -> impl Iterator<Item = (usize, SeriesPoint)> + '_ {
    response
        .observations
        .iter()
        .rev()
        .enumerate()
        .filter_map(|(i, o)| o.point().map(|p| (i, p)))
}

/// Latest and previous non-missing observations.
pub fn latest(series_id: &str, response: &FredResponse) -> FredSeries {
    let mut points = newest_first(response).map(|(_, p)| p);
    FredSeries {
        series_id: series_id.to_string(),
        latest: points.next(),
        previous: points.next(),
    }
}

/// Year-over-year percent change of a monthly level series.
///
/// With the latest non-missing observation at reversed position `L`, the comparison point is
/// the first non-missing observation at reversed position greater than `L + 12`. This counts
/// positions, not calendar months, so gaps in the series shift the comparison point.
/// No comparison point (or a zero one) means no value.
pub fn latest_yoy(series_id: &str, response: &FredResponse) -> FredSeries {
    let mut points = newest_first(response);
    let Some((latest_pos, latest)) = points.next() else {
        return FredSeries::empty(series_id);
    };

    let ago = points.find(|(i, _)| *i > latest_pos + MONTHS_PER_YEAR);
    let yoy = ago.and_then(|(_, ago)| yoy_percent(latest.value, ago.value));

    FredSeries {
        series_id: series_id.to_string(),
        latest: yoy.map(|v| SeriesPoint::new(latest.period, v)),
        previous: None,
    }
}

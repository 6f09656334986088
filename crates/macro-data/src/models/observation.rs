use serde::{Deserialize, Serialize};

use super::period::PeriodLabel;

/// A single value reported for one period.
///
/// `value` is `None` when the provider reported the period without a usable number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub period: PeriodLabel,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(period: impl Into<PeriodLabel>, value: Option<f64>) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }

    /// Observation with a present value. Non-finite numbers are stored as missing.
    pub fn with_value(period: impl Into<PeriodLabel>, value: f64) -> Self {
        Self::new(period, Some(value).filter(|v| v.is_finite()))
    }
}

/// One non-null point of an ordered series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: PeriodLabel,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(period: impl Into<PeriodLabel>, value: f64) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }
}

impl From<SeriesPoint> for Observation {
    fn from(point: SeriesPoint) -> Self {
        Observation::with_value(point.period, point.value)
    }
}

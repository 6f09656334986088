//! Treasury term spreads and their qualitative shape.

use serde::Serialize;

/// Shape of the curve between two tenors, bucketed in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveShape {
    /// 0 to 25 bps
    Flat,
    /// 25 to 100 bps
    ModeratelySteep,
    Steep,
    /// Within 25 bps below zero
    SlightlyInverted,
    /// 25 to 75 bps below zero
    ModeratelyInverted,
    DeeplyInverted,
}

impl CurveShape {
    /// Classifies a spread given in percentage points.
    pub fn classify(spread: f64) -> Self {
        let bps = spread.abs() * 100.0;
        if spread >= 0.0 {
            match bps {
                b if b < 25.0 => Self::Flat,
                b if b < 100.0 => Self::ModeratelySteep,
                _ => Self::Steep,
            }
        } else {
            match bps {
                b if b < 25.0 => Self::SlightlyInverted,
                b if b < 75.0 => Self::ModeratelyInverted,
                _ => Self::DeeplyInverted,
            }
        }
    }

    pub fn is_inverted(&self) -> bool {
        matches!(
            self,
            Self::SlightlyInverted | Self::ModeratelyInverted | Self::DeeplyInverted
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flat => "flat / just positive",
            Self::ModeratelySteep => "moderately steep",
            Self::Steep => "steep",
            Self::SlightlyInverted => "slightly inverted",
            Self::ModeratelyInverted => "moderately inverted",
            Self::DeeplyInverted => "deeply inverted",
        }
    }
}

/// Spread between a long and a short tenor, in percentage points.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSpread {
    pub name: &'static str,
    pub value: f64,
    pub shape: CurveShape,
}

impl TermSpread {
    /// `long - short`, or `None` if either yield is missing.
    pub fn between(name: &'static str, long: Option<f64>, short: Option<f64>) -> Option<Self> {
        let value = long? - short?;
        value.is_finite().then(|| Self {
            name,
            value,
            shape: CurveShape::classify(value),
        })
    }
}

/// Yields by tenor used for the standard spreads.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreasuryYields {
    pub three_month: Option<f64>,
    pub one_year: Option<f64>,
    pub two_year: Option<f64>,
    pub ten_year: Option<f64>,
    pub thirty_year: Option<f64>,
}

/// 1Y-3M, 10Y-2Y and 30Y-2Y spreads, skipping any with a missing tenor.
pub fn term_spreads(yields: &TreasuryYields) -> Vec<TermSpread> {
    [
        TermSpread::between("1y3m", yields.one_year, yields.three_month),
        TermSpread::between("2s10s", yields.ten_year, yields.two_year),
        TermSpread::between("2s30s", yields.thirty_year, yields.two_year),
    ]
    .into_iter()
    .flatten()
    .collect()
}

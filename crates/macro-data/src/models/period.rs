use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Period label attached to an observation.
///
/// Providers label periods either with a number (a year, or a raw time index when the
/// label could not be resolved) or with text ("2024", "2024-05", "2024-05-31", "2024-Q2",
/// "2024M05"). Labels are kept verbatim; ordering goes through [`PeriodOrder`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodLabel {
    Numeric(i64),
    Text(String),
}

impl PeriodLabel {
    /// Numeric reading of the label ("2023" and 2023 are both 2023.0).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Numeric(n) => Some(*n as f64),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Calendar reading of the label, anchored to the first day of the period.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Numeric(n) if (1000..=9999).contains(n) => {
                NaiveDate::from_ymd_opt(*n as i32, 1, 1)
            }
            Self::Numeric(_) => None,
            Self::Text(s) => parse_period_date(s.trim()),
        }
    }
}

impl From<&str> for PeriodLabel {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PeriodLabel {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PeriodLabel {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn parse_period_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let (year, rest) = split_year(s)?;
    if rest.is_empty() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    let rest = rest.strip_prefix('-').unwrap_or(rest);
    let month = if let Some(q) = rest.strip_prefix('Q') {
        let quarter: u32 = q.parse().ok()?;
        if !(1..=4).contains(&quarter) {
            return None;
        }
        (quarter - 1) * 3 + 1
    } else if let Some(m) = rest.strip_prefix('M') {
        m.parse().ok()?
    } else {
        rest.parse().ok()?
    };

    NaiveDate::from_ymd_opt(year, month, 1)
}

fn split_year(s: &str) -> Option<(i32, &str)> {
    if s.len() < 4 || !s.is_char_boundary(4) {
        return None;
    }
    let (year, rest) = s.split_at(4);
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((year.parse().ok()?, rest))
}

/// Provider-specific rule for ordering two period labels of one series.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PeriodOrder {
    /// Compare as numbers (World Bank years).
    Numeric,
    /// Compare as calendar dates (Eurostat months, FRED dates).
    Date,
}

impl PeriodOrder {
    /// Compares two labels. `None` when either label cannot be read under this order.
    pub fn compare(self, a: &PeriodLabel, b: &PeriodLabel) -> Option<Ordering> {
        match self {
            Self::Numeric => a.as_number()?.partial_cmp(&b.as_number()?),
            Self::Date => Some(a.as_date()?.cmp(&b.as_date()?)),
        }
    }

    /// True only when `candidate` is strictly later than `current`.
    ///
    /// Unreadable labels never win, so ties and garbage keep the existing entry.
    pub fn is_later(self, candidate: &PeriodLabel, current: &PeriodLabel) -> bool {
        matches!(self.compare(candidate, current), Some(Ordering::Greater))
    }
}

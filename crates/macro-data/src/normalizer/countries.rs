//! Country code table - ISO-3 <-> ISO-2 for the tracked country set.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::models::CountryCode;

/// One tracked country.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedCountry {
    pub iso2: CountryCode,
    pub iso3: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

impl TrackedCountry {
    pub const fn new(iso2: &'static str, iso3: &'static str, name: &'static str) -> Self {
        Self {
            iso2: Cow::Borrowed(iso2),
            iso3: Cow::Borrowed(iso3),
            name: Cow::Borrowed(name),
        }
    }
}

/// Euro-area members published by the regional sources, then the global set.
pub const DEFAULT_COUNTRIES: &[TrackedCountry] = &[
    TrackedCountry::new("DE", "DEU", "Germany"),
    TrackedCountry::new("FR", "FRA", "France"),
    TrackedCountry::new("ES", "ESP", "Spain"),
    TrackedCountry::new("NL", "NLD", "Netherlands"),
    TrackedCountry::new("IT", "ITA", "Italy"),
    TrackedCountry::new("LT", "LTU", "Lithuania"),
    TrackedCountry::new("EE", "EST", "Estonia"),
    TrackedCountry::new("LV", "LVA", "Latvia"),
    TrackedCountry::new("US", "USA", "United States"),
    TrackedCountry::new("RU", "RUS", "Russia"),
    TrackedCountry::new("CN", "CHN", "China"),
    TrackedCountry::new("JP", "JPN", "Japan"),
    TrackedCountry::new("IN", "IND", "India"),
    TrackedCountry::new("PL", "POL", "Poland"),
    TrackedCountry::new("AR", "ARG", "Argentina"),
    TrackedCountry::new("BR", "BRA", "Brazil"),
];

/// Immutable lookup table between ISO-3 and ISO-2 codes.
///
/// Only countries present in the table are mappable; everything else is dropped by
/// decoders that rely on it.
#[derive(Clone, Debug)]
pub struct CountryTable {
    countries: Vec<TrackedCountry>,
    by_iso3: HashMap<String, usize>,
    by_iso2: HashMap<String, usize>,
}

impl CountryTable {
    /// Build a table from an explicit country list.
    pub fn new(countries: Vec<TrackedCountry>) -> Self {
        let mut by_iso3 = HashMap::with_capacity(countries.len());
        let mut by_iso2 = HashMap::with_capacity(countries.len());
        for (i, c) in countries.iter().enumerate() {
            by_iso3.insert(c.iso3.to_ascii_uppercase(), i);
            by_iso2.insert(c.iso2.to_ascii_uppercase(), i);
        }
        Self {
            countries,
            by_iso3,
            by_iso2,
        }
    }

    pub fn iso3_to_iso2(&self, iso3: &str) -> Option<CountryCode> {
        let i = self.by_iso3.get(&iso3.trim().to_ascii_uppercase())?;
        Some(self.countries[*i].iso2.clone())
    }

    pub fn iso2_to_iso3(&self, iso2: &str) -> Option<&str> {
        let i = self.by_iso2.get(&iso2.trim().to_ascii_uppercase())?;
        Some(self.countries[*i].iso3.as_ref())
    }

    pub fn get(&self, iso2: &str) -> Option<&TrackedCountry> {
        let i = self.by_iso2.get(&iso2.trim().to_ascii_uppercase())?;
        self.countries.get(*i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedCountry> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl Default for CountryTable {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRIES.to_vec())
    }
}

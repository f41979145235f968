use std::collections::BTreeSet;

use serde::Serialize;

use super::error::{CriteriaError, DataError, Result};
use super::model::Table;

/// Country preselected when the dataset contains it.
pub const PREFERRED_COUNTRY: &str = "USA";

// ---------------------------------------------------------------------------
// Country domain
// ---------------------------------------------------------------------------

/// Sorted set of the countries present in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryDomain {
    countries: BTreeSet<String>,
}

impl CountryDomain {
    /// `"USA"` if present, otherwise the lexicographically first country.
    pub fn default_country(&self) -> Option<&str> {
        self.countries
            .get(PREFERRED_COUNTRY)
            .or_else(|| self.countries.first())
            .map(String::as_str)
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.contains(country)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Distinct `Country` values, sorted lexicographically.
pub fn distinct_countries(table: &Table) -> CountryDomain {
    CountryDomain {
        countries: table.iter().map(|r| r.country.clone()).collect(),
    }
}

/// Smallest and largest `Year` in the table.
pub fn year_bounds(table: &Table) -> Result<(i32, i32)> {
    let mut years = table.iter().map(|r| r.year);
    let first = years.next().ok_or(DataError::EmptyDataset)?;
    Ok(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Country + inclusive year range. A value of this type always has
/// `year_min <= year_max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    country: String,
    year_min: i32,
    year_max: i32,
}

impl FilterCriteria {
    pub fn new(country: impl Into<String>, year_min: i32, year_max: i32) -> Result<Self> {
        if year_min > year_max {
            return Err(CriteriaError::InvertedYearRange {
                min: year_min,
                max: year_max,
            }
            .into());
        }
        Ok(FilterCriteria {
            country: country.into(),
            year_min,
            year_max,
        })
    }

    /// Default country over the table's full year range.
    pub fn default_for(table: &Table) -> Result<Self> {
        let (lower, upper) = year_bounds(table)?;
        let domain = distinct_countries(table);
        let country = domain.default_country().ok_or(DataError::EmptyDataset)?;
        FilterCriteria::new(country, lower, upper)
    }

    /// Check the criteria against the dataset they will be applied to: the
    /// country must occur in it and both years must lie in its observed range.
    pub fn validate(&self, table: &Table) -> Result<()> {
        if !distinct_countries(table).contains(&self.country) {
            return Err(CriteriaError::UnknownCountry(self.country.clone()).into());
        }
        let (lower, upper) = year_bounds(table)?;
        if self.year_min < lower || self.year_max > upper {
            return Err(CriteriaError::YearOutOfRange {
                min: self.year_min,
                max: self.year_max,
                lower,
                upper,
            }
            .into());
        }
        Ok(())
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn year_min(&self) -> i32 {
        self.year_min
    }

    pub fn year_max(&self) -> i32 {
        self.year_max
    }

    /// Copy of these criteria with another country.
    pub fn with_country(&self, country: impl Into<String>) -> Self {
        FilterCriteria {
            country: country.into(),
            ..self.clone()
        }
    }

    /// Copy of these criteria with another year range.
    pub fn with_year_range(&self, year_min: i32, year_max: i32) -> Result<Self> {
        FilterCriteria::new(self.country.clone(), year_min, year_max)
    }
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Records whose country equals `criteria.country` and whose year lies in
/// `[year_min, year_max]`, in their original order. An empty result is
/// valid.
pub fn filter(table: &Table, criteria: &FilterCriteria) -> Table {
    table
        .iter()
        .filter(|r| {
            r.country == criteria.country
                && (criteria.year_min..=criteria.year_max).contains(&r.year)
        })
        .cloned()
        .collect()
}

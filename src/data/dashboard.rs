use super::aggregate::{summarize, ChartDatasets, SummaryStats};
use super::error::Result;
use super::export::export_csv;
use super::filter::{distinct_countries, filter, year_bounds, CountryDomain, FilterCriteria};
use super::model::Table;

// ---------------------------------------------------------------------------
// Dashboard – loaded table + active criteria
// ---------------------------------------------------------------------------

/// The query interface consumed by the presentation layer.
///
/// Owns the immutable dataset and the active [`FilterCriteria`]. Setters
/// validate before applying, so the active criteria are always valid; a
/// rejected change leaves the previous criteria in place. Accessors recompute
/// from scratch on every call.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Table,
    countries: CountryDomain,
    year_bounds: (i32, i32),
    criteria: FilterCriteria,
}

impl Dashboard {
    /// Start with the default country over the full year range.
    pub fn new(table: Table) -> Result<Self> {
        let criteria = FilterCriteria::default_for(&table)?;
        Ok(Dashboard {
            countries: distinct_countries(&table),
            year_bounds: year_bounds(&table)?,
            table,
            criteria,
        })
    }

    /// Start with explicit criteria, validated against `table`.
    pub fn with_criteria(table: Table, criteria: FilterCriteria) -> Result<Self> {
        let mut dashboard = Dashboard::new(table)?;
        dashboard.set_criteria(criteria)?;
        Ok(dashboard)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn countries(&self) -> &CountryDomain {
        &self.countries
    }

    pub fn year_bounds(&self) -> (i32, i32) {
        self.year_bounds
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Result<()> {
        if let Err(e) = criteria.validate(&self.table) {
            log::warn!("Rejected filter criteria {criteria:?}: {e}");
            return Err(e);
        }
        log::debug!("Active criteria: {criteria:?}");
        self.criteria = criteria;
        Ok(())
    }

    pub fn set_country(&mut self, country: &str) -> Result<()> {
        self.set_criteria(self.criteria.with_country(country))
    }

    pub fn set_year_range(&mut self, year_min: i32, year_max: i32) -> Result<()> {
        let criteria = self
            .criteria
            .with_year_range(year_min, year_max)
            .inspect_err(|e| log::warn!("Rejected year range {year_min}-{year_max}: {e}"))?;
        self.set_criteria(criteria)
    }

    pub fn filtered_table(&self) -> Table {
        filter(&self.table, &self.criteria)
    }

    pub fn summary_stats(&self) -> SummaryStats {
        summarize(&self.filtered_table())
    }

    pub fn chart_datasets(&self) -> ChartDatasets {
        ChartDatasets::from_table(&self.filtered_table())
    }

    /// CSV bytes of the current filtered table.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        export_csv(&self.filtered_table())
    }
}

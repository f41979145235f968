use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use fabric_dashboard::data::Dashboard;

/// Sustainable fashion trends dashboard.
///
/// Without `--summary` or `--export` a window opens; otherwise the filters
/// are applied headless and the results written to stdout / the export path.
#[derive(Debug, Clone, Parser)]
#[command(name = "fabric-dashboard", version, about)]
pub struct Args {
    /// Dataset to open (.csv, .json or .parquet)
    #[arg(env = "FABRIC_DASHBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Country to filter on (defaults to USA, or the first country)
    #[arg(long)]
    pub country: Option<String>,

    /// First year of the range (defaults to the earliest year)
    #[arg(long)]
    pub year_min: Option<i32>,

    /// Last year of the range (defaults to the latest year)
    #[arg(long)]
    pub year_max: Option<i32>,

    /// Print summary statistics and chart datasets as JSON and exit
    #[arg(long)]
    pub summary: bool,

    /// Write the filtered records as CSV to this path and exit
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

impl Args {
    pub fn headless(&self) -> bool {
        self.summary || self.export.is_some()
    }

    /// Apply the filter flags on top of the dashboard's default criteria.
    pub fn apply_filters(&self, dashboard: &mut Dashboard) -> Result<()> {
        if let Some(country) = &self.country {
            dashboard
                .set_country(country)
                .with_context(|| format!("--country {country}"))?;
        }
        if self.year_min.is_some() || self.year_max.is_some() {
            let year_min = self.year_min.unwrap_or(dashboard.criteria().year_min());
            let year_max = self.year_max.unwrap_or(dashboard.criteria().year_max());
            dashboard
                .set_year_range(year_min, year_max)
                .with_context(|| format!("year range {year_min}-{year_max}"))?;
        }
        Ok(())
    }
}

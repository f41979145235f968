/// Data layer: core types, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (typed Records)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ dashboard  │  Table + active FilterCriteria
///   └───────────┘
///        │
///        ├──► filter     criteria → filtered Table
///        ├──► aggregate  filtered Table → SummaryStats, ChartDatasets
///        └──► export     filtered Table → CSV bytes
/// ```
pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

pub use aggregate::{
    group_by_rating, per_brand_impact, scatter_attributes, summarize, BrandImpact, ChartDatasets,
    ScatterPoint, SummaryStats,
};
pub use dashboard::Dashboard;
pub use error::{CriteriaError, DataError, Result};
pub use export::{export_csv, write_csv, DEFAULT_EXPORT_FILE_NAME};
pub use filter::{distinct_countries, filter, year_bounds, CountryDomain, FilterCriteria};
pub use loader::{load_csv_reader, load_file};
pub use model::{Column, Record, Table};

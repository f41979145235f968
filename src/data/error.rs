//! Error types for loading, querying and exporting the dataset.

use std::path::PathBuf;

use thiserror::Error;

use super::model::Column;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Cannot load dataset: {reason}")]
    Load { reason: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Row {row}, column {column}: cannot parse {value:?} as {expected}")]
    Parse {
        row: usize,
        column: Column,
        value: String,
        expected: &'static str,
    },

    #[error("Dataset has no records")]
    EmptyDataset,

    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(#[from] CriteriaError),

    #[error("Failed to write CSV export: {0}")]
    Export(#[source] std::io::Error),
}

impl DataError {
    pub(crate) fn load(reason: impl Into<String>) -> Self {
        DataError::Load {
            reason: reason.into(),
        }
    }
}

/// Why a [`FilterCriteria`](super::FilterCriteria) was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("country {0:?} does not occur in the dataset")]
    UnknownCountry(String),

    #[error("year range is inverted: {min} > {max}")]
    InvertedYearRange { min: i32, max: i32 },

    #[error("year range {min}-{max} lies outside the observed range {lower}-{upper}")]
    YearOutOfRange {
        min: i32,
        max: i32,
        lower: i32,
        upper: i32,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;

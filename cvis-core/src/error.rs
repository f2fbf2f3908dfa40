/// Error types for the CVIS pipeline
use cvis_utils::error::DateError;
use thiserror::Error;

/// Main error type for table ingestion and chart builds.
///
/// Only structural problems end up here. Sparse data (a group that never
/// crosses the threshold, a group without a usable trend) is absorbed by the
/// pipeline and never surfaces as an error.
#[derive(Error, Debug)]
pub enum CvisError {
    /// A required column is absent from an input table
    #[error("{table} table is missing required column {column:?}")]
    MissingColumn { table: &'static str, column: String },

    /// A date matched neither accepted format
    #[error("Failed to parse date: {0}")]
    DateParse(#[from] DateError),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A measure that is present but not a number
    #[error("{table} table row {row}: measure {value:?} is not a number")]
    InvalidMeasure {
        table: &'static str,
        row: usize,
        value: String,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Type alias for Results using CvisError
pub type Result<T> = std::result::Result<T, CvisError>;

//! Error types for the dataset crate.

use thiserror::Error;

/// Errors that can occur while loading or writing rating tables
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level failure opening or writing a table
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A record in a data file couldn't be deserialized
    #[error("Parse error at record {record} in {file}: {reason}")]
    Parse {
        file: String,
        record: u64,
        reason: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DatasetError>;

use core_types::CoreError;
use thiserror::Error;

/// Loader errors. Every variant names the source it came from.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("File I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Required column '{column}' not found in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Invalid {column} value '{value}' at line {line} in {path}")]
    InvalidValue {
        path: String,
        line: u64,
        column: String,
        value: String,
    },

    #[error("Invalid row at line {line} in {path}: {source}")]
    InvalidRow {
        path: String,
        line: u64,
        #[source]
        source: CoreError,
    },

    #[error("No usable price rows in {path}")]
    NoRows { path: String },
}

//! File adapters: the JSON data file and CSV import/export.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::BookError;

mod csv_file;
mod json;

pub use csv_file::{export_csv, import_csv, ImportStats, CSV_FIELDS};
pub use json::JsonStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("data file {} is inconsistent: {source}", .path.display())]
    Book {
        path: PathBuf,
        #[source]
        source: BookError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header must be {expected}, found {found}")]
    Header { expected: String, found: String },

    #[error("line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: BookError,
    },
}

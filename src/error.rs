//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or writing the persisted data file
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid data path: {0}")]
    Path(String),
}

/// Top-level error for registry, projection and storage operations
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Client {0} not found")]
    ClientNotFound(u64),

    #[error("Month {month} is outside the {months}-month projection window")]
    MonthOutOfRange { month: u32, months: u32 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, MetricsError>;

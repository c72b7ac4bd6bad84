//! Error types for the report store

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("No reports to export")]
    Empty,

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed report file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode reports: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Report store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// True for errors caused by the caller's input rather than the store itself
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::MissingField(_) | StoreError::Empty)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

//! Dataset model and parsing for the visualization binding platform

pub mod format;
pub mod parser;

use thiserror::Error;

// Re-exports
pub use format::DataFormat;
pub use parser::parse;

/// A single row record mapping field names to values
pub type Record = serde_json::Map<String, serde_json::Value>;

/// An ordered sequence of records, produced fresh by every parse
pub type Dataset = Vec<Record>;

/// Errors that can occur while turning document content into a dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected data shape: {0}")]
    Shape(String),

    #[error("Unknown format token: {0}")]
    UnknownFormat(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        DataError::Csv(error.to_string())
    }
}

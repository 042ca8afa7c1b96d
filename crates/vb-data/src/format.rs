//! Format tokens for the dataset parser

use std::fmt;
use serde::{Serialize, Deserialize};

/// Supported dataset formats - a closed token set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataFormat {
    /// Comma-separated values with a header row
    Csv,
    /// A JSON array of objects
    Json,
}

impl DataFormat {
    /// Get the token used to identify this format
    pub fn token(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Json => "json",
        }
    }

    /// Resolve a format from its token
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "csv" => Some(DataFormat::Csv),
            "json" => Some(DataFormat::Json),
            _ => None,
        }
    }

    /// Resolve a format from a file extension (leading dot tolerated)
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::from_token(ext.trim_start_matches('.'))
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        assert_eq!(DataFormat::from_token("csv"), Some(DataFormat::Csv));
        assert_eq!(DataFormat::from_token("JSON"), Some(DataFormat::Json));
        assert_eq!(DataFormat::Csv.token(), "csv");
        assert_eq!(DataFormat::Json.token(), "json");
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(DataFormat::from_token("parquet"), None);
        assert_eq!(DataFormat::from_token(""), None);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(DataFormat::from_extension(".csv"), Some(DataFormat::Csv));
        assert_eq!(DataFormat::from_extension("json"), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_extension(".txt"), None);
    }
}

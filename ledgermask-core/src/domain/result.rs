//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A collection shrank (or grew) across obfuscation where that is not allowed
    #[error("{collection} count mismatch: expected {expected}, got {actual}")]
    CountMismatch {
        collection: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this is an aggregate count check failure
    pub fn is_count_mismatch(&self) -> bool {
        matches!(self, Self::CountMismatch { .. })
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mismatch_message() {
        let err = Error::CountMismatch {
            collection: "owners",
            expected: 3,
            actual: 2,
        };
        assert!(err.is_count_mismatch());
        assert_eq!(err.to_string(), "owners count mismatch: expected 3, got 2");
    }

    #[test]
    fn test_constructors() {
        assert!(Error::config("missing").to_string().contains("Configuration error"));
        assert!(!Error::not_found("x").is_count_mismatch());
    }
}

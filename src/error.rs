// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for TrendMind
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

/// Main error type for TrendMind operations
#[derive(Error, Debug)]
pub enum TrendError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The static fallback dataset could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backend server errors
    #[error("Server error: {0}")]
    Server(String),
}

/// Failure of a single catalog tier.
///
/// Every kind is handled the same way by the catalog service: it is logged
/// and the next tier is tried.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport-level failure (DNS, connect, reset, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The source answered with a non-2xx status
    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Payload was not JSON or not of the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SourceError {
    /// Short label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Network(_) => "network",
            SourceError::HttpStatus { .. } => "http_status",
            SourceError::Parse(_) => "parse",
        }
    }
}

/// Result type alias for TrendMind operations
pub type Result<T> = std::result::Result<T, TrendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_error_config() {
        let err = TrendError::Config("bad config".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_trend_error_dataset() {
        let err = TrendError::Dataset("missing file".to_string());
        assert!(err.to_string().contains("Dataset error"));
        assert!(err.to_string().contains("missing file"));
    }

    #[test]
    fn test_trend_error_invalid_input() {
        let err = TrendError::InvalidInput("bad input".to_string());
        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_trend_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TrendError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_trend_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: TrendError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_source_error_http_status() {
        let err = SourceError::HttpStatus {
            status: 503,
            url: "https://example.test/models".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("example.test"));
        assert_eq!(err.kind(), "http_status");
    }

    #[test]
    fn test_source_error_kinds() {
        assert_eq!(SourceError::Network("reset".into()).kind(), "network");
        assert_eq!(SourceError::Parse("not json".into()).kind(), "parse");
    }

    #[test]
    fn test_result_error() {
        fn test_fn() -> Result<i32> {
            Err(TrendError::InvalidInput("test".to_string()))
        }

        assert!(test_fn().is_err());
    }
}

// src/error.rs

//! Unified error handling for the watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream answered with a non-success status
    #[error("Fetch of {url} failed with status {status}")]
    FetchStatus { url: String, status: u16 },

    /// A catalog row or feed entry could not be turned into a record
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// Notification delivery failed
    #[error("Notify error: {0}")]
    Notify(String),

    /// Initial snapshot could not be built
    #[error("Bootstrap failed after {attempts} attempt(s): {source}")]
    Bootstrap {
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },
}

/// Coarse classification used by the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport error or non-2xx answer from a source
    Fetch,
    /// Source answered but its content could not be interpreted
    Parse,
    /// Anything else
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Fetch => "fetch",
            ErrorKind::Parse => "parse",
            ErrorKind::Unexpected => "unexpected",
        };
        f.write_str(name)
    }
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }

    /// Classify the error for the poll loop.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Http(e) if e.is_decode() => ErrorKind::Parse,
            AppError::Http(_) | AppError::FetchStatus { .. } => ErrorKind::Fetch,
            AppError::Json(_) | AppError::Parse { .. } => ErrorKind::Parse,
            AppError::Bootstrap { source, .. } => source.kind(),
            _ => ErrorKind::Unexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_status_is_fetch_kind() {
        let err = AppError::FetchStatus {
            url: "https://example.com".into(),
            status: 503,
        };
        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[test]
    fn parse_errors_are_parse_kind() {
        assert_eq!(AppError::parse("row 3", "no price").kind(), ErrorKind::Parse);

        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert_eq!(AppError::from(json_err).kind(), ErrorKind::Parse);
    }

    #[test]
    fn bootstrap_reports_inner_kind() {
        let err = AppError::Bootstrap {
            attempts: 3,
            source: Box::new(AppError::FetchStatus {
                url: "https://example.com".into(),
                status: 500,
            }),
        };
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(err.to_string().contains("3 attempt(s)"));
    }

    #[test]
    fn config_errors_are_unexpected() {
        assert_eq!(AppError::config("bad").kind(), ErrorKind::Unexpected);
    }
}

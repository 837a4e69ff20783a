//! Error types for the bark-push client
//!
//! Send attempts never produce these errors: their result is a
//! [`SendOutcome`](crate::client::SendOutcome). `AppError` covers everything
//! around a send: building the transport, loading configuration and
//! validating command-line input.

use thiserror::Error;
use std::path::PathBuf;

/// Main application error type
///
/// Organized by functional domain so callers can branch on
/// [`category`](AppError::category) without matching every variant.
#[derive(Error, Debug)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidConfigValue {
        key: String,
        value: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Transport errors
    #[error("Transport initialization failed: {message}")]
    TransportInit {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("HTTP request failed: {method} {url}")]
    HttpRequest {
        method: String,
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Network timeout: {url}")]
    NetworkTimeout {
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // I/O errors
    #[error("File I/O error for '{path}': {operation}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Serialization errors
    #[error("JSON serialization error: {context}")]
    JsonSerialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("TOML parsing error: {context}")]
    TomlParsing {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // CLI errors
    #[error("Invalid command argument '{argument}': {reason}")]
    InvalidArgument {
        argument: String,
        reason: String,
    },

    #[error("Parse error for '{input}': {expected}")]
    Parse {
        input: String,
        expected: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new Config error with context
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_config_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            key: key.into(),
            value: value.into(),
            source: None,
        }
    }

    /// Create a new TransportInit error with source
    pub fn transport_init_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::TransportInit {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new I/O error with source
    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Render the error together with its whole source chain
    ///
    /// Transport failures bury the useful part (DNS, refused connection,
    /// certificate problem) several sources deep, so diagnostics use this
    /// instead of `to_string()`.
    pub fn describe(&self) -> String {
        let mut parts = vec![self.to_string()];
        let mut current = std::error::Error::source(self);
        while let Some(err) = current {
            let text = err.to_string();
            if !parts.contains(&text) {
                parts.push(text);
            }
            current = err.source();
        }
        parts.join(": ")
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::InvalidConfigValue { .. } => "config",
            Self::TransportInit { .. } => "transport",
            Self::HttpRequest { .. } | Self::NetworkTimeout { .. } => "network",
            Self::Io { .. } => "io",
            Self::JsonSerialization { .. } | Self::TomlParsing { .. } => "serialization",
            Self::InvalidArgument { .. } | Self::Parse { .. } => "cli",
            Self::Other { .. } => "internal",
        }
    }
}

// Implement conversions from common standard library and third-party error types
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let operation = match err.kind() {
            std::io::ErrorKind::NotFound => "file not found",
            std::io::ErrorKind::PermissionDenied => "permission denied",
            _ => "I/O operation",
        }.to_string();

        Self::Io {
            path: PathBuf::from("unknown"),
            operation,
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonSerialization {
            context: format!("line {} column {}", err.line(), err.column()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::TomlParsing {
            context: err.message().to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config_with_source("Failed to serialize configuration", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        if err.is_builder() {
            Self::transport_init_with_source("Failed to build HTTP client", err)
        } else if err.is_timeout() {
            Self::NetworkTimeout {
                url,
                source: Some(Box::new(err)),
            }
        } else {
            Self::HttpRequest {
                method: "POST".to_string(),
                url,
                source: Some(Box::new(err)),
            }
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        Self::Parse {
            input: "URL".to_string(),
            expected: "valid URL format".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AppError::config("test config error");
        assert_eq!(err.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(AppError::config("test").category(), "config");
        assert_eq!(AppError::invalid_argument("--param", "missing '='").category(), "cli");

        let url_err: AppError = url::Url::parse("not a url").unwrap_err().into();
        assert_eq!(url_err.category(), "cli");
    }

    #[test]
    fn test_describe_includes_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = AppError::HttpRequest {
            method: "POST".to_string(),
            url: "https://api.day.app/push".to_string(),
            source: Some(Box::new(io_err)),
        };

        let described = err.describe();
        assert!(described.starts_with("HTTP request failed: POST https://api.day.app/push"));
        assert!(described.ends_with("connection refused"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();

        match app_err {
            AppError::Io { operation, .. } => {
                assert_eq!(operation, "file not found");
            },
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("server = [").unwrap_err();
        let app_err: AppError = toml_err.into();
        assert_eq!(app_err.category(), "serialization");
    }
}

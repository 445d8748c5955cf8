//! Error types and handling infrastructure for userlook.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types. The binary layers `anyhow` on top for context at the edges.
//!
//! Failures from the remote directory are split by cause so the render loop can
//! present them as a typed failure state instead of swallowing them.

use thiserror::Error;

/// The main error type for userlook operations.
#[derive(Error, Debug)]
pub enum UserlookError {
    /// Connection, DNS, TLS or timeout failure talking to the directory
    #[error("Network request failed: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The directory answered with a non-2xx status
    #[error("Directory returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// Response body was not JSON or did not match the user schema
    #[error("Malformed response: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line or configuration value
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A worker channel was closed while the coordinator still needed it
    #[error("Channel closed: {what}")]
    ChannelClosed { what: &'static str },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for userlook operations.
pub type Result<T> = std::result::Result<T, UserlookError>;

impl UserlookError {
    /// Create a Network error without an underlying reqwest error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Parse error from a serde_json failure
    pub fn parse(source: serde_json::Error) -> Self {
        Self::Parse {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a ChannelClosed error naming the peer that went away
    pub fn channel_closed(what: &'static str) -> Self {
        Self::ChannelClosed { what }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// True for failures caused by the remote side rather than local state
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Parse { .. }
        )
    }
}

// Terminal IO errors surface through crossterm and ratatui as io::Error
impl From<std::io::Error> for UserlookError {
    fn from(err: std::io::Error) -> Self {
        Self::UIError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for UserlookError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
            };
        }

        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        Self::Network {
            message,
            source: Some(err),
        }
    }
}

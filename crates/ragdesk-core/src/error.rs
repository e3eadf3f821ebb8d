//! Error types for ragdesk.

use thiserror::Error;

/// Result type alias using ragdesk's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when the backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to server. Please check your connection.";

/// Message shown for any 5xx response. The real detail is only logged.
pub const SERVER_ERROR_MESSAGE: &str = "Server error occurred. Please try again later.";

/// Core error type for ragdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection, DNS, or timeout failure before a response was obtained.
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a 5xx status.
    ///
    /// `detail` carries the extracted body message for diagnostics and is
    /// deliberately absent from `Display`.
    #[error("{}", SERVER_ERROR_MESSAGE)]
    Server { status: u16, detail: String },

    /// Backend answered with a 4xx status; the message is shown verbatim.
    #[error("{message}")]
    Client { status: u16, message: String },

    /// Local, pre-request validation failed.
    #[error("{0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other HTTP transport failure (redirect loops, malformed URLs, ...)
    #[error("Request error: {0}")]
    Request(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the failure happened before any response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// HTTP status for errors that came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } | Error::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for an inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            Error::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Error::Server { .. } => SERVER_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Error::Network(e.to_string())
        } else if e.is_decode() {
            Error::Serialization(e.to_string())
        } else {
            Error::Request(e.to_string())
        }
    }
}

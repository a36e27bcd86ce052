//! Error types for tagdns
//!
//! Every component except the reconciliation loop lets these propagate
//! unmodified. The loop logs them by [`ErrorKind`] and keeps running.

use std::fmt;
use thiserror::Error;

/// Result type alias for tagdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tagdns
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, timeout, non-2xx status or an undecodable body
    #[error("{0}")]
    Network(String),

    /// No record in the zone carries the management tag
    #[error("{0}")]
    RecordNotFound(String),

    /// The provider accepted the request but reported application-level errors
    #[error("{0}")]
    RecordUpdateFailed(String),

    /// Configuration errors
    #[error("{0}")]
    Config(String),

    /// The eager address resolution at startup failed
    #[error("initial address resolution failed: {0}")]
    Initialization(#[source] Box<Error>),
}

/// Stable classification of an [`Error`], used in log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    RecordNotFound,
    RecordUpdateFailed,
    Config,
    Initialization,
}

impl ErrorKind {
    /// Name of the kind as it appears in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NetworkError",
            ErrorKind::RecordNotFound => "RecordNotFoundError",
            ErrorKind::RecordUpdateFailed => "RecordUpdateFailedError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::Initialization => "InitializationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a "record not found" error
    pub fn record_not_found(msg: impl Into<String>) -> Self {
        Self::RecordNotFound(msg.into())
    }

    /// Create a "record update failed" error
    pub fn record_update_failed(msg: impl Into<String>) -> Self {
        Self::RecordUpdateFailed(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an error raised while initializing the reconciler
    pub fn initialization(source: Error) -> Self {
        Self::Initialization(Box::new(source))
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::RecordNotFound(_) => ErrorKind::RecordNotFound,
            Error::RecordUpdateFailed(_) => ErrorKind::RecordUpdateFailed,
            Error::Config(_) => ErrorKind::Config,
            Error::Initialization(_) => ErrorKind::Initialization,
        }
    }
}

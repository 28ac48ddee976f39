//! Error types for the runner core
//!
//! Library operations return `RunnerError`. Executor failures are reported as
//! `ExecutionError` and are never surfaced directly: the execution flow turns
//! them into a failed outcome that renders into the output slot. Storage
//! failures (`StorageError`) are swallowed by the persistence adapter.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for RunnerError {
    fn from(err: std::io::Error) -> Self {
        RunnerError::IoError(err.to_string())
    }
}

impl From<StorageError> for RunnerError {
    fn from(err: StorageError) -> Self {
        RunnerError::StorageError(err.to_string())
    }
}

/// Failure modes of a single dispatch to the execution service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("request timed out")]
    Timeout,
    #[error("execution service unreachable: {0}")]
    Network(String),
    #[error("execution service returned {status}")]
    Service {
        status: u16,
        message: Option<String>,
    },
}

impl From<reqwest::Error> for ExecutionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ExecutionError::Timeout;
        }

        match err.status() {
            Some(status) => ExecutionError::Service {
                status: status.as_u16(),
                message: None,
            },
            None => ExecutionError::Network(err.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error in key-value store: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed key-value store contents: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Key-value store unavailable: {0}")]
    Unavailable(String),
}

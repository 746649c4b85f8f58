//! Error types for the analytics engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Language service error: {0}")]
    Service(String),

    #[error("Language service terminal error: {0}")]
    ServiceTerminal(String),

    #[error("Chat session busy: {0}")]
    SessionBusy(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the failure is worth a caller-initiated retry.
    ///
    /// Transport and transient service failures are retryable; validation,
    /// terminal service errors (quota, malformed payload), and busy sessions
    /// are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Service(_) | Error::Http(_) | Error::DataUnavailable(_) => true,
            Error::Validation(_)
            | Error::ServiceTerminal(_)
            | Error::SessionBusy(_)
            | Error::Json(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

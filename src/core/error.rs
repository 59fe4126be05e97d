use thiserror::Error;

use crate::toolkit::listings::StoreError;

pub const GENERIC_FAILURE_MESSAGE: &str = "Internal server error. Please try again later.";

#[derive(Error, Debug)]
pub enum JobScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl JobScoutError {
    /// Message safe to hand to an end user. Conflicts, lookups and validation
    /// failures are actionable and keep their detail; everything else collapses
    /// to one stable string.
    pub fn public_message(&self) -> String {
        match self {
            Self::Conflict(msg) | Self::NotFound(msg) | Self::Validation(msg) => msg.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<StoreError> for JobScoutError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::Validation(msg) => Self::Validation(msg),
            StoreError::Unavailable(msg) => Self::Storage(msg),
        }
    }
}

impl From<config::ConfigError> for JobScoutError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JobScoutError>;

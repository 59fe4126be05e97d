use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned HTTP {0}")]
    Status(u16),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// Transport failures, timeouts, throttling and 5xx are worth another
    /// attempt; a bad key or a malformed request is not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => !e.status().is_some_and(|s| s.is_client_error() && s.as_u16() != 429),
            Self::Status(code) => *code == 429 || *code >= 500,
            Self::InvalidResponse(_) => true,
            Self::NotConfigured(_) => false,
        }
    }
}

/// One record as the provider returns it. Field names follow the Google Jobs
/// result schema; everything is optional because nothing is guaranteed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawJob {
    pub job_id: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub via: Option<String>,
    pub share_link: Option<String>,
    #[serde(default)]
    pub apply_options: Vec<ApplyOption>,
    #[serde(default)]
    pub detected_extensions: DetectedExtensions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyOption {
    pub title: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectedExtensions {
    pub posted_at: Option<String>,
    pub salary: Option<String>,
}

#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RawJob>, ProviderError>;

    fn source_name(&self) -> &str;
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::Result;

pub const ENV_PREFIX: &str = "JOBSCOUT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobScoutConfig {
    pub serpapi_key: String,
    pub serpapi_url: String,
    pub search_location: String,
    pub search_language: String,
    pub search_country: String,
    pub fetch_timeout_secs: u64,
    pub fetch_attempts: u32,
    pub retry_delay_ms: u64,

    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub llm_temperature: f64,
    pub llm_throttle_ms: u64,

    pub recency_hours: i64,
    pub candidate_cap: usize,
    pub description_chars: usize,

    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    /// Directory for the on-disk cache; blank keeps the cache in memory.
    pub cache_dir: String,
}

impl Default for JobScoutConfig {
    fn default() -> Self {
        Self {
            serpapi_key: String::new(),
            serpapi_url: "https://serpapi.com/search".to_string(),
            search_location: "India".to_string(),
            search_language: "en".to_string(),
            search_country: "in".to_string(),
            fetch_timeout_secs: 15,
            fetch_attempts: 2,
            retry_delay_ms: 1000,

            gemini_api_key: String::new(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            llm_temperature: 0.3,
            llm_throttle_ms: 2000,

            recency_hours: crate::DEFAULT_RECENCY_HOURS,
            candidate_cap: crate::DEFAULT_CANDIDATE_CAP,
            description_chars: 200,

            cache_ttl_secs: crate::DEFAULT_CACHE_TTL_SECS,
            cache_capacity: 1024,
            cache_dir: ".jobscout/cache".to_string(),
        }
    }
}

impl JobScoutConfig {
    /// Defaults, overridden by `JOBSCOUT_*` variables. The bare `SERPAPI_KEY`
    /// and `GEMINI_API_KEY` names are honored when the prefixed ones are unset.
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        if cfg.serpapi_key.is_empty() {
            if let Ok(key) = std::env::var("SERPAPI_KEY") {
                cfg.serpapi_key = key;
            }
        }
        if cfg.gemini_api_key.is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                cfg.gemini_api_key = key;
            }
        }

        Ok(cfg)
    }

    pub fn serpapi_key(&self) -> Option<&str> {
        non_empty(&self.serpapi_key)
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        non_empty(&self.gemini_api_key)
    }

    pub fn llm_throttle(&self) -> Duration {
        Duration::from_millis(self.llm_throttle_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_dir(&self) -> Option<&str> {
        non_empty(&self.cache_dir)
    }

    pub fn search(&self) -> SearchConfig {
        SearchConfig {
            recency_hours: self.recency_hours,
            candidate_cap: self.candidate_cap,
            description_chars: self.description_chars,
            fetch_attempts: self.fetch_attempts.max(1),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Pipeline knobs shared by the fetcher, the recency filter and the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub recency_hours: i64,
    pub candidate_cap: usize,
    pub description_chars: usize,
    pub fetch_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        JobScoutConfig::default().search()
    }
}

impl SearchConfig {
    pub fn without_delays() -> Self {
        Self {
            retry_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

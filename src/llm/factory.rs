use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::providers::base::LlmProvider;
use super::providers::gemini::GeminiProvider;
use super::providers::throttled::ThrottledProvider;
use crate::core::config::JobScoutConfig;
use crate::core::error::{JobScoutError, Result};

const LLM_TIMEOUT_SECS: u64 = 60;

pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// `None` when no API key is configured; callers then run their
    /// AI-disabled paths. The returned provider is already throttled, so clone
    /// the `Arc` rather than building a second one.
    pub fn from_config(config: &JobScoutConfig) -> Result<Option<Arc<dyn LlmProvider>>> {
        let Some(api_key) = config.gemini_api_key() else {
            info!("No Gemini API key configured, AI features disabled");
            return Ok(None);
        };

        let gemini = GeminiProvider::new(
            api_key,
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            config.llm_temperature,
            Duration::from_secs(LLM_TIMEOUT_SECS),
        )
        .map_err(|e| JobScoutError::Config(format!("Failed to build Gemini client: {e}")))?;

        Ok(Some(Arc::new(ThrottledProvider::new(
            Arc::new(gemini),
            config.llm_throttle(),
        ))))
    }
}

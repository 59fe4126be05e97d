use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::base::{LlmMetadata, LlmProvider, LlmProviderError};

/// Process-wide throttle in front of a rate-limited LLM API. Every caller that
/// shares this wrapper (ranking, tips, query optimization, cover letters) draws
/// from the same permit stream.
pub struct ThrottledProvider {
    inner: Arc<dyn LlmProvider>,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ThrottledProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, period: Duration) -> Self {
        let limiter = Quota::with_period(period).map(|quota| Arc::new(RateLimiter::direct(quota)));
        info!(
            "ThrottledProvider initialized: provider={}, period_ms={}",
            inner.provider_name(),
            period.as_millis()
        );
        Self { inner, limiter }
    }

    async fn wait_for_permit(&self) -> Duration {
        let started = Instant::now();
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        started.elapsed()
    }
}

#[async_trait]
impl LlmProvider for ThrottledProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_format: Option<&str>,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        let waited = self.wait_for_permit().await;
        if !waited.is_zero() {
            debug!("LLM throttle waited {}ms", waited.as_millis());
        }

        let (content, mut metadata) = self
            .inner
            .generate(system_prompt, user_prompt, response_format)
            .await?;
        metadata.throttled_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX);
        Ok((content, metadata))
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

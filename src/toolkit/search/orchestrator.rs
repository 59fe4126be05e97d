use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::cache::CacheStore;
use super::fetcher::ListingFetcher;
use super::ranking::Ranker;
use super::recency::RecencyFilter;
use super::strategy::QueryStrategy;
use crate::core::cache::{CacheBackend, MemoryCacheBackend};
use crate::core::file_cache::FileCacheBackend;
use crate::core::config::JobScoutConfig;
use crate::core::error::{JobScoutError, Result};
use crate::llm::advisor::{QueryOptimizer, TipAdvisor};
use crate::llm::factory::LlmProviderFactory;
use crate::llm::providers::LlmProvider;
use crate::sources::{JobSource, SerpApiSource};
use crate::toolkit::listings::{JobListing, ListingStore, MemoryListingStore, SearchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub cache: bool,
    pub store: bool,
}

impl HealthReport {
    /// The cache fails open, so only the store decides overall health.
    pub fn status(&self) -> &'static str {
        if self.store { "up" } else { "degraded" }
    }
}

/// Cache-aside search pipeline: optimize, fetch, filter, persist, rank, tip.
pub struct SearchOrchestrator {
    cache: Arc<CacheStore>,
    optimizer: Arc<QueryOptimizer>,
    strategy: Arc<QueryStrategy>,
    ranker: Arc<Ranker>,
    tips: Arc<TipAdvisor>,
    store: Arc<dyn ListingStore>,
}

impl SearchOrchestrator {
    pub fn new(
        cache: Arc<CacheStore>,
        optimizer: Arc<QueryOptimizer>,
        strategy: Arc<QueryStrategy>,
        ranker: Arc<Ranker>,
        tips: Arc<TipAdvisor>,
        store: Arc<dyn ListingStore>,
    ) -> Self {
        info!("SearchOrchestrator initialized: ranking_enabled={}", ranker.is_enabled());
        Self {
            cache,
            optimizer,
            strategy,
            ranker,
            tips,
            store,
        }
    }

    /// Wire every component from already-built collaborators. One LLM handle
    /// is shared so all AI calls pass through the same throttle.
    pub fn assemble(
        source: Arc<dyn JobSource>,
        llm: Option<Arc<dyn LlmProvider>>,
        cache_backend: Arc<dyn CacheBackend>,
        store: Arc<dyn ListingStore>,
        config: &JobScoutConfig,
    ) -> Self {
        let search = config.search();
        let fetcher = Arc::new(ListingFetcher::new(source, &search));
        let strategy = QueryStrategy::new(fetcher, RecencyFilter::new(search.recency_hours));

        Self::new(
            Arc::new(CacheStore::new(cache_backend, config.cache_ttl())),
            Arc::new(QueryOptimizer::new(llm.clone())),
            Arc::new(strategy),
            Arc::new(Ranker::new(llm.clone(), &search)),
            Arc::new(TipAdvisor::new(llm)),
            store,
        )
    }

    /// Production wiring: SerpApi source, Gemini (if keyed), the on-disk cache
    /// when a cache dir is configured (in-memory otherwise), in-process store.
    pub fn from_config(config: &JobScoutConfig) -> Result<Self> {
        let source = SerpApiSource::from_config(config)
            .map_err(|e| JobScoutError::Config(format!("Failed to build job source: {e}")))?;
        let llm = LlmProviderFactory::from_config(config)?;

        Ok(Self::assemble(
            Arc::new(source),
            llm,
            cache_backend(config),
            Arc::new(MemoryListingStore::new()),
            config,
        ))
    }

    pub fn store(&self) -> Arc<dyn ListingStore> {
        Arc::clone(&self.store)
    }

    pub async fn search(&self, role: &str, experience: u32) -> Result<SearchOutcome> {
        let start = Instant::now();
        info!("Job search: role='{}', experience={}", role, experience);

        let (cached_jobs, cached_tips) = tokio::join!(
            self.cache.get_jobs(role, experience),
            self.cache.get_tips(role, experience)
        );

        if let Some(jobs) = cached_jobs {
            // Tips computed here are not written back; both entries are only
            // written together by a full pipeline run.
            let tips = match cached_tips {
                Some(tips) => tips,
                None => self.tips.tips(role, experience).await,
            };
            info!("Returning {} cached jobs for '{}'", jobs.len(), role);
            return Ok(SearchOutcome::new(jobs, tips, true));
        }

        let optimized = self.optimizer.optimize(role, experience).await;
        let listings = self.strategy.run(role, experience, &optimized).await;
        if listings.is_empty() {
            info!("No recent jobs found for '{}'", role);
            return Ok(SearchOutcome::empty());
        }

        let persisted = self.persist(&listings).await?;

        let (ranked, tips) = tokio::join!(
            self.ranker.rank(persisted, role, experience),
            self.tips.tips(role, experience)
        );

        self.cache.set_jobs(role, experience, &ranked).await;
        self.cache.set_tips(role, experience, &tips).await;

        info!(
            "Search for '{}' returned {} jobs in {}ms",
            role,
            ranked.len(),
            start.elapsed().as_millis()
        );
        Ok(SearchOutcome::new(ranked, tips, false))
    }

    pub async fn clear_cache(&self, role: &str, experience: u32) {
        self.cache.clear(role, experience).await;
    }

    pub async fn health(&self) -> HealthReport {
        let (cache, store) = tokio::join!(self.cache.is_healthy(), self.store.ping());
        if let Err(e) = &store {
            warn!("Listing store health check failed: {}", e);
        }
        HealthReport {
            cache,
            store: store.is_ok(),
        }
    }

    async fn persist(&self, listings: &[JobListing]) -> Result<Vec<JobListing>> {
        let rows = try_join_all(listings.iter().map(|listing| self.store.upsert_listing(listing))).await?;
        debug!("Persisted {} listings", rows.len());
        Ok(rows)
    }
}

pub fn cache_backend(config: &JobScoutConfig) -> Arc<dyn CacheBackend> {
    match config.cache_dir() {
        Some(dir) => Arc::new(FileCacheBackend::new(dir)),
        None => Arc::new(MemoryCacheBackend::new(config.cache_capacity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GENERIC_FAILURE_MESSAGE;
    use crate::sources::{DetectedExtensions, ProviderError, RawJob};
    use crate::toolkit::listings::{ApplicationStatus, StoreError, TrackedFilter, TrackedListings};
    use async_trait::async_trait;
    use uuid::Uuid;

    struct EmptySource;

    #[async_trait]
    impl JobSource for EmptySource {
        async fn search(&self, _query: &str) -> std::result::Result<Vec<RawJob>, ProviderError> {
            Ok(Vec::new())
        }

        fn source_name(&self) -> &str {
            "empty"
        }
    }

    struct RecentSource;

    #[async_trait]
    impl JobSource for RecentSource {
        async fn search(&self, query: &str) -> std::result::Result<Vec<RawJob>, ProviderError> {
            Ok(vec![RawJob {
                job_id: Some(format!("recent-{query}")),
                title: Some("Python Developer".to_string()),
                company_name: Some("Acme".to_string()),
                detected_extensions: DetectedExtensions {
                    posted_at: Some("2 hours ago".to_string()),
                    salary: None,
                },
                ..Default::default()
            }])
        }

        fn source_name(&self) -> &str {
            "recent"
        }
    }

    struct DownStore;

    #[async_trait]
    impl ListingStore for DownStore {
        async fn upsert_listing(&self, _listing: &JobListing) -> std::result::Result<JobListing, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn get_listing(&self, _id: Uuid) -> std::result::Result<JobListing, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn ping(&self) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn record_application(&self, _u: &str, _j: Uuid) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn update_application_status(
            &self,
            _u: &str,
            _j: Uuid,
            _s: &str,
        ) -> std::result::Result<ApplicationStatus, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn remove_application(&self, _u: &str, _j: Uuid) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn save_listing(&self, _u: &str, _j: Uuid) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn unsave_listing(&self, _u: &str, _j: Uuid) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn tracked_listings(
            &self,
            _u: &str,
            _f: TrackedFilter,
        ) -> std::result::Result<TrackedListings, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
    }

    fn config() -> JobScoutConfig {
        JobScoutConfig {
            retry_delay_ms: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_health_status() {
        assert_eq!(HealthReport { cache: false, store: true }.status(), "up");
        assert_eq!(HealthReport { cache: true, store: false }.status(), "degraded");
    }

    #[tokio::test]
    async fn test_no_listings_returns_empty_outcome_without_caching() {
        let backend = Arc::new(MemoryCacheBackend::new(8));
        let orchestrator = SearchOrchestrator::assemble(
            Arc::new(EmptySource),
            None,
            backend.clone(),
            Arc::new(MemoryListingStore::new()),
            &config(),
        );

        let outcome = orchestrator.search("Python", 3).await.unwrap();

        assert_eq!(outcome.total, 0);
        assert!(outcome.tips.is_empty());
        assert!(!outcome.from_cache);
        assert_eq!(backend.stats().size, 0);
    }

    #[tokio::test]
    async fn test_health_reports_store_outage() {
        let orchestrator = SearchOrchestrator::assemble(
            Arc::new(EmptySource),
            None,
            Arc::new(MemoryCacheBackend::new(8)),
            Arc::new(DownStore),
            &config(),
        );

        let report = orchestrator.health().await;
        assert!(report.cache);
        assert!(!report.store);
        assert_eq!(report.status(), "degraded");
    }

    #[tokio::test]
    async fn test_store_failure_aborts_search_without_caching() {
        let backend = Arc::new(MemoryCacheBackend::new(8));
        let orchestrator = SearchOrchestrator::assemble(
            Arc::new(RecentSource),
            None,
            backend.clone(),
            Arc::new(DownStore),
            &config(),
        );

        let err = orchestrator.search("Python", 3).await.unwrap_err();

        assert!(matches!(err, JobScoutError::Storage(_)));
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(backend.stats().size, 0);
    }
}

pub mod cache;
pub mod fetcher;
pub mod orchestrator;
pub mod ranking;
pub mod recency;
pub mod strategy;

pub use cache::{cache_key, CacheKind, CacheStore};
pub use fetcher::{fallback_id, merge_unique, normalize, ListingFetcher};
pub use orchestrator::{HealthReport, SearchOrchestrator};
pub use ranking::{parse_scores, Ranker, ScoreParse, ScoreResult};
pub use recency::{parse_posted_time, RecencyFilter};
pub use strategy::{fallback_templates, generic_query, QueryStrategy, StrategyMode};

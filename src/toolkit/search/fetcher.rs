use chrono::{DateTime, Utc};
use futures::future::join_all;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::recency::parse_posted_time;
use crate::core::config::SearchConfig;
use crate::sources::{JobSource, RawJob};
use crate::toolkit::listings::JobListing;

const UNKNOWN_SOURCE: &str = "Unknown";

/// Runs provider queries with per-query retry and merges the results, first
/// occurrence of an `external_id` winning.
pub struct ListingFetcher {
    source: Arc<dyn JobSource>,
    attempts: u32,
    retry_delay: Duration,
}

impl ListingFetcher {
    pub fn new(source: Arc<dyn JobSource>, config: &SearchConfig) -> Self {
        info!(
            "ListingFetcher initialized: source={}, attempts={}, retry_delay_ms={}",
            source.source_name(),
            config.fetch_attempts,
            config.retry_delay.as_millis()
        );
        Self {
            source,
            attempts: config.fetch_attempts.max(1),
            retry_delay: config.retry_delay,
        }
    }

    /// Fan out every query as its own task. A query that fails, exhausts its
    /// retries or panics contributes nothing; siblings are unaffected.
    pub async fn fetch_many(&self, queries: &[String]) -> Vec<JobListing> {
        let handles: Vec<_> = queries
            .iter()
            .map(|query| {
                let source = Arc::clone(&self.source);
                let query = query.clone();
                let attempts = self.attempts;
                let retry_delay = self.retry_delay;
                tokio::spawn(async move { fetch_with_retry(source, &query, attempts, retry_delay).await })
            })
            .collect();

        let results = join_all(handles).await;
        let now = Utc::now();

        let batches = results
            .into_iter()
            .zip(queries)
            .map(|(result, query)| match result {
                Ok(raw) => raw,
                Err(e) => {
                    error!("Fetch task for '{}' aborted: {}", query, e);
                    Vec::new()
                }
            })
            .map(|raw| raw.into_iter().map(|r| normalize(r, now)).collect::<Vec<_>>());

        let merged = merge_unique(batches);
        debug!("Fetched {} unique listings from {} queries", merged.len(), queries.len());
        merged
    }

    pub async fn fetch_one(&self, query: &str) -> Vec<JobListing> {
        self.fetch_many(&[query.to_string()]).await
    }
}

async fn fetch_with_retry(
    source: Arc<dyn JobSource>,
    query: &str,
    attempts: u32,
    retry_delay: Duration,
) -> Vec<RawJob> {
    for attempt in 1..=attempts {
        match source.search(query).await {
            Ok(raw) => {
                debug!("Query '{}' returned {} raw jobs (attempt {})", query, raw.len(), attempt);
                return raw;
            }
            Err(e) if e.is_transient() && attempt < attempts => {
                warn!("Query '{}' failed (attempt {}/{}), retrying: {}", query, attempt, attempts, e);
                tokio::time::sleep(retry_delay).await;
            }
            Err(e) => {
                error!("Query '{}' failed (attempt {}/{}), giving up: {}", query, attempt, attempts, e);
                return Vec::new();
            }
        }
    }
    Vec::new()
}

/// Concatenate batches in order, dropping any listing whose `external_id` was
/// already seen.
pub fn merge_unique<I>(batches: I) -> Vec<JobListing>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = JobListing>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();
    for listing in batches.into_iter().flatten() {
        if seen.insert(listing.canonical_id().to_string()) {
            merged.push(listing);
        }
    }
    merged
}

pub fn normalize(raw: RawJob, now: DateTime<Utc>) -> JobListing {
    let title = raw.title.unwrap_or_default();
    let company = raw.company_name.unwrap_or_default();

    let external_id = raw
        .job_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| fallback_id(&title, &company));

    let source = raw
        .via
        .as_deref()
        .map(|via| {
            let via = via.trim();
            via.strip_prefix("via ").unwrap_or(via).trim().to_string()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

    let apply_url = raw
        .apply_options
        .first()
        .and_then(|opt| opt.link.clone())
        .filter(|link| !link.is_empty())
        .or(raw.share_link)
        .unwrap_or_default();

    let posted_at = parse_posted_time(raw.detected_extensions.posted_at.as_deref().unwrap_or(""), now);

    JobListing {
        id: None,
        external_id,
        title,
        company,
        location: raw.location.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        source,
        apply_url,
        salary_range: raw.detected_extensions.salary.unwrap_or_default(),
        posted_at,
        ai_score: None,
        ai_reason: None,
    }
}

/// Stable identity for records the provider sent without a `job_id`.
pub fn fallback_id(title: &str, company: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.trim().as_bytes());
    hasher.update(b"\x1f");
    hasher.update(company.trim().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("fallback_{}", &digest[..16])
}

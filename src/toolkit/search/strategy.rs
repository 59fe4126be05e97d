use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::info;

use super::fetcher::ListingFetcher;
use super::recency::RecencyFilter;
use crate::toolkit::listings::JobListing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyMode {
    /// Optimized queries fanned out together.
    Parallel,
    /// Canned templates tried in order until one yields recent listings.
    Sequential,
}

pub fn fallback_templates(role: &str, experience: u32, year: i32) -> [String; 4] {
    [
        format!("{role} {experience} years experience jobs India"),
        format!("{role} jobs India"),
        format!("{role} hiring India {year}"),
        format!("{role} job opening Bangalore Mumbai Delhi"),
    ]
}

pub fn generic_query(role: &str) -> String {
    format!("{role} jobs India")
}

pub struct QueryStrategy {
    fetcher: Arc<ListingFetcher>,
    recency: RecencyFilter,
}

impl QueryStrategy {
    pub fn new(fetcher: Arc<ListingFetcher>, recency: RecencyFilter) -> Self {
        Self { fetcher, recency }
    }

    pub fn mode_for(optimized: &[String]) -> StrategyMode {
        if optimized.is_empty() {
            StrategyMode::Sequential
        } else {
            StrategyMode::Parallel
        }
    }

    /// Recent, deduplicated listings for the role.
    pub async fn run(&self, role: &str, experience: u32, optimized: &[String]) -> Vec<JobListing> {
        match Self::mode_for(optimized) {
            StrategyMode::Parallel => self.run_parallel(optimized).await,
            StrategyMode::Sequential => self.run_sequential(role, experience).await,
        }
    }

    async fn run_parallel(&self, queries: &[String]) -> Vec<JobListing> {
        info!("Running parallel searches for optimized queries: {:?}", queries);
        let listings = self.fetcher.fetch_many(queries).await;
        let recent = self.recency.apply(listings, Utc::now());
        info!("Parallel fetch returned {} unique recent jobs", recent.len());
        recent
    }

    async fn run_sequential(&self, role: &str, experience: u32) -> Vec<JobListing> {
        let year = Utc::now().year();
        for query in fallback_templates(role, experience, year) {
            info!("Trying fallback query: {}", query);
            let listings = self.fetcher.fetch_one(&query).await;
            let recent = self.recency.apply(listings, Utc::now());
            if !recent.is_empty() {
                info!("Query '{}' succeeded with {} jobs", query, recent.len());
                return recent;
            }
        }

        info!("All fallback queries came back empty, trying general query");
        let listings = self.fetcher.fetch_one(&generic_query(role)).await;
        self.recency.apply(listings, Utc::now())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{
    ApplicationStatus, JobListing, TrackedFilter, TrackedListing, TrackedListings, TrackerSummary,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable listing storage plus the per-user application tracker.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Insert or refresh by `external_id`; returns the canonical row with its
    /// stable internal id.
    async fn upsert_listing(&self, listing: &JobListing) -> Result<JobListing, StoreError>;

    async fn get_listing(&self, id: Uuid) -> Result<JobListing, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn record_application(&self, user_id: &str, job_id: Uuid) -> Result<(), StoreError>;

    async fn update_application_status(
        &self,
        user_id: &str,
        job_id: Uuid,
        status: &str,
    ) -> Result<ApplicationStatus, StoreError>;

    async fn remove_application(&self, user_id: &str, job_id: Uuid) -> Result<(), StoreError>;

    async fn save_listing(&self, user_id: &str, job_id: Uuid) -> Result<(), StoreError>;

    async fn unsave_listing(&self, user_id: &str, job_id: Uuid) -> Result<(), StoreError>;

    async fn tracked_listings(&self, user_id: &str, filter: TrackedFilter) -> Result<TrackedListings, StoreError>;
}

struct StoredListing {
    listing: JobListing,
    created_at: DateTime<Utc>,
    fetched_at: DateTime<Utc>,
}

struct Application {
    status: ApplicationStatus,
    applied_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

type UserJob = (String, Uuid);

#[derive(Default)]
struct StoreState {
    listings: HashMap<Uuid, StoredListing>,
    by_external_id: HashMap<String, Uuid>,
    applications: HashMap<UserJob, Application>,
    saved: HashMap<UserJob, DateTime<Utc>>,
}

#[derive(Default)]
pub struct MemoryListingStore {
    state: RwLock<StoreState>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        info!("MemoryListingStore initialized");
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First-insert and last-refresh times for a listing.
    pub fn timestamps(&self, id: Uuid) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.state.read().listings.get(&id).map(|s| (s.created_at, s.fetched_at))
    }
}

fn require_listing(state: &StoreState, job_id: Uuid) -> Result<(), StoreError> {
    if state.listings.contains_key(&job_id) {
        Ok(())
    } else {
        Err(StoreError::NotFound("Job not found".to_string()))
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn upsert_listing(&self, listing: &JobListing) -> Result<JobListing, StoreError> {
        let key = listing.canonical_id();
        if key.is_empty() {
            return Err(StoreError::Validation("Listing has no external id".to_string()));
        }

        let now = Utc::now();
        let mut state = self.state.write();

        if let Some(id) = state.by_external_id.get(key).copied() {
            if let Some(stored) = state.listings.get_mut(&id) {
                stored.listing.title = listing.title.clone();
                stored.listing.description = listing.description.clone();
                stored.listing.apply_url = listing.apply_url.clone();
                stored.listing.source = listing.source.clone();
                stored.fetched_at = now;
                debug!("Refreshed listing {} ({})", key, id);
                return Ok(stored.listing.clone());
            }
        }

        let id = Uuid::new_v4();
        let mut row = listing.clone();
        row.id = Some(id);
        row.ai_score = None;
        row.ai_reason = None;

        state.by_external_id.insert(key.to_string(), id);
        state.listings.insert(
            id,
            StoredListing {
                listing: row.clone(),
                created_at: now,
                fetched_at: now,
            },
        );
        debug!("Inserted listing {} ({})", key, id);
        Ok(row)
    }

    async fn get_listing(&self, id: Uuid) -> Result<JobListing, StoreError> {
        self.state
            .read()
            .listings
            .get(&id)
            .map(|s| s.listing.clone())
            .ok_or_else(|| StoreError::NotFound("Job not found".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn record_application(&self, user_id: &str, job_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write();
        require_listing(&state, job_id)?;

        let key = (user_id.to_string(), job_id);
        if state.applications.contains_key(&key) {
            return Err(StoreError::Conflict("Already applied to this job".to_string()));
        }

        let now = Utc::now();
        state.applications.insert(
            key,
            Application {
                status: ApplicationStatus::Applied,
                applied_at: now,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn update_application_status(
        &self,
        user_id: &str,
        job_id: Uuid,
        status: &str,
    ) -> Result<ApplicationStatus, StoreError> {
        let status = ApplicationStatus::from_str(status)
            .map_err(|_| StoreError::Validation("Invalid status".to_string()))?;

        let mut state = self.state.write();
        let application = state
            .applications
            .get_mut(&(user_id.to_string(), job_id))
            .ok_or_else(|| StoreError::NotFound("Job application not found".to_string()))?;

        application.status = status;
        application.updated_at = Utc::now();
        Ok(status)
    }

    async fn remove_application(&self, user_id: &str, job_id: Uuid) -> Result<(), StoreError> {
        self.state.write().applications.remove(&(user_id.to_string(), job_id));
        Ok(())
    }

    async fn save_listing(&self, user_id: &str, job_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write();
        require_listing(&state, job_id)?;
        state.saved.entry((user_id.to_string(), job_id)).or_insert_with(Utc::now);
        Ok(())
    }

    async fn unsave_listing(&self, user_id: &str, job_id: Uuid) -> Result<(), StoreError> {
        self.state.write().saved.remove(&(user_id.to_string(), job_id));
        Ok(())
    }

    async fn tracked_listings(&self, user_id: &str, filter: TrackedFilter) -> Result<TrackedListings, StoreError> {
        let state = self.state.read();

        let mut summary = TrackerSummary::default();
        let mut jobs = Vec::new();

        for (id, stored) in &state.listings {
            let key = (user_id.to_string(), *id);
            let application = state.applications.get(&key);
            let saved_at = state.saved.get(&key).copied();

            if let Some(app) = application {
                match app.status {
                    ApplicationStatus::Applied => summary.applied += 1,
                    ApplicationStatus::InProcess => summary.inprocess += 1,
                    ApplicationStatus::Rejected => summary.rejected += 1,
                    ApplicationStatus::Hired => summary.hired += 1,
                }
            } else if saved_at.is_some() {
                summary.saved += 1;
            }

            let include = match filter {
                TrackedFilter::All => application.is_some() || saved_at.is_some(),
                TrackedFilter::Saved => application.is_none() && saved_at.is_some(),
                TrackedFilter::Applied => application.is_some(),
                other => application.is_some_and(|app| Some(app.status) == other.as_status()),
            };
            if !include {
                continue;
            }

            jobs.push(TrackedListing {
                listing: stored.listing.clone(),
                status: application.map(|a| a.status),
                applied_at: application.map(|a| a.applied_at),
                updated_at: application.map(|a| a.updated_at),
                saved_at,
            });
        }

        jobs.sort_by_key(|job| Reverse(job.last_activity()));
        Ok(TrackedListings { jobs, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(external_id: &str, title: &str) -> JobListing {
        JobListing {
            id: None,
            external_id: external_id.to_string(),
            title: title.to_string(),
            company: "Acme".into(),
            location: "Hyderabad".into(),
            description: "v1".into(),
            source: "Naukri".into(),
            apply_url: "https://a.example".into(),
            salary_range: String::new(),
            posted_at: Utc::now(),
            ai_score: Some(90),
            ai_reason: Some("x".into()),
        }
    }

    #[tokio::test]
    async fn test_upsert_preserves_identity_and_updates_mutable_fields() {
        let store = MemoryListingStore::new();
        let first = store.upsert_listing(&listing("ext-1", "Engineer")).await.unwrap();
        let id = first.id.unwrap();
        assert!(first.ai_score.is_none());
        let (created, _) = store.timestamps(id).unwrap();

        let mut changed = listing("ext-1", "Senior Engineer");
        changed.company = "Other Co".into();
        changed.description = "v2".into();
        let second = store.upsert_listing(&changed).await.unwrap();

        assert_eq!(second.id, Some(id));
        assert_eq!(second.title, "Senior Engineer");
        assert_eq!(second.description, "v2");
        assert_eq!(second.company, "Acme");
        assert_eq!(store.len(), 1);
        let (created_again, fetched) = store.timestamps(id).unwrap();
        assert_eq!(created_again, created);
        assert!(fetched >= created);
    }

    #[tokio::test]
    async fn test_duplicate_application_is_conflict() {
        let store = MemoryListingStore::new();
        let id = store.upsert_listing(&listing("e", "T")).await.unwrap().id.unwrap();

        store.record_application("u1", id).await.unwrap();
        let err = store.record_application("u1", id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(err.to_string(), "Already applied to this job");

        store.record_application("u2", id).await.unwrap();
        assert!(matches!(
            store.record_application("u1", Uuid::new_v4()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_status_updates() {
        let store = MemoryListingStore::new();
        let id = store.upsert_listing(&listing("e", "T")).await.unwrap().id.unwrap();

        assert!(matches!(
            store.update_application_status("u1", id, "hired").await,
            Err(StoreError::NotFound(_))
        ));
        store.record_application("u1", id).await.unwrap();
        assert!(matches!(
            store.update_application_status("u1", id, "ghosted").await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(
            store.update_application_status("u1", id, "inprocess").await.unwrap(),
            ApplicationStatus::InProcess
        );
    }

    #[tokio::test]
    async fn test_tracked_listings_filters_and_summary() {
        let store = MemoryListingStore::new();
        let a = store.upsert_listing(&listing("a", "A")).await.unwrap().id.unwrap();
        let b = store.upsert_listing(&listing("b", "B")).await.unwrap().id.unwrap();
        let c = store.upsert_listing(&listing("c", "C")).await.unwrap().id.unwrap();
        store.upsert_listing(&listing("d", "D")).await.unwrap();

        store.save_listing("u", a).await.unwrap();
        store.save_listing("u", a).await.unwrap();
        store.save_listing("u", b).await.unwrap();
        store.record_application("u", b).await.unwrap();
        store.record_application("u", c).await.unwrap();
        store.update_application_status("u", c, "rejected").await.unwrap();

        let all = store.tracked_listings("u", TrackedFilter::All).await.unwrap();
        assert_eq!(all.jobs.len(), 3);
        assert_eq!(
            all.summary,
            TrackerSummary { applied: 1, inprocess: 0, rejected: 1, hired: 0, saved: 1 }
        );

        let saved = store.tracked_listings("u", TrackedFilter::Saved).await.unwrap();
        assert_eq!(saved.jobs.len(), 1);
        assert_eq!(saved.jobs[0].listing.external_id, "a");

        let applied = store.tracked_listings("u", TrackedFilter::Applied).await.unwrap();
        assert_eq!(applied.jobs.len(), 2);

        let rejected = store.tracked_listings("u", TrackedFilter::Rejected).await.unwrap();
        assert_eq!(rejected.jobs.len(), 1);
        assert_eq!(rejected.jobs[0].listing.external_id, "c");

        store.remove_application("u", c).await.unwrap();
        store.unsave_listing("u", a).await.unwrap();
        let after = store.tracked_listings("u", TrackedFilter::All).await.unwrap();
        assert_eq!(after.jobs.len(), 1);

        let other_user = store.tracked_listings("nobody", TrackedFilter::All).await.unwrap();
        assert!(other_user.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_rejects_missing_identity() {
        let store = MemoryListingStore::new();
        assert!(matches!(
            store.upsert_listing(&listing("", "T")).await,
            Err(StoreError::Validation(_))
        ));
        assert!(store.is_empty());
    }
}

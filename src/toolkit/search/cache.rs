use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use strum::IntoStaticStr;
use tracing::{debug, warn};

use crate::core::cache::{CacheBackend, CacheError};
use crate::toolkit::listings::{JobListing, SearchTip};
use crate::utils::normalize_role;

pub const DEFAULT_TTL: Duration = Duration::from_secs(crate::DEFAULT_CACHE_TTL_SECS);

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum CacheKind {
    Jobs,
    Tips,
}

/// `"{kind}:{normalized role}:{experience}"`
pub fn cache_key(kind: CacheKind, role: &str, experience: u32) -> String {
    let kind: &'static str = kind.into();
    format!("{}:{}:{}", kind, normalize_role(role), experience)
}

/// Typed cache-aside facade over a [`CacheBackend`]. Every operation fails
/// open: backend and serialization errors are logged and read as a miss or
/// dropped as a no-op.
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    pub async fn get_jobs(&self, role: &str, experience: u32) -> Option<Vec<JobListing>> {
        self.read(CacheKind::Jobs, role, experience).await
    }

    pub async fn set_jobs(&self, role: &str, experience: u32, listings: &[JobListing]) {
        self.write(CacheKind::Jobs, role, experience, listings).await
    }

    pub async fn get_tips(&self, role: &str, experience: u32) -> Option<Vec<SearchTip>> {
        self.read(CacheKind::Tips, role, experience).await
    }

    pub async fn set_tips(&self, role: &str, experience: u32, tips: &[SearchTip]) {
        self.write(CacheKind::Tips, role, experience, tips).await
    }

    pub async fn clear(&self, role: &str, experience: u32) {
        let keys = [
            cache_key(CacheKind::Jobs, role, experience),
            cache_key(CacheKind::Tips, role, experience),
        ];
        match self.backend.delete(&keys).await {
            Ok(removed) => debug!("Cleared {} cache entries for {:?}", removed, keys),
            Err(e) => warn!("Cache clear failed for {:?}: {}", keys, e),
        }
    }

    pub async fn is_healthy(&self) -> bool {
        match self.backend.ping().await {
            Ok(()) => true,
            Err(e) => {
                debug!("Cache health check failed: {}", e);
                false
            }
        }
    }

    async fn read<T: DeserializeOwned>(&self, kind: CacheKind, role: &str, experience: u32) -> Option<T> {
        let key = cache_key(kind, role, experience);
        let raw = match self.backend.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss: {}", key);
                return None;
            }
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                debug!("Cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                warn!("Cache entry {} is unreadable: {}", key, CacheError::from(e));
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, kind: CacheKind, role: &str, experience: u32, value: &T) {
        let key = cache_key(kind, role, experience);
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cache write skipped for {}: {}", key, CacheError::from(e));
                return;
            }
        };

        if let Err(e) = self.backend.set_ex(&key, raw, self.ttl).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }
}

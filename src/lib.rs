pub mod core;
pub mod llm;
pub mod sources;
pub mod toolkit;
pub mod utils;

pub use utils::{normalize_role, preview, safe_truncate};

pub use crate::core::config::{JobScoutConfig, SearchConfig};
pub use crate::core::error::{JobScoutError, Result};
pub use llm::{CoverLetterWriter, LlmProvider, LlmProviderFactory};
pub use sources::{JobSource, SerpApiSource};
pub use toolkit::listings::{
    ApplicationStatus, JobListing, ListingStore, MemoryListingStore, SearchOutcome, SearchTip, TrackedFilter,
};
pub use toolkit::search::{HealthReport, SearchOrchestrator};

pub const DEFAULT_RECENCY_HOURS: i64 = 24;

pub const DEFAULT_CANDIDATE_CAP: usize = 30;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 21_600;

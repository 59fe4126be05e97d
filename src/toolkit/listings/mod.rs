pub mod models;
pub mod store;

pub use models::{
    default_tips, ApplicationStatus, JobListing, SearchOutcome, SearchTip, TrackedFilter, TrackedListing,
    TrackedListings, TrackerSummary,
};
pub use store::{ListingStore, MemoryListingStore, StoreError};

pub mod listings;
pub mod search;

pub use listings::{JobListing, ListingStore, MemoryListingStore, SearchOutcome, SearchTip};
pub use search::{HealthReport, SearchOrchestrator};

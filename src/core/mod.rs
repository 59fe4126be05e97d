pub mod cache;
pub mod config;
pub mod error;
pub mod file_cache;

pub use cache::{CacheBackend, CacheError, CacheStats, MemoryCacheBackend};
pub use config::{JobScoutConfig, SearchConfig};
pub use error::{JobScoutError, Result};
pub use file_cache::FileCacheBackend;

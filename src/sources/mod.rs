pub mod base;
pub mod serpapi;

pub use base::{ApplyOption, DetectedExtensions, JobSource, ProviderError, RawJob};
pub use serpapi::SerpApiSource;

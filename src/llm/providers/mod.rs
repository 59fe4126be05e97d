pub mod base;
pub mod gemini;
pub mod throttled;

pub use base::{LlmMetadata, LlmProvider, LlmProviderError};
pub use gemini::GeminiProvider;
pub use throttled::ThrottledProvider;

pub mod advisor;
pub mod factory;
pub mod json;
pub mod prompt;
pub mod providers;

pub use advisor::{CoverLetterWriter, QueryOptimizer, TipAdvisor};
pub use factory::LlmProviderFactory;
pub use json::{extract_json, extract_json_array};
pub use providers::{GeminiProvider, LlmMetadata, LlmProvider, LlmProviderError, ThrottledProvider};

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::json::extract_json_array;
use super::prompt::{
    build_cover_letter_prompt, build_query_prompt, build_tips_prompt, SYSTEM_PROMPT,
};
use super::providers::base::LlmProvider;
use crate::toolkit::listings::{default_tips, JobListing, SearchTip};
use crate::utils::safe_truncate;

const QUERY_VARIATIONS: usize = 5;
const MAX_TIPS: usize = 3;
const COVER_LETTER_DESCRIPTION_CHARS: usize = 500;

pub const COVER_LETTER_DISABLED: &str = "Cover letter generation requires AI API key.";
pub const COVER_LETTER_FAILED: &str = "Error generating cover letter. Please try again.";

/// Produces alternate provider queries for a role. Never fails: an empty
/// result tells the search strategy to use its canned templates.
pub struct QueryOptimizer {
    llm: Option<Arc<dyn LlmProvider>>,
}

impl QueryOptimizer {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm }
    }

    pub async fn optimize(&self, role: &str, experience: u32) -> Vec<String> {
        let Some(llm) = &self.llm else {
            debug!("Query optimization disabled, using canned templates");
            return Vec::new();
        };

        let prompt = build_query_prompt(role, experience, QUERY_VARIATIONS);
        let response = match llm.generate(SYSTEM_PROMPT, &prompt, Some("json_object")).await {
            Ok((text, _)) => text,
            Err(e) => {
                warn!("Query optimization failed: {}", e);
                return Vec::new();
            }
        };

        let Some(items) = extract_json_array(&response) else {
            return Vec::new();
        };

        let mut queries: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            if let Value::String(q) = item {
                let q = q.trim();
                if !q.is_empty() && !queries.iter().any(|seen| seen == q) {
                    queries.push(q.to_string());
                }
            }
        }
        queries.truncate(QUERY_VARIATIONS);

        info!("Optimized queries for '{}': {:?}", role, queries);
        queries
    }
}

pub struct TipAdvisor {
    llm: Option<Arc<dyn LlmProvider>>,
}

impl TipAdvisor {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm }
    }

    /// Up to three tips; the fixed defaults on any failure.
    pub async fn tips(&self, role: &str, experience: u32) -> Vec<SearchTip> {
        let Some(llm) = &self.llm else {
            return default_tips();
        };

        let prompt = build_tips_prompt(role, experience);
        match llm.generate(SYSTEM_PROMPT, &prompt, Some("json_object")).await {
            Ok((text, _)) => {
                let tips: Vec<SearchTip> = extract_json_array(&text)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|item| serde_json::from_value::<SearchTip>(item).ok())
                    .filter(|tip| !tip.tip.trim().is_empty())
                    .take(MAX_TIPS)
                    .collect();

                if tips.is_empty() {
                    warn!("Tip generation returned no usable tips, using defaults");
                    default_tips()
                } else {
                    tips
                }
            }
            Err(e) => {
                warn!("Tip generation failed: {}", e);
                default_tips()
            }
        }
    }
}

pub struct CoverLetterWriter {
    llm: Option<Arc<dyn LlmProvider>>,
}

impl CoverLetterWriter {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm }
    }

    pub async fn write(&self, listing: &JobListing, applicant_name: &str) -> String {
        let Some(llm) = &self.llm else {
            return COVER_LETTER_DISABLED.to_string();
        };

        let prompt = build_cover_letter_prompt(
            applicant_name,
            &listing.title,
            &listing.company,
            &safe_truncate(&listing.description, COVER_LETTER_DESCRIPTION_CHARS),
        );

        match llm.generate(SYSTEM_PROMPT, &prompt, None).await {
            Ok((text, _)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => COVER_LETTER_FAILED.to_string(),
            Err(e) => {
                warn!("Cover letter generation failed for {}: {}", listing.external_id, e);
                COVER_LETTER_FAILED.to_string()
            }
        }
    }
}

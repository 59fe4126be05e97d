use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::SearchConfig;
use crate::llm::json::extract_json_array;
use crate::llm::prompt::{build_ranking_prompt, SYSTEM_PROMPT};
use crate::llm::providers::base::LlmProvider;
use crate::toolkit::listings::JobListing;
use crate::utils::{preview, safe_truncate};

pub const DEFAULT_SCORE: u8 = 50;
pub const DISABLED_REASON: &str = "AI ranking disabled";
pub const FAILED_REASON: &str = "Ranking failed";
pub const UNSCORED_REASON: &str = "Standard match";
const MISSING_REASON: &str = "Good match";

#[derive(Debug, Serialize)]
struct CompactListing<'a> {
    id: &'a str,
    title: &'a str,
    company: &'a str,
    desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub id: String,
    pub score: u8,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreParse {
    Success(Vec<ScoreResult>),
    ParseFailure,
}

/// Interpret scorer output. Anything but a JSON array is a failure; entries
/// inside the array that lack a usable `id` are skipped.
pub fn parse_scores(text: &str) -> ScoreParse {
    match extract_json_array(text) {
        Some(items) => ScoreParse::Success(items.iter().filter_map(score_from_value).collect()),
        None => ScoreParse::ParseFailure,
    }
}

fn score_from_value(value: &Value) -> Option<ScoreResult> {
    let obj = value.as_object()?;
    let id = match obj.get("id")? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if id.is_empty() {
        return None;
    }

    let score = obj.get("score").and_then(score_number).unwrap_or(DEFAULT_SCORE);
    let reason = obj
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or(MISSING_REASON)
        .to_string();

    Some(ScoreResult { id, score, reason })
}

fn score_number(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

fn listing_key(listing: &JobListing) -> String {
    match listing.canonical_id() {
        "" => listing.internal_id().unwrap_or_default(),
        id => id.to_string(),
    }
}

pub struct Ranker {
    llm: Option<Arc<dyn LlmProvider>>,
    candidate_cap: usize,
    description_chars: usize,
}

impl Ranker {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, config: &SearchConfig) -> Self {
        info!(
            "Ranker initialized: enabled={}, candidate_cap={}",
            llm.is_some(),
            config.candidate_cap
        );
        Self {
            llm,
            candidate_cap: config.candidate_cap,
            description_chars: config.description_chars,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.llm.is_some()
    }

    /// Annotate every listing with a score and reason, then stable-sort by
    /// score descending. Only the first `candidate_cap` listings are sent to
    /// the scorer; the rest get the unscored default.
    pub async fn rank(&self, mut listings: Vec<JobListing>, role: &str, experience: u32) -> Vec<JobListing> {
        if listings.is_empty() {
            return listings;
        }

        let Some(llm) = &self.llm else {
            for listing in &mut listings {
                listing.set_score(DEFAULT_SCORE, DISABLED_REASON);
            }
            return listings;
        };

        match self.score(llm.as_ref(), &listings, role, experience).await {
            ScoreParse::Success(results) => {
                let scores: HashMap<String, ScoreResult> =
                    results.into_iter().map(|r| (r.id.clone(), r)).collect();
                debug!("Scorer returned {} scores for {} listings", scores.len(), listings.len());

                for listing in &mut listings {
                    let hit = scores
                        .get(listing.canonical_id())
                        .or_else(|| listing.internal_id().and_then(|id| scores.get(&id)));
                    match hit {
                        Some(result) => listing.set_score(result.score, result.reason.clone()),
                        None => listing.set_score(DEFAULT_SCORE, UNSCORED_REASON),
                    }
                }
            }
            ScoreParse::ParseFailure => {
                for listing in &mut listings {
                    listing.set_score(DEFAULT_SCORE, FAILED_REASON);
                }
            }
        }

        listings.sort_by(|a, b| b.score().cmp(&a.score()));
        listings
    }

    async fn score(
        &self,
        llm: &dyn LlmProvider,
        listings: &[JobListing],
        role: &str,
        experience: u32,
    ) -> ScoreParse {
        let keys: Vec<String> = listings.iter().take(self.candidate_cap).map(listing_key).collect();
        let compact: Vec<CompactListing<'_>> = listings
            .iter()
            .zip(&keys)
            .map(|(listing, key)| CompactListing {
                id: key,
                title: &listing.title,
                company: &listing.company,
                desc: safe_truncate(&listing.description, self.description_chars),
            })
            .collect();

        let listings_json = match serde_json::to_string(&compact) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize ranking candidates: {}", e);
                return ScoreParse::ParseFailure;
            }
        };

        let prompt = build_ranking_prompt(role, experience, &listings_json);
        match llm.generate(SYSTEM_PROMPT, &prompt, Some("json_object")).await {
            Ok((text, metadata)) => {
                let parsed = parse_scores(&text);
                if parsed == ScoreParse::ParseFailure {
                    warn!("Scorer output was not a JSON array: {}", preview(&text, 200));
                } else {
                    debug!("Scored via {} (throttled {}ms)", metadata.model, metadata.throttled_ms);
                }
                parsed
            }
            Err(e) => {
                warn!("Scorer call failed: {}", e);
                ScoreParse::ParseFailure
            }
        }
    }
}

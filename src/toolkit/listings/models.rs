use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};
use uuid::Uuid;

/// A normalized job listing. `external_id` is the canonical identity used for
/// dedup, scoring, persistence and caching; `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub external_id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub apply_url: String,
    #[serde(default)]
    pub salary_range: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_reason: Option<String>,
}

impl JobListing {
    pub fn canonical_id(&self) -> &str {
        &self.external_id
    }

    pub fn internal_id(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    pub fn set_score(&mut self, score: u8, reason: impl Into<String>) {
        self.ai_score = Some(score.min(100));
        self.ai_reason = Some(reason.into());
    }

    pub fn score(&self) -> u8 {
        self.ai_score.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTip {
    pub tip: String,
    #[serde(default)]
    pub icon: String,
}

impl SearchTip {
    pub fn new(tip: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            tip: tip.into(),
            icon: icon.into(),
        }
    }
}

pub fn default_tips() -> Vec<SearchTip> {
    vec![
        SearchTip::new("Tailor your resume.", "📝"),
        SearchTip::new("Network on LinkedIn.", "🤝"),
        SearchTip::new("Prepare for interviews.", "🎯"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub jobs: Vec<JobListing>,
    pub tips: Vec<SearchTip>,
    pub from_cache: bool,
    pub total: usize,
}

impl SearchOutcome {
    pub fn new(jobs: Vec<JobListing>, tips: Vec<SearchTip>, from_cache: bool) -> Self {
        let total = jobs.len();
        Self {
            jobs,
            tips,
            from_cache,
            total,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    InProcess,
    Rejected,
    Hired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrackedFilter {
    #[default]
    All,
    Saved,
    Applied,
    InProcess,
    Rejected,
    Hired,
}

impl TrackedFilter {
    pub fn as_status(self) -> Option<ApplicationStatus> {
        match self {
            Self::InProcess => Some(ApplicationStatus::InProcess),
            Self::Rejected => Some(ApplicationStatus::Rejected),
            Self::Hired => Some(ApplicationStatus::Hired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedListing {
    pub listing: JobListing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl TrackedListing {
    /// Most recent of the application update and the save time.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.saved_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSummary {
    pub applied: usize,
    pub inprocess: usize,
    pub rejected: usize,
    pub hired: usize,
    pub saved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedListings {
    pub jobs: Vec<TrackedListing>,
    pub summary: TrackerSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_parsing() {
        assert_eq!(ApplicationStatus::from_str("inprocess").unwrap(), ApplicationStatus::InProcess);
        assert_eq!(ApplicationStatus::from_str("hired").unwrap(), ApplicationStatus::Hired);
        assert!(ApplicationStatus::from_str("ghosted").is_err());
        let name: &'static str = ApplicationStatus::Rejected.into();
        assert_eq!(name, "rejected");
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!(TrackedFilter::from_str("saved").unwrap(), TrackedFilter::Saved);
        assert_eq!(TrackedFilter::InProcess.as_status(), Some(ApplicationStatus::InProcess));
        assert_eq!(TrackedFilter::Applied.as_status(), None);
    }

    #[test]
    fn test_listing_serialization_skips_unscored_fields() {
        let listing = JobListing {
            id: None,
            external_id: "ext-1".into(),
            title: "Rust Engineer".into(),
            company: "Acme".into(),
            location: "Pune".into(),
            description: String::new(),
            source: "LinkedIn".into(),
            apply_url: String::new(),
            salary_range: String::new(),
            posted_at: Utc::now(),
            ai_score: None,
            ai_reason: None,
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert!(json.get("ai_score").is_none());
        assert!(json.get("id").is_none());

        let back: JobListing = serde_json::from_value(json).unwrap();
        assert_eq!(back, listing);
    }

    #[test]
    fn test_empty_outcome_has_no_tips() {
        let outcome = SearchOutcome::empty();
        assert_eq!(outcome.total, 0);
        assert!(outcome.tips.is_empty());
        assert!(!outcome.from_cache);
        assert_eq!(default_tips().len(), 3);
    }
}

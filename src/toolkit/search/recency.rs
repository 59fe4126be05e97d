use chrono::{DateTime, Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::toolkit::listings::JobListing;

lazy_static! {
    static ref FIRST_INTEGER: Regex = Regex::new(r"\d+").expect("static regex");
}

/// Turn "posted X ago" phrases into an absolute time. The first integer is the
/// amount; the unit is the first of minute, hour, day, week found in the text.
/// Anything unparsable is treated as posted just now.
pub fn parse_posted_time(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let lowered = text.to_lowercase();

    let Some(amount) = FIRST_INTEGER
        .find(&lowered)
        .and_then(|m| m.as_str().parse::<i64>().ok())
    else {
        return now;
    };

    let age = if lowered.contains("minute") {
        Duration::try_minutes(amount)
    } else if lowered.contains("hour") {
        Duration::try_hours(amount)
    } else if lowered.contains("day") {
        Duration::try_days(amount)
    } else if lowered.contains("week") {
        Duration::try_weeks(amount)
    } else {
        None
    };

    age.and_then(|age| now.checked_sub_signed(age)).unwrap_or(now)
}

#[derive(Debug, Clone, Copy)]
pub struct RecencyFilter {
    window: Duration,
}

impl RecencyFilter {
    pub fn new(window_hours: i64) -> Self {
        Self {
            window: Duration::try_hours(window_hours).unwrap_or(Duration::MAX),
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Keep listings posted at or after `now - window`.
    pub fn apply(&self, listings: Vec<JobListing>, now: DateTime<Utc>) -> Vec<JobListing> {
        let cutoff = self.cutoff(now);
        listings.into_iter().filter(|l| l.posted_at >= cutoff).collect()
    }
}

impl Default for RecencyFilter {
    fn default() -> Self {
        Self::new(crate::DEFAULT_RECENCY_HOURS)
    }
}

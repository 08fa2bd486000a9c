//! The active ghost-text suggestion

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Opaque identifier of a displayed suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuggestionId(Uuid);

impl SuggestionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SuggestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a suggestion's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    /// Fetched from the provider
    Provider,
    /// Served from the cache without a fetch
    Cache,
    /// Left over after the user typed through the start of a suggestion
    Remainder,
}

/// A suggestion materialized in the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub id: SuggestionId,
    /// Suggestion text as received; never empty
    pub text: String,
    /// Preceding text the suggestion was fetched (or synthesized) for
    pub leading_text: String,
    pub shown_at: DateTime<Utc>,
    /// Fetch latency; 0 unless the source is the provider
    pub latency_ms: u64,
    pub source: SuggestionSource,
}

impl Suggestion {
    /// Suggestion fetched from the provider in `latency_ms`
    pub fn fetched(text: String, leading_text: String, latency_ms: u64) -> Self {
        Self::new(text, leading_text, latency_ms, SuggestionSource::Provider)
    }

    /// Suggestion served from the cache
    pub fn cached(text: String, leading_text: String) -> Self {
        Self::new(text, leading_text, 0, SuggestionSource::Cache)
    }

    /// Remainder of a partially accepted suggestion
    pub fn remainder(text: String, leading_text: String) -> Self {
        Self::new(text, leading_text, 0, SuggestionSource::Remainder)
    }

    fn new(text: String, leading_text: String, latency_ms: u64, source: SuggestionSource) -> Self {
        Self {
            id: SuggestionId::new(),
            text,
            leading_text,
            shown_at: Utc::now(),
            latency_ms,
            source,
        }
    }

    /// Text left after the first character is typed through
    pub fn remainder_after_first(&self) -> &str {
        let mut chars = self.text.chars();
        chars.next();
        chars.as_str()
    }
}

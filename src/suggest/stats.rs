//! Suggestion statistics
//!
//! Counters fed from the event stream, shown in the demo footer.

use super::events::{RejectReason, SuggestionEvent, SuggestionObserver};
use super::suggestion::SuggestionSource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionStats {
    pub shown: usize,
    pub accepted: usize,
    pub rejected_explicit: usize,
    pub rejected_implicit: usize,
    /// Shows served from the cache without a fetch
    pub cache_served: usize,
    /// Shows fetched from the provider
    pub fetched: usize,
    total_latency_ms: u64,
}

impl SuggestionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &SuggestionEvent) {
        match event {
            SuggestionEvent::Shown { suggestion, .. } => {
                self.shown += 1;
                match suggestion.source {
                    SuggestionSource::Provider => {
                        self.fetched += 1;
                        self.total_latency_ms =
                            self.total_latency_ms.saturating_add(suggestion.latency_ms);
                    }
                    SuggestionSource::Cache => self.cache_served += 1,
                    SuggestionSource::Remainder => {}
                }
            }
            SuggestionEvent::Accepted { .. } => self.accepted += 1,
            SuggestionEvent::Rejected { reason, .. } => match reason {
                RejectReason::Explicit => self.rejected_explicit += 1,
                RejectReason::Implicit => self.rejected_implicit += 1,
            },
            SuggestionEvent::ContentChanged { .. } => {}
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected_explicit + self.rejected_implicit
    }

    /// Mean provider latency, if anything was fetched
    pub fn mean_latency_ms(&self) -> Option<u64> {
        if self.fetched == 0 {
            None
        } else {
            Some(self.total_latency_ms / self.fetched as u64)
        }
    }

    /// Accepted share of resolved suggestions
    pub fn acceptance_rate(&self) -> Option<f64> {
        let resolved = self.accepted + self.rejected();
        if resolved == 0 {
            None
        } else {
            Some(self.accepted as f64 / resolved as f64)
        }
    }
}

impl SuggestionObserver for SuggestionStats {
    fn notify(&mut self, event: &SuggestionEvent) {
        self.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::events::ContentSnapshot;
    use crate::suggest::suggestion::{Suggestion, SuggestionId};
    use chrono::Utc;

    fn shown(suggestion: Suggestion) -> SuggestionEvent {
        SuggestionEvent::Shown {
            suggestion,
            snapshot: ContentSnapshot::new(String::new()),
        }
    }

    fn rejected(reason: RejectReason) -> SuggestionEvent {
        SuggestionEvent::Rejected {
            id: SuggestionId::new(),
            rejected_at: Utc::now(),
            reason,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = SuggestionStats::new();
        assert_eq!(stats.mean_latency_ms(), None);
        assert_eq!(stats.acceptance_rate(), None);
    }

    #[test]
    fn test_counts_by_source() {
        let mut stats = SuggestionStats::new();
        stats.record(&shown(Suggestion::fetched("a".into(), "x".into(), 100)));
        stats.record(&shown(Suggestion::fetched("b".into(), "y".into(), 300)));
        stats.record(&shown(Suggestion::cached("a".into(), "x".into())));
        stats.record(&shown(Suggestion::remainder("c".into(), "z".into())));

        assert_eq!(stats.shown, 4);
        assert_eq!(stats.fetched, 2);
        assert_eq!(stats.cache_served, 1);
        assert_eq!(stats.mean_latency_ms(), Some(200));
    }

    #[test]
    fn test_acceptance_rate() {
        let mut stats = SuggestionStats::new();
        stats.record(&SuggestionEvent::Accepted {
            id: SuggestionId::new(),
            accepted_at: Utc::now(),
        });
        stats.record(&rejected(RejectReason::Explicit));
        stats.record(&rejected(RejectReason::Implicit));
        stats.record(&rejected(RejectReason::Implicit));

        assert_eq!(stats.rejected_explicit, 1);
        assert_eq!(stats.rejected_implicit, 2);
        assert_eq!(stats.acceptance_rate(), Some(0.25));
    }

    #[test]
    fn test_content_changes_are_ignored() {
        let mut stats = SuggestionStats::new();
        stats.notify(&SuggestionEvent::ContentChanged {
            content: "x".to_string(),
        });
        assert_eq!(stats, SuggestionStats::new());
    }
}

//! Outbound suggestion notifications
//!
//! Observers are called synchronously from inside each transition, in the
//! order the transitions happen. Internal removals (replacement, partial
//! acceptance, accept) never produce a `Rejected` event.

use std::sync::mpsc::Sender;

use chrono::{DateTime, Utc};

use super::suggestion::{Suggestion, SuggestionId};

/// Why a displayed suggestion was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Caret moved, mismatched typing, blur or disable
    Implicit,
    /// The reject command
    Explicit,
}

/// Committed content captured when a suggestion was shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSnapshot {
    content: String,
}

impl ContentSnapshot {
    pub fn new(content: String) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionEvent {
    Shown {
        suggestion: Suggestion,
        snapshot: ContentSnapshot,
    },
    Accepted {
        id: SuggestionId,
        accepted_at: DateTime<Utc>,
    },
    Rejected {
        id: SuggestionId,
        rejected_at: DateTime<Utc>,
        reason: RejectReason,
    },
    /// Committed content changed; markers excluded
    ContentChanged { content: String },
}

/// Receiver of suggestion events
pub trait SuggestionObserver {
    fn notify(&mut self, event: &SuggestionEvent);
}

impl<F> SuggestionObserver for F
where
    F: FnMut(&SuggestionEvent),
{
    fn notify(&mut self, event: &SuggestionEvent) {
        self(event)
    }
}

/// Forwards events over a channel; a closed channel is ignored
impl SuggestionObserver for Sender<SuggestionEvent> {
    fn notify(&mut self, event: &SuggestionEvent) {
        let _ = self.send(event.clone());
    }
}

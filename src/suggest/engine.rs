//! Suggestion lifecycle
//!
//! `SuggestionEngine` owns every piece of mutable suggestion state: the active
//! suggestion, the debounce timer and the fetch coordinator (with its cache).
//! The host forwards surface events to it and calls [`SuggestionEngine::tick`]
//! from its event loop; the engine reads and writes the surface only through
//! [`EditableSurface`].
//!
//! No method returns an error. Unavailable carets, failed fetches, stale
//! results and failed insertions all degrade to "no suggestion".

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::Utc;

use super::debouncer::SuggestDebouncer;
use super::events::{ContentSnapshot, RejectReason, SuggestionEvent, SuggestionObserver};
use super::fetch::{FetchCoordinator, FetchOutcome, FetchRequest, FetchResolution, FetchResponse};
use super::provider::SuggestionProvider;
use super::suggestion::Suggestion;
use super::worker::spawn_worker;
use crate::config::SuggestConfig;
use crate::surface::{EditableSurface, StyleHints};

/// Where the engine is in the suggestion lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    DebouncePending,
    Fetching,
    Displayed,
}

impl EngineState {
    pub fn label(self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::DebouncePending => "waiting",
            EngineState::Fetching => "fetching",
            EngineState::Displayed => "suggesting",
        }
    }
}

pub struct SuggestionEngine {
    enabled: bool,
    debouncer: SuggestDebouncer,
    fetch: FetchCoordinator,
    active: Option<Suggestion>,
    style: StyleHints,
    observers: Vec<Box<dyn SuggestionObserver>>,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(&SuggestConfig::default())
    }
}

impl SuggestionEngine {
    pub fn new(config: &SuggestConfig) -> Self {
        Self {
            enabled: config.enabled,
            debouncer: SuggestDebouncer::new(config.debounce_ms),
            fetch: FetchCoordinator::new(config.cache_capacity),
            active: None,
            style: config.style_hints(),
            observers: Vec::new(),
        }
    }

    /// Spawn a worker thread for `provider` and route fetches to it
    pub fn connect(&mut self, provider: Arc<dyn SuggestionProvider>) {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();
        spawn_worker(provider, request_rx, response_tx);
        self.set_channels(request_tx, response_rx);
    }

    /// Route fetches over existing channels
    pub fn set_channels(
        &mut self,
        request_tx: Sender<FetchRequest>,
        response_rx: Receiver<FetchResponse>,
    ) {
        self.fetch.set_channels(request_tx, response_rx);
    }

    pub fn subscribe(&mut self, observer: impl SuggestionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> EngineState {
        if self.active.is_some() {
            EngineState::Displayed
        } else if self.fetch.is_pending() {
            EngineState::Fetching
        } else if self.debouncer.has_pending() {
            EngineState::DebouncePending
        } else {
            EngineState::Idle
        }
    }

    /// The suggestion currently displayed
    pub fn active(&self) -> Option<&Suggestion> {
        self.active.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debouncer.delay_ms()
    }

    pub fn cache_capacity(&self) -> usize {
        self.fetch.cache().capacity()
    }

    pub fn cached_count(&self) -> usize {
        self.fetch.cache().len()
    }

    pub fn set_debounce_ms(&mut self, delay_ms: u64) {
        self.debouncer.set_delay_ms(delay_ms);
    }

    pub fn set_cache_capacity(&mut self, capacity: usize) {
        self.fetch.cache_mut().resize(capacity);
    }

    /// Enable or disable suggestions
    ///
    /// Disabling tears down the timer and any fetch and implicitly rejects
    /// the displayed suggestion. Enabling never brings anything back.
    pub fn set_enabled(&mut self, surface: &mut dyn EditableSurface, enabled: bool) {
        if !enabled {
            self.halt_pending();
            self.reject_active(surface, RejectReason::Implicit);
        }
        if self.enabled != enabled {
            log::debug!("Suggestions {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    /// The caret moved or the selection changed
    pub fn on_selection_changed(&mut self, surface: &mut dyn EditableSurface) {
        if let Some(active) = &self.active
            && surface.is_caret_collapsed()
            && surface.preceding_text().as_deref() == Some(active.leading_text.as_str())
        {
            return;
        }

        self.halt_pending();
        self.reject_active(surface, RejectReason::Implicit);
        self.arm(surface);
    }

    /// Committed content changed
    ///
    /// Called after the surface applied the edit. `last_inserted` is the
    /// single character just typed, when known. Typing the first character
    /// of the displayed suggestion keeps the rest of it on screen.
    pub fn on_content_changed(
        &mut self,
        surface: &mut dyn EditableSurface,
        last_inserted: Option<char>,
    ) {
        self.halt_pending();

        let previous = self.clear_active(surface);
        let typed_through = match (&previous, last_inserted) {
            (Some(active), Some(c)) => active.text.starts_with(c),
            _ => false,
        };

        if let Some(active) = &previous
            && !typed_through
        {
            self.emit_rejected(active, RejectReason::Implicit);
        }

        self.emit(SuggestionEvent::ContentChanged {
            content: surface.committed_content(),
        });

        match previous {
            Some(active) if typed_through => self.show_remainder(surface, &active),
            _ => self.arm(surface),
        }
    }

    /// The surface lost focus
    pub fn on_blur(&mut self, surface: &mut dyn EditableSurface) {
        self.halt_pending();
        self.reject_active(surface, RejectReason::Implicit);
    }

    /// Commit the displayed suggestion
    ///
    /// Returns `false` when nothing is displayed or the surface refused the
    /// text; in that case no event fires.
    pub fn accept(&mut self, surface: &mut dyn EditableSurface) -> bool {
        self.halt_pending();

        let Some(active) = &self.active else {
            return false;
        };
        if !surface.insert_plain_text(&active.text) {
            log::debug!("Surface refused accepted text");
            return false;
        }

        let Some(accepted) = self.clear_active(surface) else {
            return false;
        };
        log::debug!("Accepted suggestion {}", accepted.id);
        self.emit(SuggestionEvent::Accepted {
            id: accepted.id,
            accepted_at: Utc::now(),
        });
        self.emit(SuggestionEvent::ContentChanged {
            content: surface.committed_content(),
        });
        true
    }

    /// Dismiss the displayed suggestion
    ///
    /// Returns `false` when nothing is displayed.
    pub fn reject(&mut self, surface: &mut dyn EditableSurface) -> bool {
        self.halt_pending();
        self.reject_active(surface, RejectReason::Explicit)
    }

    /// Advance the debounce timer and apply finished fetches
    ///
    /// Returns `true` when anything observable happened.
    pub fn tick(&mut self, surface: &mut dyn EditableSurface) -> bool {
        let mut changed = false;

        if self.debouncer.is_ready() {
            self.debouncer.mark_complete();
            self.start_fetch(surface);
            changed = true;
        }

        for resolution in self.fetch.poll() {
            changed |= self.apply_resolution(surface, resolution);
        }

        changed
    }

    fn is_eligible(&self, surface: &dyn EditableSurface) -> bool {
        self.enabled
            && surface.has_focus()
            && surface.is_caret_collapsed()
            && surface.is_caret_at_line_end()
    }

    fn arm(&mut self, surface: &dyn EditableSurface) {
        if self.is_eligible(surface) && surface.preceding_text().is_some() {
            self.debouncer.schedule();
        }
    }

    fn halt_pending(&mut self) {
        self.debouncer.cancel();
        self.fetch.cancel_in_flight();
    }

    fn start_fetch(&mut self, surface: &mut dyn EditableSurface) {
        if self.active.is_some() || !self.is_eligible(surface) {
            return;
        }
        let Some(leading_text) = surface.preceding_text() else {
            return;
        };

        match self.fetch.request(&leading_text) {
            FetchOutcome::CacheHit(text) => {
                self.display(surface, Suggestion::cached(text, leading_text));
            }
            FetchOutcome::Dispatched(_) => {}
            FetchOutcome::Unavailable => {
                log::debug!("No suggestion source available");
            }
        }
    }

    fn apply_resolution(
        &mut self,
        surface: &mut dyn EditableSurface,
        resolution: FetchResolution,
    ) -> bool {
        if self.active.is_some() || !self.is_eligible(surface) {
            log::debug!("Discarding fetch {}: not eligible", resolution.request_id);
            return false;
        }
        if surface.preceding_text().as_deref() != Some(resolution.leading_text.as_str()) {
            log::debug!("Discarding fetch {}: context moved", resolution.request_id);
            return false;
        }

        let suggestion = Suggestion::fetched(
            resolution.text,
            resolution.leading_text,
            resolution.latency_ms,
        );
        self.display(surface, suggestion)
    }

    fn show_remainder(&mut self, surface: &mut dyn EditableSurface, previous: &Suggestion) {
        let remainder = previous.remainder_after_first();
        if remainder.is_empty() {
            return;
        }
        if !self.enabled || !surface.is_caret_collapsed() {
            return;
        }
        let Some(leading_text) = surface.preceding_text() else {
            return;
        };
        self.display(surface, Suggestion::remainder(remainder.to_string(), leading_text));
    }

    /// Materialize `suggestion`, replacing whatever markers exist
    fn display(&mut self, surface: &mut dyn EditableSurface, suggestion: Suggestion) -> bool {
        self.clear_active(surface);

        if !surface.insert_suggestion_marker(&suggestion.text, suggestion.id, &self.style) {
            log::debug!("Surface refused suggestion marker");
            return false;
        }

        log::debug!(
            "Showing suggestion {} ({:?}, {}ms)",
            suggestion.id,
            suggestion.source,
            suggestion.latency_ms
        );
        let snapshot = ContentSnapshot::new(surface.committed_content());
        self.active = Some(suggestion.clone());
        self.emit(SuggestionEvent::Shown {
            suggestion,
            snapshot,
        });
        true
    }

    /// Drop the active suggestion and every marker the surface reports,
    /// without notifying anyone
    fn clear_active(&mut self, surface: &mut dyn EditableSurface) -> Option<Suggestion> {
        for id in surface.marker_ids() {
            surface.remove_marker(id);
        }
        self.active.take()
    }

    fn reject_active(&mut self, surface: &mut dyn EditableSurface, reason: RejectReason) -> bool {
        if self.active.is_none() {
            return false;
        }
        match self.clear_active(surface) {
            Some(rejected) => {
                self.emit_rejected(&rejected, reason);
                true
            }
            None => false,
        }
    }

    fn emit_rejected(&mut self, suggestion: &Suggestion, reason: RejectReason) {
        log::debug!("Rejected suggestion {} ({:?})", suggestion.id, reason);
        self.emit(SuggestionEvent::Rejected {
            id: suggestion.id,
            rejected_at: Utc::now(),
            reason,
        });
    }

    fn emit(&mut self, event: SuggestionEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;

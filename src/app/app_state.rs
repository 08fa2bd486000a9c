use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use crate::config::Config;
use crate::suggest::{SuggestionEngine, SuggestionEvent, SuggestionProvider, SuggestionStats};
use crate::surface::{DocumentSurface, EditableSurface};

/// Terminal editor state: one document surface driven by one engine
pub struct App {
    pub surface: DocumentSurface,
    pub engine: SuggestionEngine,
    pub stats: SuggestionStats,
    /// Name of the connected provider, shown in the footer
    pub provider_name: Option<String>,
    /// Warning shown in the footer until the next key press
    pub warning: Option<String>,
    /// Ghost text is rendered in italics
    pub italic_ghost: bool,
    pub should_quit: bool,
    events_rx: Receiver<SuggestionEvent>,
    dirty: bool,
}

impl App {
    pub fn new(text: &str, config: &Config) -> Self {
        let mut engine = SuggestionEngine::new(&config.suggest);
        let (events_tx, events_rx) = mpsc::channel();
        engine.subscribe(events_tx);

        let mut surface = DocumentSurface::from_text(text);
        engine.on_selection_changed(&mut surface);

        Self {
            surface,
            engine,
            stats: SuggestionStats::new(),
            provider_name: None,
            warning: None,
            italic_ghost: config.suggest.italic,
            should_quit: false,
            events_rx,
            dirty: true,
        }
    }

    /// Start a worker for `provider`
    pub fn connect(&mut self, provider: Arc<dyn SuggestionProvider>) {
        self.provider_name = Some(provider.name().to_string());
        self.engine.connect(provider);
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn show_warning(&mut self, message: impl Into<String>) {
        self.warning = Some(message.into());
        self.dirty = true;
    }

    /// Committed document text, ghost text excluded
    pub fn content(&self) -> String {
        self.surface.committed_content()
    }

    /// Advance the engine and fold its events into the statistics
    pub fn tick(&mut self) {
        if self.engine.tick(&mut self.surface) {
            self.dirty = true;
        }
        for event in self.events_rx.try_iter() {
            self.stats.record(&event);
            self.dirty = true;
        }
    }

    pub fn should_render(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod app_state_tests;

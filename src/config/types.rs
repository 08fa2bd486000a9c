// Configuration type definitions

use serde::Deserialize;

use super::ai_types::AiConfig;
use crate::suggest::{DEFAULT_CACHE_CAPACITY, DEFAULT_DEBOUNCE_MS};
use crate::surface::StyleHints;

fn default_enabled() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_marker_class() -> String {
    "ghost-text".to_string()
}

fn default_italic() -> bool {
    true
}

/// `[suggest]` section: engine behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestConfig {
    /// Whether ghost-text suggestions are enabled at startup
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Caret stability required before fetching, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Number of suggestions kept in the LRU cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Class name handed to the surface with every marker
    #[serde(default = "default_marker_class")]
    pub marker_class: String,
    #[serde(default = "default_italic")]
    pub italic: bool,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        SuggestConfig {
            enabled: default_enabled(),
            debounce_ms: default_debounce_ms(),
            cache_capacity: default_cache_capacity(),
            marker_class: default_marker_class(),
            italic: default_italic(),
        }
    }
}

impl SuggestConfig {
    pub fn style_hints(&self) -> StyleHints {
        StyleHints {
            class_name: self.marker_class.clone(),
            italic: self.italic,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub suggest: SuggestConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

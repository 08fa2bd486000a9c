//! Ghost-text suggestion lifecycle
//!
//! Decides when to ask for a suggestion, serves repeats from an LRU cache,
//! runs provider calls on a worker thread and shows, accepts or rejects the
//! result through an [`EditableSurface`](crate::surface::EditableSurface).

mod cache;
mod debouncer;
mod engine;
mod events;
mod fetch;
mod prompt;
pub mod provider;
mod stats;
mod suggestion;
mod worker;

pub use cache::{DEFAULT_CACHE_CAPACITY, SuggestionCache};
pub use debouncer::{DEFAULT_DEBOUNCE_MS, SuggestDebouncer};
pub use engine::{EngineState, SuggestionEngine};
pub use events::{ContentSnapshot, RejectReason, SuggestionEvent, SuggestionObserver};
pub use fetch::{FetchCoordinator, FetchOutcome, FetchRequest, FetchResolution, FetchResponse};
pub use prompt::build_prompt;
pub use provider::{
    AnthropicProvider, PhrasebookProvider, ProviderError, SuggestionProvider,
    provider_from_config,
};
pub use stats::SuggestionStats;
pub use suggestion::{Suggestion, SuggestionId, SuggestionSource};
pub use worker::spawn_worker;

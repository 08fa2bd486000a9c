//! ghostwrite library - inline ghost-text suggestions
//!
//! The engine ([`SuggestionEngine`]) decides when to fetch a suggestion, serves
//! repeats from a cache, discards stale results and handles accept/reject.
//! Hosts plug in their editable surface through [`surface::EditableSurface`]
//! and a suggestion source through [`suggest::SuggestionProvider`].

pub mod app;
pub mod config;
pub mod error;
pub mod suggest;
pub mod surface;
pub mod theme;

// Re-export commonly used types for convenience
pub use config::Config;
pub use suggest::{EngineState, SuggestionEngine, SuggestionEvent, SuggestionProvider};
pub use surface::{DocumentSurface, EditableSurface};

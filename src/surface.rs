//! Editable surface abstraction
//!
//! The engine never touches a rendering surface directly. Everything it needs
//! (reading the text before the caret, inserting and removing the ghost-text
//! marker, committing plain text) goes through the [`EditableSurface`] trait.
//!
//! [`DocumentSurface`] is the in-memory implementation over an explicit
//! [`ContentTree`]; it backs the tests and the terminal demo.

mod document;
pub mod extract;
pub mod tree;

pub use document::DocumentSurface;
pub use extract::{
    Fragment, char_offset_of, committed_text, extract_preceding_text, fragments,
    is_caret_at_line_end, position_at_char_offset,
};
pub use tree::{CaretPosition, ContentTree, ElementKind, Node, NodePath, Selection};

use crate::suggest::SuggestionId;

/// Presentation hints passed along with every inserted marker
///
/// The engine does not interpret these; surfaces decide how to style ghost text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleHints {
    /// Class or style name the surface attaches to the marker
    pub class_name: String,
    /// Whether the ghost text should be rendered in italics
    pub italic: bool,
}

impl Default for StyleHints {
    fn default() -> Self {
        Self {
            class_name: "ghost-text".to_string(),
            italic: true,
        }
    }
}

/// The engine-to-surface boundary
///
/// Writes must fail gracefully: when the caret is no longer inside the surface
/// the insert methods return `false` and leave the content untouched.
pub trait EditableSurface {
    /// Text from the start of the surface up to the caret, or `None` when the
    /// caret cannot be resolved to a single collapsed point.
    fn preceding_text(&self) -> Option<String>;

    /// Whether the selection is a single collapsed caret.
    fn is_caret_collapsed(&self) -> bool;

    /// Whether the caret sits at the trailing edge of its line.
    fn is_caret_at_line_end(&self) -> bool;

    /// Whether the surface currently has input focus.
    fn has_focus(&self) -> bool {
        true
    }

    /// Insert a ghost-text marker immediately after the caret.
    fn insert_suggestion_marker(&mut self, text: &str, id: SuggestionId, style: &StyleHints)
    -> bool;

    /// Insert committed text at the caret and move the caret past it.
    fn insert_plain_text(&mut self, text: &str) -> bool;

    /// Remove every marker carrying `id`. Removing an absent marker is a no-op.
    fn remove_marker(&mut self, id: SuggestionId);

    /// Identifiers of all markers currently present, in document order.
    fn marker_ids(&self) -> Vec<SuggestionId>;

    /// Committed content, excluding ghost text.
    fn committed_content(&self) -> String;
}

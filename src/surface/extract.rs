//! Caret text extraction
//!
//! Computes the text preceding the caret, independent of how deeply the caret
//! is nested in inline formatting. Line breaks are normalized to a single `\n`
//! and non-breaking spaces become plain spaces, since suggestion providers
//! work on natural language rather than markup whitespace.
//!
//! Normalization rules:
//! - a `LineBreak` node is `\n`
//! - entering a block that follows content not ending in `\n` emits `\n`
//! - text that follows a closed block starts on a new line; empty text
//!   nodes do not count, in committed text and at the caret alike
//! - ghost-text markers are never part of committed text

use super::tree::{CaretPosition, ContentTree, ElementKind, Node, NodePath, Selection, byte_index};

const NBSP: char = '\u{00A0}';

/// A run of rendered content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Committed text
    Text(String),
    /// Ghost text from a suggestion marker
    Ghost(String),
}

/// Accumulates committed text while walking the tree in document order
struct TextCollector {
    fragments: Vec<Fragment>,
    keep_ghosts: bool,
    /// Committed length in characters
    len: usize,
    last_char: Option<char>,
    /// A block was closed; the next committed text starts a new line
    break_pending: bool,
}

impl TextCollector {
    fn new(keep_ghosts: bool) -> Self {
        Self {
            fragments: Vec::new(),
            keep_ghosts,
            len: 0,
            last_char: None,
            break_pending: false,
        }
    }

    fn push_committed(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let normalized = text.replace(NBSP, " ");
        self.len += normalized.chars().count();
        self.last_char = normalized.chars().last();
        match self.fragments.last_mut() {
            Some(Fragment::Text(existing)) => existing.push_str(&normalized),
            _ => self.fragments.push(Fragment::Text(normalized)),
        }
    }

    fn needs_break(&self) -> bool {
        self.last_char.is_some_and(|c| c != '\n')
    }

    fn flush_break(&mut self) {
        if self.break_pending {
            self.break_pending = false;
            if self.needs_break() {
                self.push_committed("\n");
            }
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush_break();
        self.push_committed(text);
    }

    fn line_break(&mut self) {
        self.flush_break();
        self.push_committed("\n");
    }

    fn enter_block(&mut self) {
        self.break_pending = false;
        if self.needs_break() {
            self.push_committed("\n");
        }
    }

    fn leave_block(&mut self) {
        self.break_pending = true;
    }

    fn ghost(&mut self, text: &str) {
        if !self.keep_ghosts || text.is_empty() {
            return;
        }
        match self.fragments.last_mut() {
            Some(Fragment::Ghost(existing)) => existing.push_str(text),
            _ => self.fragments.push(Fragment::Ghost(text.to_string())),
        }
    }

    fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    fn into_text(self) -> String {
        self.fragments
            .into_iter()
            .filter_map(|fragment| match fragment {
                Fragment::Text(text) => Some(text),
                Fragment::Ghost(_) => None,
            })
            .collect()
    }
}

fn walk(node: &Node, collector: &mut TextCollector) {
    match node {
        Node::Text(text) => collector.text(text),
        Node::LineBreak => collector.line_break(),
        Node::Marker { text, .. } => collector.ghost(text),
        Node::Element { kind, children } => {
            let is_block = *kind == ElementKind::Block;
            if is_block {
                collector.enter_block();
            }
            for child in children {
                walk(child, collector);
            }
            if is_block {
                collector.leave_block();
            }
        }
    }
}

/// Walk everything before the caret; `rest` is the caret path relative to `node`.
fn collect_until(
    node: &Node,
    rest: &[usize],
    offset: usize,
    collector: &mut TextCollector,
) -> Option<()> {
    let Some((&index, rest)) = rest.split_first() else {
        return match node {
            Node::Text(text) => {
                let end = byte_index(text, offset)?;
                if !text.is_empty() {
                    collector.flush_break();
                }
                collector.push_committed(&text[..end]);
                Some(())
            }
            Node::Element { children, .. } => {
                for child in children.get(..offset)? {
                    walk(child, collector);
                }
                Some(())
            }
            Node::LineBreak | Node::Marker { .. } => (offset == 0).then_some(()),
        };
    };

    let children = node.children()?;
    let child = children.get(index)?;
    for sibling in &children[..index] {
        walk(sibling, collector);
    }
    if child.is_block() {
        collector.enter_block();
    }
    collect_until(child, rest, offset, collector)
}

/// Text from the start of the tree up to `caret`, or `None` if the caret does
/// not resolve to a valid position.
pub fn preceding_text_at(tree: &ContentTree, caret: &CaretPosition) -> Option<String> {
    tree.resolve_caret(caret)?;
    let mut collector = TextCollector::new(false);
    collect_until(tree.root(), &caret.path, caret.offset, &mut collector)?;
    Some(collector.into_text())
}

/// Text preceding the caret of `selection`
///
/// Returns `None` ("unavailable") when there is no selection, the selection
/// is a range, or the caret cannot be resolved inside the tree.
pub fn extract_preceding_text(tree: &ContentTree, selection: Option<&Selection>) -> Option<String> {
    let caret = selection?.caret()?;
    preceding_text_at(tree, caret)
}

/// All committed text, ghost text excluded
pub fn committed_text(tree: &ContentTree) -> String {
    let mut collector = TextCollector::new(false);
    for child in tree.root().children().unwrap_or_default() {
        walk(child, &mut collector);
    }
    collector.into_text()
}

/// All content as committed and ghost fragments, in document order
pub fn fragments(tree: &ContentTree) -> Vec<Fragment> {
    let mut collector = TextCollector::new(true);
    for child in tree.root().children().unwrap_or_default() {
        walk(child, &mut collector);
    }
    collector.into_fragments()
}

/// How a sibling after the caret affects the current line
enum LineContent {
    /// Nothing visible (empty text, markers, empty formatting)
    Empty,
    /// Visible text on the same line
    Content,
    /// A line break or block boundary comes first
    Ends,
}

fn line_content(node: &Node) -> LineContent {
    match node {
        Node::Marker { .. } => LineContent::Empty,
        Node::LineBreak => LineContent::Ends,
        Node::Text(text) if text.is_empty() => LineContent::Empty,
        Node::Text(_) => LineContent::Content,
        Node::Element {
            kind: ElementKind::Block,
            ..
        } => LineContent::Ends,
        Node::Element {
            kind: ElementKind::Inline,
            children,
        } => {
            for child in children {
                match line_content(child) {
                    LineContent::Empty => continue,
                    other => return other,
                }
            }
            LineContent::Empty
        }
    }
}

/// Whether the caret sits at the trailing edge of its line
///
/// Text after the caret inside the same text node means mid-line. Otherwise
/// the siblings after the caret are scanned outward up to the nearest block;
/// any visible text before a line break or block boundary means mid-line.
/// A caret anchored on an element (a structural boundary) always counts as
/// line end. The heuristic errs on the side of "line end".
///
/// An unavailable caret is never at line end.
pub fn is_caret_at_line_end(tree: &ContentTree, selection: Option<&Selection>) -> bool {
    let Some(caret) = selection.and_then(Selection::caret) else {
        return false;
    };
    let Some(node) = tree.resolve_caret(caret) else {
        return false;
    };

    match node {
        Node::Text(text) => {
            if text.chars().count() > caret.offset {
                return false;
            }
        }
        _ => return true,
    }

    let mut path = caret.path.clone();
    while let Some(index) = path.pop() {
        let Some(parent) = tree.resolve(&path) else {
            return true;
        };
        let siblings = parent.children().unwrap_or_default();
        for sibling in siblings.iter().skip(index + 1) {
            match line_content(sibling) {
                LineContent::Empty => continue,
                LineContent::Content => return false,
                LineContent::Ends => return true,
            }
        }
        if parent.is_block() {
            return true;
        }
    }
    true
}

/// Character offset of `caret` in the committed text
pub fn char_offset_of(tree: &ContentTree, caret: &CaretPosition) -> Option<usize> {
    preceding_text_at(tree, caret).map(|text| text.chars().count())
}

/// Resolve a committed-text character offset back to a tree position
///
/// Prefers the end of a text node over the start of the next one. Offsets
/// that land on a line break with no text before it resolve to the element
/// position in front of the break. The newline owed after a closed block has
/// no position of its own when a line break follows it, so that offset
/// resolves to `None`.
pub fn position_at_char_offset(tree: &ContentTree, target: usize) -> Option<CaretPosition> {
    let mut collector = TextCollector::new(false);
    let mut path = NodePath::new();
    let root_children = tree.root().children().unwrap_or_default();
    if let Some(found) = locate(root_children, &mut path, target, &mut collector) {
        return Some(found);
    }
    (collector.len == target).then(|| CaretPosition::new(Vec::new(), root_children.len()))
}

fn locate(
    children: &[Node],
    path: &mut NodePath,
    target: usize,
    collector: &mut TextCollector,
) -> Option<CaretPosition> {
    for (index, child) in children.iter().enumerate() {
        let found = match child {
            Node::Text(text) => {
                if !text.is_empty() {
                    collector.flush_break();
                }
                let start = collector.len;
                let len = text.chars().count();
                if (start..=start + len).contains(&target) {
                    let mut text_path = path.clone();
                    text_path.push(index);
                    Some(CaretPosition::new(text_path, target - start))
                } else {
                    collector.push_committed(text);
                    None
                }
            }
            Node::LineBreak => {
                if collector.len == target {
                    Some(CaretPosition::new(path.clone(), index))
                } else {
                    collector.line_break();
                    None
                }
            }
            Node::Marker { .. } => None,
            Node::Element { kind, children } => {
                let is_block = *kind == ElementKind::Block;
                if is_block {
                    collector.enter_block();
                }
                path.push(index);
                let found = locate(children, path, target, collector);
                path.pop();
                if is_block {
                    collector.leave_block();
                }
                found
            }
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod extract_tests;

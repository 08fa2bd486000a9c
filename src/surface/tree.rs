//! Editable content tree
//!
//! A small, explicit model of rich editable content: text leaves, line breaks,
//! block and inline elements, and ghost-text markers. Positions are addressed
//! with child-index paths so every algorithm can be tested without a live
//! rendering surface.

use crate::suggest::SuggestionId;

/// Path of child indices from the root element to a node
pub type NodePath = Vec<usize>;

/// Structural role of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Line or paragraph level container; separates lines
    Block,
    /// Formatting wrapper (bold, italic, links); transparent to text extraction
    Inline,
}

/// A node in the content tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    LineBreak,
    Element {
        kind: ElementKind,
        children: Vec<Node>,
    },
    /// Inline ghost-text marker; never part of committed content
    Marker { id: SuggestionId, text: String },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn block(children: Vec<Node>) -> Self {
        Node::Element {
            kind: ElementKind::Block,
            children,
        }
    }

    pub fn inline(children: Vec<Node>) -> Self {
        Node::Element {
            kind: ElementKind::Inline,
            children,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Node::Element {
                kind: ElementKind::Block,
                ..
            }
        )
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Length of a text node in characters
    pub fn text_len(&self) -> Option<usize> {
        match self {
            Node::Text(text) => Some(text.chars().count()),
            _ => None,
        }
    }
}

/// A DOM-like point in the tree
///
/// For a text node `offset` counts characters; for an element it is a child index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretPosition {
    pub path: NodePath,
    pub offset: usize,
}

impl CaretPosition {
    pub fn new(path: NodePath, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// Selection between an anchor and a focus point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor: CaretPosition,
    pub focus: CaretPosition,
}

impl Selection {
    pub fn collapsed(caret: CaretPosition) -> Self {
        Self {
            anchor: caret.clone(),
            focus: caret,
        }
    }

    pub fn range(anchor: CaretPosition, focus: CaretPosition) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The caret, if the selection is collapsed
    pub fn caret(&self) -> Option<&CaretPosition> {
        self.is_collapsed().then_some(&self.focus)
    }
}

/// Owner of the root block element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTree {
    root: Node,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ContentTree {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Node::block(children),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Resolve a path to a node
    pub fn resolve(&self, path: &[usize]) -> Option<&Node> {
        let mut node = &self.root;
        for &index in path {
            node = node.children()?.get(index)?;
        }
        Some(node)
    }

    /// Resolve a caret to its container node, checking the offset is in bounds
    ///
    /// Markers and line breaks only accept offset 0.
    pub fn resolve_caret(&self, caret: &CaretPosition) -> Option<&Node> {
        let node = self.resolve(&caret.path)?;
        let max_offset = match node {
            Node::Text(text) => text.chars().count(),
            Node::Element { children, .. } => children.len(),
            Node::LineBreak | Node::Marker { .. } => 0,
        };
        (caret.offset <= max_offset).then_some(node)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = &mut self.root;
        for &index in path {
            node = match node {
                Node::Element { children, .. } => children.get_mut(index)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Mutable child list of the element at `path`
    pub fn children_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        match self.node_mut(path)? {
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Paths of markers, in document order; all of them when `id` is `None`
    pub fn marker_paths(&self, id: Option<SuggestionId>) -> Vec<NodePath> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        collect_marker_paths(&self.root, id, &mut current, &mut paths);
        paths
    }

    /// Identifiers of all markers, in document order
    pub fn marker_ids(&self) -> Vec<SuggestionId> {
        self.marker_paths(None)
            .iter()
            .filter_map(|path| match self.resolve(path) {
                Some(Node::Marker { id, .. }) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

fn collect_marker_paths(
    node: &Node,
    id: Option<SuggestionId>,
    current: &mut NodePath,
    paths: &mut Vec<NodePath>,
) {
    match node {
        Node::Marker { id: marker_id, .. } => {
            if id.is_none_or(|wanted| wanted == *marker_id) {
                paths.push(current.clone());
            }
        }
        Node::Element { children, .. } => {
            for (index, child) in children.iter().enumerate() {
                current.push(index);
                collect_marker_paths(child, id, current, paths);
                current.pop();
            }
        }
        Node::Text(_) | Node::LineBreak => {}
    }
}

/// Byte index of the `char_offset`-th character, or `None` when out of range
pub(crate) fn byte_index(text: &str, char_offset: usize) -> Option<usize> {
    if char_offset == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;

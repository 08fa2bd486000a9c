//! In-memory editable surface
//!
//! Implements [`EditableSurface`] over a [`ContentTree`] with a DOM-like
//! selection. Markers are inserted immediately after the caret so the caret
//! keeps its position in front of the ghost text.

use super::extract::{
    char_offset_of, committed_text, extract_preceding_text, is_caret_at_line_end,
    position_at_char_offset,
};
use super::tree::{CaretPosition, ContentTree, Node, Selection, byte_index};
use super::{EditableSurface, StyleHints};
use crate::suggest::SuggestionId;

/// Reference surface over an explicit content tree
#[derive(Debug, Clone)]
pub struct DocumentSurface {
    tree: ContentTree,
    selection: Option<Selection>,
    focused: bool,
}

impl Default for DocumentSurface {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl DocumentSurface {
    /// Surface over `tree` with no selection
    pub fn new(tree: ContentTree) -> Self {
        Self {
            tree,
            selection: None,
            focused: true,
        }
    }

    /// Surface over `tree` with a collapsed caret at `caret`
    pub fn with_caret(tree: ContentTree, caret: CaretPosition) -> Self {
        let mut surface = Self::new(tree);
        surface.set_caret(caret);
        surface
    }

    /// Flat surface holding `text`, caret at the end
    ///
    /// Each `\n` becomes a line break node.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut surface = Self::new(ContentTree::new(line_nodes(&lines, "", "")));
        surface.move_to_end();
        surface
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The collapsed caret, if any
    pub fn caret(&self) -> Option<&CaretPosition> {
        self.selection.as_ref().and_then(Selection::caret)
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn set_caret(&mut self, caret: CaretPosition) {
        self.selection = Some(Selection::collapsed(caret));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Caret offset in committed characters
    pub fn caret_offset(&self) -> Option<usize> {
        char_offset_of(&self.tree, self.caret()?)
    }

    /// Move the caret to a committed-text character offset
    pub fn set_caret_offset(&mut self, offset: usize) -> bool {
        match position_at_char_offset(&self.tree, offset) {
            Some(caret) => {
                self.set_caret(caret);
                true
            }
            None => false,
        }
    }

    /// Select the committed characters between two offsets
    pub fn select_range(&mut self, start: usize, end: usize) -> bool {
        let anchor = position_at_char_offset(&self.tree, start);
        let focus = position_at_char_offset(&self.tree, end);
        match (anchor, focus) {
            (Some(anchor), Some(focus)) => {
                self.selection = Some(Selection::range(anchor, focus));
                true
            }
            _ => false,
        }
    }

    fn content_len(&self) -> usize {
        committed_text(&self.tree).chars().count()
    }

    pub fn move_to_end(&mut self) {
        let len = self.content_len();
        self.set_caret_offset(len);
    }

    /// Step left to the nearest offset that has a caret position
    pub fn move_left(&mut self) -> bool {
        let Some(offset) = self.caret_offset() else {
            return false;
        };
        (0..offset).rev().any(|target| self.set_caret_offset(target))
    }

    /// Step right to the nearest offset that has a caret position
    pub fn move_right(&mut self) -> bool {
        let Some(offset) = self.caret_offset() else {
            return false;
        };
        let len = self.content_len();
        (offset + 1..=len).any(|target| self.set_caret_offset(target))
    }

    pub fn move_line_start(&mut self) -> bool {
        let Some(offset) = self.caret_offset() else {
            return false;
        };
        let text: Vec<char> = committed_text(&self.tree).chars().collect();
        let Some(before) = text.get(..offset) else {
            return false;
        };
        let start = before
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |index| index + 1);
        self.set_caret_offset(start)
    }

    pub fn move_line_end(&mut self) -> bool {
        let Some(offset) = self.caret_offset() else {
            return false;
        };
        let text: Vec<char> = committed_text(&self.tree).chars().collect();
        let Some(after) = text.get(offset..) else {
            return false;
        };
        let end = after
            .iter()
            .position(|&c| c == '\n')
            .map_or(text.len(), |index| offset + index);
        self.set_caret_offset(end)
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Type a single character at the caret
    pub fn type_char(&mut self, c: char) -> bool {
        let mut buffer = [0u8; 4];
        self.insert_plain_text(c.encode_utf8(&mut buffer))
    }

    /// Delete the character before the caret
    ///
    /// Crosses inline boundaries and line breaks, but never merges blocks.
    pub fn delete_backward(&mut self) -> bool {
        let Some(caret) = self.caret().cloned() else {
            return false;
        };
        match self.tree.resolve_caret(&caret) {
            Some(Node::Text(_)) if caret.offset > 0 => {
                let removed = match self.tree.node_mut(&caret.path) {
                    Some(Node::Text(text)) => remove_char_at(text, caret.offset - 1),
                    _ => false,
                };
                if removed {
                    self.set_caret(CaretPosition::new(caret.path, caret.offset - 1));
                }
                removed
            }
            Some(Node::Text(_)) => match caret.path.split_last() {
                Some((&index, parent)) => self.delete_before(parent.to_vec(), index),
                None => false,
            },
            Some(Node::Element { .. }) => self.delete_before(caret.path, caret.offset),
            _ => false,
        }
    }

    fn delete_before(&mut self, parent: Vec<usize>, index: usize) -> bool {
        for sibling in (0..index).rev() {
            let mut sibling_path = parent.clone();
            sibling_path.push(sibling);
            match self.tree.node_mut(&sibling_path) {
                Some(Node::Marker { .. }) => continue,
                Some(Node::Text(text)) if text.is_empty() => continue,
                Some(Node::Text(text)) => {
                    let len = text.chars().count();
                    return remove_char_at(text, len - 1);
                }
                Some(Node::LineBreak) => {
                    self.remove_node(&sibling_path);
                    return true;
                }
                _ => return false,
            }
        }
        false
    }

    /// Remove the node at `path`, keeping the selection pointing at live nodes
    fn remove_node(&mut self, path: &[usize]) {
        let Some((&index, parent)) = path.split_last() else {
            return;
        };
        let Some(children) = self.tree.children_mut(parent) else {
            return;
        };
        if index >= children.len() {
            return;
        }
        children.remove(index);

        if let Some(selection) = self.selection.as_mut() {
            adjust_after_removal(&mut selection.anchor, parent, index);
            adjust_after_removal(&mut selection.focus, parent, index);
        }
    }
}

impl EditableSurface for DocumentSurface {
    fn preceding_text(&self) -> Option<String> {
        extract_preceding_text(&self.tree, self.selection.as_ref())
    }

    fn is_caret_collapsed(&self) -> bool {
        self.selection.as_ref().is_some_and(Selection::is_collapsed)
    }

    fn is_caret_at_line_end(&self) -> bool {
        is_caret_at_line_end(&self.tree, self.selection.as_ref())
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn insert_suggestion_marker(
        &mut self,
        text: &str,
        id: SuggestionId,
        _style: &StyleHints,
    ) -> bool {
        if text.is_empty() {
            return false;
        }
        let Some(caret) = self.caret().cloned() else {
            return false;
        };
        let marker = Node::Marker {
            id,
            text: text.to_string(),
        };

        match self.tree.resolve_caret(&caret) {
            Some(Node::Text(existing)) => {
                let Some(split) = byte_index(existing, caret.offset) else {
                    return false;
                };
                let left = existing[..split].to_string();
                let right = existing[split..].to_string();
                let Some((&index, parent)) = caret.path.split_last() else {
                    return false;
                };
                let Some(children) = self.tree.children_mut(parent) else {
                    return false;
                };
                let mut replacement = vec![Node::Text(left), marker];
                if !right.is_empty() {
                    replacement.push(Node::Text(right));
                }
                children.splice(index..=index, replacement);
                true
            }
            Some(Node::Element { .. }) => match self.tree.children_mut(&caret.path) {
                Some(children) => {
                    children.insert(caret.offset, marker);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn insert_plain_text(&mut self, text: &str) -> bool {
        let Some(caret) = self.caret().cloned() else {
            return false;
        };
        if self.tree.resolve_caret(&caret).is_none() {
            return false;
        }
        if text.is_empty() {
            return true;
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let last = lines.len() - 1;
        let last_len = lines[last].chars().count();

        let new_caret = match self.tree.resolve(&caret.path) {
            Some(Node::Text(existing)) => {
                let Some(split) = byte_index(existing, caret.offset) else {
                    return false;
                };
                let left = existing[..split].to_string();
                let right = existing[split..].to_string();
                let Some((&index, parent)) = caret.path.split_last() else {
                    return false;
                };
                let Some(children) = self.tree.children_mut(parent) else {
                    return false;
                };
                children.splice(index..=index, line_nodes(&lines, &left, &right));

                let mut path = parent.to_vec();
                path.push(index + 2 * last);
                let offset = if last == 0 {
                    caret.offset + last_len
                } else {
                    last_len
                };
                CaretPosition::new(path, offset)
            }
            Some(Node::Element { .. }) => {
                let Some(children) = self.tree.children_mut(&caret.path) else {
                    return false;
                };
                let at = caret.offset;
                children.splice(at..at, line_nodes(&lines, "", ""));

                let mut path = caret.path.clone();
                path.push(at + 2 * last);
                CaretPosition::new(path, last_len)
            }
            _ => return false,
        };

        self.set_caret(new_caret);
        true
    }

    fn remove_marker(&mut self, id: SuggestionId) {
        let paths = self.tree.marker_paths(Some(id));
        for path in paths.iter().rev() {
            self.remove_node(path);
        }
    }

    fn marker_ids(&self) -> Vec<SuggestionId> {
        self.tree.marker_ids()
    }

    fn committed_content(&self) -> String {
        committed_text(&self.tree)
    }
}

/// Text nodes for `lines` separated by line breaks, with `prefix` and
/// `suffix` merged into the first and last lines.
fn line_nodes(lines: &[&str], prefix: &str, suffix: &str) -> Vec<Node> {
    let last = lines.len().saturating_sub(1);
    let mut nodes = Vec::with_capacity(lines.len() * 2);
    for (index, line) in lines.iter().enumerate() {
        let mut text = String::new();
        if index == 0 {
            text.push_str(prefix);
        }
        text.push_str(line);
        if index == last {
            text.push_str(suffix);
        }
        nodes.push(Node::Text(text));
        if index < last {
            nodes.push(Node::LineBreak);
        }
    }
    nodes
}

fn remove_char_at(text: &mut String, char_offset: usize) -> bool {
    match byte_index(text, char_offset) {
        Some(index) if index < text.len() => {
            text.remove(index);
            true
        }
        _ => false,
    }
}

fn adjust_after_removal(point: &mut CaretPosition, parent: &[usize], index: usize) {
    let depth = parent.len();
    if point.path.len() > depth && point.path.starts_with(parent) {
        let child = point.path[depth];
        if child == index {
            point.path.truncate(depth);
            point.offset = index;
        } else if child > index {
            point.path[depth] -= 1;
        }
    } else if point.path == parent && point.offset > index {
        point.offset -= 1;
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod document_tests;

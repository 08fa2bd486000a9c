//! Tests for the content tree

use super::*;

fn sample() -> ContentTree {
    ContentTree::new(vec![
        Node::block(vec![
            Node::text("ab"),
            Node::inline(vec![Node::text("cd")]),
        ]),
        Node::LineBreak,
    ])
}

#[test]
fn test_resolve_paths() {
    let tree = sample();
    assert!(tree.resolve(&[]).is_some_and(Node::is_block));
    assert_eq!(tree.resolve(&[0, 1, 0]), Some(&Node::text("cd")));
    assert_eq!(tree.resolve(&[1]), Some(&Node::LineBreak));
    assert_eq!(tree.resolve(&[2]), None);
    assert_eq!(tree.resolve(&[1, 0]), None);
}

#[test]
fn test_resolve_caret_checks_bounds() {
    let tree = sample();
    assert!(tree.resolve_caret(&CaretPosition::new(vec![0, 0], 2)).is_some());
    assert!(tree.resolve_caret(&CaretPosition::new(vec![0, 0], 3)).is_none());
    assert!(tree.resolve_caret(&CaretPosition::new(vec![0], 2)).is_some());
    assert!(tree.resolve_caret(&CaretPosition::new(vec![0], 3)).is_none());
    assert!(tree.resolve_caret(&CaretPosition::new(vec![1], 0)).is_some());
    assert!(tree.resolve_caret(&CaretPosition::new(vec![1], 1)).is_none());
}

#[test]
fn test_children_mut_only_for_elements() {
    let mut tree = sample();
    tree.children_mut(&[0]).unwrap().push(Node::text("ef"));
    assert_eq!(tree.resolve(&[0, 2]), Some(&Node::text("ef")));
    assert!(tree.children_mut(&[1]).is_none());
}

#[test]
fn test_marker_paths_and_ids() {
    let first = SuggestionId::new();
    let second = SuggestionId::new();
    let tree = ContentTree::new(vec![
        Node::text("a"),
        Node::Marker {
            id: first,
            text: "x".to_string(),
        },
        Node::inline(vec![Node::Marker {
            id: second,
            text: "y".to_string(),
        }]),
    ]);

    assert_eq!(tree.marker_paths(None), vec![vec![1], vec![2, 0]]);
    assert_eq!(tree.marker_paths(Some(second)), vec![vec![2, 0]]);
    assert_eq!(tree.marker_ids(), vec![first, second]);
}

#[test]
fn test_selection_caret() {
    let caret = CaretPosition::new(vec![0], 1);
    let collapsed = Selection::collapsed(caret.clone());
    assert!(collapsed.is_collapsed());
    assert_eq!(collapsed.caret(), Some(&caret));

    let range = Selection::range(caret, CaretPosition::new(vec![0], 2));
    assert!(!range.is_collapsed());
    assert_eq!(range.caret(), None);
}

#[test]
fn test_text_len_counts_chars() {
    assert_eq!(Node::text("héllo").text_len(), Some(5));
    assert_eq!(Node::LineBreak.text_len(), None);
}

#[test]
fn test_byte_index() {
    assert_eq!(byte_index("héllo", 0), Some(0));
    assert_eq!(byte_index("héllo", 2), Some(3));
    assert_eq!(byte_index("héllo", 5), Some(6));
    assert_eq!(byte_index("héllo", 6), None);
}

//! Tests for breadth-first search and the by-tag/id/class/attribute lookups.

use std::cell::Cell;

use grapnel_dom::{DomTree, Matcher, Node, NodeId, TagMatcher};

/// ```text
/// root
/// ├── A (p)
/// │   └── C (p)
/// └── B (p)
///     └── D (p)
/// ```
fn level_tree() -> (DomTree, NodeId, [NodeId; 4]) {
    let mut tree = DomTree::new();
    let root = tree.create_element("div");
    let a = tree.create_element("p");
    let b = tree.create_element("p");
    let c = tree.create_element("p");
    let d = tree.create_element("p");
    tree.append_child(root, a);
    tree.append_child(root, b);
    tree.append_child(a, c);
    tree.append_child(b, d);
    for (id, name) in [(a, "A"), (b, "B"), (c, "C"), (d, "D")] {
        tree.set_attribute(id, "id", name);
    }
    (tree, root, [a, b, c, d])
}

/// Accepts everything and counts how many nodes it was shown.
struct Counting<'a> {
    seen: &'a Cell<usize>,
    first_only: bool,
}

impl Matcher for Counting<'_> {
    fn validate(&self, _node: &Node) -> bool {
        self.seen.set(self.seen.get() + 1);
        true
    }

    fn first_only(&self) -> bool {
        self.first_only
    }

    fn set_first_only(&mut self, first_only: bool) {
        self.first_only = first_only;
    }
}

#[test]
fn test_results_are_level_ordered() {
    let (tree, root, [a, b, c, d]) = level_tree();
    assert_eq!(tree.all_by_tag(root, "p").unwrap(), vec![a, b, c, d]);
}

#[test]
fn test_search_includes_start_node() {
    let (tree, root, _) = level_tree();
    assert_eq!(tree.by_tag(root, "div").unwrap(), Some(root));
}

#[test]
fn test_search_is_scoped_to_subtree() {
    let (tree, _, [a, _, c, _]) = level_tree();
    assert_eq!(tree.all_by_tag(a, "p").unwrap(), vec![a, c]);
}

#[test]
fn test_first_only_stops_traversal() {
    let (tree, root, _) = level_tree();
    let seen = Cell::new(0);
    let found = tree.find_first(root, Counting {
        seen: &seen,
        first_only: false,
    });
    assert_eq!(found, Some(root));
    assert_eq!(seen.get(), 1);

    seen.set(0);
    let all = tree.search(root, &Counting {
        seen: &seen,
        first_only: false,
    });
    assert_eq!(all.len(), 5);
    assert_eq!(seen.get(), 5);
}

#[test]
fn test_by_id_literal_and_pattern() {
    let (tree, root, [a, b, c, d]) = level_tree();
    assert_eq!(tree.by_id(root, "C").unwrap(), Some(c));
    assert_eq!(tree.all_by_id(root, "[BD]").unwrap(), vec![b, d]);
    assert_eq!(tree.by_id(root, "A|D").unwrap(), Some(a));
}

#[test]
fn test_by_class_literal_requires_exact_value() {
    let mut tree = DomTree::new();
    let root = tree.create_element("div");
    let one = tree.create_element("span");
    let two = tree.create_element("span");
    tree.append_child(root, one);
    tree.append_child(root, two);
    tree.set_attribute(one, "class", "foo");
    tree.set_attribute(two, "class", "foobar");

    assert_eq!(tree.all_by_class(root, "foo").unwrap(), vec![one]);
    assert_eq!(tree.all_by_class(root, "fo*").unwrap(), vec![one, two]);
}

#[test]
fn test_by_attribute() {
    let mut tree = DomTree::new();
    let form = tree.create_element("form");
    let text = tree.create_element("input");
    let pass = tree.create_element("input");
    tree.append_child(form, text);
    tree.append_child(form, pass);
    tree.set_attribute(text, "type", "text");
    tree.set_attribute(pass, "type", "password");

    assert_eq!(tree.by_attribute(form, "type", "password").unwrap(), Some(pass));
    assert_eq!(
        tree.all_by_attribute(form, "type", "^(text|password)$").unwrap(),
        vec![text, pass]
    );
}

#[test]
fn test_no_match_is_empty_not_error() {
    let (tree, root, _) = level_tree();
    assert_eq!(tree.by_tag(root, "table").unwrap(), None);
    assert!(tree.all_by_class(root, "missing").unwrap().is_empty());
}

#[test]
fn test_malformed_pattern_is_an_error() {
    let (tree, root, _) = level_tree();
    let err = tree.all_by_tag(root, "p(").unwrap_err();
    assert_eq!(err.pattern, "p(");
    assert!(err.to_string().starts_with("invalid search pattern \"p(\""));
}

#[test]
fn test_tag_matcher_reused_for_both_modes() {
    let (tree, root, [a, ..]) = level_tree();
    let matcher = TagMatcher::new("p").unwrap();
    assert_eq!(tree.search(root, &matcher).len(), 4);
    assert_eq!(tree.find_first(root, matcher), Some(a));
}

//! Tests for tree mutation: append_child, remove_child, re-parenting and
//! element data setters.

use grapnel_dom::{Document, DomTree, NodeId, NodeKind, NodeRole};

/// Build `parent` with children tagged `tags`, returning their ids.
fn with_children(tree: &mut DomTree, parent: NodeId, tags: &[&str]) -> Vec<NodeId> {
    tags.iter()
        .map(|tag| {
            let child = tree.create_element(tag);
            tree.append_child(parent, child);
            child
        })
        .collect()
}

// ========== append_child ==========

#[test]
fn test_append_preserves_order() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    let items = with_children(&mut tree, ul, &["li", "li", "li"]);

    assert_eq!(tree.children(ul), items.as_slice());
    assert_eq!(tree.first_child(ul), Some(items[0]));
    assert_eq!(tree.last_child(ul), Some(items[2]));
    for &item in &items {
        assert_eq!(tree.parent(item), Some(ul));
    }
}

#[test]
fn test_append_moves_node_between_parents() {
    let mut tree = DomTree::new();
    let root = tree.create_element("div");
    let left = tree.create_element("section");
    let right = tree.create_element("section");
    tree.append_child(root, left);
    tree.append_child(root, right);
    let moved = with_children(&mut tree, left, &["p", "span", "em"])[1];

    tree.append_child(right, moved);

    assert_eq!(tree.parent(moved), Some(right));
    assert_eq!(tree.children(right), &[moved]);
    assert_eq!(tree.children(left).len(), 2);
    assert!(!tree.children(left).contains(&moved));
    // The old neighbours now point at each other.
    let (p, em) = (tree.children(left)[0], tree.children(left)[1]);
    assert_eq!(tree.next_sibling(p), Some(em));
    assert_eq!(tree.prev_sibling(em), Some(p));
}

#[test]
fn test_node_has_single_owner() {
    let mut tree = DomTree::new();
    let a = tree.create_element("div");
    let b = tree.create_element("div");
    let child = tree.create_element("p");

    tree.append_child(a, child);
    tree.append_child(b, child);
    tree.append_child(b, child);

    assert!(tree.children(a).is_empty());
    assert_eq!(tree.children(b), &[child]);
}

#[test]
fn test_append_with_unknown_id_is_ignored() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.append_child(div, NodeId(99));
    tree.append_child(NodeId(99), div);
    assert!(tree.children(div).is_empty());
    assert_eq!(tree.parent(div), None);
}

// ========== remove_child ==========

#[test]
fn test_remove_middle_child_relinks_neighbours() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let kids = with_children(&mut tree, parent, &["a", "b", "c"]);

    tree.remove_child(parent, kids[1]);

    assert_eq!(tree.children(parent), &[kids[0], kids[2]]);
    assert_eq!(tree.next_sibling(kids[0]), Some(kids[2]));
    assert_eq!(tree.prev_sibling(kids[2]), Some(kids[0]));
    assert_eq!(tree.parent(kids[1]), None);
    assert_eq!(tree.prev_sibling(kids[1]), None);
    assert_eq!(tree.next_sibling(kids[1]), None);
}

#[test]
fn test_remove_first_and_last() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let kids = with_children(&mut tree, parent, &["a", "b", "c"]);

    tree.remove_child(parent, kids[0]);
    assert_eq!(tree.first_child(parent), Some(kids[1]));
    assert_eq!(tree.prev_sibling(kids[1]), None);

    tree.remove_child(parent, kids[2]);
    assert_eq!(tree.last_child(parent), Some(kids[1]));
    assert_eq!(tree.next_sibling(kids[1]), None);
}

#[test]
fn test_remove_non_child_is_noop() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let other = tree.create_element("div");
    let kids = with_children(&mut tree, parent, &["a", "b"]);

    tree.remove_child(other, kids[0]);

    assert_eq!(tree.children(parent), kids.as_slice());
    assert_eq!(tree.parent(kids[0]), Some(parent));
}

#[test]
fn test_removed_node_can_be_reattached() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let kids = with_children(&mut tree, parent, &["a", "b"]);

    tree.remove_child(parent, kids[0]);
    tree.append_child(parent, kids[0]);

    assert_eq!(tree.children(parent), &[kids[1], kids[0]]);
    assert_eq!(tree.next_sibling(kids[1]), Some(kids[0]));
    assert_eq!(tree.prev_sibling(kids[0]), Some(kids[1]));
}

// ========== ancestry ==========

#[test]
fn test_ancestors_walk_to_root() {
    let mut tree = DomTree::new();
    let html = tree.create_element("html");
    let body = with_children(&mut tree, html, &["body"])[0];
    let p = with_children(&mut tree, body, &["p"])[0];

    assert_eq!(tree.ancestors(p).collect::<Vec<_>>(), vec![body, html]);
    assert!(tree.is_descendant_of(p, html));
    assert!(!tree.is_descendant_of(html, p));
}

#[test]
fn test_deep_chain_of_appends() {
    const DEPTH: usize = 100_000;
    let mut tree = DomTree::new();
    let root = tree.create_element("div");
    let mut parent = root;
    for _ in 1..DEPTH {
        let child = tree.create_element("div");
        tree.append_child(parent, child);
        parent = child;
    }
    assert_eq!(tree.len(), DEPTH);
    assert_eq!(tree.depth(parent), DEPTH - 1);

    // A subtree still cannot be moved beneath its own descendant.
    tree.append_child(parent, root);
    assert_eq!(tree.parent(root), None);
}

// ========== element data ==========

#[test]
fn test_remove_attribute() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let link = with_children(&mut tree, div, &["a"])[0];
    tree.set_attribute(link, "rel", "next");
    let mut doc = Document::from_tree(tree, Some(div));
    assert_eq!(doc.by_attribute("rel", "next").unwrap(), Some(link));

    assert_eq!(
        doc.tree_mut().remove_attribute(link, "rel"),
        Some("next".to_string())
    );
    assert_eq!(doc.tree_mut().remove_attribute(link, "rel"), None);
    assert_eq!(doc.tree().attribute(link, "rel"), None);
    assert_eq!(doc.by_attribute("rel", "next").unwrap(), None);
}

#[test]
fn test_set_tag_name_keeps_kind_and_role() {
    let mut tree = DomTree::new();
    let form = tree.create_element("form");
    tree.set_tag_name(form, "SECTION");

    assert_eq!(tree.tag_name(form), "section");
    assert_eq!(tree.kind(form), Some(NodeKind::Normal));
    assert_eq!(tree.role(form), Some(NodeRole::Form));

    let br = tree.create_element("br");
    tree.set_tag_name(br, "Span");
    assert_eq!(tree.tag_name(br), "span");
    assert_eq!(tree.kind(br), Some(NodeKind::Void));
}

#[test]
fn test_set_kind_overrides_table() {
    let mut tree = DomTree::new();
    let widget = tree.create_element("x-widget");
    assert_eq!(tree.kind(widget), Some(NodeKind::Normal));

    tree.set_kind(widget, NodeKind::Foreign);
    assert_eq!(tree.kind(widget), Some(NodeKind::Foreign));
    assert_eq!(tree.tag_name(widget), "x-widget");
}

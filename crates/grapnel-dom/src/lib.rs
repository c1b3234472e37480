//! Markup tree implementation for grapnel.
//!
//! This crate provides an arena-based element tree, a pattern-aware search
//! engine over it, and the [`Document`] facade handed to callers once a token
//! stream has been turned into a tree.
//!
//! # Design
//!
//! Every node lives in one [`DomTree`] arena and is addressed by a [`NodeId`].
//! Children are an ordered list of ids owned by the parent; the parent and
//! sibling links are plain ids as well, so no node ever has a second owner
//! and the whole tree is freed at once.

mod document;
mod form;
mod kind;
mod matcher;
mod query;
mod serialize;

pub use document::Document;
pub use form::{Form, FormMut};
pub use kind::{NodeKind, NodeRole};
pub use matcher::{AttributeMatcher, Criterion, Matcher, PatternError, TagMatcher, is_pattern};
pub use serialize::write_node;

use grapnel_common::warning::warn_once;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One element of the tree.
///
/// The structural links (`parent`, `children`, siblings) are only changed
/// through [`DomTree::append_child`] and [`DomTree::remove_child`], which keep
/// them consistent with each other.
#[derive(Debug, Clone)]
pub struct Node {
    /// Lower-cased tag name. Empty for a text-only pseudo-node.
    pub tag_name: String,
    /// Attributes, unordered.
    pub attrs: AttributesMap,
    /// Character data directly inside this element, excluding descendants.
    pub content: String,
    /// How this element nests.
    pub kind: NodeKind,
    /// Specialized role, chosen once from the tag name at creation.
    pub role: NodeRole,

    parent: Option<NodeId>,
    children: Vec<NodeId>,
    next_sibling: Option<NodeId>,
    prev_sibling: Option<NodeId>,
}

impl Node {
    /// Create a detached element, classifying it from its tag name.
    #[must_use]
    pub fn element(tag_name: &str) -> Self {
        let tag_name = tag_name.to_ascii_lowercase();
        Self {
            kind: NodeKind::for_tag(&tag_name),
            role: NodeRole::for_tag(&tag_name),
            tag_name,
            attrs: AttributesMap::new(),
            content: String::new(),
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }

    /// Attribute value, if present.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// The parent of this node, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-based element tree with O(1) node access and traversal.
///
/// Nodes are never freed individually: a removed node stays in the arena,
/// detached, and may be appended somewhere else later.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    ///
    /// Structural links are not reachable through this reference.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes allocated, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            ..node
        });
        id
    }

    /// Allocate a detached element for `tag_name`.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(Node::element(tag_name))
    }

    // ===== structure =====

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is detached from it first, so moving
    /// a node around the tree is always safe. Appending a node under itself or
    /// one of its own descendants would create a cycle and is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        // A childless node has no descendants to close a cycle through.
        let has_children = !self.nodes[child.0].children.is_empty();
        if parent == child || (has_children && self.is_descendant_of(parent, child)) {
            warn_once("DOM", "refusing to append a node beneath itself");
            return;
        }

        // STEP 1: Detach from the current parent, if any.
        if let Some(old_parent) = self.nodes[child.0].parent {
            self.remove_child(old_parent, child);
        }

        // STEP 2: Link to the current last child.
        let prev_last_child = self.nodes[parent.0].children.last().copied();
        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }

        // STEP 3: Append and point back at the parent.
        self.nodes[parent.0].children.push(child);
        let node = &mut self.nodes[child.0];
        node.prev_sibling = prev_last_child;
        node.next_sibling = None;
        node.parent = Some(parent);
    }

    /// Remove `child` from `parent`'s children.
    ///
    /// The former neighbours of `child` are linked to each other and `child`
    /// is left detached with no parent or siblings. Does nothing if `child` is
    /// not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(index) = self
            .get(parent)
            .and_then(|p| p.children.iter().position(|&c| c == child))
        else {
            return;
        };

        let _ = self.nodes[parent.0].children.remove(index);

        let prev = self.nodes[child.0].prev_sibling.take();
        let next = self.nodes[child.0].next_sibling.take();
        self.nodes[child.0].parent = None;

        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = next;
        }
        if let Some(next_id) = next {
            self.nodes[next_id.0].prev_sibling = prev;
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Number of ancestors above a node.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    // ===== element data =====

    /// Tag name of a node, or `""` for an unknown id.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> &str {
        self.get(id).map_or("", |n| n.tag_name.as_str())
    }

    /// Rename a node. Its kind and role are left as they are.
    pub fn set_tag_name(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.get_mut(id) {
            node.tag_name = name.to_ascii_lowercase();
        }
    }

    /// Attribute value of a node, if present.
    #[must_use]
    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id).and_then(|n| n.attribute(key))
    }

    /// All attributes of a node.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> Option<&AttributesMap> {
        self.get(id).map(|n| &n.attrs)
    }

    /// Set (or replace) an attribute.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: &str) {
        if let Some(node) = self.get_mut(id) {
            let _ = node.attrs.insert(key.to_string(), value.to_string());
        }
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) -> Option<String> {
        self.get_mut(id).and_then(|n| n.attrs.remove(key))
    }

    /// Text directly inside a node, or `""` for an unknown id.
    #[must_use]
    pub fn content(&self, id: NodeId) -> &str {
        self.get(id).map_or("", |n| n.content.as_str())
    }

    /// Replace the text directly inside a node.
    pub fn set_content(&mut self, id: NodeId, content: &str) {
        if let Some(node) = self.get_mut(id) {
            content.clone_into(&mut node.content);
        }
    }

    /// Nesting kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|n| n.kind)
    }

    /// Override the nesting kind of a node.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        if let Some(node) = self.get_mut(id) {
            node.kind = kind;
        }
    }

    /// Specialized role of a node.
    #[must_use]
    pub fn role(&self, id: NodeId) -> Option<NodeRole> {
        self.get(id).map(|n| n.role)
    }

    /// One-line description: `<tag k="v"> parent: tag`.
    #[must_use]
    pub fn describe(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };

        let mut keys: Vec<&String> = node.attrs.keys().collect();
        keys.sort();

        let mut out = format!("<{}", node.tag_name);
        for key in keys {
            let _ = write!(out, " {key}=\"{}\"", node.attrs[key]);
        }
        out.push_str("> parent: ");
        match node.parent {
            Some(parent) => out.push_str(self.tag_name(parent)),
            None => out.push_str("none"),
        }
        out
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Print a tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut stack = vec![(id, indent)];
    while let Some((id, indent)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let prefix = "  ".repeat(indent);
        println!("{prefix}{}", tree.describe(id));
        if !node.content.is_empty() {
            let display = node.content.replace('\n', "\\n").replace(' ', "\u{00B7}");
            println!("{prefix}  \"{display}\"");
        }
        for &child in node.children.iter().rev() {
            stack.push((child, indent + 1));
        }
    }
}

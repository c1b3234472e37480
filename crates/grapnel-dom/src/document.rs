//! Document - the handle callers get once a tree has been built.

use grapnel_common::url::{is_absolute, resolve_url};

use crate::matcher::{AttributeMatcher, Matcher, PatternError, TagMatcher};
use crate::{DomTree, NodeId};

/// A parsed document: the node arena, its root, and where it came from.
///
/// A document with no root (nothing built yet) answers every query with no
/// results.
#[derive(Debug, Clone, Default)]
pub struct Document {
    tree: DomTree,
    root: Option<NodeId>,
    url: Option<String>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing tree.
    #[must_use]
    pub const fn from_tree(tree: DomTree, root: Option<NodeId>) -> Self {
        Self {
            tree,
            root,
            url: None,
        }
    }

    /// The root element, if any.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `id` the root element.
    pub const fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Access the tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the tree mutably.
    pub const fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// URL the document was loaded from.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Record the URL the document was loaded from.
    pub fn set_url(&mut self, url: &str) {
        self.url = Some(url.to_string());
    }

    // ===== queries =====

    /// Run `matcher` over the whole document.
    pub fn search<M: Matcher + ?Sized>(&self, matcher: &M) -> Vec<NodeId> {
        self.root
            .map(|root| self.tree.search(root, matcher))
            .unwrap_or_default()
    }

    /// First node in the document that `matcher` accepts.
    pub fn find_first<M: Matcher>(&self, matcher: M) -> Option<NodeId> {
        self.root
            .and_then(|root| self.tree.find_first(root, matcher))
    }

    /// First element whose tag matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `tag` is a malformed pattern.
    pub fn by_tag(&self, tag: &str) -> Result<Option<NodeId>, PatternError> {
        Ok(self.find_first(TagMatcher::new(tag)?))
    }

    /// All elements whose tag matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `tag` is a malformed pattern.
    pub fn all_by_tag(&self, tag: &str) -> Result<Vec<NodeId>, PatternError> {
        Ok(self.search(&TagMatcher::new(tag)?))
    }

    /// First element whose `id` matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `id` is a malformed pattern.
    pub fn by_id(&self, id: &str) -> Result<Option<NodeId>, PatternError> {
        Ok(self.find_first(AttributeMatcher::id(id)?))
    }

    /// All elements whose `id` matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `id` is a malformed pattern.
    pub fn all_by_id(&self, id: &str) -> Result<Vec<NodeId>, PatternError> {
        Ok(self.search(&AttributeMatcher::id(id)?))
    }

    /// First element whose `class` matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `class` is a malformed pattern.
    pub fn by_class(&self, class: &str) -> Result<Option<NodeId>, PatternError> {
        Ok(self.find_first(AttributeMatcher::class(class)?))
    }

    /// All elements whose `class` matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `class` is a malformed pattern.
    pub fn all_by_class(&self, class: &str) -> Result<Vec<NodeId>, PatternError> {
        Ok(self.search(&AttributeMatcher::class(class)?))
    }

    /// First element whose attribute `name` matches `value`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `value` is a malformed pattern.
    pub fn by_attribute(&self, name: &str, value: &str) -> Result<Option<NodeId>, PatternError> {
        Ok(self.find_first(AttributeMatcher::new(name, value)?))
    }

    /// All elements whose attribute `name` matches `value`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `value` is a malformed pattern.
    pub fn all_by_attribute(&self, name: &str, value: &str) -> Result<Vec<NodeId>, PatternError> {
        Ok(self.search(&AttributeMatcher::new(name, value)?))
    }

    /// Every `<form>` in the document.
    #[must_use]
    pub fn forms(&self) -> Vec<NodeId> {
        self.search(&TagMatcher::literal("form"))
    }

    // ===== rewriting =====

    /// Rewrite relative `<a href>` values against the document URL, so a
    /// saved copy still links back to the live site. Does nothing when the
    /// URL is unknown.
    pub fn absolutize_links(&mut self) {
        let Some(base) = self.url.clone() else {
            return;
        };

        for link in self.search(&TagMatcher::literal("a")) {
            let Some(href) = self.tree.attribute(link, "href") else {
                continue;
            };
            if href.is_empty() || is_absolute(href) {
                continue;
            }
            let resolved = resolve_url(href, Some(&base));
            tracing::trace!(%resolved, "absolutized link");
            self.tree.set_attribute(link, "href", &resolved);
        }
    }
}

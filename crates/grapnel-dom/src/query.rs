//! Breadth-first search.
//!
//! Every by-tag, by-id, by-class and by-attribute lookup runs through
//! [`DomTree::search`]; they differ only in the matcher they build. Results
//! come back in level order, left to right within a level.

use std::collections::VecDeque;

use crate::matcher::{AttributeMatcher, Matcher, PatternError, TagMatcher};
use crate::{DomTree, NodeId};

impl DomTree {
    /// Collect every node under (and including) `root` that `matcher`
    /// accepts, stopping after the first one if the matcher is first-only.
    pub fn search<M: Matcher + ?Sized>(&self, root: NodeId, matcher: &M) -> Vec<NodeId> {
        let mut results = Vec::new();
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.get(current) else {
                continue;
            };

            if matcher.validate(node) {
                results.push(current);
                if matcher.first_only() {
                    break;
                }
            }
            queue.extend(node.children().iter().copied());
        }

        results
    }

    /// First node in breadth-first order that `matcher` accepts.
    pub fn find_first<M: Matcher>(&self, root: NodeId, mut matcher: M) -> Option<NodeId> {
        matcher.set_first_only(true);
        self.search(root, &matcher).first().copied()
    }

    /// First element under `root` whose tag matches `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `tag` is a malformed pattern.
    pub fn by_tag(&self, root: NodeId, tag: &str) -> Result<Option<NodeId>, PatternError> {
        Ok(self.find_first(root, TagMatcher::new(tag)?))
    }

    /// All elements under `root` whose tag matches `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `tag` is a malformed pattern.
    pub fn all_by_tag(&self, root: NodeId, tag: &str) -> Result<Vec<NodeId>, PatternError> {
        Ok(self.search(root, &TagMatcher::new(tag)?))
    }

    /// First element under `root` whose `id` matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `id` is a malformed pattern.
    pub fn by_id(&self, root: NodeId, id: &str) -> Result<Option<NodeId>, PatternError> {
        Ok(self.find_first(root, AttributeMatcher::id(id)?))
    }

    /// All elements under `root` whose `id` matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `id` is a malformed pattern.
    pub fn all_by_id(&self, root: NodeId, id: &str) -> Result<Vec<NodeId>, PatternError> {
        Ok(self.search(root, &AttributeMatcher::id(id)?))
    }

    /// First element under `root` whose `class` matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `class` is a malformed pattern.
    pub fn by_class(&self, root: NodeId, class: &str) -> Result<Option<NodeId>, PatternError> {
        Ok(self.find_first(root, AttributeMatcher::class(class)?))
    }

    /// All elements under `root` whose `class` matches.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `class` is a malformed pattern.
    pub fn all_by_class(&self, root: NodeId, class: &str) -> Result<Vec<NodeId>, PatternError> {
        Ok(self.search(root, &AttributeMatcher::class(class)?))
    }

    /// First element under `root` whose attribute `name` matches `value`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `value` is a malformed pattern.
    pub fn by_attribute(
        &self,
        root: NodeId,
        name: &str,
        value: &str,
    ) -> Result<Option<NodeId>, PatternError> {
        Ok(self.find_first(root, AttributeMatcher::new(name, value)?))
    }

    /// All elements under `root` whose attribute `name` matches `value`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `value` is a malformed pattern.
    pub fn all_by_attribute(
        &self,
        root: NodeId,
        name: &str,
        value: &str,
    ) -> Result<Vec<NodeId>, PatternError> {
        Ok(self.search(root, &AttributeMatcher::new(name, value)?))
    }
}

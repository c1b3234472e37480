//! Node predicates used by the search engine.
//!
//! A criterion is either a literal, compared for exact equality, or a regular
//! expression, searched for anywhere in the subject. Which one is decided by
//! the text itself: any regex metacharacter switches to pattern mode.

use regex::Regex;
use thiserror::Error;

use crate::Node;

/// Characters that turn a criterion into a pattern.
const PATTERN_CHARS: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$',
];

/// Returns true if `text` would be compiled as a pattern.
#[must_use]
pub fn is_pattern(text: &str) -> bool {
    text.contains(PATTERN_CHARS)
}

/// A search criterion could not be compiled.
#[derive(Debug, Clone, Error)]
#[error("invalid search pattern {pattern:?}: {source}")]
pub struct PatternError {
    /// The criterion as given.
    pub pattern: String,
    /// What the regex engine rejected.
    #[source]
    pub source: regex::Error,
}

/// Literal text or a compiled pattern.
#[derive(Debug, Clone)]
pub enum Criterion {
    /// Matches only the identical string.
    Literal(String),
    /// Matches any string the pattern is found in.
    Pattern(Regex),
}

impl Criterion {
    /// Classify and, if needed, compile `text`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `text` contains metacharacters but is not a
    /// valid regular expression.
    pub fn new(text: &str) -> Result<Self, PatternError> {
        if !is_pattern(text) {
            return Ok(Self::Literal(text.to_string()));
        }
        Regex::new(text)
            .map(Self::Pattern)
            .map_err(|source| PatternError {
                pattern: text.to_string(),
                source,
            })
    }

    /// Test a subject string.
    #[must_use]
    pub fn is_match(&self, subject: &str) -> bool {
        match self {
            Self::Literal(text) => text == subject,
            Self::Pattern(regex) => regex.is_match(subject),
        }
    }
}

/// A predicate over nodes, plus the first-only flag read by the traversal.
pub trait Matcher {
    /// Does `node` satisfy this matcher?
    fn validate(&self, node: &Node) -> bool;

    /// Stop the search at the first match.
    fn first_only(&self) -> bool;

    /// Set by the "find first" entry points.
    fn set_first_only(&mut self, first_only: bool);
}

/// Matches on tag name.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    criterion: Criterion,
    first_only: bool,
}

impl TagMatcher {
    /// Build a matcher for `tag`, e.g. `"menu"` or `"select|input"`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for a malformed pattern.
    pub fn new(tag: &str) -> Result<Self, PatternError> {
        Ok(Self {
            criterion: Criterion::new(tag)?,
            first_only: false,
        })
    }

    /// Exact tag-name matcher, never compiled as a pattern.
    #[must_use]
    pub fn literal(tag: &str) -> Self {
        Self {
            criterion: Criterion::Literal(tag.to_string()),
            first_only: false,
        }
    }
}

impl Matcher for TagMatcher {
    fn validate(&self, node: &Node) -> bool {
        self.criterion.is_match(&node.tag_name)
    }

    fn first_only(&self) -> bool {
        self.first_only
    }

    fn set_first_only(&mut self, first_only: bool) {
        self.first_only = first_only;
    }
}

/// Matches on the value of one attribute. A missing attribute reads as `""`.
#[derive(Debug, Clone)]
pub struct AttributeMatcher {
    key: String,
    criterion: Criterion,
    first_only: bool,
}

impl AttributeMatcher {
    /// Build a matcher for `key` whose value matches `value`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for a malformed pattern.
    pub fn new(key: &str, value: &str) -> Result<Self, PatternError> {
        Ok(Self {
            key: key.to_string(),
            criterion: Criterion::new(value)?,
            first_only: false,
        })
    }

    /// Matcher on the `id` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for a malformed pattern.
    pub fn id(id: &str) -> Result<Self, PatternError> {
        Self::new("id", id)
    }

    /// Matcher on the `class` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for a malformed pattern.
    pub fn class(class: &str) -> Result<Self, PatternError> {
        Self::new("class", class)
    }
}

impl Matcher for AttributeMatcher {
    fn validate(&self, node: &Node) -> bool {
        self.criterion
            .is_match(node.attribute(&self.key).unwrap_or_default())
    }

    fn first_only(&self) -> bool {
        self.first_only
    }

    fn set_first_only(&mut self, first_only: bool) {
        self.first_only = first_only;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with(tag: &str, attrs: &[(&str, &str)]) -> Node {
        let mut node = Node::element(tag);
        for (k, v) in attrs {
            let _ = node.attrs.insert((*k).to_string(), (*v).to_string());
        }
        node
    }

    #[test]
    fn test_metacharacters_select_pattern_mode() {
        for text in ["a.b", "a+", "fo*", "x?", "(a)", "a|b", "[ab]", "a{2}", "^a", "a$", "a\\d"] {
            assert!(is_pattern(text), "{text}");
        }
        for text in ["menu", "search-box", "info_container", "a b", "q=1"] {
            assert!(!is_pattern(text), "{text}");
        }
    }

    #[test]
    fn test_literal_class_requires_equality() {
        let matcher = AttributeMatcher::class("foo").unwrap();
        assert!(matcher.validate(&node_with("div", &[("class", "foo")])));
        assert!(!matcher.validate(&node_with("div", &[("class", "foobar")])));
        assert!(!matcher.validate(&node_with("div", &[])));
    }

    #[test]
    fn test_pattern_class_searches_substring() {
        let matcher = AttributeMatcher::class("fo*").unwrap();
        assert!(matcher.validate(&node_with("div", &[("class", "foobar")])));
        assert!(matcher.validate(&node_with("div", &[("class", "big fox")])));
        assert!(!matcher.validate(&node_with("div", &[("class", "bar")])));
    }

    #[test]
    fn test_missing_attribute_reads_as_empty() {
        let matcher = AttributeMatcher::new("value", "").unwrap();
        assert!(matcher.validate(&node_with("input", &[])));
    }

    #[test]
    fn test_tag_pattern_is_unanchored() {
        let matcher = TagMatcher::new("menu*").unwrap();
        assert!(matcher.validate(&node_with("menu", &[])));
        assert!(matcher.validate(&node_with("menuitem", &[])));
        assert!(!matcher.validate(&node_with("nav", &[])));

        let literal = TagMatcher::new("menu").unwrap();
        assert!(!literal.validate(&node_with("menuitem", &[])));
        assert!(TagMatcher::literal("a.b").validate(&node_with("a.b", &[])));
    }

    #[test]
    fn test_malformed_pattern_is_rejected() {
        let err = TagMatcher::new("div[").unwrap_err();
        assert_eq!(err.pattern, "div[");
        assert!(AttributeMatcher::id("(unclosed").is_err());
    }

    #[test]
    fn test_first_only_flag() {
        let mut matcher = TagMatcher::new("p").unwrap();
        assert!(!matcher.first_only());
        matcher.set_first_only(true);
        assert!(matcher.first_only());
    }
}

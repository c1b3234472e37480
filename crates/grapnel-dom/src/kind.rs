//! Tag classification.
//!
//! Both tables are fixed: they are `match` expressions over the tag name and
//! are never mutated at runtime.

use strum_macros::{Display, EnumString};

/// How an element nests, which decides whether the tree builder may descend
/// into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum NodeKind {
    /// Never has children (`br`, `img`, `input`, ...).
    Void,
    /// Text is taken literally, no markup inside (`script`, `style`).
    RawText,
    /// Text may contain character references but no markup (`textarea`, `title`).
    EscapableRawText,
    /// Content from another vocabulary. Reserved, nothing maps here yet.
    Foreign,
    /// Everything else.
    Normal,
}

impl NodeKind {
    /// Classify a lower-cased tag name.
    #[must_use]
    pub fn for_tag(tag_name: &str) -> Self {
        match tag_name {
            "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "keygen"
            | "link" | "menuitem" | "meta" | "param" | "source" | "track" | "wbr" => Self::Void,
            // The empty name is the text-only pseudo-node.
            "" | "script" | "style" => Self::RawText,
            "textarea" | "title" => Self::EscapableRawText,
            _ => Self::Normal,
        }
    }

    /// Only normal elements become the builder's insertion point.
    #[must_use]
    pub const fn can_hold_children(self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Specialized behaviour attached to a node at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NodeRole {
    /// Plain element.
    Element,
    /// `<form>`: exposes field helpers, see [`crate::Form`].
    Form,
    /// `<input>`.
    Input,
}

impl NodeRole {
    /// Pick the role for a lower-cased tag name.
    #[must_use]
    pub fn for_tag(tag_name: &str) -> Self {
        match tag_name {
            "form" => Self::Form,
            "input" => Self::Input,
            _ => Self::Element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_void_tags() {
        for tag in [
            "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link",
            "menuitem", "meta", "param", "source", "track", "wbr",
        ] {
            assert_eq!(NodeKind::for_tag(tag), NodeKind::Void, "{tag}");
        }
    }

    #[test]
    fn test_raw_text_tags() {
        assert_eq!(NodeKind::for_tag("script"), NodeKind::RawText);
        assert_eq!(NodeKind::for_tag("style"), NodeKind::RawText);
        assert_eq!(NodeKind::for_tag(""), NodeKind::RawText);
        assert_eq!(NodeKind::for_tag("textarea"), NodeKind::EscapableRawText);
        assert_eq!(NodeKind::for_tag("title"), NodeKind::EscapableRawText);
    }

    #[test]
    fn test_everything_else_is_normal() {
        assert_eq!(NodeKind::for_tag("div"), NodeKind::Normal);
        assert_eq!(NodeKind::for_tag("svg"), NodeKind::Normal);
        assert!(NodeKind::Normal.can_hold_children());
        assert!(!NodeKind::RawText.can_hold_children());
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(NodeKind::EscapableRawText.to_string(), "escapable-raw-text");
        assert_eq!(NodeKind::from_str("void"), Ok(NodeKind::Void));
        assert_eq!(NodeRole::Form.to_string(), "form");
    }

    #[test]
    fn test_roles() {
        assert_eq!(NodeRole::for_tag("form"), NodeRole::Form);
        assert_eq!(NodeRole::for_tag("input"), NodeRole::Input);
        assert_eq!(NodeRole::for_tag("select"), NodeRole::Element);
    }
}

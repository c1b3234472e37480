//! Tree construction.
//!
//! The builder keeps a single cursor, `current_parent`, instead of a stack of
//! open elements. Start tags for normal elements descend into the new node,
//! end tags climb one level whatever their name, and text overwrites the
//! content of the node it lands on. Nothing is ever reparented or closed
//! implicitly, so malformed input yields a deterministic, if odd, tree.

use std::ops::ControlFlow;

use grapnel_common::warning::warn_once;
use grapnel_dom::{Document, NodeId, NodeKind};
use strum_macros::Display;

use crate::tokenizer::{Attribute, Token};

/// Builder-level settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Deepest level the cursor may descend to, the root being level 0.
    /// Start tags beyond it are still added, as leaves. `None` means no cap.
    pub max_depth: Option<usize>,
}

/// Something odd in the token stream that the builder worked around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIssue {
    /// What happened.
    pub message: String,
    /// Index into the token stream where it happened.
    pub token_index: usize,
}

/// The kind of the last token handled, which decides where text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum Event {
    StartTag,
    SelfClosingTag,
    EndTag,
    Text,
}

/// Turns a token stream into a [`Document`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    options: BuilderOptions,
    document: Document,

    /// Where new elements are appended.
    current_parent: Option<NodeId>,

    /// Depth of `current_parent`, the root being 0.
    cursor_depth: usize,

    /// The element created by the most recent start or self-closing tag.
    last_created: Option<NodeId>,

    last_event: Option<Event>,

    /// Position in the token stream, for issue reports.
    token_index: usize,

    /// Set once an end-of-stream or error token has been seen.
    stopped: bool,

    issues: Vec<BuildIssue>,
}

impl TreeBuilder {
    /// Create a builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given options.
    #[must_use]
    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The node new elements are currently appended to.
    #[must_use]
    pub const fn current_parent(&self) -> Option<NodeId> {
        self.current_parent
    }

    /// True once a terminating token has been processed.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Issues recorded so far.
    #[must_use]
    pub fn issues(&self) -> &[BuildIssue] {
        &self.issues
    }

    /// Consume tokens until the stream ends or a terminating token arrives,
    /// and return the document built so far.
    #[must_use]
    pub fn build<I: IntoIterator<Item = Token>>(self, tokens: I) -> Document {
        self.build_with_issues(tokens).0
    }

    /// Like [`TreeBuilder::build`], also returning the issues encountered.
    #[must_use]
    pub fn build_with_issues<I: IntoIterator<Item = Token>>(
        mut self,
        tokens: I,
    ) -> (Document, Vec<BuildIssue>) {
        for token in tokens {
            if self.process_token(token).is_break() {
                break;
            }
        }
        if !self.stopped {
            tracing::debug!("token source ran dry without an end-of-stream token");
        }
        self.finish_with_issues()
    }

    /// Hand over the document.
    #[must_use]
    pub fn finish(self) -> Document {
        self.finish_with_issues().0
    }

    /// Hand over the document and the issues encountered.
    #[must_use]
    pub fn finish_with_issues(self) -> (Document, Vec<BuildIssue>) {
        tracing::debug!(
            nodes = self.document.tree().len(),
            issues = self.issues.len(),
            "tree built"
        );
        (self.document, self.issues)
    }

    /// Feed one token. Returns `Break` once the stream is finished; tokens
    /// after that are ignored.
    pub fn process_token(&mut self, token: Token) -> ControlFlow<()> {
        if self.stopped {
            return ControlFlow::Break(());
        }
        tracing::trace!(index = self.token_index, %token, "process token");

        match token {
            Token::StartTag { name, attributes } => {
                self.handle_start_tag(&name, &attributes, Event::StartTag);
            }
            Token::SelfClosingTag { name, attributes } => {
                self.handle_start_tag(&name, &attributes, Event::SelfClosingTag);
            }
            Token::EndTag { name } => self.handle_end_tag(&name),
            Token::Text { data } => self.handle_text(&data),
            Token::EndOfStream => self.stopped = true,
            Token::Error { message } => {
                self.parse_warning(&format!("token source failed: {message}"));
                self.stopped = true;
            }
        }
        self.token_index += 1;

        if self.stopped {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Start and self-closing tags.
    ///
    /// The first element becomes the root and the cursor whatever its kind.
    /// After that, an element is appended to the cursor and, if it is a
    /// normal element opened by a plain start tag, becomes the cursor.
    fn handle_start_tag(&mut self, name: &str, attributes: &[Attribute], event: Event) {
        let tree = self.document.tree_mut();
        let node = tree.create_element(name);
        for attr in attributes {
            if tree.attribute(node, &attr.name).is_none() {
                tree.set_attribute(node, &attr.name, &attr.value);
            }
        }
        self.last_created = Some(node);
        self.last_event = Some(event);

        let Some(parent) = self.current_parent else {
            tracing::debug!(tag = name, "root element");
            self.document.set_root(node);
            self.current_parent = Some(node);
            self.cursor_depth = 0;
            return;
        };

        let tree = self.document.tree_mut();
        tree.append_child(parent, node);

        let descends =
            event == Event::StartTag && tree.kind(node).is_some_and(NodeKind::can_hold_children);
        if !descends {
            return;
        }
        let depth = self.cursor_depth + 1;
        if self.options.max_depth.is_some_and(|max| depth > max) {
            self.parse_warning(&format!(
                "<{name}> at depth {depth} exceeds the maximum depth; kept as a leaf"
            ));
            return;
        }
        self.current_parent = Some(node);
        self.cursor_depth = depth;
    }

    /// End tags climb one level. The name is not checked against the cursor.
    fn handle_end_tag(&mut self, name: &str) {
        self.last_event = Some(Event::EndTag);
        let Some(current) = self.current_parent else {
            tracing::trace!(tag = name, "end tag before any element");
            return;
        };

        let tree = self.document.tree();
        if let Some(parent) = tree.parent(current) {
            self.current_parent = Some(parent);
            self.cursor_depth = self.cursor_depth.saturating_sub(1);
        } else if tree.tag_name(current) == name {
            tracing::trace!(tag = name, "root element closed");
        } else {
            self.parse_warning(&format!("stray end tag </{name}> at the root"));
        }
    }

    /// Text right after a start tag belongs to the element just created;
    /// anywhere else it belongs to the cursor. Either way it replaces what
    /// was there.
    fn handle_text(&mut self, data: &str) {
        let target = if self.last_event == Some(Event::StartTag) {
            self.last_created
        } else {
            self.current_parent
        };
        self.last_event = Some(Event::Text);

        match target {
            Some(node) => self.document.tree_mut().set_content(node, data),
            None if data.trim().is_empty() => {}
            None => self.parse_warning("text before the first element dropped"),
        }
    }

    /// Record an issue and log it once.
    fn parse_warning(&mut self, message: &str) {
        warn_once("Tree Builder", message);
        self.issues.push(BuildIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }
}

use core::fmt;

/// An attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased attribute name.
    pub name: String,
    /// Attribute value with character references decoded.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// One event in the stream handed to the tree builder.
///
/// Any source that produces these, terminated by [`Token::EndOfStream`] or
/// [`Token::Error`], can drive a [`crate::TreeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr="value">`
    StartTag {
        /// Lower-cased tag name.
        name: String,
        /// Attributes in source order, first occurrence of each name only.
        attributes: Vec<Attribute>,
    },

    /// `<name attr="value" />`
    SelfClosingTag {
        /// Lower-cased tag name.
        name: String,
        /// Attributes in source order, first occurrence of each name only.
        attributes: Vec<Attribute>,
    },

    /// `</name>`
    EndTag {
        /// Lower-cased tag name.
        name: String,
    },

    /// A run of character data between tags.
    Text {
        /// The characters, references decoded.
        data: String,
    },

    /// No more input.
    EndOfStream,

    /// The source failed; nothing after this is read.
    Error {
        /// What went wrong.
        message: String,
    },
}

impl Token {
    /// Shorthand for a start tag.
    #[must_use]
    pub fn start(name: &str, attributes: &[(&str, &str)]) -> Self {
        Self::StartTag {
            name: name.to_string(),
            attributes: attributes.iter().map(|(k, v)| Attribute::new(k, v)).collect(),
        }
    }

    /// Shorthand for a self-closing tag.
    #[must_use]
    pub fn self_closing(name: &str, attributes: &[(&str, &str)]) -> Self {
        Self::SelfClosingTag {
            name: name.to_string(),
            attributes: attributes.iter().map(|(k, v)| Attribute::new(k, v)).collect(),
        }
    }

    /// Shorthand for an end tag.
    #[must_use]
    pub fn end(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
        }
    }

    /// Shorthand for a text run.
    #[must_use]
    pub fn text(data: &str) -> Self {
        Self::Text {
            data: data.to_string(),
        }
    }

    /// True for [`Token::EndOfStream`] and [`Token::Error`].
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::EndOfStream | Self::Error { .. })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag { name, attributes } | Self::SelfClosingTag { name, attributes } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if matches!(self, Self::SelfClosingTag { .. }) {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Text { data } => {
                let display = data.replace('\n', "\\n");
                write!(f, "Text({display})")
            }
            Self::EndOfStream => write!(f, "EOF"),
            Self::Error { message } => write!(f, "Error({message})"),
        }
    }
}

/// Start or end, for a tag still being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TagKind {
    Start,
    End,
}

/// A tag token under construction.
///
/// Attribute appends always go to the last attribute; a duplicate name is
/// only dropped once its value is complete, in [`PendingTag::finish_attribute`].
#[derive(Debug)]
pub(super) struct PendingTag {
    pub(super) kind: TagKind,
    pub(super) name: String,
    pub(super) self_closing: bool,
    pub(super) attributes: Vec<Attribute>,
}

impl PendingTag {
    pub(super) const fn new(kind: TagKind) -> Self {
        Self {
            kind,
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    pub(super) fn append_to_name(&mut self, c: char) {
        self.name.push(c.to_ascii_lowercase());
    }

    /// Start a new attribute, returning true if the previous one was a
    /// duplicate and had to be dropped.
    pub(super) fn start_new_attribute(&mut self) -> bool {
        let duplicate = self.finish_attribute();
        self.attributes.push(Attribute::new("", ""));
        duplicate
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.attributes.last_mut() {
            attr.name.push(c.to_ascii_lowercase());
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attr) = self.attributes.last_mut() {
            attr.value.push(c);
        }
    }

    /// Drop the last attribute if an earlier one has the same name.
    pub(super) fn finish_attribute(&mut self) -> bool {
        let Some((current, earlier)) = self.attributes.split_last() else {
            return false;
        };
        let duplicate = earlier.iter().any(|attr| attr.name == current.name);
        if duplicate {
            let _ = self.attributes.pop();
        }
        duplicate
    }

    pub(super) fn into_token(self) -> Token {
        match (self.kind, self.self_closing) {
            (TagKind::End, _) => Token::EndTag { name: self.name },
            (TagKind::Start, true) => Token::SelfClosingTag {
                name: self.name,
                attributes: self.attributes,
            },
            (TagKind::Start, false) => Token::StartTag {
                name: self.name,
                attributes: self.attributes,
            },
        }
    }
}

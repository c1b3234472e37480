//! Markup tokenizer.
//!
//! A pull tokenizer modelled on the WHATWG tokenization state machine
//! ([§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)),
//! trimmed to what the tree builder consumes: comments and DOCTYPEs are read
//! and dropped, script content is treated as raw text, and only a handful of
//! named character references are known.

/// Character reference decoding.
mod character_reference;
/// State transitions, input handling and token emission.
mod helpers;
/// Token types produced by the tokenizer.
pub mod token;
/// The state machine itself.
mod machine;

pub use machine::{HTMLTokenizer, ParseErrorKind, TokenizerState};
pub use token::{Attribute, Token};

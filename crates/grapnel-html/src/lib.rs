//! Markup parsing for grapnel.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** ([`HTMLTokenizer`]): a pull tokenizer following the
//!   WHATWG data, RCDATA, RAWTEXT, tag and attribute states, yielding the
//!   [`Token`] stream the builder consumes.
//! - **Tree builder** ([`TreeBuilder`]): a single-cursor builder that turns
//!   any token stream into a [`grapnel_dom::Document`].
//!
//! # Not Implemented
//!
//! - Insertion modes, implicit end tags and the adoption agency algorithm
//! - Script data escape states (script content is plain raw text)
//! - The full named character reference table

/// Tree construction.
pub mod builder;
/// Tokenizer producing the token stream.
pub mod tokenizer;

pub use builder::{BuildIssue, BuilderOptions, TreeBuilder};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

use std::io::{self, Read};

use grapnel_common::warning::warn_once;
use grapnel_dom::Document;

/// Tokenize and build `html` with default options.
#[must_use]
pub fn parse_document(html: &str) -> Document {
    parse_document_with_options(html, BuilderOptions::default())
}

/// Tokenize and build `html` with the given builder options.
#[must_use]
pub fn parse_document_with_options(html: &str, options: BuilderOptions) -> Document {
    TreeBuilder::with_options(options).build(HTMLTokenizer::new(html))
}

/// Read all of `reader` and parse it.
///
/// Input that is not valid UTF-8 is decoded lossily, with a warning.
///
/// # Errors
///
/// Returns any error from reading.
pub fn parse_reader<R: Read>(reader: R) -> io::Result<Document> {
    parse_reader_with_options(reader, BuilderOptions::default())
}

/// Like [`parse_reader`], with the given builder options.
///
/// # Errors
///
/// Returns any error from reading.
pub fn parse_reader_with_options<R: Read>(
    mut reader: R,
    options: BuilderOptions,
) -> io::Result<Document> {
    let mut bytes = Vec::new();
    let _ = reader.read_to_end(&mut bytes)?;
    let html = match String::from_utf8(bytes) {
        Ok(html) => html,
        Err(err) => {
            warn_once("HTML", "input is not valid UTF-8; invalid sequences replaced");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    Ok(parse_document_with_options(&html, options))
}

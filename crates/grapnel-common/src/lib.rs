//! Common utilities for grapnel.
//!
//! This crate provides shared infrastructure used by the tree and tokenizer crates:
//! - **Warning System** - deduplicated warnings for recoverable problems
//! - **URL Resolution** - resolving links against a document URL

pub mod url;
pub mod warning;

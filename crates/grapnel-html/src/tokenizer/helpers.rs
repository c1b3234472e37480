//! Helper functions for the tokenizer.
//!
//! - State transitions ("Switch to", "Reconsume in")
//! - Input handling ("Consume the next input character", lookahead)
//! - Token emission, including text coalescing
//! - RCDATA/RAWTEXT end tag helpers
//! - Parse error reporting

use grapnel_common::warning::warn_once;

use super::machine::{HTMLTokenizer, ParseErrorKind, TokenizerState};
use super::token::{PendingTag, TagKind, Token};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character is consumed on the next step.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The current character is processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    ///
    /// Returns `None` at the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Peek at the character `offset` places after the current position.
    pub(super) fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// "If the next few characters are..."
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// ASCII case-insensitive form of [`Self::next_few_characters_are`].
    pub(super) fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input
            .get(self.current_pos..self.current_pos + target.len())
            .is_some_and(|next| next.eq_ignore_ascii_case(target))
    }

    /// Consume `target`, which the caller has already matched. ASCII only.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// "ASCII whitespace" minus CR, which never reaches the state machine.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Queue a token, flushing any pending text ahead of it.
    pub(super) fn emit(&mut self, token: Token) {
        self.flush_text();
        self.pending.push_back(token);
    }

    /// "Emit the current tag token"
    ///
    /// A start tag for a raw-text element also switches the tokenizer into
    /// the matching text state, which in a full parser is the tree builder's
    /// job.
    pub(super) fn emit_current_tag(&mut self) {
        let Some(mut tag) = self.current_tag.take() else {
            return;
        };
        if tag.finish_attribute() {
            self.log_parse_error(ParseErrorKind::DuplicateAttribute);
        }
        if tag.kind == TagKind::End {
            if !tag.attributes.is_empty() {
                self.log_parse_error(ParseErrorKind::EndTagWithAttributes);
            }
            if tag.self_closing {
                self.log_parse_error(ParseErrorKind::EndTagWithTrailingSolidus);
            }
        }

        let token = tag.into_token();
        if let Token::StartTag { name, .. } = &token {
            match name.as_str() {
                // "Follow the generic RCDATA element parsing algorithm."
                "title" | "textarea" => self.switch_to(TokenizerState::RCDATA),
                // "Follow the generic raw text element parsing algorithm."
                "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" => {
                    self.switch_to(TokenizerState::RAWTEXT);
                }
                _ => {}
            }
            self.last_start_tag_name = Some(name.clone());
        }
        self.emit(token);
    }

    /// "Emit the current input character as a character token."
    ///
    /// Characters collect in a buffer and leave as one text token.
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.text.push(c);
    }

    /// Turn buffered characters into a text token.
    pub(super) fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let data = std::mem::take(&mut self.text);
            self.pending.push_back(Token::Text { data });
        }
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.emit(Token::EndOfStream);
        self.at_eof = true;
    }

    /// "This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is discarded.
    pub(super) fn eof_in_tag(&mut self) {
        self.log_parse_error(ParseErrorKind::EofInTag);
        self.current_tag = None;
        self.emit_eof_token();
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token."
    pub(super) fn start_new_attribute(&mut self) {
        let duplicate = self
            .current_tag
            .as_mut()
            .is_some_and(PendingTag::start_new_attribute);
        if duplicate {
            self.log_parse_error(ParseErrorKind::DuplicateAttribute);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.append_to_attribute_value(c);
        }
    }
}

// =============================================================================
// RCDATA/RAWTEXT Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_tag) {
            (Some(last_start_tag), Some(tag)) => {
                tag.kind == TagKind::End && tag.name == *last_start_tag
            }
            _ => false,
        }
    }

    /// "Anything else":
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer... Reconsume in the RCDATA (or RAWTEXT) state."
    pub(super) fn emit_raw_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.text.push_str(&buffer);
        self.current_tag = None;
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors are not fatal. Each kind is logged once; every occurrence
    /// is traced with its position.
    pub(super) fn log_parse_error(&self, kind: ParseErrorKind) {
        tracing::trace!(position = self.current_pos, %kind, "parse error");
        warn_once("HTML Tokenizer", &format!("{kind} parse error"));
    }
}

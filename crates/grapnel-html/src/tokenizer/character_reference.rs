//! Character reference decoding.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Numeric references are decoded in full. Named references are limited to
//! the few that matter for markup-significant characters, and must end in a
//! semicolon; anything unrecognized is left in the text as written.

use super::machine::{HTMLTokenizer, ParseErrorKind};

/// Named references understood by the tokenizer.
fn named_character(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => None,
    }
}

impl HTMLTokenizer {
    /// Called with the `&` just consumed. Decodes a reference if one follows,
    /// otherwise passes the `&` through.
    pub(super) fn consume_character_reference(&mut self, in_attribute: bool) {
        let decoded = self.try_numeric_reference().or_else(|| self.try_named_reference());
        self.flush_character_reference(decoded.unwrap_or('&'), in_attribute);
    }

    /// "Flush code points consumed as a character reference": into the
    /// attribute value when inside one, otherwise as text.
    fn flush_character_reference(&mut self, c: char, in_attribute: bool) {
        if in_attribute {
            self.append_to_attribute_value(c);
        } else {
            self.emit_character_token(c);
        }
    }

    /// `&name;` from the table above.
    fn try_named_reference(&mut self) -> Option<char> {
        let rest = &self.input[self.current_pos..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        if len == 0 || !rest[len..].starts_with(';') {
            return None;
        }
        let c = named_character(&rest[..len])?;
        self.current_pos += len + 1;
        Some(c)
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    ///
    /// `&#65;` or `&#x41;`. The semicolon may be missing (a parse error);
    /// with no digits at all nothing is consumed.
    fn try_numeric_reference(&mut self) -> Option<char> {
        if self.peek_codepoint(0) != Some('#') {
            return None;
        }
        let hex = matches!(self.peek_codepoint(1), Some('x' | 'X'));
        let radix = if hex { 16 } else { 10 };
        let digits_start = self.current_pos + if hex { 2 } else { 1 };

        let rest = &self.input[digits_start..];
        let len = rest
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        let has_semicolon = rest[len..].starts_with(';');

        // Too many digits overflows; treat it like any out-of-range value.
        let code = u32::from_str_radix(&rest[..len], radix).unwrap_or(u32::MAX);
        self.current_pos = digits_start + len + usize::from(has_semicolon);

        if !has_semicolon {
            self.log_parse_error(ParseErrorKind::MissingSemicolonAfterCharacterReference);
        }

        // [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
        // "If the number is 0x00 ... greater than 0x10FFFF ... a surrogate ...
        // set the character reference code to 0xFFFD."
        match char::from_u32(code) {
            Some(c) if code != 0 => Some(c),
            _ => {
                self.log_parse_error(ParseErrorKind::InvalidCharacterReference);
                Some('\u{FFFD}')
            }
        }
    }
}

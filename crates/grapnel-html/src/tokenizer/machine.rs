use std::collections::VecDeque;
use std::iter::FusedIterator;

use strum_macros::Display;

use super::token::{PendingTag, TagKind, Token};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The states this tokenizer implements. Each one corresponds to a section
/// in § 13.2.5; the comment and DOCTYPE families are collapsed because their
/// tokens are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RAWTEXT,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    RCDATALessThanSign,
    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    RCDATAEndTagOpen,
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    RCDATAEndTagName,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RAWTEXTLessThanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RAWTEXTEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RAWTEXTEndTagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// Runs until `-->`; the nested less-than and dash states are folded in.
    Comment,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    ///
    /// Runs until `>`; name and identifiers are not kept.
    DOCTYPE,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// The recoverable errors this tokenizer reports. None of them stop
/// tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorKind {
    /// `\0` in the input.
    UnexpectedNullCharacter,
    /// `<` followed by end of input.
    EofBeforeTagName,
    /// `</>`
    MissingEndTagName,
    /// `<` followed by something that cannot start a tag.
    InvalidFirstCharacterOfTagName,
    /// `<?`
    UnexpectedQuestionMarkInsteadOfTagName,
    /// Input ended inside a tag.
    EofInTag,
    /// Input ended inside a comment.
    EofInComment,
    /// Input ended inside a DOCTYPE.
    EofInDoctype,
    /// `<!-->`
    AbruptClosingOfEmptyComment,
    /// `<!` not followed by `--` or `DOCTYPE`.
    IncorrectlyOpenedComment,
    /// `=` where an attribute name should start.
    UnexpectedEqualsSignBeforeAttributeName,
    /// `"`, `'` or `<` inside an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or backtick in an unquoted value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `name=>`
    MissingAttributeValue,
    /// `a="1"b="2"`
    MissingWhitespaceBetweenAttributes,
    /// `/` not followed by `>` inside a tag.
    UnexpectedSolidusInTag,
    /// The same attribute twice on one tag.
    DuplicateAttribute,
    /// `</p class="x">`
    EndTagWithAttributes,
    /// `</p/>`
    EndTagWithTrailingSolidus,
    /// A numeric reference to NUL, a surrogate, or past U+10FFFF.
    InvalidCharacterReference,
    /// `&#65` with no closing semicolon.
    MissingSemicolonAfterCharacterReference,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// Pull tokenizer: tokens are produced on demand through [`Iterator`]. Text
/// between tags is coalesced into one [`Token::Text`] per run, and the stream
/// ends with exactly one [`Token::EndOfStream`].
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) input: String,
    pub(super) current_pos: usize,
    pub(super) current_input_character: Option<char>,
    pub(super) current_tag: Option<PendingTag>,
    pub(super) at_eof: bool,
    /// Tokens ready to be handed out.
    pub(super) pending: VecDeque<Token>,
    /// Character data not yet flushed into a text token.
    pub(super) text: String,
    // When true, the next step does not consume a new character.
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,

    /// "The last start tag token emitted is used as part of the tree
    /// construction stage and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag_name: Option<String>,

    /// Characters of a possible raw-text end tag, replayed as text if it
    /// turns out not to be one.
    pub(super) temporary_buffer: String,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// CR and CRLF line endings are normalized to LF up front.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let input = if input.contains('\r') {
            input.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            input.to_string()
        };
        Self {
            state: TokenizerState::Data,
            input,
            current_pos: 0,
            current_input_character: None,
            current_tag: None,
            at_eof: false,
            pending: VecDeque::new(),
            text: String::new(),
            reconsume: false,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
        }
    }

    /// The state the machine is currently in.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Run one transition of the state machine.
    fn step(&mut self) {
        // The markup declaration open state looks ahead instead of consuming.
        if self.state == TokenizerState::MarkupDeclarationOpen {
            self.handle_markup_declaration_open_state();
            return;
        }

        if self.reconsume {
            self.reconsume = false;
        } else {
            self.current_input_character = self.consume();
        }

        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::RCDATA => self.handle_rcdata_state(),
            TokenizerState::RAWTEXT => self.handle_rawtext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RCDATALessThanSign => self.handle_raw_less_than_sign_state(
                TokenizerState::RCDATA,
                TokenizerState::RCDATAEndTagOpen,
            ),
            TokenizerState::RCDATAEndTagOpen => self.handle_raw_end_tag_open_state(
                TokenizerState::RCDATA,
                TokenizerState::RCDATAEndTagName,
            ),
            TokenizerState::RCDATAEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::RCDATA);
            }
            TokenizerState::RAWTEXTLessThanSign => self.handle_raw_less_than_sign_state(
                TokenizerState::RAWTEXT,
                TokenizerState::RAWTEXTEndTagOpen,
            ),
            TokenizerState::RAWTEXTEndTagOpen => self.handle_raw_end_tag_open_state(
                TokenizerState::RAWTEXT,
                TokenizerState::RAWTEXTEndTagName,
            ),
            TokenizerState::RAWTEXTEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::RAWTEXT);
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::DOCTYPE => self.handle_doctype_state(),
            TokenizerState::MarkupDeclarationOpen => {}
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&)"
            Some('&') => self.consume_character_reference(false),
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.log_parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_character_token('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            Some('&') => self.consume_character_reference(false),
            Some('<') => self.switch_to(TokenizerState::RCDATALessThanSign),
            // "Emit a U+FFFD REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::RAWTEXTLessThanSign),
            Some('\0') => {
                self.log_parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_raw_less_than_sign_state(
        &mut self,
        text_state: TokenizerState,
        end_tag_open_state: TokenizerState,
    ) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/) - Set the temporary buffer to the empty string.
            // Switch to the end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(end_tag_open_state);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the text state."
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    fn handle_raw_end_tag_open_state(
        &mut self,
        text_state: TokenizerState,
        end_tag_name_state: TokenizerState,
    ) {
        match self.current_input_character {
            // "ASCII alpha - Create a new end tag token, set its tag name to the
            // empty string. Reconsume in the end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(PendingTag::new(TagKind::End));
                self.reconsume_in(end_tag_name_state);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token and a
            // U+002F SOLIDUS character token. Reconsume in the text state."
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    fn handle_raw_end_tag_name_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "If the current end tag token is an appropriate end tag token, then
            // switch to the before attribute name state."
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "...then switch to the self-closing start tag state."
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            // "...then switch to the data state and emit the current tag token."
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            // "ASCII alpha - Append the lowercase version of the current input
            // character to the current tag token's tag name. Append the current
            // input character to the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_name(c);
                }
                self.temporary_buffer.push(c);
            }
            // "Anything else"
            _ => self.emit_raw_end_tag_name_anything_else(text_state),
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the
            // empty string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(PendingTag::new(TagKind::Start));
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - Create a comment token whose data is the
            // empty string. Reconsume in the bogus comment state."
            Some('?') => {
                self.log_parse_error(ParseErrorKind::UnexpectedQuestionMarkInsteadOfTagName);
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - Emit a U+003C LESS-THAN SIGN character token and an
            // end-of-file token."
            None => {
                self.log_parse_error(ParseErrorKind::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the data state."
            Some(_) => {
                self.log_parse_error(ParseErrorKind::InvalidFirstCharacterOfTagName);
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(PendingTag::new(TagKind::End));
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state."
            Some('>') => {
                self.log_parse_error(ParseErrorKind::MissingEndTagName);
                self.switch_to(TokenizerState::Data);
            }
            // "EOF - Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
            // character token and an end-of-file token."
            None => {
                self.log_parse_error(ParseErrorKind::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            Some(_) => {
                self.log_parse_error(ParseErrorKind::InvalidFirstCharacterOfTagName);
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some('\0') => {
                self.log_parse_error(ParseErrorKind::UnexpectedNullCharacter);
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_name('\u{FFFD}');
                }
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.eof_in_tag(),
            Some(c) => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>), EOF - Reconsume
            // in the after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - Start a new attribute in the current tag
            // token. Set that attribute's name to the current input character."
            Some('=') => {
                self.log_parse_error(ParseErrorKind::UnexpectedEqualsSignBeforeAttributeName);
                self.start_new_attribute();
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_attribute_name('=');
                }
                self.switch_to(TokenizerState::AttributeName);
            }
            // "Anything else - Start a new attribute in the current tag token.
            // Reconsume in the attribute name state."
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE, U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>), EOF -
            // Reconsume in the after attribute name state."
            None | Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>') => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('\0') => {
                self.log_parse_error(ParseErrorKind::UnexpectedNullCharacter);
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_attribute_name('\u{FFFD}');
                }
            }
            Some(c) => {
                if matches!(c, '"' | '\'' | '<') {
                    self.log_parse_error(ParseErrorKind::UnexpectedCharacterInAttributeName);
                }
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_attribute_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "This is a missing-attribute-value parse error. Switch to the data
            // state. Emit the current tag token."
            Some('>') => {
                self.log_parse_error(ParseErrorKind::MissingAttributeValue);
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => self.consume_character_reference(true),
            Some('\0') => {
                self.log_parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.append_to_attribute_value('\u{FFFD}');
            }
            None => self.eof_in_tag(),
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => self.consume_character_reference(true),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some('\0') => {
                self.log_parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.append_to_attribute_value('\u{FFFD}');
            }
            None => self.eof_in_tag(),
            Some(c) => {
                if matches!(c, '"' | '\'' | '<' | '=' | '`') {
                    self.log_parse_error(
                        ParseErrorKind::UnexpectedCharacterInUnquotedAttributeValue,
                    );
                }
                self.append_to_attribute_value(c);
            }
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.log_parse_error(ParseErrorKind::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "Set the self-closing flag of the current tag token. Switch to the
            // data state. Emit the current tag token."
            Some('>') => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.self_closing = true;
                }
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.log_parse_error(ParseErrorKind::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open_state(&mut self) {
        // "If the next two characters are both U+002D HYPHEN-MINUS characters (-),
        // consume those two characters ... and switch to the comment start state."
        if self.next_few_characters_are("--") {
            self.consume_string("--");
            self.switch_to(TokenizerState::CommentStart);
        }
        // "Otherwise, if the next seven characters are an ASCII case-insensitive
        // match for the word 'DOCTYPE', consume those characters and switch to the
        // DOCTYPE state."
        else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.consume_string("DOCTYPE");
            self.switch_to(TokenizerState::DOCTYPE);
        }
        // "Otherwise, this is an incorrectly-opened-comment parse error ...
        // Switch to the bogus comment state (don't consume anything in the
        // current state)."
        else {
            self.log_parse_error(ParseErrorKind::IncorrectlyOpenedComment);
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            // `<!-->` and `<!--->`
            Some('>') => {
                self.log_parse_error(ParseErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
            }
            Some('-') if self.next_few_characters_are(">") => {
                self.log_parse_error(ParseErrorKind::AbruptClosingOfEmptyComment);
                self.consume_string(">");
                self.switch_to(TokenizerState::Data);
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('-') if self.next_few_characters_are("->") => {
                self.consume_string("->");
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.log_parse_error(ParseErrorKind::EofInComment);
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.switch_to(TokenizerState::Data),
            None => self.emit_eof_token(),
            Some(_) => {}
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.switch_to(TokenizerState::Data),
            None => {
                self.log_parse_error(ParseErrorKind::EofInDoctype);
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }
}

impl Iterator for HTMLTokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.at_eof {
                return None;
            }
            self.step();
        }
    }
}

impl FusedIterator for HTMLTokenizer {}

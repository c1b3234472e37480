//! Integration tests for the markup tokenizer.

use grapnel_html::tokenizer::TokenizerState;
use grapnel_html::{Attribute, HTMLTokenizer, Token};

/// Helper to tokenize a string and return every token.
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input).collect()
}

fn attr(name: &str, value: &str) -> Attribute {
    Attribute::new(name, value)
}

#[test]
fn test_plain_text_is_one_token() {
    assert_eq!(tokenize("Hello"), vec![Token::text("Hello"), Token::EndOfStream]);
}

#[test]
fn test_empty_input() {
    assert_eq!(tokenize(""), vec![Token::EndOfStream]);
}

#[test]
fn test_end_of_stream_once_then_none() {
    let mut tokenizer = HTMLTokenizer::new("<p>");
    assert_eq!(tokenizer.next(), Some(Token::start("p", &[])));
    assert_eq!(tokenizer.next(), Some(Token::EndOfStream));
    assert_eq!(tokenizer.next(), None);
    assert_eq!(tokenizer.next(), None);
}

#[test]
fn test_start_and_end_tags_are_lowercased() {
    assert_eq!(
        tokenize("<DIV Class=Box>hi</Div>"),
        vec![
            Token::start("div", &[("class", "Box")]),
            Token::text("hi"),
            Token::end("div"),
            Token::EndOfStream,
        ]
    );
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<input type="text" name='q' value=rust disabled>"#);
    match &tokens[0] {
        Token::StartTag { name, attributes } => {
            assert_eq!(name, "input");
            assert_eq!(
                attributes,
                &vec![
                    attr("type", "text"),
                    attr("name", "q"),
                    attr("value", "rust"),
                    attr("disabled", ""),
                ]
            );
        }
        other => panic!("expected StartTag, got {other}"),
    }
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    assert_eq!(
        tokenize(r#"<a href="/one" href="/two" id=x>"#)[0],
        Token::start("a", &[("href", "/one"), ("id", "x")])
    );
}

#[test]
fn test_attribute_name_ends_at_space_slash_gt_or_eof() {
    assert_eq!(
        tokenize("<input disabled/><p hidden\tid=x><b open><a name"),
        vec![
            Token::self_closing("input", &[("disabled", "")]),
            Token::start("p", &[("hidden", ""), ("id", "x")]),
            Token::start("b", &[("open", "")]),
            Token::EndOfStream,
        ]
    );
}

#[test]
fn test_raw_text_start_tag_switches_state() {
    let mut tokenizer = HTMLTokenizer::new("<script>a<b</script>");
    assert_eq!(tokenizer.state(), TokenizerState::Data);
    assert_eq!(tokenizer.next(), Some(Token::start("script", &[])));
    assert_eq!(tokenizer.state(), TokenizerState::RAWTEXT);
    assert_eq!(tokenizer.next(), Some(Token::text("a<b")));
    assert_eq!(tokenizer.next(), Some(Token::end("script")));
    assert_eq!(tokenizer.state(), TokenizerState::Data);
}

#[test]
fn test_self_closing_tag() {
    assert_eq!(
        tokenize(r#"<img src="a.png"/><br />"#),
        vec![
            Token::self_closing("img", &[("src", "a.png")]),
            Token::self_closing("br", &[]),
            Token::EndOfStream,
        ]
    );
}

#[test]
fn test_comments_and_doctype_are_dropped() {
    assert_eq!(
        tokenize("<!DOCTYPE html><!-- note --><p>a<!---->b</p><!-->"),
        vec![
            Token::start("p", &[]),
            Token::text("ab"),
            Token::end("p"),
            Token::EndOfStream,
        ]
    );
}

#[test]
fn test_bogus_comment_is_dropped() {
    assert_eq!(
        tokenize("<?xml version=\"1.0\"?><root/>"),
        vec![Token::self_closing("root", &[]), Token::EndOfStream]
    );
}

#[test]
fn test_character_references_in_text() {
    assert_eq!(
        tokenize("a &amp; b &lt;c&gt; &#65;&#x42;&nbsp;")[0],
        Token::text("a & b <c> AB\u{00A0}")
    );
}

#[test]
fn test_unknown_references_pass_through() {
    assert_eq!(
        tokenize("AT&T &copy; &bogus; & x")[0],
        Token::text("AT&T &copy; &bogus; & x")
    );
}

#[test]
fn test_character_references_in_attributes() {
    assert_eq!(
        tokenize(r#"<a href="/s?q=1&amp;page=2&x" title='&quot;hi&quot;'>"#)[0],
        Token::start("a", &[("href", "/s?q=1&page=2&x"), ("title", "\"hi\"")])
    );
}

#[test]
fn test_invalid_numeric_reference_is_replaced() {
    assert_eq!(tokenize("&#0;&#xD800;")[0], Token::text("\u{FFFD}\u{FFFD}"));
}

#[test]
fn test_script_content_is_raw() {
    assert_eq!(
        tokenize("<script>if (a < b && c) { x = '</p>'; }</script>"),
        vec![
            Token::start("script", &[]),
            Token::text("if (a < b && c) { x = '</p>'; }"),
            Token::end("script"),
            Token::EndOfStream,
        ]
    );
}

#[test]
fn test_title_decodes_references_but_not_tags() {
    assert_eq!(
        tokenize("<title>Q&amp;A <b></title>"),
        vec![
            Token::start("title", &[]),
            Token::text("Q&A <b>"),
            Token::end("title"),
            Token::EndOfStream,
        ]
    );
}

#[test]
fn test_line_endings_are_normalized() {
    assert_eq!(tokenize("a\r\nb\rc")[0], Token::text("a\nb\nc"));
}

#[test]
fn test_unterminated_tag_is_discarded() {
    assert_eq!(tokenize("text<div class="), vec![Token::text("text"), Token::EndOfStream]);
}

#[test]
fn test_stray_less_than_is_text() {
    assert_eq!(tokenize("1 < 2")[0], Token::text("1 < 2"));
}

#[test]
fn test_end_tag_attributes_are_dropped() {
    assert_eq!(tokenize("</p class=x>")[0], Token::end("p"));
}

#[test]
fn test_token_display() {
    assert_eq!(
        Token::self_closing("img", &[("src", "a.png")]).to_string(),
        "<img src=\"a.png\" />"
    );
    assert_eq!(Token::end("p").to_string(), "</p>");
    assert_eq!(Token::EndOfStream.to_string(), "EOF");
}

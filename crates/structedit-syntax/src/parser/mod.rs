//! # Parser - Tokens to Events
//!
//! A small hand-written parser over the token stream from [`crate::lexer`].
//! The grammar is tiny:
//!
//! ```text
//! document  := content*
//! content   := element | '[' | ']' | text
//! element   := '<' NAME attribute* ( '/>' | '>' content* '</' NAME '>' )
//! attribute := NAME '=' QUOTED
//! text      := any other token, glued together
//! ```
//!
//! Whitespace is allowed between the parts of a tag. Outside of tags it is
//! ordinary text and is kept verbatim.
//!
//! ## Public API
//!
//! ```
//! use structedit_syntax::{parse, Event};
//!
//! let events = parse("<image src=\"a.png\"/>").unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::Start {
//!             name: "image".into(),
//!             attributes: vec![("src".into(), "a.png".into())],
//!         },
//!         Event::Finish { name: "image".into() },
//!     ]
//! );
//! ```

pub mod event;

use crate::lexer::{Token, TokenKind, lex};
use event::{Event, ParseError};

/// Parse `input` into a flat, balanced event list.
pub fn parse(input: &str) -> Result<Vec<Event>, ParseError> {
    let tokens = lex(input);
    Parser::new(&tokens).parse()
}

/// The parser state.
///
/// Holds the token stream, the current position, the accumulated events and
/// the stack of open element names.
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
    open: Vec<String>,
}

impl<'t, 'input> Parser<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            open: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Vec<Event>, ParseError> {
        while let Some(kind) = self.current() {
            match kind {
                TokenKind::LAngle => self.start_tag()?,
                TokenKind::LAngleSlash => self.end_tag()?,
                TokenKind::LBracket => {
                    self.pos += 1;
                    self.events.push(Event::SelectionStart);
                }
                TokenKind::RBracket => {
                    self.pos += 1;
                    self.events.push(Event::SelectionEnd);
                }
                _ => self.text(),
            }
        }

        if let Some(name) = self.open.pop() {
            return Err(ParseError::UnclosedElement { name });
        }

        Ok(self.events)
    }

    fn current(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn skip_whitespace(&mut self) {
        while self.current() == Some(TokenKind::Whitespace) {
            self.pos += 1;
        }
    }

    /// Consume a token of `kind` and return its text.
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<&'input str, ParseError> {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token.text)
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                expected,
                found: token.text.to_string(),
                offset: token.offset,
            }),
            None => Err(ParseError::UnexpectedEof { expected }),
        }
    }

    fn start_tag(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::LAngle, "'<'")?;
        let name = self.expect(TokenKind::Name, "element name")?.to_string();
        let mut attributes: Vec<(String, String)> = Vec::new();

        loop {
            self.skip_whitespace();
            match self.current() {
                Some(TokenKind::RAngle) => {
                    self.pos += 1;
                    self.events.push(Event::Start {
                        name: name.clone(),
                        attributes,
                    });
                    self.open.push(name);
                    return Ok(());
                }
                Some(TokenKind::SlashRAngle) => {
                    self.pos += 1;
                    self.events.push(Event::Start {
                        name: name.clone(),
                        attributes,
                    });
                    self.events.push(Event::Finish { name });
                    return Ok(());
                }
                Some(TokenKind::Name) => {
                    let (key, value) = self.attribute()?;
                    if attributes.iter().any(|(existing, _)| *existing == key) {
                        return Err(ParseError::DuplicateAttribute {
                            element: name,
                            attribute: key,
                        });
                    }
                    attributes.push((key, value));
                }
                _ => {
                    let expected = "attribute, '>' or '/>'";
                    return Err(match self.tokens.get(self.pos) {
                        Some(token) => ParseError::UnexpectedToken {
                            expected,
                            found: token.text.to_string(),
                            offset: token.offset,
                        },
                        None => ParseError::UnexpectedEof { expected },
                    });
                }
            }
        }
    }

    fn attribute(&mut self) -> Result<(String, String), ParseError> {
        let key = self.expect(TokenKind::Name, "attribute name")?.to_string();
        self.skip_whitespace();
        self.expect(TokenKind::Equals, "'='")?;
        self.skip_whitespace();
        let quoted = self.expect(TokenKind::Quoted, "quoted attribute value")?;
        let value = quoted[1..quoted.len() - 1].to_string();
        Ok((key, value))
    }

    fn end_tag(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::LAngleSlash, "'</'")?;
        let name = self.expect(TokenKind::Name, "element name")?.to_string();
        self.skip_whitespace();
        self.expect(TokenKind::RAngle, "'>'")?;

        match self.open.pop() {
            Some(open) if open == name => {
                self.events.push(Event::Finish { name });
                Ok(())
            }
            Some(open) => Err(ParseError::MismatchedClosingTag {
                expected: open,
                found: name,
            }),
            None => Err(ParseError::UnexpectedClosingTag { name }),
        }
    }

    /// Glue every token up to the next tag or selection marker into one text event.
    fn text(&mut self) {
        let mut text = String::new();
        while let Some(token) = self.tokens.get(self.pos) {
            if matches!(
                token.kind,
                TokenKind::LAngle | TokenKind::LAngleSlash | TokenKind::LBracket | TokenKind::RBracket
            ) {
                break;
            }
            text.push_str(token.text);
            self.pos += 1;
        }

        match self.events.last_mut() {
            Some(Event::Text(previous)) => previous.push_str(&text),
            _ => self.events.push(Event::Text(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn start(name: &str) -> Event {
        Event::Start {
            name: name.into(),
            attributes: vec![],
        }
    }

    fn finish(name: &str) -> Event {
        Event::Finish { name: name.into() }
    }

    fn text(value: &str) -> Event {
        Event::Text(value.into())
    }

    #[test]
    fn test_parse_empty_document() {
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn test_parse_paragraph_with_selection() {
        assert_eq!(
            parse("<paragraph>f[o]o</paragraph>").unwrap(),
            vec![
                start("paragraph"),
                text("f"),
                Event::SelectionStart,
                text("o"),
                Event::SelectionEnd,
                text("o"),
                finish("paragraph"),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_whitespace_in_text() {
        assert_eq!(
            parse("<paragraph> foo  bar </paragraph>").unwrap(),
            vec![start("paragraph"), text(" foo  bar "), finish("paragraph")]
        );
    }

    #[test]
    fn test_parse_collapsed_selection_around_element() {
        assert_eq!(
            parse("[<imageInline></imageInline>]").unwrap(),
            vec![
                Event::SelectionStart,
                start("imageInline"),
                finish("imageInline"),
                Event::SelectionEnd,
            ]
        );
    }

    #[test]
    fn test_parse_attributes_in_source_order() {
        assert_eq!(
            parse(r#"<image src="foo.png" alt = "a cat"></image>"#).unwrap(),
            vec![
                Event::Start {
                    name: "image".into(),
                    attributes: vec![
                        ("src".into(), "foo.png".into()),
                        ("alt".into(), "a cat".into()),
                    ],
                },
                finish("image"),
            ]
        );
    }

    #[test]
    fn test_parse_nested_elements() {
        assert_eq!(
            parse("<image><caption>x</caption></image>").unwrap(),
            vec![
                start("image"),
                start("caption"),
                text("x"),
                finish("caption"),
                finish("image"),
            ]
        );
    }

    #[rstest]
    #[case::mismatched(
        "<a></b>",
        ParseError::MismatchedClosingTag { expected: "a".into(), found: "b".into() }
    )]
    #[case::stray_close("</a>", ParseError::UnexpectedClosingTag { name: "a".into() })]
    #[case::unclosed("<a>text", ParseError::UnclosedElement { name: "a".into() })]
    #[case::eof_in_tag("<a", ParseError::UnexpectedEof { expected: "attribute, '>' or '/>'" })]
    #[case::duplicate(
        r#"<a x="1" x="2"></a>"#,
        ParseError::DuplicateAttribute { element: "a".into(), attribute: "x".into() }
    )]
    #[case::unquoted(
        "<a x=1></a>",
        ParseError::UnexpectedToken { expected: "quoted attribute value", found: "1".into(), offset: 5 }
    )]
    fn test_parse_errors(#[case] input: &str, #[case] expected: ParseError) {
        assert_eq!(parse(input).unwrap_err(), expected);
    }
}

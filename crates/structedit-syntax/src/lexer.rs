//! # Lexer - Tokenizing Tree Data Notation
//!
//! This module breaks a data string such as
//! `<paragraph alt="x">f[o]o</paragraph>` into a flat sequence of tokens
//! using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Context-Free Tokens
//!
//! The lexer does not know whether it is inside a tag. `foo` lexes as a
//! [`TokenKind::Name`] whether it is an element name, an attribute name or
//! plain text content; the parser decides. Outside of tags the parser glues
//! every token that is not `<`, `</`, `[` or `]` back into text, so the
//! lexer must never drop a byte:
//!
//! ```
//! use structedit_syntax::lexer::lex;
//!
//! let input = "<paragraph>f[o]o bar</paragraph>";
//! let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! Characters no rule matches come back from Logos as errors and are turned
//! into [`TokenKind::Text`] tokens.

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Spaces, tabs and line breaks
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// `</` opening a closing tag
    #[token("</")]
    LAngleSlash,

    /// `<` opening a start tag
    #[token("<")]
    LAngle,

    /// `/>` closing a self-closing tag
    #[token("/>")]
    SlashRAngle,

    /// `>` closing a tag
    #[token(">")]
    RAngle,

    /// `=` between an attribute name and its value
    #[token("=")]
    Equals,

    /// A double-quoted attribute value, quotes included
    #[regex(r#""[^"]*""#)]
    Quoted,

    /// `[` selection start marker
    #[token("[")]
    LBracket,

    /// `]` selection end marker
    #[token("]")]
    RBracket,

    /// Element or attribute name. `$` is allowed so generic items like
    /// `$text` can be written.
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$:\-]*")]
    Name,

    /// Anything else
    #[regex(r#"[^<>\[\]="/ \t\r\nA-Za-z_$]+"#)]
    Text,
}

/// A lexed token with its kind, text slice and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }

    tokens
}

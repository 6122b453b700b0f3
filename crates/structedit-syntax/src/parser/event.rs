//! # Parser Events
//!
//! The parser does not build a tree. It emits a flat sequence of events
//! describing one, and whoever consumes them decides what a node is:
//!
//! ```text
//! <paragraph>f[o]o</paragraph>
//!
//! Start { name: "paragraph", attributes: [] }
//!   Text("f")
//!   SelectionStart
//!   Text("o")
//!   SelectionEnd
//!   Text("o")
//! Finish { name: "paragraph" }
//! ```
//!
//! Starts and finishes are always balanced and properly nested; the parser
//! reports a [`ParseError`] otherwise. Selection markers are passed through
//! as-is, so validating how many there are is up to the consumer.

use thiserror::Error;

/// An event emitted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Open an element. Attributes keep their source order.
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },

    /// Close the most recently opened element.
    Finish { name: String },

    /// A run of text. Adjacent text never produces two events.
    Text(String),

    /// `[`
    SelectionStart,

    /// `]`
    SelectionEnd,
}

/// Errors produced while parsing data notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} at byte {offset}, found {found:?}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("closing tag </{found}> does not match open element <{expected}>")]
    MismatchedClosingTag { expected: String, found: String },

    #[error("closing tag </{name}> has no open element")]
    UnexpectedClosingTag { name: String },

    #[error("element <{name}> is never closed")]
    UnclosedElement { name: String },

    #[error("attribute {attribute:?} appears twice on <{element}>")]
    DuplicateAttribute { element: String, attribute: String },
}

//! # structedit-syntax
//!
//! Lexer and parser for the compact tree notation used to write documents,
//! selections and expectations in tests:
//!
//! ```text
//! <paragraph>f[o]o</paragraph><image alt="cat" src="cat.png"></image>
//! ```
//!
//! Elements are written as tags with double-quoted attributes, `<x/>` is
//! shorthand for `<x></x>`, anything else is text, and `[` / `]` mark where
//! a selection starts and ends (`[]` is a collapsed selection).
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events
//!               (Logos)
//! ```
//!
//! The crate stops at events. Building a document tree out of them (and
//! checking element names against a schema) is the job of the editing
//! engine, which keeps this crate free of any tree types.
//!
//! ## Module Structure
//!
//! ```text
//! structedit-syntax/
//! ├── lib.rs        # This file - public API
//! ├── lexer.rs      # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs    # Parser and the parse() entry point
//!     └── event.rs  # Event and ParseError
//! ```
//!
//! ## Limitations
//!
//! There is no escaping: text cannot contain `<`, `[` or `]`, and attribute
//! values cannot contain `"`.

pub mod lexer;
pub mod parser;

pub use parser::event::{Event, ParseError};
pub use parser::parse;

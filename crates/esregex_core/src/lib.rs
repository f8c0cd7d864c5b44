//! `esregex_core` — syntax validation and AST construction for ECMAScript
//! regular expressions, from ES5 through ES2024.
//!
//! # Crate layout
//!
//! - [`error`] — [`RegExpSyntaxError`] and its [`SyntaxErrorKind`].
//! - [`options`] — targeted [`EcmaVersion`] and strictness.
//! - [`chars`] / [`unicode`] — character classification and property tables.
//! - [`reader`] — UTF-16 code-point cursor.
//! - [`validator`] — the grammar itself, reporting to a [`RegExpHandler`].
//! - [`ast`] / [`builder`] — the arena tree and the handler that fills it.
//! - [`parser`] — one-call entry points returning a [`RegExpAst`].
//! - [`visitor`] — depth-first traversal with per-kind callbacks.
//!
//! # Example
//!
//! ```
//! use esregex_core::{PatternFlags, RegExpOptions, parse_literal, validate_pattern};
//!
//! let ast = parse_literal("/(?<word>\\w+)\\s\\k<word>/u", RegExpOptions::default()).unwrap();
//! assert_eq!(ast.capturing_groups().len(), 1);
//!
//! let err = validate_pattern("(", PatternFlags::LEGACY, RegExpOptions::default()).unwrap_err();
//! assert_eq!(err.to_string(), "Invalid regular expression: /(/: Unterminated group");
//! ```

/// Arena-allocated RegExp AST.
pub mod ast;
/// AST construction from validator events.
pub mod builder;
/// Code-point constants and classification predicates.
pub mod chars;
/// Syntax error type.
pub mod error;
/// Parser options: ECMAScript edition and strict mode.
pub mod options;
/// Parse and validate entry points.
pub mod parser;
/// UTF-16 code-point reader.
pub mod reader;
/// Unicode property and identifier tables.
pub mod unicode;
/// Grammar validator and the event handler trait.
pub mod validator;
/// Depth-first AST traversal.
pub mod visitor;

pub use ast::{NodeId, NodeKind, RegExpAst, RegExpFlags};
pub use error::{RegExpResult, RegExpSyntaxError, SyntaxErrorKind};
pub use options::{EcmaVersion, PatternFlags, RegExpOptions};
pub use parser::{
    RegExpParser, parse_flags, parse_literal, parse_pattern, validate_flags, validate_literal,
    validate_pattern,
};
pub use validator::{RegExpHandler, RegExpValidator};
pub use visitor::{RegExpVisitor, visit};

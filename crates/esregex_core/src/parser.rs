//! Parsing entry points: validation plus tree construction.
//!
//! # Workflow
//!
//! 1. Pick [`RegExpOptions`] (edition and strictness).
//! 2. Call [`parse_literal`], [`parse_pattern`] or [`parse_flags`] for a whole
//!    string, or the matching [`RegExpParser`] method for a sub-range of a
//!    larger source.
//! 3. Walk the resulting [`RegExpAst`] directly or with a
//!    [`crate::visitor::RegExpVisitor`].
//!
//! The `validate_*` functions run the same grammar without building a tree.

use log::debug;

use crate::ast::RegExpAst;
use crate::builder::AstBuilder;
use crate::error::RegExpResult;
use crate::options::{PatternFlags, RegExpOptions};
use crate::reader::utf16_units;
use crate::validator::RegExpValidator;

// ─────────────────────────────────────────────────────────────────────────────
// RegExpParser
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a [`RegExpAst`] for a literal, a pattern or a flags string.
///
/// All offsets are UTF-16 code-unit indices into `source`, clamped to its
/// length.
///
/// # Example
///
/// ```
/// use esregex_core::ast::NodeKind;
/// use esregex_core::options::RegExpOptions;
/// use esregex_core::parser::RegExpParser;
///
/// let parser = RegExpParser::new(RegExpOptions::default());
/// let ast = parser.parse_literal("x = /ab+/g;", 4, 10).unwrap();
/// assert_eq!(ast.root().raw, "/ab+/g");
/// assert!(matches!(ast.root().kind, NodeKind::RegExpLiteral { .. }));
/// assert!(ast.flags().unwrap().global);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RegExpParser {
    options: RegExpOptions,
}

impl RegExpParser {
    pub fn new(options: RegExpOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RegExpOptions {
        &self.options
    }

    /// Parse the literal `/pattern/flags` in `source[start..end]`.
    pub fn parse_literal(&self, source: &str, start: usize, end: usize) -> RegExpResult<RegExpAst> {
        let units = utf16_units(source);
        let mut validator =
            RegExpValidator::with_handler(self.options, AstBuilder::new(units.clone()));
        validator.validate_literal_units(units, start, end)?;
        let ast = validator.into_handler().into_literal();
        debug!("parsed literal into {} nodes", ast.len());
        Ok(ast)
    }

    /// Parse the pattern in `source[start..end]` under the given mode flags.
    pub fn parse_pattern(
        &self,
        source: &str,
        start: usize,
        end: usize,
        flags: PatternFlags,
    ) -> RegExpResult<RegExpAst> {
        let units = utf16_units(source);
        let mut validator =
            RegExpValidator::with_handler(self.options, AstBuilder::new(units.clone()));
        validator.validate_pattern_units(units, start, end, flags)?;
        let ast = validator.into_handler().into_pattern();
        debug!("parsed pattern into {} nodes", ast.len());
        Ok(ast)
    }

    /// Parse the flags string in `source[start..end]`.
    pub fn parse_flags(&self, source: &str, start: usize, end: usize) -> RegExpResult<RegExpAst> {
        let units = utf16_units(source);
        let mut validator =
            RegExpValidator::with_handler(self.options, AstBuilder::new(units.clone()));
        validator.validate_flags_units(units, start, end)?;
        Ok(validator.into_handler().into_flags())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Whole-string helpers
// ─────────────────────────────────────────────────────────────────────────────

fn utf16_len(source: &str) -> usize {
    source.encode_utf16().count()
}

/// Parse a complete `/pattern/flags` literal.
///
/// ```
/// use esregex_core::options::RegExpOptions;
/// use esregex_core::parser::parse_literal;
///
/// let ast = parse_literal("/(a)\\1/", RegExpOptions::default()).unwrap();
/// assert_eq!(ast.capturing_groups().len(), 1);
/// assert!(parse_literal("/a{2,1}/", RegExpOptions::default()).is_err());
/// ```
pub fn parse_literal(source: &str, options: RegExpOptions) -> RegExpResult<RegExpAst> {
    RegExpParser::new(options).parse_literal(source, 0, utf16_len(source))
}

/// Parse a complete pattern (the text between the slashes).
pub fn parse_pattern(
    source: &str,
    flags: PatternFlags,
    options: RegExpOptions,
) -> RegExpResult<RegExpAst> {
    RegExpParser::new(options).parse_pattern(source, 0, utf16_len(source), flags)
}

/// Parse a complete flags string.
pub fn parse_flags(source: &str, options: RegExpOptions) -> RegExpResult<RegExpAst> {
    RegExpParser::new(options).parse_flags(source, 0, utf16_len(source))
}

/// Check a complete literal without building a tree.
pub fn validate_literal(source: &str, options: RegExpOptions) -> RegExpResult<()> {
    RegExpValidator::new(options).validate_literal(source, 0, utf16_len(source))
}

/// Check a complete pattern without building a tree.
pub fn validate_pattern(
    source: &str,
    flags: PatternFlags,
    options: RegExpOptions,
) -> RegExpResult<()> {
    RegExpValidator::new(options).validate_pattern(source, 0, utf16_len(source), flags)
}

/// Check a complete flags string without building a tree.
pub fn validate_flags(source: &str, options: RegExpOptions) -> RegExpResult<()> {
    RegExpValidator::new(options).validate_flags(source, 0, utf16_len(source))
}

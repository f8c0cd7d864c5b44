//! Error types for the RegExp validator and parser.

use thiserror::Error;

/// The grammar violation behind a [`RegExpSyntaxError`].
///
/// The `Display` text of each variant is stable and safe to match in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// A literal with nothing between its delimiters, or no input at all.
    #[error("Empty")]
    Empty,

    /// A literal that does not start with `/` or lacks its closing `/`.
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// A literal body that hit a line terminator or end of input.
    #[error("Unterminated regular expression")]
    UnterminatedRegExp,

    /// A `[` without its closing `]`.
    #[error("Unterminated character class")]
    UnterminatedCharacterClass,

    /// A `(` without its closing `)`.
    #[error("Unterminated group")]
    UnterminatedGroup,

    /// A `\q{` without its closing `}`.
    #[error("Unterminated class string disjunction")]
    UnterminatedClassStringDisjunction,

    /// A flag letter that appears more than once.
    #[error("Duplicated flag '{0}'")]
    DuplicatedFlag(char),

    /// A flag letter that is unknown or not yet available in the edition.
    #[error("Invalid flag '{0}'")]
    InvalidFlag(char),

    /// `u` and `v` requested together.
    #[error("Invalid regular expression flags")]
    InvalidFlags,

    /// A `)` with no open group.
    #[error("Unmatched ')'")]
    UnmatchedParen,

    /// A pattern ending in a lone `\`.
    #[error("\\ at end of pattern")]
    TrailingBackslash,

    /// A stray `{`, `}` or `]`.
    #[error("Lone quantifier brackets")]
    LoneQuantifierBrackets,

    /// A quantifier with no preceding atom.
    #[error("Nothing to repeat")]
    NothingToRepeat,

    /// `{min,max}` with `max < min`.
    #[error("numbers out of order in {{}} quantifier")]
    QuantifierOutOfOrder,

    /// A malformed `{…}` quantifier in strict or Unicode mode.
    #[error("Incomplete quantifier")]
    IncompleteQuantifier,

    /// A `(?` not followed by a recognised group marker.
    #[error("Invalid group")]
    InvalidGroup,

    /// A `<name>` that is not a valid identifier.
    #[error("Invalid capture group name")]
    InvalidCaptureGroupName,

    /// Two capturing groups with the same name.
    #[error("Duplicate capture group name")]
    DuplicateCaptureGroupName,

    /// A `\k` not followed by `<name>`.
    #[error("Invalid named reference")]
    InvalidNamedReference,

    /// A `\k<name>` whose name no group declares.
    #[error("Invalid named capture referenced")]
    InvalidNamedCaptureReferenced,

    /// An escape sequence the active grammar does not allow.
    #[error("Invalid escape")]
    InvalidEscape,

    /// A malformed `\u` escape.
    #[error("Invalid unicode escape")]
    InvalidUnicodeEscape,

    /// An unknown or malformed `\p{…}` property.
    #[error("Invalid property name")]
    InvalidPropertyName,

    /// A class range whose bound is a character set.
    #[error("Invalid character class")]
    InvalidCharacterClass,

    /// A class range whose minimum exceeds its maximum.
    #[error("Range out of order in character class")]
    RangeOutOfOrder,

    /// A character that may not appear unescaped in a `v`-mode class.
    #[error("Invalid character in character class")]
    InvalidClassCharacter,

    /// A malformed `&&` or `--` chain, or a doubled reserved punctuator.
    #[error("Invalid set operation in character class")]
    InvalidSetOperation,

    /// `[^…]` or `\P{…}` over a set that may contain strings.
    #[error("Negated character class may contain strings")]
    NegatedClassWithStrings,
}

/// A fatal syntax error in a RegExp literal, pattern or flags string.
///
/// `index` is a UTF-16 code-unit offset into the source passed to the entry
/// point. `unicode` is set when the `u` grammar was active, `unicode_sets`
/// when the `v` grammar was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid regular expression{context}: {kind}")]
pub struct RegExpSyntaxError {
    /// What went wrong.
    pub kind: SyntaxErrorKind,
    /// Where it went wrong.
    pub index: usize,
    /// `u` mode was active.
    pub unicode: bool,
    /// `v` mode was active.
    pub unicode_sets: bool,
    /// `": <source>"` prefix of the message, or empty for flags input.
    pub context: String,
}

impl RegExpSyntaxError {
    /// The message without the `Invalid regular expression` prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Convenient `Result` alias for fallible validator and parser operations.
pub type RegExpResult<T> = Result<T, RegExpSyntaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn error(kind: SyntaxErrorKind, context: &str) -> RegExpSyntaxError {
        RegExpSyntaxError {
            kind,
            index: 0,
            unicode: false,
            unicode_sets: false,
            context: context.to_string(),
        }
    }

    #[test]
    fn test_kind_messages() {
        assert_eq!(SyntaxErrorKind::Empty.to_string(), "Empty");
        assert_eq!(
            SyntaxErrorKind::UnexpectedCharacter('a').to_string(),
            "Unexpected character 'a'"
        );
        assert_eq!(SyntaxErrorKind::TrailingBackslash.to_string(), "\\ at end of pattern");
        assert_eq!(
            SyntaxErrorKind::QuantifierOutOfOrder.to_string(),
            "numbers out of order in {} quantifier"
        );
        assert_eq!(SyntaxErrorKind::DuplicatedFlag('g').to_string(), "Duplicated flag 'g'");
    }

    #[test]
    fn test_display_with_context() {
        let err = error(SyntaxErrorKind::NothingToRepeat, ": /*/u");
        assert_eq!(err.to_string(), "Invalid regular expression: /*/u: Nothing to repeat");
        assert_eq!(err.message(), "Nothing to repeat");
    }

    #[test]
    fn test_display_without_context() {
        let err = error(SyntaxErrorKind::InvalidFlag('x'), "");
        assert_eq!(err.to_string(), "Invalid regular expression: Invalid flag 'x'");
    }
}

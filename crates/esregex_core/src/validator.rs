//! Recursive-descent validator for the ECMAScript RegExp grammar.
//!
//! # Overview
//!
//! [`RegExpValidator`] checks a literal (`/…/flags`), a bare pattern or a
//! flags string against the grammar of the configured [`EcmaVersion`].  While
//! it descends it reports every production it recognises to a
//! [`RegExpHandler`]; the unit type `()` ignores all events, which makes a
//! validator without a tree allocate nothing beyond its name sets.
//!
//! # Modes
//!
//! - *Legacy*: no `u`/`v` flag and `strict == false`.  The Annex B grammar
//!   applies (extended atoms, octal escapes, quantifiable lookaheads).
//! - *Unicode* (`u`) and *Unicode sets* (`v`): surrogate pairs are read as one
//!   code point, escapes are strict, and `\p{…}` is available.  `v` also
//!   switches character classes to set notation.
//! - *N flag*: named-group-aware escapes (`\k<name>`).  It is on from the
//!   start in `u`/`v` mode; in legacy mode a second pass turns it on when the
//!   first pass found a named group.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::debug;

use crate::ast::{BackreferenceRef, EdgeKind, EscapeSetKind, LookaroundKind, RegExpFlags};
use crate::chars::{
    BACKSPACE, CARRIAGE_RETURN, CHARACTER_TABULATION, FORM_FEED, LINE_FEED, LINE_TABULATION,
    combine_surrogate_pair, digit_to_int, display_char, is, is_class_set_reserved_double_punctuator,
    is_class_set_reserved_punctuator, is_class_set_syntax_character, is_decimal_digit, is_hex_digit,
    is_id_continue, is_identifier_part_char, is_identifier_start_char, is_latin_letter,
    is_lead_surrogate, is_line_terminator, is_octal_digit, is_syntax_character, is_trail_surrogate,
    is_unicode_property_name_character, is_unicode_property_value_character, is_valid_unicode,
};
use crate::error::{RegExpResult, RegExpSyntaxError, SyntaxErrorKind};
use crate::options::{EcmaVersion, PatternFlags, RegExpOptions};
use crate::reader::{Reader, utf16_units};
use crate::unicode::{
    is_valid_lone_general_category, is_valid_lone_unicode_property,
    is_valid_lone_unicode_property_of_string, is_valid_unicode_property,
};

// ─────────────────────────────────────────────────────────────────────────────
// RegExpHandler
// ─────────────────────────────────────────────────────────────────────────────

/// Receiver of the validator's parse events.
///
/// Every method has an empty default body, so an implementation only
/// overrides the events it cares about.  Offsets are UTF-16 code-unit
/// indices into the source handed to the validator.
#[allow(unused_variables)]
pub trait RegExpHandler {
    fn on_literal_enter(&mut self, start: usize) {}
    fn on_literal_leave(&mut self, start: usize, end: usize) {}
    fn on_flags(&mut self, start: usize, end: usize, flags: RegExpFlags) {}
    fn on_pattern_enter(&mut self, start: usize) {}
    fn on_pattern_leave(&mut self, start: usize, end: usize) {}
    fn on_disjunction_enter(&mut self, start: usize) {}
    fn on_disjunction_leave(&mut self, start: usize, end: usize) {}
    fn on_alternative_enter(&mut self, start: usize, index: usize) {}
    fn on_alternative_leave(&mut self, start: usize, end: usize, index: usize) {}
    fn on_group_enter(&mut self, start: usize) {}
    fn on_group_leave(&mut self, start: usize, end: usize) {}
    fn on_capturing_group_enter(&mut self, start: usize, name: Option<&str>) {}
    fn on_capturing_group_leave(&mut self, start: usize, end: usize, name: Option<&str>) {}
    /// `max == None` means unbounded.
    fn on_quantifier(&mut self, start: usize, end: usize, min: u64, max: Option<u64>, greedy: bool) {
    }
    fn on_lookaround_assertion_enter(&mut self, start: usize, kind: LookaroundKind, negate: bool) {
    }
    fn on_lookaround_assertion_leave(
        &mut self,
        start: usize,
        end: usize,
        kind: LookaroundKind,
        negate: bool,
    ) {
    }
    fn on_edge_assertion(&mut self, start: usize, end: usize, kind: EdgeKind) {}
    fn on_word_boundary_assertion(&mut self, start: usize, end: usize, negate: bool) {}
    fn on_any_character_set(&mut self, start: usize, end: usize) {}
    fn on_escape_character_set(
        &mut self,
        start: usize,
        end: usize,
        kind: EscapeSetKind,
        negate: bool,
    ) {
    }
    fn on_unicode_property_character_set(
        &mut self,
        start: usize,
        end: usize,
        key: &str,
        value: Option<&str>,
        negate: bool,
        strings: bool,
    ) {
    }
    fn on_character(&mut self, start: usize, end: usize, value: u32) {}
    fn on_backreference(&mut self, start: usize, end: usize, reference: &BackreferenceRef) {}
    fn on_character_class_enter(&mut self, start: usize, negate: bool, unicode_sets: bool) {}
    fn on_character_class_leave(&mut self, start: usize, end: usize, negate: bool) {}
    fn on_character_class_range(&mut self, start: usize, end: usize, min: u32, max: u32) {}
    fn on_class_intersection(&mut self, start: usize, end: usize) {}
    fn on_class_subtraction(&mut self, start: usize, end: usize) {}
    fn on_class_string_disjunction_enter(&mut self, start: usize) {}
    fn on_class_string_disjunction_leave(&mut self, start: usize, end: usize) {}
    fn on_string_alternative_enter(&mut self, start: usize, index: usize) {}
    fn on_string_alternative_leave(&mut self, start: usize, end: usize, index: usize) {}
}

/// Validation only: every event is ignored.
impl RegExpHandler for () {}

// ─────────────────────────────────────────────────────────────────────────────
// Internal helper types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Literal,
    Pattern,
    Flags,
}

/// What is being validated, for error messages.
#[derive(Debug, Clone)]
struct SourceContext {
    kind: SourceKind,
    source: Rc<[u16]>,
    start: usize,
    end: usize,
}

/// A legacy class atom: one character, or a class escape such as `\d` that
/// cannot bound a range.
#[derive(Debug, Clone, Copy)]
enum ClassAtom {
    Char(u32),
    Set,
}

/// A parsed `\p{…}` body.
#[derive(Debug)]
struct PropertyExpression {
    key: String,
    value: Option<String>,
    strings: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// RegExpValidator
// ─────────────────────────────────────────────────────────────────────────────

/// ECMAScript RegExp validator.
///
/// # Example
///
/// ```
/// use esregex_core::options::{PatternFlags, RegExpOptions};
/// use esregex_core::validator::RegExpValidator;
///
/// let mut validator = RegExpValidator::new(RegExpOptions::default());
/// assert!(validator.validate_literal("/(?<year>\\d{4})/u", 0, 17).is_ok());
/// assert!(validator.validate_pattern("a**", 0, 3, PatternFlags::LEGACY).is_err());
/// ```
#[derive(Debug)]
pub struct RegExpValidator<H = ()> {
    reader: Reader,
    options: RegExpOptions,
    handler: H,
    src_ctx: SourceContext,
    unicode_mode: bool,
    unicode_sets_mode: bool,
    n_flag: bool,
    last_int_value: u32,
    last_range: (u64, Option<u64>),
    last_str_value: String,
    last_assertion_is_quantifiable: bool,
    num_capturing_parens: u32,
    group_names: HashSet<String>,
    backreference_names: HashSet<String>,
}

impl<H> Deref for RegExpValidator<H> {
    type Target = Reader;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl<H> DerefMut for RegExpValidator<H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

impl RegExpValidator<()> {
    /// A validator that reports nothing but success or the first error.
    pub fn new(options: RegExpOptions) -> Self {
        Self::with_handler(options, ())
    }
}

impl<H: RegExpHandler> RegExpValidator<H> {
    /// A validator that reports every recognised production to `handler`.
    pub fn with_handler(options: RegExpOptions, handler: H) -> Self {
        Self {
            reader: Reader::new(),
            options,
            handler,
            src_ctx: SourceContext {
                kind: SourceKind::Pattern,
                source: Rc::from(Vec::new()),
                start: 0,
                end: 0,
            },
            unicode_mode: false,
            unicode_sets_mode: false,
            n_flag: false,
            last_int_value: 0,
            last_range: (0, None),
            last_str_value: String::new(),
            last_assertion_is_quantifiable: false,
            num_capturing_parens: 0,
            group_names: HashSet::new(),
            backreference_names: HashSet::new(),
        }
    }

    pub fn options(&self) -> &RegExpOptions {
        &self.options
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the validator and return its handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    // ── Entry points ────────────────────────────────────────────────────────

    /// Validate the literal `/pattern/flags` in `source[start..end]`.
    ///
    /// `start` and `end` are UTF-16 offsets; both are clamped to the source.
    pub fn validate_literal(&mut self, source: &str, start: usize, end: usize) -> RegExpResult<()> {
        self.validate_literal_units(utf16_units(source), start, end)
    }

    /// Validate the flags string in `source[start..end]`.
    pub fn validate_flags(&mut self, source: &str, start: usize, end: usize) -> RegExpResult<()> {
        self.validate_flags_units(utf16_units(source), start, end)
    }

    /// Validate the bare pattern in `source[start..end]` under `flags`.
    pub fn validate_pattern(
        &mut self,
        source: &str,
        start: usize,
        end: usize,
        flags: PatternFlags,
    ) -> RegExpResult<()> {
        self.validate_pattern_units(utf16_units(source), start, end, flags)
    }

    pub(crate) fn validate_literal_units(
        &mut self,
        source: Rc<[u16]>,
        start: usize,
        end: usize,
    ) -> RegExpResult<()> {
        let (start, end) = clamp(&source, start, end);
        debug!(
            "validating literal {:?}",
            String::from_utf16_lossy(&source[start..end])
        );
        self.src_ctx = SourceContext {
            kind: SourceKind::Literal,
            source: Rc::clone(&source),
            start,
            end,
        };
        self.unicode_mode = false;
        self.unicode_sets_mode = false;
        self.n_flag = false;
        self.reader.reset(Rc::clone(&source), start, end, false);

        self.handler.on_literal_enter(start);
        if self.eat('/') && self.eat_regexp_body()? && self.eat('/') {
            let flag_start = self.index();
            let flags = &source[flag_start..end];
            let unicode = flags.contains(&(b'u' as u16));
            let unicode_sets = flags.contains(&(b'v' as u16));
            self.validate_flags_internal(flag_start, end)?;
            self.validate_pattern_internal(
                start + 1,
                flag_start - 1,
                PatternFlags {
                    unicode,
                    unicode_sets,
                },
            )?;
        } else if start >= end {
            return Err(self.raise(SyntaxErrorKind::Empty));
        } else {
            let kind = match self.current_code_point() {
                Some(cp) => SyntaxErrorKind::UnexpectedCharacter(display_char(cp)),
                None => SyntaxErrorKind::Empty,
            };
            return Err(self.raise(kind));
        }
        self.handler.on_literal_leave(start, end);
        Ok(())
    }

    pub(crate) fn validate_flags_units(
        &mut self,
        source: Rc<[u16]>,
        start: usize,
        end: usize,
    ) -> RegExpResult<()> {
        let (start, end) = clamp(&source, start, end);
        debug!(
            "validating flags {:?}",
            String::from_utf16_lossy(&source[start..end])
        );
        self.src_ctx = SourceContext {
            kind: SourceKind::Flags,
            source,
            start,
            end,
        };
        self.unicode_mode = false;
        self.unicode_sets_mode = false;
        self.validate_flags_internal(start, end)
    }

    pub(crate) fn validate_pattern_units(
        &mut self,
        source: Rc<[u16]>,
        start: usize,
        end: usize,
        flags: PatternFlags,
    ) -> RegExpResult<()> {
        let (start, end) = clamp(&source, start, end);
        debug!(
            "validating pattern {:?} ({flags:?})",
            String::from_utf16_lossy(&source[start..end])
        );
        self.src_ctx = SourceContext {
            kind: SourceKind::Pattern,
            source,
            start,
            end,
        };
        self.validate_pattern_internal(start, end, flags)
    }

    fn validate_pattern_internal(
        &mut self,
        start: usize,
        end: usize,
        flags: PatternFlags,
    ) -> RegExpResult<()> {
        self.apply_pattern_flags(flags, end)?;
        let source = Rc::clone(&self.src_ctx.source);
        self.reader.reset(source, start, end, self.unicode_mode);
        self.consume_pattern()?;

        if !self.n_flag && self.ecma_version() >= EcmaVersion::Es2018 && !self.group_names.is_empty()
        {
            debug!("named capture group found; re-parsing with named-group escapes");
            self.n_flag = true;
            self.rewind(start);
            self.consume_pattern()?;
        }
        Ok(())
    }

    fn validate_flags_internal(&mut self, start: usize, end: usize) -> RegExpResult<()> {
        let version = self.ecma_version();
        let mut flags = RegExpFlags::default();
        let mut seen = HashSet::new();
        for i in start..end {
            let unit = self.src_ctx.source[i];
            let ch = display_char(u32::from(unit));
            if !seen.insert(unit) {
                return Err(self.raise_at(SyntaxErrorKind::DuplicatedFlag(ch), start));
            }
            let slot = match ch {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                'u' if version >= EcmaVersion::Es2015 => &mut flags.unicode,
                'y' if version >= EcmaVersion::Es2015 => &mut flags.sticky,
                's' if version >= EcmaVersion::Es2018 => &mut flags.dot_all,
                'd' if version >= EcmaVersion::Es2022 => &mut flags.has_indices,
                'v' if version >= EcmaVersion::Es2024 => &mut flags.unicode_sets,
                _ => return Err(self.raise_at(SyntaxErrorKind::InvalidFlag(ch), start)),
            };
            *slot = true;
        }
        if flags.unicode && flags.unicode_sets {
            return Err(self.raise_at(SyntaxErrorKind::InvalidFlags, start));
        }
        self.handler.on_flags(start, end, flags);
        Ok(())
    }

    /// Derive the grammar mode from the requested pattern flags.
    fn apply_pattern_flags(&mut self, flags: PatternFlags, source_end: usize) -> RegExpResult<()> {
        let version = self.ecma_version();
        let (unicode, unicode_sets) = if version >= EcmaVersion::Es2015 {
            (
                flags.unicode,
                version >= EcmaVersion::Es2024 && flags.unicode_sets,
            )
        } else {
            (false, false)
        };
        if unicode && unicode_sets {
            return Err(self.raise_with(SyntaxErrorKind::InvalidFlags, source_end + 1, true, true));
        }
        self.unicode_mode = unicode || unicode_sets;
        self.unicode_sets_mode = unicode_sets;
        self.n_flag = (unicode && version >= EcmaVersion::Es2018)
            || unicode_sets
            || (self.options.strict && version >= EcmaVersion::Es2023);
        Ok(())
    }

    // ── Mode queries ────────────────────────────────────────────────────────

    fn ecma_version(&self) -> EcmaVersion {
        self.options.ecma_version
    }

    /// Annex B leniencies are off.
    fn strict(&self) -> bool {
        self.options.strict || self.unicode_mode
    }

    fn current_is(&self, ch: char) -> bool {
        self.current_code_point() == Some(ch as u32)
    }

    // ── Errors ──────────────────────────────────────────────────────────────

    fn raise(&self, kind: SyntaxErrorKind) -> RegExpSyntaxError {
        self.raise_at(kind, self.index())
    }

    fn raise_at(&self, kind: SyntaxErrorKind, index: usize) -> RegExpSyntaxError {
        self.raise_with(
            kind,
            index,
            self.unicode_mode && !self.unicode_sets_mode,
            self.unicode_sets_mode,
        )
    }

    fn raise_with(
        &self,
        kind: SyntaxErrorKind,
        index: usize,
        unicode: bool,
        unicode_sets: bool,
    ) -> RegExpSyntaxError {
        let ctx = &self.src_ctx;
        let text = String::from_utf16_lossy(&ctx.source[ctx.start..ctx.end]);
        let context = match ctx.kind {
            SourceKind::Literal if !text.is_empty() => format!(": {text}"),
            SourceKind::Literal | SourceKind::Flags => String::new(),
            SourceKind::Pattern => format!(
                ": /{text}/{}{}",
                if unicode { "u" } else { "" },
                if unicode_sets { "v" } else { "" }
            ),
        };
        let err = RegExpSyntaxError {
            kind,
            index,
            unicode,
            unicode_sets,
            context,
        };
        debug!("syntax error at {index}: {err}");
        err
    }

    // ── Literal body ────────────────────────────────────────────────────────

    /// Skip the body of a literal up to (not including) its closing `/`.
    /// Returns `false` for an empty body.
    fn eat_regexp_body(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        let mut in_class = false;
        let mut escaped = false;
        loop {
            let cp = match self.current_code_point() {
                Some(cp) if !is_line_terminator(cp) => cp,
                _ => {
                    let kind = if in_class {
                        SyntaxErrorKind::UnterminatedCharacterClass
                    } else {
                        SyntaxErrorKind::UnterminatedRegExp
                    };
                    return Err(self.raise(kind));
                }
            };
            if escaped {
                escaped = false;
            } else if is(cp, '\\') {
                escaped = true;
            } else if is(cp, '[') {
                in_class = true;
            } else if is(cp, ']') {
                in_class = false;
            } else if (is(cp, '/') && !in_class) || (is(cp, '*') && self.index() == start) {
                break;
            }
            self.advance();
        }
        Ok(self.index() != start)
    }

    // ── Pattern structure ───────────────────────────────────────────────────

    /// ```grammar
    /// Pattern[UnicodeMode, UnicodeSetsMode, N]::
    ///     Disjunction[?UnicodeMode, ?UnicodeSetsMode, ?N]
    /// ```
    fn consume_pattern(&mut self) -> RegExpResult<()> {
        let start = self.index();
        self.num_capturing_parens = self.count_capturing_parens();
        self.group_names.clear();
        self.backreference_names.clear();

        self.handler.on_pattern_enter(start);
        self.consume_disjunction()?;

        if let Some(cp) = self.current_code_point() {
            let kind = match char::from_u32(cp) {
                Some(')') => SyntaxErrorKind::UnmatchedParen,
                Some('\\') => SyntaxErrorKind::TrailingBackslash,
                Some(']' | '}') => SyntaxErrorKind::LoneQuantifierBrackets,
                _ => SyntaxErrorKind::UnexpectedCharacter(display_char(cp)),
            };
            return Err(self.raise(kind));
        }
        if self
            .backreference_names
            .iter()
            .any(|name| !self.group_names.contains(name))
        {
            return Err(self.raise(SyntaxErrorKind::InvalidNamedCaptureReferenced));
        }
        self.handler.on_pattern_leave(start, self.index());
        Ok(())
    }

    /// Count the capturing groups of the whole pattern without consuming it,
    /// so that `\N` can refer to a group that opens later.
    fn count_capturing_parens(&mut self) -> u32 {
        let start = self.index();
        let mut in_class = false;
        let mut escaped = false;
        let mut count = 0u32;
        while let Some(cp) = self.current_code_point() {
            if escaped {
                escaped = false;
            } else if is(cp, '\\') {
                escaped = true;
            } else if is(cp, '[') {
                in_class = true;
            } else if is(cp, ']') {
                in_class = false;
            } else if is(cp, '(') && !in_class {
                let next = self.next_code_point();
                let named = self.next_code_point2() == Some('<' as u32)
                    && !matches!(self.next_code_point3(), Some(c) if is(c, '=') || is(c, '!'));
                if next != Some('?' as u32) || named {
                    count = count.saturating_add(1);
                }
            }
            self.advance();
        }
        self.rewind(start);
        count
    }

    /// ```grammar
    /// Disjunction[UnicodeMode, UnicodeSetsMode, N]::
    ///     Alternative[?UnicodeMode, ?UnicodeSetsMode, ?N]
    ///     Alternative[?UnicodeMode, ?UnicodeSetsMode, ?N] `|` Disjunction[?UnicodeMode, ?UnicodeSetsMode, ?N]
    /// ```
    fn consume_disjunction(&mut self) -> RegExpResult<()> {
        let start = self.index();
        let mut i = 0;
        self.handler.on_disjunction_enter(start);
        loop {
            self.consume_alternative(i)?;
            i += 1;
            if !self.eat('|') {
                break;
            }
        }
        if self.consume_quantifier(true)? {
            return Err(self.raise(SyntaxErrorKind::NothingToRepeat));
        }
        if self.eat('{') {
            return Err(self.raise(SyntaxErrorKind::LoneQuantifierBrackets));
        }
        self.handler.on_disjunction_leave(start, self.index());
        Ok(())
    }

    /// ```grammar
    /// Alternative[UnicodeMode, UnicodeSetsMode, N]::
    ///     [empty]
    ///     Alternative[?UnicodeMode, ?UnicodeSetsMode, ?N] Term[?UnicodeMode, ?UnicodeSetsMode, ?N]
    /// ```
    fn consume_alternative(&mut self, i: usize) -> RegExpResult<()> {
        let start = self.index();
        self.handler.on_alternative_enter(start, i);
        while self.current_code_point().is_some() && self.consume_term()? {}
        self.handler.on_alternative_leave(start, self.index(), i);
        Ok(())
    }

    /// ```grammar
    /// Term[UnicodeMode, UnicodeSetsMode, N]::
    ///     [strict] Assertion
    ///     [strict] Atom Quantifier?
    ///     [annexB][+UnicodeMode] Assertion
    ///     [annexB][+UnicodeMode] Atom Quantifier?
    ///     [annexB][~UnicodeMode] QuantifiableAssertion Quantifier
    ///     [annexB][~UnicodeMode] Assertion
    ///     [annexB][~UnicodeMode] ExtendedAtom Quantifier?
    /// ```
    fn consume_term(&mut self) -> RegExpResult<bool> {
        if self.unicode_mode || self.strict() {
            return Ok(self.consume_assertion()?
                || (self.consume_atom()? && self.consume_optional_quantifier()?));
        }
        Ok((self.consume_assertion()?
            && (!self.last_assertion_is_quantifiable || self.consume_optional_quantifier()?))
            || (self.consume_extended_atom()? && self.consume_optional_quantifier()?))
    }

    fn consume_optional_quantifier(&mut self) -> RegExpResult<bool> {
        self.consume_quantifier(false)?;
        Ok(true)
    }

    /// Sets `last_assertion_is_quantifiable` when the assertion was a
    /// `QuantifiableAssertion`.
    ///
    /// ```grammar
    /// Assertion::
    ///     `^`
    ///     `$`
    ///     `\b`
    ///     `\B`
    ///     `(?=` Disjunction `)`
    ///     `(?!` Disjunction `)`
    ///     `(?<=` Disjunction `)`
    ///     `(?<!` Disjunction `)`
    /// ```
    fn consume_assertion(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        self.last_assertion_is_quantifiable = false;

        if self.eat('^') {
            self.handler
                .on_edge_assertion(start, self.index(), EdgeKind::Start);
            return Ok(true);
        }
        if self.eat('$') {
            self.handler.on_edge_assertion(start, self.index(), EdgeKind::End);
            return Ok(true);
        }
        if self.eat2('\\', 'B') {
            self.handler
                .on_word_boundary_assertion(start, self.index(), true);
            return Ok(true);
        }
        if self.eat2('\\', 'b') {
            self.handler
                .on_word_boundary_assertion(start, self.index(), false);
            return Ok(true);
        }

        // Lookahead / lookbehind
        if self.eat2('(', '?') {
            let lookbehind = self.ecma_version() >= EcmaVersion::Es2018 && self.eat('<');
            let negate = if self.eat('=') {
                Some(false)
            } else if self.eat('!') {
                Some(true)
            } else {
                None
            };
            if let Some(negate) = negate {
                let kind = if lookbehind {
                    LookaroundKind::Lookbehind
                } else {
                    LookaroundKind::Lookahead
                };
                self.handler.on_lookaround_assertion_enter(start, kind, negate);
                self.consume_disjunction()?;
                if !self.eat(')') {
                    return Err(self.raise(SyntaxErrorKind::UnterminatedGroup));
                }
                self.last_assertion_is_quantifiable = !lookbehind && !self.strict();
                self.handler
                    .on_lookaround_assertion_leave(start, self.index(), kind, negate);
                return Ok(true);
            }
            self.rewind(start);
        }
        Ok(false)
    }

    /// With `no_consume` the quantifier is recognised but not reported; used
    /// to diagnose a quantifier with nothing to repeat.
    ///
    /// ```grammar
    /// Quantifier::
    ///     QuantifierPrefix
    ///     QuantifierPrefix `?`
    /// QuantifierPrefix::
    ///     `*`
    ///     `+`
    ///     `?`
    ///     `{` DecimalDigits `}`
    ///     `{` DecimalDigits `,}`
    ///     `{` DecimalDigits `,` DecimalDigits `}`
    /// ```
    fn consume_quantifier(&mut self, no_consume: bool) -> RegExpResult<bool> {
        let start = self.index();
        let (min, max) = if self.eat('*') {
            (0, None)
        } else if self.eat('+') {
            (1, None)
        } else if self.eat('?') {
            (0, Some(1))
        } else if self.eat_braced_quantifier(no_consume)? {
            self.last_range
        } else {
            return Ok(false);
        };
        let greedy = !self.eat('?');
        if !no_consume {
            self.handler
                .on_quantifier(start, self.index(), min, max, greedy);
        }
        Ok(true)
    }

    /// Sets `last_range` on success.
    fn eat_braced_quantifier(&mut self, no_error: bool) -> RegExpResult<bool> {
        let start = self.index();
        if self.eat('{') {
            if let Some(min) = self.eat_decimal_digits() {
                let max = if self.eat(',') {
                    self.eat_decimal_digits()
                } else {
                    Some(min)
                };
                if self.current_is('}') {
                    if !no_error && max.is_some_and(|max| max < min) {
                        return Err(self.raise(SyntaxErrorKind::QuantifierOutOfOrder));
                    }
                    self.advance();
                    self.last_range = (min, max);
                    return Ok(true);
                }
            }
            if !no_error && (self.unicode_mode || self.strict()) {
                return Err(self.raise(SyntaxErrorKind::IncompleteQuantifier));
            }
            self.rewind(start);
        }
        Ok(false)
    }

    // ── Atoms ───────────────────────────────────────────────────────────────

    /// ```grammar
    /// Atom::
    ///     PatternCharacter
    ///     `.`
    ///     `\` AtomEscape
    ///     CharacterClass
    ///     `(` GroupSpecifier? Disjunction `)`
    ///     `(?:` Disjunction `)`
    /// ```
    fn consume_atom(&mut self) -> RegExpResult<bool> {
        Ok(self.consume_pattern_character()
            || self.consume_dot()
            || self.consume_reverse_solidus_atom_escape()?
            || self.consume_character_class()?.is_some()
            || self.consume_uncapturing_group()?
            || self.consume_capturing_group()?)
    }

    fn consume_dot(&mut self) -> bool {
        if self.eat('.') {
            self.handler
                .on_any_character_set(self.index() - 1, self.index());
            return true;
        }
        false
    }

    fn consume_reverse_solidus_atom_escape(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        if self.eat('\\') {
            if self.consume_atom_escape()? {
                return Ok(true);
            }
            self.rewind(start);
        }
        Ok(false)
    }

    fn consume_uncapturing_group(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        if self.eat3('(', '?', ':') {
            self.handler.on_group_enter(start);
            self.consume_disjunction()?;
            if !self.eat(')') {
                return Err(self.raise(SyntaxErrorKind::UnterminatedGroup));
            }
            self.handler.on_group_leave(start, self.index());
            return Ok(true);
        }
        Ok(false)
    }

    fn consume_capturing_group(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        if self.eat('(') {
            let mut name = None;
            if self.ecma_version() >= EcmaVersion::Es2018 {
                if self.consume_group_specifier(start)? {
                    name = Some(self.last_str_value.clone());
                }
            } else if self.current_is('?') {
                return Err(self.raise(SyntaxErrorKind::InvalidGroup));
            }

            self.handler.on_capturing_group_enter(start, name.as_deref());
            self.consume_disjunction()?;
            if !self.eat(')') {
                return Err(self.raise(SyntaxErrorKind::UnterminatedGroup));
            }
            self.handler
                .on_capturing_group_leave(start, self.index(), name.as_deref());
            return Ok(true);
        }
        Ok(false)
    }

    /// ```grammar
    /// ExtendedAtom[N]::
    ///     `.`
    ///     `\` AtomEscape
    ///     `\` [lookahead = c]
    ///     CharacterClass
    ///     `(` GroupSpecifier? Disjunction `)`
    ///     `(?:` Disjunction `)`
    ///     InvalidBracedQuantifier
    ///     ExtendedPatternCharacter
    /// ```
    fn consume_extended_atom(&mut self) -> RegExpResult<bool> {
        Ok(self.consume_dot()
            || self.consume_reverse_solidus_atom_escape()?
            || self.consume_reverse_solidus_followed_by_c()
            || self.consume_character_class()?.is_some()
            || self.consume_uncapturing_group()?
            || self.consume_capturing_group()?
            || self.consume_invalid_braced_quantifier()?
            || self.consume_extended_pattern_character())
    }

    /// `\` followed by `c` that is not a control escape: a literal backslash.
    fn consume_reverse_solidus_followed_by_c(&mut self) -> bool {
        let start = self.index();
        if self.current_is('\\') && self.next_code_point() == Some('c' as u32) {
            self.last_int_value = '\\' as u32;
            self.advance();
            self.handler.on_character(start, self.index(), '\\' as u32);
            return true;
        }
        false
    }

    fn consume_invalid_braced_quantifier(&mut self) -> RegExpResult<bool> {
        if self.eat_braced_quantifier(true)? {
            return Err(self.raise(SyntaxErrorKind::NothingToRepeat));
        }
        Ok(false)
    }

    fn consume_pattern_character(&mut self) -> bool {
        let start = self.index();
        match self.current_code_point() {
            Some(cp) if !is_syntax_character(cp) => {
                self.advance();
                self.handler.on_character(start, self.index(), cp);
                true
            }
            _ => false,
        }
    }

    fn consume_extended_pattern_character(&mut self) -> bool {
        let start = self.index();
        match self.current_code_point() {
            Some(cp) if !"^$\\.*+?()[|".chars().any(|ch| is(cp, ch)) => {
                self.advance();
                self.handler.on_character(start, self.index(), cp);
                true
            }
            _ => false,
        }
    }

    /// `?<name>` after the `(` at `group_start`.  Sets `last_str_value`.
    fn consume_group_specifier(&mut self, group_start: usize) -> RegExpResult<bool> {
        if self.eat('?') {
            if self.eat_group_name()? {
                if self.group_names.insert(self.last_str_value.clone()) {
                    return Ok(true);
                }
                return Err(self.raise_at(SyntaxErrorKind::DuplicateCaptureGroupName, group_start));
            }
            return Err(self.raise(SyntaxErrorKind::InvalidGroup));
        }
        Ok(false)
    }

    // ── Escapes ─────────────────────────────────────────────────────────────

    /// ```grammar
    /// AtomEscape[UnicodeMode, N]::
    ///     [+UnicodeMode] DecimalEscape
    ///     [~UnicodeMode] DecimalEscape but only if the value is <= NcapturingParens
    ///     CharacterClassEscape[?UnicodeMode]
    ///     CharacterEscape[?UnicodeMode, ?N]
    ///     [+N] `k` GroupName[?UnicodeMode]
    /// ```
    fn consume_atom_escape(&mut self) -> RegExpResult<bool> {
        if self.consume_backreference()?
            || self.consume_character_class_escape()?.is_some()
            || self.consume_character_escape()?
            || (self.n_flag && self.consume_k_group_name()?)
        {
            return Ok(true);
        }
        if self.strict() || self.unicode_mode {
            return Err(self.raise(SyntaxErrorKind::InvalidEscape));
        }
        Ok(false)
    }

    fn consume_backreference(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        if let Some(n) = self.eat_decimal_escape() {
            match u32::try_from(n) {
                Ok(n) if n <= self.num_capturing_parens => {
                    self.handler.on_backreference(
                        start - 1,
                        self.index(),
                        &BackreferenceRef::Index(n),
                    );
                    return Ok(true);
                }
                _ => {}
            }
            if self.strict() || self.unicode_mode {
                return Err(self.raise(SyntaxErrorKind::InvalidEscape));
            }
            self.rewind(start);
        }
        Ok(false)
    }

    /// `\d \D \s \S \w \W`, and `\p{…} \P{…}` in Unicode mode.
    ///
    /// Returns `Some(may_contain_strings)` when an escape was consumed.
    fn consume_character_class_escape(&mut self) -> RegExpResult<Option<bool>> {
        let start = self.index();
        const ESCAPE_SETS: [(char, EscapeSetKind, bool); 6] = [
            ('d', EscapeSetKind::Digit, false),
            ('D', EscapeSetKind::Digit, true),
            ('s', EscapeSetKind::Space, false),
            ('S', EscapeSetKind::Space, true),
            ('w', EscapeSetKind::Word, false),
            ('W', EscapeSetKind::Word, true),
        ];
        for (ch, kind, negate) in ESCAPE_SETS {
            if self.eat(ch) {
                self.handler
                    .on_escape_character_set(start - 1, self.index(), kind, negate);
                return Ok(Some(false));
            }
        }

        if self.unicode_mode && self.ecma_version() >= EcmaVersion::Es2018 {
            let negate = if self.eat('p') {
                Some(false)
            } else if self.eat('P') {
                Some(true)
            } else {
                None
            };
            if let Some(negate) = negate {
                if self.eat('{') {
                    if let Some(property) = self.eat_unicode_property_value_expression()? {
                        if self.eat('}') {
                            if negate && property.strings {
                                return Err(self.raise(SyntaxErrorKind::InvalidPropertyName));
                            }
                            self.handler.on_unicode_property_character_set(
                                start - 1,
                                self.index(),
                                &property.key,
                                property.value.as_deref(),
                                negate,
                                property.strings,
                            );
                            return Ok(Some(property.strings));
                        }
                    }
                }
                return Err(self.raise(SyntaxErrorKind::InvalidPropertyName));
            }
        }
        Ok(None)
    }

    /// Sets `last_int_value` to the escaped code point.
    ///
    /// ```grammar
    /// CharacterEscape[UnicodeMode, N]::
    ///     ControlEscape
    ///     `c` ControlLetter
    ///     `0` [lookahead ∉ DecimalDigit]
    ///     HexEscapeSequence
    ///     RegExpUnicodeEscapeSequence[?UnicodeMode]
    ///     [~UnicodeMode] LegacyOctalEscapeSequence
    ///     IdentityEscape[?UnicodeMode, ?N]
    /// ```
    fn consume_character_escape(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        if self.eat_control_escape()
            || self.eat_c_control_letter()
            || self.eat_zero()
            || self.eat_hex_escape_sequence()?
            || self.eat_regexp_unicode_escape_sequence(false)?
            || (!self.strict() && !self.unicode_mode && self.eat_legacy_octal_escape_sequence())
            || self.eat_identity_escape()
        {
            self.handler
                .on_character(start - 1, self.index(), self.last_int_value);
            return Ok(true);
        }
        Ok(false)
    }

    fn consume_k_group_name(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        if self.eat('k') {
            if self.eat_group_name()? {
                let name = self.last_str_value.clone();
                self.backreference_names.insert(name.clone());
                self.handler.on_backreference(
                    start - 1,
                    self.index(),
                    &BackreferenceRef::Name(name),
                );
                return Ok(true);
            }
            return Err(self.raise(SyntaxErrorKind::InvalidNamedReference));
        }
        Ok(false)
    }

    // ── Character classes ───────────────────────────────────────────────────

    /// ```grammar
    /// CharacterClass::
    ///     `[` [lookahead ≠ ^] ClassContents `]`
    ///     `[^` ClassContents `]`
    /// ```
    /// Returns `Some(may_contain_strings)` when a class was consumed.
    fn consume_character_class(&mut self) -> RegExpResult<Option<bool>> {
        let start = self.index();
        if self.eat('[') {
            let negate = self.eat('^');
            self.handler
                .on_character_class_enter(start, negate, self.unicode_sets_mode);
            let may_contain_strings = self.consume_class_contents()?;
            if !self.eat(']') {
                if self.current_code_point().is_none() {
                    return Err(self.raise(SyntaxErrorKind::UnterminatedCharacterClass));
                }
                return Err(self.raise(SyntaxErrorKind::InvalidClassCharacter));
            }
            if negate && may_contain_strings {
                return Err(self.raise(SyntaxErrorKind::NegatedClassWithStrings));
            }
            self.handler
                .on_character_class_leave(start, self.index(), negate);
            return Ok(Some(may_contain_strings));
        }
        Ok(None)
    }

    /// Returns whether the contents may contain strings.
    fn consume_class_contents(&mut self) -> RegExpResult<bool> {
        if self.unicode_sets_mode {
            if self.current_is(']') {
                return Ok(false);
            }
            return self.consume_class_set_expression();
        }

        let strict = self.strict() || self.unicode_mode;
        loop {
            let range_start = self.index();
            let Some(min) = self.consume_class_atom()? else {
                break;
            };
            if !self.eat('-') {
                continue;
            }
            self.handler
                .on_character(self.index() - 1, self.index(), '-' as u32);
            let Some(max) = self.consume_class_atom()? else {
                break;
            };
            let (ClassAtom::Char(min), ClassAtom::Char(max)) = (min, max) else {
                if strict {
                    return Err(self.raise(SyntaxErrorKind::InvalidCharacterClass));
                }
                continue;
            };
            if min > max {
                return Err(self.raise(SyntaxErrorKind::RangeOutOfOrder));
            }
            self.handler
                .on_character_class_range(range_start, self.index(), min, max);
        }
        Ok(false)
    }

    fn consume_class_atom(&mut self) -> RegExpResult<Option<ClassAtom>> {
        let start = self.index();
        if let Some(cp) = self.current_code_point() {
            if !is(cp, '\\') && !is(cp, ']') {
                self.advance();
                self.last_int_value = cp;
                self.handler.on_character(start, self.index(), cp);
                return Ok(Some(ClassAtom::Char(cp)));
            }
        }
        if self.eat('\\') {
            if let Some(atom) = self.consume_class_escape()? {
                return Ok(Some(atom));
            }
            if !self.strict() && self.current_is('c') {
                self.last_int_value = '\\' as u32;
                self.handler
                    .on_character(start, self.index(), self.last_int_value);
                return Ok(Some(ClassAtom::Char(self.last_int_value)));
            }
            if self.strict() || self.unicode_mode {
                return Err(self.raise(SyntaxErrorKind::InvalidEscape));
            }
            self.rewind(start);
        }
        Ok(None)
    }

    /// ```grammar
    /// ClassEscape[UnicodeMode, N]::
    ///     `b`
    ///     [+UnicodeMode] `-`
    ///     [annexB][~UnicodeMode] `c` ClassControlLetter
    ///     CharacterClassEscape[?UnicodeMode]
    ///     CharacterEscape[?UnicodeMode, ?N]
    /// ```
    fn consume_class_escape(&mut self) -> RegExpResult<Option<ClassAtom>> {
        let start = self.index();
        if self.eat('b') {
            self.last_int_value = BACKSPACE;
            self.handler.on_character(start - 1, self.index(), BACKSPACE);
            return Ok(Some(ClassAtom::Char(BACKSPACE)));
        }
        if self.unicode_mode && self.eat('-') {
            self.last_int_value = '-' as u32;
            self.handler
                .on_character(start - 1, self.index(), self.last_int_value);
            return Ok(Some(ClassAtom::Char(self.last_int_value)));
        }
        if !self.strict() && !self.unicode_mode && self.current_is('c') {
            let control = self
                .next_code_point()
                .filter(|&cp| is_decimal_digit(cp) || is(cp, '_'));
            if let Some(cp) = control {
                self.advance();
                self.advance();
                self.last_int_value = cp % 0x20;
                self.handler
                    .on_character(start - 1, self.index(), self.last_int_value);
                return Ok(Some(ClassAtom::Char(self.last_int_value)));
            }
        }
        if self.consume_character_class_escape()?.is_some() {
            return Ok(Some(ClassAtom::Set));
        }
        if self.consume_character_escape()? {
            return Ok(Some(ClassAtom::Char(self.last_int_value)));
        }
        Ok(None)
    }

    // ── Class set notation (`v` mode) ───────────────────────────────────────

    /// ```grammar
    /// ClassSetExpression::
    ///     ClassUnion
    ///     ClassIntersection
    ///     ClassSubtraction
    /// ClassIntersection::
    ///     ClassSetOperand `&&` [lookahead ≠ &] ClassSetOperand
    ///     ClassIntersection `&&` [lookahead ≠ &] ClassSetOperand
    /// ClassSubtraction::
    ///     ClassSetOperand `--` ClassSetOperand
    ///     ClassSubtraction `--` ClassSetOperand
    /// ```
    fn consume_class_set_expression(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        let mut may_contain_strings;
        if let Some(min) = self.consume_class_set_character()? {
            if self.consume_class_set_range_from_operator(start, min)? {
                return self.consume_class_union_right(false);
            }
            may_contain_strings = false;
        } else if let Some(strings) = self.consume_class_set_operand()? {
            may_contain_strings = strings;
        } else {
            let cp = self.current_code_point();
            if cp == Some('\\' as u32) {
                self.advance();
                return Err(self.raise(SyntaxErrorKind::InvalidEscape));
            }
            if let Some(cp) = cp {
                if self.next_code_point() == Some(cp) && is_class_set_reserved_double_punctuator(cp)
                {
                    return Err(self.raise(SyntaxErrorKind::InvalidSetOperation));
                }
            }
            return Err(self.raise(SyntaxErrorKind::InvalidClassCharacter));
        }

        if self.eat2('&', '&') {
            while !self.current_is('&') {
                let Some(strings) = self.consume_class_set_operand()? else {
                    break;
                };
                self.handler.on_class_intersection(start, self.index());
                if !strings {
                    may_contain_strings = false;
                }
                if self.eat2('&', '&') {
                    continue;
                }
                return Ok(may_contain_strings);
            }
            return Err(self.raise(SyntaxErrorKind::InvalidClassCharacter));
        }
        if self.eat2('-', '-') {
            while self.consume_class_set_operand()?.is_some() {
                self.handler.on_class_subtraction(start, self.index());
                if self.eat2('-', '-') {
                    continue;
                }
                return Ok(may_contain_strings);
            }
            return Err(self.raise(SyntaxErrorKind::InvalidClassCharacter));
        }
        self.consume_class_union_right(may_contain_strings)
    }

    /// The remainder of a `ClassUnion` after its first member.
    fn consume_class_union_right(&mut self, left_may_contain_strings: bool) -> RegExpResult<bool> {
        let mut may_contain_strings = left_may_contain_strings;
        loop {
            let start = self.index();
            if let Some(min) = self.consume_class_set_character()? {
                self.consume_class_set_range_from_operator(start, min)?;
                continue;
            }
            match self.consume_class_set_operand()? {
                Some(strings) => may_contain_strings |= strings,
                None => break,
            }
        }
        Ok(may_contain_strings)
    }

    /// `-` ClassSetCharacter after the character `min` that began at `start`.
    fn consume_class_set_range_from_operator(&mut self, start: usize, min: u32) -> RegExpResult<bool> {
        let current_start = self.index();
        if self.eat('-') {
            if let Some(max) = self.consume_class_set_character()? {
                if min > max {
                    return Err(self.raise(SyntaxErrorKind::RangeOutOfOrder));
                }
                self.handler
                    .on_character_class_range(start, self.index(), min, max);
                return Ok(true);
            }
            self.rewind(current_start);
        }
        Ok(false)
    }

    /// ```grammar
    /// ClassSetOperand::
    ///     NestedClass
    ///     ClassStringDisjunction
    ///     ClassSetCharacter
    /// ```
    fn consume_class_set_operand(&mut self) -> RegExpResult<Option<bool>> {
        if let Some(strings) = self.consume_nested_class()? {
            return Ok(Some(strings));
        }
        if let Some(strings) = self.consume_class_string_disjunction()? {
            return Ok(Some(strings));
        }
        if self.consume_class_set_character()?.is_some() {
            return Ok(Some(false));
        }
        Ok(None)
    }

    /// ```grammar
    /// NestedClass::
    ///     `[` [lookahead ≠ ^] ClassContents[+UnicodeMode, +UnicodeSetsMode] `]`
    ///     `[^` ClassContents[+UnicodeMode, +UnicodeSetsMode] `]`
    ///     `\` CharacterClassEscape[+UnicodeMode]
    /// ```
    fn consume_nested_class(&mut self) -> RegExpResult<Option<bool>> {
        let start = self.index();
        if self.eat('[') {
            let negate = self.eat('^');
            self.handler.on_character_class_enter(start, negate, true);
            let may_contain_strings = self.consume_class_contents()?;
            if !self.eat(']') {
                return Err(self.raise(SyntaxErrorKind::UnterminatedCharacterClass));
            }
            if negate && may_contain_strings {
                return Err(self.raise(SyntaxErrorKind::NegatedClassWithStrings));
            }
            self.handler
                .on_character_class_leave(start, self.index(), negate);
            return Ok(Some(may_contain_strings));
        }
        if self.eat('\\') {
            if let Some(strings) = self.consume_character_class_escape()? {
                return Ok(Some(strings));
            }
            self.rewind(start);
        }
        Ok(None)
    }

    /// `\q{…|…}`
    fn consume_class_string_disjunction(&mut self) -> RegExpResult<Option<bool>> {
        let start = self.index();
        if self.eat3('\\', 'q', '{') {
            self.handler.on_class_string_disjunction_enter(start);
            let mut i = 0;
            let mut may_contain_strings = false;
            loop {
                may_contain_strings |= self.consume_class_string(i)?;
                i += 1;
                if !self.eat('|') {
                    break;
                }
            }
            if self.eat('}') {
                self.handler
                    .on_class_string_disjunction_leave(start, self.index());
                return Ok(Some(may_contain_strings));
            }
            return Err(self.raise(SyntaxErrorKind::UnterminatedClassStringDisjunction));
        }
        Ok(None)
    }

    /// One alternative of a `\q{…}`; returns `true` unless it is exactly one
    /// character long.
    fn consume_class_string(&mut self, i: usize) -> RegExpResult<bool> {
        let start = self.index();
        let mut count = 0usize;
        self.handler.on_string_alternative_enter(start, i);
        while self.current_code_point().is_some() && self.consume_class_set_character()?.is_some() {
            count += 1;
        }
        self.handler
            .on_string_alternative_leave(start, self.index(), i);
        Ok(count != 1)
    }

    /// ```grammar
    /// ClassSetCharacter::
    ///     [lookahead ∉ ClassSetReservedDoublePunctuator] SourceCharacter but not ClassSetSyntaxCharacter
    ///     `\` CharacterEscape[+UnicodeMode]
    ///     `\` ClassSetReservedPunctuator
    ///     `\b`
    /// ```
    fn consume_class_set_character(&mut self) -> RegExpResult<Option<u32>> {
        let start = self.index();
        if let Some(cp) = self.current_code_point() {
            let doubled =
                self.next_code_point() == Some(cp) && is_class_set_reserved_double_punctuator(cp);
            if !doubled && !is_class_set_syntax_character(cp) {
                self.last_int_value = cp;
                self.advance();
                self.handler.on_character(start, self.index(), cp);
                return Ok(Some(cp));
            }
        }
        if self.eat('\\') {
            if self.consume_character_escape()? {
                return Ok(Some(self.last_int_value));
            }
            if let Some(cp) = self
                .current_code_point()
                .filter(|&cp| is_class_set_reserved_punctuator(cp))
            {
                self.last_int_value = cp;
                self.advance();
                self.handler.on_character(start, self.index(), cp);
                return Ok(Some(cp));
            }
            if self.eat('b') {
                self.last_int_value = BACKSPACE;
                self.handler.on_character(start, self.index(), BACKSPACE);
                return Ok(Some(BACKSPACE));
            }
            self.rewind(start);
        }
        Ok(None)
    }

    // ── Group names ─────────────────────────────────────────────────────────

    /// `<` RegExpIdentifierName `>`.  Sets `last_str_value`.
    fn eat_group_name(&mut self) -> RegExpResult<bool> {
        if self.eat('<') {
            if self.eat_regexp_identifier_name()? && self.eat('>') {
                return Ok(true);
            }
            return Err(self.raise(SyntaxErrorKind::InvalidCaptureGroupName));
        }
        Ok(false)
    }

    fn eat_regexp_identifier_name(&mut self) -> RegExpResult<bool> {
        if self.eat_regexp_identifier_start()? {
            let mut name = String::new();
            name.push(display_char(self.last_int_value));
            while self.eat_regexp_identifier_part()? {
                name.push(display_char(self.last_int_value));
            }
            self.last_str_value = name;
            return Ok(true);
        }
        Ok(false)
    }

    fn eat_regexp_identifier_start(&mut self) -> RegExpResult<bool> {
        self.eat_regexp_identifier_char(is_identifier_start_char)
    }

    fn eat_regexp_identifier_part(&mut self) -> RegExpResult<bool> {
        self.eat_regexp_identifier_char(is_identifier_part_char)
    }

    /// One identifier code point, written directly, as a surrogate pair or as
    /// a `\u` escape.  Sets `last_int_value`.
    fn eat_regexp_identifier_char(&mut self, accept: fn(u32) -> bool) -> RegExpResult<bool> {
        let start = self.index();
        let force_u_flag = !self.unicode_mode && self.ecma_version() >= EcmaVersion::Es2020;
        let Some(mut cp) = self.current_code_point() else {
            return Ok(false);
        };
        self.advance();
        if is(cp, '\\') && self.eat_regexp_unicode_escape_sequence(force_u_flag)? {
            cp = self.last_int_value;
        } else if force_u_flag && is_lead_surrogate(cp) {
            if let Some(trail) = self.current_code_point().filter(|&t| is_trail_surrogate(t)) {
                cp = combine_surrogate_pair(cp, trail);
                self.advance();
            }
        }
        if accept(cp) {
            self.last_int_value = cp;
            return Ok(true);
        }
        if self.index() != start {
            self.rewind(start);
        }
        Ok(false)
    }

    // ── Character escape pieces ─────────────────────────────────────────────

    fn eat_c_control_letter(&mut self) -> bool {
        let start = self.index();
        if self.eat('c') {
            if self.eat_control_letter() {
                return true;
            }
            self.rewind(start);
        }
        false
    }

    fn eat_zero(&mut self) -> bool {
        if self.current_is('0') && !self.next_code_point().is_some_and(is_decimal_digit) {
            self.last_int_value = 0;
            self.advance();
            return true;
        }
        false
    }

    fn eat_control_escape(&mut self) -> bool {
        const CONTROL_ESCAPES: [(char, u32); 5] = [
            ('f', FORM_FEED),
            ('n', LINE_FEED),
            ('r', CARRIAGE_RETURN),
            ('t', CHARACTER_TABULATION),
            ('v', LINE_TABULATION),
        ];
        for (ch, value) in CONTROL_ESCAPES {
            if self.eat(ch) {
                self.last_int_value = value;
                return true;
            }
        }
        false
    }

    fn eat_control_letter(&mut self) -> bool {
        match self.current_code_point() {
            Some(cp) if is_latin_letter(cp) => {
                self.advance();
                self.last_int_value = cp % 0x20;
                true
            }
            _ => false,
        }
    }

    /// ```grammar
    /// RegExpUnicodeEscapeSequence[UnicodeMode]::
    ///     [+UnicodeMode] `u` HexLeadSurrogate `\u` HexTrailSurrogate
    ///     [+UnicodeMode] `u` HexLeadSurrogate
    ///     [+UnicodeMode] `u` HexTrailSurrogate
    ///     [+UnicodeMode] `u` HexNonSurrogate
    ///     [~UnicodeMode] `u` Hex4Digits
    ///     [+UnicodeMode] `u{` CodePoint `}`
    /// ```
    fn eat_regexp_unicode_escape_sequence(&mut self, force_u_flag: bool) -> RegExpResult<bool> {
        let start = self.index();
        let u_flag = force_u_flag || self.unicode_mode;
        if self.eat('u') {
            if (u_flag && self.eat_regexp_unicode_surrogate_pair_escape())
                || self.eat_fixed_hex_digits(4)
                || (u_flag && self.eat_regexp_unicode_code_point_escape())
            {
                return Ok(true);
            }
            if self.strict() || u_flag {
                return Err(self.raise(SyntaxErrorKind::InvalidUnicodeEscape));
            }
            self.rewind(start);
        }
        Ok(false)
    }

    fn eat_regexp_unicode_surrogate_pair_escape(&mut self) -> bool {
        let start = self.index();
        if self.eat_fixed_hex_digits(4) {
            let lead = self.last_int_value;
            if is_lead_surrogate(lead)
                && self.eat('\\')
                && self.eat('u')
                && self.eat_fixed_hex_digits(4)
            {
                let trail = self.last_int_value;
                if is_trail_surrogate(trail) {
                    self.last_int_value = combine_surrogate_pair(lead, trail);
                    return true;
                }
            }
            self.rewind(start);
        }
        false
    }

    fn eat_regexp_unicode_code_point_escape(&mut self) -> bool {
        let start = self.index();
        if self.eat('{') {
            if let Some(value) = self.eat_hex_digits() {
                if self.eat('}') {
                    if let Some(cp) = u32::try_from(value).ok().filter(|&cp| is_valid_unicode(cp)) {
                        self.last_int_value = cp;
                        return true;
                    }
                }
            }
        }
        self.rewind(start);
        false
    }

    fn eat_identity_escape(&mut self) -> bool {
        match self.current_code_point() {
            Some(cp) if self.is_valid_identity_escape(cp) => {
                self.last_int_value = cp;
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn is_valid_identity_escape(&self, cp: u32) -> bool {
        if self.unicode_mode {
            return is_syntax_character(cp) || is(cp, '/');
        }
        if self.strict() {
            return !is_id_continue(cp);
        }
        if self.n_flag {
            return !(is(cp, 'c') || is(cp, 'k'));
        }
        !is(cp, 'c')
    }

    /// `[1-9][0-9]*`, saturating.
    fn eat_decimal_escape(&mut self) -> Option<u64> {
        match self.current_code_point() {
            Some(cp) if (0x31..=0x39).contains(&cp) => self.eat_decimal_digits(),
            _ => None,
        }
    }

    // ── Unicode property expressions ────────────────────────────────────────

    /// ```grammar
    /// UnicodePropertyValueExpression::
    ///     UnicodePropertyName `=` UnicodePropertyValue
    ///     LoneUnicodePropertyNameOrValue
    /// ```
    fn eat_unicode_property_value_expression(
        &mut self,
    ) -> RegExpResult<Option<PropertyExpression>> {
        let start = self.index();
        let version = self.ecma_version();

        // UnicodePropertyName `=` UnicodePropertyValue
        if let Some(key) = self.eat_unicode_property_name() {
            if self.eat('=') {
                if let Some(value) = self.eat_unicode_property_value() {
                    if is_valid_unicode_property(version, &key, &value) {
                        return Ok(Some(PropertyExpression {
                            key,
                            value: Some(value),
                            strings: false,
                        }));
                    }
                    return Err(self.raise(SyntaxErrorKind::InvalidPropertyName));
                }
            }
        }
        self.rewind(start);

        // LoneUnicodePropertyNameOrValue
        if let Some(name) = self.eat_unicode_property_value() {
            if is_valid_lone_general_category(version, &name) {
                return Ok(Some(PropertyExpression {
                    key: "General_Category".to_string(),
                    value: Some(name),
                    strings: false,
                }));
            }
            if is_valid_lone_unicode_property(version, &name) {
                return Ok(Some(PropertyExpression {
                    key: name,
                    value: None,
                    strings: false,
                }));
            }
            if self.unicode_sets_mode && is_valid_lone_unicode_property_of_string(version, &name) {
                return Ok(Some(PropertyExpression {
                    key: name,
                    value: None,
                    strings: true,
                }));
            }
            return Err(self.raise(SyntaxErrorKind::InvalidPropertyName));
        }
        Ok(None)
    }

    fn eat_unicode_property_name(&mut self) -> Option<String> {
        self.eat_while(is_unicode_property_name_character)
    }

    fn eat_unicode_property_value(&mut self) -> Option<String> {
        self.eat_while(is_unicode_property_value_character)
    }

    /// Consume a non-empty run of ASCII characters accepted by `accept`.
    fn eat_while(&mut self, accept: fn(u32) -> bool) -> Option<String> {
        let mut text = String::new();
        while let Some(cp) = self.current_code_point().filter(|&cp| accept(cp)) {
            text.push(display_char(cp));
            self.advance();
        }
        (!text.is_empty()).then_some(text)
    }

    // ── Numbers ─────────────────────────────────────────────────────────────

    fn eat_hex_escape_sequence(&mut self) -> RegExpResult<bool> {
        let start = self.index();
        if self.eat('x') {
            if self.eat_fixed_hex_digits(2) {
                return Ok(true);
            }
            if self.unicode_mode || self.strict() {
                return Err(self.raise(SyntaxErrorKind::InvalidEscape));
            }
            self.rewind(start);
        }
        Ok(false)
    }

    /// A run of decimal digits, saturating at `u64::MAX`.
    fn eat_decimal_digits(&mut self) -> Option<u64> {
        let start = self.index();
        let mut value = 0u64;
        while let Some(cp) = self.current_code_point().filter(|&cp| is_decimal_digit(cp)) {
            value = value
                .saturating_mul(10)
                .saturating_add(u64::from(digit_to_int(cp)));
            self.advance();
        }
        (self.index() != start).then_some(value)
    }

    /// A run of hex digits, saturating at `u64::MAX`.
    fn eat_hex_digits(&mut self) -> Option<u64> {
        let start = self.index();
        let mut value = 0u64;
        while let Some(cp) = self.current_code_point().filter(|&cp| is_hex_digit(cp)) {
            value = value
                .saturating_mul(16)
                .saturating_add(u64::from(digit_to_int(cp)));
            self.advance();
        }
        (self.index() != start).then_some(value)
    }

    /// `\0`–`\377` style octal escapes of the Annex B grammar.
    fn eat_legacy_octal_escape_sequence(&mut self) -> bool {
        let Some(n1) = self.eat_octal_digit() else {
            return false;
        };
        self.last_int_value = match self.eat_octal_digit() {
            Some(n2) if n1 <= 3 => match self.eat_octal_digit() {
                Some(n3) => n1 * 64 + n2 * 8 + n3,
                None => n1 * 8 + n2,
            },
            Some(n2) => n1 * 8 + n2,
            None => n1,
        };
        true
    }

    fn eat_octal_digit(&mut self) -> Option<u32> {
        let cp = self.current_code_point().filter(|&cp| is_octal_digit(cp))?;
        self.advance();
        Some(cp - 0x30)
    }

    /// Exactly `length` hex digits.  Sets `last_int_value`.
    fn eat_fixed_hex_digits(&mut self, length: usize) -> bool {
        let start = self.index();
        let mut value = 0u32;
        for _ in 0..length {
            match self.current_code_point() {
                Some(cp) if is_hex_digit(cp) => {
                    value = 16 * value + digit_to_int(cp);
                    self.advance();
                }
                _ => {
                    self.rewind(start);
                    return false;
                }
            }
        }
        self.last_int_value = value;
        true
    }
}

/// Clamp a `[start, end)` request to the source.
fn clamp(source: &[u16], start: usize, end: usize) -> (usize, usize) {
    let end = end.min(source.len());
    (start.min(end), end)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_with(src: &str, flags: PatternFlags, options: RegExpOptions) -> RegExpResult<()> {
        let end = src.encode_utf16().count();
        RegExpValidator::new(options).validate_pattern(src, 0, end, flags)
    }

    fn legacy(src: &str) -> RegExpResult<()> {
        pattern_with(src, PatternFlags::LEGACY, RegExpOptions::default())
    }

    fn unicode(src: &str) -> RegExpResult<()> {
        pattern_with(src, PatternFlags::UNICODE, RegExpOptions::default())
    }

    fn sets(src: &str) -> RegExpResult<()> {
        pattern_with(src, PatternFlags::UNICODE_SETS, RegExpOptions::default())
    }

    fn literal(src: &str) -> RegExpResult<()> {
        let end = src.encode_utf16().count();
        RegExpValidator::new(RegExpOptions::default()).validate_literal(src, 0, end)
    }

    fn flags_at(src: &str, version: EcmaVersion) -> RegExpResult<()> {
        let end = src.encode_utf16().count();
        RegExpValidator::new(RegExpOptions::default().with_ecma_version(version))
            .validate_flags(src, 0, end)
    }

    #[track_caller]
    fn assert_error(result: RegExpResult<()>, kind: SyntaxErrorKind, index: usize) {
        let err = result.expect_err("expected a syntax error");
        assert_eq!((err.kind, err.index), (kind, index), "{err}");
    }

    // ── Basics ───────────────────────────────────────────────────────────────

    #[test]
    fn test_simple_patterns_are_valid() {
        for src in ["", "abc", "a|b|", "^a$", "a*b+?c??", "(a)(?:b)", ".\\d\\W", "[a-z0-9_]"] {
            assert!(legacy(src).is_ok(), "{src}");
            assert!(unicode(src).is_ok(), "{src}");
        }
    }

    #[test]
    fn test_unmatched_paren() {
        assert_error(legacy(")"), SyntaxErrorKind::UnmatchedParen, 0);
        assert_error(legacy("a)"), SyntaxErrorKind::UnmatchedParen, 1);
        assert_error(legacy("(a"), SyntaxErrorKind::UnterminatedGroup, 2);
    }

    #[test]
    fn test_trailing_backslash() {
        assert_error(legacy("a\\"), SyntaxErrorKind::TrailingBackslash, 1);
    }

    #[test]
    fn test_lone_brackets() {
        assert!(legacy("]").is_ok());
        assert!(legacy("}").is_ok());
        assert_error(unicode("]"), SyntaxErrorKind::LoneQuantifierBrackets, 0);
        assert_error(unicode("a}"), SyntaxErrorKind::LoneQuantifierBrackets, 1);
    }

    // ── Quantifiers ──────────────────────────────────────────────────────────

    #[test]
    fn test_nothing_to_repeat() {
        assert_error(legacy("*"), SyntaxErrorKind::NothingToRepeat, 1);
        assert_error(legacy("a**"), SyntaxErrorKind::NothingToRepeat, 3);
        assert_error(legacy("{1}"), SyntaxErrorKind::NothingToRepeat, 3);
        assert_error(unicode("|?"), SyntaxErrorKind::NothingToRepeat, 2);
    }

    #[test]
    fn test_quantifier_out_of_order() {
        assert_error(legacy("a{2,1}"), SyntaxErrorKind::QuantifierOutOfOrder, 5);
        assert_error(unicode("a{3,1}"), SyntaxErrorKind::QuantifierOutOfOrder, 5);
        assert!(legacy("a{1,1}").is_ok());
        assert!(legacy("a{1,}").is_ok());
    }

    #[test]
    fn test_incomplete_quantifier() {
        assert!(legacy("a{").is_ok());
        assert!(legacy("a{1").is_ok());
        assert!(legacy("a{,5}").is_ok());
        assert_error(unicode("a{"), SyntaxErrorKind::IncompleteQuantifier, 2);
        assert_error(unicode("a{1"), SyntaxErrorKind::IncompleteQuantifier, 3);
    }

    #[test]
    fn test_huge_quantifier_saturates() {
        assert!(legacy("a{99999999999999999999999}").is_ok());
    }

    // ── Assertions ───────────────────────────────────────────────────────────

    #[test]
    fn test_quantifiable_lookahead_only_in_annex_b() {
        assert!(legacy("(?=a)*").is_ok());
        assert_error(unicode("(?=a)*"), SyntaxErrorKind::NothingToRepeat, 6);
        assert_error(legacy("(?<=a)*"), SyntaxErrorKind::NothingToRepeat, 7);
    }

    #[test]
    fn test_lookbehind_needs_es2018() {
        let es2017 = RegExpOptions::default().with_ecma_version(EcmaVersion::Es2017);
        assert!(legacy("(?<=a)b").is_ok());
        assert_error(
            pattern_with("(?<=a)b", PatternFlags::LEGACY, es2017),
            SyntaxErrorKind::InvalidGroup,
            1,
        );
    }

    // ── Groups and backreferences ───────────────────────────────────────────

    #[test]
    fn test_forward_backreference() {
        assert!(legacy("\\1(a)").is_ok());
        assert!(unicode("\\1(a)").is_ok());
        assert!(legacy("\\2(a)").is_ok());
        assert_error(unicode("\\2(a)"), SyntaxErrorKind::InvalidEscape, 2);
    }

    #[test]
    fn test_named_groups() {
        assert!(unicode("(?<year>\\d{4})-\\k<year>").is_ok());
        assert_error(
            unicode("\\k<y>"),
            SyntaxErrorKind::InvalidNamedCaptureReferenced,
            5,
        );
        assert_error(
            legacy("(?<n>a)(?<n>b)"),
            SyntaxErrorKind::DuplicateCaptureGroupName,
            7,
        );
        assert_error(legacy("(?a)"), SyntaxErrorKind::InvalidGroup, 2);
        assert_error(legacy("(?<1a>x)"), SyntaxErrorKind::InvalidCaptureGroupName, 3);
    }

    #[test]
    fn test_k_escape_depends_on_named_groups() {
        assert!(legacy("\\k<y>").is_ok());
        assert!(legacy("\\k<n>(?<n>a)").is_ok());
        assert_error(
            legacy("(?<a>x)\\k<y>"),
            SyntaxErrorKind::InvalidNamedCaptureReferenced,
            12,
        );
        assert_error(legacy("(?<a>x)\\k"), SyntaxErrorKind::InvalidNamedReference, 9);
    }

    #[test]
    fn test_group_name_with_escapes() {
        assert!(unicode("(?<\\u0061b>x)\\k<ab>").is_ok());
        assert!(legacy("(?<\\u{61}>x)").is_ok());
        let es2019 = RegExpOptions::default().with_ecma_version(EcmaVersion::Es2019);
        assert!(pattern_with("(?<\\u{61}>x)", PatternFlags::LEGACY, es2019).is_err());
        assert!(legacy("(?<𝐀>x)").is_ok());
    }

    // ── Escapes ──────────────────────────────────────────────────────────────

    #[test]
    fn test_legacy_escapes() {
        assert!(legacy("\\07\\8\\a\\c").is_ok());
        assert!(legacy("\\x4").is_ok());
        assert!(legacy("\\u12").is_ok());
    }

    #[test]
    fn test_unicode_escapes() {
        assert!(unicode("\\u{1F600}\\uD83D\\uDE00\\/").is_ok());
        assert_error(unicode("\\07"), SyntaxErrorKind::InvalidEscape, 1);
        assert_error(unicode("\\a"), SyntaxErrorKind::InvalidEscape, 1);
        assert_error(unicode("\\x4"), SyntaxErrorKind::InvalidEscape, 2);
        assert_error(unicode("\\u{110000}"), SyntaxErrorKind::InvalidUnicodeEscape, 2);
    }

    #[test]
    fn test_strict_option_disables_annex_b() {
        let strict = RegExpOptions::default().with_strict(true);
        assert_error(
            pattern_with("\\a", PatternFlags::LEGACY, strict),
            SyntaxErrorKind::InvalidEscape,
            1,
        );
        assert!(pattern_with("\\-", PatternFlags::LEGACY, strict).is_ok());
    }

    #[test]
    fn test_property_escapes() {
        assert!(unicode("\\p{L}\\P{Lu}\\p{Script=Greek}\\p{ASCII}").is_ok());
        assert!(legacy("\\p{L}").is_ok());
        assert_error(unicode("\\p{Foo}"), SyntaxErrorKind::InvalidPropertyName, 6);
        assert_error(unicode("\\p{gc=Foo}"), SyntaxErrorKind::InvalidPropertyName, 9);
        assert_error(unicode("\\p"), SyntaxErrorKind::InvalidPropertyName, 2);
        assert_error(unicode("\\p{RGI_Emoji}"), SyntaxErrorKind::InvalidPropertyName, 12);
        assert!(sets("\\p{RGI_Emoji}").is_ok());
        assert_error(sets("\\P{RGI_Emoji}"), SyntaxErrorKind::InvalidPropertyName, 13);
    }

    #[test]
    fn test_property_gating_by_version() {
        let at = |version| {
            pattern_with(
                "\\p{Script=Hmnp}",
                PatternFlags::UNICODE,
                RegExpOptions::default().with_ecma_version(version),
            )
        };
        assert!(at(EcmaVersion::Es2018).is_err());
        assert!(at(EcmaVersion::Es2019).is_err());
        assert!(at(EcmaVersion::Es2020).is_ok());
        assert!(at(EcmaVersion::Es2021).is_ok());
    }

    // ── Character classes ────────────────────────────────────────────────────

    #[test]
    fn test_class_ranges() {
        assert!(legacy("[a-b]").is_ok());
        assert_error(legacy("[b-a]"), SyntaxErrorKind::RangeOutOfOrder, 4);
        assert!(legacy("[\\d-a]").is_ok());
        assert_error(unicode("[\\d-a]"), SyntaxErrorKind::InvalidCharacterClass, 5);
        assert_error(legacy("[a"), SyntaxErrorKind::UnterminatedCharacterClass, 2);
    }

    #[test]
    fn test_class_set_operations() {
        for src in ["[a&&b]", "[\\w--\\d]", "[[a-z]--[aeiou]]", "[\\q{abc|d}a]", "[\\p{L}&&\\p{ASCII}]"] {
            assert!(sets(src).is_ok(), "{src}");
        }
        assert_error(sets("[a&&&b]"), SyntaxErrorKind::InvalidClassCharacter, 4);
        assert_error(sets("[&&a]"), SyntaxErrorKind::InvalidSetOperation, 1);
        assert_error(sets("[-a]"), SyntaxErrorKind::InvalidClassCharacter, 1);
        assert_error(sets("[\\z]"), SyntaxErrorKind::InvalidEscape, 2);
        assert_error(sets("[a&&b--c]"), SyntaxErrorKind::InvalidClassCharacter, 5);
        assert_error(sets("[\\q{a"), SyntaxErrorKind::UnterminatedClassStringDisjunction, 5);
    }

    #[test]
    fn test_negated_class_with_strings() {
        assert!(sets("[\\q{ab}]").is_ok());
        assert!(sets("[^\\q{a}]").is_ok());
        assert_error(sets("[^\\q{ab}]"), SyntaxErrorKind::NegatedClassWithStrings, 9);
        assert_error(sets("[^a-z\\q{ab}]"), SyntaxErrorKind::NegatedClassWithStrings, 12);
        assert_error(sets("[^\\p{RGI_Emoji}]"), SyntaxErrorKind::NegatedClassWithStrings, 16);
        assert!(sets("[^\\q{ab}&&a]").is_ok());
    }

    // ── Literals and flags ───────────────────────────────────────────────────

    #[test]
    fn test_literals() {
        assert!(literal("/a/").is_ok());
        assert!(literal("/[/]/gimsuyd").is_ok());
        assert_error(literal(""), SyntaxErrorKind::Empty, 0);
        assert_error(literal("a"), SyntaxErrorKind::UnexpectedCharacter('a'), 0);
        assert_error(literal("/*/"), SyntaxErrorKind::UnexpectedCharacter('*'), 1);
        assert_error(literal("/a"), SyntaxErrorKind::UnterminatedRegExp, 2);
        assert_error(literal("/[/"), SyntaxErrorKind::UnterminatedCharacterClass, 3);
        assert_error(literal("/a\n/"), SyntaxErrorKind::UnterminatedRegExp, 2);
    }

    #[test]
    fn test_literal_mode_follows_flags() {
        assert!(literal("/\\a/").is_ok());
        assert_error(literal("/\\a/u"), SyntaxErrorKind::InvalidEscape, 2);
        assert!(literal("/[\\q{ab}]/v").is_ok());
        assert_error(literal("/a/uv"), SyntaxErrorKind::InvalidFlags, 3);
    }

    #[test]
    fn test_flags() {
        assert!(flags_at("dgimsuy", EcmaVersion::Es2022).is_ok());
        assert_error(
            flags_at("gig", EcmaVersion::LATEST),
            SyntaxErrorKind::DuplicatedFlag('g'),
            0,
        );
        assert_error(
            flags_at("gx", EcmaVersion::LATEST),
            SyntaxErrorKind::InvalidFlag('x'),
            0,
        );
        assert_error(
            flags_at("s", EcmaVersion::Es2017),
            SyntaxErrorKind::InvalidFlag('s'),
            0,
        );
        assert_error(
            flags_at("v", EcmaVersion::Es2023),
            SyntaxErrorKind::InvalidFlag('v'),
            0,
        );
        assert_error(flags_at("uv", EcmaVersion::LATEST), SyntaxErrorKind::InvalidFlags, 0);
    }

    #[test]
    fn test_pattern_with_both_mode_flags() {
        let both = PatternFlags {
            unicode: true,
            unicode_sets: true,
        };
        let err = pattern_with("a", both, RegExpOptions::default()).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::InvalidFlags);
        assert_eq!(err.index, 2);
        assert!(err.unicode && err.unicode_sets);
        // Below ES2024 the `v` request is ignored.
        let es2023 = RegExpOptions::default().with_ecma_version(EcmaVersion::Es2023);
        assert!(pattern_with("a", both, es2023).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = unicode("a**").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid regular expression: /a**/u: Nothing to repeat"
        );
        assert!(err.unicode && !err.unicode_sets);

        let err = sets("[a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid regular expression: /[a/v: Unterminated character class"
        );
        assert!(!err.unicode && err.unicode_sets);

        let err = literal("/(/g").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid regular expression: /(/g: Unterminated group"
        );

        let err = flags_at("gg", EcmaVersion::LATEST).unwrap_err();
        assert_eq!(err.to_string(), "Invalid regular expression: Duplicated flag 'g'");
    }

    #[test]
    fn test_ranged_input_is_clamped() {
        let mut validator = RegExpValidator::new(RegExpOptions::default());
        assert!(validator.validate_literal("x/a/gx", 1, 5).is_ok());
        assert!(validator.validate_pattern("ab", 0, 100, PatternFlags::LEGACY).is_ok());
        let err = validator
            .validate_pattern("(a)b", 1, 4, PatternFlags::LEGACY)
            .unwrap_err();
        assert_eq!((err.kind, err.index), (SyntaxErrorKind::UnmatchedParen, 2));
        assert_eq!(err.to_string(), "Invalid regular expression: /a)b/: Unmatched ')'");
    }

    // ── Events ───────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RegExpHandler for Recorder {
        fn on_pattern_enter(&mut self, start: usize) {
            self.events.push(format!("pattern>{start}"));
        }
        fn on_pattern_leave(&mut self, start: usize, end: usize) {
            self.events.push(format!("pattern<{start}..{end}"));
        }
        fn on_alternative_enter(&mut self, start: usize, index: usize) {
            self.events.push(format!("alt>{start}#{index}"));
        }
        fn on_alternative_leave(&mut self, start: usize, end: usize, index: usize) {
            self.events.push(format!("alt<{start}..{end}#{index}"));
        }
        fn on_character(&mut self, start: usize, end: usize, value: u32) {
            self.events.push(format!("char {start}..{end}={value:#x}"));
        }
        fn on_quantifier(&mut self, start: usize, end: usize, min: u64, max: Option<u64>, greedy: bool) {
            self.events
                .push(format!("quant {start}..{end} {min},{max:?},{greedy}"));
        }
    }

    fn events(src: &str, flags: PatternFlags) -> Vec<String> {
        let end = src.encode_utf16().count();
        let mut validator = RegExpValidator::with_handler(RegExpOptions::default(), Recorder::default());
        validator.validate_pattern(src, 0, end, flags).unwrap();
        validator.into_handler().events
    }

    #[test]
    fn test_event_order() {
        assert_eq!(
            events("a|b+?", PatternFlags::LEGACY),
            vec![
                "pattern>0",
                "alt>0#0",
                "char 0..1=0x61",
                "alt<0..1#0",
                "alt>2#1",
                "char 2..3=0x62",
                "quant 3..5 1,None,false",
                "alt<2..5#1",
                "pattern<0..5",
            ]
        );
    }

    #[test]
    fn test_surrogate_pairs_by_mode() {
        assert_eq!(
            events("😀", PatternFlags::UNICODE),
            vec!["pattern>0", "alt>0#0", "char 0..2=0x1f600", "alt<0..2#0", "pattern<0..2"]
        );
        assert_eq!(
            events("😀", PatternFlags::LEGACY),
            vec![
                "pattern>0",
                "alt>0#0",
                "char 0..1=0xd83d",
                "char 1..2=0xde00",
                "alt<0..2#0",
                "pattern<0..2",
            ]
        );
    }

    #[test]
    fn test_second_pass_restarts_events() {
        let evs = events("(?<n>a)", PatternFlags::LEGACY);
        assert_eq!(evs.iter().filter(|e| *e == "pattern>0").count(), 2);
        assert_eq!(evs.iter().filter(|e| e.starts_with("pattern<")).count(), 2);
    }
}

//! Code-point constants and classification predicates used by the validator.
//!
//! Every predicate takes a `u32` code point (or UTF-16 code unit in the
//! legacy grammar) so callers never round-trip through `char`, which cannot
//! hold a lone surrogate.

pub use crate::unicode::{is_id_continue, is_id_start};

pub const BACKSPACE: u32 = 0x08;
pub const CHARACTER_TABULATION: u32 = 0x09;
pub const LINE_FEED: u32 = 0x0a;
pub const LINE_TABULATION: u32 = 0x0b;
pub const FORM_FEED: u32 = 0x0c;
pub const CARRIAGE_RETURN: u32 = 0x0d;
pub const LINE_SEPARATOR: u32 = 0x2028;
pub const PARAGRAPH_SEPARATOR: u32 = 0x2029;
pub const ZERO_WIDTH_NON_JOINER: u32 = 0x200c;
pub const ZERO_WIDTH_JOINER: u32 = 0x200d;
pub const MAX_CODE_POINT: u32 = 0x10ffff;

/// Returns `true` when `c` is the code point of the ASCII character `ch`.
#[inline]
pub fn is(c: u32, ch: char) -> bool {
    c == ch as u32
}

pub fn is_latin_letter(c: u32) -> bool {
    (0x41..=0x5a).contains(&c) || (0x61..=0x7a).contains(&c)
}

pub fn is_decimal_digit(c: u32) -> bool {
    (0x30..=0x39).contains(&c)
}

pub fn is_octal_digit(c: u32) -> bool {
    (0x30..=0x37).contains(&c)
}

pub fn is_hex_digit(c: u32) -> bool {
    is_decimal_digit(c) || (0x41..=0x46).contains(&c) || (0x61..=0x66).contains(&c)
}

/// Numeric value of a hex digit. Callers check [`is_hex_digit`] first.
pub fn digit_to_int(c: u32) -> u32 {
    match c {
        0x61..=0x66 => c - 0x61 + 10,
        0x41..=0x46 => c - 0x41 + 10,
        _ => c - 0x30,
    }
}

pub fn is_line_terminator(c: u32) -> bool {
    matches!(
        c,
        LINE_FEED | CARRIAGE_RETURN | LINE_SEPARATOR | PARAGRAPH_SEPARATOR
    )
}

pub fn is_valid_unicode(c: u32) -> bool {
    c <= MAX_CODE_POINT
}

pub fn is_lead_surrogate(c: u32) -> bool {
    (0xd800..=0xdbff).contains(&c)
}

pub fn is_trail_surrogate(c: u32) -> bool {
    (0xdc00..=0xdfff).contains(&c)
}

/// Combine a surrogate pair into one supplementary code point.
pub fn combine_surrogate_pair(lead: u32, trail: u32) -> u32 {
    (lead - 0xd800) * 0x400 + (trail - 0xdc00) + 0x10000
}

/// `^ $ \ . * + ? ( ) [ ] { } |`
pub fn is_syntax_character(c: u32) -> bool {
    char::from_u32(c).is_some_and(|ch| "^$\\.*+?()[]{}|".contains(ch))
}

/// Punctuators that may not appear doubled inside a `v`-mode class.
pub fn is_class_set_reserved_double_punctuator(c: u32) -> bool {
    char::from_u32(c).is_some_and(|ch| "&!#$%*+,.:;<=>?@^`~".contains(ch))
}

/// Characters that must be escaped inside a `v`-mode class.
pub fn is_class_set_syntax_character(c: u32) -> bool {
    char::from_u32(c).is_some_and(|ch| "()[]{}/-\\|".contains(ch))
}

/// Punctuators that may follow `\` inside a `v`-mode class.
pub fn is_class_set_reserved_punctuator(c: u32) -> bool {
    char::from_u32(c).is_some_and(|ch| "&-!#%,:;<=>@`~".contains(ch))
}

/// Letters and `_`, the alphabet of `\p{Name}`.
pub fn is_unicode_property_name_character(c: u32) -> bool {
    is_latin_letter(c) || is(c, '_')
}

/// Letters, `_` and digits, the alphabet of `\p{Name=Value}` values.
pub fn is_unicode_property_value_character(c: u32) -> bool {
    is_unicode_property_name_character(c) || is_decimal_digit(c)
}

/// `RegExpIdentifierStart`: `ID_Start`, `$` or `_`.
pub fn is_identifier_start_char(c: u32) -> bool {
    is_id_start(c) || is(c, '$') || is(c, '_')
}

/// `RegExpIdentifierPart`: `ID_Continue`, `$`, ZWNJ or ZWJ.
pub fn is_identifier_part_char(c: u32) -> bool {
    is_id_continue(c) || is(c, '$') || c == ZERO_WIDTH_NON_JOINER || c == ZERO_WIDTH_JOINER
}

/// Render a code point for an error message, substituting U+FFFD for lone
/// surrogates.
pub fn display_char(c: u32) -> char {
    char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits() {
        assert!(is_decimal_digit('0' as u32));
        assert!(!is_decimal_digit('a' as u32));
        assert!(is_octal_digit('7' as u32));
        assert!(!is_octal_digit('8' as u32));
        assert!(is_hex_digit('F' as u32));
        assert!(is_hex_digit('f' as u32));
        assert!(!is_hex_digit('g' as u32));
        assert_eq!(digit_to_int('a' as u32), 10);
        assert_eq!(digit_to_int('F' as u32), 15);
        assert_eq!(digit_to_int('9' as u32), 9);
    }

    #[test]
    fn test_surrogates() {
        assert!(is_lead_surrogate(0xd83d));
        assert!(is_trail_surrogate(0xde00));
        assert!(!is_lead_surrogate(0xde00));
        assert_eq!(combine_surrogate_pair(0xd83d, 0xde00), 0x1f600);
    }

    #[test]
    fn test_syntax_sets() {
        for ch in "^$\\.*+?()[]{}|".chars() {
            assert!(is_syntax_character(ch as u32), "{ch}");
        }
        assert!(!is_syntax_character('/' as u32));
        assert!(!is_syntax_character(0xd800));
        assert!(is_class_set_reserved_double_punctuator('&' as u32));
        assert!(!is_class_set_reserved_double_punctuator('-' as u32));
        assert!(is_class_set_syntax_character('-' as u32));
        assert!(is_class_set_reserved_punctuator('-' as u32));
        assert!(!is_class_set_reserved_punctuator('$' as u32));
    }

    #[test]
    fn test_line_terminators() {
        assert!(is_line_terminator(LINE_FEED));
        assert!(is_line_terminator(0x2029));
        assert!(!is_line_terminator(CHARACTER_TABULATION));
    }

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_start_char('$' as u32));
        assert!(is_identifier_start_char('_' as u32));
        assert!(!is_identifier_start_char('1' as u32));
        assert!(is_identifier_part_char('1' as u32));
        assert!(is_identifier_part_char(ZERO_WIDTH_JOINER));
        assert!(!is_identifier_part_char('-' as u32));
    }

    #[test]
    fn test_display_char_replaces_surrogates() {
        assert_eq!(display_char('a' as u32), 'a');
        assert_eq!(display_char(0xdc00), '\u{fffd}');
    }
}

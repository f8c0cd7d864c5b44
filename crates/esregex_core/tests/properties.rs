//! Property tests: validation and parsing agree, and spans round-trip.

use esregex_core::{PatternFlags, RegExpOptions, parse_pattern, validate_pattern};
use proptest::prelude::*;

/// Fragments chosen to hit most productions, valid or not.
const FRAGMENTS: &[&str] = &[
    "a", "b", "|", "(", ")", "(?:", "(?=", "(?<!", "(?<n>", "\\k<n>", "[", "]", "[^", "-",
    "&&", "--", "\\q{", "}", "{", "{2}", "{1,", "*", "+?", "?", "^", "$", ".", "\\", "\\1",
    "\\d", "\\p{L}", "\\P{RGI_Emoji}", "\\u{1F600}", "\\x4", "\\c", "\\0", "😀", "é",
];

fn pattern() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..10).prop_map(|parts| parts.concat())
}

fn modes() -> impl Strategy<Value = PatternFlags> {
    prop_oneof![
        Just(PatternFlags::LEGACY),
        Just(PatternFlags::UNICODE),
        Just(PatternFlags::UNICODE_SETS),
    ]
}

proptest! {
    #[test]
    fn test_validate_and_parse_agree(src in pattern(), flags in modes(), strict in any::<bool>()) {
        let options = RegExpOptions::default().with_strict(strict);
        let validated = validate_pattern(&src, flags, options);
        let parsed = parse_pattern(&src, flags, options);
        match (validated, parsed) {
            (Ok(()), Ok(_)) => {}
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "{:?} vs {:?}", a, b.map(|ast| ast.len())),
        }
    }

    #[test]
    fn test_raw_spans_round_trip(src in pattern(), flags in modes()) {
        let Ok(ast) = parse_pattern(&src, flags, RegExpOptions::default()) else {
            return Ok(());
        };
        let units: Vec<u16> = src.encode_utf16().collect();
        for id in ast.ids() {
            let node = ast.node(id);
            prop_assert!(node.start <= node.end && node.end <= units.len());
            prop_assert_eq!(&node.raw, &String::from_utf16_lossy(&units[node.start..node.end]));
            if let Some(parent) = node.parent {
                let parent = ast.node(parent);
                prop_assert!(parent.start <= node.start && node.end <= parent.end);
            }
        }
        let alternatives: Vec<&str> = ast
            .children(ast.root)
            .iter()
            .map(|&a| ast.node(a).raw.as_str())
            .collect();
        prop_assert_eq!(alternatives.join("|"), src);
    }

    #[test]
    fn test_quantifier_bounds_are_ordered(min in 0u64..50, max in 0u64..50) {
        let src = format!("a{{{min},{max}}}");
        let result = parse_pattern(&src, PatternFlags::UNICODE, RegExpOptions::default());
        prop_assert_eq!(result.is_ok(), min <= max);
    }
}

#![no_main]

use esregex_core::{EcmaVersion, PatternFlags, RegExpOptions, parse_pattern, validate_pattern};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Need a mode byte plus at least one byte of pattern.
    if data.len() < 2 {
        return;
    }
    let Ok(pattern) = std::str::from_utf8(&data[1..]) else {
        return;
    };

    // First byte picks the edition, the mode flags and strictness.
    let mode = data[0];
    let version = if mode & 0x08 == 0 {
        EcmaVersion::LATEST
    } else {
        EcmaVersion::Es2017
    };
    let options = RegExpOptions::default()
        .with_ecma_version(version)
        .with_strict(mode & 0x04 != 0);
    let flags = PatternFlags {
        unicode: mode & 0x01 != 0,
        unicode_sets: mode & 0x02 != 0,
    };

    let validated = validate_pattern(pattern, flags, options);
    let parsed = parse_pattern(pattern, flags, options);
    match (validated, parsed) {
        (Ok(()), Ok(ast)) => assert_eq!(ast.root().raw, pattern),
        (Err(a), Err(b)) => assert_eq!(a, b, "validator and parser disagree"),
        (a, b) => panic!("validator {a:?} vs parser {:?}", b.map(|ast| ast.len())),
    }
});

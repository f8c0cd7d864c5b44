//! End-to-end behaviour of the public parse and validate entry points.

use esregex_core::ast::{BackreferenceRef, CharacterSetKind, NodeKind};
use esregex_core::{
    EcmaVersion, PatternFlags, RegExpAst, RegExpFlags, RegExpOptions, SyntaxErrorKind,
    parse_literal, parse_pattern, validate_literal, validate_pattern,
};

fn init() {
    let _ = pretty_env_logger::try_init();
}

fn opts() -> RegExpOptions {
    RegExpOptions::default()
}

fn pattern_of(ast: &RegExpAst) -> esregex_core::NodeId {
    ast.pattern().expect("tree has a pattern")
}

/// Elements of the first alternative of the pattern.
fn top_elements(ast: &RegExpAst) -> Vec<esregex_core::NodeId> {
    let alternative = ast.children(pattern_of(ast))[0];
    ast.children(alternative).into_vec()
}

// ── Literals ────────────────────────────────────────────────────────────────

#[test]
fn test_alternatives_and_flags() {
    init();
    let ast = parse_literal("/ab|cd/gi", opts()).unwrap();
    let alternatives = ast.children(pattern_of(&ast));
    let raws: Vec<_> = alternatives.iter().map(|&a| ast.node(a).raw.as_str()).collect();
    assert_eq!(raws, ["ab", "cd"]);
    assert_eq!(
        ast.flags(),
        Some(&RegExpFlags {
            global: true,
            ignore_case: true,
            ..RegExpFlags::default()
        })
    );
}

#[test]
fn test_group_and_numbered_backreference() {
    init();
    let ast = parse_literal("/(a)\\1/", opts()).unwrap();
    let elements = top_elements(&ast);
    assert!(matches!(
        ast.kind(elements[0]),
        NodeKind::CapturingGroup { index: 1, name: None, .. }
    ));
    assert_eq!(
        ast.kind(elements[1]),
        &NodeKind::Backreference {
            reference: BackreferenceRef::Index(1),
            resolved: Some(elements[0]),
        }
    );
}

#[test]
fn test_legacy_class_range() {
    init();
    let ast = parse_literal("/[a-z]/", opts()).unwrap();
    let elements = top_elements(&ast);
    assert_eq!(elements.len(), 1);
    let NodeKind::CharacterClass {
        negate: false,
        unicode_sets: false,
        elements: class_elements,
    } = ast.kind(elements[0])
    else {
        panic!("expected a plain character class");
    };
    assert_eq!(class_elements.len(), 1);
    let NodeKind::CharacterClassRange { min, max } = *ast.kind(class_elements[0]) else {
        panic!("expected a range");
    };
    assert_eq!(ast.kind(min), &NodeKind::Character { value: 'a' as u32 });
    assert_eq!(ast.kind(max), &NodeKind::Character { value: 'z' as u32 });
}

#[test]
fn test_quantifier_out_of_order_points_at_brace() {
    init();
    let err = parse_literal("/a{2,1}/", opts()).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::QuantifierOutOfOrder);
    assert_eq!(err.index, 6);
    assert_eq!(
        err.to_string(),
        "Invalid regular expression: /a{2,1}/: numbers out of order in {} quantifier"
    );
}

#[test]
fn test_duplicate_group_name_points_at_second_group() {
    init();
    let err = parse_literal("/(?<n>a)(?<n>b)/", opts()).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::DuplicateCaptureGroupName);
    assert_eq!(err.index, 8);
}

// ── Groups and references ───────────────────────────────────────────────────

#[test]
fn test_capturing_groups_numbered_by_open_paren() {
    init();
    let ast = parse_pattern("(a)(b(c))", PatternFlags::LEGACY, opts()).unwrap();
    let groups = ast.capturing_groups();
    let numbered: Vec<_> = groups
        .iter()
        .map(|&g| match ast.kind(g) {
            NodeKind::CapturingGroup { index, .. } => (*index, ast.node(g).raw.as_str()),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(numbered, [(1, "(a)"), (2, "(b(c))"), (3, "(c)")]);
}

#[test]
fn test_named_backreference_resolves() {
    init();
    let ast = parse_pattern("(?<x>a)\\k<x>", PatternFlags::UNICODE, opts()).unwrap();
    let elements = top_elements(&ast);
    assert!(matches!(
        ast.kind(elements[1]),
        NodeKind::Backreference { resolved: Some(g), .. } if *g == elements[0]
    ));
}

#[test]
fn test_unknown_group_name_fails_at_pattern_end() {
    init();
    let err = validate_pattern("a\\k<y>", PatternFlags::UNICODE, opts()).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::InvalidNamedCaptureReferenced);
    assert_eq!(err.index, 6);
}

#[test]
fn test_forward_reference_is_legal() {
    init();
    assert!(validate_pattern("\\1(a)", PatternFlags::LEGACY, opts()).is_ok());
    assert!(validate_pattern("\\1(a)", PatternFlags::UNICODE, opts()).is_ok());
}

#[test]
fn test_two_pass_matches_unicode_single_pass() {
    init();
    for src in ["(?<n>a)\\k<n>", "\\k<n>(?<n>a)", "(?<n>a)\\1"] {
        let legacy = parse_pattern(src, PatternFlags::LEGACY, opts()).unwrap();
        let unicode = parse_pattern(src, PatternFlags::UNICODE, opts()).unwrap();
        assert_eq!(legacy.nodes, unicode.nodes, "{src}");
    }
    // Without a named group `\k` stays an identity escape in legacy mode.
    let ast = parse_pattern("\\k<n>", PatternFlags::LEGACY, opts()).unwrap();
    assert_eq!(ast.node(top_elements(&ast)[0]).raw, "\\k");
}

// ── Unicode sets ────────────────────────────────────────────────────────────

#[test]
fn test_negated_class_with_strings() {
    init();
    let err = validate_literal("/[^\\q{ab}]/v", opts()).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::NegatedClassWithStrings);
    assert_eq!(err.message(), "Negated character class may contain strings");
    assert!(err.unicode_sets);
    assert!(validate_literal("/[\\q{ab}]/v", opts()).is_ok());
}

#[test]
fn test_range_order_in_classes() {
    init();
    let err = validate_pattern("[b-a]", PatternFlags::LEGACY, opts()).unwrap_err();
    assert_eq!(err.message(), "Range out of order in character class");
    assert!(validate_pattern("[a-b]", PatternFlags::LEGACY, opts()).is_ok());
}

#[test]
fn test_property_validity_is_monotonic_in_version() {
    init();
    let versions = [
        EcmaVersion::Es2018,
        EcmaVersion::Es2019,
        EcmaVersion::Es2020,
        EcmaVersion::Es2021,
        EcmaVersion::Es2022,
        EcmaVersion::Es2023,
        EcmaVersion::Es2024,
    ];
    for src in ["\\p{Script=Hmnp}", "\\p{Script=Kawi}", "\\p{Extended_Pictographic}", "\\p{L}"] {
        let valid: Vec<bool> = versions
            .iter()
            .map(|&v| {
                validate_pattern(src, PatternFlags::UNICODE, opts().with_ecma_version(v)).is_ok()
            })
            .collect();
        assert!(valid.windows(2).all(|w| w[0] <= w[1]), "{src}: {valid:?}");
        assert!(valid[valid.len() - 1], "{src}");
    }
    assert!(
        validate_pattern(
            "\\p{Script=Hmnp}",
            PatternFlags::UNICODE,
            opts().with_ecma_version(EcmaVersion::Es2018)
        )
        .is_err()
    );
}

#[test]
fn test_property_sets_in_tree() {
    init();
    let ast = parse_pattern("\\p{sc=Greek}\\P{Lu}", PatternFlags::UNICODE, opts()).unwrap();
    let kinds: Vec<_> = top_elements(&ast)
        .into_iter()
        .map(|id| ast.kind(id).clone())
        .collect();
    assert_eq!(
        kinds,
        [
            NodeKind::CharacterSet(CharacterSetKind::Property {
                key: "sc".to_string(),
                value: Some("Greek".to_string()),
                negate: false,
                strings: false,
            }),
            NodeKind::CharacterSet(CharacterSetKind::Property {
                key: "General_Category".to_string(),
                value: Some("Lu".to_string()),
                negate: true,
                strings: false,
            }),
        ]
    );
}

// ── Editions ────────────────────────────────────────────────────────────────

#[test]
fn test_es5_ignores_mode_flags_in_patterns() {
    init();
    let es5 = opts().with_ecma_version(EcmaVersion::Es5);
    // Below ES2015 the `u` request is ignored, so Annex B escapes pass.
    assert!(validate_pattern("\\a", PatternFlags::UNICODE, es5).is_ok());
    let err = validate_literal("/a/u", es5).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::InvalidFlag('u'));
    assert_eq!(err.index, 3);
}

#[test]
fn test_utf16_offsets() {
    init();
    let ast = parse_literal("/😀+/u", opts()).unwrap();
    let elements = top_elements(&ast);
    let quantifier = ast.node(elements[0]);
    assert_eq!((quantifier.start, quantifier.end), (1, 4));
    let NodeKind::Quantifier { element, .. } = quantifier.kind else {
        panic!("expected a quantifier");
    };
    assert_eq!(ast.kind(element), &NodeKind::Character { value: 0x1f600 });

    // Without `u` the quantifier applies to the trail surrogate only.
    let ast = parse_literal("/😀+/", opts()).unwrap();
    let elements = top_elements(&ast);
    assert_eq!(elements.len(), 2);
    assert_eq!(ast.kind(elements[0]), &NodeKind::Character { value: 0xd83d });
    assert_eq!((ast.node(elements[1]).start, ast.node(elements[1]).end), (2, 4));
}

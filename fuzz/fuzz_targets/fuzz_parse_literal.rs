#![no_main]

use esregex_core::visitor::{RegExpVisitor, visit};
use esregex_core::{NodeId, RegExpAst, RegExpOptions, parse_literal};
use libfuzzer_sys::fuzz_target;

/// Checks that every visited node lies inside its parent's span.
struct SpanCheck;

impl RegExpVisitor for SpanCheck {
    fn on_character_enter(&mut self, ast: &RegExpAst, id: NodeId) {
        let node = ast.node(id);
        if let Some(parent) = node.parent {
            let parent = ast.node(parent);
            assert!(parent.start <= node.start && node.end <= parent.end);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Wrap arbitrary text as a literal so the pattern grammar gets exercised
    // rather than just the delimiter checks.
    let literal = format!("/{text}/v");
    if let Ok(ast) = parse_literal(&literal, RegExpOptions::default()) {
        assert_eq!(ast.root().raw, literal);
        visit(&ast, ast.root, &mut SpanCheck);
    }
    let _ = parse_literal(text, RegExpOptions::default());
});

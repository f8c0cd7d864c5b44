//! Depth-first traversal of a [`RegExpAst`].
//!
//! Implement [`RegExpVisitor`], overriding only the callbacks of interest,
//! and hand it to [`visit`].  Every node gets an `enter` call before its
//! children and a `leave` call after them.  Children are visited in source
//! order: the pattern before the flags of a literal, `min` before `max` of a
//! range, `left` before `right` of a set operation.

use crate::ast::{NodeId, NodeKind, RegExpAst};

macro_rules! callbacks {
    ($($enter:ident / $leave:ident),* $(,)?) => {
        $(
            fn $enter(&mut self, ast: &RegExpAst, id: NodeId) {}
            fn $leave(&mut self, ast: &RegExpAst, id: NodeId) {}
        )*
    };
}

/// Callbacks for [`visit`].  All default to doing nothing.
///
/// Edge, word-boundary and lookaround assertions share the
/// `on_assertion_*` pair; match on the node kind to tell them apart.
#[allow(unused_variables)]
pub trait RegExpVisitor {
    callbacks! {
        on_regexp_literal_enter / on_regexp_literal_leave,
        on_pattern_enter / on_pattern_leave,
        on_flags_enter / on_flags_leave,
        on_alternative_enter / on_alternative_leave,
        on_group_enter / on_group_leave,
        on_capturing_group_enter / on_capturing_group_leave,
        on_quantifier_enter / on_quantifier_leave,
        on_assertion_enter / on_assertion_leave,
        on_character_enter / on_character_leave,
        on_character_set_enter / on_character_set_leave,
        on_character_class_enter / on_character_class_leave,
        on_character_class_range_enter / on_character_class_range_leave,
        on_expression_character_class_enter / on_expression_character_class_leave,
        on_class_intersection_enter / on_class_intersection_leave,
        on_class_subtraction_enter / on_class_subtraction_leave,
        on_class_string_disjunction_enter / on_class_string_disjunction_leave,
        on_string_alternative_enter / on_string_alternative_leave,
        on_backreference_enter / on_backreference_leave,
    }
}

/// Walk the subtree rooted at `id`.
///
/// # Example
///
/// ```
/// use esregex_core::ast::{NodeId, RegExpAst};
/// use esregex_core::options::RegExpOptions;
/// use esregex_core::parser::parse_literal;
/// use esregex_core::visitor::{RegExpVisitor, visit};
///
/// #[derive(Default)]
/// struct CountCharacters(usize);
///
/// impl RegExpVisitor for CountCharacters {
///     fn on_character_enter(&mut self, _ast: &RegExpAst, _id: NodeId) {
///         self.0 += 1;
///     }
/// }
///
/// let ast = parse_literal("/ab[cd]/", RegExpOptions::default()).unwrap();
/// let mut counter = CountCharacters::default();
/// visit(&ast, ast.root, &mut counter);
/// assert_eq!(counter.0, 4);
/// ```
pub fn visit<V: RegExpVisitor + ?Sized>(ast: &RegExpAst, id: NodeId, visitor: &mut V) {
    enter(ast, id, visitor);
    for child in ast.children(id) {
        visit(ast, child, visitor);
    }
    leave(ast, id, visitor);
}

fn enter<V: RegExpVisitor + ?Sized>(ast: &RegExpAst, id: NodeId, v: &mut V) {
    match ast.kind(id) {
        NodeKind::RegExpLiteral { .. } => v.on_regexp_literal_enter(ast, id),
        NodeKind::Pattern { .. } => v.on_pattern_enter(ast, id),
        NodeKind::Flags(_) => v.on_flags_enter(ast, id),
        NodeKind::Alternative { .. } => v.on_alternative_enter(ast, id),
        NodeKind::Group { .. } => v.on_group_enter(ast, id),
        NodeKind::CapturingGroup { .. } => v.on_capturing_group_enter(ast, id),
        NodeKind::Quantifier { .. } => v.on_quantifier_enter(ast, id),
        NodeKind::EdgeAssertion { .. }
        | NodeKind::WordBoundaryAssertion { .. }
        | NodeKind::LookaroundAssertion { .. } => v.on_assertion_enter(ast, id),
        NodeKind::Character { .. } => v.on_character_enter(ast, id),
        NodeKind::CharacterSet(_) => v.on_character_set_enter(ast, id),
        NodeKind::CharacterClass { .. } => v.on_character_class_enter(ast, id),
        NodeKind::CharacterClassRange { .. } => v.on_character_class_range_enter(ast, id),
        NodeKind::ExpressionCharacterClass { .. } => {
            v.on_expression_character_class_enter(ast, id)
        }
        NodeKind::ClassIntersection { .. } => v.on_class_intersection_enter(ast, id),
        NodeKind::ClassSubtraction { .. } => v.on_class_subtraction_enter(ast, id),
        NodeKind::ClassStringDisjunction { .. } => v.on_class_string_disjunction_enter(ast, id),
        NodeKind::StringAlternative { .. } => v.on_string_alternative_enter(ast, id),
        NodeKind::Backreference { .. } => v.on_backreference_enter(ast, id),
    }
}

fn leave<V: RegExpVisitor + ?Sized>(ast: &RegExpAst, id: NodeId, v: &mut V) {
    match ast.kind(id) {
        NodeKind::RegExpLiteral { .. } => v.on_regexp_literal_leave(ast, id),
        NodeKind::Pattern { .. } => v.on_pattern_leave(ast, id),
        NodeKind::Flags(_) => v.on_flags_leave(ast, id),
        NodeKind::Alternative { .. } => v.on_alternative_leave(ast, id),
        NodeKind::Group { .. } => v.on_group_leave(ast, id),
        NodeKind::CapturingGroup { .. } => v.on_capturing_group_leave(ast, id),
        NodeKind::Quantifier { .. } => v.on_quantifier_leave(ast, id),
        NodeKind::EdgeAssertion { .. }
        | NodeKind::WordBoundaryAssertion { .. }
        | NodeKind::LookaroundAssertion { .. } => v.on_assertion_leave(ast, id),
        NodeKind::Character { .. } => v.on_character_leave(ast, id),
        NodeKind::CharacterSet(_) => v.on_character_set_leave(ast, id),
        NodeKind::CharacterClass { .. } => v.on_character_class_leave(ast, id),
        NodeKind::CharacterClassRange { .. } => v.on_character_class_range_leave(ast, id),
        NodeKind::ExpressionCharacterClass { .. } => {
            v.on_expression_character_class_leave(ast, id)
        }
        NodeKind::ClassIntersection { .. } => v.on_class_intersection_leave(ast, id),
        NodeKind::ClassSubtraction { .. } => v.on_class_subtraction_leave(ast, id),
        NodeKind::ClassStringDisjunction { .. } => v.on_class_string_disjunction_leave(ast, id),
        NodeKind::StringAlternative { .. } => v.on_string_alternative_leave(ast, id),
        NodeKind::Backreference { .. } => v.on_backreference_leave(ast, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{PatternFlags, RegExpOptions};
    use crate::parser::{parse_literal, parse_pattern};

    /// Records `>Kind raw` on enter and `<Kind` on leave.
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Trace {
        fn enter(&mut self, ast: &RegExpAst, id: NodeId) {
            let node = ast.node(id);
            self.0.push(format!(">{} {}", node.kind.name(), node.raw));
        }

        fn leave(&mut self, ast: &RegExpAst, id: NodeId) {
            self.0.push(format!("<{}", ast.kind(id).name()));
        }
    }

    macro_rules! trace_all {
        ($($enter:ident / $leave:ident),* $(,)?) => {
            impl RegExpVisitor for Trace {
                $(
                    fn $enter(&mut self, ast: &RegExpAst, id: NodeId) {
                        self.enter(ast, id);
                    }
                    fn $leave(&mut self, ast: &RegExpAst, id: NodeId) {
                        self.leave(ast, id);
                    }
                )*
            }
        };
    }

    trace_all! {
        on_regexp_literal_enter / on_regexp_literal_leave,
        on_pattern_enter / on_pattern_leave,
        on_flags_enter / on_flags_leave,
        on_alternative_enter / on_alternative_leave,
        on_group_enter / on_group_leave,
        on_capturing_group_enter / on_capturing_group_leave,
        on_quantifier_enter / on_quantifier_leave,
        on_assertion_enter / on_assertion_leave,
        on_character_enter / on_character_leave,
        on_character_set_enter / on_character_set_leave,
        on_character_class_enter / on_character_class_leave,
        on_character_class_range_enter / on_character_class_range_leave,
        on_expression_character_class_enter / on_expression_character_class_leave,
        on_class_intersection_enter / on_class_intersection_leave,
        on_class_subtraction_enter / on_class_subtraction_leave,
        on_class_string_disjunction_enter / on_class_string_disjunction_leave,
        on_string_alternative_enter / on_string_alternative_leave,
        on_backreference_enter / on_backreference_leave,
    }

    fn trace(ast: &RegExpAst) -> Vec<String> {
        let mut t = Trace::default();
        visit(ast, ast.root, &mut t);
        t.0
    }

    #[test]
    fn test_literal_order() {
        let ast = parse_literal("/a+/g", RegExpOptions::default()).unwrap();
        assert_eq!(
            trace(&ast),
            vec![
                ">RegExpLiteral /a+/g",
                ">Pattern a+",
                ">Alternative a+",
                ">Quantifier a+",
                ">Character a",
                "<Character",
                "<Quantifier",
                "<Alternative",
                "<Pattern",
                ">Flags g",
                "<Flags",
                "<RegExpLiteral",
            ]
        );
    }

    #[test]
    fn test_range_visits_min_then_max() {
        let ast = parse_pattern("[0-9]", PatternFlags::LEGACY, RegExpOptions::default()).unwrap();
        let events = trace(&ast);
        let range = events.iter().position(|e| e == ">CharacterClassRange 0-9").unwrap();
        assert_eq!(events[range + 1], ">Character 0");
        assert_eq!(events[range + 3], ">Character 9");
    }

    #[test]
    fn test_set_operation_visits_left_then_right() {
        let ast =
            parse_pattern("[\\d--[5]]", PatternFlags::UNICODE_SETS, RegExpOptions::default())
                .unwrap();
        let events = trace(&ast);
        let start = events
            .iter()
            .position(|e| e.starts_with(">ClassSubtraction"))
            .unwrap();
        assert_eq!(
            &events[start..start + 7],
            &[
                ">ClassSubtraction \\d--[5]",
                ">CharacterSet \\d",
                "<CharacterSet",
                ">CharacterClass [5]",
                ">Character 5",
                "<Character",
                "<CharacterClass",
            ]
        );
        assert!(events.contains(&">ExpressionCharacterClass [\\d--[5]]".to_string()));
    }

    #[test]
    fn test_assertions_share_callbacks() {
        let ast = parse_pattern("^\\b(?=x)$", PatternFlags::LEGACY, RegExpOptions::default())
            .unwrap();
        let assertions: Vec<_> = trace(&ast)
            .into_iter()
            .filter(|e| e.starts_with(">Assertion"))
            .collect();
        assert_eq!(
            assertions,
            [">Assertion ^", ">Assertion \\b", ">Assertion (?=x)", ">Assertion $"]
        );
    }

    #[test]
    fn test_backreference_is_a_leaf() {
        let ast = parse_pattern("(a)\\1", PatternFlags::LEGACY, RegExpOptions::default()).unwrap();
        let events = trace(&ast);
        let at = events.iter().position(|e| e == ">Backreference \\1").unwrap();
        assert_eq!(events[at + 1], "<Backreference");
    }
}

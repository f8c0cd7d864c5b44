//! Tree construction from validator events.
//!
//! [`AstBuilder`] is the [`RegExpHandler`] the parser plugs into the
//! validator.  It keeps a pointer to the innermost open container and grows
//! the arena as enter/leave events arrive; a quantifier or a class range
//! re-parents the nodes it wraps after they have been emitted.
//!
//! The validator only reports well-formed input, so a structural surprise
//! here (an event arriving under the wrong kind of parent) is a bug and
//! panics with `UnknownError`.

use std::rc::Rc;

use log::trace;

use crate::ast::{
    BackreferenceRef, CharacterSetKind, EdgeKind, EscapeSetKind, LookaroundKind, Node, NodeId,
    NodeKind, NodeList, RegExpAst, RegExpFlags,
};
use crate::validator::RegExpHandler;

#[cold]
#[track_caller]
fn unknown_error(what: &str) -> ! {
    panic!("UnknownError: {what}")
}

// ─────────────────────────────────────────────────────────────────────────────
// AstBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Collects validator events into a [`RegExpAst`].
#[derive(Debug)]
pub struct AstBuilder {
    source: Rc<[u16]>,
    nodes: Vec<Node>,
    /// Innermost open container.
    node: Option<NodeId>,
    pattern: Option<NodeId>,
    flags: Option<(usize, usize, RegExpFlags)>,
    literal: Option<(usize, usize)>,
    backreferences: Vec<NodeId>,
    capturing_groups: Vec<NodeId>,
    /// One slot per open character class: the pending `&&`/`--` expression.
    expression_buffers: Vec<Option<NodeId>>,
}

impl AstBuilder {
    /// A builder whose `raw` texts are sliced from `source`.
    pub fn new(source: Rc<[u16]>) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            node: None,
            pattern: None,
            flags: None,
            literal: None,
            backreferences: Vec::new(),
            capturing_groups: Vec::new(),
            expression_buffers: Vec::new(),
        }
    }

    // ── Finishing ───────────────────────────────────────────────────────────

    /// The tree of a literal parse, rooted at a `RegExpLiteral`.
    pub fn into_literal(mut self) -> RegExpAst {
        let pattern = self
            .pattern
            .unwrap_or_else(|| unknown_error("literal without pattern"));
        let (start, end) = self
            .literal
            .unwrap_or_else(|| unknown_error("literal without span"));
        let flags = self.push_flags();
        let root = self.push(None, start, end, NodeKind::RegExpLiteral { pattern, flags });
        self.nodes[pattern.index()].parent = Some(root);
        self.nodes[flags.index()].parent = Some(root);
        trace!("finished literal tree with {} nodes", self.nodes.len());
        RegExpAst {
            nodes: self.nodes,
            root,
        }
    }

    /// The tree of a pattern parse, rooted at its `Pattern`.
    pub fn into_pattern(self) -> RegExpAst {
        let root = self
            .pattern
            .unwrap_or_else(|| unknown_error("no pattern was parsed"));
        trace!(
            "finished pattern tree with {} nodes, {} capturing groups",
            self.nodes.len(),
            self.capturing_groups.len()
        );
        RegExpAst {
            nodes: self.nodes,
            root,
        }
    }

    /// The single-node tree of a flags parse.
    pub fn into_flags(mut self) -> RegExpAst {
        self.nodes.clear();
        let root = self.push_flags();
        RegExpAst {
            nodes: self.nodes,
            root,
        }
    }

    fn push_flags(&mut self) -> NodeId {
        let (start, end, flags) = self
            .flags
            .unwrap_or_else(|| unknown_error("no flags were parsed"));
        self.push(None, start, end, NodeKind::Flags(flags))
    }

    // ── Arena helpers ───────────────────────────────────────────────────────

    fn raw(&self, start: usize, end: usize) -> String {
        String::from_utf16_lossy(self.source.get(start..end).unwrap_or_default())
    }

    fn node_at(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    fn push(&mut self, parent: Option<NodeId>, start: usize, end: usize, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let raw = self.raw(start, end);
        self.nodes.push(Node {
            parent,
            start,
            end,
            raw,
            kind,
        });
        id
    }

    fn current(&self) -> NodeId {
        self.node.unwrap_or_else(|| unknown_error("no open node"))
    }

    /// The open container, checked against `accept`.
    #[track_caller]
    fn parent_where(&self, accept: fn(&NodeKind) -> bool) -> NodeId {
        let parent = self.current();
        if !accept(self.kind(parent)) {
            unknown_error(self.kind(parent).name());
        }
        parent
    }

    fn list_mut(&mut self, id: NodeId) -> &mut NodeList {
        match &mut self.node_at(id).kind {
            NodeKind::Pattern { alternatives }
            | NodeKind::Group { alternatives }
            | NodeKind::CapturingGroup { alternatives, .. }
            | NodeKind::LookaroundAssertion { alternatives, .. }
            | NodeKind::ClassStringDisjunction { alternatives } => alternatives,
            NodeKind::Alternative { elements }
            | NodeKind::CharacterClass { elements, .. }
            | NodeKind::StringAlternative { elements } => elements,
            other => unknown_error(other.name()),
        }
    }

    /// Pop the last child of `parent`, requiring it to satisfy `accept`.
    #[track_caller]
    fn pop_where(&mut self, parent: NodeId, accept: impl Fn(&NodeKind) -> bool) -> NodeId {
        let popped = self.list_mut(parent).pop();
        match popped {
            Some(id) if accept(self.kind(id)) => id,
            _ => unknown_error("unexpected element"),
        }
    }

    /// Append a new node to the child list of `parent`.
    fn add_leaf(&mut self, parent: NodeId, start: usize, end: usize, kind: NodeKind) -> NodeId {
        let id = self.push(Some(parent), start, end, kind);
        self.list_mut(parent).push(id);
        id
    }

    /// Add a container under `parent` and make it the open node.
    fn open(&mut self, parent: NodeId, start: usize, kind: NodeKind) -> NodeId {
        let id = self.add_leaf(parent, start, start, kind);
        self.node = Some(id);
        id
    }

    /// Close the open node at `end` and return to its parent.
    fn close(&mut self, end: usize) -> NodeId {
        let id = self.current();
        let raw = self.raw(self.nodes[id.index()].start, end);
        let node = self.node_at(id);
        node.end = end;
        node.raw = raw;
        self.node = node.parent;
        id
    }

    fn resolve_backreferences(&mut self) {
        for i in 0..self.backreferences.len() {
            let reference = self.backreferences[i];
            let group = match self.kind(reference) {
                NodeKind::Backreference {
                    reference: BackreferenceRef::Index(n),
                    ..
                } => n
                    .checked_sub(1)
                    .and_then(|i| self.capturing_groups.get(i as usize))
                    .copied(),
                NodeKind::Backreference {
                    reference: BackreferenceRef::Name(name),
                    ..
                } => self.capturing_groups.iter().copied().find(|&group| {
                    matches!(
                        self.kind(group),
                        NodeKind::CapturingGroup { name: Some(n), .. } if n == name
                    )
                }),
                other => unknown_error(other.name()),
            };
            let Some(group) = group else {
                unknown_error("unresolved backreference");
            };
            if let NodeKind::Backreference { resolved, .. } = &mut self.node_at(reference).kind {
                *resolved = Some(group);
            }
            if let NodeKind::CapturingGroup { references, .. } = &mut self.node_at(group).kind {
                references.push(reference);
            }
        }
    }

    /// Common body of `&&` and `--`: pop the operands and park the new node
    /// in the class's expression slot.
    fn class_set_operation(&mut self, start: usize, end: usize, intersection: bool) {
        let parent = self.parent_where(is_set_class);
        let right = self.pop_where(parent, NodeKind::is_class_set_operand);
        let buffered = self
            .expression_buffers
            .last_mut()
            .and_then(Option::take);
        let left = match buffered {
            Some(left) => left,
            None => self.pop_where(parent, NodeKind::is_class_set_operand),
        };
        let left_ok = match self.kind(left) {
            NodeKind::ClassIntersection { .. } => intersection,
            NodeKind::ClassSubtraction { .. } => !intersection,
            kind => kind.is_class_set_operand(),
        };
        if !left_ok {
            unknown_error(self.kind(left).name());
        }
        let kind = if intersection {
            NodeKind::ClassIntersection { left, right }
        } else {
            NodeKind::ClassSubtraction { left, right }
        };
        let id = self.push(Some(parent), start, end, kind);
        self.node_at(left).parent = Some(id);
        self.node_at(right).parent = Some(id);
        match self.expression_buffers.last_mut() {
            Some(slot) => *slot = Some(id),
            None => unknown_error("set operation outside a class"),
        }
    }
}

// ── Parent predicates ───────────────────────────────────────────────────────

fn is_alternative(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Alternative { .. })
}

fn is_alternative_owner(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Pattern { .. }
            | NodeKind::Group { .. }
            | NodeKind::CapturingGroup { .. }
            | NodeKind::LookaroundAssertion { .. }
    )
}

fn is_set_owner(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Alternative { .. } | NodeKind::CharacterClass { .. }
    )
}

fn is_character_owner(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Alternative { .. }
            | NodeKind::CharacterClass { .. }
            | NodeKind::StringAlternative { .. }
    )
}

fn is_set_class(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::CharacterClass {
            unicode_sets: true,
            ..
        }
    )
}

fn is_character(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Character { .. })
}

// ─────────────────────────────────────────────────────────────────────────────
// Event handling
// ─────────────────────────────────────────────────────────────────────────────

impl RegExpHandler for AstBuilder {
    fn on_literal_enter(&mut self, start: usize) {
        self.literal = Some((start, start));
    }

    fn on_literal_leave(&mut self, start: usize, end: usize) {
        self.literal = Some((start, end));
    }

    fn on_flags(&mut self, start: usize, end: usize, flags: RegExpFlags) {
        self.flags = Some((start, end, flags));
    }

    fn on_pattern_enter(&mut self, start: usize) {
        // A second validation pass starts the tree over.
        self.nodes.clear();
        self.backreferences.clear();
        self.capturing_groups.clear();
        self.expression_buffers.clear();
        let id = self.push(
            None,
            start,
            start,
            NodeKind::Pattern {
                alternatives: NodeList::new(),
            },
        );
        self.pattern = Some(id);
        self.node = Some(id);
    }

    fn on_pattern_leave(&mut self, _start: usize, end: usize) {
        let id = self.close(end);
        if Some(id) != self.pattern {
            unknown_error(self.kind(id).name());
        }
        self.resolve_backreferences();
    }

    fn on_alternative_enter(&mut self, start: usize, _index: usize) {
        let parent = self.parent_where(is_alternative_owner);
        self.open(
            parent,
            start,
            NodeKind::Alternative {
                elements: NodeList::new(),
            },
        );
    }

    fn on_alternative_leave(&mut self, _start: usize, end: usize, _index: usize) {
        self.close(end);
    }

    fn on_group_enter(&mut self, start: usize) {
        let parent = self.parent_where(is_alternative);
        self.open(
            parent,
            start,
            NodeKind::Group {
                alternatives: NodeList::new(),
            },
        );
    }

    fn on_group_leave(&mut self, _start: usize, end: usize) {
        self.close(end);
    }

    fn on_capturing_group_enter(&mut self, start: usize, name: Option<&str>) {
        let parent = self.parent_where(is_alternative);
        let index = u32::try_from(self.capturing_groups.len() + 1).unwrap_or(u32::MAX);
        let id = self.open(
            parent,
            start,
            NodeKind::CapturingGroup {
                index,
                name: name.map(str::to_string),
                alternatives: NodeList::new(),
                references: NodeList::new(),
            },
        );
        self.capturing_groups.push(id);
    }

    fn on_capturing_group_leave(&mut self, _start: usize, end: usize, _name: Option<&str>) {
        self.close(end);
    }

    fn on_quantifier(&mut self, _start: usize, end: usize, min: u64, max: Option<u64>, greedy: bool) {
        let parent = self.parent_where(is_alternative);
        let element = self.pop_where(parent, |kind| {
            !matches!(
                kind,
                NodeKind::Quantifier { .. }
                    | NodeKind::EdgeAssertion { .. }
                    | NodeKind::WordBoundaryAssertion { .. }
                    | NodeKind::LookaroundAssertion {
                        kind: LookaroundKind::Lookbehind,
                        ..
                    }
            )
        });
        let start = self.nodes[element.index()].start;
        let id = self.add_leaf(
            parent,
            start,
            end,
            NodeKind::Quantifier {
                min,
                max,
                greedy,
                element,
            },
        );
        self.node_at(element).parent = Some(id);
    }

    fn on_lookaround_assertion_enter(&mut self, start: usize, kind: LookaroundKind, negate: bool) {
        let parent = self.parent_where(is_alternative);
        self.open(
            parent,
            start,
            NodeKind::LookaroundAssertion {
                kind,
                negate,
                alternatives: NodeList::new(),
            },
        );
    }

    fn on_lookaround_assertion_leave(
        &mut self,
        _start: usize,
        end: usize,
        _kind: LookaroundKind,
        _negate: bool,
    ) {
        self.close(end);
    }

    fn on_edge_assertion(&mut self, start: usize, end: usize, kind: EdgeKind) {
        let parent = self.parent_where(is_alternative);
        self.add_leaf(parent, start, end, NodeKind::EdgeAssertion { kind });
    }

    fn on_word_boundary_assertion(&mut self, start: usize, end: usize, negate: bool) {
        let parent = self.parent_where(is_alternative);
        self.add_leaf(parent, start, end, NodeKind::WordBoundaryAssertion { negate });
    }

    fn on_any_character_set(&mut self, start: usize, end: usize) {
        let parent = self.parent_where(is_alternative);
        self.add_leaf(parent, start, end, NodeKind::CharacterSet(CharacterSetKind::Any));
    }

    fn on_escape_character_set(
        &mut self,
        start: usize,
        end: usize,
        kind: EscapeSetKind,
        negate: bool,
    ) {
        let parent = self.parent_where(is_set_owner);
        self.add_leaf(
            parent,
            start,
            end,
            NodeKind::CharacterSet(CharacterSetKind::Escape { kind, negate }),
        );
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
        let parent = self.parent_where(is_set_owner);
        if strings {
            let in_legacy_class = matches!(
                self.kind(parent),
                NodeKind::CharacterClass {
                    unicode_sets: false,
                    ..
                }
            );
            if in_legacy_class || negate || value.is_some() {
                unknown_error("invalid property of strings");
            }
        }
        self.add_leaf(
            parent,
            start,
            end,
            NodeKind::CharacterSet(CharacterSetKind::Property {
                key: key.to_string(),
                value: value.map(str::to_string),
                negate,
                strings,
            }),
        );
    }

    fn on_character(&mut self, start: usize, end: usize, value: u32) {
        let parent = self.parent_where(is_character_owner);
        self.add_leaf(parent, start, end, NodeKind::Character { value });
    }

    fn on_backreference(&mut self, start: usize, end: usize, reference: &BackreferenceRef) {
        let parent = self.parent_where(is_alternative);
        let id = self.add_leaf(
            parent,
            start,
            end,
            NodeKind::Backreference {
                reference: reference.clone(),
                resolved: None,
            },
        );
        self.backreferences.push(id);
    }

    fn on_character_class_enter(&mut self, start: usize, negate: bool, unicode_sets: bool) {
        let parent = self.current();
        let allowed = match self.kind(parent) {
            NodeKind::Alternative { .. } => true,
            NodeKind::CharacterClass {
                unicode_sets: outer,
                ..
            } => *outer && unicode_sets,
            _ => false,
        };
        if !allowed {
            unknown_error(self.kind(parent).name());
        }
        self.open(
            parent,
            start,
            NodeKind::CharacterClass {
                negate,
                unicode_sets,
                elements: NodeList::new(),
            },
        );
        self.expression_buffers.push(None);
    }

    fn on_character_class_leave(&mut self, _start: usize, end: usize, _negate: bool) {
        let expression = self.expression_buffers.pop().flatten();
        let id = self.close(end);
        let NodeKind::CharacterClass {
            negate, elements, ..
        } = self.kind(id)
        else {
            unknown_error(self.kind(id).name());
        };
        let Some(expression) = expression else {
            return;
        };
        if !elements.is_empty() {
            unknown_error("class with both elements and an expression");
        }
        let negate = *negate;
        self.node_at(id).kind = NodeKind::ExpressionCharacterClass { negate, expression };
        self.node_at(expression).parent = Some(id);
    }

    fn on_character_class_range(&mut self, start: usize, end: usize, _min: u32, _max: u32) {
        let parent = self.parent_where(|kind| matches!(kind, NodeKind::CharacterClass { .. }));
        let unicode_sets = is_set_class(self.kind(parent));
        let max = self.pop_where(parent, is_character);
        let hyphen = if unicode_sets {
            None
        } else {
            Some(self.pop_where(parent, |kind| {
                matches!(kind, NodeKind::Character { value } if *value == '-' as u32)
            }))
        };
        let min = self.pop_where(parent, is_character);

        let kind = NodeKind::CharacterClassRange { min, max };
        // The hyphen is absorbed into the range, so its slot is reused.
        let id = match hyphen {
            Some(slot) => {
                let raw = self.raw(start, end);
                *self.node_at(slot) = Node {
                    parent: Some(parent),
                    start,
                    end,
                    raw,
                    kind,
                };
                self.list_mut(parent).push(slot);
                slot
            }
            None => self.add_leaf(parent, start, end, kind),
        };
        self.node_at(min).parent = Some(id);
        self.node_at(max).parent = Some(id);
    }

    fn on_class_intersection(&mut self, start: usize, end: usize) {
        self.class_set_operation(start, end, true);
    }

    fn on_class_subtraction(&mut self, start: usize, end: usize) {
        self.class_set_operation(start, end, false);
    }

    fn on_class_string_disjunction_enter(&mut self, start: usize) {
        let parent = self.parent_where(is_set_class);
        self.open(
            parent,
            start,
            NodeKind::ClassStringDisjunction {
                alternatives: NodeList::new(),
            },
        );
    }

    fn on_class_string_disjunction_leave(&mut self, _start: usize, end: usize) {
        self.close(end);
    }

    fn on_string_alternative_enter(&mut self, start: usize, _index: usize) {
        let parent =
            self.parent_where(|kind| matches!(kind, NodeKind::ClassStringDisjunction { .. }));
        self.open(
            parent,
            start,
            NodeKind::StringAlternative {
                elements: NodeList::new(),
            },
        );
    }

    fn on_string_alternative_leave(&mut self, _start: usize, end: usize, _index: usize) {
        self.close(end);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Arena-allocated AST for ECMAScript regular expressions.
//!
//! # Overview
//!
//! A [`RegExpAst`] owns every [`Node`] of one parse in a flat `Vec`; nodes
//! refer to each other by [`NodeId`].  Ownership runs strictly top-down
//! through the child lists of each [`NodeKind`].  The `parent` link of a node
//! and the `resolved`/`references` links between backreferences and
//! capturing groups are plain indices used for navigation only.
//!
//! Every node records its half-open `[start, end)` span as UTF-16 code-unit
//! offsets into the parsed source, together with the source text of that
//! span in `raw`.

use smallvec::SmallVec;

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque identifier for a [`Node`] in a [`RegExpAst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Position of the node in [`RegExpAst::nodes`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered child list.  Most RegExp nodes have only a handful of children.
pub type NodeList = SmallVec<[NodeId; 4]>;

// ─────────────────────────────────────────────────────────────────────────────
// Shared vocabulary
// ─────────────────────────────────────────────────────────────────────────────

/// The flag set of a literal or a standalone flags string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegExpFlags {
    /// `g`
    pub global: bool,
    /// `i`
    pub ignore_case: bool,
    /// `m`
    pub multiline: bool,
    /// `u`
    pub unicode: bool,
    /// `y`
    pub sticky: bool,
    /// `s`
    pub dot_all: bool,
    /// `d`
    pub has_indices: bool,
    /// `v`
    pub unicode_sets: bool,
}

/// `^` or `$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Start,
    End,
}

/// `(?=…)`/`(?!…)` or `(?<=…)`/`(?<!…)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookaroundKind {
    Lookahead,
    Lookbehind,
}

/// The class named by `\d`, `\s` or `\w` (and their negations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeSetKind {
    Digit,
    Space,
    Word,
}

/// What a [`NodeKind::CharacterSet`] matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterSetKind {
    /// `.`
    Any,
    /// `\d`, `\D`, `\s`, `\S`, `\w`, `\W`.
    Escape { kind: EscapeSetKind, negate: bool },
    /// `\p{…}` or `\P{…}`.
    ///
    /// `strings` is set for properties of strings such as `RGI_Emoji`; such a
    /// property never has a `value` and is never negated.
    Property {
        key: String,
        value: Option<String>,
        negate: bool,
        strings: bool,
    },
}

/// The target of a backreference: `\1` or `\k<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BackreferenceRef {
    Index(u32),
    Name(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Nodes
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of a node together with its kind-specific fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `/pattern/flags`.
    RegExpLiteral { pattern: NodeId, flags: NodeId },
    /// The body of a regular expression.
    Pattern { alternatives: NodeList },
    /// The flags of a regular expression.
    Flags(RegExpFlags),
    /// One `|`-separated branch: a concatenation of elements.
    Alternative { elements: NodeList },
    /// `(?:…)`
    Group { alternatives: NodeList },
    /// `(…)` or `(?<name>…)`.
    ///
    /// `index` is the 1-based position of the opening parenthesis among all
    /// capturing groups of the pattern.  `references` lists the
    /// backreferences that resolve to this group.
    CapturingGroup {
        index: u32,
        name: Option<String>,
        alternatives: NodeList,
        references: NodeList,
    },
    /// `element*`, `element{min,max}?`, …  `max: None` means unbounded.
    Quantifier {
        min: u64,
        max: Option<u64>,
        greedy: bool,
        element: NodeId,
    },
    /// `^` or `$`.
    EdgeAssertion { kind: EdgeKind },
    /// `\b` or `\B` (`negate`).
    WordBoundaryAssertion { negate: bool },
    /// A lookahead or lookbehind.
    LookaroundAssertion {
        kind: LookaroundKind,
        negate: bool,
        alternatives: NodeList,
    },
    /// A single code point, after escape processing.
    Character { value: u32 },
    /// `.`, a class escape or a Unicode property escape.
    CharacterSet(CharacterSetKind),
    /// `[…]` without set operations.
    CharacterClass {
        negate: bool,
        unicode_sets: bool,
        elements: NodeList,
    },
    /// `a-z` inside a class.  Both bounds are `Character` nodes.
    CharacterClassRange { min: NodeId, max: NodeId },
    /// A `v`-mode `[…]` whose body is an `&&` or `--` expression.
    ExpressionCharacterClass { negate: bool, expression: NodeId },
    /// `left&&right`
    ClassIntersection { left: NodeId, right: NodeId },
    /// `left--right`
    ClassSubtraction { left: NodeId, right: NodeId },
    /// `\q{…|…}`
    ClassStringDisjunction { alternatives: NodeList },
    /// One branch of a `\q{…}`.
    StringAlternative { elements: NodeList },
    /// `\1` or `\k<name>`; `resolved` is the referenced capturing group.
    Backreference {
        reference: BackreferenceRef,
        resolved: Option<NodeId>,
    },
}

impl NodeKind {
    /// A short, stable name for the kind, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::RegExpLiteral { .. } => "RegExpLiteral",
            NodeKind::Pattern { .. } => "Pattern",
            NodeKind::Flags(_) => "Flags",
            NodeKind::Alternative { .. } => "Alternative",
            NodeKind::Group { .. } => "Group",
            NodeKind::CapturingGroup { .. } => "CapturingGroup",
            NodeKind::Quantifier { .. } => "Quantifier",
            NodeKind::EdgeAssertion { .. }
            | NodeKind::WordBoundaryAssertion { .. }
            | NodeKind::LookaroundAssertion { .. } => "Assertion",
            NodeKind::Character { .. } => "Character",
            NodeKind::CharacterSet(_) => "CharacterSet",
            NodeKind::CharacterClass { .. } => "CharacterClass",
            NodeKind::CharacterClassRange { .. } => "CharacterClassRange",
            NodeKind::ExpressionCharacterClass { .. } => "ExpressionCharacterClass",
            NodeKind::ClassIntersection { .. } => "ClassIntersection",
            NodeKind::ClassSubtraction { .. } => "ClassSubtraction",
            NodeKind::ClassStringDisjunction { .. } => "ClassStringDisjunction",
            NodeKind::StringAlternative { .. } => "StringAlternative",
            NodeKind::Backreference { .. } => "Backreference",
        }
    }

    /// Returns `true` for nodes that may appear as an operand of `&&`/`--`.
    pub fn is_class_set_operand(&self) -> bool {
        matches!(
            self,
            NodeKind::Character { .. }
                | NodeKind::CharacterSet(_)
                | NodeKind::CharacterClass { .. }
                | NodeKind::ExpressionCharacterClass { .. }
                | NodeKind::ClassStringDisjunction { .. }
        )
    }
}

/// A single AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// The owning node, or `None` for the root.
    pub parent: Option<NodeId>,
    /// UTF-16 offset of the first code unit.
    pub start: usize,
    /// UTF-16 offset one past the last code unit.
    pub end: usize,
    /// Source text of `[start, end)`.
    pub raw: String,
    pub kind: NodeKind,
}

// ─────────────────────────────────────────────────────────────────────────────
// RegExpAst
// ─────────────────────────────────────────────────────────────────────────────

/// The parsed tree: a flat arena of [`Node`]s plus the id of the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExpAst {
    pub nodes: Vec<Node>,
    pub root: NodeId,
}

impl RegExpAst {
    /// The node with identifier `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The kind of node `id`.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// The root node: a `RegExpLiteral`, `Pattern` or `Flags`.
    pub fn root(&self) -> &Node {
        self.node(self.root)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node id in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// The chain of parents of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |&p| self.node(p).parent)
    }

    /// The `Pattern` of a literal root, or the root itself for a pattern parse.
    pub fn pattern(&self) -> Option<NodeId> {
        match &self.root().kind {
            NodeKind::RegExpLiteral { pattern, .. } => Some(*pattern),
            NodeKind::Pattern { .. } => Some(self.root),
            _ => None,
        }
    }

    /// The `Flags` of a literal root, or the root itself for a flags parse.
    pub fn flags(&self) -> Option<&RegExpFlags> {
        let id = match &self.root().kind {
            NodeKind::RegExpLiteral { flags, .. } => *flags,
            NodeKind::Flags(_) => self.root,
            _ => return None,
        };
        match self.kind(id) {
            NodeKind::Flags(flags) => Some(flags),
            _ => None,
        }
    }

    /// Every capturing group, ordered by group index.
    pub fn capturing_groups(&self) -> Vec<NodeId> {
        let mut groups: Vec<(u32, NodeId)> = self
            .ids()
            .filter_map(|id| match self.kind(id) {
                NodeKind::CapturingGroup { index, .. } => Some((*index, id)),
                _ => None,
            })
            .collect();
        groups.sort_unstable_by_key(|&(index, _)| index);
        groups.into_iter().map(|(_, id)| id).collect()
    }

    /// The owned children of `id` in source order.
    ///
    /// Cross links (`resolved`, `references`) are not children.
    pub fn children(&self, id: NodeId) -> NodeList {
        match self.kind(id) {
            NodeKind::RegExpLiteral { pattern, flags } => [*pattern, *flags].into_iter().collect(),
            NodeKind::Pattern { alternatives }
            | NodeKind::Group { alternatives }
            | NodeKind::CapturingGroup { alternatives, .. }
            | NodeKind::LookaroundAssertion { alternatives, .. }
            | NodeKind::ClassStringDisjunction { alternatives } => alternatives.clone(),
            NodeKind::Alternative { elements }
            | NodeKind::CharacterClass { elements, .. }
            | NodeKind::StringAlternative { elements } => elements.clone(),
            NodeKind::Quantifier { element, .. } => [*element].into_iter().collect(),
            NodeKind::CharacterClassRange { min, max } => [*min, *max].into_iter().collect(),
            NodeKind::ExpressionCharacterClass { expression, .. } => {
                [*expression].into_iter().collect()
            }
            NodeKind::ClassIntersection { left, right }
            | NodeKind::ClassSubtraction { left, right } => [*left, *right].into_iter().collect(),
            NodeKind::Flags(_)
            | NodeKind::EdgeAssertion { .. }
            | NodeKind::WordBoundaryAssertion { .. }
            | NodeKind::Character { .. }
            | NodeKind::CharacterSet(_)
            | NodeKind::Backreference { .. } => NodeList::new(),
        }
    }

    /// Returns `true` if the class-set node `id` may match a string of more
    /// than one code point.
    pub fn may_contain_strings(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::CharacterSet(CharacterSetKind::Property { strings, .. }) => *strings,
            NodeKind::CharacterClass {
                negate, elements, ..
            } => !negate && elements.iter().any(|&e| self.may_contain_strings(e)),
            NodeKind::ExpressionCharacterClass { negate, expression } => {
                !negate && self.may_contain_strings(*expression)
            }
            NodeKind::ClassIntersection { left, right } => {
                self.may_contain_strings(*left) && self.may_contain_strings(*right)
            }
            NodeKind::ClassSubtraction { left, .. } => self.may_contain_strings(*left),
            NodeKind::ClassStringDisjunction { alternatives } => {
                alternatives.iter().any(|&a| self.may_contain_strings(a))
            }
            NodeKind::StringAlternative { elements } => elements.len() != 1,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn node(parent: Option<usize>, start: usize, end: usize, raw: &str, kind: NodeKind) -> Node {
        Node {
            parent: parent.map(NodeId::new),
            start,
            end,
            raw: raw.to_string(),
            kind,
        }
    }

    /// Hand-built tree for the pattern `[\q{ab}a]` in `v` mode.
    fn class_with_strings(negate: bool) -> RegExpAst {
        let id = NodeId::new;
        RegExpAst {
            nodes: vec![
                node(None, 0, 9, "[\\q{ab}a]", NodeKind::Pattern {
                    alternatives: smallvec![id(1)],
                }),
                node(Some(0), 0, 9, "[\\q{ab}a]", NodeKind::Alternative {
                    elements: smallvec![id(2)],
                }),
                node(Some(1), 0, 9, "[\\q{ab}a]", NodeKind::CharacterClass {
                    negate,
                    unicode_sets: true,
                    elements: smallvec![id(3), id(7)],
                }),
                node(Some(2), 1, 7, "\\q{ab}", NodeKind::ClassStringDisjunction {
                    alternatives: smallvec![id(4)],
                }),
                node(Some(3), 4, 6, "ab", NodeKind::StringAlternative {
                    elements: smallvec![id(5), id(6)],
                }),
                node(Some(4), 4, 5, "a", NodeKind::Character { value: 0x61 }),
                node(Some(4), 5, 6, "b", NodeKind::Character { value: 0x62 }),
                node(Some(2), 7, 8, "a", NodeKind::Character { value: 0x61 }),
            ],
            root: id(0),
        }
    }

    #[test]
    fn test_children_and_ancestors() {
        let ast = class_with_strings(false);
        let class = NodeId::new(2);
        assert_eq!(ast.children(class).as_slice(), &[NodeId::new(3), NodeId::new(7)]);
        let ancestors: Vec<_> = ast.ancestors(NodeId::new(5)).collect();
        assert_eq!(
            ancestors,
            vec![NodeId::new(4), NodeId::new(3), NodeId::new(2), NodeId::new(1), NodeId::new(0)]
        );
        assert_eq!(ast.pattern(), Some(NodeId::new(0)));
        assert!(ast.flags().is_none());
    }

    #[test]
    fn test_may_contain_strings() {
        let ast = class_with_strings(false);
        assert!(ast.may_contain_strings(NodeId::new(2)));
        assert!(ast.may_contain_strings(NodeId::new(3)));
        assert!(!ast.may_contain_strings(NodeId::new(7)));
        let negated = class_with_strings(true);
        assert!(!negated.may_contain_strings(NodeId::new(2)));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::Character { value: 0 }.name(), "Character");
        assert_eq!(NodeKind::EdgeAssertion { kind: EdgeKind::Start }.name(), "Assertion");
        assert!(NodeKind::CharacterSet(CharacterSetKind::Any).is_class_set_operand());
        assert!(!NodeKind::WordBoundaryAssertion { negate: false }.is_class_set_operand());
    }
}

//! # Syntax Nodes
//!
//! Values produced by successful parses. A [`Node`] is a cheap-to-clone
//! handle (the payload is shared behind an `Arc`, which is also what lets
//! the memo cache hand the same node back on every hit).
//!
//! ## Overview
//!
//! Three kinds of node exist:
//!
//! - **Terminal**: a matched piece of text (terminals, `.`, character
//!   classes).
//! - **Composite**: an ordered list of children, one per sequence element
//!   or repetition iteration, with optional labels on sequence children.
//! - **Empty**: a zero-width match (lookahead predicates, optional
//!   expressions that matched nothing).
//!
//! When a rule produces a node, the node is tagged with the rule's name and
//! any [`NodeBehavior`] registered for that rule. A rule whose body is a
//! bare nonterminal reference passes the inner node through untouched.

use crate::interval::Interval;
use compact_str::CompactString;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Opaque behavior attached to the nodes of one rule.
///
/// The engine guarantees only that the behavior registered for a rule is
/// attached to that rule's nodes before any parse uses the rule; it never
/// interprets the behavior itself. [`method_names`](Self::method_names)
/// exists for introspection and diagnostics.
pub trait NodeBehavior: fmt::Debug + Send + Sync {
    /// Names of the operations this behavior adds to its rule's nodes.
    fn method_names(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// A behavior captured from a `{ ... }` block in grammar text.
///
/// The block source is stored verbatim. Lines of the form `def <name>`
/// declare the operations the block adds; those names are scraped for
/// [`NodeBehavior::method_names`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBehavior {
    source: String,
    methods: Vec<CompactString>,
}

impl SourceBehavior {
    /// Capture a block body, scraping `def <name>` declarations.
    #[must_use]
    pub fn from_block(source: &str) -> Self {
        let mut methods = Vec::new();
        for line in source.lines() {
            if let Some(rest) = line.trim_start().strip_prefix("def ") {
                let name: CompactString = rest
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect();
                if !name.is_empty() {
                    methods.push(name);
                }
            }
        }
        Self {
            source: source.to_owned(),
            methods,
        }
    }

    /// The verbatim block body.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Combine two blocks of the same rule, in textual order.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut source = self.source.clone();
        source.push('\n');
        source.push_str(&other.source);
        let mut methods = self.methods.clone();
        methods.extend(other.methods.iter().cloned());
        Self { source, methods }
    }
}

impl NodeBehavior for SourceBehavior {
    fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(CompactString::as_str).collect()
    }
}

type Labels = SmallVec<[(CompactString, usize); 2]>;

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Terminal {
        text: CompactString,
    },
    Composite {
        children: Vec<Node>,
        labels: Labels,
    },
    Empty,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    interval: Interval,
    rule: Option<CompactString>,
    behavior: Option<Arc<dyn NodeBehavior>>,
}

/// A value produced by a successful parse.
#[derive(Debug, Clone)]
pub struct Node {
    data: Arc<NodeData>,
}

impl Node {
    /// A terminal node over `interval` holding the matched text.
    #[must_use]
    pub fn terminal(text: impl Into<CompactString>, interval: Interval) -> Self {
        Self::from_kind(
            NodeKind::Terminal { text: text.into() },
            interval,
        )
    }

    /// A composite node with one child per element, in match order.
    #[must_use]
    pub fn composite(children: Vec<Self>, interval: Interval) -> Self {
        Self::from_kind(
            NodeKind::Composite {
                children,
                labels: Labels::new(),
            },
            interval,
        )
    }

    /// A composite node whose `labels` expose selected children by name.
    ///
    /// Each label pairs a name with the index of the child it exposes.
    #[must_use]
    pub fn composite_labeled(
        children: Vec<Self>,
        labels: impl IntoIterator<Item = (CompactString, usize)>,
        interval: Interval,
    ) -> Self {
        Self::from_kind(
            NodeKind::Composite {
                children,
                labels: labels.into_iter().collect(),
            },
            interval,
        )
    }

    /// A zero-width node at `position`.
    #[must_use]
    pub fn empty(position: usize) -> Self {
        Self::from_kind(NodeKind::Empty, Interval::empty(position))
    }

    fn from_kind(kind: NodeKind, interval: Interval) -> Self {
        Self {
            data: Arc::new(NodeData {
                kind,
                interval,
                rule: None,
                behavior: None,
            }),
        }
    }

    /// The input range this node matched.
    #[must_use]
    pub fn interval(&self) -> Interval {
        self.data.interval
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.data.kind, NodeKind::Terminal { .. })
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self.data.kind, NodeKind::Composite { .. })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.data.kind, NodeKind::Empty)
    }

    /// The matched text of a terminal node.
    #[must_use]
    pub fn terminal_text(&self) -> Option<&str> {
        match &self.data.kind {
            NodeKind::Terminal { text } => Some(text),
            _ => None,
        }
    }

    /// Slice this node's interval out of the input it was parsed from.
    #[must_use]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.data.interval.range()]
    }

    /// The children of a composite node, or an empty slice.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.data.kind {
            NodeKind::Composite { children, .. } => children,
            _ => &[],
        }
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children().get(index)
    }

    /// Look up a labeled child of a composite node.
    #[must_use]
    pub fn child_by_label(&self, label: &str) -> Option<&Self> {
        match &self.data.kind {
            NodeKind::Composite { children, labels } => labels
                .iter()
                .find(|(name, _)| name == label)
                .and_then(|&(_, index)| children.get(index)),
            _ => None,
        }
    }

    /// The labeled children of a composite node, in label order.
    pub fn labeled_children(&self) -> impl Iterator<Item = (&str, &Self)> {
        let (children, labels): (&[Self], &[(CompactString, usize)]) = match &self.data.kind {
            NodeKind::Composite { children, labels } => (children, labels),
            _ => (&[], &[]),
        };
        labels
            .iter()
            .filter_map(move |(name, index)| Some((name.as_str(), children.get(*index)?)))
    }

    /// The rule that produced this node, if any.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        self.data.rule.as_deref()
    }

    /// The behavior registered for this node's rule, if any.
    #[must_use]
    pub fn behavior(&self) -> Option<&Arc<dyn NodeBehavior>> {
        self.data.behavior.as_ref()
    }

    /// Tag a node with the rule that produced it and the rule's behavior.
    ///
    /// Already-tagged nodes pass through unchanged, so a rule whose body is
    /// a bare nonterminal keeps the inner rule's identity.
    #[must_use]
    pub(crate) fn tagged(
        self,
        rule: &str,
        behavior: Option<Arc<dyn NodeBehavior>>,
    ) -> Self {
        if self.data.rule.is_some() {
            return self;
        }
        let data = match Arc::try_unwrap(self.data) {
            Ok(mut data) => {
                data.rule = Some(CompactString::from(rule));
                data.behavior = behavior;
                data
            }
            Err(shared) => NodeData {
                kind: shared.kind.clone(),
                interval: shared.interval,
                rule: Some(CompactString::from(rule)),
                behavior,
            },
        };
        Self {
            data: Arc::new(data),
        }
    }

    /// Whether two handles share the same underlying node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// Structural equality: kind, interval, and rule tag. Behaviors are opaque
/// and do not participate.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.data.kind == other.data.kind
            && self.data.interval == other.data.interval
            && self.data.rule == other.data.rule
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_node() {
        let node = Node::terminal("foo", Interval::new(2, 5));
        assert!(node.is_terminal());
        assert_eq!(node.terminal_text(), Some("foo"));
        assert_eq!(node.interval(), Interval::new(2, 5));
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_empty_node_is_zero_width() {
        let node = Node::empty(4);
        assert!(node.is_empty());
        assert!(node.interval().is_empty());
        assert_eq!(node.interval().start(), 4);
    }

    #[test]
    fn test_composite_children_in_order() {
        let a = Node::terminal("a", Interval::new(0, 1));
        let b = Node::terminal("b", Interval::new(1, 2));
        let composite = Node::composite(vec![a.clone(), b.clone()], Interval::new(0, 2));

        assert!(composite.is_composite());
        assert_eq!(composite.children().len(), 2);
        assert_eq!(composite.child(0), Some(&a));
        assert_eq!(composite.child(1), Some(&b));
        assert_eq!(composite.child(2), None);
    }

    #[test]
    fn test_labeled_children() {
        let name = Node::terminal("hi", Interval::new(0, 2));
        let rest = Node::terminal("!", Interval::new(2, 3));
        let composite = Node::composite_labeled(
            vec![name.clone(), rest],
            [(CompactString::from("word"), 0)],
            Interval::new(0, 3),
        );

        assert_eq!(composite.child_by_label("word"), Some(&name));
        assert_eq!(composite.child_by_label("missing"), None);
        let labeled: Vec<_> = composite.labeled_children().collect();
        assert_eq!(labeled.len(), 1);
        assert_eq!(labeled[0].0, "word");
    }

    #[test]
    fn test_text_slices_input() {
        let input = "hello world";
        let node = Node::composite(Vec::new(), Interval::new(6, 11));
        assert_eq!(node.text(input), "world");
    }

    #[test]
    fn test_tagging_sets_rule_once() {
        let node = Node::terminal("x", Interval::new(0, 1)).tagged("letter", None);
        assert_eq!(node.rule(), Some("letter"));

        // A pass-through rule keeps the inner rule's identity.
        let retagged = node.clone().tagged("outer", None);
        assert_eq!(retagged.rule(), Some("letter"));
    }

    #[test]
    fn test_tagging_attaches_behavior() {
        let behavior: Arc<dyn NodeBehavior> =
            Arc::new(SourceBehavior::from_block("def a_method\n\nend\n"));
        let node = Node::terminal("x", Interval::new(0, 1)).tagged("letter", Some(behavior));
        let attached = node.behavior().unwrap();
        assert_eq!(attached.method_names(), vec!["a_method"]);
    }

    #[test]
    fn test_source_behavior_scrapes_methods() {
        let behavior = SourceBehavior::from_block("def first\nend\n  def second_one\nend\n");
        assert_eq!(behavior.method_names(), vec!["first", "second_one"]);
        assert!(behavior.source().contains("def first"));
    }

    #[test]
    fn test_source_behavior_merge() {
        let a = SourceBehavior::from_block("def one\nend");
        let b = SourceBehavior::from_block("def two\nend");
        let merged = a.merge(&b);
        assert_eq!(merged.method_names(), vec!["one", "two"]);
    }

    #[test]
    fn test_equality_ignores_behavior() {
        let behavior: Arc<dyn NodeBehavior> = Arc::new(SourceBehavior::from_block("def m\nend"));
        let plain = Node::terminal("x", Interval::new(0, 1)).tagged("r", None);
        let with_behavior = Node::terminal("x", Interval::new(0, 1)).tagged("r", Some(behavior));
        assert_eq!(plain, with_behavior);
    }

    #[test]
    fn test_ptr_eq_distinguishes_handles() {
        let node = Node::terminal("x", Interval::new(0, 1));
        let same = node.clone();
        let equal = Node::terminal("x", Interval::new(0, 1));

        assert!(node.ptr_eq(&same));
        assert!(!node.ptr_eq(&equal));
        assert_eq!(node, equal);
    }
}

//! The outcome of evaluating one expression at one position.

use crate::interval::Interval;
use crate::node::Node;
use compact_str::CompactString;

/// What one `parse_at` call produced.
///
/// A `Success` starts exactly at the index the expression was evaluated at
/// and carries the node it built; a `Failure` records where matching was
/// abandoned and the display form of the expression that failed there.
/// Failures are ordinary control flow: ordered choice, repetition,
/// optionals, and predicates all consume them locally. Only a failure that
/// escapes the root rule becomes a user-visible error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    Success { interval: Interval, node: Node },
    Failure {
        position: usize,
        expected: CompactString,
    },
}

impl ParseResult {
    #[must_use]
    pub fn success(interval: Interval, node: Node) -> Self {
        Self::Success { interval, node }
    }

    #[must_use]
    pub fn failure(position: usize, expected: impl Into<CompactString>) -> Self {
        Self::Failure {
            position,
            expected: expected.into(),
        }
    }

    /// A zero-width success at `position` wrapping an empty node.
    #[must_use]
    pub fn empty_success(position: usize) -> Self {
        Self::Success {
            interval: Interval::empty(position),
            node: Node::empty(position),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// The consumed interval of a success.
    #[must_use]
    pub fn interval(&self) -> Option<Interval> {
        match self {
            Self::Success { interval, .. } => Some(*interval),
            Self::Failure { .. } => None,
        }
    }

    /// The node of a success.
    #[must_use]
    pub fn node(&self) -> Option<&Node> {
        match self {
            Self::Success { node, .. } => Some(node),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn into_node(self) -> Option<Node> {
        match self {
            Self::Success { node, .. } => Some(node),
            Self::Failure { .. } => None,
        }
    }

    /// The position a failure was reported at.
    #[must_use]
    pub fn failure_position(&self) -> Option<usize> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { position, .. } => Some(*position),
        }
    }

    /// The display form of the expression a failure expected.
    #[must_use]
    pub fn expected(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { expected, .. } => Some(expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_accessors() {
        let node = Node::terminal("ab", Interval::new(3, 5));
        let result = ParseResult::success(Interval::new(3, 5), node.clone());

        assert!(result.is_success());
        assert!(!result.is_failure());
        assert_eq!(result.interval(), Some(Interval::new(3, 5)));
        assert_eq!(result.node(), Some(&node));
        assert_eq!(result.failure_position(), None);
        assert_eq!(result.expected(), None);
    }

    #[test]
    fn test_failure_accessors() {
        let result = ParseResult::failure(7, "\"foo\"");

        assert!(result.is_failure());
        assert_eq!(result.failure_position(), Some(7));
        assert_eq!(result.expected(), Some("\"foo\""));
        assert_eq!(result.interval(), None);
        assert!(result.node().is_none());
    }

    #[test]
    fn test_empty_success_is_zero_width() {
        let result = ParseResult::empty_success(4);
        let interval = result.interval().unwrap();
        assert!(interval.is_empty());
        assert_eq!(interval.start(), 4);
        assert!(result.node().unwrap().is_empty());
    }
}

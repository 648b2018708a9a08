//! # Error Handling
//!
//! ## Overview
//!
//! Parsing separates recoverable match failures from hard errors.
//! Within a grammar, a failed match is an ordinary
//! [`ParseResult::Failure`](crate::result::ParseResult) that ordered
//! choice and the predicates recover from. [`ParseError`] is what
//! escapes [`Parser::parse`](crate::parser::Parser::parse): the root
//! rule failed outright, matched only a prefix of the input, or the
//! evaluation itself went wrong (undefined rule, left recursion, depth
//! limit).
//!
//! ## Error Types
//!
//! - [`ParseError`]: everything `parse` can report, with byte offsets.
//! - [`GrammarError`](crate::grammar::GrammarError): grammar-authoring
//!   defects, wrapped transparently.
//!
//! ## Usage
//!
//! ```
//! use thicket::build::terminal;
//! use thicket::{GrammarBuilder, ParseError};
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("greeting", terminal("hello"))
//!     .build()?;
//!
//! let err = grammar.new_parser().parse("goodbye").unwrap_err();
//! assert_eq!(err.position(), Some(0));
//! assert!(matches!(err, ParseError::Failed { .. }));
//! # Ok::<(), thicket::ParseError>(())
//! ```
//!
//! ## Diagnostics Support
//!
//! With the `diagnostics` feature enabled, errors implement
//! [`miette::Diagnostic`] and label the offending span of the source
//! text.

use crate::grammar::GrammarError;
use crate::interval::Interval;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors reported by [`Parser::parse`](crate::parser::Parser::parse).
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    /// The root rule did not match. `span` is the empty interval at the
    /// deepest position any expression reached; `expected` describes the
    /// expressions that failed there.
    #[error("parse failed at offset {}: expected {}", .span.start(), format_expected(.expected))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::failed)))]
    Failed {
        #[cfg_attr(feature = "diagnostics", label("parse failed here"))]
        span: Interval,
        expected: Vec<String>,
    },

    /// The root rule matched `consumed` but unconsumed input remains.
    #[error("parse incomplete: matched {consumed}, unconsumed input begins at offset {}", .span.start())]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::incomplete)))]
    Incomplete {
        consumed: Interval,
        #[cfg_attr(feature = "diagnostics", label("unconsumed input begins here"))]
        span: Interval,
        expected: Vec<String>,
    },

    /// A rule re-entered itself at the same position. Packrat evaluation
    /// cannot make progress on such a cycle, so it is cut immediately.
    #[error("left recursion on rule `{rule}` at offset {}", .span.start())]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::left_recursion)))]
    LeftRecursion {
        rule: String,
        #[cfg_attr(feature = "diagnostics", label("rule re-entered here"))]
        span: Interval,
    },

    /// Expression nesting exceeded
    /// [`ParserConfig::max_recursion_depth`](crate::parser::ParserConfig::max_recursion_depth).
    #[error("recursion depth limit {depth} exceeded at offset {}", .span.start())]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::depth_exceeded)))]
    DepthExceeded {
        depth: usize,
        #[cfg_attr(feature = "diagnostics", label("deepest expression here"))]
        span: Interval,
    },

    /// The grammar itself is defective, most commonly an undefined rule
    /// referenced during evaluation.
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Grammar(#[from] GrammarError),
}

impl ParseError {
    /// The byte offset the error points at, when it has one.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Failed { span, .. }
            | Self::Incomplete { span, .. }
            | Self::LeftRecursion { span, .. }
            | Self::DepthExceeded { span, .. } => Some(span.start()),
            Self::Grammar(_) => None,
        }
    }

    /// The interval the root rule consumed before input ran out, for
    /// [`Incomplete`](Self::Incomplete) errors.
    #[must_use]
    pub const fn consumed(&self) -> Option<Interval> {
        match self {
            Self::Incomplete { consumed, .. } => Some(*consumed),
            _ => None,
        }
    }

    /// Descriptions of the expressions that failed at the reported
    /// position. Empty for hard errors.
    #[must_use]
    pub fn expected(&self) -> &[String] {
        match self {
            Self::Failed { expected, .. } | Self::Incomplete { expected, .. } => expected,
            _ => &[],
        }
    }
}

/// Human-readable rendering of an expectation list.
fn format_expected(expected: &[String]) -> String {
    match expected {
        [] => "no further input".to_owned(),
        [single] => single.clone(),
        many => format!("one of {}", many.join(", ")),
    }
}

#[derive(Debug, Default)]
pub struct ParseMetrics {
    pub rule_invocations: usize,
    pub nodes_created: usize,
    pub cache_hits: usize,
    pub parse_time: std::time::Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_message() {
        let err = ParseError::Failed {
            span: Interval::empty(3),
            expected: vec!["\"a\"".to_owned(), "\"b\"".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "parse failed at offset 3: expected one of \"a\", \"b\""
        );
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_single_expectation_message() {
        let err = ParseError::Failed {
            span: Interval::empty(0),
            expected: vec!["\"hello\"".to_owned()],
        };
        assert_eq!(err.to_string(), "parse failed at offset 0: expected \"hello\"");
    }

    #[test]
    fn test_incomplete_carries_consumed_interval() {
        let err = ParseError::Incomplete {
            consumed: Interval::new(0, 5),
            span: Interval::empty(5),
            expected: Vec::new(),
        };
        assert_eq!(err.consumed(), Some(Interval::new(0, 5)));
        assert_eq!(err.position(), Some(5));
        assert_eq!(
            err.to_string(),
            "parse incomplete: matched 0..5, unconsumed input begins at offset 5"
        );
    }

    #[test]
    fn test_grammar_error_is_transparent() {
        let err = ParseError::from(GrammarError::UndefinedRule {
            name: "ghost".to_owned(),
        });
        assert_eq!(err.to_string(), "rule `ghost` is not defined");
        assert_eq!(err.position(), None);
    }
}

//! # Packrat Evaluator
//!
//! ## Overview
//!
//! [`Parser`] evaluates a [`Grammar`]'s rules against a text using PEG
//! semantics: ordered choice (first match wins), possessive repetition,
//! and zero-width predicates. Rule outcomes are memoized per (rule,
//! position) so backtracking never evaluates a rule body twice at the
//! same position. The cache belongs to one parse and is cleared on the
//! next; grammars stay immutable and shareable.
//!
//! A parser tracks the deepest failure position reached anywhere in the
//! parse and the descriptions of the expressions that failed there,
//! which is what [`ParseError::Failed`] and [`ParseError::Incomplete`]
//! report.
//!
//! ## Usage
//!
//! ```
//! use thicket::build::{optional, sequence, terminal};
//! use thicket::GrammarBuilder;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("greeting", sequence([
//!         terminal("hello"),
//!         optional(terminal(" world")),
//!     ]))
//!     .build()?;
//!
//! let node = grammar.new_parser().parse("hello world")?;
//! assert_eq!(node.interval().range(), 0..11);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cache;
mod config;
mod observer;

pub use config::ParserConfig;
pub use observer::{NullObserver, ParseEvent, ParseObserver};

use crate::error::{ParseError, ParseMetrics};
use crate::expr::ParsingExpression;
use crate::grammar::{Grammar, GrammarError};
use crate::interval::Interval;
use crate::node::Node;
use crate::result::ParseResult;
use cache::{CacheEntry, CacheKey, PackratCache};
use compact_str::{CompactString, ToCompactString};
use lasso::Spur;
use smallvec::SmallVec;
use std::time::Instant;

/// Running maximum of failure positions, with the descriptions of every
/// expression that failed at that position (deduplicated, in first-failure
/// order). Shallower failures are ignored; a deeper one resets the list.
#[derive(Debug, Default)]
struct DeepestFailure {
    position: usize,
    expected: Vec<String>,
    recorded: bool,
}

impl DeepestFailure {
    fn clear(&mut self) {
        self.position = 0;
        self.expected.clear();
        self.recorded = false;
    }

    fn note(&mut self, position: usize, description: &str) {
        if self.recorded {
            if position < self.position {
                return;
            }
            if position > self.position {
                self.position = position;
                self.expected.clear();
            }
        } else {
            self.recorded = true;
            self.position = position;
        }
        if !self.expected.iter().any(|known| known == description) {
            self.expected.push(description.to_owned());
        }
    }
}

/// Evaluates one grammar against texts. Created by
/// [`Grammar::new_parser`] or [`Grammar::new_parser_at`].
///
/// A parser is cheap to construct and reusable: each call to
/// [`parse`](Self::parse) starts from a cleared cache and fresh metrics.
pub struct Parser<'g> {
    grammar: &'g Grammar,
    root: Option<Spur>,
    config: ParserConfig,
    cache: PackratCache,
    deepest: DeepestFailure,
    metrics: ParseMetrics,
    depth: usize,
    observer: Box<dyn ParseObserver>,
}

impl<'g> Parser<'g> {
    pub(crate) fn new(grammar: &'g Grammar, root: Option<Spur>) -> Self {
        Self {
            grammar,
            root,
            config: ParserConfig::default(),
            cache: PackratCache::new(),
            deepest: DeepestFailure::default(),
            metrics: ParseMetrics::default(),
            depth: 0,
            observer: Box::new(NullObserver),
        }
    }

    /// Replace the evaluator configuration.
    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach an observer that receives [`ParseEvent`]s during parsing.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn ParseObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Metrics collected by the most recent [`parse`](Self::parse) call.
    #[must_use]
    pub const fn metrics(&self) -> &ParseMetrics {
        &self.metrics
    }

    /// Parse `input` from the beginning with the root rule.
    ///
    /// The whole input must be consumed: a root match that stops short
    /// is reported as [`ParseError::Incomplete`] carrying the consumed
    /// interval.
    ///
    /// # Errors
    ///
    /// [`ParseError::Failed`] or [`ParseError::Incomplete`] for inputs
    /// the grammar does not accept, both pointing at the deepest failure
    /// position the parse reached. [`ParseError::Grammar`],
    /// [`ParseError::LeftRecursion`], and [`ParseError::DepthExceeded`]
    /// for defects in the grammar or evaluation limits.
    pub fn parse(&mut self, input: &str) -> Result<Node, ParseError> {
        let start_time = Instant::now();
        self.cache.clear();
        self.deepest.clear();
        self.metrics = ParseMetrics::default();
        self.depth = 0;

        let root = self.root.ok_or(GrammarError::MissingRoot)?;
        let outcome = self.apply_rule(root, input, 0);
        self.metrics.parse_time = start_time.elapsed();

        match outcome? {
            ParseResult::Success { interval, node } => {
                if interval.end() == input.len() {
                    Ok(node)
                } else {
                    let (position, expected) =
                        if self.deepest.recorded && self.deepest.position >= interval.end() {
                            (self.deepest.position, self.deepest.expected.clone())
                        } else {
                            (interval.end(), Vec::new())
                        };
                    Err(ParseError::Incomplete {
                        consumed: interval,
                        span: Interval::empty(position),
                        expected,
                    })
                }
            }
            ParseResult::Failure { position, expected } => {
                let (position, expected) = if self.deepest.recorded {
                    (self.deepest.position, self.deepest.expected.clone())
                } else {
                    (position, vec![expected.into()])
                };
                Err(ParseError::Failed {
                    span: Interval::empty(position),
                    expected,
                })
            }
        }
    }

    /// Apply the rule behind `key` at `index`, consulting the memo cache.
    fn apply_rule(&mut self, key: Spur, input: &str, index: usize) -> Result<ParseResult, ParseError> {
        let grammar = self.grammar;
        let name = grammar.name_of(key);
        let Some(entry) = grammar.entry(key) else {
            return Err(GrammarError::UndefinedRule {
                name: name.to_owned(),
            }
            .into());
        };

        self.metrics.rule_invocations += 1;

        let cache_key = CacheKey {
            rule: key,
            position: index,
        };
        if self.config.enable_memoization {
            match self.cache.get(cache_key).cloned() {
                Some(CacheEntry::Done(result)) => {
                    self.metrics.cache_hits += 1;
                    self.observer.observe(ParseEvent::CacheHit {
                        rule: name,
                        position: index,
                    });
                    return Ok(result);
                }
                Some(CacheEntry::InFlight) => {
                    return Err(ParseError::LeftRecursion {
                        rule: name.to_owned(),
                        span: Interval::empty(index),
                    });
                }
                None => self.cache.begin(cache_key),
            }
        }

        self.observer.observe(ParseEvent::RuleEntered {
            rule: name,
            position: index,
        });

        let outcome = match self.evaluate(&entry.expression, input, index)? {
            ParseResult::Success { interval, node } => ParseResult::Success {
                interval,
                node: node.tagged(name, entry.behavior.clone()),
            },
            failure => failure,
        };

        if self.config.enable_memoization {
            self.cache.complete(cache_key, outcome.clone());
        }
        self.observer.observe(ParseEvent::RuleExited {
            rule: name,
            position: index,
            success: outcome.is_success(),
        });
        Ok(outcome)
    }

    fn evaluate(
        &mut self,
        expression: &ParsingExpression,
        input: &str,
        index: usize,
    ) -> Result<ParseResult, ParseError> {
        if self.depth >= self.config.max_recursion_depth {
            return Err(ParseError::DepthExceeded {
                depth: self.config.max_recursion_depth,
                span: Interval::empty(index),
            });
        }
        self.depth += 1;
        let result = self.evaluate_dispatch(expression, input, index);
        self.depth -= 1;
        result
    }

    #[allow(clippy::too_many_lines)]
    fn evaluate_dispatch(
        &mut self,
        expression: &ParsingExpression,
        input: &str,
        index: usize,
    ) -> Result<ParseResult, ParseError> {
        match expression {
            ParsingExpression::Terminal(prefix) => {
                let matched = input
                    .get(index..)
                    .is_some_and(|rest| rest.starts_with(prefix.as_str()));
                if matched {
                    let interval = Interval::at(index, prefix.len());
                    self.metrics.nodes_created += 1;
                    Ok(ParseResult::success(
                        interval,
                        Node::terminal(prefix.clone(), interval),
                    ))
                } else {
                    Ok(self.fail(index, expression))
                }
            }

            ParsingExpression::Anything => {
                match input.get(index..).and_then(|rest| rest.chars().next()) {
                    Some(ch) => Ok(self.char_success(ch, index)),
                    None => Ok(self.fail(index, expression)),
                }
            }

            ParsingExpression::Class(class) => {
                match input.get(index..).and_then(|rest| rest.chars().next()) {
                    Some(ch) if class.matches(ch) => Ok(self.char_success(ch, index)),
                    _ => Ok(self.fail(index, expression)),
                }
            }

            ParsingExpression::Nonterminal(name) => {
                let Some(key) = self.grammar.rule_key(name) else {
                    return Err(GrammarError::UndefinedRule {
                        name: name.to_string(),
                    }
                    .into());
                };
                self.apply_rule(key, input, index)
            }

            ParsingExpression::Sequence(elements) => {
                let mut children = Vec::with_capacity(elements.len());
                let mut labels: SmallVec<[(CompactString, usize); 2]> = SmallVec::new();
                let mut cursor = index;
                for element in elements {
                    match self.evaluate(&element.expr, input, cursor)? {
                        ParseResult::Success { interval, node } => {
                            if let Some(label) = &element.label {
                                labels.push((label.clone(), children.len()));
                            }
                            children.push(node);
                            cursor = interval.end();
                        }
                        failure @ ParseResult::Failure { .. } => return Ok(failure),
                    }
                }
                let interval = Interval::new(index, cursor);
                self.metrics.nodes_created += 1;
                Ok(ParseResult::success(
                    interval,
                    Node::composite_labeled(children, labels, interval),
                ))
            }

            ParsingExpression::Choice(alternatives) => {
                let mut rightmost: Option<(usize, CompactString)> = None;
                for alternative in alternatives {
                    match self.evaluate(alternative, input, index)? {
                        success @ ParseResult::Success { .. } => return Ok(success),
                        ParseResult::Failure { position, expected } => {
                            let further = rightmost
                                .as_ref()
                                .is_none_or(|&(best, _)| position > best);
                            if further {
                                rightmost = Some((position, expected));
                            }
                        }
                    }
                }
                match rightmost {
                    Some((position, expected)) => Ok(ParseResult::failure(position, expected)),
                    None => Ok(self.fail(index, expression)),
                }
            }

            ParsingExpression::ZeroOrMore(inner) => {
                let (children, cursor) = self.repeat(inner, input, index)?;
                let interval = Interval::new(index, cursor);
                self.metrics.nodes_created += 1;
                Ok(ParseResult::success(
                    interval,
                    Node::composite(children, interval),
                ))
            }

            ParsingExpression::OneOrMore(inner) => {
                match self.evaluate(inner, input, index)? {
                    ParseResult::Success { interval, node } => {
                        let mut children = vec![node];
                        let mut cursor = interval.end();
                        if !interval.is_empty() {
                            let (rest, end) = self.repeat(inner, input, cursor)?;
                            children.extend(rest);
                            cursor = end;
                        }
                        let span = Interval::new(index, cursor);
                        self.metrics.nodes_created += 1;
                        Ok(ParseResult::success(span, Node::composite(children, span)))
                    }
                    // zero iterations: the inner failure is the result
                    failure => Ok(failure),
                }
            }

            ParsingExpression::Optional(inner) => match self.evaluate(inner, input, index)? {
                success @ ParseResult::Success { .. } => Ok(success),
                ParseResult::Failure { .. } => {
                    self.metrics.nodes_created += 1;
                    Ok(ParseResult::empty_success(index))
                }
            },

            ParsingExpression::AndPredicate(inner) => {
                match self.evaluate(inner, input, index)? {
                    ParseResult::Success { .. } => {
                        self.metrics.nodes_created += 1;
                        Ok(ParseResult::empty_success(index))
                    }
                    failure => Ok(failure),
                }
            }

            ParsingExpression::NotPredicate(inner) => {
                match self.evaluate(inner, input, index)? {
                    ParseResult::Success { .. } => Ok(self.fail(index, expression)),
                    ParseResult::Failure { .. } => {
                        self.metrics.nodes_created += 1;
                        Ok(ParseResult::empty_success(index))
                    }
                }
            }
        }
    }

    /// Match `inner` repeatedly, each attempt at the previous end.
    /// Stops at the first failure (consumed, not propagated) or after a
    /// zero-length match, which cannot advance the cursor.
    fn repeat(
        &mut self,
        inner: &ParsingExpression,
        input: &str,
        index: usize,
    ) -> Result<(Vec<Node>, usize), ParseError> {
        let mut children = Vec::new();
        let mut cursor = index;
        loop {
            match self.evaluate(inner, input, cursor)? {
                ParseResult::Success { interval, node } => {
                    children.push(node);
                    cursor = interval.end();
                    if interval.is_empty() {
                        break;
                    }
                }
                ParseResult::Failure { .. } => break,
            }
        }
        Ok((children, cursor))
    }

    fn char_success(&mut self, ch: char, index: usize) -> ParseResult {
        let interval = Interval::at(index, ch.len_utf8());
        self.metrics.nodes_created += 1;
        ParseResult::success(interval, Node::terminal(ch.to_compact_string(), interval))
    }

    /// Record a failure of `expression` at `position` and build the
    /// failure result carrying the expression's display form.
    fn fail(&mut self, position: usize, expression: &ParsingExpression) -> ParseResult {
        let expected = expression.to_compact_string();
        self.deepest.note(position, &expected);
        self.observer.observe(ParseEvent::FailureNoted { position });
        ParseResult::failure(position, expected)
    }
}

impl ParsingExpression {
    /// Evaluate this expression at `index` of `input`, using `parser`'s
    /// grammar for nonterminal resolution, its cache for memoization,
    /// and its failure tracking.
    ///
    /// A Success interval always starts exactly at `index`; a Failure
    /// reports a position at or beyond it. `Err` carries hard errors:
    /// undefined rules, left recursion, the depth limit.
    pub fn parse_at(
        &self,
        input: &str,
        index: usize,
        parser: &mut Parser<'_>,
    ) -> Result<ParseResult, ParseError> {
        parser.evaluate(self, input, index)
    }
}

//! # Parsing Expressions
//!
//! The expression algebra grammars are made of. Eleven variants cover
//! literal matching, single-character matching, character classes, rule
//! references, sequencing, ordered choice, repetition, optionals, and the
//! two zero-width lookahead predicates.
//!
//! Expression trees are immutable once built and own their sub-expressions
//! exclusively. The only back-reference in the model is
//! [`ParsingExpression::Nonterminal`], which names a rule and is resolved
//! through the [`Grammar`](crate::grammar::Grammar) at evaluation time, so
//! the tree itself stays acyclic and freely shareable.
//!
//! Construction goes through the associated constructors here or the
//! conversion helpers in [`build`]; both collapse degenerate nesting
//! (a one-element sequence is that element, a one-alternative choice is
//! that alternative).

pub mod build;

use crate::grammar::GrammarError;
use compact_str::CompactString;
use smallvec::SmallVec;
use std::fmt;

/// A compiled character class: a set of inclusive ranges plus a polarity.
///
/// Built by [`CharacterClass::parse`] from a specification string such as
/// `"0-9"`, `"a-zA-Z_"`, or `"^ \t\n"`. A leading `^` negates the class.
/// Backslash escapes `\t`, `\n`, `\r` denote the control characters; any
/// other escaped character stands for itself (so `\-`, `\]`, `\^`, and
/// `\\` are the literal characters). A `-` with no character on one side
/// is literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterClass {
    source: CompactString,
    ranges: SmallVec<[(char, char); 8]>,
    negated: bool,
}

impl CharacterClass {
    /// Compile a class specification string.
    pub fn parse(spec: &str) -> Result<Self, GrammarError> {
        let invalid = |reason: &str| GrammarError::InvalidCharacterClass {
            spec: spec.to_owned(),
            reason: reason.to_owned(),
        };

        let (negated, body) = match spec.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };

        let mut ranges: SmallVec<[(char, char); 8]> = SmallVec::new();
        let mut chars = body.chars().peekable();

        fn next_entry_char(
            chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
        ) -> Result<Option<char>, ()> {
            match chars.next() {
                None => Ok(None),
                Some('\\') => match chars.next() {
                    Some('t') => Ok(Some('\t')),
                    Some('n') => Ok(Some('\n')),
                    Some('r') => Ok(Some('\r')),
                    Some(other) => Ok(Some(other)),
                    None => Err(()),
                },
                Some(c) => Ok(Some(c)),
            }
        }

        loop {
            let lo = match next_entry_char(&mut chars) {
                Ok(Some(c)) => c,
                Ok(None) => break,
                Err(()) => return Err(invalid("dangling escape")),
            };
            // A '-' makes a range only when a character follows it.
            if chars.peek() == Some(&'-') {
                let mut ahead = chars.clone();
                ahead.next();
                if ahead.peek().is_some() {
                    chars = ahead;
                    let hi = match next_entry_char(&mut chars) {
                        Ok(Some(c)) => c,
                        Ok(None) | Err(()) => return Err(invalid("dangling escape")),
                    };
                    if lo > hi {
                        return Err(invalid("range start exceeds range end"));
                    }
                    ranges.push((lo, hi));
                    continue;
                }
            }
            ranges.push((lo, lo));
        }

        if ranges.is_empty() {
            return Err(invalid("class matches no characters"));
        }

        Ok(Self {
            source: CompactString::from(spec),
            ranges,
            negated,
        })
    }

    /// Whether `ch` is accepted, honoring the polarity flag.
    #[must_use]
    pub fn matches(&self, ch: char) -> bool {
        let inside = self.ranges.iter().any(|&(lo, hi)| lo <= ch && ch <= hi);
        inside != self.negated
    }

    /// The specification string this class was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The compiled inclusive ranges, in specification order.
    #[must_use]
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.source)
    }
}

/// One element of a sequence, optionally labeled.
///
/// Labels surface in the composite node the sequence produces: a labeled
/// element's child can be fetched with
/// [`Node::child_by_label`](crate::node::Node::child_by_label).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceElement {
    pub label: Option<CompactString>,
    pub expr: ParsingExpression,
}

impl SequenceElement {
    #[must_use]
    pub fn new(expr: ParsingExpression) -> Self {
        Self { label: None, expr }
    }

    #[must_use]
    pub fn labeled(label: impl Into<CompactString>, expr: ParsingExpression) -> Self {
        Self {
            label: Some(label.into()),
            expr,
        }
    }
}

impl From<ParsingExpression> for SequenceElement {
    fn from(expr: ParsingExpression) -> Self {
        Self::new(expr)
    }
}

/// A parsing expression.
///
/// See the [module docs](self) for the algebra and
/// [`parse_at`](Self::parse_at) for the evaluation contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingExpression {
    /// Match an exact prefix.
    Terminal(CompactString),
    /// Match any single character.
    Anything,
    /// Match one character against a compiled class.
    Class(CharacterClass),
    /// Evaluate the named rule, memoized per (rule, position).
    Nonterminal(CompactString),
    /// Match each element in order, each at the previous element's end.
    Sequence(Vec<SequenceElement>),
    /// Try alternatives in order at the same position; first success wins.
    Choice(Vec<ParsingExpression>),
    /// Match the inner expression as often as it succeeds; never fails.
    ZeroOrMore(Box<ParsingExpression>),
    /// Like [`Self::ZeroOrMore`], but fails if no iteration succeeds.
    OneOrMore(Box<ParsingExpression>),
    /// Inner success passes through; inner failure is an empty match.
    Optional(Box<ParsingExpression>),
    /// Zero-width positive lookahead.
    AndPredicate(Box<ParsingExpression>),
    /// Zero-width negative lookahead.
    NotPredicate(Box<ParsingExpression>),
}

impl ParsingExpression {
    #[must_use]
    pub fn terminal(prefix: impl Into<CompactString>) -> Self {
        Self::Terminal(prefix.into())
    }

    #[must_use]
    pub const fn anything() -> Self {
        Self::Anything
    }

    #[must_use]
    pub const fn class(class: CharacterClass) -> Self {
        Self::Class(class)
    }

    #[must_use]
    pub fn nonterminal(name: impl Into<CompactString>) -> Self {
        Self::Nonterminal(name.into())
    }

    /// Build a sequence. A one-element sequence with no label collapses to
    /// the element itself.
    #[must_use]
    pub fn sequence(mut elements: Vec<SequenceElement>) -> Self {
        if elements.len() == 1 && elements[0].label.is_none() {
            return elements.remove(0).expr;
        }
        Self::Sequence(elements)
    }

    /// Build an ordered choice. A one-alternative choice collapses to the
    /// alternative itself.
    #[must_use]
    pub fn choice(mut alternatives: Vec<Self>) -> Self {
        if alternatives.len() == 1 {
            return alternatives.remove(0);
        }
        Self::Choice(alternatives)
    }

    #[must_use]
    pub fn zero_or_more(inner: Self) -> Self {
        Self::ZeroOrMore(Box::new(inner))
    }

    #[must_use]
    pub fn one_or_more(inner: Self) -> Self {
        Self::OneOrMore(Box::new(inner))
    }

    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn and_predicate(inner: Self) -> Self {
        Self::AndPredicate(Box::new(inner))
    }

    #[must_use]
    pub fn not_predicate(inner: Self) -> Self {
        Self::NotPredicate(Box::new(inner))
    }

    /// Visit this expression and every sub-expression, pre-order.
    pub fn visit(&self, f: &mut impl FnMut(&Self)) {
        f(self);
        match self {
            Self::Terminal(_) | Self::Anything | Self::Class(_) | Self::Nonterminal(_) => {}
            Self::Sequence(elements) => {
                for element in elements {
                    element.expr.visit(f);
                }
            }
            Self::Choice(alternatives) => {
                for alternative in alternatives {
                    alternative.visit(f);
                }
            }
            Self::ZeroOrMore(inner)
            | Self::OneOrMore(inner)
            | Self::Optional(inner)
            | Self::AndPredicate(inner)
            | Self::NotPredicate(inner) => inner.visit(f),
        }
    }

    /// Call `f` with the name of every nonterminal referenced anywhere in
    /// this expression.
    pub fn for_each_nonterminal(&self, f: &mut impl FnMut(&str)) {
        self.visit(&mut |expr| {
            if let Self::Nonterminal(name) = expr {
                f(name);
            }
        });
    }
}

impl fmt::Display for ParsingExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(prefix) => write!(f, "\"{}\"", prefix.escape_debug()),
            Self::Anything => f.write_str("."),
            Self::Class(class) => write!(f, "{class}"),
            Self::Nonterminal(name) => f.write_str(name),
            Self::Sequence(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    if let Some(label) = &element.label {
                        write!(f, "{label}:")?;
                    }
                    write!(f, "{}", element.expr)?;
                }
                f.write_str(")")
            }
            Self::Choice(alternatives) => {
                f.write_str("(")?;
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" / ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                f.write_str(")")
            }
            Self::ZeroOrMore(inner) => write!(f, "({inner})*"),
            Self::OneOrMore(inner) => write!(f, "({inner})+"),
            Self::Optional(inner) => write!(f, "({inner})?"),
            Self::AndPredicate(inner) => write!(f, "&({inner})"),
            Self::NotPredicate(inner) => write!(f, "!({inner})"),
        }
    }
}

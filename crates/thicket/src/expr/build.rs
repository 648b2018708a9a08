//! # Expression Building Helpers
//!
//! Conversions and convenience constructors for assembling expression trees
//! programmatically. String-ish values convert to terminals, arrays convert
//! element-wise to sequences, and already-built expressions pass through,
//! so grammar fragments read close to the grammars they describe:
//!
//! ```rust
//! use thicket::build::{one_or_more, character_class, sequence, optional, exp};
//!
//! let number = one_or_more(character_class("0-9").unwrap());
//! let greeting = sequence([exp("hello"), optional(" world")]);
//! assert_eq!(greeting.to_string(), "(\"hello\" (\" world\")?)");
//! ```

use super::{CharacterClass, ParsingExpression, SequenceElement};
use crate::grammar::GrammarError;
use compact_str::CompactString;

/// Values convertible into a parsing expression.
///
/// Literal strings and characters become terminals; expressions pass
/// through unchanged; arrays and vectors convert element-wise into a
/// sequence. Nonterminal references are always explicit, via
/// [`nonterminal`].
pub trait IntoExpression {
    fn into_expression(self) -> ParsingExpression;
}

impl IntoExpression for ParsingExpression {
    fn into_expression(self) -> ParsingExpression {
        self
    }
}

impl IntoExpression for &ParsingExpression {
    fn into_expression(self) -> ParsingExpression {
        self.clone()
    }
}

impl IntoExpression for &str {
    fn into_expression(self) -> ParsingExpression {
        ParsingExpression::terminal(self)
    }
}

impl IntoExpression for String {
    fn into_expression(self) -> ParsingExpression {
        ParsingExpression::terminal(self)
    }
}

impl IntoExpression for CompactString {
    fn into_expression(self) -> ParsingExpression {
        ParsingExpression::Terminal(self)
    }
}

impl IntoExpression for char {
    fn into_expression(self) -> ParsingExpression {
        ParsingExpression::terminal(self.to_string())
    }
}

impl<T: IntoExpression, const N: usize> IntoExpression for [T; N] {
    fn into_expression(self) -> ParsingExpression {
        sequence(self)
    }
}

impl<T: IntoExpression> IntoExpression for Vec<T> {
    fn into_expression(self) -> ParsingExpression {
        sequence(self)
    }
}

/// Convert any [`IntoExpression`] value into an expression.
pub fn exp(value: impl IntoExpression) -> ParsingExpression {
    value.into_expression()
}

/// A terminal matching `prefix` exactly.
pub fn terminal(prefix: impl Into<CompactString>) -> ParsingExpression {
    ParsingExpression::terminal(prefix)
}

/// A reference to the rule named `name`, resolved at evaluation time.
pub fn nonterminal(name: impl Into<CompactString>) -> ParsingExpression {
    ParsingExpression::nonterminal(name)
}

/// The any-character expression.
#[must_use]
pub fn anything() -> ParsingExpression {
    ParsingExpression::anything()
}

/// A character class compiled from a specification string like `"A-Z"`.
pub fn character_class(spec: &str) -> Result<ParsingExpression, GrammarError> {
    Ok(ParsingExpression::class(CharacterClass::parse(spec)?))
}

/// An unlabeled sequence element.
pub fn elem(value: impl IntoExpression) -> SequenceElement {
    SequenceElement::new(value.into_expression())
}

/// A labeled sequence element; the label names the child in the composite
/// node the enclosing sequence produces.
pub fn labeled(label: impl Into<CompactString>, value: impl IntoExpression) -> SequenceElement {
    SequenceElement::labeled(label, value.into_expression())
}

/// A sequence of the given parts, each converted via [`IntoExpression`].
pub fn sequence<T: IntoExpression>(
    elements: impl IntoIterator<Item = T>,
) -> ParsingExpression {
    ParsingExpression::sequence(
        elements
            .into_iter()
            .map(|element| SequenceElement::new(element.into_expression()))
            .collect(),
    )
}

/// An ordered choice among the given alternatives.
pub fn ordered_choice<T: IntoExpression>(
    alternatives: impl IntoIterator<Item = T>,
) -> ParsingExpression {
    ParsingExpression::choice(
        alternatives
            .into_iter()
            .map(IntoExpression::into_expression)
            .collect(),
    )
}

pub fn zero_or_more(inner: impl IntoExpression) -> ParsingExpression {
    ParsingExpression::zero_or_more(inner.into_expression())
}

pub fn one_or_more(inner: impl IntoExpression) -> ParsingExpression {
    ParsingExpression::one_or_more(inner.into_expression())
}

pub fn optional(inner: impl IntoExpression) -> ParsingExpression {
    ParsingExpression::optional(inner.into_expression())
}

pub fn and_predicate(inner: impl IntoExpression) -> ParsingExpression {
    ParsingExpression::and_predicate(inner.into_expression())
}

pub fn not_predicate(inner: impl IntoExpression) -> ParsingExpression {
    ParsingExpression::not_predicate(inner.into_expression())
}

/// Zero or more of `element` separated by `delimiter`:
/// `Optional(Sequence(E, ZeroOrMore(Sequence(D, E))))` built as a single
/// two-element child list.
pub fn zero_or_more_delimited(
    element: impl IntoExpression,
    delimiter: impl IntoExpression,
) -> ParsingExpression {
    let element = element.into_expression();
    let delimiter = delimiter.into_expression();
    let tail = ParsingExpression::zero_or_more(ParsingExpression::Sequence(vec![
        SequenceElement::new(delimiter),
        SequenceElement::new(element.clone()),
    ]));
    ParsingExpression::optional(ParsingExpression::Sequence(vec![
        SequenceElement::new(element),
        SequenceElement::new(tail),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_converts_strings_to_terminals() {
        assert_eq!(exp("foo"), ParsingExpression::terminal("foo"));
        assert_eq!(exp(String::from("bar")), ParsingExpression::terminal("bar"));
        assert_eq!(exp('x'), ParsingExpression::terminal("x"));
    }

    #[test]
    fn test_exp_passes_expressions_through() {
        let original = ParsingExpression::nonterminal("digit");
        assert_eq!(exp(original.clone()), original);
        assert_eq!(exp(&original), original);
    }

    #[test]
    fn test_exp_converts_arrays_element_wise() {
        let expr = exp(["a", "b"]);
        assert_eq!(
            expr,
            ParsingExpression::Sequence(vec![
                SequenceElement::new(ParsingExpression::terminal("a")),
                SequenceElement::new(ParsingExpression::terminal("b")),
            ])
        );
    }

    #[test]
    fn test_sequence_mixes_literals_and_expressions() {
        let expr = sequence([exp("hello"), optional(" world")]);
        assert_eq!(
            expr,
            ParsingExpression::Sequence(vec![
                SequenceElement::new(ParsingExpression::terminal("hello")),
                SequenceElement::new(ParsingExpression::optional(ParsingExpression::terminal(
                    " world"
                ))),
            ])
        );
    }

    #[test]
    fn test_ordered_choice_converts_alternatives() {
        let expr = ordered_choice(["a", "b"]);
        assert_eq!(
            expr,
            ParsingExpression::Choice(vec![
                ParsingExpression::terminal("a"),
                ParsingExpression::terminal("b"),
            ])
        );
    }

    #[test]
    fn test_character_class_helper() {
        let expr = character_class("A-Z").unwrap();
        match expr {
            ParsingExpression::Class(class) => {
                assert!(class.matches('Q'));
                assert!(!class.matches('q'));
            }
            other => panic!("expected a class, got {other}"),
        }
    }

    #[test]
    fn test_predicates_wrap_converted_values() {
        assert_eq!(
            not_predicate("foo"),
            ParsingExpression::not_predicate(ParsingExpression::terminal("foo"))
        );
        assert_eq!(
            and_predicate(nonterminal("word")),
            ParsingExpression::and_predicate(ParsingExpression::nonterminal("word"))
        );
    }

    #[test]
    fn test_zero_or_more_delimited_shape() {
        let expr = zero_or_more_delimited("a", " ");
        let expected = ParsingExpression::optional(ParsingExpression::Sequence(vec![
            SequenceElement::new(ParsingExpression::terminal("a")),
            SequenceElement::new(ParsingExpression::zero_or_more(
                ParsingExpression::Sequence(vec![
                    SequenceElement::new(ParsingExpression::terminal(" ")),
                    SequenceElement::new(ParsingExpression::terminal("a")),
                ]),
            )),
        ]));
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_labeled_elements() {
        let element = labeled("name", "foo");
        assert_eq!(element.label.as_deref(), Some("name"));
        assert_eq!(element.expr, ParsingExpression::terminal("foo"));

        let unlabeled = elem(nonterminal("rest"));
        assert!(unlabeled.label.is_none());
    }
}

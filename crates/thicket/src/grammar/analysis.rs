//! Static grammar analysis: nullability and left-recursion detection.
//!
//! A packrat evaluator loops forever (or trips the reentrancy guard at
//! runtime) on left-recursive rules, so [`GrammarBuilder`] rejects them
//! up front. A rule is left-recursive when it can reach itself through
//! leftmost positions only, where "leftmost" steps through sequence
//! elements as long as every element before the current one is nullable
//! (can succeed without consuming input).
//!
//! [`GrammarBuilder`]: crate::grammar::GrammarBuilder

use crate::expr::{ParsingExpression, SequenceElement};
use crate::grammar::Grammar;
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};

type NameSet<'g> = HashSet<&'g str, ahash::RandomState>;

/// The names of all rules that can succeed without consuming input.
///
/// Computed by fixpoint iteration: nonterminal references to undefined
/// or not-yet-proven rules count as non-nullable until proven otherwise.
#[must_use]
pub fn nullable_rules(grammar: &Grammar) -> HashSet<CompactString, ahash::RandomState> {
    let rules: Vec<_> = grammar.iter_entries().collect();
    let mut nullable: NameSet<'_> = HashSet::with_hasher(ahash::RandomState::new());

    let mut changed = true;
    while changed {
        changed = false;
        for &(name, expression) in &rules {
            if !nullable.contains(name) && expression_nullable(expression, &nullable) {
                nullable.insert(name);
                changed = true;
            }
        }
    }

    nullable.into_iter().map(CompactString::from).collect()
}

/// Whether `expression` can succeed without consuming input, given the
/// current nullability estimate for nonterminals.
fn expression_nullable(expression: &ParsingExpression, nullable: &NameSet<'_>) -> bool {
    match expression {
        ParsingExpression::Terminal(text) => text.is_empty(),
        ParsingExpression::Anything | ParsingExpression::Class(_) => false,
        ParsingExpression::Nonterminal(name) => nullable.contains(name.as_str()),
        ParsingExpression::Sequence(elements) => elements
            .iter()
            .all(|element| expression_nullable(&element.expr, nullable)),
        ParsingExpression::Choice(alternatives) => alternatives
            .iter()
            .any(|alternative| expression_nullable(alternative, nullable)),
        ParsingExpression::OneOrMore(inner) => expression_nullable(inner, nullable),
        ParsingExpression::ZeroOrMore(_)
        | ParsingExpression::Optional(_)
        | ParsingExpression::AndPredicate(_)
        | ParsingExpression::NotPredicate(_) => true,
    }
}

/// All leftmost-recursion cycles in `grammar`, as rule-name chains.
///
/// A returned chain `["a", "b"]` means `a` references `b` at a leftmost
/// position and `b` references `a` back. Each offending rule appears in
/// at most one reported cycle. Rules are scanned in name order, so the
/// result is deterministic.
#[must_use]
pub fn left_recursion_cycles(grammar: &Grammar) -> Vec<Vec<String>> {
    let nullable_names = nullable_rules(grammar);
    let nullable: NameSet<'_> = nullable_names.iter().map(CompactString::as_str).collect();

    let mut edges: HashMap<&str, Vec<&str>, ahash::RandomState> =
        HashMap::with_hasher(ahash::RandomState::new());
    for (name, expression) in grammar.iter_entries() {
        let mut refs = Vec::new();
        let mut seen: NameSet<'_> = HashSet::with_hasher(ahash::RandomState::new());
        collect_leftmost_refs(expression, &nullable, &mut refs, &mut seen);
        refs.sort_unstable();
        edges.insert(name, refs);
    }

    let mut starts: Vec<&str> = edges.keys().copied().collect();
    starts.sort_unstable();

    let mut cycles = Vec::new();
    let mut covered: NameSet<'_> = HashSet::with_hasher(ahash::RandomState::new());
    for start in starts {
        if covered.contains(start) {
            continue;
        }
        let mut path = vec![start];
        let mut visited: NameSet<'_> = HashSet::with_hasher(ahash::RandomState::new());
        visited.insert(start);
        if search(start, start, &edges, &mut path, &mut visited) {
            covered.extend(path.iter().copied());
            cycles.push(path.into_iter().map(String::from).collect());
        }
    }
    cycles
}

/// Nonterminals referenced by `expression` at a leftmost position.
///
/// Sequence scanning stops after the first non-nullable element: that
/// element still contributes (it can itself start with a reference),
/// later ones cannot be reached without consumption. Predicates evaluate
/// their inner expression at the current position, so they contribute.
fn collect_leftmost_refs<'g>(
    expression: &'g ParsingExpression,
    nullable: &NameSet<'_>,
    refs: &mut Vec<&'g str>,
    seen: &mut NameSet<'g>,
) {
    match expression {
        ParsingExpression::Terminal(_)
        | ParsingExpression::Anything
        | ParsingExpression::Class(_) => {}
        ParsingExpression::Nonterminal(name) => {
            if seen.insert(name.as_str()) {
                refs.push(name.as_str());
            }
        }
        ParsingExpression::Sequence(elements) => {
            for SequenceElement { expr, .. } in elements {
                collect_leftmost_refs(expr, nullable, refs, seen);
                if !expression_nullable(expr, nullable) {
                    break;
                }
            }
        }
        ParsingExpression::Choice(alternatives) => {
            for alternative in alternatives {
                collect_leftmost_refs(alternative, nullable, refs, seen);
            }
        }
        ParsingExpression::ZeroOrMore(inner)
        | ParsingExpression::OneOrMore(inner)
        | ParsingExpression::Optional(inner)
        | ParsingExpression::AndPredicate(inner)
        | ParsingExpression::NotPredicate(inner) => {
            collect_leftmost_refs(inner, nullable, refs, seen);
        }
    }
}

fn search<'g>(
    current: &'g str,
    start: &'g str,
    edges: &HashMap<&'g str, Vec<&'g str>, ahash::RandomState>,
    path: &mut Vec<&'g str>,
    visited: &mut NameSet<'g>,
) -> bool {
    let Some(successors) = edges.get(current) else {
        return false;
    };
    for &next in successors {
        if next == start {
            return true;
        }
        if visited.insert(next) {
            path.push(next);
            if search(next, start, edges, path, visited) {
                return true;
            }
            path.pop();
        }
    }
    false
}

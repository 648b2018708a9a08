//! Compiling parsed grammar definitions into [`Grammar`] values.
//!
//! The compiler walks the node tree of a parsed grammar definition and
//! rebuilds each rule through the expression constructors, so a textual
//! definition and its hand-built equivalent produce identical
//! expression trees (including singleton collapsing). `{ ... }` blocks
//! are hoisted to the enclosing rule and merged in textual order,
//! wherever they appear in the rule body.

use crate::error::ParseError;
use crate::expr::build::{
    and_predicate, anything, character_class, nonterminal, not_predicate, one_or_more, optional,
    ordered_choice, sequence, terminal, zero_or_more,
};
use crate::expr::ParsingExpression;
use crate::grammar::{Grammar, GrammarBuilder, GrammarError};
use crate::node::{Node, SourceBehavior};
use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors from compiling a textual grammar definition.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum CompileError {
    /// The text is not a well-formed grammar definition.
    #[error("malformed grammar definition: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(compile::malformed)))]
    Malformed(#[from] ParseError),

    /// The compiled grammar failed whole-grammar validation, or a
    /// character class was invalid.
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Grammar(#[from] GrammarError),

    /// The definition's node tree had an impossible shape. Indicates a
    /// defect in the grammar language itself rather than in the input.
    #[error("unexpected node shape at offset {position}: {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(compile::unexpected_shape)))]
    UnexpectedShape { position: usize, message: String },
}

/// Compile `source` with the standard metagrammar.
///
/// Convenience for [`metagrammar`](super::metagrammar) +
/// [`compile_grammar_with`]; the bootstrap runs on every call, so hold
/// on to the result when compiling repeatedly.
pub fn compile_grammar(source: &str) -> Result<Grammar, CompileError> {
    let meta = super::metagrammar()?;
    compile_grammar_with(&meta, source)
}

/// Parse `source` with `meta` (a grammar for the grammar language) and
/// compile the resulting tree into a new [`Grammar`].
///
/// The first defined rule becomes the root. The result passes the full
/// [`GrammarBuilder`] validation: undefined references and left
/// recursion are rejected.
pub fn compile_grammar_with(meta: &Grammar, source: &str) -> Result<Grammar, CompileError> {
    let root = meta.new_parser().parse(source)?;

    let mut definitions = Vec::new();
    collect_rule_definitions(&root, &mut definitions);

    let mut builder = GrammarBuilder::new();
    for definition in definitions {
        let rule = compile_rule(definition, source)?;
        builder = match rule.behavior {
            Some(behavior) => builder.rule_with(rule.name, rule.expression, behavior),
            None => builder.rule(rule.name, rule.expression),
        };
    }
    Ok(builder.build()?)
}

struct CompiledRule {
    name: CompactString,
    expression: ParsingExpression,
    behavior: Option<SourceBehavior>,
}

/// Rule definitions cannot nest, so recursion stops at the first match.
fn collect_rule_definitions<'n>(node: &'n Node, out: &mut Vec<&'n Node>) {
    if node.rule() == Some("rule_definition") {
        out.push(node);
        return;
    }
    for nested in node.children() {
        collect_rule_definitions(nested, out);
    }
}

/// Children of a `rule_definition` node, by element position:
/// `rule` spacing name spacing expression block? spacing `end`.
fn compile_rule(node: &Node, source: &str) -> Result<CompiledRule, CompileError> {
    let name = CompactString::from(child(node, 2, "rule name")?.text(source));

    let mut behaviors = Vec::new();
    let expression = compile_expression(child(node, 4, "rule body")?, source, &mut behaviors)?;

    let rule_block = child(node, 5, "rule block")?;
    if !rule_block.is_empty() {
        behaviors.push(block_behavior(child(rule_block, 1, "node block")?, source)?);
    }
    let behavior = behaviors
        .into_iter()
        .reduce(|merged, next| merged.merge(&next));

    Ok(CompiledRule {
        name,
        expression,
        behavior,
    })
}

fn compile_expression(
    node: &Node,
    source: &str,
    behaviors: &mut Vec<SourceBehavior>,
) -> Result<ParsingExpression, CompileError> {
    match node.rule() {
        Some("ordered_choice") => {
            let first = compile_expression(child(node, 0, "first alternative")?, source, behaviors)?;
            let mut alternatives = vec![first];
            for tail in child(node, 1, "alternative list")?.children() {
                alternatives.push(compile_expression(
                    child(tail, 3, "alternative")?,
                    source,
                    behaviors,
                )?);
            }
            Ok(ordered_choice(alternatives))
        }

        Some("sequence_expression") => {
            let first = compile_expression(child(node, 0, "first element")?, source, behaviors)?;
            let mut elements = vec![first];
            for tail in child(node, 1, "element list")?.children() {
                elements.push(compile_expression(
                    child(tail, 1, "element")?,
                    source,
                    behaviors,
                )?);
            }
            Ok(sequence(elements))
        }

        Some("prefixed") => {
            let inner = compile_expression(child(node, 1, "predicated expression")?, source, behaviors)?;
            let marker = child(node, 0, "predicate marker")?;
            if marker.is_empty() {
                return Ok(inner);
            }
            match marker.text(source) {
                "&" => Ok(and_predicate(inner)),
                "!" => Ok(not_predicate(inner)),
                other => Err(shape(marker, format!("unknown predicate `{other}`"))),
            }
        }

        Some("suffixed") => {
            let inner = compile_expression(child(node, 0, "repeated expression")?, source, behaviors)?;
            let marker = child(node, 1, "repetition suffix")?;
            if marker.is_empty() {
                return Ok(inner);
            }
            match marker.text(source) {
                "*" => Ok(zero_or_more(inner)),
                "+" => Ok(one_or_more(inner)),
                "?" => Ok(optional(inner)),
                other => Err(shape(marker, format!("unknown suffix `{other}`"))),
            }
        }

        Some("terminal_symbol") => {
            let quoted = child(node, 0, "quoted string")?;
            let literal = child(quoted, 1, "string body")?.text(source);
            let attachment = child(node, 1, "terminal block")?;
            if !attachment.is_empty() {
                behaviors.push(block_behavior(child(attachment, 1, "node block")?, source)?);
            }
            Ok(terminal(literal))
        }

        Some("character_class") => {
            // interior between the bracket bytes, negation marker included
            let interval = node.interval();
            let spec = source
                .get(interval.start() + 1..interval.end() - 1)
                .ok_or_else(|| shape(node, "class interval out of bounds"))?;
            Ok(character_class(spec)?)
        }

        Some("anything_symbol") => Ok(anything()),

        Some("parenthesized") => {
            compile_expression(child(node, 2, "grouped expression")?, source, behaviors)
        }

        Some("nonterminal_symbol") => Ok(nonterminal(node.text(source))),

        Some(other) => Err(shape(node, format!("rule `{other}` is not an expression"))),
        None => Err(shape(node, "untagged node")),
    }
}

fn block_behavior(block: &Node, source: &str) -> Result<SourceBehavior, CompileError> {
    let body = child(block, 1, "block body")?;
    Ok(SourceBehavior::from_block(body.text(source)))
}

fn child<'n>(node: &'n Node, index: usize, expected: &str) -> Result<&'n Node, CompileError> {
    node.child(index)
        .ok_or_else(|| shape(node, format!("missing {expected}")))
}

fn shape(node: &Node, message: impl Into<String>) -> CompileError {
    CompileError::UnexpectedShape {
        position: node.interval().start(),
        message: message.into(),
    }
}

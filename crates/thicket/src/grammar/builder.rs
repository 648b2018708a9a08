//! Fluent, validating construction of [`Grammar`] values.
//!
//! [`GrammarBuilder`] collects rules in declaration order and checks the
//! finished grammar as a whole: a root must exist, every referenced
//! nonterminal must be defined, and leftmost recursion is rejected
//! unless explicitly allowed. [`Grammar::define`] remains available for
//! incremental, unchecked mutation after `build`.

use crate::expr::ParsingExpression;
use crate::grammar::{analysis, Grammar, GrammarError};
use crate::node::NodeBehavior;
use compact_str::CompactString;
use std::sync::Arc;

/// Builder for [`Grammar`] with whole-grammar validation.
///
/// # Examples
///
/// ```
/// use thicket::build::{optional, sequence, terminal};
/// use thicket::GrammarBuilder;
///
/// let grammar = GrammarBuilder::new()
///     .rule("greeting", sequence([
///         terminal("hello"),
///         optional(terminal(" world")),
///     ]))
///     .build()?;
///
/// assert_eq!(grammar.root(), Some("greeting"));
/// # Ok::<(), thicket::GrammarError>(())
/// ```
#[derive(Default)]
pub struct GrammarBuilder {
    rules: Vec<RuleDecl>,
    root: Option<CompactString>,
    allow_undefined_rules: bool,
    allow_left_recursion: bool,
}

struct RuleDecl {
    name: CompactString,
    expression: ParsingExpression,
    behavior: Option<Arc<dyn NodeBehavior>>,
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the rule named `name`. The first declared rule is the root
    /// unless [`root`](Self::root) picks another.
    #[must_use]
    pub fn rule(mut self, name: impl Into<CompactString>, expression: ParsingExpression) -> Self {
        self.rules.push(RuleDecl {
            name: name.into(),
            expression,
            behavior: None,
        });
        self
    }

    /// Declare a rule with a [`NodeBehavior`] attached to its nodes.
    #[must_use]
    pub fn rule_with(
        mut self,
        name: impl Into<CompactString>,
        expression: ParsingExpression,
        behavior: impl NodeBehavior + 'static,
    ) -> Self {
        self.rules.push(RuleDecl {
            name: name.into(),
            expression,
            behavior: Some(Arc::new(behavior)),
        });
        self
    }

    /// Designate the root rule.
    #[must_use]
    pub fn root(mut self, name: impl Into<CompactString>) -> Self {
        self.root = Some(name.into());
        self
    }

    /// Skip the undefined-reference check. Useful for grammars assembled
    /// in several passes, where later definitions fill the gaps.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // const fn with Drop types is unstable
    pub fn allow_undefined_rules(mut self) -> Self {
        self.allow_undefined_rules = true;
        self
    }

    /// Skip the left-recursion check. The runtime reentrancy guard still
    /// reports [`ParseError::LeftRecursion`] if a cycle is actually hit.
    ///
    /// [`ParseError::LeftRecursion`]: crate::error::ParseError::LeftRecursion
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // const fn with Drop types is unstable
    pub fn allow_left_recursion(mut self) -> Self {
        self.allow_left_recursion = true;
        self
    }

    /// Validate the declarations and produce the grammar.
    ///
    /// # Errors
    ///
    /// - [`GrammarError::MissingRoot`] when no rule was declared.
    /// - [`GrammarError::UndefinedRule`] when the root or a referenced
    ///   nonterminal has no definition.
    /// - [`GrammarError::LeftRecursion`] when a rule can reach itself
    ///   without consuming input.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => match self.rules.first() {
                Some(decl) => decl.name.clone(),
                None => return Err(GrammarError::MissingRoot),
            },
        };

        let allow_undefined_rules = self.allow_undefined_rules;
        let allow_left_recursion = self.allow_left_recursion;

        let mut grammar = Grammar::new();
        for decl in self.rules {
            match decl.behavior {
                Some(behavior) => grammar.define_with(&decl.name, decl.expression, behavior),
                None => grammar.define(&decl.name, decl.expression),
            }
        }
        grammar.set_root(&root);

        if !grammar.contains(&root) {
            return Err(GrammarError::UndefinedRule { name: root.into() });
        }

        if !allow_undefined_rules {
            let mut undefined: Vec<String> = Vec::new();
            for (_, expression) in grammar.iter_entries() {
                expression.for_each_nonterminal(&mut |name| {
                    if !grammar.contains(name) && !undefined.iter().any(|known| known == name) {
                        undefined.push(name.to_owned());
                    }
                });
            }
            if let Some(name) = undefined.into_iter().min() {
                return Err(GrammarError::UndefinedRule { name });
            }
        }

        if !allow_left_recursion {
            let cycles = analysis::left_recursion_cycles(&grammar);
            if !cycles.is_empty() {
                return Err(GrammarError::LeftRecursion { cycles });
            }
        }

        Ok(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::build::{nonterminal, ordered_choice, sequence, terminal};
    use crate::node::SourceBehavior;

    #[test]
    fn test_build_simple_grammar() {
        let grammar = GrammarBuilder::new()
            .rule("word", nonterminal("letter"))
            .rule("letter", terminal("a"))
            .build()
            .unwrap();

        assert_eq!(grammar.root(), Some("word"));
        assert_eq!(grammar.len(), 2);
    }

    #[test]
    fn test_explicit_root() {
        let grammar = GrammarBuilder::new()
            .rule("helper", terminal("x"))
            .rule("main", nonterminal("helper"))
            .root("main")
            .build()
            .unwrap();

        assert_eq!(grammar.root(), Some("main"));
    }

    #[test]
    fn test_empty_builder_has_no_root() {
        let err = GrammarBuilder::new().build().unwrap_err();
        assert!(matches!(err, GrammarError::MissingRoot));
    }

    #[test]
    fn test_undefined_root_rejected() {
        let err = GrammarBuilder::new()
            .rule("a", terminal("a"))
            .root("ghost")
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::UndefinedRule { name } if name == "ghost"));
    }

    #[test]
    fn test_undefined_reference_rejected() {
        let err = GrammarBuilder::new()
            .rule("a", sequence([nonterminal("b"), nonterminal("zed")]))
            .rule("b", terminal("b"))
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::UndefinedRule { name } if name == "zed"));
    }

    #[test]
    fn test_allow_undefined_rules() {
        let grammar = GrammarBuilder::new()
            .rule("a", nonterminal("later"))
            .allow_undefined_rules()
            .build()
            .unwrap();

        assert!(grammar.resolve("later").is_err());
    }

    #[test]
    fn test_left_recursion_rejected() {
        let err = GrammarBuilder::new()
            .rule(
                "expr",
                ordered_choice([
                    sequence([nonterminal("expr"), terminal("+")]),
                    terminal("n"),
                ]),
            )
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            GrammarError::LeftRecursion { cycles } if cycles == vec![vec!["expr".to_owned()]]
        ));
    }

    #[test]
    fn test_allow_left_recursion() {
        let grammar = GrammarBuilder::new()
            .rule(
                "expr",
                ordered_choice([
                    sequence([nonterminal("expr"), terminal("+")]),
                    terminal("n"),
                ]),
            )
            .allow_left_recursion()
            .build()
            .unwrap();

        assert!(grammar.contains("expr"));
    }

    #[test]
    fn test_rule_with_registers_behavior() {
        let grammar = GrammarBuilder::new()
            .rule_with(
                "word",
                terminal("hi"),
                SourceBehavior::from_block("def shout\nend"),
            )
            .build()
            .unwrap();

        let behavior = grammar.behavior("word").unwrap();
        assert_eq!(behavior.method_names(), vec!["shout"]);
    }

    #[test]
    fn test_later_declaration_wins() {
        let grammar = GrammarBuilder::new()
            .rule("a", terminal("old"))
            .rule("a", terminal("new"))
            .build()
            .unwrap();

        assert_eq!(*grammar.resolve("a").unwrap(), terminal("new"));
    }
}

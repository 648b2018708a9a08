//! # Grammars
//!
//! A [`Grammar`] owns a set of named rules (nonterminal name to parsing
//! expression), a designated root rule, and the per-rule
//! [`NodeBehavior`](crate::node::NodeBehavior) registry. Rule names are
//! unique; redefining a name replaces the rule. Grammars are immutable
//! while parsing and may be shared read-only across threads; every
//! [`Parser`](crate::parser::Parser) created from a grammar owns its own
//! cache.
//!
//! [`Grammar::define`] is deliberately unchecked so rules can reference
//! rules defined later; [`GrammarBuilder`] is the validating front door
//! (undefined references, missing root, left recursion).

pub mod analysis;
pub mod builder;

pub use builder::GrammarBuilder;

use crate::expr::ParsingExpression;
use crate::node::NodeBehavior;
use crate::parser::Parser;
use hashbrown::HashMap;
use lasso::{Spur, ThreadedRodeo};
use std::sync::Arc;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Structural grammar-authoring defects.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("rule `{name}` is not defined")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::undefined_rule)))]
    UndefinedRule { name: String },

    #[error("no root rule designated")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::missing_root)))]
    MissingRoot,

    #[error("invalid character class `[{spec}]`: {reason}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(grammar::invalid_character_class))
    )]
    InvalidCharacterClass { spec: String, reason: String },

    #[error("left recursion detected: {cycles:?}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::left_recursion)))]
    LeftRecursion { cycles: Vec<Vec<String>> },
}

#[derive(Debug)]
pub(crate) struct RuleEntry {
    pub(crate) expression: ParsingExpression,
    pub(crate) behavior: Option<Arc<dyn NodeBehavior>>,
}

/// A named collection of rules that produces [`Parser`] instances.
#[derive(Debug)]
pub struct Grammar {
    rules: HashMap<Spur, RuleEntry, ahash::RandomState>,
    root: Option<Spur>,
    /// Interner for rule names; the memo cache keys on the interned symbols.
    interner: ThreadedRodeo,
}

impl Grammar {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: HashMap::with_hasher(ahash::RandomState::new()),
            root: None,
            interner: ThreadedRodeo::new(),
        }
    }

    /// Insert or replace the rule named `name`.
    ///
    /// The first defined rule becomes the root unless
    /// [`set_root`](Self::set_root) chose one. Redefinition replaces the
    /// whole rule, including any registered behavior.
    pub fn define(&mut self, name: &str, expression: ParsingExpression) {
        self.define_entry(name, expression, None);
    }

    /// Like [`define`](Self::define), additionally registering `behavior`
    /// for the rule's nodes.
    pub fn define_with(
        &mut self,
        name: &str,
        expression: ParsingExpression,
        behavior: Arc<dyn NodeBehavior>,
    ) {
        self.define_entry(name, expression, Some(behavior));
    }

    fn define_entry(
        &mut self,
        name: &str,
        expression: ParsingExpression,
        behavior: Option<Arc<dyn NodeBehavior>>,
    ) {
        let key = self.interner.get_or_intern(name);
        self.rules.insert(
            key,
            RuleEntry {
                expression,
                behavior,
            },
        );
        if self.root.is_none() {
            self.root = Some(key);
        }
    }

    /// Look up the expression of the rule named `name`.
    pub fn resolve(&self, name: &str) -> Result<&ParsingExpression, GrammarError> {
        self.interner
            .get(name)
            .and_then(|key| self.rules.get(&key))
            .map(|entry| &entry.expression)
            .ok_or_else(|| GrammarError::UndefinedRule {
                name: name.to_owned(),
            })
    }

    /// The behavior registered for the rule named `name`, if any.
    #[must_use]
    pub fn behavior(&self, name: &str) -> Option<&Arc<dyn NodeBehavior>> {
        self.interner
            .get(name)
            .and_then(|key| self.rules.get(&key))
            .and_then(|entry| entry.behavior.as_ref())
    }

    /// Designate the root rule evaluated by [`Parser::parse`].
    pub fn set_root(&mut self, name: &str) {
        self.root = Some(self.interner.get_or_intern(name));
    }

    /// The designated root rule's name.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.map(|key| self.interner.resolve(&key))
    }

    /// A fresh parser bound to this grammar, rooted at the designated root,
    /// with an empty cache.
    #[must_use]
    pub fn new_parser(&self) -> Parser<'_> {
        Parser::new(self, self.root)
    }

    /// A fresh parser rooted at the rule named `root` instead of the
    /// designated root. Useful for parsing fragments of a larger grammar.
    #[must_use]
    pub fn new_parser_at(&self, root: &str) -> Parser<'_> {
        Parser::new(self, Some(self.interner.get_or_intern(root)))
    }

    /// The defined rule names, in no particular order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|key| self.interner.resolve(key))
    }

    /// Whether a rule named `name` is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.interner
            .get(name)
            .is_some_and(|key| self.rules.contains_key(&key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn rule_key(&self, name: &str) -> Option<Spur> {
        self.interner.get(name)
    }

    pub(crate) fn entry(&self, key: Spur) -> Option<&RuleEntry> {
        self.rules.get(&key)
    }

    pub(crate) fn name_of(&self, key: Spur) -> &str {
        self.interner.resolve(&key)
    }

    pub(crate) fn iter_entries(&self) -> impl Iterator<Item = (&str, &ParsingExpression)> {
        self.rules
            .iter()
            .map(|(key, entry)| (self.interner.resolve(key), &entry.expression))
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::build::{nonterminal, terminal};
    use crate::node::SourceBehavior;

    #[test]
    fn test_define_and_resolve() {
        let mut grammar = Grammar::new();
        grammar.define("greeting", terminal("hello"));

        let expr = grammar.resolve("greeting").unwrap();
        assert_eq!(*expr, terminal("hello"));
        assert!(grammar.contains("greeting"));
        assert_eq!(grammar.len(), 1);
    }

    #[test]
    fn test_resolve_undefined_rule() {
        let grammar = Grammar::new();
        let err = grammar.resolve("missing").unwrap_err();
        assert!(matches!(err, GrammarError::UndefinedRule { name } if name == "missing"));
    }

    #[test]
    fn test_redefinition_replaces() {
        let mut grammar = Grammar::new();
        grammar.define("rule", terminal("old"));
        grammar.define("rule", terminal("new"));

        assert_eq!(grammar.len(), 1);
        assert_eq!(*grammar.resolve("rule").unwrap(), terminal("new"));
    }

    #[test]
    fn test_redefinition_drops_behavior() {
        let mut grammar = Grammar::new();
        grammar.define_with(
            "rule",
            terminal("old"),
            Arc::new(SourceBehavior::from_block("def m\nend")),
        );
        assert!(grammar.behavior("rule").is_some());

        grammar.define("rule", terminal("new"));
        assert!(grammar.behavior("rule").is_none());
    }

    #[test]
    fn test_first_rule_becomes_root() {
        let mut grammar = Grammar::new();
        grammar.define("first", terminal("a"));
        grammar.define("second", terminal("b"));
        assert_eq!(grammar.root(), Some("first"));

        grammar.set_root("second");
        assert_eq!(grammar.root(), Some("second"));
    }

    #[test]
    fn test_rule_names() {
        let mut grammar = Grammar::new();
        grammar.define("a", terminal("a"));
        grammar.define("b", nonterminal("a"));

        let mut names: Vec<_> = grammar.rule_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_grammar() {
        let grammar = Grammar::new();
        assert!(grammar.is_empty());
        assert_eq!(grammar.root(), None);
    }
}

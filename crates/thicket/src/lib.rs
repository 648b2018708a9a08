//! # Thicket
//!
//! A parsing expression grammar (PEG) engine with packrat memoization.
//!
//! ## Overview
//!
//! Thicket evaluates parsing expression grammars directly over string
//! input, without a separate lexing stage. It supports:
//!
//! - **The full PEG algebra**: terminals, character classes, sequences,
//!   ordered choice, repetition, optionals, and zero-width predicates
//! - **Packrat memoization**: a write-once `(rule, position)` cache that
//!   keeps parsing linear on backtracking-heavy grammars
//! - **Failure diagnostics**: deepest-failure tracking that reports what
//!   was expected at the furthest position reached
//! - **Grammar definition**: a validating builder API plus a textual
//!   grammar language that is bootstrapped in itself
//!
//! ## Quick Start
//!
//! ```
//! use thicket::build::{optional, sequence, terminal};
//! use thicket::GrammarBuilder;
//!
//! // 1. Define rules through the expression constructors; the first
//! //    rule is the root
//! let grammar = GrammarBuilder::new()
//!     .rule(
//!         "greeting",
//!         sequence([terminal("hello"), optional(terminal(" world"))]),
//!     )
//!     .build()?;
//!
//! // 2. Parse; the root rule must consume the whole input
//! let node = grammar.new_parser().parse("hello world")?;
//! assert_eq!(node.rule(), Some("greeting"));
//! assert_eq!(node.interval().range(), 0..11);
//!
//! // 3. The same grammar, compiled from its textual form
//! let grammar = thicket::compile_grammar(
//!     "rule greeting
//!        'hello' (' world')?
//!      end",
//! )?;
//! let node = grammar.new_parser().parse("hello")?;
//! assert_eq!(node.interval().range(), 0..5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`expr`] - Parsing expressions and the [`build`] constructors
//! - [`grammar`] - Grammar definition, validation, and analysis
//! - [`parser`] - Packrat evaluation over string input
//! - [`node`] - Parse tree nodes and rule behaviors
//! - [`meta`] - The textual grammar language and its bootstrap
//! - [`error`] - Error types and diagnostics
//! - [`testing`] - Input generators and snapshot helpers

pub mod error;
pub mod expr;
pub mod grammar;
pub mod interval;
pub mod meta;
pub mod node;
pub mod parser;
pub mod result;
pub mod testing;

// Re-export commonly used types
pub use error::{ParseError, ParseMetrics};
pub use expr::{build, CharacterClass, ParsingExpression, SequenceElement};
pub use grammar::{Grammar, GrammarBuilder, GrammarError};
pub use interval::Interval;
pub use meta::{
    compile_grammar, compile_grammar_with, metagrammar, proto_metagrammar, CompileError,
    METAGRAMMAR_SOURCE,
};
pub use node::{Node, NodeBehavior, SourceBehavior};
pub use parser::{NullObserver, ParseEvent, ParseObserver, Parser, ParserConfig};
pub use result::ParseResult;

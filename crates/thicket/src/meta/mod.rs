//! The grammar definition language.
//!
//! Grammars can be written as text instead of through the expression
//! constructors. The language is defined by `metagrammar.peg`, which is
//! itself written in the language; [`proto_metagrammar`] is the same
//! grammar built by hand through the constructors, and bootstraps the
//! textual one. Compiling `metagrammar.peg` with either grammar yields
//! the other back, so the two definitions pin each other down.
//!
//! ```
//! use thicket::compile_grammar;
//!
//! let grammar = compile_grammar(
//!     "rule number
//!        digit+
//!      end
//!
//!      rule digit
//!        [0-9]
//!      end",
//! )?;
//! let node = grammar.new_parser().parse("042")?;
//! assert_eq!(node.interval().range(), 0..3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod compile;
mod proto;

pub use compile::{compile_grammar, compile_grammar_with, CompileError};
pub use proto::proto_metagrammar;

use crate::grammar::Grammar;

/// The grammar language, defined in itself.
pub const METAGRAMMAR_SOURCE: &str = include_str!("metagrammar.peg");

/// The standard metagrammar: [`METAGRAMMAR_SOURCE`] compiled with the
/// hand-built [`proto_metagrammar`].
pub fn metagrammar() -> Result<Grammar, CompileError> {
    let proto = proto_metagrammar()?;
    compile_grammar_with(&proto, METAGRAMMAR_SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metagrammar_compiles() {
        let meta = metagrammar().unwrap();
        assert_eq!(meta.root(), Some("grammar"));
        assert_eq!(meta.len(), 31);
    }

    #[test]
    fn test_metagrammar_parses_its_own_source() {
        let meta = metagrammar().unwrap();
        let node = meta.new_parser().parse(METAGRAMMAR_SOURCE).unwrap();
        assert_eq!(node.interval().range(), 0..METAGRAMMAR_SOURCE.len());
    }
}

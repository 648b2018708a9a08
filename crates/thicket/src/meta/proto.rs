//! The hand-built stage-one grammar for the grammar language.
//!
//! [`proto_metagrammar`] constructs, through the builder API alone, the
//! same rule set that `metagrammar.peg` writes down textually. It is
//! the fixed starting point of the bootstrap: parsing the textual
//! definition with it and compiling the result must reproduce every
//! rule exactly, which `metagrammar()` and the bootstrap tests rely on.
//!
//! Each `.rule(...)` below transcribes one definition from
//! `metagrammar.peg`, in file order. Keep the two in lockstep when
//! changing the grammar language.

use crate::expr::build::{
    anything, character_class, nonterminal, not_predicate, one_or_more, optional, ordered_choice,
    sequence, terminal, zero_or_more,
};
use crate::grammar::{Grammar, GrammarBuilder, GrammarError};

/// Build the grammar language's grammar by hand.
///
/// # Errors
///
/// Construction is static and only fails if the transcription itself is
/// defective, which the bootstrap tests would catch.
#[allow(clippy::too_many_lines)]
pub fn proto_metagrammar() -> Result<Grammar, GrammarError> {
    GrammarBuilder::new()
        .rule(
            "grammar",
            sequence([
                optional(nonterminal("spacing")),
                nonterminal("rule_definition"),
                zero_or_more(sequence([
                    nonterminal("spacing"),
                    nonterminal("rule_definition"),
                ])),
                optional(nonterminal("spacing")),
            ]),
        )
        .rule(
            "rule_definition",
            sequence([
                terminal("rule"),
                nonterminal("spacing"),
                nonterminal("rule_name"),
                nonterminal("spacing"),
                nonterminal("parsing_expression"),
                optional(sequence([
                    nonterminal("spacing"),
                    nonterminal("node_block"),
                ])),
                nonterminal("spacing"),
                terminal("end"),
            ]),
        )
        .rule("rule_name", nonterminal("identifier"))
        .rule("parsing_expression", nonterminal("ordered_choice"))
        .rule(
            "ordered_choice",
            sequence([
                nonterminal("sequence_expression"),
                zero_or_more(sequence([
                    optional(nonterminal("spacing")),
                    terminal("/"),
                    optional(nonterminal("spacing")),
                    nonterminal("sequence_expression"),
                ])),
            ]),
        )
        .rule(
            "sequence_expression",
            sequence([
                nonterminal("prefixed"),
                zero_or_more(sequence([
                    nonterminal("spacing"),
                    nonterminal("prefixed"),
                ])),
            ]),
        )
        .rule(
            "prefixed",
            sequence([
                optional(nonterminal("predicate")),
                nonterminal("suffixed"),
            ]),
        )
        .rule("predicate", ordered_choice([terminal("&"), terminal("!")]))
        .rule(
            "suffixed",
            sequence([
                nonterminal("primary"),
                optional(nonterminal("repetition_suffix")),
            ]),
        )
        .rule(
            "repetition_suffix",
            ordered_choice([terminal("*"), terminal("+"), terminal("?")]),
        )
        .rule(
            "primary",
            ordered_choice([
                nonterminal("terminal_symbol"),
                nonterminal("character_class"),
                nonterminal("anything_symbol"),
                nonterminal("parenthesized"),
                nonterminal("nonterminal_symbol"),
            ]),
        )
        .rule(
            "parenthesized",
            sequence([
                terminal("("),
                optional(nonterminal("spacing")),
                nonterminal("parsing_expression"),
                optional(nonterminal("spacing")),
                terminal(")"),
            ]),
        )
        .rule(
            "terminal_symbol",
            sequence([
                nonterminal("quoted_string"),
                optional(sequence([
                    optional(nonterminal("spacing")),
                    nonterminal("node_block"),
                ])),
            ]),
        )
        .rule(
            "quoted_string",
            ordered_choice([
                nonterminal("single_quoted_string"),
                nonterminal("double_quoted_string"),
            ]),
        )
        .rule(
            "single_quoted_string",
            sequence([
                terminal("'"),
                nonterminal("single_quoted_body"),
                terminal("'"),
            ]),
        )
        .rule(
            "single_quoted_body",
            zero_or_more(sequence([not_predicate(terminal("'")), anything()])),
        )
        .rule(
            "double_quoted_string",
            sequence([
                terminal("\""),
                nonterminal("double_quoted_body"),
                terminal("\""),
            ]),
        )
        .rule(
            "double_quoted_body",
            zero_or_more(sequence([not_predicate(terminal("\"")), anything()])),
        )
        .rule(
            "character_class",
            sequence([
                terminal("["),
                optional(terminal("^")),
                one_or_more(nonterminal("class_entry")),
                terminal("]"),
            ]),
        )
        .rule(
            "class_entry",
            sequence([
                nonterminal("class_char"),
                optional(sequence([terminal("-"), nonterminal("class_char")])),
            ]),
        )
        .rule(
            "class_char",
            ordered_choice([
                sequence([terminal("\\"), anything()]),
                sequence([not_predicate(terminal("]")), anything()]),
            ]),
        )
        .rule("anything_symbol", terminal("."))
        .rule(
            "nonterminal_symbol",
            sequence([
                not_predicate(nonterminal("keyword")),
                nonterminal("identifier"),
            ]),
        )
        .rule(
            "keyword",
            sequence([
                ordered_choice([terminal("rule"), terminal("end")]),
                not_predicate(nonterminal("identifier_char")),
            ]),
        )
        .rule(
            "identifier",
            sequence([
                nonterminal("identifier_start"),
                zero_or_more(nonterminal("identifier_char")),
            ]),
        )
        .rule("identifier_start", character_class("a-zA-Z_")?)
        .rule("identifier_char", character_class("a-zA-Z0-9_")?)
        .rule(
            "node_block",
            sequence([
                terminal("{"),
                nonterminal("block_body"),
                terminal("}"),
            ]),
        )
        .rule(
            "block_body",
            zero_or_more(sequence([not_predicate(terminal("}")), anything()])),
        )
        .rule("spacing", one_or_more(nonterminal("space_char")))
        .rule("space_char", character_class(r" \t\n\r")?)
        .build()
}

//! Tests for the grammar language and its two-stage bootstrap
//!
//! The metagrammar exists twice: hand-built through the expression
//! constructors, and as text compiled by that hand-built grammar. Every
//! language-level test runs against both, and the bootstrap must close
//! into a fixpoint.

use thicket::{
    CompileError, Grammar, METAGRAMMAR_SOURCE, ParseError, compile_grammar_with,
    metagrammar, proto_metagrammar,
};

/// Run `test` against the hand-built metagrammar and the compiled one.
fn for_each_metagrammar(test: impl Fn(&Grammar)) {
    let proto = proto_metagrammar().expect("Failed to build the proto metagrammar");
    let compiled = metagrammar().expect("Failed to bootstrap the metagrammar");
    test(&proto);
    test(&compiled);
}

fn assert_equivalent(left: &Grammar, right: &Grammar) {
    assert_eq!(left.root(), right.root());
    assert_eq!(left.len(), right.len());

    let mut names: Vec<&str> = left.rule_names().collect();
    names.sort_unstable();
    for name in names {
        let left_rule = left.resolve(name).expect("Rule should exist");
        let right_rule = right.resolve(name).expect("Rule should exist in both");
        assert_eq!(left_rule, right_rule, "rule `{name}` diverges");
    }
}

#[test]
fn test_bootstrap_reaches_fixpoint() {
    let proto = proto_metagrammar().expect("Failed to build the proto metagrammar");
    let stage1 =
        compile_grammar_with(&proto, METAGRAMMAR_SOURCE).expect("Stage one should compile");
    let stage2 =
        compile_grammar_with(&stage1, METAGRAMMAR_SOURCE).expect("Stage two should compile");

    assert_equivalent(&proto, &stage1);
    assert_equivalent(&stage1, &stage2);
}

#[test]
fn test_metagrammar_accepts_its_own_source() {
    for_each_metagrammar(|meta| {
        let node = meta
            .new_parser()
            .parse(METAGRAMMAR_SOURCE)
            .expect("The metagrammar should parse its own definition");
        assert_eq!(node.interval().range(), 0..METAGRAMMAR_SOURCE.len());
    });
}

#[test]
fn test_terminal_symbol_rule_subset() {
    for_each_metagrammar(|meta| {
        let mut parser = meta.new_parser_at("terminal_symbol");

        let node = parser.parse("'foo'").expect("Single-quoted should parse");
        assert_eq!(node.rule(), Some("terminal_symbol"));

        let node = parser.parse("\"foo\"").expect("Double-quoted should parse");
        assert_eq!(node.rule(), Some("terminal_symbol"));

        let node = parser
            .parse("'foo' {\ndef a_method\n}")
            .expect("A trailing block should parse");
        assert_eq!(node.rule(), Some("terminal_symbol"));

        assert!(parser.parse("foo").is_err());
    });
}

#[test]
fn test_compiled_greeting_grammar() {
    for_each_metagrammar(|meta| {
        let grammar = compile_grammar_with(
            meta,
            "rule greeting\n  'hello' (' world')?\nend\n",
        )
        .expect("The definition should compile");
        let mut parser = grammar.new_parser();

        let node = parser.parse("hello world").expect("Parse should succeed");
        assert_eq!(node.interval().range(), 0..11);

        let node = parser.parse("hello").expect("Parse should succeed");
        assert_eq!(node.interval().range(), 0..5);
    });
}

#[test]
fn test_compiled_digits_grammar() {
    for_each_metagrammar(|meta| {
        let grammar = compile_grammar_with(meta, "rule number\n  [0-9]+\nend\n")
            .expect("The definition should compile");
        let mut parser = grammar.new_parser();

        let node = parser.parse("042").expect("Parse should succeed");
        assert_eq!(node.interval().range(), 0..3);

        let err = parser.parse("").unwrap_err();
        assert_eq!(err.position(), Some(0));
    });
}

#[test]
fn test_compiled_delimited_list() {
    for_each_metagrammar(|meta| {
        let grammar = compile_grammar_with(
            meta,
            "rule list\n  word (' ' word)*\nend\n\nrule word\n  'a'\nend\n",
        )
        .expect("The definition should compile");
        let mut parser = grammar.new_parser();

        assert!(parser.parse("a a a").is_ok());

        let err = parser.parse("a a a,").unwrap_err();
        assert!(matches!(err, ParseError::Incomplete { .. }));
        assert_eq!(err.consumed().map(|interval| interval.range()), Some(0..5));
    });
}

#[test]
fn test_each_quote_style_embeds_the_other() {
    for_each_metagrammar(|meta| {
        let grammar = compile_grammar_with(meta, "rule quote\n  '\"' / \"'\"\nend\n")
            .expect("The definition should compile");
        let mut parser = grammar.new_parser();

        assert!(parser.parse("\"").is_ok());
        assert!(parser.parse("'").is_ok());
        assert!(parser.parse("x").is_err());
    });
}

#[test]
fn test_block_methods_become_rule_behavior() {
    for_each_metagrammar(|meta| {
        let grammar = compile_grammar_with(
            meta,
            "rule greeting\n  'hello' {\n    def a_method\n  }\nend\n",
        )
        .expect("The definition should compile");

        let behavior = grammar.behavior("greeting").expect("Behavior should exist");
        assert_eq!(behavior.method_names(), vec!["a_method"]);

        let node = grammar.new_parser().parse("hello").expect("Parse should succeed");
        assert_eq!(
            node.behavior().map(|behavior| behavior.method_names()),
            Some(vec!["a_method"])
        );
    });
}

#[test]
fn test_malformed_definitions_are_rejected() {
    for_each_metagrammar(|meta| {
        for source in ["rule greeting 'hello'", "rule\nend\n", "not a grammar"] {
            let err = compile_grammar_with(meta, source).unwrap_err();
            assert!(matches!(err, CompileError::Malformed(_)), "{source:?}");
        }
    });
}

#[test]
fn test_stray_text_after_rules_is_rejected() {
    for_each_metagrammar(|meta| {
        let err =
            compile_grammar_with(meta, "rule a\n  'x'\nend\n@@@\n").unwrap_err();
        assert!(matches!(err, CompileError::Malformed(_)));
    });
}

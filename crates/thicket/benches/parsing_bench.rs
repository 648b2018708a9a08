use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use thicket::build::{
    character_class, nonterminal, one_or_more, ordered_choice, sequence, terminal,
};
use thicket::{Grammar, GrammarBuilder, ParserConfig, compile_grammar_with, metagrammar};

fn setup_grammar() -> Grammar {
    GrammarBuilder::new()
        .rule(
            "expr",
            ordered_choice([
                sequence([nonterminal("term"), terminal("+"), nonterminal("expr")]),
                nonterminal("term"),
            ]),
        )
        .rule(
            "term",
            ordered_choice([
                sequence([nonterminal("factor"), terminal("*"), nonterminal("term")]),
                nonterminal("factor"),
            ]),
        )
        .rule(
            "factor",
            ordered_choice([
                nonterminal("number"),
                sequence([terminal("("), nonterminal("expr"), terminal(")")]),
            ]),
        )
        .rule("number", one_or_more(character_class("0-9").unwrap()))
        .build()
        .unwrap()
}

fn bench_full_parse(c: &mut Criterion) {
    let grammar = setup_grammar();
    let small = "1+2*3+4*5";
    let large = format!("{}56", "12*34+".repeat(40));

    c.bench_function("full_parse_small", |b| {
        b.iter(|| {
            let mut parser = grammar.new_parser();
            black_box(parser.parse(black_box(small)).unwrap());
        });
    });

    c.bench_function("full_parse_large", |b| {
        b.iter(|| {
            let mut parser = grammar.new_parser();
            black_box(parser.parse(black_box(&large)).unwrap());
        });
    });
}

fn bench_memoization(c: &mut Criterion) {
    let grammar = setup_grammar();
    // every `expr` and `term` alternative re-parses its prefix on failure,
    // so this input backtracks heavily without the cache
    let input = "1*2*3*4*5*6*7*8*(9+10)";

    c.bench_function("parse_memoized", |b| {
        b.iter(|| {
            let mut parser = grammar.new_parser();
            black_box(parser.parse(black_box(input)).unwrap());
        });
    });

    c.bench_function("parse_unmemoized", |b| {
        b.iter(|| {
            let mut parser = grammar.new_parser().with_config(ParserConfig {
                enable_memoization: false,
                ..ParserConfig::default()
            });
            black_box(parser.parse(black_box(input)).unwrap());
        });
    });
}

fn bench_bootstrap(c: &mut Criterion) {
    c.bench_function("metagrammar_bootstrap", |b| {
        b.iter(|| {
            black_box(metagrammar().unwrap());
        });
    });
}

fn bench_compile(c: &mut Criterion) {
    let meta = metagrammar().unwrap();
    let source = concat!(
        "rule expr\n  term ('+' term)*\nend\n",
        "\n",
        "rule term\n  number ('*' number)*\nend\n",
        "\n",
        "rule number\n  [0-9]+\nend\n",
    );

    c.bench_function("grammar_compile", |b| {
        b.iter(|| {
            black_box(compile_grammar_with(&meta, black_box(source)).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_full_parse,
    bench_memoization,
    bench_bootstrap,
    bench_compile
);
criterion_main!(benches);

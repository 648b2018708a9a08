#![no_main]
use libfuzzer_sys::fuzz_target;
use thicket::build::{character_class, nonterminal, one_or_more, zero_or_more_delimited};
use thicket::{GrammarBuilder, ParserConfig};

fuzz_target!(|data: &[u8]| {
    // Parsing is defined over string input
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(class) = character_class("a-z0-9") else {
        return;
    };
    let Ok(grammar) = GrammarBuilder::new()
        .rule("list", zero_or_more_delimited(nonterminal("word"), " "))
        .rule("word", one_or_more(class))
        .build()
    else {
        return;
    };

    let mut memoized = grammar.new_parser();
    let mut unmemoized = grammar.new_parser().with_config(ParserConfig {
        enable_memoization: false,
        ..ParserConfig::default()
    });

    // Outcomes must agree regardless of memoization, and must not panic
    let first = memoized.parse(input);
    let second = unmemoized.parse(input);
    assert_eq!(first.is_ok(), second.is_ok());
    if let (Err(a), Err(b)) = (&first, &second) {
        assert_eq!(a.position(), b.position());
    }
});

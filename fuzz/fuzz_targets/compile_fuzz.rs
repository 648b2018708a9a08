#![no_main]
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;
use thicket::{Grammar, compile_grammar_with, metagrammar};

static META: OnceLock<Grammar> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let meta = META.get_or_init(|| metagrammar().expect("metagrammar bootstrap"));

    // Arbitrary text either compiles to a usable grammar or reports a
    // structured error; neither path may panic
    match compile_grammar_with(meta, source) {
        Ok(grammar) => {
            let _ = grammar.new_parser().parse(source);
        }
        Err(error) => {
            let _ = error.to_string();
        }
    }
});

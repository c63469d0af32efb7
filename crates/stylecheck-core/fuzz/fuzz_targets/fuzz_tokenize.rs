//! Fuzz target for the tokenizer and parser.
//!
//! Tokenizing must never panic, and a successful tokenization must rebuild
//! the input exactly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use stylecheck_core::{parse_document, tokenize};

fuzz_target!(|sql: &str| {
    if let Ok(tokens) = tokenize(sql) {
        let rebuilt: String = tokens.iter().map(|token| token.text).collect();
        assert_eq!(rebuilt, sql);
        let _output = parse_document(&tokens);
    }
});

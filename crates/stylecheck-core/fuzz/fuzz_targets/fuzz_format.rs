//! Fuzz target for the formatter and linter.
//!
//! Neither may panic, and formatting formatted output must be a no-op.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stylecheck_core::{format, lint, KeywordCase, StyleConfig};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    sql: String,
    lower_keywords: bool,
    indent_width: u8,
    trailing_comma: bool,
}

impl FuzzInput {
    fn config(&self) -> StyleConfig {
        StyleConfig {
            keyword_case: if self.lower_keywords {
                KeywordCase::Lower
            } else {
                KeywordCase::Upper
            },
            indent_width: usize::from(self.indent_width % 8) + 1,
            trailing_comma_on_last_field: self.trailing_comma,
            ..StyleConfig::default()
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let config = input.config();
    let _violations = lint(&input.sql, &config);
    if let Ok(once) = format(&input.sql, &config) {
        let twice = format(&once, &config).expect("formatted output tokenizes");
        assert_eq!(once, twice);
    }
});

//! SQL style linting and formatting.
//!
//! The pipeline is text → [`lexer`] → tokens → [`parser`] → tree, after which
//! the [`linter`] reports [`Violation`]s and the [`formatter`] re-emits the
//! tree in canonical layout. Both are pure functions of the source and a
//! [`StyleConfig`].
//!
//! ```
//! use stylecheck_core::{format, lint, StyleConfig};
//!
//! let config = StyleConfig::default();
//! let violations = lint("select id from t\n", &config).unwrap();
//! let keyword_case = violations.iter().filter(|v| v.rule == "keyword-case");
//! assert_eq!(keyword_case.count(), 2);
//!
//! let formatted = format("select id from t", &config).unwrap();
//! assert_eq!(formatted, "SELECT\n    id,\nFROM t\n");
//! ```

pub mod config;
pub mod equivalence;
pub mod error;
pub mod fix;
pub mod formatter;
pub mod lexer;
pub mod linter;
pub mod parser;
pub mod types;

pub use config::{IdentifierCase, KeywordCase, StyleConfig};
pub use equivalence::{verify_equivalence, Equivalence};
pub use error::{ConfigError, FormatError, LexError, ParseError, ParseErrorKind, StyleError};
pub use fix::{apply_fixes, FixOutcome};
pub use formatter::{format, format_tree};
pub use lexer::{tokenize, Token, TokenKind, Tokenizer};
pub use linter::ignore::IgnoreList;
pub use linter::rule::{RuleContext, StyleRule};
pub use linter::rules::all_rules;
pub use linter::{lint, lint_with_ignore, Linter};
pub use parser::{parse, parse_document, ParseOutput, SyntaxNode};
pub use types::{has_errors, rule_ids, Fix, LineIndex, Severity, Span, Violation};

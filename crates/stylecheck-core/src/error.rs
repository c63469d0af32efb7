//! Error types for lexing, parsing, configuration and formatting.
//!
//! # Error Handling Strategy
//!
//! - [`LexError`]: fatal for a document. An unterminated literal or comment
//!   leaves no token stream to parse, so linting and formatting stop.
//! - [`ParseError`]: recoverable per statement. The parser records the error,
//!   keeps the statement as an opaque node and continues with the next one.
//! - [`ConfigError`]: fatal before any document is processed.
//! - [`FormatError`]: returned by the equivalence check when formatted output
//!   no longer means the same thing as its input.
//!
//! Style findings are not errors; they are [`crate::types::Violation`]s.

use crate::types::Span;
use std::fmt;
use thiserror::Error;

/// Position information for an error (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Unterminated string, quoted identifier or block comment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lex error at line {}, column {}: {}", .position.line, .position.column, .message)]
pub struct LexError {
    pub message: String,
    /// Region from the opening delimiter to the end of input.
    pub span: Span,
    pub position: Position,
}

impl LexError {
    pub fn new(message: impl Into<String>, span: Span, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            span,
            position: Position { line, column },
        }
    }
}

/// Category of parse error for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseErrorKind {
    /// Unexpected token in input.
    #[default]
    SyntaxError,
    /// Input ended in the middle of a construct.
    UnexpectedEof,
}

/// Error encountered while parsing one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Span of the offending token (empty at end of input).
    pub span: Span,
    pub position: Position,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            span,
            position: Position { line, column },
            kind: ParseErrorKind::SyntaxError,
        }
    }

    /// Sets the error kind.
    pub fn with_kind(mut self, kind: ParseErrorKind) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.position.line, self.position.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for `{option}`: {message}")]
    InvalidValue {
        option: &'static str,
        message: String,
    },

    #[error("unknown rule id `{0}`")]
    UnknownRule(String),

    #[error("failed to read configuration: {0}")]
    Malformed(String),
}

/// Formatting changed what the SQL means, or produced unparseable SQL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("formatted SQL is not equivalent to the original (statement {statement_index})")]
    SemanticDrift { statement_index: usize },

    #[error("formatted SQL has {formatted} statement(s), original has {original}")]
    StatementCountMismatch { original: usize, formatted: usize },

    #[error("formatted SQL no longer parses: {0}")]
    Unparseable(String),
}

/// Errors that stop processing of a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Expected FROM", Span::new(4, 8), 10, 5);
        assert_eq!(
            err.to_string(),
            "Parse error at line 10, column 5: Expected FROM"
        );
        assert_eq!(err.kind, ParseErrorKind::SyntaxError);
    }

    #[test]
    fn test_with_kind_builder() {
        let err = ParseError::new("Unexpected end of input", Span::empty(3), 1, 4)
            .with_kind(ParseErrorKind::UnexpectedEof);
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_lex_error_display() {
        let err = LexError::new("unterminated string literal", Span::new(7, 12), 1, 8);
        assert_eq!(
            err.to_string(),
            "Lex error at line 1, column 8: unterminated string literal"
        );
    }

    #[test]
    fn test_style_error_is_transparent() {
        let err: StyleError = ConfigError::UnknownRule("nope".to_string()).into();
        assert_eq!(err.to_string(), "unknown rule id `nope`");
    }

    #[test]
    fn test_error_trait() {
        let err = ParseError::new("Test error", Span::empty(0), 1, 1);
        let _: &dyn std::error::Error = &err;
    }
}

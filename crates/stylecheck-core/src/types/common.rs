//! Common types shared by the lexer, parser, rule engine and formatter.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A byte range in the source SQL string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Byte offset from start of SQL string (inclusive)
    pub start: usize,
    /// Byte offset from start of SQL string (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Create an empty span at a position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns true if `other` lies entirely within this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Get the source text for this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A suggested replacement for a span of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    /// Region of the original source to replace (may be empty for insertions).
    pub span: Span,
    /// Replacement text.
    pub replacement: String,
}

impl Fix {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(Span::empty(at), text)
    }

    pub fn delete(span: Span) -> Self {
        Self::replace(span, String::new())
    }
}

/// A style finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Rule identifier (see [`rule_ids`])
    pub rule: String,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Location in source SQL
    pub span: Span,

    /// 1-based line of `span.start`
    pub line: usize,

    /// 1-based column (in characters) of `span.start`
    pub column: usize,

    /// Optional: automatic fix for this violation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Violation {
    pub fn error(rule: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            rule: rule.into(),
            severity: Severity::Error,
            message: message.into(),
            span,
            line: 0,
            column: 0,
            fix: None,
        }
    }

    pub fn warning(rule: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule, message, span)
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Returns true if any violation has error severity.
///
/// A wrapping CLI exits non-zero exactly when this is true; warnings alone do
/// not fail a run.
pub fn has_errors(violations: &[Violation]) -> bool {
    violations.iter().any(Violation::is_error)
}

/// Machine-readable rule identifiers.
pub mod rule_ids {
    pub const PARSE_ERROR: &str = "parse-error";

    pub const KEYWORD_CASE: &str = "keyword-case";
    pub const IDENTIFIER_CASE: &str = "identifier-case";
    pub const TRAILING_COMMA: &str = "trailing-comma";
    pub const EXPLICIT_JOIN_TYPE: &str = "explicit-join-type";
    pub const NO_SELECT_STAR: &str = "no-select-star";
    pub const NO_POSITIONAL_GROUP_BY: &str = "no-positional-group-by";
    pub const PREFER_CTE_OVER_SUBQUERY: &str = "prefer-cte-over-subquery";
    pub const INDENTATION: &str = "indentation";
    pub const BLANK_LINES: &str = "blank-lines";
    pub const EXPLICIT_ALIAS: &str = "explicit-alias";

    /// Every rule id a configuration may reference.
    pub const ALL: &[&str] = &[
        KEYWORD_CASE,
        IDENTIFIER_CASE,
        TRAILING_COMMA,
        EXPLICIT_JOIN_TYPE,
        NO_SELECT_STAR,
        NO_POSITIONAL_GROUP_BY,
        PREFER_CTE_OVER_SUBQUERY,
        INDENTATION,
        BLANK_LINES,
        EXPLICIT_ALIAS,
    ];

    pub fn is_known(id: &str) -> bool {
        ALL.contains(&id)
    }
}

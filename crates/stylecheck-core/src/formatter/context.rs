//! Immutable formatting context threaded through rendering.

use crate::config::StyleConfig;
use crate::parser::ast::{Join, JoinKind};

/// Current nesting depth plus the configuration.
///
/// Rendering a nested query passes `ctx.nested()` down; nothing is mutated.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'c> {
    pub config: &'c StyleConfig,
    pub depth: usize,
}

impl<'c> FormatContext<'c> {
    pub fn new(config: &'c StyleConfig) -> Self {
        Self { config, depth: 0 }
    }

    /// Context for a query nested one level deeper.
    pub fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    /// Indentation width of the current depth, in columns.
    pub fn indent(&self) -> usize {
        self.depth * self.config.indent_width
    }

    /// One indentation unit, in columns.
    pub fn unit(&self) -> usize {
        self.config.indent_width
    }

    /// Keyword text in the configured case.
    pub fn kw(&self, keyword: &str) -> String {
        self.config.keyword_case.apply(keyword)
    }

    /// Blank lines between CTEs, statements and the WITH block.
    pub fn separator_lines(&self) -> usize {
        self.config.max_blank_lines.min(1)
    }
}

/// Canonical upper-case keyword sequence for a join, as the formatter emits it.
///
/// Comma joins have no keyword and return an empty string.
pub fn join_keyword(join: &Join, config: &StyleConfig) -> &'static str {
    match (join.kind, join.outer) {
        (JoinKind::Inner, _) => "INNER JOIN",
        (JoinKind::Plain, _) if config.require_explicit_join => "INNER JOIN",
        (JoinKind::Plain, _) => "JOIN",
        (JoinKind::Left, false) => "LEFT JOIN",
        (JoinKind::Left, true) => "LEFT OUTER JOIN",
        (JoinKind::Right, false) => "RIGHT JOIN",
        (JoinKind::Right, true) => "RIGHT OUTER JOIN",
        (JoinKind::Full, false) => "FULL JOIN",
        (JoinKind::Full, true) => "FULL OUTER JOIN",
        (JoinKind::Cross, _) => "CROSS JOIN",
        (JoinKind::Comma, _) => "",
    }
}

/// Column at which ON / AND / OR of a join condition starts so that the word
/// ends where the join keyword ends.
pub fn condition_column(join_column: usize, keyword: &str, word: &str) -> usize {
    (join_column + keyword.len()).saturating_sub(word.len())
}

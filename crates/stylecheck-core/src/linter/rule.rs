//! Style rule trait and the context rules run against.

use crate::config::StyleConfig;
use crate::lexer::Token;
use crate::parser::ast::Document;
use crate::parser::SyntaxNode;
use crate::types::{Fix, LineIndex, Severity, Span, Violation};

/// Everything a rule may look at for one document.
///
/// Rules never mutate the context; a rule run is a pure function of the
/// tokens, the tree and the configuration.
pub struct RuleContext<'a> {
    /// The full SQL source text.
    pub source: &'a str,
    /// Lossless token stream of `source`.
    pub tokens: &'a [Token<'a>],
    /// Parsed document. Statements that failed to parse are opaque.
    pub document: &'a Document,
    pub config: &'a StyleConfig,
    pub lines: &'a LineIndex,
}

impl<'a> RuleContext<'a> {
    /// Root of the syntax tree.
    pub fn root(&self) -> SyntaxNode<'a> {
        SyntaxNode::Document(self.document)
    }

    /// Every node of the tree in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.root().descendants()
    }

    /// Tokens other than whitespace, newlines and comments.
    pub fn significant_tokens(&self) -> impl Iterator<Item = &'a Token<'a>> {
        self.tokens.iter().filter(|token| !token.kind.is_trivia())
    }

    /// Keyword text in the configured case.
    pub fn kw(&self, keyword: &str) -> String {
        self.config.keyword_case.apply(keyword)
    }

    /// Whitespace between the start of the line and `offset`, or `None` when
    /// something other than whitespace precedes `offset` on its line.
    pub fn line_indent(&self, offset: usize) -> Option<Span> {
        let start = self.lines.line_start(self.lines.line(offset));
        // Backwards, stopping at the first non-blank byte.
        let blank = self.source[start..offset]
            .bytes()
            .rev()
            .take_while(|byte| matches!(byte, b' ' | b'\t'))
            .count();
        (blank == offset - start).then(|| Span::new(start, offset))
    }

    /// Visual width of leading whitespace; a tab counts as one indent unit.
    pub fn indent_width(&self, indent: Span) -> usize {
        indent
            .slice(self.source)
            .chars()
            .map(|c| if c == '\t' { self.config.indent_width } else { 1 })
            .sum()
    }

    /// Zero-based visual column of `offset` on its line.
    pub fn column_of(&self, offset: usize) -> usize {
        let start = self.lines.line_start(self.lines.line(offset));
        self.indent_width(Span::new(start, offset))
    }
}

/// A single style rule.
pub trait StyleRule: Send + Sync {
    /// Machine-readable rule id (e.g., "keyword-case").
    fn id(&self) -> &'static str;

    /// Short human-readable name (e.g., "Keyword case").
    fn name(&self) -> &'static str;

    /// Longer description of what this rule checks.
    fn description(&self) -> &'static str;

    /// Severity of findings unless the configuration overrides it.
    fn default_severity(&self) -> Severity;

    /// Whether violations of this rule carry automatic fixes.
    fn fixable(&self) -> bool {
        false
    }

    /// Check a document and return any violations found.
    fn check(&self, ctx: &RuleContext) -> Vec<Violation>;
}

/// Build a violation with the rule's default severity.
pub(crate) fn violation(
    rule: &dyn StyleRule,
    message: impl Into<String>,
    span: Span,
    fix: Option<Fix>,
) -> Violation {
    let violation = Violation::error(rule.id(), message, span).with_severity(rule.default_severity());
    match fix {
        Some(fix) => violation.with_fix(fix),
        None => violation,
    }
}

/// Run one rule over `sql` with positions filled in, for rule unit tests.
#[cfg(test)]
pub(crate) fn run_rule(rule: &dyn StyleRule, sql: &str, config: &StyleConfig) -> Vec<Violation> {
    let tokens = crate::lexer::tokenize(sql).expect("tokenize");
    let output = crate::parser::parse_document(&tokens);
    let lines = LineIndex::new(sql);
    let ctx = RuleContext {
        source: sql,
        tokens: &tokens,
        document: &output.document,
        config,
        lines: &lines,
    };
    let mut violations: Vec<Violation> = rule
        .check(&ctx)
        .into_iter()
        .map(|v| {
            let (line, column) = lines.line_col(sql, v.span.start);
            v.with_position(line, column)
        })
        .collect();
    violations.sort_by_key(|v| (v.span.start, v.span.end));
    violations
}

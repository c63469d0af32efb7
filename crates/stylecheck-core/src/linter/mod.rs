//! Style linter.
//!
//! A lint pass tokenizes and parses a document once, runs every enabled rule
//! against the shared [`RuleContext`], and then post-processes the findings:
//! configured severities, line/column positions, parse errors as
//! `parse-error` violations, inline suppressions, ignore lists, and a stable
//! sort with duplicates removed.

pub mod ignore;
pub mod rule;
pub mod rules;
pub mod suppression;

use ignore::IgnoreList;
use rule::{RuleContext, StyleRule};
use suppression::SuppressionMap;

use crate::config::StyleConfig;
use crate::error::{ConfigError, LexError, ParseError, StyleError};
use crate::lexer::tokenize;
use crate::parser::parse_document;
use crate::types::{rule_ids, LineIndex, Severity, Violation};

/// The style linter, holding the rule registry and configuration.
pub struct Linter {
    rules: Vec<Box<dyn StyleRule>>,
    config: StyleConfig,
}

impl Linter {
    /// Creates a linter after validating `config`.
    pub fn new(config: StyleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rules: rules::all_rules(),
            config,
        })
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Every registered rule, enabled or not.
    pub fn rules(&self) -> &[Box<dyn StyleRule>] {
        &self.rules
    }

    /// Lint one document.
    pub fn lint(&self, source: &str) -> Result<Vec<Violation>, LexError> {
        self.lint_with_ignore(source, &IgnoreList::default())
    }

    /// Lint one document, dropping violations listed in `ignore`.
    pub fn lint_with_ignore(
        &self,
        source: &str,
        ignore: &IgnoreList,
    ) -> Result<Vec<Violation>, LexError> {
        let tokens = tokenize(source)?;
        let output = parse_document(&tokens);
        let lines = LineIndex::new(source);
        let ctx = RuleContext {
            source,
            tokens: &tokens,
            document: &output.document,
            config: &self.config,
            lines: &lines,
        };

        let mut found_by_rules = Vec::new();
        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.id()) {
                continue;
            }
            let found = rule.check(&ctx);

            #[cfg(feature = "tracing")]
            if !found.is_empty() {
                tracing::trace!(rule = rule.id(), count = found.len(), "rule findings");
            }

            found_by_rules.extend(found.into_iter().map(|violation| {
                let severity = self.config.severity_for(rule.id(), violation.severity);
                violation.with_severity(severity)
            }));
        }

        // Positions are resolved in offset order with one cursor.
        found_by_rules.sort_by_key(|violation| violation.span.start);
        let mut cursor = lines.cursor(source);
        let mut violations: Vec<Violation> =
            output.errors.iter().map(parse_error_violation).collect();
        violations.extend(found_by_rules.into_iter().map(|violation| {
            let (line, column) = cursor.position(violation.span.start);
            violation.with_position(line, column)
        }));

        let suppressions = SuppressionMap::from_tokens(&tokens, &lines);
        let mut ignored = ignore.matcher(source, &lines);
        violations.retain(|violation| {
            !suppressions.is_suppressed(violation.line, &violation.rule)
                && !ignored.contains(violation)
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            violations = violations.len(),
            parse_errors = output.errors.len(),
            "linted document"
        );

        Ok(normalize_violations(violations))
    }
}

/// Lint `source` with `config`.
pub fn lint(source: &str, config: &StyleConfig) -> Result<Vec<Violation>, StyleError> {
    Ok(Linter::new(config.clone())?.lint(source)?)
}

/// Lint `source` with `config`, dropping violations listed in `ignore`.
pub fn lint_with_ignore(
    source: &str,
    config: &StyleConfig,
    ignore: &IgnoreList,
) -> Result<Vec<Violation>, StyleError> {
    Ok(Linter::new(config.clone())?.lint_with_ignore(source, ignore)?)
}

fn parse_error_violation(error: &ParseError) -> Violation {
    Violation::error(rule_ids::PARSE_ERROR, error.message.clone(), error.span)
        .with_position(error.position.line, error.position.column)
}

fn normalize_violations(mut violations: Vec<Violation>) -> Vec<Violation> {
    violations.sort_by(|left, right| sort_key(left).cmp(&sort_key(right)));
    violations.dedup_by(|left, right| sort_key(left) == sort_key(right));
    violations
}

fn sort_key(violation: &Violation) -> (usize, usize, u8, &str, &str) {
    (
        violation.span.start,
        violation.span.end,
        severity_rank(violation.severity),
        violation.rule.as_str(),
        violation.message.as_str(),
    )
}

const fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

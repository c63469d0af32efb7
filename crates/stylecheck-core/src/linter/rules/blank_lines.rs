//! blank-lines: blank line discipline.
//!
//! No blank lines before the first token, exactly one newline after the
//! last, runs of blank lines no longer than `max_blank_lines`, and at most one
//! blank line before a CTE that follows another.

use std::collections::HashSet;

use crate::lexer::Token;
use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::SyntaxNode;
use crate::types::{rule_ids, Fix, Severity, Span, Violation};

pub struct BlankLines;

impl StyleRule for BlankLines {
    fn id(&self) -> &'static str {
        rule_ids::BLANK_LINES
    }

    fn name(&self) -> &'static str {
        "Blank lines"
    }

    fn description(&self) -> &'static str {
        "No leading blank lines, one trailing newline, limited runs of blank lines."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        let source = ctx.source;
        let content: Vec<&Token> = ctx
            .tokens
            .iter()
            .filter(|token| !token.kind.is_space())
            .collect();

        let (Some(first), Some(last)) = (content.first(), content.last()) else {
            if source.is_empty() {
                return Vec::new();
            }
            let all = Span::new(0, source.len());
            return vec![violation(
                self,
                "Document contains only whitespace",
                all,
                Some(Fix::delete(all)),
            )];
        };

        let mut violations = Vec::new();

        if let Some(newline) = source[..first.span.start].rfind('\n') {
            let span = Span::new(0, newline + 1);
            violations.push(violation(
                self,
                "Blank lines at the start of the document",
                span,
                Some(Fix::delete(span)),
            ));
        }

        let cte_starts = later_cte_starts(ctx);
        for pair in content.windows(2) {
            let gap = Span::new(pair[0].span.end, pair[1].span.start);
            let text = gap.slice(source);
            let (Some(first_newline), Some(last_newline)) = (text.find('\n'), text.rfind('\n'))
            else {
                continue;
            };
            let blank = text.matches('\n').count() - 1;
            let limit = if cte_starts.contains(&pair[1].span.start) {
                ctx.config.max_blank_lines.min(1)
            } else {
                ctx.config.max_blank_lines
            };
            if blank <= limit {
                continue;
            }
            let run = Span::new(gap.start + first_newline + 1, gap.start + last_newline + 1);
            violations.push(violation(
                self,
                format!("{blank} blank lines, at most {limit} allowed"),
                run,
                Some(Fix::replace(run, "\n".repeat(limit))),
            ));
        }

        let tail = Span::new(last.span.end, source.len());
        if !matches!(tail.slice(source), "\n" | "\r\n") {
            violations.push(violation(
                self,
                "Document should end with exactly one newline",
                tail,
                Some(Fix::replace(tail, "\n")),
            ));
        }

        violations
    }
}

/// Start offsets of CTE names other than the first of each WITH clause.
fn later_cte_starts(ctx: &RuleContext) -> HashSet<usize> {
    ctx.nodes()
        .filter_map(|node| match node {
            SyntaxNode::WithClause(with) => Some(with),
            _ => None,
        })
        .flat_map(|with| with.ctes.iter().skip(1).map(|cte| cte.span.start))
        .collect()
}

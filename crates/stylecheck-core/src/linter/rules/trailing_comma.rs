//! trailing-comma: every field of a SELECT list is followed by a comma.
//!
//! The last field needs a comma too when `trailing_comma_on_last_field` is
//! set, and must not have one otherwise. This applies to every query laid
//! out as a block (statements, CTE bodies, FROM / JOIN subqueries), including
//! lists written on the SELECT line. Subqueries inside expressions stay
//! inline, so only their multi-line lists are checked. A comma that starts
//! the next line (leading-comma style) is flagged without a fix.

use std::collections::BTreeSet;

use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::ast::{Query, SelectCore, StatementBody, TableFactor, TableRef};
use crate::parser::SyntaxNode;
use crate::types::{rule_ids, Fix, Severity, Span, Violation};

pub struct TrailingComma;

impl StyleRule for TrailingComma {
    fn id(&self) -> &'static str {
        rule_ids::TRAILING_COMMA
    }

    fn name(&self) -> &'static str {
        "Trailing comma"
    }

    fn description(&self) -> &'static str {
        "Every field of a SELECT list ends with a comma."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        let mut blocks = BTreeSet::new();
        for statement in &ctx.document.statements {
            if let StatementBody::Query(query) = &statement.body {
                collect_blocks(query, &mut blocks);
            }
        }

        let mut violations = Vec::new();
        for node in ctx.nodes() {
            if let SyntaxNode::SelectCore(core) = node {
                let block = blocks.contains(&core.keyword.start);
                self.check_core(core, block, ctx, &mut violations);
            }
        }
        violations
    }
}

impl TrailingComma {
    fn check_core(
        &self,
        core: &SelectCore,
        block: bool,
        ctx: &RuleContext,
        out: &mut Vec<Violation>,
    ) {
        let line = |offset: usize| ctx.lines.line(offset);
        let fields = &core.fields.fields;
        let select_line = line(core.keyword.start);
        let multi_line = fields.iter().any(|field| {
            line(field.span.start) != select_line || line(field.span.start) != line(field.span.end)
        });
        if !block && !multi_line {
            return;
        }

        let last = fields.len().saturating_sub(1);
        for (index, field) in fields.iter().enumerate() {
            let wants_comma = index < last || ctx.config.trailing_comma_on_last_field;
            match field.comma {
                Some(comma) if line(comma.start) != line(field.span.end) => {
                    out.push(violation(
                        self,
                        "Comma should end the field line, not start the next one",
                        comma,
                        None,
                    ));
                }
                Some(comma) if !wants_comma => {
                    out.push(violation(
                        self,
                        "Unexpected comma after the last field",
                        comma,
                        Some(Fix::delete(Span::new(field.span.end, comma.end))),
                    ));
                }
                None if wants_comma => {
                    out.push(violation(
                        self,
                        "Missing trailing comma after field",
                        field.span,
                        Some(Fix::insert(field.span.end, ",")),
                    ));
                }
                _ => {}
            }
        }
    }
}

/// SELECT keyword offsets of the cores the formatter lays out as blocks.
fn collect_blocks(query: &Query, out: &mut BTreeSet<usize>) {
    if let Some(with) = &query.with {
        for cte in &with.ctes {
            collect_blocks(&cte.query, out);
        }
    }
    for core in query.cores() {
        out.insert(core.keyword.start);
        if let Some(from) = &core.from {
            let tables = std::iter::once(&from.source).chain(from.joins.iter().map(|j| &j.table));
            for table in tables {
                collect_table(table, out);
            }
        }
    }
}

fn collect_table(table: &TableRef, out: &mut BTreeSet<usize>) {
    if let TableFactor::Subquery { query, .. } = &table.factor {
        collect_blocks(query, out);
    }
}

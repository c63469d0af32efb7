//! indentation: line-leading whitespace matches structural depth.
//!
//! Only tokens that start their line are checked. With `P` the indentation
//! of the enclosing query and `w` one unit:
//!
//! - WITH, CTE names and closing parentheses, SELECT, FROM, joins, WHERE,
//!   HAVING, GROUP BY, ORDER BY, LIMIT and set operators sit at `P`;
//! - fields and WHERE / HAVING continuation conjuncts at `P + w`;
//! - in a CASE field, WHEN and ELSE at `P + 2w`, END at `P + w`, wrapped
//!   conditions and THEN two columns past WHEN;
//! - ON / AND / OR of a join condition end where the join keyword ends.
//!
//! CTE bodies and FROM / JOIN subqueries are one depth deeper. Tabs count as
//! one indentation unit.

use crate::formatter::{condition_column, join_keyword};
use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::ast::*;
use crate::types::{rule_ids, Fix, Severity, Violation};

pub struct Indentation;

impl StyleRule for Indentation {
    fn id(&self) -> &'static str {
        rule_ids::INDENTATION
    }

    fn name(&self) -> &'static str {
        "Indentation and alignment"
    }

    fn description(&self) -> &'static str {
        "Line indentation follows query structure; join conditions align with the join keyword."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        let mut walker = Walker {
            rule: self,
            ctx,
            violations: Vec::new(),
        };
        for statement in &ctx.document.statements {
            if let StatementBody::Query(query) = &statement.body {
                walker.query(query, 0);
            }
        }
        walker.violations
    }
}

struct Walker<'r, 'c, 'a> {
    rule: &'r Indentation,
    ctx: &'c RuleContext<'a>,
    violations: Vec<Violation>,
}

impl Walker<'_, '_, '_> {
    fn unit(&self) -> usize {
        self.ctx.config.indent_width
    }

    /// Check the token at `offset` if it starts its line.
    fn expect(&mut self, offset: usize, expected: usize) {
        let Some(indent) = self.ctx.line_indent(offset) else {
            return;
        };
        let found = self.ctx.indent_width(indent);
        if found == expected {
            return;
        }
        self.violations.push(violation(
            self.rule,
            format!("Expected indentation of {expected} spaces, found {found}"),
            indent,
            Some(Fix::replace(indent, " ".repeat(expected))),
        ));
    }

    fn query(&mut self, query: &Query, depth: usize) {
        let p = depth * self.unit();

        if let Some(with) = &query.with {
            self.expect(with.span.start, p);
            for (index, cte) in with.ctes.iter().enumerate() {
                if index > 0 {
                    self.expect(cte.span.start, p);
                }
                self.query(&cte.query, depth + 1);
                self.expect(cte.close.start, p);
            }
        }

        self.core(&query.body, depth);
        for op in &query.set_operations {
            self.expect(op.keyword.start, p);
            self.core(&op.core, depth);
        }

        if let Some(clause) = &query.order_by {
            self.expect(clause.keyword.start, p);
        }
        if let Some(clause) = &query.limit {
            self.expect(clause.keyword.start, p);
        }
    }

    fn core(&mut self, core: &SelectCore, depth: usize) {
        let p = depth * self.unit();
        let field_indent = p + self.unit();

        self.expect(core.keyword.start, p);
        for field in &core.fields.fields {
            self.expect(field.span.start, field_indent);
            if let ExprKind::Case(case) = &field.expr.kind {
                self.case_field(case, field_indent);
            }
        }

        if let Some(from) = &core.from {
            self.expect(from.keyword.start, p);
            self.table(&from.source, depth);
            for join in &from.joins {
                self.join(join, depth);
            }
        }
        for clause in [&core.where_clause, &core.having].into_iter().flatten() {
            self.expect(clause.keyword.start, p);
            for item in &clause.chain.items {
                if let Some((_, connector)) = item.connector {
                    self.expect(connector.start, field_indent);
                }
            }
        }
        if let Some(clause) = &core.group_by {
            self.expect(clause.keyword.start, p);
        }
    }

    fn case_field(&mut self, case: &CaseExpr, field_indent: usize) {
        let branch = field_indent + self.unit();
        let continuation = branch + 2;

        for when in &case.whens {
            self.expect(when.span.start, branch);
            for item in &when.condition.items {
                if let Some((_, connector)) = item.connector {
                    self.expect(connector.start, continuation);
                }
            }
            self.expect(when.then.start, continuation);
        }
        if let Some(keyword) = case.else_keyword {
            self.expect(keyword.start, branch);
        }
        self.expect(case.end.start, field_indent);
    }

    fn table(&mut self, table: &TableRef, depth: usize) {
        if let TableFactor::Subquery { query, close } = &table.factor {
            self.query(query, depth + 1);
            self.expect(close.start, depth * self.unit());
        }
    }

    fn join(&mut self, join: &Join, depth: usize) {
        let p = depth * self.unit();

        let join_column = if self.ctx.line_indent(join.keyword.start).is_some() {
            p
        } else {
            self.ctx.column_of(join.keyword.start)
        };
        self.expect(join.keyword.start, p);
        self.table(&join.table, depth);

        let Some(JoinConstraint::On { keyword, chain }) = &join.constraint else {
            return;
        };
        let join_text = join_keyword(join, self.ctx.config);
        for item in &chain.items {
            let (word, offset) = match item.connector {
                None => ("ON", keyword.start),
                Some((connector, span)) => (connector.as_str(), span.start),
            };
            self.expect(offset, condition_column(join_column, join_text, word));
        }
    }
}

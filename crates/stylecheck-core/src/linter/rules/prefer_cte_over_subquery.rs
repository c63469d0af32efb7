//! prefer-cte-over-subquery: subqueries in FROM / JOIN and WHERE / HAVING
//! belong in a CTE.
//!
//! `EXISTS (...)` is accepted. The check is purely structural, so correlated
//! subqueries that cannot become CTEs are flagged too. Gated by
//! `require_cte_over_subquery`.

use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::ast::{ConditionClause, ExprKind, TableFactor};
use crate::parser::SyntaxNode;
use crate::types::{rule_ids, Severity, Violation};

pub struct PreferCteOverSubquery;

impl StyleRule for PreferCteOverSubquery {
    fn id(&self) -> &'static str {
        rule_ids::PREFER_CTE_OVER_SUBQUERY
    }

    fn name(&self) -> &'static str {
        "Prefer CTE over subquery"
    }

    fn description(&self) -> &'static str {
        "Move subqueries into common table expressions."
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        if !ctx.config.require_cte_over_subquery {
            return Vec::new();
        }

        let mut violations = Vec::new();
        for node in ctx.nodes() {
            match node {
                SyntaxNode::TableRef(table) => {
                    if let TableFactor::Subquery { .. } = table.factor {
                        violations.push(violation(
                            self,
                            "Subquery in FROM; move it into a CTE",
                            table.span,
                            None,
                        ));
                    }
                }
                SyntaxNode::SelectCore(core) => {
                    for clause in [&core.where_clause, &core.having].into_iter().flatten() {
                        self.check_condition(clause, &mut violations);
                    }
                }
                _ => {}
            }
        }
        violations
    }
}

impl PreferCteOverSubquery {
    /// Flag subqueries of a condition clause without descending into them;
    /// nested queries are visited on their own.
    fn check_condition(&self, clause: &ConditionClause, out: &mut Vec<Violation>) {
        let mut stack = vec![SyntaxNode::ConditionChain(&clause.chain)];
        while let Some(node) = stack.pop() {
            match node {
                SyntaxNode::Query(_) => continue,
                SyntaxNode::Expr(expr) => match &expr.kind {
                    ExprKind::Exists(_) => continue,
                    ExprKind::Subquery(_) | ExprKind::InSubquery { .. } => {
                        out.push(violation(
                            self,
                            "Subquery in a condition; move it into a CTE",
                            expr.span,
                            None,
                        ));
                    }
                    _ => {}
                },
                _ => {}
            }
            stack.extend(node.children());
        }
    }
}

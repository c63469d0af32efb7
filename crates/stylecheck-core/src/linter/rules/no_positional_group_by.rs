//! no-positional-group-by: GROUP BY and ORDER BY name their expressions
//! instead of referring to select-list positions.

use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::ast::Expr;
use crate::parser::SyntaxNode;
use crate::types::{rule_ids, Severity, Violation};

pub struct NoPositionalGroupBy;

impl StyleRule for NoPositionalGroupBy {
    fn id(&self) -> &'static str {
        rule_ids::NO_POSITIONAL_GROUP_BY
    }

    fn name(&self) -> &'static str {
        "No positional GROUP BY"
    }

    fn description(&self) -> &'static str {
        "GROUP BY and ORDER BY should reference columns by name."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        let mut violations = Vec::new();
        for node in ctx.nodes() {
            match node {
                SyntaxNode::GroupBy(clause) => {
                    self.flag_positions(clause.items.iter(), "GROUP BY", &mut violations);
                }
                SyntaxNode::OrderBy(clause) => self.flag_positions(
                    clause.items.iter().map(|item| &item.expr),
                    "ORDER BY",
                    &mut violations,
                ),
                _ => {}
            }
        }
        violations
    }
}

impl NoPositionalGroupBy {
    fn flag_positions<'a>(
        &self,
        items: impl Iterator<Item = &'a Expr>,
        clause: &str,
        out: &mut Vec<Violation>,
    ) {
        for item in items.filter(|item| item.is_integer_literal()) {
            out.push(violation(
                self,
                format!("Positional reference in {clause}; use the column name"),
                item.span,
                None,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::linter::rule::run_rule;

    fn run(sql: &str) -> Vec<Violation> {
        run_rule(&NoPositionalGroupBy, sql, &StyleConfig::default())
    }

    #[test]
    fn flags_group_by_and_order_by_positions() {
        let violations = run("SELECT a, count(*) AS n FROM t GROUP BY 1 ORDER BY 2 DESC");
        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.contains("GROUP BY"));
        assert!(violations[1].message.contains("ORDER BY"));
    }

    #[test]
    fn allows_named_columns_and_expressions() {
        assert!(run("SELECT a FROM t GROUP BY a, 1 + b ORDER BY a").is_empty());
    }

    #[test]
    fn decimal_literals_are_not_positions() {
        assert!(run("SELECT a FROM t ORDER BY 1.5").is_empty());
    }
}

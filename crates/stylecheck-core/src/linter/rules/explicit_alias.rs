//! explicit-alias: column and table aliases are introduced with `AS`.

use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::ast::Alias;
use crate::parser::SyntaxNode;
use crate::types::{rule_ids, Fix, Severity, Violation};

pub struct ExplicitAlias;

impl StyleRule for ExplicitAlias {
    fn id(&self) -> &'static str {
        rule_ids::EXPLICIT_ALIAS
    }

    fn name(&self) -> &'static str {
        "Explicit alias"
    }

    fn description(&self) -> &'static str {
        "Aliases should use the AS keyword."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        ctx.nodes()
            .filter_map(|node| match node {
                SyntaxNode::Field(field) => field.alias.as_ref(),
                SyntaxNode::TableRef(table) => table.alias.as_ref(),
                _ => None,
            })
            .filter(|alias| !alias.explicit)
            .map(|alias: &Alias| {
                violation(
                    self,
                    format!("Implicit alias `{}`; use AS", alias.name.text),
                    alias.span,
                    Some(Fix::insert(
                        alias.name.span.start,
                        format!("{} ", ctx.kw("AS")),
                    )),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::linter::rule::run_rule;

    fn run(sql: &str) -> Vec<Violation> {
        run_rule(&ExplicitAlias, sql, &StyleConfig::default())
    }

    #[test]
    fn flags_implicit_column_and_table_aliases() {
        let violations = run("SELECT a b FROM t u");
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].fix, Some(Fix::insert(9, "AS ")));
        assert_eq!(violations[1].fix, Some(Fix::insert(18, "AS ")));
    }

    #[test]
    fn allows_explicit_aliases() {
        assert!(run("SELECT a AS b FROM t AS u INNER JOIN v AS w ON u.id = w.id").is_empty());
    }

    #[test]
    fn flags_join_and_subquery_aliases() {
        assert_eq!(run("SELECT 1 FROM (SELECT 1) s INNER JOIN v w ON TRUE").len(), 2);
    }
}

//! explicit-join-type: joins name their type.
//!
//! A bare `JOIN` is fixed to `INNER JOIN`. Implicit comma joins are flagged
//! without a fix since rewriting them means moving their conditions out of
//! WHERE. Gated by `require_explicit_join`.

use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::ast::JoinKind;
use crate::parser::SyntaxNode;
use crate::types::{rule_ids, Fix, Severity, Violation};

pub struct ExplicitJoinType;

impl StyleRule for ExplicitJoinType {
    fn id(&self) -> &'static str {
        rule_ids::EXPLICIT_JOIN_TYPE
    }

    fn name(&self) -> &'static str {
        "Explicit join type"
    }

    fn description(&self) -> &'static str {
        "Use INNER JOIN instead of a bare JOIN or a comma join."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        if !ctx.config.require_explicit_join {
            return Vec::new();
        }

        ctx.nodes()
            .filter_map(|node| match node {
                SyntaxNode::Join(join) => match join.kind {
                    JoinKind::Plain => Some(violation(
                        self,
                        "Bare JOIN should be written as INNER JOIN",
                        join.keyword,
                        Some(Fix::insert(
                            join.join_token.start,
                            format!("{} ", ctx.kw("INNER")),
                        )),
                    )),
                    JoinKind::Comma => Some(violation(
                        self,
                        "Implicit comma join; use an explicit JOIN with ON",
                        join.join_token,
                        None,
                    )),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KeywordCase, StyleConfig};
    use crate::linter::rule::run_rule;

    fn run(sql: &str) -> Vec<Violation> {
        run_rule(&ExplicitJoinType, sql, &StyleConfig::default())
    }

    #[test]
    fn flags_plain_join() {
        let violations = run("SELECT a.x FROM a JOIN b ON a.id = b.id");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, rule_ids::EXPLICIT_JOIN_TYPE);
        assert_eq!(violations[0].fix, Some(Fix::insert(18, "INNER ")));
    }

    #[test]
    fn allows_inner_join() {
        assert!(run("SELECT a.x FROM a INNER JOIN b ON a.id = b.id").is_empty());
    }

    #[test]
    fn allows_qualified_joins() {
        assert!(run(
            "SELECT 1 FROM a LEFT JOIN b ON a.id = b.id RIGHT OUTER JOIN c USING (id) \
             FULL JOIN d ON TRUE CROSS JOIN e"
        )
        .is_empty());
    }

    #[test]
    fn flags_each_plain_join_in_chain() {
        assert_eq!(
            run("SELECT 1 FROM a JOIN b ON a.id = b.id JOIN c ON b.id = c.id").len(),
            2
        );
    }

    #[test]
    fn flags_comma_join_without_fix() {
        let violations = run("SELECT 1 FROM a, b WHERE a.id = b.id");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].fix.is_none());
    }

    #[test]
    fn fix_follows_keyword_case() {
        let config = StyleConfig {
            keyword_case: KeywordCase::Lower,
            ..StyleConfig::default()
        };
        let violations = run_rule(&ExplicitJoinType, "select 1 from a join b using (id)", &config);
        assert_eq!(violations[0].fix, Some(Fix::insert(16, "inner ")));
    }

    #[test]
    fn disabled_when_not_required() {
        let config = StyleConfig {
            require_explicit_join: false,
            ..StyleConfig::default()
        };
        assert!(run_rule(&ExplicitJoinType, "SELECT 1 FROM a JOIN b ON TRUE", &config).is_empty());
    }
}

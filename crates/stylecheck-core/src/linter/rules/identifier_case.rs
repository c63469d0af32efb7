//! identifier-case: unquoted identifiers are snake_case.
//!
//! Quoted identifiers are exempt, as are function and type names. Skipped
//! entirely when `identifier_case` is `asis`.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::IdentifierCase as Policy;
use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::SyntaxNode;
use crate::types::{rule_ids, Severity, Violation};

static SNAKE_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid regex"));

pub struct IdentifierCase;

impl StyleRule for IdentifierCase {
    fn id(&self) -> &'static str {
        rule_ids::IDENTIFIER_CASE
    }

    fn name(&self) -> &'static str {
        "Identifier case"
    }

    fn description(&self) -> &'static str {
        "Unquoted identifiers should be snake_case."
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        if ctx.config.identifier_case == Policy::Asis {
            return Vec::new();
        }

        ctx.nodes()
            .filter_map(|node| match node {
                SyntaxNode::Identifier(ident) if !ident.quoted => Some(ident),
                _ => None,
            })
            .filter(|ident| !SNAKE_CASE.is_match(&ident.text))
            .map(|ident| {
                violation(
                    self,
                    format!("Identifier `{}` should be snake_case", ident.text),
                    ident.span,
                    None,
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
        run_rule(&IdentifierCase, sql, &StyleConfig::default())
    }

    #[test]
    fn flags_camel_case_column() {
        let violations = run("SELECT userId FROM users");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].column, 8);
    }

    #[test]
    fn flags_table_and_alias_names() {
        assert_eq!(run("SELECT x FROM Orders AS O").len(), 2);
    }

    #[test]
    fn allows_snake_case_and_quoted() {
        assert!(run(r#"SELECT user_id, "UserName", _tmp1 FROM app.users"#).is_empty());
    }

    #[test]
    fn function_names_are_not_identifiers() {
        assert!(run("SELECT COUNT(id) AS n FROM t").is_empty());
    }

    #[test]
    fn asis_policy_disables_rule() {
        let config = StyleConfig {
            identifier_case: Policy::Asis,
            ..StyleConfig::default()
        };
        assert!(run_rule(&IdentifierCase, "SELECT userId FROM T", &config).is_empty());
    }
}

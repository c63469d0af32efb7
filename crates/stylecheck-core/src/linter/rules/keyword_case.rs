//! keyword-case: every keyword token is written in the configured case.
//!
//! Keywords inside opaque statements count too; the formatter recases them
//! the same way.

use crate::lexer::TokenKind;
use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::types::{rule_ids, Fix, Severity, Violation};

pub struct KeywordCase;

impl StyleRule for KeywordCase {
    fn id(&self) -> &'static str {
        rule_ids::KEYWORD_CASE
    }

    fn name(&self) -> &'static str {
        "Keyword case"
    }

    fn description(&self) -> &'static str {
        "Keywords must use the configured case."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        let case = ctx.config.keyword_case;
        ctx.tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Keyword)
            .filter_map(|token| {
                let expected = case.apply(token.text);
                (expected != token.text).then(|| {
                    violation(
                        self,
                        format!(
                            "Keyword `{}` should be {} case",
                            token.text,
                            case.as_str()
                        ),
                        token.span,
                        Some(Fix::replace(token.span, expected)),
                    )
                })
            })
            .collect()
    }
}

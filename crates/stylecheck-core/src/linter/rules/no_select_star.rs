//! no-select-star: SELECT lists name their columns.

use crate::linter::rule::{violation, RuleContext, StyleRule};
use crate::parser::ast::ExprKind;
use crate::parser::SyntaxNode;
use crate::types::{rule_ids, Severity, Violation};

pub struct NoSelectStar;

impl StyleRule for NoSelectStar {
    fn id(&self) -> &'static str {
        rule_ids::NO_SELECT_STAR
    }

    fn name(&self) -> &'static str {
        "No SELECT *"
    }

    fn description(&self) -> &'static str {
        "Select explicit columns instead of `*`."
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Violation> {
        ctx.nodes()
            .filter_map(|node| match node {
                SyntaxNode::Field(field) => match &field.expr.kind {
                    ExprKind::Wildcard(qualifier) => Some(violation(
                        self,
                        match qualifier {
                            Some(_) => "Avoid selecting all columns of a table; list them",
                            None => "Avoid SELECT *; list the columns",
                        },
                        field.expr.span,
                        None,
                    )),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }
}

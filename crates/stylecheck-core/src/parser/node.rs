//! Uniform borrowed view over the syntax tree.
//!
//! Rules that only care about "every identifier" or "every subquery" walk
//! [`SyntaxNode::descendants`] instead of matching on each node type.

use super::ast::*;
use crate::types::Span;

/// A reference to one node of the syntax tree.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'a> {
    Document(&'a Document),
    Statement(&'a Statement),
    Query(&'a Query),
    WithClause(&'a WithClause),
    Cte(&'a Cte),
    SelectCore(&'a SelectCore),
    FieldList(&'a FieldList),
    Field(&'a Field),
    FromClause(&'a FromClause),
    TableRef(&'a TableRef),
    Join(&'a Join),
    ConditionChain(&'a ConditionChain),
    GroupBy(&'a GroupByClause),
    OrderBy(&'a OrderByClause),
    Limit(&'a LimitClause),
    Case(&'a CaseExpr),
    Expr(&'a Expr),
    /// A column, table, alias or CTE name. Function names and type names are
    /// not identifier nodes.
    Identifier(&'a Ident),
    Opaque(&'a Opaque),
}

impl<'a> SyntaxNode<'a> {
    pub fn span(&self) -> Span {
        match self {
            SyntaxNode::Document(n) => n.span,
            SyntaxNode::Statement(n) => n.span,
            SyntaxNode::Query(n) => n.span,
            SyntaxNode::WithClause(n) => n.span,
            SyntaxNode::Cte(n) => n.span,
            SyntaxNode::SelectCore(n) => n.span,
            SyntaxNode::FieldList(n) => n.span,
            SyntaxNode::Field(n) => n.span,
            SyntaxNode::FromClause(n) => n.span,
            SyntaxNode::TableRef(n) => n.span,
            SyntaxNode::Join(n) => n.span,
            SyntaxNode::ConditionChain(n) => n.span,
            SyntaxNode::GroupBy(n) => n.span,
            SyntaxNode::OrderBy(n) => n.span,
            SyntaxNode::Limit(n) => n.span,
            SyntaxNode::Case(n) => n.span,
            SyntaxNode::Expr(n) => n.span,
            SyntaxNode::Identifier(n) => n.span,
            SyntaxNode::Opaque(n) => n.span,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        let mut out = Vec::new();
        match *self {
            SyntaxNode::Document(doc) => {
                out.extend(doc.statements.iter().map(SyntaxNode::Statement));
            }
            SyntaxNode::Statement(stmt) => match &stmt.body {
                StatementBody::Query(query) => out.push(SyntaxNode::Query(query)),
                StatementBody::Opaque(opaque) => out.push(SyntaxNode::Opaque(opaque)),
            },
            SyntaxNode::Query(query) => {
                if let Some(with) = &query.with {
                    out.push(SyntaxNode::WithClause(with));
                }
                out.extend(query.cores().map(SyntaxNode::SelectCore));
                if let Some(order_by) = &query.order_by {
                    out.push(SyntaxNode::OrderBy(order_by));
                }
                if let Some(limit) = &query.limit {
                    out.push(SyntaxNode::Limit(limit));
                }
            }
            SyntaxNode::WithClause(with) => out.extend(with.ctes.iter().map(SyntaxNode::Cte)),
            SyntaxNode::Cte(cte) => {
                out.push(SyntaxNode::Identifier(&cte.name));
                out.extend(cte.columns.iter().map(SyntaxNode::Identifier));
                out.push(SyntaxNode::Query(&cte.query));
            }
            SyntaxNode::SelectCore(core) => {
                out.push(SyntaxNode::FieldList(&core.fields));
                if let Some(from) = &core.from {
                    out.push(SyntaxNode::FromClause(from));
                }
                if let Some(clause) = &core.where_clause {
                    out.push(SyntaxNode::ConditionChain(&clause.chain));
                }
                if let Some(group_by) = &core.group_by {
                    out.push(SyntaxNode::GroupBy(group_by));
                }
                if let Some(clause) = &core.having {
                    out.push(SyntaxNode::ConditionChain(&clause.chain));
                }
            }
            SyntaxNode::FieldList(list) => out.extend(list.fields.iter().map(SyntaxNode::Field)),
            SyntaxNode::Field(field) => {
                out.push(SyntaxNode::Expr(&field.expr));
                if let Some(alias) = &field.alias {
                    out.push(SyntaxNode::Identifier(&alias.name));
                }
            }
            SyntaxNode::FromClause(from) => {
                out.push(SyntaxNode::TableRef(&from.source));
                out.extend(from.joins.iter().map(SyntaxNode::Join));
            }
            SyntaxNode::TableRef(table) => {
                match &table.factor {
                    TableFactor::Table(name) => {
                        out.extend(name.parts.iter().map(SyntaxNode::Identifier));
                    }
                    TableFactor::Function { args, .. } => {
                        out.extend(args.iter().map(SyntaxNode::Expr));
                    }
                    TableFactor::Subquery { query, .. } => out.push(SyntaxNode::Query(query)),
                }
                if let Some(alias) = &table.alias {
                    out.push(SyntaxNode::Identifier(&alias.name));
                }
            }
            SyntaxNode::Join(join) => {
                out.push(SyntaxNode::TableRef(&join.table));
                match &join.constraint {
                    Some(JoinConstraint::On { chain, .. }) => {
                        out.push(SyntaxNode::ConditionChain(chain));
                    }
                    Some(JoinConstraint::Using { columns, .. }) => {
                        out.extend(columns.iter().map(SyntaxNode::Identifier));
                    }
                    None => {}
                }
            }
            SyntaxNode::ConditionChain(chain) => {
                out.extend(chain.items.iter().map(|item| SyntaxNode::Expr(&item.expr)));
            }
            SyntaxNode::GroupBy(group_by) => {
                out.extend(group_by.items.iter().map(SyntaxNode::Expr));
            }
            SyntaxNode::OrderBy(order_by) => {
                out.extend(order_by.items.iter().map(|item| SyntaxNode::Expr(&item.expr)));
            }
            SyntaxNode::Limit(limit) => {
                out.extend(limit.limit.iter().map(SyntaxNode::Expr));
                out.extend(limit.offset.iter().map(SyntaxNode::Expr));
            }
            SyntaxNode::Case(case) => {
                if let Some(operand) = &case.operand {
                    out.push(SyntaxNode::Expr(operand));
                }
                for when in &case.whens {
                    out.push(SyntaxNode::ConditionChain(&when.condition));
                    out.push(SyntaxNode::Expr(&when.result));
                }
                if let Some(result) = &case.else_result {
                    out.push(SyntaxNode::Expr(result));
                }
            }
            SyntaxNode::Expr(expr) => expr_children(expr, &mut out),
            SyntaxNode::Identifier(_) | SyntaxNode::Opaque(_) => {}
        }
        out
    }

    /// This node and every node below it, in pre-order.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants { stack: vec![*self] }
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<SyntaxNode<'a>>) {
    match &expr.kind {
        ExprKind::Identifier(name) | ExprKind::Wildcard(Some(name)) => {
            out.extend(name.parts.iter().map(SyntaxNode::Identifier));
        }
        ExprKind::Wildcard(None) | ExprKind::Literal(_) => {}
        ExprKind::Binary { left, right, .. } => {
            out.push(SyntaxNode::Expr(left));
            out.push(SyntaxNode::Expr(right));
        }
        ExprKind::Unary { expr, .. }
        | ExprKind::Nested(expr)
        | ExprKind::Is { expr, .. }
        | ExprKind::Cast { expr, .. } => out.push(SyntaxNode::Expr(expr)),
        ExprKind::Interval { value, .. } => out.push(SyntaxNode::Expr(value)),
        ExprKind::Tuple(items) => out.extend(items.iter().map(SyntaxNode::Expr)),
        ExprKind::Function(function) => {
            out.extend(function.args.iter().map(SyntaxNode::Expr));
            if let Some(over) = &function.over {
                out.push(SyntaxNode::Opaque(over));
            }
        }
        ExprKind::Case(case) => out.push(SyntaxNode::Case(case)),
        ExprKind::Subquery(query) | ExprKind::Exists(query) => out.push(SyntaxNode::Query(query)),
        ExprKind::InList { expr, list, .. } => {
            out.push(SyntaxNode::Expr(expr));
            out.extend(list.iter().map(SyntaxNode::Expr));
        }
        ExprKind::InSubquery { expr, query, .. } => {
            out.push(SyntaxNode::Expr(expr));
            out.push(SyntaxNode::Query(query));
        }
        ExprKind::Between {
            expr, low, high, ..
        } => {
            out.push(SyntaxNode::Expr(expr));
            out.push(SyntaxNode::Expr(low));
            out.push(SyntaxNode::Expr(high));
        }
        ExprKind::Like { expr, pattern, .. } => {
            out.push(SyntaxNode::Expr(expr));
            out.push(SyntaxNode::Expr(pattern));
        }
        ExprKind::Opaque(opaque) => out.push(SyntaxNode::Opaque(opaque)),
    }
}

/// Pre-order iterator returned by [`SyntaxNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<SyntaxNode<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = SyntaxNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

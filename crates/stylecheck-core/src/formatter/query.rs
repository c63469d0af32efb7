//! Multi-line layout of queries.
//!
//! With `P` the indentation of the current depth and `w` one indentation
//! unit: clause keywords sit at `P`, fields and WHERE/HAVING continuations at
//! `P + w`, CTE bodies and FROM/JOIN subqueries one depth deeper. Join
//! conditions end-align ON / AND / OR with the join keyword.

use super::context::{condition_column, join_keyword, FormatContext};
use super::expr;
use super::writer::Writer;
use crate::parser::ast::*;

pub(crate) fn query(w: &mut Writer, query: &Query, ctx: FormatContext<'_>) {
    let p = ctx.indent();
    if let Some(with) = &query.with {
        with_clause(w, with, ctx);
    }
    select_core(w, &query.body, ctx);

    for op in &query.set_operations {
        w.leading(p, &op.comments.leading);
        w.line(p, &expr::set_operator(op, ctx));
        w.trailing(&op.comments.trailing);
        select_core(w, &op.core, ctx);
    }

    if let Some(clause) = &query.order_by {
        w.leading(p, &clause.comments.leading);
        w.line(p, &expr::order_by(clause, ctx));
        w.trailing(&clause.comments.trailing);
    }
    if let Some(clause) = &query.limit {
        w.leading(p, &clause.comments.leading);
        w.line(p, &expr::limit(clause, ctx));
        w.trailing(&clause.comments.trailing);
    }
}

fn with_clause(w: &mut Writer, with: &WithClause, ctx: FormatContext<'_>) {
    let p = ctx.indent();
    let last = with.ctes.len().saturating_sub(1);

    for (index, cte) in with.ctes.iter().enumerate() {
        if index == 0 {
            w.leading(p, &cte.comments.leading);
            let with_kw = if with.recursive {
                format!("{} {}", ctx.kw("WITH"), ctx.kw("RECURSIVE"))
            } else {
                ctx.kw("WITH")
            };
            w.line(p, &format!("{with_kw} {}", expr::cte_header(cte, ctx)));
        } else {
            w.blank_lines(ctx.separator_lines());
            w.leading(p, &cte.comments.leading);
            w.line(p, &expr::cte_header(cte, ctx));
        }
        w.trailing(&cte.comments.trailing);

        query(w, &cte.query, ctx.nested());
        w.line(p, if index < last { ")," } else { ")" });
    }
    w.blank_lines(ctx.separator_lines());
}

fn select_core(w: &mut Writer, core: &SelectCore, ctx: FormatContext<'_>) {
    let p = ctx.indent();
    w.leading(p, &core.comments.leading);
    w.line(p, &expr::select_keyword(core, ctx));
    w.trailing(&core.comments.trailing);

    fields(w, &core.fields, ctx);

    if let Some(from) = &core.from {
        from_clause(w, from, ctx);
    }
    if let Some(clause) = &core.where_clause {
        condition_clause(w, clause, "WHERE", ctx);
    }
    if let Some(clause) = &core.group_by {
        w.leading(p, &clause.comments.leading);
        w.line(p, &expr::group_by(clause, ctx));
        w.trailing(&clause.comments.trailing);
    }
    if let Some(clause) = &core.having {
        condition_clause(w, clause, "HAVING", ctx);
    }
}

fn fields(w: &mut Writer, list: &FieldList, ctx: FormatContext<'_>) {
    let indent = ctx.indent() + ctx.unit();
    let count = list.fields.len();

    for (index, field) in list.fields.iter().enumerate() {
        let comma = if index + 1 < count || ctx.config.trailing_comma_on_last_field {
            ","
        } else {
            ""
        };
        w.leading(indent, &field.comments.leading);
        match &field.expr.kind {
            ExprKind::Case(case) => case_block(w, case, field.alias.as_ref(), comma, ctx),
            _ => w.line(indent, &format!("{}{comma}", expr::field(field, ctx))),
        }
        w.trailing(&field.comments.trailing);
    }
}

/// A CASE expression that is a whole field, one branch per line.
fn case_block(
    w: &mut Writer,
    case: &CaseExpr,
    alias: Option<&Alias>,
    comma: &str,
    ctx: FormatContext<'_>,
) {
    let field_indent = ctx.indent() + ctx.unit();
    let branch_indent = field_indent + ctx.unit();
    let continuation = branch_indent + 2;

    let mut head = ctx.kw("CASE");
    if let Some(operand) = &case.operand {
        head.push(' ');
        head.push_str(&expr::expr(operand, ctx));
    }
    w.line(field_indent, &head);

    for when in &case.whens {
        let single = expr::when_clause(when, ctx);
        let too_long = branch_indent + single.chars().count() > ctx.config.max_line_length;
        if !too_long || when.condition.items.len() < 2 {
            w.line(branch_indent, &single);
            w.trailing(&when.comments);
            continue;
        }

        for item in &when.condition.items {
            let text = expr::expr(&item.expr, ctx);
            match item.connector {
                None => w.line(branch_indent, &format!("{} {text}", ctx.kw("WHEN"))),
                Some((connector, _)) => w.line(
                    continuation,
                    &format!("{} {text}", ctx.kw(connector.as_str())),
                ),
            }
        }
        w.line(
            continuation,
            &format!("{} {}", ctx.kw("THEN"), expr::expr(&when.result, ctx)),
        );
        w.trailing(&when.comments);
    }

    if let Some(result) = &case.else_result {
        w.line(branch_indent, &expr::else_clause(result, ctx));
    }
    w.line(
        field_indent,
        &format!("{}{}{comma}", ctx.kw("END"), expr::alias(alias, ctx)),
    );
}

fn from_clause(w: &mut Writer, from: &FromClause, ctx: FormatContext<'_>) {
    let p = ctx.indent();
    w.leading(p, &from.comments.leading);
    w.line(p, &format!("{} ", ctx.kw("FROM")));
    table_ref(w, &from.source, ctx);

    // Comma joins directly after the source stay on the FROM line.
    let inline = from
        .joins
        .iter()
        .take_while(|join| join.kind == JoinKind::Comma)
        .count();
    for join in &from.joins[..inline] {
        w.push(", ");
        table_ref(w, &join.table, ctx);
    }
    w.trailing(&from.comments.trailing);

    for join in &from.joins[inline..] {
        if join.kind == JoinKind::Comma {
            w.line(p, ", ");
            table_ref(w, &join.table, ctx);
        } else {
            join_clause(w, join, ctx);
        }
    }
}

fn join_clause(w: &mut Writer, join: &Join, ctx: FormatContext<'_>) {
    let p = ctx.indent();
    let keyword = join_keyword(join, ctx.config);

    w.leading(p, &join.comments.leading);
    w.line(p, &format!("{} ", ctx.kw(keyword)));
    table_ref(w, &join.table, ctx);
    if let Some(JoinConstraint::Using { columns, .. }) = &join.constraint {
        w.push(&expr::using(columns, ctx));
    }
    w.trailing(&join.comments.trailing);

    let Some(JoinConstraint::On { chain, .. }) = &join.constraint else {
        return;
    };
    for item in &chain.items {
        let word = match item.connector {
            None => "ON",
            Some((connector, _)) => connector.as_str(),
        };
        let column = condition_column(p, keyword, word);
        w.leading(column, &item.comments.leading);
        w.line(
            column,
            &format!("{} {}", ctx.kw(word), expr::expr(&item.expr, ctx)),
        );
        w.trailing(&item.comments.trailing);
    }
}

/// Append a table reference to the current line. Subqueries open a block
/// one depth deeper and close it with `) AS alias` at the current depth.
fn table_ref(w: &mut Writer, table: &TableRef, ctx: FormatContext<'_>) {
    match &table.factor {
        TableFactor::Subquery { query: inner, .. } => {
            w.push("(");
            query(w, inner, ctx.nested());
            w.line(
                ctx.indent(),
                &format!("){}", expr::alias(table.alias.as_ref(), ctx)),
            );
        }
        _ => w.push(&expr::table_ref(table, ctx)),
    }
}

fn condition_clause(
    w: &mut Writer,
    clause: &ConditionClause,
    keyword: &str,
    ctx: FormatContext<'_>,
) {
    let p = ctx.indent();
    let continuation = p + ctx.unit();
    w.leading(p, &clause.comments.leading);

    for item in &clause.chain.items {
        let text = expr::expr(&item.expr, ctx);
        match item.connector {
            None => {
                w.leading(p, &item.comments.leading);
                w.line(p, &format!("{} {text}", ctx.kw(keyword)));
            }
            Some((connector, _)) => {
                w.leading(continuation, &item.comments.leading);
                w.line(
                    continuation,
                    &format!("{} {text}", ctx.kw(connector.as_str())),
                );
            }
        }
        w.trailing(&item.comments.trailing);
    }
}

//! Single-line rendering of expressions and inline queries.

use super::context::{join_keyword, FormatContext};
use crate::lexer::{is_keyword, tokenize, TokenKind};
use crate::parser::ast::*;

pub(crate) fn expr(e: &Expr, ctx: FormatContext<'_>) -> String {
    match &e.kind {
        ExprKind::Identifier(name) => object_name(name, ctx),
        ExprKind::Wildcard(None) => "*".to_string(),
        ExprKind::Wildcard(Some(qualifier)) => format!("{}.*", object_name(qualifier, ctx)),
        ExprKind::Literal(literal) => match literal.kind {
            LiteralKind::Keyword => ctx.kw(&literal.text),
            LiteralKind::Number | LiteralKind::String => literal.text.clone(),
        },
        ExprKind::Binary { left, op, right } => {
            let op = match op {
                BinaryOp::And => ctx.kw("AND"),
                BinaryOp::Or => ctx.kw("OR"),
                BinaryOp::Symbol(symbol) => symbol.clone(),
            };
            format!("{} {} {}", expr(left, ctx), op, expr(right, ctx))
        }
        ExprKind::Unary { op, expr: inner } => {
            let inner = expr(inner, ctx);
            match op {
                UnaryOp::Not => format!("{} {}", ctx.kw("NOT"), inner),
                // `- -x` must not collapse into a `--` comment.
                UnaryOp::Minus if inner.starts_with('-') => format!("- {inner}"),
                UnaryOp::Minus => format!("-{inner}"),
                UnaryOp::Plus => format!("+{inner}"),
                UnaryOp::BitNot => format!("~{inner}"),
            }
        }
        ExprKind::Nested(inner) => format!("({})", expr(inner, ctx)),
        ExprKind::Tuple(items) => format!("({})", list(items, ctx)),
        ExprKind::Function(function) => function_call(function, ctx),
        ExprKind::Case(case) => case_inline(case, ctx),
        ExprKind::Subquery(query) => format!("({})", inline_query(query, ctx)),
        ExprKind::Exists(query) => format!("{} ({})", ctx.kw("EXISTS"), inline_query(query, ctx)),
        ExprKind::InList {
            expr: inner,
            negated,
            list: items,
        } => format!(
            "{} {}({})",
            expr(inner, ctx),
            negation(*negated, "IN", ctx),
            list(items, ctx)
        ),
        ExprKind::InSubquery {
            expr: inner,
            negated,
            query,
        } => format!(
            "{} {}({})",
            expr(inner, ctx),
            negation(*negated, "IN", ctx),
            inline_query(query, ctx)
        ),
        ExprKind::Between {
            expr: inner,
            negated,
            low,
            high,
        } => format!(
            "{} {}{} {} {}",
            expr(inner, ctx),
            negation(*negated, "BETWEEN", ctx),
            expr(low, ctx),
            ctx.kw("AND"),
            expr(high, ctx)
        ),
        ExprKind::Like {
            expr: inner,
            negated,
            case_insensitive,
            pattern,
        } => {
            let word = if *case_insensitive { "ILIKE" } else { "LIKE" };
            format!(
                "{} {}{}",
                expr(inner, ctx),
                negation(*negated, word, ctx),
                expr(pattern, ctx)
            )
        }
        ExprKind::Is {
            expr: inner,
            negated,
            value,
        } => {
            let not = if *negated {
                format!("{} ", ctx.kw("NOT"))
            } else {
                String::new()
            };
            format!(
                "{} {} {}{}",
                expr(inner, ctx),
                ctx.kw("IS"),
                not,
                ctx.kw(value.as_str())
            )
        }
        ExprKind::Cast {
            expr: inner,
            data_type,
            shorthand: true,
        } => format!("{}::{}", expr(inner, ctx), recase(data_type, ctx)),
        ExprKind::Cast {
            expr: inner,
            data_type,
            shorthand: false,
        } => format!(
            "{}({} {} {})",
            ctx.kw("CAST"),
            expr(inner, ctx),
            ctx.kw("AS"),
            recase(data_type, ctx)
        ),
        ExprKind::Interval { value, unit } => {
            let mut out = format!("{} {}", ctx.kw("INTERVAL"), expr(value, ctx));
            if let Some(unit) = unit {
                out.push(' ');
                out.push_str(&ident(unit, ctx));
            }
            out
        }
        ExprKind::Opaque(opaque) => recase(&opaque.text, ctx),
    }
}

/// `NOT IN `, `IN ` and friends, with a trailing space.
fn negation(negated: bool, word: &str, ctx: FormatContext<'_>) -> String {
    if negated {
        format!("{} {} ", ctx.kw("NOT"), ctx.kw(word))
    } else {
        format!("{} ", ctx.kw(word))
    }
}

fn list(items: &[Expr], ctx: FormatContext<'_>) -> String {
    items
        .iter()
        .map(|item| expr(item, ctx))
        .collect::<Vec<_>>()
        .join(", ")
}

fn function_call(function: &Function, ctx: FormatContext<'_>) -> String {
    let mut out = object_name(&function.name, ctx);
    out.push('(');
    if function.distinct {
        out.push_str(&ctx.kw("DISTINCT"));
        out.push(' ');
    }
    out.push_str(&list(&function.args, ctx));
    out.push(')');
    if let Some(over) = &function.over {
        out.push(' ');
        out.push_str(&ctx.kw("OVER"));
        out.push(' ');
        out.push_str(&recase(&over.text, ctx));
    }
    out
}

fn case_inline(case: &CaseExpr, ctx: FormatContext<'_>) -> String {
    let mut out = ctx.kw("CASE");
    if let Some(operand) = &case.operand {
        out.push(' ');
        out.push_str(&expr(operand, ctx));
    }
    for when in &case.whens {
        out.push(' ');
        out.push_str(&when_clause(when, ctx));
    }
    if let Some(result) = &case.else_result {
        out.push(' ');
        out.push_str(&else_clause(result, ctx));
    }
    out.push(' ');
    out.push_str(&ctx.kw("END"));
    out
}

/// `WHEN condition THEN result` on one line.
pub(crate) fn when_clause(when: &WhenClause, ctx: FormatContext<'_>) -> String {
    format!(
        "{} {} {} {}",
        ctx.kw("WHEN"),
        chain(&when.condition, ctx),
        ctx.kw("THEN"),
        expr(&when.result, ctx)
    )
}

pub(crate) fn else_clause(result: &Expr, ctx: FormatContext<'_>) -> String {
    format!("{} {}", ctx.kw("ELSE"), expr(result, ctx))
}

/// A condition chain on one line.
pub(crate) fn chain(chain: &ConditionChain, ctx: FormatContext<'_>) -> String {
    let mut out = String::new();
    for item in &chain.items {
        if let Some((connector, _)) = item.connector {
            out.push(' ');
            out.push_str(&ctx.kw(connector.as_str()));
            out.push(' ');
        }
        out.push_str(&expr(&item.expr, ctx));
    }
    out
}

pub(crate) fn ident(ident: &Ident, ctx: FormatContext<'_>) -> String {
    if !ident.quoted && is_keyword(&ident.text) {
        ctx.kw(&ident.text)
    } else {
        ident.text.clone()
    }
}

pub(crate) fn ident_list(idents: &[Ident], ctx: FormatContext<'_>) -> String {
    idents
        .iter()
        .map(|i| ident(i, ctx))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn object_name(name: &ObjectName, ctx: FormatContext<'_>) -> String {
    name.parts
        .iter()
        .map(|part| ident(part, ctx))
        .collect::<Vec<_>>()
        .join(".")
}

/// ` AS alias`, or nothing.
pub(crate) fn alias(alias: Option<&Alias>, ctx: FormatContext<'_>) -> String {
    match alias {
        Some(alias) => format!(" {} {}", ctx.kw("AS"), ident(&alias.name, ctx)),
        None => String::new(),
    }
}

/// A field with its alias, without the comma.
pub(crate) fn field(field: &Field, ctx: FormatContext<'_>) -> String {
    format!("{}{}", expr(&field.expr, ctx), alias(field.alias.as_ref(), ctx))
}

pub(crate) fn order_item(item: &OrderItem, ctx: FormatContext<'_>) -> String {
    let mut out = expr(&item.expr, ctx);
    match item.direction {
        Some(SortDirection::Asc) => out.push_str(&format!(" {}", ctx.kw("ASC"))),
        Some(SortDirection::Desc) => out.push_str(&format!(" {}", ctx.kw("DESC"))),
        None => {}
    }
    match item.nulls {
        Some(NullsOrder::First) => {
            out.push_str(&format!(" {} {}", ctx.kw("NULLS"), ctx.kw("FIRST")))
        }
        Some(NullsOrder::Last) => out.push_str(&format!(" {} {}", ctx.kw("NULLS"), ctx.kw("LAST"))),
        None => {}
    }
    out
}

pub(crate) fn group_by(clause: &GroupByClause, ctx: FormatContext<'_>) -> String {
    format!("{} {}", ctx.kw("GROUP BY"), list(&clause.items, ctx))
}

pub(crate) fn order_by(clause: &OrderByClause, ctx: FormatContext<'_>) -> String {
    let items = clause
        .items
        .iter()
        .map(|item| order_item(item, ctx))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} {}", ctx.kw("ORDER BY"), items)
}

pub(crate) fn limit(clause: &LimitClause, ctx: FormatContext<'_>) -> String {
    let mut parts = Vec::new();
    if let Some(limit) = &clause.limit {
        parts.push(format!("{} {}", ctx.kw("LIMIT"), expr(limit, ctx)));
    }
    if let Some(offset) = &clause.offset {
        parts.push(format!("{} {}", ctx.kw("OFFSET"), expr(offset, ctx)));
    }
    parts.join(" ")
}

pub(crate) fn select_keyword(core: &SelectCore, ctx: FormatContext<'_>) -> String {
    match core.quantifier {
        Some(quantifier) => format!("{} {}", ctx.kw("SELECT"), ctx.kw(quantifier.as_str())),
        None => ctx.kw("SELECT"),
    }
}

pub(crate) fn set_operator(op: &SetOperation, ctx: FormatContext<'_>) -> String {
    match op.quantifier {
        Some(quantifier) => format!(
            "{} {}",
            ctx.kw(op.operator.as_str()),
            ctx.kw(quantifier.as_str())
        ),
        None => ctx.kw(op.operator.as_str()),
    }
}

/// `name [(columns)] AS (`
pub(crate) fn cte_header(cte: &Cte, ctx: FormatContext<'_>) -> String {
    let mut out = ident(&cte.name, ctx);
    if !cte.columns.is_empty() {
        out.push_str(&format!(" ({})", ident_list(&cte.columns, ctx)));
    }
    out.push_str(&format!(" {} (", ctx.kw("AS")));
    out
}

/// A table reference that is not a subquery, with its alias.
pub(crate) fn table_ref(table: &TableRef, ctx: FormatContext<'_>) -> String {
    let factor = match &table.factor {
        TableFactor::Table(name) => object_name(name, ctx),
        TableFactor::Function { name, args } => {
            format!("{}({})", object_name(name, ctx), list(args, ctx))
        }
        TableFactor::Subquery { query, .. } => format!("({})", inline_query(query, ctx)),
    };
    format!("{factor}{}", alias(table.alias.as_ref(), ctx))
}

pub(crate) fn using(columns: &[Ident], ctx: FormatContext<'_>) -> String {
    format!(" {} ({})", ctx.kw("USING"), ident_list(columns, ctx))
}

/// A whole query on one line.
pub(crate) fn inline_query(query: &Query, ctx: FormatContext<'_>) -> String {
    let mut parts = Vec::new();
    if let Some(with) = &query.with {
        let ctes = with
            .ctes
            .iter()
            .map(|cte| format!("{}{})", cte_header(cte, ctx), inline_query(&cte.query, ctx)))
            .collect::<Vec<_>>()
            .join(", ");
        if with.recursive {
            parts.push(format!("{} {} {}", ctx.kw("WITH"), ctx.kw("RECURSIVE"), ctes));
        } else {
            parts.push(format!("{} {}", ctx.kw("WITH"), ctes));
        }
    }
    parts.push(inline_core(&query.body, ctx));
    for op in &query.set_operations {
        parts.push(set_operator(op, ctx));
        parts.push(inline_core(&op.core, ctx));
    }
    if let Some(clause) = &query.order_by {
        parts.push(order_by(clause, ctx));
    }
    if let Some(clause) = &query.limit {
        parts.push(limit(clause, ctx));
    }
    parts.join(" ")
}

fn inline_core(core: &SelectCore, ctx: FormatContext<'_>) -> String {
    let fields = core
        .fields
        .fields
        .iter()
        .map(|f| field(f, ctx))
        .collect::<Vec<_>>()
        .join(", ");
    let mut out = format!("{} {}", select_keyword(core, ctx), fields);

    if let Some(from) = &core.from {
        out.push_str(&format!(" {} {}", ctx.kw("FROM"), table_ref(&from.source, ctx)));
        for join in &from.joins {
            if join.kind == JoinKind::Comma {
                out.push_str(&format!(", {}", table_ref(&join.table, ctx)));
                continue;
            }
            out.push_str(&format!(
                " {} {}",
                ctx.kw(join_keyword(join, ctx.config)),
                table_ref(&join.table, ctx)
            ));
            match &join.constraint {
                Some(JoinConstraint::On { chain: c, .. }) => {
                    out.push_str(&format!(" {} {}", ctx.kw("ON"), chain(c, ctx)));
                }
                Some(JoinConstraint::Using { columns, .. }) => out.push_str(&using(columns, ctx)),
                None => {}
            }
        }
    }
    if let Some(clause) = &core.where_clause {
        out.push_str(&format!(" {} {}", ctx.kw("WHERE"), chain(&clause.chain, ctx)));
    }
    if let Some(clause) = &core.group_by {
        out.push(' ');
        out.push_str(&group_by(clause, ctx));
    }
    if let Some(clause) = &core.having {
        out.push_str(&format!(" {} {}", ctx.kw("HAVING"), chain(&clause.chain, ctx)));
    }
    out
}

/// Re-case the keywords of a raw fragment, leaving everything else verbatim.
pub(crate) fn recase(text: &str, ctx: FormatContext<'_>) -> String {
    match tokenize(text) {
        Ok(tokens) => tokens
            .iter()
            .map(|token| {
                if token.kind == TokenKind::Keyword {
                    ctx.kw(token.text)
                } else {
                    token.text.to_string()
                }
            })
            .collect(),
        Err(_) => text.to_string(),
    }
}

/// True if the last non-space token of `text` is a `--` comment.
pub(crate) fn ends_with_line_comment(text: &str) -> bool {
    tokenize(text).ok().is_some_and(|tokens| {
        tokens
            .iter()
            .rev()
            .find(|token| !token.kind.is_space())
            .is_some_and(|token| token.kind == TokenKind::LineComment)
    })
}

//! Expression parsing.
//!
//! Precedence, loosest first: OR, AND, NOT, comparison and predicates
//! (`IN`, `BETWEEN`, `LIKE`, `IS`), additive and concatenation,
//! multiplicative, unary, postfix `::type`.

use super::ast::*;
use super::{PResult, Parser};
use crate::lexer::TokenKind;
use crate::types::Span;

const COMPARISON_OPERATORS: &[&str] = &["=", "<>", "!=", "<", ">", "<=", ">=", "<=>"];
const ADDITIVE_OPERATORS: &[&str] = &["+", "-", "||", "&", "|", "^", "->", "->>"];
const MULTIPLICATIVE_OPERATORS: &[&str] = &["*", "/", "%"];
const INTERVAL_UNITS: &[&str] = &[
    "YEAR", "MONTH", "WEEK", "DAY", "HOUR", "MINUTE", "SECOND", "YEARS", "MONTHS", "WEEKS",
    "DAYS", "HOURS", "MINUTES", "SECONDS",
];

impl<'t, 'src> Parser<'t, 'src> {
    pub(super) fn expr(&mut self) -> PResult<Expr> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> PResult<Expr> {
        let mut left = self.and_expr()?;
        while self.eat_keyword("OR")?.is_some() {
            let right = self.and_expr()?;
            left = binary(left, BinaryOp::Or, right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> PResult<Expr> {
        let mut left = self.not_expr()?;
        while self.eat_keyword("AND")?.is_some() {
            let right = self.not_expr()?;
            left = binary(left, BinaryOp::And, right);
        }
        Ok(left)
    }

    pub(super) fn not_expr(&mut self) -> PResult<Expr> {
        if self.check_keyword("NOT") {
            let start = self.advance()?.span.start;
            self.enter()?;
            let inner = self.not_expr();
            self.exit();
            let expr = inner?;
            return Ok(Expr {
                span: self.span_from(start),
                kind: ExprKind::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(expr),
                },
            });
        }
        self.comparison()
    }

    fn peek_operator(&self, operators: &[&str]) -> Option<String> {
        let token = self.peek()?;
        (token.kind == TokenKind::Operator && operators.contains(&token.text))
            .then(|| token.text.to_string())
    }

    fn comparison(&mut self) -> PResult<Expr> {
        let mut left = self.additive()?;
        loop {
            if let Some(op) = self.peek_operator(COMPARISON_OPERATORS) {
                self.advance()?;
                let right = self.additive()?;
                left = binary(left, BinaryOp::Symbol(op), right);
                continue;
            }

            let negated = self.check_keyword("NOT")
                && ["IN", "BETWEEN", "LIKE", "ILIKE"]
                    .iter()
                    .any(|kw| self.check_nth_keyword(1, kw));
            if negated {
                self.advance()?;
            }

            let start = left.span.start;
            if self.eat_keyword("IN")?.is_some() {
                self.expect_kind(TokenKind::LParen, "`(`")?;
                let kind = if self.at_query_start() {
                    let query = self.inline(|p| p.query())?;
                    ExprKind::InSubquery {
                        expr: Box::new(left),
                        negated,
                        query: Box::new(query),
                    }
                } else {
                    let mut list = vec![self.expr()?];
                    while self.eat_kind(TokenKind::Comma)?.is_some() {
                        list.push(self.expr()?);
                    }
                    ExprKind::InList {
                        expr: Box::new(left),
                        negated,
                        list,
                    }
                };
                self.expect_kind(TokenKind::RParen, "`)`")?;
                left = Expr {
                    kind,
                    span: self.span_from(start),
                };
            } else if self.eat_keyword("BETWEEN")?.is_some() {
                let low = self.additive()?;
                self.expect_keyword("AND")?;
                let high = self.additive()?;
                left = Expr {
                    kind: ExprKind::Between {
                        expr: Box::new(left),
                        negated,
                        low: Box::new(low),
                        high: Box::new(high),
                    },
                    span: self.span_from(start),
                };
            } else if self.check_keyword("LIKE") || self.check_keyword("ILIKE") {
                let case_insensitive = self.advance()?.text.eq_ignore_ascii_case("ILIKE");
                let pattern = self.additive()?;
                left = Expr {
                    kind: ExprKind::Like {
                        expr: Box::new(left),
                        negated,
                        case_insensitive,
                        pattern: Box::new(pattern),
                    },
                    span: self.span_from(start),
                };
            } else if self.eat_keyword("IS")?.is_some() {
                let negated = self.eat_keyword("NOT")?.is_some();
                let value = if self.eat_keyword("NULL")?.is_some() {
                    IsValue::Null
                } else if self.eat_keyword("TRUE")?.is_some() {
                    IsValue::True
                } else if self.eat_keyword("FALSE")?.is_some() {
                    IsValue::False
                } else {
                    return Err(self.expected("NULL, TRUE or FALSE"));
                };
                left = Expr {
                    kind: ExprKind::Is {
                        expr: Box::new(left),
                        negated,
                        value,
                    },
                    span: self.span_from(start),
                };
            } else {
                return Ok(left);
            }
        }
    }

    fn additive(&mut self) -> PResult<Expr> {
        let mut left = self.multiplicative()?;
        while let Some(op) = self.peek_operator(ADDITIVE_OPERATORS) {
            self.advance()?;
            let right = self.multiplicative()?;
            left = binary(left, BinaryOp::Symbol(op), right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> PResult<Expr> {
        let mut left = self.unary()?;
        while let Some(op) = self.peek_operator(MULTIPLICATIVE_OPERATORS) {
            self.advance()?;
            let right = self.unary()?;
            left = binary(left, BinaryOp::Symbol(op), right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> PResult<Expr> {
        let op = match self.peek_operator(&["-", "+", "~"]).as_deref() {
            Some("-") => UnaryOp::Minus,
            Some("+") => UnaryOp::Plus,
            Some(_) => UnaryOp::BitNot,
            None => return self.postfix(),
        };
        let start = self.advance()?.span.start;
        self.enter()?;
        let inner = self.unary();
        self.exit();
        let expr = inner?;
        Ok(Expr {
            kind: ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            span: self.span_from(start),
        })
    }

    fn postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.primary()?;
        while self.peek_operator(&["::"]).is_some() {
            self.advance()?;
            let data_type = self.data_type(false)?;
            let start = expr.span.start;
            expr = Expr {
                kind: ExprKind::Cast {
                    expr: Box::new(expr),
                    data_type,
                    shorthand: true,
                },
                span: self.span_from(start),
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> PResult<Expr> {
        let Some(token) = self.peek().copied() else {
            return Err(self.expected("expression"));
        };
        let start = token.span.start;

        match token.kind {
            TokenKind::NumberLiteral | TokenKind::StringLiteral => {
                self.advance()?;
                let kind = if token.kind == TokenKind::NumberLiteral {
                    LiteralKind::Number
                } else {
                    LiteralKind::String
                };
                Ok(literal(kind, token.text, token.span))
            }
            TokenKind::Operator if token.text == "*" => {
                self.advance()?;
                Ok(Expr {
                    kind: ExprKind::Wildcard(None),
                    span: token.span,
                })
            }
            TokenKind::LParen => {
                self.enter()?;
                let result = self.parenthesized();
                self.exit();
                result
            }
            TokenKind::Identifier | TokenKind::QuotedIdentifier => self.name_or_call(),
            TokenKind::Keyword => self.keyword_primary(),
            TokenKind::Other => {
                self.advance()?;
                // `$1`, `:name`, `@var` and similar placeholders.
                let mut end = token.span.end;
                if let Some(next) = self.tokens.get(self.idx).copied() {
                    if next.span.start == end
                        && matches!(
                            next.kind,
                            TokenKind::NumberLiteral | TokenKind::Identifier
                        )
                    {
                        self.advance()?;
                        end = next.span.end;
                    }
                }
                let span = Span::new(start, end);
                Ok(Expr {
                    kind: ExprKind::Opaque(Opaque {
                        text: self.source_text(span),
                        span,
                    }),
                    span,
                })
            }
            _ => Err(self.expected("expression")),
        }
    }

    fn keyword_primary(&mut self) -> PResult<Expr> {
        let Some(token) = self.peek().copied() else {
            return Err(self.expected("expression"));
        };
        let start = token.span.start;

        if ["TRUE", "FALSE", "NULL", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP"]
            .iter()
            .any(|kw| token.is_keyword(kw))
        {
            self.advance()?;
            return Ok(literal(LiteralKind::Keyword, token.text, token.span));
        }

        if token.is_keyword("CASE") {
            self.enter()?;
            let result = self.inline(|p| p.case_expr());
            self.exit();
            return result;
        }

        if token.is_keyword("EXISTS") {
            self.advance()?;
            self.expect_kind(TokenKind::LParen, "`(`")?;
            if !self.at_query_start() {
                return Err(self.expected("SELECT or WITH"));
            }
            let query = self.inline(|p| p.query())?;
            self.expect_kind(TokenKind::RParen, "`)`")?;
            return Ok(Expr {
                kind: ExprKind::Exists(Box::new(query)),
                span: self.span_from(start),
            });
        }

        if token.is_keyword("CAST") {
            self.advance()?;
            self.expect_kind(TokenKind::LParen, "`(`")?;
            let expr = self.expr()?;
            self.expect_keyword("AS")?;
            let data_type = self.data_type(true)?;
            self.expect_kind(TokenKind::RParen, "`)`")?;
            return Ok(Expr {
                kind: ExprKind::Cast {
                    expr: Box::new(expr),
                    data_type,
                    shorthand: false,
                },
                span: self.span_from(start),
            });
        }

        if token.is_keyword("INTERVAL") {
            self.advance()?;
            let value = self.primary()?;
            let is_unit = self.peek().is_some_and(|t| {
                t.kind == TokenKind::Identifier
                    && INTERVAL_UNITS.iter().any(|u| t.text.eq_ignore_ascii_case(u))
            });
            let unit = if is_unit { Some(self.ident()?) } else { None };
            return Ok(Expr {
                kind: ExprKind::Interval {
                    value: Box::new(value),
                    unit,
                },
                span: self.span_from(start),
            });
        }

        // LEFT(...) and RIGHT(...) are string functions.
        let is_call = (token.is_keyword("LEFT") || token.is_keyword("RIGHT"))
            && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::LParen);
        if is_call {
            let name_token = self.advance()?;
            let name = ObjectName {
                parts: vec![Ident {
                    text: name_token.text.to_string(),
                    quoted: false,
                    span: name_token.span,
                }],
                span: name_token.span,
            };
            return self.call(name);
        }

        Err(self.expected("expression"))
    }

    /// `( expr )`, `( a, b )` or a scalar subquery.
    fn parenthesized(&mut self) -> PResult<Expr> {
        let start = self.expect_kind(TokenKind::LParen, "`(`")?.start;
        if self.at_query_start() {
            let query = self.inline(|p| p.query())?;
            self.expect_kind(TokenKind::RParen, "`)`")?;
            return Ok(Expr {
                kind: ExprKind::Subquery(Box::new(query)),
                span: self.span_from(start),
            });
        }

        let first = self.expr()?;
        let kind = if self.check_kind(TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat_kind(TokenKind::Comma)?.is_some() {
                items.push(self.expr()?);
            }
            ExprKind::Tuple(items)
        } else {
            ExprKind::Nested(Box::new(first))
        };
        self.expect_kind(TokenKind::RParen, "`)`")?;
        Ok(Expr {
            kind,
            span: self.span_from(start),
        })
    }

    /// Column reference, `t.*` or function call.
    fn name_or_call(&mut self) -> PResult<Expr> {
        let start = self.start_offset();
        let mut parts = vec![self.ident()?];
        while self.check_kind(TokenKind::Dot) {
            self.advance()?;
            if self.peek_operator(&["*"]).is_some() {
                self.advance()?;
                let qualifier = ObjectName {
                    span: Span::new(start, parts.last().map_or(start, |p| p.span.end)),
                    parts,
                };
                return Ok(Expr {
                    kind: ExprKind::Wildcard(Some(qualifier)),
                    span: self.span_from(start),
                });
            }
            parts.push(self.ident()?);
        }
        let name = ObjectName {
            parts,
            span: self.span_from(start),
        };

        if self.check_kind(TokenKind::LParen) {
            return self.call(name);
        }
        Ok(Expr {
            span: name.span,
            kind: ExprKind::Identifier(name),
        })
    }

    /// Function call arguments and optional `OVER` window.
    fn call(&mut self, name: ObjectName) -> PResult<Expr> {
        let start = name.span.start;
        self.expect_kind(TokenKind::LParen, "`(`")?;
        let distinct = self.eat_keyword("DISTINCT")?.is_some();
        let args = self.inline(|p| p.call_args())?;

        let over = if self.eat_keyword("OVER")?.is_some() {
            if self.check_kind(TokenKind::LParen) {
                Some(self.opaque_parens()?)
            } else {
                let window = self.ident()?;
                Some(Opaque {
                    text: window.text,
                    span: window.span,
                })
            }
        } else {
            None
        };

        Ok(Expr {
            kind: ExprKind::Function(Function {
                name,
                distinct,
                args,
                over,
            }),
            span: self.span_from(start),
        })
    }

    fn case_expr(&mut self) -> PResult<Expr> {
        let start = self.expect_keyword("CASE")?.start;
        let operand = if self.check_keyword("WHEN") {
            None
        } else {
            Some(Box::new(self.expr()?))
        };

        let mut whens = Vec::new();
        while self.check_keyword("WHEN") {
            let when_start = self.advance()?.span.start;
            let condition = self.chain()?;
            let then = self.expect_keyword("THEN")?;
            let result = self.expr()?;
            whens.push(WhenClause {
                condition,
                then,
                result,
                comments: Vec::new(),
                span: self.span_from(when_start),
            });
        }
        if whens.is_empty() {
            return Err(self.expected("WHEN"));
        }

        let else_keyword = self.eat_keyword("ELSE")?;
        let else_result = match else_keyword {
            Some(_) => Some(Box::new(self.expr()?)),
            None => None,
        };
        let end = self.expect_keyword("END")?;

        let span = self.span_from(start);
        Ok(Expr {
            kind: ExprKind::Case(CaseExpr {
                operand,
                whens,
                else_result,
                else_keyword,
                end,
                span,
            }),
            span,
        })
    }

    /// Type name after `AS` in CAST or after `::`.
    ///
    /// CAST types may span several words (`double precision`); the shorthand
    /// form takes a single word so that a following alias is not swallowed.
    fn data_type(&mut self, multi_word: bool) -> PResult<String> {
        let is_word = |p: &Self| {
            p.peek().is_some_and(|t| {
                matches!(
                    t.kind,
                    TokenKind::Identifier | TokenKind::QuotedIdentifier | TokenKind::Keyword
                ) && !t.is_keyword("AS")
            })
        };
        if !is_word(self) {
            return Err(self.expected("type name"));
        }

        let mut text = self.advance()?.text.to_string();
        while multi_word && is_word(self) {
            text.push(' ');
            text.push_str(self.advance()?.text);
        }

        if self.eat_kind(TokenKind::LParen)?.is_some() {
            let mut args = Vec::new();
            loop {
                let arg = self.advance()?;
                if !matches!(
                    arg.kind,
                    TokenKind::NumberLiteral | TokenKind::Identifier | TokenKind::Keyword
                ) {
                    return Err(crate::error::ParseError::new(
                        format!("Unexpected `{}` in type arguments", arg.text),
                        arg.span,
                        arg.line,
                        arg.column,
                    ));
                }
                args.push(arg.text);
                if self.eat_kind(TokenKind::Comma)?.is_none() {
                    break;
                }
            }
            self.expect_kind(TokenKind::RParen, "`)`")?;
            text.push('(');
            text.push_str(&args.join(", "));
            text.push(')');
        }
        Ok(text)
    }

    /// Balanced parenthesized tokens kept as an opaque fragment.
    ///
    /// Trivia collapses to single spaces; comments are left pending for the
    /// next anchor.
    fn opaque_parens(&mut self) -> PResult<Opaque> {
        let start = self.start_offset();
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            self.skip_trivia_into(&mut text);
            let token = self.advance()?;
            if token.kind == TokenKind::Semicolon {
                return Err(crate::error::ParseError::new(
                    "Unexpected `;` inside parentheses",
                    token.span,
                    token.line,
                    token.column,
                ));
            }
            text.push_str(token.text);
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        Ok(Opaque {
            text,
            span: self.span_from(start),
        })
    }

    /// Skip trivia, appending one space to `text` if any was skipped after
    /// the fragment started.
    fn skip_trivia_into(&mut self, text: &mut String) {
        let before = self.idx;
        self.skip_trivia();
        if self.idx > before && !text.is_empty() && !text.ends_with('(') {
            text.push(' ');
        }
    }

    fn source_text(&self, span: Span) -> String {
        self.tokens
            .iter()
            .filter(|t| t.span.start >= span.start && t.span.end <= span.end)
            .map(|t| t.text)
            .collect()
    }
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let span = left.span.to(right.span);
    Expr {
        kind: ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    }
}

fn literal(kind: LiteralKind, text: &str, span: Span) -> Expr {
    Expr {
        kind: ExprKind::Literal(Literal {
            kind,
            text: text.to_string(),
        }),
        span,
    }
}

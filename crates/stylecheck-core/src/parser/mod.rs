//! Recursive-descent parser for the supported SQL subset.
//!
//! The parser looks one significant token ahead (two for a handful of
//! decisions such as `( SELECT`). Trivia tokens are skipped on the way, and
//! the comments among them are held as pending until an anchor node claims
//! them as leading or trailing comments.
//!
//! Statements that do not start with SELECT or WITH are kept as opaque text.
//! A query that fails to parse records a [`ParseError`] and is kept as an
//! opaque statement covering its text up to the next `;`; parsing resumes
//! with the following statement.

pub mod ast;
mod expr;
mod node;

pub use node::SyntaxNode;

use std::mem;

use ast::*;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::types::Span;

/// Deepest nesting of parentheses, subqueries and CASE expressions accepted.
const MAX_NESTING: usize = 100;

/// Result of parsing a whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    pub document: Document,
    /// One entry per statement that fell back to opaque text.
    pub errors: Vec<ParseError>,
}

/// Parse tokens into a document, recovering from errors per statement.
pub fn parse_document(tokens: &[Token<'_>]) -> ParseOutput {
    let output = Parser::new(tokens).document();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        statements = output.document.statements.len(),
        errors = output.errors.len(),
        "parsed document"
    );

    output
}

/// Parse tokens into a document, failing if any statement did not parse.
pub fn parse(tokens: &[Token<'_>]) -> Result<Document, Vec<ParseError>> {
    let output = parse_document(tokens);
    if output.errors.is_empty() {
        Ok(output.document)
    } else {
        Err(output.errors)
    }
}

type PResult<T> = Result<T, ParseError>;

pub(crate) struct Parser<'t, 'src> {
    tokens: &'t [Token<'src>],
    /// Index of the next unconsumed token (trivia included).
    idx: usize,
    /// End offset of the last consumed significant token.
    last_end: usize,
    /// Comments skipped but not yet claimed by an anchor.
    pending: Vec<Comment>,
    /// Greater than zero while parsing constructs rendered on one line.
    inline_depth: usize,
    nesting: usize,
}

impl<'t, 'src> Parser<'t, 'src> {
    pub(crate) fn new(tokens: &'t [Token<'src>]) -> Self {
        Self {
            tokens,
            idx: 0,
            last_end: 0,
            pending: Vec::new(),
            inline_depth: 0,
            nesting: 0,
        }
    }

    // ---- token access ----

    fn significant_index(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    fn peek(&self) -> Option<&Token<'src>> {
        self.significant_index(self.idx).map(|i| &self.tokens[i])
    }

    /// The `n`th significant token after the next one.
    fn peek_nth(&self, n: usize) -> Option<&Token<'src>> {
        let mut index = self.significant_index(self.idx)?;
        for _ in 0..n {
            index = self.significant_index(index + 1)?;
        }
        Some(&self.tokens[index])
    }

    /// Skip trivia, holding comments as pending.
    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.idx) {
            if !token.kind.is_trivia() {
                break;
            }
            if token.kind.is_comment() {
                self.pending.push(comment(token));
            }
            self.idx += 1;
        }
    }

    fn advance(&mut self) -> PResult<Token<'src>> {
        self.skip_trivia();
        match self.tokens.get(self.idx) {
            Some(token) => {
                let token = *token;
                self.idx += 1;
                self.last_end = token.span.end;
                Ok(token)
            }
            None => Err(self.error_here("Unexpected end of input")),
        }
    }

    fn start_offset(&self) -> usize {
        self.peek().map(|t| t.span.start).unwrap_or(self.last_end)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    fn check_nth_keyword(&self, n: usize, keyword: &str) -> bool {
        self.peek_nth(n).is_some_and(|t| t.is_keyword(keyword))
    }

    fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn eat_keyword(&mut self, keyword: &str) -> PResult<Option<Span>> {
        if self.check_keyword(keyword) {
            Ok(Some(self.advance()?.span))
        } else {
            Ok(None)
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> PResult<Span> {
        match self.eat_keyword(keyword)? {
            Some(span) => Ok(span),
            None => Err(self.expected(keyword)),
        }
    }

    fn eat_kind(&mut self, kind: TokenKind) -> PResult<Option<Span>> {
        if self.check_kind(kind) {
            Ok(Some(self.advance()?.span))
        } else {
            Ok(None)
        }
    }

    fn expect_kind(&mut self, kind: TokenKind, what: &str) -> PResult<Span> {
        match self.eat_kind(kind)? {
            Some(span) => Ok(span),
            None => Err(self.expected(what)),
        }
    }

    /// Next token starts a query.
    fn at_query_start(&self) -> bool {
        self.check_keyword("SELECT") || self.check_keyword("WITH")
    }

    // ---- errors ----

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::new(message, token.span, token.line, token.column),
            None => {
                let (line, column) = self.end_position();
                ParseError::new(message, Span::empty(self.last_end), line, column)
                    .with_kind(ParseErrorKind::UnexpectedEof)
            }
        }
    }

    fn expected(&self, what: &str) -> ParseError {
        match self.peek() {
            Some(token) => self.error_here(format!("Expected {what}, found `{}`", token.text)),
            None => self.error_here(format!("Expected {what}, found end of input")),
        }
    }

    /// Line and column just past the last token.
    fn end_position(&self) -> (usize, usize) {
        match self.tokens.last() {
            Some(last) => {
                let newlines = last.text.matches('\n').count();
                if newlines == 0 {
                    (last.line, last.end_column())
                } else {
                    let tail = last.text.rsplit('\n').next().unwrap_or("");
                    (last.line + newlines, tail.chars().count() + 1)
                }
            }
            None => (1, 1),
        }
    }

    fn enter(&mut self) -> PResult<()> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error_here("Expression nesting is too deep"));
        }
        self.nesting += 1;
        Ok(())
    }

    fn exit(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    // ---- comments ----

    /// Claim pending comments for the anchor that starts at the next token.
    fn take_leading(&mut self) -> Vec<Comment> {
        if self.inline_depth > 0 {
            return Vec::new();
        }
        self.skip_trivia();
        mem::take(&mut self.pending)
    }

    /// Claim comments that follow the last consumed token on the same line.
    fn take_trailing(&mut self) -> Vec<Comment> {
        let mut trailing = Vec::new();
        if self.inline_depth > 0 {
            return trailing;
        }
        let mut index = self.idx;
        while let Some(token) = self.tokens.get(index) {
            match token.kind {
                TokenKind::Whitespace => index += 1,
                TokenKind::LineComment => {
                    trailing.push(comment(token));
                    self.idx = index + 1;
                    break;
                }
                TokenKind::BlockComment => {
                    trailing.push(comment(token));
                    index += 1;
                    self.idx = index;
                }
                _ => break,
            }
        }
        trailing
    }

    /// Comments skipped while parsing the construct that just ended.
    ///
    /// Inside a one-line construct they stay pending for the enclosing
    /// anchor.
    fn take_inner(&mut self) -> Vec<Comment> {
        if self.inline_depth > 0 {
            return Vec::new();
        }
        mem::take(&mut self.pending)
    }

    /// Parse `f` as a construct rendered on a single line.
    fn inline<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.inline_depth += 1;
        let result = f(self);
        self.inline_depth -= 1;
        result
    }

    // ---- document and statements ----

    fn document(mut self) -> ParseOutput {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        loop {
            let leading = self.take_leading();
            let Some(next) = self.peek() else {
                self.pending = leading;
                break;
            };
            if next.kind == TokenKind::Semicolon {
                // Empty statement; its comments belong to whatever follows.
                self.pending = leading;
                self.idx = self.significant_index(self.idx).map_or(self.idx, |i| i + 1);
                continue;
            }
            statements.push(self.statement(leading, &mut errors));
        }

        self.skip_trivia();
        let end = self.tokens.last().map_or(0, |t| t.span.end);
        ParseOutput {
            document: Document {
                statements,
                comments: mem::take(&mut self.pending),
                span: Span::new(0, end),
            },
            errors,
        }
    }

    fn statement(&mut self, leading: Vec<Comment>, errors: &mut Vec<ParseError>) -> Statement {
        let start_idx = self.idx;
        let start = self.start_offset();

        let body = if self.at_query_start() {
            match self.query().and_then(|query| self.expect_statement_end(query)) {
                Ok(query) => StatementBody::Query(query),
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %err, "statement kept as opaque text");
                    errors.push(err);
                    self.idx = start_idx;
                    self.pending.clear();
                    self.inline_depth = 0;
                    self.nesting = 0;
                    StatementBody::Opaque(self.opaque_statement())
                }
            }
        } else {
            StatementBody::Opaque(self.opaque_statement())
        };

        let terminator = if self.check_kind(TokenKind::Semicolon) {
            self.advance().ok().map(|t| t.span)
        } else {
            None
        };
        let end_comments = mem::take(&mut self.pending);
        let trailing = self.take_trailing();

        Statement {
            body,
            comments: Comments { leading, trailing },
            end_comments,
            terminator,
            span: self.span_from(start),
        }
    }

    fn expect_statement_end(&self, query: Query) -> PResult<Query> {
        match self.peek() {
            None => Ok(query),
            Some(token) if token.kind == TokenKind::Semicolon => Ok(query),
            Some(token) => Err(self.error_here(format!("Unexpected `{}`", token.text))),
        }
    }

    /// Consume raw tokens up to (not including) the next `;`.
    fn opaque_statement(&mut self) -> Opaque {
        self.skip_trivia();
        let first = self.idx;
        let mut last = None;
        let mut index = first;
        while let Some(token) = self.tokens.get(index) {
            if token.kind == TokenKind::Semicolon {
                break;
            }
            if !token.kind.is_space() {
                last = Some(index);
            }
            index += 1;
        }

        // Comments before `first` were claimed by the statement already.
        let Some(last) = last else {
            return Opaque {
                text: String::new(),
                span: Span::empty(self.last_end),
            };
        };
        let text: String = self.tokens[first..=last].iter().map(|t| t.text).collect();
        let span = Span::new(self.tokens[first].span.start, self.tokens[last].span.end);
        self.idx = last + 1;
        self.last_end = span.end;
        Opaque { text, span }
    }

    // ---- queries ----

    fn query(&mut self) -> PResult<Query> {
        self.enter()?;
        let result = self.query_inner();
        self.exit();
        result
    }

    fn query_inner(&mut self) -> PResult<Query> {
        let start = self.start_offset();
        let with = if self.check_keyword("WITH") {
            Some(self.with_clause()?)
        } else {
            None
        };
        let body = self.select_core()?;

        let mut set_operations = Vec::new();
        while let Some(operator) = self.peek_set_operator() {
            let leading = self.take_leading();
            let op_start = self.start_offset();
            let keyword = self.advance()?.span;
            let quantifier = self.set_quantifier()?;
            let trailing = self.take_trailing();
            let core = self.select_core()?;
            set_operations.push(SetOperation {
                operator,
                quantifier,
                keyword,
                core,
                comments: Comments { leading, trailing },
                span: self.span_from(op_start),
            });
        }

        let order_by = if self.check_keyword("ORDER") {
            Some(self.order_by()?)
        } else {
            None
        };
        let limit = if self.check_keyword("LIMIT") || self.check_keyword("OFFSET") {
            Some(self.limit()?)
        } else {
            None
        };

        Ok(Query {
            with,
            body,
            set_operations,
            order_by,
            limit,
            span: self.span_from(start),
        })
    }

    fn peek_set_operator(&self) -> Option<SetOperator> {
        let token = self.peek()?;
        if token.is_keyword("UNION") {
            Some(SetOperator::Union)
        } else if token.is_keyword("INTERSECT") {
            Some(SetOperator::Intersect)
        } else if token.is_keyword("EXCEPT") {
            Some(SetOperator::Except)
        } else {
            None
        }
    }

    fn set_quantifier(&mut self) -> PResult<Option<SetQuantifier>> {
        if self.eat_keyword("ALL")?.is_some() {
            Ok(Some(SetQuantifier::All))
        } else if self.eat_keyword("DISTINCT")?.is_some() {
            Ok(Some(SetQuantifier::Distinct))
        } else {
            Ok(None)
        }
    }

    fn with_clause(&mut self) -> PResult<WithClause> {
        let start = self.start_offset();
        self.expect_keyword("WITH")?;
        let recursive = self.eat_keyword("RECURSIVE")?.is_some();

        let mut ctes = vec![self.cte()?];
        while self.eat_kind(TokenKind::Comma)?.is_some() {
            ctes.push(self.cte()?);
        }

        Ok(WithClause {
            recursive,
            ctes,
            span: self.span_from(start),
        })
    }

    fn cte(&mut self) -> PResult<Cte> {
        let leading = self.take_leading();
        let start = self.start_offset();
        let name = self.ident()?;

        let mut columns = Vec::new();
        if self.eat_kind(TokenKind::LParen)?.is_some() {
            columns = self.ident_list()?;
            self.expect_kind(TokenKind::RParen, "`)`")?;
        }

        self.expect_keyword("AS")?;
        self.expect_kind(TokenKind::LParen, "`(`")?;
        let trailing = self.take_trailing();
        if !self.at_query_start() {
            return Err(self.expected("SELECT or WITH"));
        }
        let query = self.query()?;
        let close = self.expect_kind(TokenKind::RParen, "`)`")?;

        Ok(Cte {
            name,
            columns,
            query: Box::new(query),
            close,
            comments: Comments { leading, trailing },
            span: self.span_from(start),
        })
    }

    fn select_core(&mut self) -> PResult<SelectCore> {
        let leading = self.take_leading();
        let start = self.start_offset();
        let keyword = self.expect_keyword("SELECT")?;
        let quantifier = self.set_quantifier()?;
        let trailing = self.take_trailing();

        let fields = self.field_list()?;
        let from = if self.check_keyword("FROM") {
            Some(self.from_clause()?)
        } else {
            None
        };
        let where_clause = if self.check_keyword("WHERE") {
            Some(self.condition_clause()?)
        } else {
            None
        };
        let group_by = if self.check_keyword("GROUP") {
            Some(self.group_by()?)
        } else {
            None
        };
        let having = if self.check_keyword("HAVING") {
            Some(self.condition_clause()?)
        } else {
            None
        };

        Ok(SelectCore {
            keyword,
            quantifier,
            fields,
            from,
            where_clause,
            group_by,
            having,
            comments: Comments { leading, trailing },
            span: self.span_from(start),
        })
    }

    /// Next token ends a field list (so a comma before it is trailing).
    fn at_field_list_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => match token.kind {
                TokenKind::RParen | TokenKind::Semicolon => true,
                TokenKind::Keyword => [
                    "FROM",
                    "WHERE",
                    "GROUP",
                    "HAVING",
                    "ORDER",
                    "LIMIT",
                    "OFFSET",
                    "UNION",
                    "INTERSECT",
                    "EXCEPT",
                ]
                .iter()
                .any(|kw| token.is_keyword(kw)),
                _ => false,
            },
        }
    }

    fn field_list(&mut self) -> PResult<FieldList> {
        let start = self.start_offset();
        let mut fields = Vec::new();
        loop {
            let leading = self.take_leading();
            let field_start = self.start_offset();
            let mut expr = self.expr()?;
            let alias = self.alias()?;
            let span = self.span_from(field_start);

            let mut trailing = self.take_inner();
            if let ExprKind::Case(case) = &mut expr.kind {
                trailing = attach_branch_comments(case, trailing);
            }
            trailing.extend(self.take_trailing());
            let comma = self.eat_kind(TokenKind::Comma)?;
            if comma.is_some() {
                trailing.extend(self.take_trailing());
            }

            fields.push(Field {
                expr,
                alias,
                comma,
                comments: Comments { leading, trailing },
                span,
            });

            if comma.is_none() || self.at_field_list_end() {
                break;
            }
        }
        Ok(FieldList {
            fields,
            span: self.span_from(start),
        })
    }

    /// `[AS] name`
    fn alias(&mut self) -> PResult<Option<Alias>> {
        let start = self.start_offset();
        let explicit = self.eat_keyword("AS")?.is_some();
        let next_is_name = self.peek().is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::Identifier | TokenKind::QuotedIdentifier
            )
        });
        if !explicit && !next_is_name {
            return Ok(None);
        }
        let name = self.ident()?;
        Ok(Some(Alias {
            name,
            explicit,
            span: self.span_from(start),
        }))
    }

    fn ident(&mut self) -> PResult<Ident> {
        let is_name = self.peek().is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::Identifier | TokenKind::QuotedIdentifier
            )
        });
        if !is_name {
            return Err(self.expected("identifier"));
        }
        let token = self.advance()?;
        Ok(Ident {
            text: token.text.to_string(),
            quoted: token.kind == TokenKind::QuotedIdentifier,
            span: token.span,
        })
    }

    fn ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut idents = vec![self.ident()?];
        while self.eat_kind(TokenKind::Comma)?.is_some() {
            idents.push(self.ident()?);
        }
        Ok(idents)
    }

    fn object_name(&mut self) -> PResult<ObjectName> {
        let start = self.start_offset();
        let mut parts = vec![self.ident()?];
        while self.check_kind(TokenKind::Dot) {
            self.advance()?;
            parts.push(self.ident()?);
        }
        Ok(ObjectName {
            parts,
            span: self.span_from(start),
        })
    }

    // ---- FROM and joins ----

    fn from_clause(&mut self) -> PResult<FromClause> {
        let leading = self.take_leading();
        let start = self.start_offset();
        let keyword = self.expect_keyword("FROM")?;
        let source = self.table_ref()?;

        let mut joins = Vec::new();
        while self.check_kind(TokenKind::Comma) {
            joins.push(self.comma_join()?);
        }
        let mut trailing = self.take_inner();
        trailing.extend(self.take_trailing());

        loop {
            if self.check_kind(TokenKind::Comma) {
                joins.push(self.comma_join()?);
            } else if self.at_join_start() {
                joins.push(self.join()?);
            } else {
                break;
            }
        }

        Ok(FromClause {
            keyword,
            source,
            joins,
            comments: Comments { leading, trailing },
            span: self.span_from(start),
        })
    }

    fn at_join_start(&self) -> bool {
        ["JOIN", "INNER", "LEFT", "RIGHT", "FULL", "CROSS"]
            .iter()
            .any(|kw| self.check_keyword(kw))
    }

    fn comma_join(&mut self) -> PResult<Join> {
        let comma = self.expect_kind(TokenKind::Comma, "`,`")?;
        let table = self.table_ref()?;
        Ok(Join {
            kind: JoinKind::Comma,
            outer: false,
            keyword: comma,
            join_token: comma,
            table,
            constraint: None,
            comments: Comments::default(),
            span: self.span_from(comma.start),
        })
    }

    fn join(&mut self) -> PResult<Join> {
        let leading = self.take_leading();
        let start = self.start_offset();

        let mut outer = false;
        let kind = if self.eat_keyword("INNER")?.is_some() {
            JoinKind::Inner
        } else if self.eat_keyword("CROSS")?.is_some() {
            JoinKind::Cross
        } else if self.check_keyword("JOIN") {
            JoinKind::Plain
        } else {
            let kind = if self.eat_keyword("LEFT")?.is_some() {
                JoinKind::Left
            } else if self.eat_keyword("RIGHT")?.is_some() {
                JoinKind::Right
            } else {
                self.expect_keyword("FULL")?;
                JoinKind::Full
            };
            outer = self.eat_keyword("OUTER")?.is_some();
            kind
        };
        let join_token = self.expect_keyword("JOIN")?;
        let keyword = Span::new(start, join_token.end);

        let table = self.table_ref()?;

        let mut constraint = None;
        if self.check_keyword("USING") {
            let using = self.advance()?.span;
            self.expect_kind(TokenKind::LParen, "`(`")?;
            let columns = self.ident_list()?;
            self.expect_kind(TokenKind::RParen, "`)`")?;
            constraint = Some(JoinConstraint::Using {
                keyword: using,
                columns,
            });
        }
        let mut trailing = self.take_inner();
        trailing.extend(self.take_trailing());

        if constraint.is_none() && self.check_keyword("ON") {
            let on = self.advance()?.span;
            let chain = self.chain()?;
            constraint = Some(JoinConstraint::On { keyword: on, chain });
        }

        Ok(Join {
            kind,
            outer,
            keyword,
            join_token,
            table,
            constraint,
            comments: Comments { leading, trailing },
            span: self.span_from(start),
        })
    }

    fn table_ref(&mut self) -> PResult<TableRef> {
        let start = self.start_offset();
        let factor = if self.check_kind(TokenKind::LParen) {
            let starts_query =
                self.check_nth_keyword(1, "SELECT") || self.check_nth_keyword(1, "WITH");
            if !starts_query {
                return Err(self.error_here("Expected a subquery after `(`"));
            }
            self.advance()?;
            let query = self.query()?;
            let close = self.expect_kind(TokenKind::RParen, "`)`")?;
            TableFactor::Subquery {
                query: Box::new(query),
                close,
            }
        } else {
            let name = self.object_name()?;
            if self.check_kind(TokenKind::LParen) {
                self.advance()?;
                let args = self.inline(|p| p.call_args())?;
                TableFactor::Function { name, args }
            } else {
                TableFactor::Table(name)
            }
        };
        let alias = self.alias()?;
        Ok(TableRef {
            factor,
            alias,
            span: self.span_from(start),
        })
    }

    /// Arguments after an opening parenthesis, through the closing one.
    fn call_args(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat_kind(TokenKind::RParen)?.is_some() {
            return Ok(args);
        }
        args.push(self.expr()?);
        while self.eat_kind(TokenKind::Comma)?.is_some() {
            args.push(self.expr()?);
        }
        self.expect_kind(TokenKind::RParen, "`)`")?;
        Ok(args)
    }

    // ---- conditions and trailing clauses ----

    fn condition_clause(&mut self) -> PResult<ConditionClause> {
        let leading = self.take_leading();
        let start = self.start_offset();
        let keyword = self.advance()?.span;
        let chain = self.chain()?;
        Ok(ConditionClause {
            keyword,
            chain,
            comments: Comments {
                leading,
                trailing: Vec::new(),
            },
            span: self.span_from(start),
        })
    }

    /// Conditions joined by AND / OR, flattened in source order.
    fn chain(&mut self) -> PResult<ConditionChain> {
        let start = self.start_offset();
        let leading = self.take_leading();
        let item_start = self.start_offset();
        let expr = self.not_expr()?;
        let mut items = vec![ChainItem {
            connector: None,
            expr,
            span: self.span_from(item_start),
            comments: Comments {
                leading,
                trailing: self.item_trailing(),
            },
        }];

        loop {
            let connector = if self.check_keyword("AND") {
                Connector::And
            } else if self.check_keyword("OR") {
                Connector::Or
            } else {
                break;
            };
            let leading = self.take_leading();
            let item_start = self.start_offset();
            let connector_span = self.advance()?.span;
            let expr = self.not_expr()?;
            items.push(ChainItem {
                connector: Some((connector, connector_span)),
                expr,
                span: self.span_from(item_start),
                comments: Comments {
                    leading,
                    trailing: self.item_trailing(),
                },
            });
        }

        Ok(ConditionChain {
            items,
            span: self.span_from(start),
        })
    }

    fn item_trailing(&mut self) -> Vec<Comment> {
        let mut trailing = self.take_inner();
        trailing.extend(self.take_trailing());
        trailing
    }

    fn group_by(&mut self) -> PResult<GroupByClause> {
        let leading = self.take_leading();
        let start = self.start_offset();
        self.expect_keyword("GROUP")?;
        self.expect_keyword("BY")?;
        let keyword = self.span_from(start);

        let mut items = vec![self.expr()?];
        while self.eat_kind(TokenKind::Comma)?.is_some() {
            items.push(self.expr()?);
        }
        let trailing = self.item_trailing();

        Ok(GroupByClause {
            keyword,
            items,
            comments: Comments { leading, trailing },
            span: self.span_from(start),
        })
    }

    fn order_by(&mut self) -> PResult<OrderByClause> {
        let leading = self.take_leading();
        let start = self.start_offset();
        self.expect_keyword("ORDER")?;
        self.expect_keyword("BY")?;
        let keyword = self.span_from(start);

        let mut items = vec![self.order_item()?];
        while self.eat_kind(TokenKind::Comma)?.is_some() {
            items.push(self.order_item()?);
        }
        let trailing = self.item_trailing();

        Ok(OrderByClause {
            keyword,
            items,
            comments: Comments { leading, trailing },
            span: self.span_from(start),
        })
    }

    fn order_item(&mut self) -> PResult<OrderItem> {
        let start = self.start_offset();
        let expr = self.expr()?;
        let direction = if self.eat_keyword("ASC")?.is_some() {
            Some(SortDirection::Asc)
        } else if self.eat_keyword("DESC")?.is_some() {
            Some(SortDirection::Desc)
        } else {
            None
        };
        let nulls = if self.eat_keyword("NULLS")?.is_some() {
            let order = match self.peek() {
                Some(t) if t.is_word("FIRST") => NullsOrder::First,
                Some(t) if t.is_word("LAST") => NullsOrder::Last,
                _ => return Err(self.expected("FIRST or LAST")),
            };
            self.advance()?;
            Some(order)
        } else {
            None
        };
        Ok(OrderItem {
            expr,
            direction,
            nulls,
            span: self.span_from(start),
        })
    }

    fn limit(&mut self) -> PResult<LimitClause> {
        let leading = self.take_leading();
        let start = self.start_offset();
        let keyword = self.peek().map(|t| t.span).unwrap_or_default();

        let limit = if self.eat_keyword("LIMIT")?.is_some() {
            Some(self.expr()?)
        } else {
            None
        };
        let offset = if self.eat_keyword("OFFSET")?.is_some() {
            Some(self.expr()?)
        } else {
            None
        };
        let trailing = self.item_trailing();

        Ok(LimitClause {
            keyword,
            limit,
            offset,
            comments: Comments { leading, trailing },
            span: self.span_from(start),
        })
    }
}

/// Hand the comments found inside a CASE field to the branch they sit in.
///
/// A branch owns everything from its WHEN up to the next WHEN, ELSE or END.
/// The rest is returned for the field.
fn attach_branch_comments(case: &mut CaseExpr, comments: Vec<Comment>) -> Vec<Comment> {
    let mut rest = Vec::new();
    let tail = case.else_keyword.unwrap_or(case.end).start;
    let bounds: Vec<(usize, usize)> = case
        .whens
        .iter()
        .enumerate()
        .map(|(index, when)| {
            let end = case.whens.get(index + 1).map_or(tail, |next| next.span.start);
            (when.span.start, end)
        })
        .collect();
    for comment in comments {
        let at = comment.span.start;
        match bounds.iter().position(|&(start, end)| start <= at && at < end) {
            Some(index) => case.whens[index].comments.push(comment),
            None => rest.push(comment),
        }
    }
    rest
}

fn comment(token: &Token<'_>) -> Comment {
    Comment {
        text: token.text.to_string(),
        span: token.span,
    }
}

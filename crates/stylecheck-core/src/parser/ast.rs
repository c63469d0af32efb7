//! Syntax tree for the supported SQL subset.
//!
//! Nodes own their children and record the byte span of the source text they
//! were parsed from. Comments are attached to the nearest anchor node; they
//! are never dropped.

use crate::types::Span;

/// A comment token attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

impl Comment {
    /// `-- ...` comments run to the end of the line.
    pub fn is_line_comment(&self) -> bool {
        self.text.starts_with("--")
    }
}

/// Comments owned by an anchor node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comments {
    /// Comments on the lines before the anchor.
    pub leading: Vec<Comment>,
    /// Comments after the anchor on the same line.
    pub trailing: Vec<Comment>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.leading.iter().chain(self.trailing.iter())
    }
}

/// A parsed document: a sequence of statements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub statements: Vec<Statement>,
    /// Comments after the last statement.
    pub comments: Vec<Comment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub body: StatementBody,
    pub comments: Comments,
    /// Comments between the end of the body and the terminator that no
    /// anchor inside the body claimed.
    pub end_comments: Vec<Comment>,
    /// Span of the terminating `;`, if any.
    pub terminator: Option<Span>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementBody {
    Query(Query),
    /// Statement outside the supported grammar, kept verbatim.
    Opaque(Opaque),
}

/// Raw text for a construct outside the supported grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    pub text: String,
    pub span: Span,
}

/// `[WITH ...] SELECT ... [UNION ...] [ORDER BY ...] [LIMIT ...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub with: Option<WithClause>,
    pub body: SelectCore,
    pub set_operations: Vec<SetOperation>,
    pub order_by: Option<OrderByClause>,
    pub limit: Option<LimitClause>,
    pub span: Span,
}

impl Query {
    /// The first core followed by every set operand.
    pub fn cores(&self) -> impl Iterator<Item = &SelectCore> {
        std::iter::once(&self.body).chain(self.set_operations.iter().map(|op| &op.core))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithClause {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
    pub span: Span,
}

/// `name [(columns)] AS ( query )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cte {
    pub name: Ident,
    pub columns: Vec<Ident>,
    pub query: Box<Query>,
    /// Span of the closing parenthesis.
    pub close: Span,
    pub comments: Comments,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl SetOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOperator::Union => "UNION",
            SetOperator::Intersect => "INTERSECT",
            SetOperator::Except => "EXCEPT",
        }
    }
}

/// `ALL` / `DISTINCT` after SELECT or a set operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetQuantifier {
    All,
    Distinct,
}

impl SetQuantifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetQuantifier::All => "ALL",
            SetQuantifier::Distinct => "DISTINCT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOperation {
    pub operator: SetOperator,
    pub quantifier: Option<SetQuantifier>,
    /// Span of the operator keyword.
    pub keyword: Span,
    pub core: SelectCore,
    pub comments: Comments,
    pub span: Span,
}

/// One `SELECT ... FROM ... WHERE ... GROUP BY ... HAVING ...` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectCore {
    /// Span of the SELECT keyword.
    pub keyword: Span,
    pub quantifier: Option<SetQuantifier>,
    pub fields: FieldList,
    pub from: Option<FromClause>,
    pub where_clause: Option<ConditionClause>,
    pub group_by: Option<GroupByClause>,
    pub having: Option<ConditionClause>,
    pub comments: Comments,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList {
    pub fields: Vec<Field>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub expr: Expr,
    pub alias: Option<Alias>,
    /// Span of the comma following this field, if any.
    pub comma: Option<Span>,
    pub comments: Comments,
    pub span: Span,
}

/// `[AS] name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: Ident,
    /// True when the alias is introduced by `AS`.
    pub explicit: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// Source text, including quotes for quoted identifiers.
    pub text: String,
    pub quoted: bool,
    pub span: Span,
}

/// Dotted name: `schema.table`, `t.column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    pub parts: Vec<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromClause {
    /// Span of the FROM keyword.
    pub keyword: Span,
    pub source: TableRef,
    pub joins: Vec<Join>,
    pub comments: Comments,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub factor: TableFactor,
    pub alias: Option<Alias>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableFactor {
    Table(ObjectName),
    Function {
        name: ObjectName,
        args: Vec<Expr>,
    },
    Subquery {
        query: Box<Query>,
        /// Span of the closing parenthesis.
        close: Span,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    /// `JOIN` without a qualifier.
    Plain,
    /// `FROM a, b`
    Comma,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    /// `OUTER` was written.
    pub outer: bool,
    /// Span of the whole join keyword sequence (`LEFT OUTER JOIN`).
    pub keyword: Span,
    /// Span of the `JOIN` token itself (the comma for comma joins).
    pub join_token: Span,
    pub table: TableRef,
    pub constraint: Option<JoinConstraint>,
    pub comments: Comments,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinConstraint {
    On {
        keyword: Span,
        chain: ConditionChain,
    },
    Using {
        keyword: Span,
        columns: Vec<Ident>,
    },
}

/// `WHERE chain` or `HAVING chain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionClause {
    pub keyword: Span,
    pub chain: ConditionChain,
    pub comments: Comments,
    pub span: Span,
}

/// A flat run of conditions joined by AND / OR.
///
/// Items are stored in source order; re-joining them with their connectors
/// reproduces the original precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionChain {
    pub items: Vec<ChainItem>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainItem {
    /// Connector before this item; `None` for the first item.
    pub connector: Option<(Connector, Span)>,
    pub expr: Expr,
    pub comments: Comments,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupByClause {
    pub keyword: Span,
    pub items: Vec<Expr>,
    pub comments: Comments,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByClause {
    pub keyword: Span,
    pub items: Vec<OrderItem>,
    pub comments: Comments,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub expr: Expr,
    pub direction: Option<SortDirection>,
    pub nulls: Option<NullsOrder>,
    pub span: Span,
}

/// `LIMIT n [OFFSET m]` or `OFFSET m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitClause {
    pub keyword: Span,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub comments: Comments,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Identifier(ObjectName),
    /// `*` or `t.*`
    Wildcard(Option<ObjectName>),
    Literal(Literal),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    /// Parenthesized expression.
    Nested(Box<Expr>),
    /// `(a, b)`
    Tuple(Vec<Expr>),
    Function(Function),
    Case(CaseExpr),
    /// Scalar subquery.
    Subquery(Box<Query>),
    Exists(Box<Query>),
    InList {
        expr: Box<Expr>,
        negated: bool,
        list: Vec<Expr>,
    },
    InSubquery {
        expr: Box<Expr>,
        negated: bool,
        query: Box<Query>,
    },
    Between {
        expr: Box<Expr>,
        negated: bool,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    Like {
        expr: Box<Expr>,
        negated: bool,
        case_insensitive: bool,
        pattern: Box<Expr>,
    },
    Is {
        expr: Box<Expr>,
        negated: bool,
        value: IsValue,
    },
    Cast {
        expr: Box<Expr>,
        data_type: String,
        /// `expr::type` rather than `CAST(expr AS type)`.
        shorthand: bool,
    },
    Interval {
        value: Box<Expr>,
        unit: Option<Ident>,
    },
    Opaque(Opaque),
}

impl Expr {
    /// Integer literal such as the `1` in `GROUP BY 1`.
    pub fn is_integer_literal(&self) -> bool {
        matches!(
            &self.kind,
            ExprKind::Literal(Literal { kind: LiteralKind::Number, text })
                if text.bytes().all(|b| b.is_ascii_digit())
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    /// Comparison, arithmetic or string operator, as written.
    Symbol(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
    /// `TRUE`, `NULL`, `CURRENT_DATE`, ...
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsValue {
    Null,
    True,
    False,
}

impl IsValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            IsValue::Null => "NULL",
            IsValue::True => "TRUE",
            IsValue::False => "FALSE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: ObjectName,
    pub distinct: bool,
    pub args: Vec<Expr>,
    /// Window specification after `OVER`, kept as an opaque fragment.
    pub over: Option<Opaque>,
}

/// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseExpr {
    pub operand: Option<Box<Expr>>,
    pub whens: Vec<WhenClause>,
    pub else_result: Option<Box<Expr>>,
    /// Span of the ELSE keyword.
    pub else_keyword: Option<Span>,
    /// Span of the END keyword.
    pub end: Span,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhenClause {
    pub condition: ConditionChain,
    /// Span of the THEN keyword.
    pub then: Span,
    pub result: Expr,
    /// Comments inside the branch, rendered at the end of its line.
    pub comments: Vec<Comment>,
    pub span: Span,
}

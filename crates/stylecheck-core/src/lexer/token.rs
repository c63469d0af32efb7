//! Token types for the SQL lexer.

use crate::types::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word of the supported grammar: `SELECT`, `join`, ...
    Keyword,
    /// Unquoted identifier: `users`, `created_at`, `COUNT`
    Identifier,
    /// Quoted identifier: `"Order"` or `` `order` ``
    QuotedIdentifier,
    /// Single-quoted string: `'it''s'`
    StringLiteral,
    /// Numeric literal: `42`, `3.14`, `.5`, `1e10`
    NumberLiteral,
    /// Operator: `=`, `<>`, `||`, `::`, ...
    Operator,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `;`
    Semicolon,

    /// `-- ...` up to (not including) the line break
    LineComment,
    /// `/* ... */`
    BlockComment,

    /// Horizontal whitespace
    Whitespace,
    /// `\n` or `\r\n`
    Newline,

    /// Any character the grammar does not use (`$`, `?`, `[`, ...)
    Other,
}

impl TokenKind {
    /// Whether this token is trivia (whitespace or comments).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Whitespace or newline.
    pub fn is_space(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }
}

/// A token with its kind, span, source text slice and start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The source text of this token.
    pub text: &'src str,
    pub span: Span,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column (in characters) of the first character.
    pub column: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, span: Span, line: usize, column: usize) -> Self {
        Self {
            kind,
            text,
            span,
            line,
            column,
        }
    }

    /// Returns true if this is the given keyword (case-insensitive).
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Returns true if this is an unquoted word (keyword or identifier) with the given text.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Identifier)
            && self.text.eq_ignore_ascii_case(word)
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Column just past the last character, for single-line tokens.
    pub fn end_column(&self) -> usize {
        self.column + self.text.chars().count()
    }
}

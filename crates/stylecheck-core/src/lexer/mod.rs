//! Lossless SQL lexer.
//!
//! Every byte of the input ends up in exactly one token: whitespace, newlines
//! and comments are tokens too, so concatenating the token texts reproduces
//! the source. The only failure mode is an unterminated string, quoted
//! identifier or block comment.

mod keywords;
mod token;

pub use keywords::{is_keyword, KEYWORDS};
pub use token::{Token, TokenKind};

use crate::error::LexError;
use crate::types::Span;

/// Tokenize a whole document.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let tokens: Result<Vec<_>, _> = Tokenizer::new(source).collect();

    #[cfg(feature = "tracing")]
    if let Ok(tokens) = &tokens {
        tracing::trace!(count = tokens.len(), bytes = source.len(), "tokenized");
    }

    tokens
}

/// A lazy tokenizer over SQL source text.
///
/// Cloning a tokenizer restarts from the clone's position, so a fresh
/// `Tokenizer::new` (or a clone taken before iterating) replays the sequence.
/// Iteration stops after the first error.
#[derive(Debug, Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: usize,
    line: usize,
    column: usize,
    failed: bool,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 1,
            column: 1,
            failed: false,
        }
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.remaining = &self.remaining[c.len_utf8()..];
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
    }

    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Create a token from the given start position to the current position.
    fn token(&self, kind: TokenKind, start: Start) -> Token<'src> {
        Token::new(
            kind,
            &self.source[start.pos..self.pos],
            Span::new(start.pos, self.pos),
            start.line,
            start.column,
        )
    }

    fn unterminated(&mut self, what: &str, start: Start) -> LexError {
        self.failed = true;
        LexError::new(
            format!("unterminated {what}"),
            Span::new(start.pos, self.source.len()),
            start.line,
            start.column,
        )
    }

    fn start(&self) -> Start {
        Start {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Get the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Result<Token<'src>, LexError>> {
        if self.failed {
            return None;
        }
        let start = self.start();
        let c = self.peek()?;

        let kind = match c {
            '\n' => {
                self.advance();
                TokenKind::Newline
            }
            '\r' if self.peek_nth(1) == Some('\n') => {
                self.advance();
                self.advance();
                TokenKind::Newline
            }
            c if c.is_whitespace() => {
                self.advance_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                if self.pos == start.pos {
                    // lone '\r'
                    self.advance();
                }
                TokenKind::Whitespace
            }
            '-' if self.starts_with("--") => {
                self.advance_while(|c| c != '\n' && c != '\r');
                TokenKind::LineComment
            }
            '/' if self.starts_with("/*") => return Some(self.block_comment(start)),
            '\'' => return Some(self.quoted('\'', true, "string literal", start)),
            '"' => return Some(self.quoted('"', false, "quoted identifier", start)),
            '`' => return Some(self.quoted('`', false, "quoted identifier", start)),
            c if c.is_ascii_digit() => {
                self.number();
                TokenKind::NumberLiteral
            }
            '.' if matches!(self.peek_nth(1), Some(d) if d.is_ascii_digit()) => {
                self.number();
                TokenKind::NumberLiteral
            }
            c if c.is_alphabetic() || c == '_' => {
                self.advance_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                if is_keyword(&self.source[start.pos..self.pos]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            '.' => {
                self.advance();
                TokenKind::Dot
            }
            '(' => {
                self.advance();
                TokenKind::LParen
            }
            ')' => {
                self.advance();
                TokenKind::RParen
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            _ => {
                if let Some(op) = MULTI_CHAR_OPERATORS.iter().find(|op| self.starts_with(op)) {
                    for _ in 0..op.len() {
                        self.advance();
                    }
                    TokenKind::Operator
                } else {
                    self.advance();
                    if SINGLE_CHAR_OPERATORS.contains(c) {
                        TokenKind::Operator
                    } else {
                        TokenKind::Other
                    }
                }
            }
        };

        Some(Ok(self.token(kind, start)))
    }

    fn block_comment(&mut self, start: Start) -> Result<Token<'src>, LexError> {
        self.advance();
        self.advance();
        loop {
            if self.starts_with("*/") {
                self.advance();
                self.advance();
                return Ok(self.token(TokenKind::BlockComment, start));
            }
            if self.advance().is_none() {
                return Err(self.unterminated("block comment", start));
            }
        }
    }

    /// Quoted text where a doubled delimiter escapes itself. String literals
    /// also accept backslash escapes.
    fn quoted(
        &mut self,
        delimiter: char,
        backslash_escapes: bool,
        what: &str,
        start: Start,
    ) -> Result<Token<'src>, LexError> {
        self.advance();
        loop {
            match self.advance() {
                None => return Err(self.unterminated(what, start)),
                Some('\\') if backslash_escapes => {
                    self.advance();
                }
                Some(c) if c == delimiter => {
                    if self.peek() == Some(delimiter) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => {}
            }
        }
        let kind = if delimiter == '\'' {
            TokenKind::StringLiteral
        } else {
            TokenKind::QuotedIdentifier
        };
        Ok(self.token(kind, start))
    }

    /// Digits with an optional fraction and exponent.
    fn number(&mut self) {
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent_digit = match self.peek_nth(1) {
                Some('+' | '-') => self.peek_nth(2),
                other => other,
            };
            if matches!(exponent_digit, Some(d) if d.is_ascii_digit()) {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit());
            }
        }
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[derive(Debug, Clone, Copy)]
struct Start {
    pos: usize,
    line: usize,
    column: usize,
}

/// Longest first, so `->>` wins over `->`.
const MULTI_CHAR_OPERATORS: &[&str] = &["->>", "<=>", "<=", ">=", "<>", "!=", "||", "::", "->"];

const SINGLE_CHAR_OPERATORS: &str = "+-*/%=<>|&^~!";

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_simple_select() {
        assert_eq!(
            kinds("select id from t"),
            vec![
                (TokenKind::Keyword, "select"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Identifier, "id"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Keyword, "from"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Identifier, "t"),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("SELECT a,\n  b").unwrap();
        let b = tokens.iter().find(|t| t.text == "b").unwrap();
        assert_eq!((b.line, b.column), (2, 3));
        assert_eq!(b.span, Span::new(12, 13));
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds("'it''s'"),
            vec![(TokenKind::StringLiteral, "'it''s'")]
        );
        assert_eq!(
            kinds(r"'a\'b'"),
            vec![(TokenKind::StringLiteral, r"'a\'b'")]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            kinds("`order` \"Weird \"\"Name\"\"\""),
            vec![
                (TokenKind::QuotedIdentifier, "`order`"),
                (TokenKind::Whitespace, " "),
                (TokenKind::QuotedIdentifier, "\"Weird \"\"Name\"\"\""),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 3.14 .5 1e10 2E-3"),
            vec![
                (TokenKind::NumberLiteral, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::NumberLiteral, "3.14"),
                (TokenKind::Whitespace, " "),
                (TokenKind::NumberLiteral, ".5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::NumberLiteral, "1e10"),
                (TokenKind::Whitespace, " "),
                (TokenKind::NumberLiteral, "2E-3"),
            ]
        );
    }

    #[test]
    fn test_qualified_name_is_not_a_number() {
        assert_eq!(
            kinds("t.id"),
            vec![
                (TokenKind::Identifier, "t"),
                (TokenKind::Dot, "."),
                (TokenKind::Identifier, "id"),
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("-- note\r\n/* a\nb */"),
            vec![
                (TokenKind::LineComment, "-- note"),
                (TokenKind::Newline, "\r\n"),
                (TokenKind::BlockComment, "/* a\nb */"),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a<>b||c::int"),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Operator, "<>"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Operator, "||"),
                (TokenKind::Identifier, "c"),
                (TokenKind::Operator, "::"),
                (TokenKind::Identifier, "int"),
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_other() {
        assert_eq!(
            kinds("$1 ?"),
            vec![
                (TokenKind::Other, "$"),
                (TokenKind::NumberLiteral, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Other, "?"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("SELECT 'abc").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!(err.span, Span::new(7, 11));
        assert_eq!((err.position.line, err.position.column), (1, 8));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("SELECT 1\n/* open").unwrap_err();
        assert_eq!(err.message, "unterminated block comment");
        assert_eq!(err.position.line, 2);
    }

    #[test]
    fn test_unterminated_quoted_identifier() {
        let err = tokenize("SELECT `col").unwrap_err();
        assert_eq!(err.message, "unterminated quoted identifier");
    }

    #[test]
    fn test_iteration_stops_after_error() {
        let mut tokenizer = Tokenizer::new("'oops");
        assert!(matches!(tokenizer.next(), Some(Err(_))));
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_restartable() {
        let tokenizer = Tokenizer::new("SELECT 1");
        let first: Vec<_> = tokenizer.clone().collect();
        let second: Vec<_> = tokenizer.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lossless() {
        let source = "WITH x AS (\n\tSELECT 'a' -- c\n)\r\nSELECT * FROM x; /* end */ ";
        let joined: String = tokenize(source).unwrap().iter().map(|t| t.text).collect();
        assert_eq!(joined, source);
    }
}

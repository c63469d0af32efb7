//! Semantic equivalence check between original and formatted SQL.
//!
//! Both texts are parsed with `sqlparser` and the rendered statements are
//! compared. Rendering normalizes whitespace, comments and trailing commas;
//! the remaining differences the formatter may introduce on purpose
//! (keyword case, `INNER` on bare joins, `AS` on aliases) are normalized
//! before comparing.

use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect, GenericDialect, PostgreSqlDialect};
use sqlparser::parser::{Parser, ParserError, ParserOptions};

use crate::error::FormatError;

/// Outcome of a successful equivalence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    /// Both texts parse to the same statements.
    Verified,
    /// The original is outside sqlparser's grammar, so nothing was compared.
    Unverified,
}

/// Check that `formatted` means the same as `original`.
pub fn verify_equivalence(original: &str, formatted: &str) -> Result<Equivalence, FormatError> {
    let (before, dialect) = match parse_any(original) {
        Some(parsed) => parsed,
        None => {
            #[cfg(feature = "tracing")]
            tracing::debug!("original SQL is outside the sqlparser grammar; not verified");
            return Ok(Equivalence::Unverified);
        }
    };
    let after = parse_with(dialect.as_ref(), formatted)
        .map_err(|err| FormatError::Unparseable(err.to_string()))?;

    if before.len() != after.len() {
        return Err(FormatError::StatementCountMismatch {
            original: before.len(),
            formatted: after.len(),
        });
    }

    for (statement_index, (left, right)) in before.iter().zip(&after).enumerate() {
        if canonical(left) != canonical(right) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                statement_index,
                original = %left,
                formatted = %right,
                "formatted statement differs"
            );
            return Err(FormatError::SemanticDrift { statement_index });
        }
    }
    Ok(Equivalence::Verified)
}

/// Parse with the generic dialect, falling back to PostgreSQL for `::` casts
/// and JSON operators.
fn parse_any(sql: &str) -> Option<(Vec<Statement>, Box<dyn Dialect>)> {
    if let Ok(statements) = parse_with(&GenericDialect {}, sql) {
        return Some((statements, Box::new(GenericDialect {})));
    }
    parse_with(&PostgreSqlDialect {}, sql)
        .ok()
        .map(|statements| (statements, Box::new(PostgreSqlDialect {}) as Box<dyn Dialect>))
}

fn parse_with(dialect: &dyn Dialect, sql: &str) -> Result<Vec<Statement>, ParserError> {
    Parser::new(dialect)
        .with_options(ParserOptions::new().with_trailing_commas(true))
        .try_with_sql(sql)?
        .parse_statements()
}

fn canonical(statement: &Statement) -> String {
    statement
        .to_string()
        .replace(" INNER JOIN ", " JOIN ")
        .replace(" AS ", " ")
        .to_lowercase()
}

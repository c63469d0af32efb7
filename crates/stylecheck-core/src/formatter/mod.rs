//! Canonical re-emission of a parsed document.
//!
//! The formatter never looks at the original whitespace: it walks the tree
//! and writes every construct in its canonical layout, re-emitting attached
//! comments next to their anchors. Opaque statements and fragments keep
//! their text apart from keyword case.
//!
//! Output is a pure function of the tree and the configuration, and
//! formatting formatted output yields the same text.

mod context;
mod expr;
mod query;
mod writer;

pub use context::{condition_column, join_keyword, FormatContext};

use crate::config::StyleConfig;
use crate::error::StyleError;
use crate::lexer::tokenize;
use crate::parser::ast::{Document, Statement, StatementBody};
use crate::parser::parse_document;
use writer::Writer;

/// Format SQL source text.
///
/// Statements that fail to parse are kept as opaque text, so only a lex error
/// or an invalid configuration prevents formatting.
pub fn format(source: &str, config: &StyleConfig) -> Result<String, StyleError> {
    config.validate()?;
    let tokens = tokenize(source)?;
    let output = parse_document(&tokens);

    #[cfg(feature = "tracing")]
    if !output.errors.is_empty() {
        tracing::debug!(
            errors = output.errors.len(),
            "formatting with opaque statements"
        );
    }

    Ok(format_tree(&output.document, config))
}

/// Format an already parsed document.
pub fn format_tree(document: &Document, config: &StyleConfig) -> String {
    let ctx = FormatContext::new(config);
    let mut w = Writer::new();

    for (index, statement) in document.statements.iter().enumerate() {
        if index > 0 {
            w.blank_lines(ctx.separator_lines());
        }
        format_statement(&mut w, statement, ctx);
    }
    w.leading(0, &document.comments);

    w.finish()
}

fn format_statement(w: &mut Writer, statement: &Statement, ctx: FormatContext<'_>) {
    w.leading(0, &statement.comments.leading);

    match &statement.body {
        StatementBody::Query(body) => query::query(w, body, ctx),
        StatementBody::Opaque(opaque) if opaque.text.is_empty() => {}
        StatementBody::Opaque(opaque) => {
            w.line(0, &expr::recase(&opaque.text, ctx));
            if expr::ends_with_line_comment(&opaque.text) {
                w.close_line();
            }
        }
    }

    w.leading(0, &statement.end_comments);
    if statement.terminator.is_some() {
        w.terminator();
    }
    w.trailing(&statement.comments.trailing);
}

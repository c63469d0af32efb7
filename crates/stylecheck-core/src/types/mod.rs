//! Types shared across the stylecheck pipeline.
//!
//! Spans, severities and violations are serializable so that reporters can
//! emit them as JSON without an intermediate model.

mod common;
mod source;

pub use common::{has_errors, rule_ids, Fix, Severity, Span, Violation};
pub use source::{LineIndex, PositionCursor};

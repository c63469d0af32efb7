//! Report rendering.

pub mod json;
pub mod lint;
pub mod rules;

pub use json::format_lint_json;
pub use lint::{format_check_results, format_lint_results, FileLintResult, LintIssue};
pub use rules::format_rule_table;

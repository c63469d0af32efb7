//! Lint output formatting (sqlfluff-style).

use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;
use stylecheck_core::{LexError, Severity, Violation};

/// Code reported for documents that could not be tokenized.
pub const LEX_ERROR_CODE: &str = "lex-error";

/// Per-file lint result used by the formatters.
#[derive(Debug, Clone, Serialize)]
pub struct FileLintResult {
    #[serde(rename = "file")]
    pub name: String,
    #[serde(rename = "violations")]
    pub issues: Vec<LintIssue>,
}

impl FileLintResult {
    pub fn new(name: impl Into<String>, violations: &[Violation]) -> Self {
        Self {
            name: name.into(),
            issues: violations.iter().map(LintIssue::from).collect(),
        }
    }

    /// A document that failed to tokenize reports the lex error as its only
    /// issue.
    pub fn lex_failure(name: impl Into<String>, error: &LexError) -> Self {
        Self {
            name: name.into(),
            issues: vec![LintIssue {
                line: error.position.line,
                column: error.position.column,
                code: LEX_ERROR_CODE.to_string(),
                message: error.message.clone(),
                severity: Severity::Error,
                fixable: false,
            }],
        }
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }
}

/// A lint issue resolved to line:col.
#[derive(Debug, Clone, Serialize)]
pub struct LintIssue {
    pub line: usize,
    pub column: usize,
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub fixable: bool,
}

impl From<&Violation> for LintIssue {
    fn from(violation: &Violation) -> Self {
        Self {
            line: violation.line,
            column: violation.column,
            code: violation.rule.clone(),
            message: violation.message.clone(),
            severity: violation.severity,
            fixable: violation.fix.is_some(),
        }
    }
}

/// Format lint results as human-readable sqlfluff-style text.
pub fn format_lint_results(results: &[FileLintResult], colored: bool, elapsed: Duration) -> String {
    let mut out = String::new();

    let mut total_pass = 0usize;
    let mut total_fail = 0usize;
    let mut total_violations = 0usize;

    for file in results {
        if file.has_errors() {
            total_fail += 1;
        } else {
            total_pass += 1;
        }
        total_violations += file.issues.len();

        write_file_section(&mut out, file, colored);
    }

    write_summary(
        &mut out,
        total_pass,
        total_fail,
        total_violations,
        colored,
        elapsed,
    );

    out
}

fn write_file_section(out: &mut String, file: &FileLintResult, colored: bool) {
    let status = match (file.has_errors(), file.issues.is_empty()) {
        (true, _) => paint("FAIL", colored, |s| s.red().to_string()),
        (false, true) => paint("PASS", colored, |s| s.green().to_string()),
        (false, false) => paint("WARN", colored, |s| s.yellow().to_string()),
    };

    writeln!(out, "== [{}] {}", file.name, status).unwrap();

    let mut sorted: Vec<&LintIssue> = file.issues.iter().collect();
    sorted.sort_by_key(|i| (i.line, i.column));

    for issue in sorted {
        let code_str = match issue.severity {
            Severity::Error => paint(&issue.code, colored, |s| s.red().to_string()),
            Severity::Warning => paint(&issue.code, colored, |s| s.yellow().to_string()),
        };
        let marker = if issue.fixable { " [fixable]" } else { "" };

        writeln!(
            out,
            "L:{:>4} | P:{:>4} | {} | {}{}",
            issue.line, issue.column, code_str, issue.message, marker
        )
        .unwrap();
    }
}

fn write_summary(
    out: &mut String,
    pass: usize,
    fail: usize,
    violations: usize,
    colored: bool,
    elapsed: Duration,
) {
    writeln!(out, "All Finished in {}!", format_elapsed(elapsed)).unwrap();

    let summary = format!(
        "  {} passed. {} failed. {} violations found.",
        files_str(pass, colored, |s| s.green().to_string()),
        files_str(fail, colored, |s| s.red().to_string()),
        violations
    );
    writeln!(out, "{summary}").unwrap();
}

/// Report of a `--check` run: one line per file that would be reformatted.
pub fn format_check_results(changed: &[String], total: usize, colored: bool) -> String {
    let mut out = String::new();
    for name in changed {
        writeln!(
            out,
            "{} {name}",
            paint("would reformat", colored, |s| s.yellow().to_string())
        )
        .unwrap();
    }
    writeln!(
        out,
        "{} would be reformatted, {} already formatted.",
        files_str(changed.len(), colored, |s| s.yellow().to_string()),
        files_str(total - changed.len(), false, |s| s.to_string())
    )
    .unwrap();
    out
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.2}s")
    } else if elapsed.as_millis() >= 1 {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{}us", elapsed.as_micros())
    }
}

fn files_str(count: usize, colored: bool, color: impl Fn(&str) -> String) -> String {
    let s = format!("{count} file{}", if count == 1 { "" } else { "s" });
    if colored && count > 0 {
        color(&s)
    } else {
        s
    }
}

fn paint(text: &str, colored: bool, color: impl Fn(&str) -> String) -> String {
    if colored {
        color(text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylecheck_core::Span;

    fn issue(line: usize, column: usize, code: &str, severity: Severity) -> LintIssue {
        LintIssue {
            line,
            column,
            code: code.to_string(),
            message: "message".to_string(),
            severity,
            fixable: false,
        }
    }

    #[test]
    fn test_format_lint_pass() {
        let results = vec![FileLintResult::new("clean.sql", &[])];

        let output = format_lint_results(&results, false, Duration::from_millis(250));
        assert!(output.contains("== [clean.sql] PASS"));
        assert!(output.contains("All Finished in 250ms!"));
        assert!(output.contains("1 file passed"));
        assert!(output.contains("0 files failed"));
        assert!(output.contains("0 violations"));
    }

    #[test]
    fn test_format_lint_fail() {
        let results = vec![FileLintResult {
            name: "bad.sql".to_string(),
            issues: vec![
                issue(7, 1, "no-select-star", Severity::Warning),
                issue(3, 12, "keyword-case", Severity::Error),
            ],
        }];

        let output = format_lint_results(&results, false, Duration::from_secs_f64(1.5));
        assert!(output.contains("== [bad.sql] FAIL"));
        assert!(output.contains("All Finished in 1.50s!"));
        assert!(output.contains("L:   3 | P:  12 | keyword-case"));
        assert!(output.contains("L:   7 | P:   1 | no-select-star"));
        assert!(output.find("keyword-case") < output.find("no-select-star"));
        assert!(output.contains("2 violations"));
    }

    #[test]
    fn test_warnings_alone_do_not_fail() {
        let results = vec![FileLintResult {
            name: "warn.sql".to_string(),
            issues: vec![issue(1, 8, "no-select-star", Severity::Warning)],
        }];

        let output = format_lint_results(&results, false, Duration::from_micros(700));
        assert!(output.contains("== [warn.sql] WARN"));
        assert!(output.contains("All Finished in 700us!"));
        assert!(output.contains("1 file passed"));
        assert!(output.contains("0 files failed"));
        assert!(output.contains("1 violations"));
    }

    #[test]
    fn test_fixable_marker() {
        let violation = Violation::error("keyword-case", "Keyword `select` should be upper case", Span::new(0, 6))
            .with_fix(stylecheck_core::Fix::replace(Span::new(0, 6), "SELECT"))
            .with_position(1, 1);
        let results = vec![FileLintResult::new("fix.sql", &[violation])];

        let output = format_lint_results(&results, false, Duration::from_millis(1));
        assert!(output.contains("should be upper case [fixable]"));
    }

    #[test]
    fn test_lex_failure_is_an_error() {
        let error = LexError::new("Unterminated string literal", Span::new(7, 12), 1, 8);
        let result = FileLintResult::lex_failure("open.sql", &error);
        assert!(result.has_errors());
        assert_eq!(result.issues[0].code, LEX_ERROR_CODE);
        assert_eq!((result.issues[0].line, result.issues[0].column), (1, 8));
    }

    #[test]
    fn test_format_check_results() {
        let output = format_check_results(&["a.sql".to_string()], 3, false);
        assert!(output.contains("would reformat a.sql"));
        assert!(output.contains("1 file would be reformatted, 2 files already formatted."));
    }
}

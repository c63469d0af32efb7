use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::tempdir;

/// SQL with two keyword-case violations and a missing trailing comma.
const SQL_WITH_VIOLATIONS: &str = "select id from t\n";

/// Clean SQL with no violations.
const SQL_CLEAN: &str = "SELECT\n    id,\nFROM t\n";

/// SQL whose only finding is a warning.
const SQL_WARNING_ONLY: &str = "SELECT\n    *,\nFROM t\n";

fn stylecheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stylecheck"))
        .args(args)
        .output()
        .expect("run CLI")
}

fn stylecheck_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stylecheck"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for CLI")
}

#[test]
fn test_lint_clean_file() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("clean.sql");
    std::fs::write(&sql_path, SQL_CLEAN).expect("write sql");

    let output = stylecheck(&[sql_path.to_str().expect("sql path")]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert!(stdout.contains("PASS"), "Expected PASS in output: {stdout}");
    assert!(
        stdout.contains("0 violations"),
        "Expected 0 violations: {stdout}"
    );
}

#[test]
fn test_lint_file_with_violations() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("bad.sql");
    std::fs::write(&sql_path, SQL_WITH_VIOLATIONS).expect("write sql");

    let output = stylecheck(&[sql_path.to_str().expect("sql path")]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        output.status.code(),
        Some(1),
        "Expected exit 1, got: {stdout}"
    );
    assert!(stdout.contains("FAIL"), "Expected FAIL in output: {stdout}");
    assert!(
        stdout.contains("keyword-case"),
        "Expected keyword-case: {stdout}"
    );
    assert!(
        stdout.contains("3 violations"),
        "Expected 3 violations: {stdout}"
    );
}

#[test]
fn test_warnings_do_not_fail() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("star.sql");
    std::fs::write(&sql_path, SQL_WARNING_ONLY).expect("write sql");

    let output = stylecheck(&[sql_path.to_str().expect("sql path")]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert!(stdout.contains("no-select-star"), "{stdout}");
    assert!(stdout.contains("1 violations"), "{stdout}");
}

#[test]
fn test_lex_error_fails() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("open.sql");
    std::fs::write(&sql_path, "SELECT 'open\n").expect("write sql");

    let output = stylecheck(&[sql_path.to_str().expect("sql path")]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains("lex-error"), "{stdout}");
    assert!(stdout.contains("1 file failed"), "{stdout}");
}

#[test]
fn test_exclude_rules() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("excluded.sql");
    std::fs::write(&sql_path, SQL_WITH_VIOLATIONS).expect("write sql");

    let output = stylecheck(&[
        "--exclude-rules",
        "keyword-case",
        sql_path.to_str().expect("sql path"),
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Expected exit 0 when rule excluded, got: {stdout}"
    );
    assert!(
        stdout.contains("PASS"),
        "Expected PASS when rule excluded: {stdout}"
    );
}

#[test]
fn test_unknown_excluded_rule_is_usage_error() {
    let output = stylecheck_stdin(&["--exclude-rules", "no-tabs"], SQL_CLEAN);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(66), "{stderr}");
    assert!(stderr.contains("unknown rule id"), "{stderr}");
}

#[test]
fn test_config_file() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("style.json");
    std::fs::write(&config_path, r#"{"keyword_case": "lower"}"#).expect("write config");

    let output = stylecheck_stdin(
        &["--config", config_path.to_str().expect("config path")],
        "select\n    id,\nfrom t\n",
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("== [<stdin>] PASS"), "{stdout}");
}

#[test]
fn test_invalid_config_is_usage_error() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("style.json");
    std::fs::write(&config_path, r#"{"indent_width": 0}"#).expect("write config");

    let output = stylecheck_stdin(
        &["--config", config_path.to_str().expect("config path")],
        SQL_CLEAN,
    );

    assert_eq!(output.status.code(), Some(66));
}

#[test]
fn test_json_output() {
    let output = stylecheck_stdin(&["-f", "json", "--compact"], SQL_WITH_VIOLATIONS);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let violations = parsed[0]["violations"].as_array().expect("violations");
    assert_eq!(parsed[0]["file"], "<stdin>");
    assert_eq!(violations.len(), 3);
    assert_eq!(violations[0]["code"], "keyword-case");
    assert_eq!(violations[1]["code"], "trailing-comma");
    assert_eq!(violations[2]["column"], 11);
}

#[test]
fn test_output_file_has_no_ansi_sequences() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("bad.sql");
    let report_path = dir.path().join("lint.txt");
    std::fs::write(&sql_path, SQL_WITH_VIOLATIONS).expect("write sql");

    let output = stylecheck(&[
        "-o",
        report_path.to_str().expect("report path"),
        sql_path.to_str().expect("sql path"),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let report = std::fs::read_to_string(&report_path).expect("read report");
    assert!(report.contains("FAIL"), "{report}");
    assert!(!report.contains('\u{1b}'), "Unexpected ANSI escape: {report}");
}

#[test]
fn test_directory_input() {
    let dir = tempdir().expect("temp dir");
    std::fs::write(dir.path().join("a.sql"), SQL_CLEAN).expect("write sql");
    std::fs::write(dir.path().join("b.sql"), SQL_WITH_VIOLATIONS).expect("write sql");
    std::fs::write(dir.path().join("readme.md"), "# not sql").expect("write md");

    let output = stylecheck(&[dir.path().to_str().expect("dir path")]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains("1 file passed"), "{stdout}");
    assert!(stdout.contains("1 file failed"), "{stdout}");
    assert!(!stdout.contains("readme.md"), "{stdout}");
}

#[test]
fn test_fix_rewrites_file() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("fix.sql");
    std::fs::write(&sql_path, SQL_WITH_VIOLATIONS).expect("write sql");

    let output = stylecheck(&["--fix", sql_path.to_str().expect("sql path")]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert_eq!(
        std::fs::read_to_string(&sql_path).expect("read sql"),
        "SELECT id, FROM t\n"
    );
}

#[test]
fn test_write_formats_file() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("format.sql");
    std::fs::write(&sql_path, "select id, name n from users where active").expect("write sql");

    let output = stylecheck(&["--write", sql_path.to_str().expect("sql path")]);

    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(&sql_path).expect("read sql"),
        "SELECT\n    id,\n    name AS n,\nFROM users\nWHERE active\n"
    );
}

#[test]
fn test_write_stdin_prints_formatted_sql() {
    let output = stylecheck_stdin(&["--write"], "select 1");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout, "SELECT\n    1,\n");
}

#[test]
fn test_write_summary_counts_each_outcome() {
    let output = stylecheck_stdin(&["--write"], "select a from t");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("reformatted 0 file(s), 0 unchanged, 1 printed to stdout"),
        "{stderr}"
    );

    let dir = tempdir().expect("temp dir");
    let broken = dir.path().join("broken.sql");
    let formatted = dir.path().join("formatted.sql");
    std::fs::write(&broken, "SELECT 'open\n").expect("write sql");
    std::fs::write(&formatted, "SELECT\n    1,\n").expect("write sql");

    let output = stylecheck(&[
        "--write",
        broken.to_str().expect("sql path"),
        formatted.to_str().expect("sql path"),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(
        stderr.contains("reformatted 0 file(s), 1 unchanged, 1 failed"),
        "{stderr}"
    );
}

#[test]
fn test_check_reports_unformatted_files() {
    let dir = tempdir().expect("temp dir");
    let clean = dir.path().join("clean.sql");
    let messy = dir.path().join("messy.sql");
    std::fs::write(&clean, SQL_CLEAN).expect("write sql");
    std::fs::write(&messy, SQL_WITH_VIOLATIONS).expect("write sql");

    let output = stylecheck(&[
        "--check",
        clean.to_str().expect("clean path"),
        messy.to_str().expect("messy path"),
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains("would reformat"), "{stdout}");
    assert!(stdout.contains("messy.sql"), "{stdout}");
    assert!(!stdout.contains("clean.sql"), "{stdout}");
    assert_eq!(
        std::fs::read_to_string(&messy).expect("read sql"),
        SQL_WITH_VIOLATIONS,
        "--check must not modify files"
    );
}

#[test]
fn test_baseline_round_trip() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("legacy.sql");
    let baseline_path = dir.path().join("baseline.json");
    std::fs::write(&sql_path, SQL_WITH_VIOLATIONS).expect("write sql");

    let first = stylecheck(&[
        "--write-baseline",
        baseline_path.to_str().expect("baseline path"),
        sql_path.to_str().expect("sql path"),
    ]);
    assert_eq!(first.status.code(), Some(1));
    assert!(baseline_path.exists());

    let second = stylecheck(&[
        "--baseline",
        baseline_path.to_str().expect("baseline path"),
        sql_path.to_str().expect("sql path"),
    ]);
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(second.status.success(), "{stdout}");
    assert!(stdout.contains("0 violations"), "{stdout}");
}

#[test]
fn test_list_rules() {
    let output = stylecheck(&["--list-rules"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for rule in ["keyword-case", "trailing-comma", "explicit-join-type", "blank-lines"] {
        assert!(stdout.contains(rule), "missing {rule}: {stdout}");
    }
}

#[test]
fn test_print_config_schema() {
    let output = stylecheck(&["--print-config-schema"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_str(&stdout).expect("schema JSON");
    assert!(schema["properties"]["indent_width"].is_object(), "{stdout}");
}
